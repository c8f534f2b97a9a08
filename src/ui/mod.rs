//! UI adapter module
//!
//! Small iced-specific pieces shared by the binaries. The core logic never
//! calls into here; the binaries wire these widgets to the core.

pub mod canvas;
