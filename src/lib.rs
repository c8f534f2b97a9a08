//! Interactive tools for preparing image datasets.
//!
//! This crate contains the UI-free logic shared by the two binaries:
//! - `cropper` - drag a rectangle over a preview, crop the original, save it back
//! - `labeler` - type a label for each image, append it to a tab-separated file
//!
//! The binaries in `src/bin/` are thin iced adapters that drive this core.

pub mod error;
pub mod imaging;
pub mod labels;
pub mod state;
pub mod ui;
