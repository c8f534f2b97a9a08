//! Application state module
//!
//! This module handles the non-UI state of both tools:
//! - Sequential traversal over the image folder (session.rs)
//! - Startup configuration and its JSON persistence (config.rs)

pub mod config;
pub mod session;
