//! Error taxonomy for the dataset preparation tools.
//!
//! Only two error classes are recoverable mid-session:
//! - [`ToolError::UnreadableImage`] - skip the entry and continue
//! - [`ToolError::NoSelection`] / [`ToolError::SelectionTooSmall`] - stay on
//!   the current entry and let the user try again
//!
//! Save and append failures abort the current commit without advancing the
//! session; they never crash the process.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("image folder does not exist or is not a directory: {}", .0.display())]
    FolderNotFound(PathBuf),

    #[error("could not open image {}: {source}", .path.display())]
    UnreadableImage {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("no crop area selected")]
    NoSelection,

    #[error("selection too small: {width}x{height} px (minimum 5x5 in original image pixels)")]
    SelectionTooSmall { width: u32, height: u32 },

    #[error("failed to save cropped image {}: {source}", .path.display())]
    SaveImage {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("failed to append label to {}: {source}", .path.display())]
    LabelAppend {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write config file {}: {source}", .path.display())]
    ConfigWrite {
        path: PathBuf,
        source: std::io::Error,
    },
}
