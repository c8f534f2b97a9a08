//! Image loading and preview generation.
//!
//! Decodes the original image, computes the display transform and produces
//! a Lanczos3-resampled RGBA preview that the UI can hand straight to iced.
//! Decoding is CPU-bound, so the async entry point runs the blocking
//! implementation on a tokio blocking thread and maps the error to a
//! `String` the UI message type can clone.

use std::path::{Path, PathBuf};

use image::{imageops::FilterType, DynamicImage, RgbaImage};
use tokio::task;

use crate::error::ToolError;
use crate::imaging::scale::DisplayTransform;

/// A decoded image together with its screen-sized preview
#[derive(Debug, Clone)]
pub struct LoadedImage {
    /// Filename only (e.g., "img001.jpg")
    pub name: String,
    /// The full-resolution original; crops are taken from this
    pub original: DynamicImage,
    /// RGBA preview, already resized to fit the bounding box
    pub preview: RgbaImage,
    /// Scale retained for mapping selections back to the original
    pub transform: DisplayTransform,
}

impl LoadedImage {
    pub fn preview_size(&self) -> (u32, u32) {
        (self.preview.width(), self.preview.height())
    }
}

/// Load an image and produce its preview, blocking the calling thread.
pub fn load_blocking(path: &Path, max_w: u32, max_h: u32) -> Result<LoadedImage, ToolError> {
    let original = image::open(path).map_err(|e| ToolError::UnreadableImage {
        path: path.to_path_buf(),
        source: e,
    })?;

    let name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    let (width, height) = (original.width(), original.height());
    let transform = DisplayTransform::fit(width, height, max_w, max_h);
    let (preview_w, preview_h) = transform.preview_size(width, height);

    let preview = original
        .resize_exact(preview_w, preview_h, FilterType::Lanczos3)
        .to_rgba8();

    log::debug!(
        "loaded {}: {}x{} -> preview {}x{}",
        name,
        width,
        height,
        preview_w,
        preview_h
    );

    Ok(LoadedImage {
        name,
        original,
        preview,
        transform,
    })
}

/// Async wrapper used by the UI loop.
pub async fn load(path: PathBuf, max_w: u32, max_h: u32) -> Result<LoadedImage, String> {
    task::spawn_blocking(move || load_blocking(&path, max_w, max_h).map_err(|e| e.to_string()))
        .await
        .map_err(|e| format!("Task join error: {}", e))?
}
