//! Crop selection mapping and the crop commit.
//!
//! The user drags a rectangle in preview space; the two corners are mapped
//! through the inverse display scale, normalized so x1 < x2 and y1 < y2, and
//! rejected when either axis comes out under five original-image pixels.
//! A successful commit crops the full-resolution original and saves it back
//! into the folder under a sanitized filename (spaces become underscores).
//! When sanitizing changed the name, the commit removes the file under the
//! old name afterwards, so the save behaves like an explicit rename instead
//! of leaving an orphan behind.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::task;

use crate::error::ToolError;
use crate::imaging::load::LoadedImage;
use crate::imaging::scale::DisplayTransform;

/// Minimum crop size on either axis, in original-image pixels
pub const MIN_CROP_PX: u32 = 5;

/// Two drag corners in preview-canvas coordinates, in drag order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionRect {
    pub start: (f32, f32),
    pub end: (f32, f32),
}

impl SelectionRect {
    pub fn new(start_x: f32, start_y: f32) -> Self {
        SelectionRect {
            start: (start_x, start_y),
            end: (start_x, start_y),
        }
    }

    /// Normalized preview-space rectangle as (x, y, width, height),
    /// used by the canvas overlay while dragging.
    pub fn normalized(&self) -> (f32, f32, f32, f32) {
        let x = self.start.0.min(self.end.0);
        let y = self.start.1.min(self.end.1);
        let w = (self.end.0 - self.start.0).abs();
        let h = (self.end.1 - self.start.1).abs();
        (x, y, w, h)
    }
}

/// Crop rectangle in original-image pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    /// Clamp the region to the image bounds.
    ///
    /// Rounding during inverse mapping can push the far edge one pixel past
    /// the original; the crop itself must stay inside it.
    pub fn clamped(self, image_w: u32, image_h: u32) -> CropRegion {
        let x = self.x.min(image_w.saturating_sub(1));
        let y = self.y.min(image_h.saturating_sub(1));
        CropRegion {
            x,
            y,
            width: self.width.min(image_w - x),
            height: self.height.min(image_h - y),
        }
    }
}

/// Map a finished selection into original-image pixels.
///
/// `None` means the user never dragged a rectangle. Rejections leave the
/// session exactly where it was; the caller only advances on `Ok`.
pub fn resolve_selection(
    selection: Option<SelectionRect>,
    transform: &DisplayTransform,
) -> Result<CropRegion, ToolError> {
    let selection = selection.ok_or(ToolError::NoSelection)?;

    let (x1, y1) = transform.to_original(selection.start.0, selection.start.1);
    let (x2, y2) = transform.to_original(selection.end.0, selection.end.1);

    // Ensure proper cropping bounds
    let (x1, x2) = (x1.min(x2), x1.max(x2));
    let (y1, y2) = (y1.min(y2), y1.max(y2));

    let width = x2 - x1;
    let height = y2 - y1;

    if width < MIN_CROP_PX || height < MIN_CROP_PX {
        return Err(ToolError::SelectionTooSmall { width, height });
    }

    Ok(CropRegion {
        x: x1,
        y: y1,
        width,
        height,
    })
}

/// Replace spaces so the saved filename is shell-friendly
pub fn sanitize_file_name(name: &str) -> String {
    name.replace(' ', "_")
}

/// What a successful crop commit did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CropOutcome {
    /// Where the cropped image was written
    pub saved_path: PathBuf,
    /// True when sanitizing changed the filename (old file was removed)
    pub renamed: bool,
}

/// Crop the original and save it back into the folder, blocking.
pub fn commit_blocking(
    folder: &Path,
    image: &LoadedImage,
    region: CropRegion,
) -> Result<CropOutcome, ToolError> {
    let region = region.clamped(image.original.width(), image.original.height());

    let cropped = image
        .original
        .crop_imm(region.x, region.y, region.width, region.height);

    let sanitized = sanitize_file_name(&image.name);
    let saved_path = folder.join(&sanitized);

    cropped.save(&saved_path).map_err(|e| ToolError::SaveImage {
        path: saved_path.clone(),
        source: e,
    })?;

    let renamed = sanitized != image.name;
    if renamed {
        // Explicit rename semantics: the un-sanitized original must not
        // linger next to the new file.
        let old_path = folder.join(&image.name);
        if let Err(e) = std::fs::remove_file(&old_path) {
            log::warn!("could not remove {}: {}", old_path.display(), e);
        }
    }

    log::info!(
        "cropped {} to {}x{} at ({}, {}) -> {}",
        image.name,
        region.width,
        region.height,
        region.x,
        region.y,
        saved_path.display()
    );

    Ok(CropOutcome {
        saved_path,
        renamed,
    })
}

/// Async wrapper used by the UI loop.
pub async fn commit(
    folder: PathBuf,
    image: Arc<LoadedImage>,
    region: CropRegion,
) -> Result<CropOutcome, String> {
    task::spawn_blocking(move || {
        commit_blocking(&folder, &image, region).map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| format!("Task join error: {}", e))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::load::load_blocking;
    use image::RgbImage;
    use std::fs;

    fn temp_folder(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("imgprep-crop-{}-{}", tag, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_selection_is_normalized() {
        // 1:1 transform keeps the numbers easy to follow
        let transform = DisplayTransform::fit(600, 600, 600, 600);

        let selection = SelectionRect {
            start: (200.0, 150.0),
            end: (50.0, 300.0),
        };

        let region = resolve_selection(Some(selection), &transform).unwrap();
        assert_eq!(
            region,
            CropRegion {
                x: 50,
                y: 150,
                width: 150,
                height: 150
            }
        );
    }

    #[test]
    fn test_no_selection_is_rejected() {
        let transform = DisplayTransform::fit(600, 600, 600, 600);
        assert!(matches!(
            resolve_selection(None, &transform),
            Err(ToolError::NoSelection)
        ));
    }

    #[test]
    fn test_too_small_selection_is_rejected() {
        let transform = DisplayTransform::fit(600, 600, 600, 600);

        // 4px wide in original space: under the 5px minimum
        let selection = SelectionRect {
            start: (10.0, 10.0),
            end: (14.0, 100.0),
        };
        assert!(matches!(
            resolve_selection(Some(selection), &transform),
            Err(ToolError::SelectionTooSmall { width: 4, .. })
        ));

        // Degenerate click without a drag
        let click = SelectionRect::new(10.0, 10.0);
        assert!(matches!(
            resolve_selection(Some(click), &transform),
            Err(ToolError::SelectionTooSmall { .. })
        ));
    }

    #[test]
    fn test_minimum_is_in_original_pixels_not_preview() {
        // 3000px original shown at 600px: preview pixels are worth 5 originals
        let transform = DisplayTransform::fit(3000, 3000, 600, 600);

        // 2 preview px -> 10 original px: small on screen but acceptable
        let selection = SelectionRect {
            start: (100.0, 100.0),
            end: (102.0, 102.0),
        };
        let region = resolve_selection(Some(selection), &transform).unwrap();
        assert!(region.width >= MIN_CROP_PX);
        assert!(region.height >= MIN_CROP_PX);
    }

    #[test]
    fn test_region_clamped_to_image() {
        let region = CropRegion {
            x: 90,
            y: 10,
            width: 30,
            height: 30,
        };
        let clamped = region.clamped(100, 100);
        assert_eq!(clamped.x, 90);
        assert_eq!(clamped.width, 10);
        assert_eq!(clamped.height, 30);
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("my photo 1.jpg"), "my_photo_1.jpg");
        assert_eq!(sanitize_file_name("clean.png"), "clean.png");
    }

    #[test]
    fn test_commit_overwrites_in_place() {
        let dir = temp_folder("commit");
        let path = dir.join("img.png");
        RgbImage::from_pixel(200, 100, image::Rgb([1, 2, 3]))
            .save(&path)
            .unwrap();

        let loaded = load_blocking(&path, 600, 600).unwrap();
        let region = CropRegion {
            x: 10,
            y: 20,
            width: 50,
            height: 40,
        };

        let outcome = commit_blocking(&dir, &loaded, region).unwrap();
        assert_eq!(outcome.saved_path, path);
        assert!(!outcome.renamed);

        let saved = image::open(&path).unwrap();
        assert_eq!((saved.width(), saved.height()), (50, 40));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_commit_renames_files_with_spaces() {
        let dir = temp_folder("rename");
        let path = dir.join("my photo.png");
        RgbImage::from_pixel(100, 100, image::Rgb([9, 9, 9]))
            .save(&path)
            .unwrap();

        let loaded = load_blocking(&path, 600, 600).unwrap();
        let region = CropRegion {
            x: 0,
            y: 0,
            width: 20,
            height: 20,
        };

        let outcome = commit_blocking(&dir, &loaded, region).unwrap();
        assert!(outcome.renamed);
        assert_eq!(outcome.saved_path, dir.join("my_photo.png"));
        assert!(outcome.saved_path.exists());
        // No orphan under the old name
        assert!(!path.exists());

        fs::remove_dir_all(&dir).unwrap();
    }
}
