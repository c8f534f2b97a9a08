//! Display scaling between the original image and its on-screen preview.
//!
//! One uniform factor `min(max_w/w, max_h/h)` is applied to both axes, so
//! the preview always fits the bounding box and keeps the aspect ratio. The
//! same factor is inverted when mapping a user-drawn rectangle back into
//! original-image pixels; because the forward scale is uniform, the inverse
//! is exactly `1/scale` on both axes.

/// Uniform preview scale retained for inverse mapping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayTransform {
    scale: f64,
}

impl DisplayTransform {
    /// Compute the scale that fits `(width, height)` into `(max_w, max_h)`.
    ///
    /// Images smaller than the box are scaled up to fill it, exactly like
    /// the preview behaviour the tools started with.
    pub fn fit(width: u32, height: u32, max_w: u32, max_h: u32) -> Self {
        debug_assert!(width > 0 && height > 0, "decoded images have no zero axis");

        let scale = f64::min(
            max_w as f64 / width as f64,
            max_h as f64 / height as f64,
        );

        DisplayTransform { scale }
    }

    /// The forward (original -> preview) scale factor
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Preview dimensions for an original of `(width, height)`.
    ///
    /// Truncating like the original implementation did; a degenerate axis is
    /// clamped to one pixel so very thin images stay visible.
    pub fn preview_size(&self, width: u32, height: u32) -> (u32, u32) {
        let w = (width as f64 * self.scale) as u32;
        let h = (height as f64 * self.scale) as u32;
        (w.max(1), h.max(1))
    }

    /// Map one preview-space point into original-image pixels.
    pub fn to_original(&self, x: f32, y: f32) -> (u32, u32) {
        let x = (x.max(0.0) as f64 / self.scale) as u32;
        let y = (y.max(0.0) as f64 / self.scale) as u32;
        (x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_fits_bounding_box() {
        let cases = [
            (4000u32, 3000u32),
            (3000, 4000),
            (600, 600),
            (123, 4567),
            (50, 40),
            (1, 1),
        ];

        for (w, h) in cases {
            let transform = DisplayTransform::fit(w, h, 600, 600);
            let (pw, ph) = transform.preview_size(w, h);

            assert!(pw <= 600, "{w}x{h}: preview width {pw} over bound");
            assert!(ph <= 600, "{w}x{h}: preview height {ph} over bound");

            // Aspect ratio preserved within rounding
            let original_ratio = w as f64 / h as f64;
            let preview_ratio = pw as f64 / ph as f64;
            assert!(
                (original_ratio - preview_ratio).abs() / original_ratio < 0.05,
                "{w}x{h}: ratio drifted from {original_ratio} to {preview_ratio}"
            );
        }
    }

    #[test]
    fn test_small_images_are_scaled_up() {
        let transform = DisplayTransform::fit(100, 50, 600, 600);
        assert!(transform.scale() > 1.0);
        assert_eq!(transform.preview_size(100, 50), (600, 300));
    }

    #[test]
    fn test_round_trip_within_one_pixel() {
        let transform = DisplayTransform::fit(4032, 3024, 600, 600);
        let scale = transform.scale();

        for (ox, oy) in [(0u32, 0u32), (100, 250), (2016, 1512), (4031, 3023)] {
            // Original -> preview -> original
            let px = ox as f64 * scale;
            let py = oy as f64 * scale;
            let (rx, ry) = transform.to_original(px as f32, py as f32);

            assert!(
                (rx as i64 - ox as i64).abs() <= 1,
                "x: {ox} -> {px} -> {rx}"
            );
            assert!(
                (ry as i64 - oy as i64).abs() <= 1,
                "y: {oy} -> {py} -> {ry}"
            );
        }
    }

    #[test]
    fn test_negative_preview_coordinates_clamp_to_zero() {
        let transform = DisplayTransform::fit(1000, 1000, 500, 500);
        assert_eq!(transform.to_original(-3.0, -0.1), (0, 0));
    }
}
