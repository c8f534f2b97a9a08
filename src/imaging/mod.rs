//! Image handling module
//!
//! This module handles:
//! - Fitting originals into the preview bounding box (scale.rs)
//! - Decoding images and producing the resampled preview (load.rs)
//! - Mapping preview selections back to the original and committing
//!   the crop to disk (crop.rs)

pub mod crop;
pub mod load;
pub mod scale;
