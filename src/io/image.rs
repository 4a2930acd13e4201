//! Target photo decoding and upscaling

use crate::io::error::{MosaicError, Result, invalid_parameter};
use image::RgbImage;
use image::imageops::{self, FilterType};
use std::path::Path;

/// Decode the target photo to truecolor and apply the integer upscale
///
/// The result measures exactly `width * upscale` by `height * upscale` pixels.
///
/// # Errors
///
/// Returns an error if:
/// - `upscale` is zero or the upscaled size overflows
/// - The file cannot be opened or decoded
pub fn load_target(path: &Path, upscale: u32) -> Result<RgbImage> {
    if upscale == 0 {
        return Err(invalid_parameter("upscale", &upscale, &"must be at least 1"));
    }

    let decoded = image::open(path)
        .map_err(|source| MosaicError::TargetDecode {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgb8();

    upscale_image(decoded, upscale)
}

/// Scale `image` by an integer factor in both dimensions
///
/// # Errors
///
/// Returns an error if `factor` is zero or the scaled size overflows
pub fn upscale_image(image: RgbImage, factor: u32) -> Result<RgbImage> {
    if factor == 0 {
        return Err(invalid_parameter("upscale", &factor, &"must be at least 1"));
    }
    if factor == 1 {
        return Ok(image);
    }

    let overflow = || invalid_parameter("upscale", &factor, &"upscaled size overflows");
    let width = image.width().checked_mul(factor).ok_or_else(overflow)?;
    let height = image.height().checked_mul(factor).ok_or_else(overflow)?;
    log::debug!(
        "Upscaling target {}x{} to {width}x{height}",
        image.width(),
        image.height()
    );

    Ok(imageops::resize(&image, width, height, FilterType::CatmullRom))
}
