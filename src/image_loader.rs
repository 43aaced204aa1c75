//! Image loading into pixel regions
//!
//! Decodes an image file with the `image` crate, optionally crops it to the
//! garment, and shrinks it to a working thumbnail before handing the pixels
//! to the extractor.
//!
//! ## Supported Formats
//!
//! JPEG, PNG, WebP, GIF (first frame), BMP, TIFF

use std::path::Path;

use image::{DynamicImage, GenericImageView, ImageReader};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::PixelRegion;
use crate::error::{Result, SeasonError};

/// Crop rectangle in pixel coordinates, `right` and `bottom` exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropBox {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CropBox {
    pub fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Clamp to an image of the given size, rejecting empty results
    fn clamped(self, width: u32, height: u32) -> Result<Self> {
        let clamped = Self {
            left: self.left.min(width),
            top: self.top.min(height),
            right: self.right.min(width),
            bottom: self.bottom.min(height),
        };
        if clamped.right <= clamped.left || clamped.bottom <= clamped.top {
            return Err(SeasonError::invalid_parameter(
                "crop",
                format!("{:?} is empty inside a {}x{} image", self, width, height),
            ));
        }
        Ok(clamped)
    }
}

/// Load an image from disk into a pixel region
///
/// # Arguments
///
/// * `path` - Path to the image file
/// * `crop` - Optional garment rectangle, applied before shrinking
/// * `thumbnail_size` - Longest side allowed after shrinking
///
/// # Errors
///
/// Returns `SeasonError::ImageLoad` if the file cannot be opened or decoded,
/// and `SeasonError::InvalidParameter` if the crop is empty.
///
/// # Example
///
/// ```rust,no_run
/// use season_colors::image_loader::{load_region, CropBox};
/// use std::path::Path;
///
/// let region = load_region(Path::new("dress.jpg"), Some(CropBox::new(40, 60, 400, 700)), 300)?;
/// println!("Loaded region: {}x{}", region.width(), region.height());
/// # Ok::<(), season_colors::SeasonError>(())
/// ```
pub fn load_region(path: &Path, crop: Option<CropBox>, thumbnail_size: u32) -> Result<PixelRegion> {
    let reader = ImageReader::open(path)
        .map_err(|e| SeasonError::image_load(format!("Failed to open image file: {}", path.display()), e))?
        .with_guessed_format()
        .map_err(|e| SeasonError::image_load(format!("Failed to read image file: {}", path.display()), e))?;

    let img = reader
        .decode()
        .map_err(|e| SeasonError::image_load(format!("Failed to decode image: {}", path.display()), e))?;

    region_from_image(&img, crop, thumbnail_size)
}

/// Crop and shrink an already decoded image into a pixel region
pub fn region_from_image(
    img: &DynamicImage,
    crop: Option<CropBox>,
    thumbnail_size: u32,
) -> Result<PixelRegion> {
    if thumbnail_size == 0 {
        return Err(SeasonError::invalid_parameter("thumbnail_size", 0));
    }

    let (width, height) = img.dimensions();
    let mut working = match crop {
        Some(crop) => {
            let c = crop.clamped(width, height)?;
            img.crop_imm(c.left, c.top, c.right - c.left, c.bottom - c.top)
        }
        None => img.clone(),
    };

    // Only ever shrink
    if working.width() > thumbnail_size || working.height() > thumbnail_size {
        working = working.thumbnail(thumbnail_size, thumbnail_size);
    }

    let rgb = working.to_rgb8();
    let (w, h) = rgb.dimensions();
    debug!(
        source_width = width,
        source_height = height,
        width = w,
        height = h,
        "prepared pixel region"
    );
    PixelRegion::from_raw_rgb(w, h, rgb.as_raw())
}

/// Get list of all supported file extensions
pub fn supported_extensions() -> &'static [&'static str] {
    &["jpg", "jpeg", "png", "webp", "gif", "bmp", "tiff", "tif"]
}

/// Check if a file extension is supported
pub fn is_supported_extension(ext: &str) -> bool {
    let ext_lower = ext.to_lowercase();
    supported_extensions().contains(&ext_lower.as_str())
}

/// Check a path's extension against the supported list
pub fn is_supported_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(is_supported_extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use image::{Rgb as ImageRgb, RgbImage};

    fn two_tone(width: u32, height: u32) -> DynamicImage {
        // Left half red, right half blue
        let img = RgbImage::from_fn(width, height, |x, _| {
            if x < width / 2 {
                ImageRgb([200, 10, 10])
            } else {
                ImageRgb([10, 10, 200])
            }
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported_extension("jpg"));
        assert!(is_supported_extension("JPEG"));
        assert!(is_supported_extension("webp"));
        assert!(!is_supported_extension("heic"));
        assert!(is_supported_path(Path::new("shirt.PNG")));
        assert!(!is_supported_path(Path::new("notes.txt")));
        assert!(!is_supported_path(Path::new("no_extension")));
    }

    #[test]
    fn test_crop_selects_half() {
        let img = two_tone(20, 10);
        let region = region_from_image(&img, Some(CropBox::new(0, 0, 10, 10)), 300).unwrap();
        assert_eq!((region.width(), region.height()), (10, 10));
        assert!(region.pixels().iter().all(|&p| p == Rgb::new(200, 10, 10)));
    }

    #[test]
    fn test_crop_is_clamped() {
        let img = two_tone(20, 10);
        let region = region_from_image(&img, Some(CropBox::new(15, 5, 500, 500)), 300).unwrap();
        assert_eq!((region.width(), region.height()), (5, 5));
    }

    #[test]
    fn test_empty_crop_rejected() {
        let img = two_tone(20, 10);
        let err = region_from_image(&img, Some(CropBox::new(30, 0, 40, 10)), 300).unwrap_err();
        assert!(matches!(err, SeasonError::InvalidParameter { .. }));
    }

    #[test]
    fn test_thumbnail_shrinks_only() {
        let img = two_tone(600, 300);
        let region = region_from_image(&img, None, 300).unwrap();
        assert_eq!(region.width(), 300);
        assert_eq!(region.height(), 150);

        let small = two_tone(40, 20);
        let region = region_from_image(&small, None, 300).unwrap();
        assert_eq!((region.width(), region.height()), (40, 20));
    }

    #[test]
    fn test_load_region_from_png() {
        let path = std::env::temp_dir().join(format!("season_colors_loader_{}.png", std::process::id()));
        RgbImage::from_pixel(8, 6, ImageRgb([0x8a, 0xa3, 0xb5]))
            .save(&path)
            .unwrap();

        let region = load_region(&path, None, 300);
        std::fs::remove_file(&path).ok();

        let region = region.unwrap();
        assert_eq!(region.len(), 48);
        assert!(region.pixels().iter().all(|&p| p == Rgb::new(0x8a, 0xa3, 0xb5)));
    }

    #[test]
    fn test_missing_file() {
        let err = load_region(Path::new("nonexistent_file.jpg"), None, 300).unwrap_err();
        assert!(matches!(err, SeasonError::ImageLoad { .. }));
    }
}
