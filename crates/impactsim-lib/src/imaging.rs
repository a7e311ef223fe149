//! Image normalisation for the edit workflow.
//!
//! The generative provider only accepts PNG images with an alpha channel, and
//! the mask must match the source image's dimensions. Transparent mask pixels
//! mark the region the provider may repaint.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

use crate::error::{Error, Result};

/// Fraction of the shorter image side used as the radius of the generated mask.
pub const MASK_RADIUS_FRACTION: f64 = 0.25;

/// PNG-encoded RGBA image plus its dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct RgbaPng {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Source image and mask ready for upload to the generative provider.
#[derive(Debug, Clone, PartialEq)]
pub struct EditInputs {
    pub image: RgbaPng,
    pub mask: RgbaPng,
}

/// Normalise `source` and build its mask on the blocking pool.
///
/// Decoding and re-encoding a full-size satellite image takes seconds, so it
/// must not run on a runtime worker.
pub async fn prepare_edit_inputs(
    source: Vec<u8>,
    mask_path: Option<PathBuf>,
) -> Result<EditInputs> {
    tokio::task::spawn_blocking(move || edit_inputs_blocking(&source, mask_path.as_deref()))
        .await
        .map_err(|e| Error::Task(e.to_string()))?
}

/// Synchronous half of [`prepare_edit_inputs`] (runs in spawn_blocking).
fn edit_inputs_blocking(source: &[u8], mask_path: Option<&Path>) -> Result<EditInputs> {
    let image = to_rgba_png(source)?;
    let mask = load_mask(mask_path, image.width, image.height)?;
    Ok(EditInputs { image, mask })
}

/// Decode `bytes`, add an alpha channel if missing, and re-encode as PNG.
pub fn to_rgba_png(bytes: &[u8]) -> Result<RgbaPng> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    encode(rgba)
}

/// Opaque mask with a transparent disc in the centre.
pub fn synthesize_mask(width: u32, height: u32) -> Result<RgbaPng> {
    let radius = f64::from(width.min(height)) * MASK_RADIUS_FRACTION;
    let (cx, cy) = (f64::from(width) / 2.0, f64::from(height) / 2.0);

    let mask = RgbaImage::from_fn(width, height, |x, y| {
        let dx = f64::from(x) + 0.5 - cx;
        let dy = f64::from(y) + 0.5 - cy;
        if dx * dx + dy * dy <= radius * radius {
            Rgba([0, 0, 0, 0])
        } else {
            Rgba([0, 0, 0, 255])
        }
    });

    encode(mask)
}

/// Load the mask asset at `path`, or synthesize one when no asset is
/// configured. The result always matches `width` x `height`.
pub fn load_mask(path: Option<&Path>, width: u32, height: u32) -> Result<RgbaPng> {
    let Some(path) = path else {
        return synthesize_mask(width, height);
    };

    let mut mask = image::open(path)?.to_rgba8();
    if mask.dimensions() != (width, height) {
        mask = imageops::resize(&mask, width, height, FilterType::Nearest);
    }
    encode(mask)
}

fn encode(image: RgbaImage) -> Result<RgbaPng> {
    let (width, height) = image.dimensions();
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(image).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;

    Ok(RgbaPng {
        bytes,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb, RgbImage};

    fn rgb_png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([30, 90, 40]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn rgb_input_gains_alpha_channel() {
        let png = to_rgba_png(&rgb_png(8, 4)).unwrap();
        assert_eq!((png.width, png.height), (8, 4));

        let decoded = image::load_from_memory(&png.bytes).unwrap();
        assert!(decoded.color().has_alpha());
        assert_eq!(decoded.get_pixel(0, 0), Rgba([30, 90, 40, 255]));
    }

    #[test]
    fn garbage_bytes_are_an_image_error() {
        let err = to_rgba_png(b"definitely not an image").unwrap_err();
        assert!(matches!(err, crate::Error::Image(_)));
    }

    #[test]
    fn synthesized_mask_is_transparent_in_the_centre_only() {
        let png = synthesize_mask(40, 20).unwrap();
        let mask = image::load_from_memory(&png.bytes).unwrap().to_rgba8();

        assert_eq!(mask.dimensions(), (40, 20));
        assert_eq!(mask.get_pixel(20, 10)[3], 0);
        assert_eq!(mask.get_pixel(0, 0)[3], 255);
        assert_eq!(mask.get_pixel(39, 19)[3], 255);
    }

    #[test]
    fn mask_asset_is_resized_to_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mask.png");
        std::fs::write(&path, rgb_png(10, 10)).unwrap();

        let png = load_mask(Some(&path), 32, 16).unwrap();
        assert_eq!((png.width, png.height), (32, 16));
    }

    #[test]
    fn missing_mask_asset_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_mask(Some(&dir.path().join("absent.png")), 4, 4).is_err());
    }

    #[tokio::test]
    async fn edit_inputs_share_dimensions() {
        let inputs = prepare_edit_inputs(rgb_png(12, 6), None).await.unwrap();
        assert_eq!((inputs.image.width, inputs.image.height), (12, 6));
        assert_eq!((inputs.mask.width, inputs.mask.height), (12, 6));
    }

    #[tokio::test]
    async fn edit_inputs_propagate_decode_errors() {
        let err = prepare_edit_inputs(b"not a png".to_vec(), None).await.unwrap_err();
        assert!(matches!(err, Error::Image(_)));
    }
}
