//! Decoding color and depth images from disk

use std::path::Path;

use image::RgbaImage;
use imagecloud_core::{Error, RasterImage, Result};

/// Convert a decoded RGBA image into a [`RasterImage`]
pub fn raster_from_rgba(image: RgbaImage) -> Result<RasterImage> {
    let (width, height) = image.dimensions();
    RasterImage::new(width, height, image.into_raw())
}

/// Convert a [`RasterImage`] back into an `image` buffer
pub fn raster_to_rgba(raster: &RasterImage) -> Result<RgbaImage> {
    RgbaImage::from_raw(raster.width(), raster.height(), raster.data().to_vec())
        .ok_or_else(|| Error::InvalidData("RGBA buffer too small for image dimensions".to_string()))
}

/// Load an image file in any supported format as RGBA
///
/// A path that does not exist is reported as [`Error::MissingResource`];
/// undecodable contents as [`Error::InvalidData`].
pub fn load_raster_image<P: AsRef<Path>>(path: P) -> Result<RasterImage> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::MissingResource(format!("Could not find image {}", path.display())));
    }

    let decoded = image::open(path).map_err(|e| match e {
        image::ImageError::IoError(io) => Error::Io(io),
        other => Error::InvalidData(format!("Failed to decode {}: {}", path.display(), other)),
    })?;

    raster_from_rgba(decoded.to_rgba8())
}

/// Load a color image and its depth image
///
/// The pair is returned as loaded; dimension agreement is checked when the
/// point cloud is built.
pub fn load_image_pair<P, Q>(color: P, depth: Q) -> Result<(RasterImage, RasterImage)>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    Ok((load_raster_image(color)?, load_raster_image(depth)?))
}

/// Write a [`RasterImage`] to disk, format chosen from the extension
pub fn save_raster_image<P: AsRef<Path>>(raster: &RasterImage, path: P) -> Result<()> {
    let path = path.as_ref();
    raster_to_rgba(raster)?.save(path).map_err(|e| match e {
        image::ImageError::IoError(io) => Error::Io(io),
        other => Error::InvalidData(format!("Failed to encode {}: {}", path.display(), other)),
    })
}
