//! I/O for image point clouds
//!
//! This crate loads color and depth images from disk into
//! [`imagecloud_core::RasterImage`]s and persists the user-facing
//! visualization parameters in URL query strings.

pub mod image_loader;
pub mod url_params;

pub use image_loader::{load_image_pair, load_raster_image, raster_from_rgba, raster_to_rgba, save_raster_image};
pub use url_params::{VisualizationParameters, QUERY_KEY};
