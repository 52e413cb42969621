//! Core data structures for imagecloud
//!
//! This crate turns an aligned color and depth image pair into a colored 3D
//! point cloud: raster images, threshold predicates, point geometry,
//! materials, the render backend seam and the [`ImagePointCloud`] model.

pub mod error;
pub mod frame;
pub mod geometry;
pub mod host;
pub mod image;
pub mod material;
pub mod model;
pub mod parameters;
pub mod point;
pub mod threshold;
pub mod traits;

pub use error::*;
pub use frame::FrameHooks;
pub use geometry::{check_dimensions, PointGeometry};
pub use host::{HostBackend, HostGeometry, HostMaterial};
pub use image::{filter_stepped, mean, RasterImage};
pub use material::{Material, MaterialParameters};
pub use model::ImagePointCloud;
pub use parameters::PointCloudParameters;
pub use point::*;
pub use threshold::*;
pub use traits::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::Point3;
