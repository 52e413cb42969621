//! # ImageCloud GPU
//!
//! wgpu render backend for image point clouds.
//!
//! Point positions and colors are uploaded into vertex buffers and the point
//! material into a uniform buffer. Every buffer is owned by a handle that
//! destroys it on drop, so disposing an [`imagecloud_core::ImagePointCloud`]
//! releases its GPU memory.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use imagecloud_core::{ImagePointCloud, PointCloudParameters, RasterImage};
//! use imagecloud_gpu::{GpuContext, WgpuBackend};
//!
//! async fn example() -> imagecloud_core::Result<()> {
//!     let gpu_context = GpuContext::new().await?;
//!
//!     let color = RasterImage::filled(64, 48, [200, 180, 160, 255]);
//!     let depth = RasterImage::filled(64, 48, [128, 128, 128, 255]);
//!     let parameters = PointCloudParameters::default();
//!     let predicate = parameters.default_predicate();
//!
//!     let mut cloud = ImagePointCloud::new(WgpuBackend::new(&gpu_context), &color, &depth, parameters, &predicate)?;
//!     cloud.dispose()?;
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod device;

pub use backend::{GpuGeometry, GpuMaterial, MaterialUniform, WgpuBackend};
pub use device::GpuContext;
