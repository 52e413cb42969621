//! # imagecloud
//!
//! Colored 3D point clouds from aligned color and depth images.
//!
//! This is the umbrella crate that provides convenient access to all imagecloud functionality.
//! You can use this crate to get everything in one place, or use individual crates for
//! more granular control over dependencies.
//!
//! ## Features
//!
//! - **Core**: Raster images, threshold predicates, point geometry and the `ImagePointCloud` model
//! - **GPU**: wgpu render backend
//! - **I/O**: Image loading and URL parameter persistence
//!
//! ## Quick Start
//!
//! ```rust
//! use imagecloud::prelude::*;
//!
//! let color = RasterImage::filled(8, 8, [220, 200, 180, 255]);
//! let depth = RasterImage::filled(8, 8, [100, 100, 100, 255]);
//! let parameters = PointCloudParameters::default();
//! let predicate = parameters.default_predicate();
//!
//! let mut cloud = ImagePointCloud::new(HostBackend::new(), &color, &depth, parameters, &predicate).unwrap();
//! cloud.iterate_positions(|x, y, z, _| (x, y, -z)).unwrap();
//! ```
//!
//! ## Feature Flags
//!
//! - `default`: Enables core and io
//! - `gpu`: wgpu render backend
//! - `io`: Image loading and parameter persistence
//! - `all`: Enables all features

// Re-export core functionality
pub use imagecloud_core::*;

// Re-export sub-crates
#[cfg(feature = "gpu")]
pub use imagecloud_gpu as gpu;

#[cfg(feature = "io")]
pub use imagecloud_io as io;

/// Convenient imports for common use cases
pub mod prelude {
    pub use imagecloud_core::*;

    #[cfg(feature = "gpu")]
    pub use imagecloud_gpu::*;

    #[cfg(feature = "io")]
    pub use imagecloud_io::*;
}
