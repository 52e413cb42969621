//! Core traits for imagecloud

use crate::error::Result;
use crate::geometry::PointGeometry;
use crate::material::Material;
use crate::point::Point3f;

/// Trait for drawable/renderable objects
pub trait Drawable {
    /// Get the bounding box of the object
    fn bounding_box(&self) -> (Point3f, Point3f);

    /// Get the center point of the object
    fn center(&self) -> Point3f {
        let (min, max) = self.bounding_box();
        Point3f::new(
            (min.x + max.x) / 2.0,
            (min.y + max.y) / 2.0,
            (min.z + max.z) / 2.0,
        )
    }
}

/// Owner of render-side point buffers and materials
///
/// Handles returned by a backend hold their resources until dropped, so a
/// point cloud releases everything it uploaded by dropping its handles.
pub trait RenderBackend {
    /// Uploaded position and color buffers
    type Geometry;
    /// Uploaded material state
    type Material;

    /// Upload positions and colors into new buffers
    fn upload_geometry(&mut self, geometry: &PointGeometry) -> Result<Self::Geometry>;

    /// Overwrite the position buffer of an uploaded geometry
    ///
    /// `positions` always has the same length as the uploaded geometry.
    fn update_positions(&mut self, handle: &mut Self::Geometry, positions: &[[f32; 3]]) -> Result<()>;

    /// Create a material
    fn create_material(&mut self, material: &Material) -> Result<Self::Material>;

    /// Replace the state of a material
    fn update_material(&mut self, handle: &mut Self::Material, material: &Material) -> Result<()>;
}
