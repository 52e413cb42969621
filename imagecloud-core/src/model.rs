//! Point cloud model built from a color and depth image pair

use log::debug;

use crate::error::{Error, Result};
use crate::geometry::{check_dimensions, PointGeometry};
use crate::image::RasterImage;
use crate::material::{Material, MaterialParameters};
use crate::parameters::PointCloudParameters;
use crate::point::Point3f;
use crate::threshold::ThresholdPredicate;
use crate::traits::{Drawable, RenderBackend};

struct LiveResources<B: RenderBackend> {
    geometry: PointGeometry,
    geometry_handle: B::Geometry,
    material: Material,
    material_handle: B::Material,
}

enum State<B: RenderBackend> {
    Live(LiveResources<B>),
    Disposed,
}

/// A colored point cloud derived from two equally sized images
///
/// The model owns its geometry and material, both on the host and as
/// backend handles. Rebuilding replaces the geometry wholesale; disposing
/// drops every handle, after which all operations fail with
/// [`Error::Disposed`].
///
/// # Example
/// ```rust
/// use imagecloud_core::{HostBackend, ImagePointCloud, PointCloudParameters, RasterImage};
///
/// fn main() -> imagecloud_core::Result<()> {
///     let color = RasterImage::filled(4, 4, [200, 200, 200, 255]);
///     let depth = RasterImage::filled(4, 4, [128, 128, 128, 255]);
///     let parameters = PointCloudParameters::default();
///     let predicate = parameters.default_predicate();
///
///     let cloud = ImagePointCloud::new(HostBackend::new(), &color, &depth, parameters, &predicate)?;
///     assert_eq!(cloud.len()?, 16);
///     Ok(())
/// }
/// ```
pub struct ImagePointCloud<B: RenderBackend> {
    backend: B,
    parameters: PointCloudParameters,
    dimensions: (u32, u32),
    state: State<B>,
}

impl<B: RenderBackend> ImagePointCloud<B> {
    /// Build a point cloud and upload it to `backend`
    ///
    /// Fails with [`Error::DimensionMismatch`] before touching the backend
    /// when the images differ in size.
    pub fn new<P>(
        mut backend: B,
        color: &RasterImage,
        depth: &RasterImage,
        parameters: PointCloudParameters,
        predicate: &P,
    ) -> Result<Self>
    where
        P: ThresholdPredicate + ?Sized,
    {
        check_dimensions(color, depth)?;
        debug!("Processing {}x{} image data", color.width(), color.height());

        let geometry = PointGeometry::from_images(color, depth, predicate, parameters.depth_scale)?;
        let geometry_handle = backend.upload_geometry(&geometry)?;
        let material = Material::from_parameters(&parameters.material());
        let material_handle = backend.create_material(&material)?;

        Ok(Self {
            backend,
            dimensions: color.dimensions(),
            parameters,
            state: State::Live(LiveResources {
                geometry,
                geometry_handle,
                material,
                material_handle,
            }),
        })
    }

    /// `(width, height)` of the images this cloud was built from
    pub fn dimensions(&self) -> (u32, u32) {
        self.dimensions
    }

    pub fn parameters(&self) -> &PointCloudParameters {
        &self.parameters
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn is_disposed(&self) -> bool {
        matches!(self.state, State::Disposed)
    }

    /// Number of points
    pub fn len(&self) -> Result<usize> {
        Ok(self.live()?.geometry.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.live()?.geometry.is_empty())
    }

    pub fn geometry(&self) -> Result<&PointGeometry> {
        Ok(&self.live()?.geometry)
    }

    pub fn positions(&self) -> Result<&[[f32; 3]]> {
        Ok(self.live()?.geometry.positions())
    }

    pub fn colors(&self) -> Result<&[[f32; 4]]> {
        Ok(self.live()?.geometry.colors())
    }

    pub fn material(&self) -> Result<&Material> {
        Ok(&self.live()?.material)
    }

    /// Backend handle of the current geometry
    pub fn geometry_handle(&self) -> Result<&B::Geometry> {
        Ok(&self.live()?.geometry_handle)
    }

    /// Backend handle of the material
    pub fn material_handle(&self) -> Result<&B::Material> {
        Ok(&self.live()?.material_handle)
    }

    /// Axis-aligned bounds of the current positions
    pub fn bounding_box(&self) -> Result<(Point3f, Point3f)> {
        Ok(self.live()?.geometry.bounding_box())
    }

    /// Rebuild the points from a new image pair
    ///
    /// Both images must match the dimensions the cloud was built with. The
    /// new geometry is uploaded before the old handle is dropped, and a
    /// failed call leaves the current geometry in place.
    pub fn set_image_data<P>(&mut self, color: &RasterImage, depth: &RasterImage, predicate: &P) -> Result<()>
    where
        P: ThresholdPredicate + ?Sized,
    {
        let live = live_mut(&mut self.state)?;
        if color.dimensions() != self.dimensions || depth.dimensions() != self.dimensions {
            return Err(Error::DimensionMismatch {
                color: color.dimensions(),
                depth: depth.dimensions(),
            });
        }

        debug!("Processing {}x{} image data", color.width(), color.height());
        let geometry = PointGeometry::from_images(color, depth, predicate, self.parameters.depth_scale)?;
        let geometry_handle = self.backend.upload_geometry(&geometry)?;

        live.geometry = geometry;
        live.geometry_handle = geometry_handle;
        Ok(())
    }

    /// Rewrite every position with `callback` and re-upload the positions
    ///
    /// The callback receives `x, y, z` and the point index divided by the
    /// point count.
    pub fn iterate_positions<F>(&mut self, callback: F) -> Result<()>
    where
        F: FnMut(f32, f32, f32, f32) -> (f32, f32, f32),
    {
        let live = live_mut(&mut self.state)?;
        live.geometry.iterate_positions(callback);
        self.backend
            .update_positions(&mut live.geometry_handle, live.geometry.positions())
    }

    /// Merge `parameters` into the live material
    pub fn set_material_parameters(&mut self, parameters: &MaterialParameters) -> Result<()> {
        let live = live_mut(&mut self.state)?;
        let mut material = live.material;
        material.set_values(parameters);
        self.backend.update_material(&mut live.material_handle, &material)?;
        live.material = material;
        Ok(())
    }

    /// Release the geometry and material
    ///
    /// Fails with [`Error::Disposed`] when called a second time.
    pub fn dispose(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.state, State::Disposed) {
            State::Live(resources) => {
                debug!("Disposing point cloud with {} points", resources.geometry.len());
                drop(resources);
                Ok(())
            }
            State::Disposed => Err(Error::Disposed),
        }
    }

    fn live(&self) -> Result<&LiveResources<B>> {
        match &self.state {
            State::Live(resources) => Ok(resources),
            State::Disposed => Err(Error::Disposed),
        }
    }
}

fn live_mut<B: RenderBackend>(state: &mut State<B>) -> Result<&mut LiveResources<B>> {
    match state {
        State::Live(resources) => Ok(resources),
        State::Disposed => Err(Error::Disposed),
    }
}

impl<B: RenderBackend> std::fmt::Debug for ImagePointCloud<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut debug = f.debug_struct("ImagePointCloud");
        debug.field("dimensions", &self.dimensions);
        match &self.state {
            State::Live(resources) => debug.field("points", &resources.geometry.len()),
            State::Disposed => debug.field("disposed", &true),
        };
        debug.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HostBackend;
    use crate::threshold::{AcceptAll, ColorDepthThreshold};

    const WHITE: [u8; 4] = [255, 255, 255, 255];
    const BLACK: [u8; 4] = [0, 0, 0, 255];

    fn gradient(width: u32, height: u32) -> RasterImage {
        let pixels: Vec<[u8; 4]> = (0..width * height)
            .map(|i| {
                let v = (i * 255 / (width * height).max(1)) as u8;
                [v, v, v, 255]
            })
            .collect();
        RasterImage::from_pixels(width, height, &pixels).unwrap()
    }

    fn build(backend: &HostBackend, width: u32, height: u32) -> ImagePointCloud<HostBackend> {
        let parameters = PointCloudParameters::default();
        ImagePointCloud::new(
            backend.clone(),
            &gradient(width, height),
            &gradient(width, height),
            parameters,
            &AcceptAll,
        )
        .unwrap()
    }

    #[test]
    fn test_construct_uploads_geometry_and_material() {
        let backend = HostBackend::new();
        let cloud = build(&backend, 3, 2);

        assert_eq!(cloud.len().unwrap(), 6);
        assert_eq!(cloud.dimensions(), (3, 2));
        assert_eq!(backend.live_geometries(), 1);
        assert_eq!(backend.live_materials(), 1);
        assert_eq!(cloud.geometry_handle().unwrap().positions(), cloud.positions().unwrap());
    }

    #[test]
    fn test_construct_mismatch_allocates_nothing() {
        let backend = HostBackend::new();
        let result = ImagePointCloud::new(
            backend.clone(),
            &RasterImage::filled(2, 2, WHITE),
            &RasterImage::filled(2, 3, WHITE),
            PointCloudParameters::default(),
            &AcceptAll,
        );

        assert!(matches!(result, Err(Error::DimensionMismatch { .. })));
        assert_eq!(backend.live_geometries(), 0);
        assert_eq!(backend.live_materials(), 0);
    }

    #[test]
    fn test_material_from_parameters() {
        let parameters = PointCloudParameters {
            point_size: 4.0,
            material_parameters: MaterialParameters::default().with_opacity(0.25),
            ..Default::default()
        };
        let cloud = ImagePointCloud::new(
            HostBackend::new(),
            &RasterImage::filled(1, 1, WHITE),
            &RasterImage::filled(1, 1, WHITE),
            parameters,
            &AcceptAll,
        )
        .unwrap();

        let material = cloud.material().unwrap();
        assert_eq!(material.size, 4.0);
        assert_eq!(material.opacity, 0.25);
        assert!(material.vertex_colors);
    }

    #[test]
    fn test_set_image_data_replaces_geometry() {
        let backend = HostBackend::new();
        let mut cloud = build(&backend, 2, 2);

        let color = RasterImage::from_pixels(2, 2, &[WHITE, BLACK, BLACK, WHITE]).unwrap();
        let depth = RasterImage::filled(2, 2, WHITE);
        cloud
            .set_image_data(&color, &depth, &ColorDepthThreshold::new(0.5, 0.0))
            .unwrap();

        assert_eq!(cloud.len().unwrap(), 2);
        assert_eq!(cloud.positions().unwrap(), &[[-1.0, 1.0, 0.5], [0.0, 0.0, 0.5]]);
        assert_eq!(cloud.geometry_handle().unwrap().positions(), cloud.positions().unwrap());
        assert_eq!(backend.live_geometries(), 1);
    }

    #[test]
    fn test_set_image_data_is_deterministic() {
        let mut cloud = build(&HostBackend::new(), 4, 3);
        let color = gradient(4, 3);
        let depth = RasterImage::filled(4, 3, [90, 120, 150, 255]);
        let predicate = ColorDepthThreshold::new(0.2, 0.1);

        cloud.set_image_data(&color, &depth, &predicate).unwrap();
        let first = cloud.geometry().unwrap().clone();
        cloud.set_image_data(&color, &depth, &predicate).unwrap();

        assert_eq!(cloud.geometry().unwrap(), &first);
    }

    #[test]
    fn test_set_image_data_mismatch_keeps_old_geometry() {
        let backend = HostBackend::new();
        let mut cloud = build(&backend, 2, 2);
        let before = cloud.geometry().unwrap().clone();

        let result = cloud.set_image_data(
            &RasterImage::filled(2, 2, WHITE),
            &RasterImage::filled(3, 2, WHITE),
            &AcceptAll,
        );

        assert!(matches!(result, Err(Error::DimensionMismatch { .. })));
        assert_eq!(cloud.geometry().unwrap(), &before);
        assert_eq!(backend.live_geometries(), 1);
    }

    #[test]
    fn test_set_image_data_rejects_new_size_even_if_pair_matches() {
        let mut cloud = build(&HostBackend::new(), 2, 2);
        let result = cloud.set_image_data(
            &RasterImage::filled(3, 3, WHITE),
            &RasterImage::filled(3, 3, WHITE),
            &AcceptAll,
        );

        match result {
            Err(Error::DimensionMismatch { color, depth }) => {
                assert_eq!(color, (3, 3));
                assert_eq!(depth, (3, 3));
            }
            other => panic!("expected DimensionMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_iterate_positions_reuploads() {
        let backend = HostBackend::new();
        let mut cloud = build(&backend, 2, 2);
        let uploads = backend.uploads();

        cloud.iterate_positions(|x, y, z, _| (x, y, -z)).unwrap();

        assert_eq!(backend.uploads(), uploads + 1);
        assert_eq!(cloud.geometry_handle().unwrap().positions(), cloud.positions().unwrap());
    }

    #[test]
    fn test_set_material_parameters_merges() {
        let mut cloud = build(&HostBackend::new(), 1, 1);
        cloud
            .set_material_parameters(&MaterialParameters::default().with_color([1.0, 0.0, 0.0]))
            .unwrap();

        assert_eq!(cloud.material().unwrap().color, [1.0, 0.0, 0.0]);
        assert_eq!(cloud.material().unwrap().size, PointCloudParameters::default().point_size);
        assert_eq!(cloud.material_handle().unwrap().material(), cloud.material().unwrap());
    }

    #[test]
    fn test_dispose_releases_and_fails_fast() {
        let backend = HostBackend::new();
        let mut cloud = build(&backend, 2, 2);

        cloud.dispose().unwrap();
        assert!(cloud.is_disposed());
        assert_eq!(backend.live_geometries(), 0);
        assert_eq!(backend.live_materials(), 0);

        assert!(matches!(cloud.dispose(), Err(Error::Disposed)));
        assert!(matches!(cloud.len(), Err(Error::Disposed)));
        assert!(matches!(cloud.iterate_positions(|x, y, z, _| (x, y, z)), Err(Error::Disposed)));
        assert!(matches!(
            cloud.set_material_parameters(&MaterialParameters::default()),
            Err(Error::Disposed)
        ));
        assert!(matches!(
            cloud.set_image_data(&gradient(2, 2), &gradient(2, 2), &AcceptAll),
            Err(Error::Disposed)
        ));
    }

    #[test]
    fn test_drop_releases_handles() {
        let backend = HostBackend::new();
        {
            let _cloud = build(&backend, 2, 2);
            assert_eq!(backend.live_geometries(), 1);
        }
        assert_eq!(backend.live_geometries(), 0);
        assert_eq!(backend.live_materials(), 0);
    }
}
