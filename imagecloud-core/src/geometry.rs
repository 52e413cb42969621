//! Point geometry built from a color/depth image pair

use crate::error::{Error, Result};
use crate::image::RasterImage;
use crate::parameters::effective_depth_scale;
use crate::point::{ColoredPoint, Point3f};
use crate::threshold::{normalized_color, normalized_depth, ThresholdPredicate};
use crate::traits::Drawable;
use serde::{Deserialize, Serialize};

/// Index-aligned point positions and RGBA colors
///
/// `positions[i]` and `colors[i]` describe the same point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointGeometry {
    positions: Vec<[f32; 3]>,
    colors: Vec<[f32; 4]>,
}

impl PointGeometry {
    /// Create an empty geometry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty geometry with room for `capacity` points
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
            colors: Vec::with_capacity(capacity),
        }
    }

    /// Build geometry from parallel position and color arrays
    pub fn from_parts(positions: Vec<[f32; 3]>, colors: Vec<[f32; 4]>) -> Result<Self> {
        if positions.len() != colors.len() {
            return Err(Error::InvalidData(format!(
                "{} positions but {} colors",
                positions.len(),
                colors.len()
            )));
        }
        Ok(Self { positions, colors })
    }

    /// Convert a color/depth image pair into points
    ///
    /// Pixels are visited in row-major order. Each pixel the predicate
    /// accepts becomes one point: `x` and `y` span `[-1, 1)` with image row 0
    /// at the top, `z` is the centered depth times `depth_scale` (0 is
    /// treated as 1), and the color is the RGBA sample scaled to `[0, 1]`.
    pub fn from_images<P>(
        color: &RasterImage,
        depth: &RasterImage,
        predicate: &P,
        depth_scale: f32,
    ) -> Result<Self>
    where
        P: ThresholdPredicate + ?Sized,
    {
        check_dimensions(color, depth)?;

        let (width, height) = color.dimensions();
        let depth_scale = effective_depth_scale(depth_scale);
        let mut geometry = Self::new();

        for (index, (color_pixel, depth_pixel)) in color.pixels().zip(depth.pixels()).enumerate() {
            let color_value = normalized_color(color_pixel);
            let depth_value = normalized_depth(depth_pixel);
            if !predicate.accept(&color_value, depth_value) {
                continue;
            }

            let x = (index % width as usize) as u32;
            let y = (index / width as usize) as u32;
            geometry.push(
                [
                    (x as f32 / width as f32) * 2.0 - 1.0,
                    ((height - y) as f32 / height as f32) * 2.0 - 1.0,
                    depth_value * depth_scale,
                ],
                color_value,
            );
        }

        Ok(geometry)
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Append one point
    pub fn push(&mut self, position: [f32; 3], color: [f32; 4]) {
        self.positions.push(position);
        self.colors.push(color);
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn positions_mut(&mut self) -> &mut [[f32; 3]] {
        &mut self.positions
    }

    pub fn colors(&self) -> &[[f32; 4]] {
        &self.colors
    }

    /// Position buffer as raw bytes, 12 bytes per point
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Color buffer as raw bytes, 16 bytes per point
    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }

    /// Iterate over points with their colors
    pub fn iter(&self) -> impl Iterator<Item = ColoredPoint> + '_ {
        self.positions
            .iter()
            .zip(&self.colors)
            .map(|(position, color)| ColoredPoint::new(*position, *color))
    }

    /// Rewrite every position in storage order
    ///
    /// The callback receives `x, y, z` and the point index divided by the
    /// point count, and returns the new `x, y, z`.
    pub fn iterate_positions<F>(&mut self, mut callback: F)
    where
        F: FnMut(f32, f32, f32, f32) -> (f32, f32, f32),
    {
        let count = self.positions.len() as f32;
        for (index, position) in self.positions.iter_mut().enumerate() {
            let [x, y, z] = *position;
            let (x, y, z) = callback(x, y, z, index as f32 / count);
            *position = [x, y, z];
        }
    }
}

impl Drawable for PointGeometry {
    fn bounding_box(&self) -> (Point3f, Point3f) {
        let Some(first) = self.positions.first() else {
            return (Point3f::origin(), Point3f::origin());
        };

        let mut min = Point3f::from(*first);
        let mut max = min;

        for p in &self.positions {
            min.x = min.x.min(p[0]);
            min.y = min.y.min(p[1]);
            min.z = min.z.min(p[2]);

            max.x = max.x.max(p[0]);
            max.y = max.y.max(p[1]);
            max.z = max.z.max(p[2]);
        }

        (min, max)
    }
}

impl FromIterator<ColoredPoint> for PointGeometry {
    fn from_iter<I: IntoIterator<Item = ColoredPoint>>(iter: I) -> Self {
        let mut geometry = Self::new();
        for point in iter {
            geometry.push(point.position.coords.into(), point.color);
        }
        geometry
    }
}

/// Fail with [`Error::DimensionMismatch`] unless both images share a size
pub fn check_dimensions(color: &RasterImage, depth: &RasterImage) -> Result<()> {
    if color.dimensions() != depth.dimensions() {
        return Err(Error::DimensionMismatch {
            color: color.dimensions(),
            depth: depth.dimensions(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::threshold::{AcceptAll, ColorDepthThreshold};
    use approx::assert_relative_eq;

    const WHITE: [u8; 4] = [255, 255, 255, 255];
    const BLACK: [u8; 4] = [0, 0, 0, 255];

    fn reject_all(_: &[f32; 4], _: f32) -> bool {
        false
    }

    #[test]
    fn test_single_pixel_matches_formulas() {
        let color = RasterImage::from_pixels(1, 1, &[[51, 102, 153, 204]]).unwrap();
        let depth = RasterImage::from_pixels(1, 1, &[[204, 204, 204, 255]]).unwrap();

        let geometry = PointGeometry::from_images(&color, &depth, &AcceptAll, 2.0).unwrap();

        assert_eq!(geometry.len(), 1);
        let [x, y, z] = geometry.positions()[0];
        assert_relative_eq!(x, -1.0);
        assert_relative_eq!(y, 1.0);
        assert_relative_eq!(z, (0.8 - 0.5) * 2.0, epsilon = 1e-6);

        let [r, g, b, a] = geometry.colors()[0];
        assert_relative_eq!(r, 0.2, epsilon = 1e-6);
        assert_relative_eq!(g, 0.4, epsilon = 1e-6);
        assert_relative_eq!(b, 0.6, epsilon = 1e-6);
        assert_relative_eq!(a, 0.8, epsilon = 1e-6);
    }

    #[test]
    fn test_single_pixel_rejected_gives_empty_geometry() {
        let color = RasterImage::filled(1, 1, BLACK);
        let depth = RasterImage::filled(1, 1, WHITE);

        let geometry =
            PointGeometry::from_images(&color, &depth, &ColorDepthThreshold::new(0.1, 0.0), 1.0).unwrap();
        assert!(geometry.is_empty());
    }

    #[test]
    fn test_golden_two_by_one() {
        let color = RasterImage::from_pixels(2, 1, &[WHITE, BLACK]).unwrap();
        let depth = RasterImage::from_pixels(2, 1, &[WHITE, BLACK]).unwrap();

        let geometry =
            PointGeometry::from_images(&color, &depth, &ColorDepthThreshold::new(0.4, 0.0), 1.0).unwrap();

        assert_eq!(geometry.positions(), &[[-1.0, 1.0, 0.5]]);
        assert_eq!(geometry.colors(), &[[1.0, 1.0, 1.0, 1.0]]);
    }

    #[test]
    fn test_grid_positions_and_scan_order() {
        let color = RasterImage::filled(2, 2, WHITE);
        let depth = RasterImage::filled(2, 2, BLACK);

        let geometry = PointGeometry::from_images(&color, &depth, &AcceptAll, 0.0).unwrap();

        assert_eq!(
            geometry.positions(),
            &[
                [-1.0, 1.0, -0.5],
                [0.0, 1.0, -0.5],
                [-1.0, 0.0, -0.5],
                [0.0, 0.0, -0.5],
            ]
        );
    }

    #[test]
    fn test_accept_all_and_reject_all_counts() {
        let color = RasterImage::filled(4, 3, [10, 20, 30, 255]);
        let depth = RasterImage::filled(4, 3, [128, 128, 128, 255]);

        let all = PointGeometry::from_images(&color, &depth, &AcceptAll, 1.0).unwrap();
        let none = PointGeometry::from_images(&color, &depth, &reject_all, 1.0).unwrap();

        assert_eq!(all.len(), 12);
        assert_eq!(none.len(), 0);
    }

    #[test]
    fn test_rejected_pixels_keep_scan_order() {
        let color = RasterImage::from_pixels(3, 1, &[WHITE, BLACK, WHITE]).unwrap();
        let depth = RasterImage::filled(3, 1, WHITE);

        let geometry =
            PointGeometry::from_images(&color, &depth, &ColorDepthThreshold::new(0.5, 0.0), 1.0).unwrap();

        assert_eq!(geometry.len(), 2);
        assert_relative_eq!(geometry.positions()[0][0], -1.0);
        assert_relative_eq!(geometry.positions()[1][0], 1.0 / 3.0, epsilon = 1e-6);
    }

    #[test]
    fn test_mismatched_dimensions() {
        let color = RasterImage::filled(2, 2, WHITE);
        let depth = RasterImage::filled(2, 3, WHITE);

        match PointGeometry::from_images(&color, &depth, &AcceptAll, 1.0) {
            Err(Error::DimensionMismatch { color, depth }) => {
                assert_eq!(color, (2, 2));
                assert_eq!(depth, (2, 3));
            }
            other => panic!("expected DimensionMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_iterate_positions_identity_and_negate() {
        let color = RasterImage::filled(3, 2, WHITE);
        let depth = RasterImage::from_pixels(3, 2, &[WHITE, BLACK, WHITE, BLACK, WHITE, [64, 64, 64, 255]]).unwrap();
        let mut geometry = PointGeometry::from_images(&color, &depth, &AcceptAll, 1.5).unwrap();
        let original = geometry.clone();

        geometry.iterate_positions(|x, y, z, _| (x, y, z));
        assert_eq!(geometry, original);

        geometry.iterate_positions(|x, y, z, _| (x, y, -z));
        for (after, before) in geometry.positions().iter().zip(original.positions()) {
            assert_eq!(after[0], before[0]);
            assert_eq!(after[1], before[1]);
            assert_eq!(after[2], -before[2]);
        }
    }

    #[test]
    fn test_iterate_positions_normalized_index() {
        let mut geometry = PointGeometry::new();
        for _ in 0..4 {
            geometry.push([0.0; 3], [1.0; 4]);
        }

        let mut seen = Vec::new();
        geometry.iterate_positions(|x, y, z, t| {
            seen.push(t);
            (x, y, z)
        });
        assert_eq!(seen, vec![0.0, 0.25, 0.5, 0.75]);
    }

    #[test]
    fn test_from_parts_rejects_misaligned_arrays() {
        let result = PointGeometry::from_parts(vec![[0.0; 3]; 2], vec![[0.0; 4]; 1]);
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_bounding_box_and_bytes() {
        let geometry = PointGeometry::from_parts(
            vec![[-1.0, 0.5, 0.2], [0.5, -0.5, -0.3]],
            vec![[1.0; 4], [0.0; 4]],
        )
        .unwrap();

        let (min, max) = geometry.bounding_box();
        assert_eq!(min, Point3f::new(-1.0, -0.5, -0.3));
        assert_eq!(max, Point3f::new(0.5, 0.5, 0.2));
        assert_relative_eq!(geometry.center().z, -0.05, epsilon = 1e-6);

        assert_eq!(geometry.position_bytes().len(), 24);
        assert_eq!(geometry.color_bytes().len(), 32);
        assert_eq!(geometry.iter().count(), 2);
    }
}
