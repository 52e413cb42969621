//! Point types and related functionality

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A point with a normalized RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColoredPoint {
    pub position: Point3f,
    pub color: [f32; 4],
}

impl ColoredPoint {
    pub fn new(position: [f32; 3], color: [f32; 4]) -> Self {
        Self {
            position: Point3f::new(position[0], position[1], position[2]),
            color,
        }
    }
}

impl Default for ColoredPoint {
    fn default() -> Self {
        Self {
            position: Point3f::origin(),
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}
