//! Point cloud construction parameters

use serde::{Deserialize, Serialize};

use crate::material::MaterialParameters;
use crate::threshold::ColorDepthThreshold;

/// Parameters controlling how images become a point cloud
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointCloudParameters {
    /// Minimum mean RGB value in `[0, 1]` for a pixel to be kept
    pub color_threshold: f32,
    /// Minimum depth value in `[0, 1]` for a pixel to be kept
    pub depth_threshold: f32,
    /// Multiplier applied to the centered depth; 0 means 1
    pub depth_scale: f32,
    /// Render size of each point
    pub point_size: f32,
    /// Material overrides applied after `point_size`
    #[serde(default)]
    pub material_parameters: MaterialParameters,
}

impl Default for PointCloudParameters {
    fn default() -> Self {
        Self {
            color_threshold: 0.0,
            depth_threshold: 0.0,
            depth_scale: 1.0,
            point_size: 0.01,
            material_parameters: MaterialParameters::default(),
        }
    }
}

impl PointCloudParameters {
    /// The color/depth threshold described by these parameters
    pub fn default_predicate(&self) -> ColorDepthThreshold {
        ColorDepthThreshold::new(self.color_threshold, self.depth_threshold)
    }

    /// Depth scale with the unset value replaced by 1
    pub fn effective_depth_scale(&self) -> f32 {
        effective_depth_scale(self.depth_scale)
    }

    /// Material fields derived from these parameters
    pub fn material(&self) -> MaterialParameters {
        MaterialParameters {
            size: Some(self.point_size),
            vertex_colors: Some(true),
            ..MaterialParameters::default()
        }
        .merged(&self.material_parameters)
    }
}

pub(crate) fn effective_depth_scale(depth_scale: f32) -> f32 {
    if depth_scale == 0.0 || depth_scale.is_nan() {
        1.0
    } else {
        depth_scale
    }
}
