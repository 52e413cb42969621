//! Point material parameters

use serde::{Deserialize, Serialize};

/// A partial set of point material fields
///
/// Unset fields leave the target material untouched when merged.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MaterialParameters {
    pub size: Option<f32>,
    pub vertex_colors: Option<bool>,
    pub color: Option<[f32; 3]>,
    pub opacity: Option<f32>,
    pub transparent: Option<bool>,
    pub size_attenuation: Option<bool>,
}

impl MaterialParameters {
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_color(mut self, color: [f32; 3]) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity);
        self
    }

    /// Overlay the fields set in `other` on top of `self`
    pub fn merged(mut self, other: &MaterialParameters) -> Self {
        self.size = other.size.or(self.size);
        self.vertex_colors = other.vertex_colors.or(self.vertex_colors);
        self.color = other.color.or(self.color);
        self.opacity = other.opacity.or(self.opacity);
        self.transparent = other.transparent.or(self.transparent);
        self.size_attenuation = other.size_attenuation.or(self.size_attenuation);
        self
    }
}

/// Fully resolved point material
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub size: f32,
    pub vertex_colors: bool,
    pub color: [f32; 3],
    pub opacity: f32,
    pub transparent: bool,
    pub size_attenuation: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            size: 1.0,
            vertex_colors: true,
            color: [1.0, 1.0, 1.0],
            opacity: 1.0,
            transparent: false,
            size_attenuation: true,
        }
    }
}

impl Material {
    /// Build a material from defaults with `parameters` applied
    pub fn from_parameters(parameters: &MaterialParameters) -> Self {
        let mut material = Self::default();
        material.set_values(parameters);
        material
    }

    /// Copy every field set in `parameters` into this material
    pub fn set_values(&mut self, parameters: &MaterialParameters) {
        if let Some(size) = parameters.size {
            self.size = size;
        }
        if let Some(vertex_colors) = parameters.vertex_colors {
            self.vertex_colors = vertex_colors;
        }
        if let Some(color) = parameters.color {
            self.color = color;
        }
        if let Some(opacity) = parameters.opacity {
            self.opacity = opacity;
        }
        if let Some(transparent) = parameters.transparent {
            self.transparent = transparent;
        }
        if let Some(size_attenuation) = parameters.size_attenuation {
            self.size_attenuation = size_attenuation;
        }
    }
}
