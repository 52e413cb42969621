//! Pixel accept/reject predicates
//!
//! A predicate sees the color sample normalized to `[0, 1]` per channel and
//! the depth sample centered to `[-0.5, 0.5]`, and decides whether the pixel
//! becomes a point.

use serde::{Deserialize, Serialize};

use crate::image::mean;

/// Decides whether a color/depth pixel pair is promoted to a 3D point
pub trait ThresholdPredicate {
    fn accept(&self, color: &[f32; 4], depth: f32) -> bool;
}

impl<F> ThresholdPredicate for F
where
    F: Fn(&[f32; 4], f32) -> bool,
{
    fn accept(&self, color: &[f32; 4], depth: f32) -> bool {
        self(color, depth)
    }
}

/// Accept pixels that are bright enough and near enough
///
/// A pixel passes when the mean of its RGB channels exceeds
/// `color_threshold` and its depth shifted back to `[0, 1]` exceeds
/// `depth_threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorDepthThreshold {
    pub color_threshold: f32,
    pub depth_threshold: f32,
}

impl ColorDepthThreshold {
    pub fn new(color_threshold: f32, depth_threshold: f32) -> Self {
        Self {
            color_threshold,
            depth_threshold,
        }
    }
}

impl ThresholdPredicate for ColorDepthThreshold {
    fn accept(&self, color: &[f32; 4], depth: f32) -> bool {
        mean(&color[..3]) > self.color_threshold && depth + 0.5 > self.depth_threshold
    }
}

/// Accept every pixel
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl ThresholdPredicate for AcceptAll {
    fn accept(&self, _color: &[f32; 4], _depth: f32) -> bool {
        true
    }
}

/// Convert a depth-image pixel to its centered value in `[-0.5, 0.5]`
#[inline]
pub fn normalized_depth(pixel: [u8; 4]) -> f32 {
    mean(&[
        pixel[0] as f32 / 255.0,
        pixel[1] as f32 / 255.0,
        pixel[2] as f32 / 255.0,
    ]) - 0.5
}

/// Convert a color-image pixel to `[0, 1]` per channel, alpha included
#[inline]
pub fn normalized_color(pixel: [u8; 4]) -> [f32; 4] {
    pixel.map(|c| c as f32 / 255.0)
}
