//! Plank outline geometry
//!
//! The plank is a thin rectangle. The unrotated outline is fixed at
//! construction; the live outline is always derived from it by rotating
//! about the pivot by the current tilt angle.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::rotate_about;

/// Rectangular outline of the plank.
///
/// Corners are ordered counterclockwise starting at the bottom-left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlankShape {
    pub corners: [DVec2; 4],
}

impl PlankShape {
    /// Axis-aligned outline at zero tilt, built from the bottom-center point.
    pub fn level(bottom_center: DVec2, length: f64, thickness: f64) -> Self {
        let half = length / 2.0;
        Self {
            corners: [
                bottom_center + DVec2::new(-half, 0.0),
                bottom_center + DVec2::new(half, 0.0),
                bottom_center + DVec2::new(half, thickness),
                bottom_center + DVec2::new(-half, thickness),
            ],
        }
    }

    /// Outline rotated about `center` by `angle` radians.
    pub fn rotated_about(&self, center: DVec2, angle: f64) -> Self {
        Self {
            corners: self.corners.map(|c| rotate_about(c, center, angle)),
        }
    }

    /// Leftmost extent of the outline.
    pub fn min_x(&self) -> f64 {
        self.corners.iter().map(|c| c.x).fold(f64::INFINITY, f64::min)
    }

    /// Rightmost extent of the outline.
    pub fn max_x(&self) -> f64 {
        self.corners
            .iter()
            .map(|c| c.x)
            .fold(f64::NEG_INFINITY, f64::max)
    }
}
