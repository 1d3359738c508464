//! Seesaw Sim - torque-balance simulation of a pivoted plank
//!
//! Core modules:
//! - `sim`: deterministic plank physics (torque accumulation, angular
//!   integration with tilt-limit clamping, snap-to-slot mass placement)
//!
//! Rendering, drag-and-drop input, and UI panels are external collaborators:
//! they read `tilt_angle`/`shape` and call the attach/detach operations,
//! nothing more. The engine is single-threaded and synchronous.

pub mod sim;

pub use sim::{ColumnState, Mass, MassForceVector, MassId, Plank, PlankShape};

use glam::DVec2;

/// Simulation constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f64 = 1.0 / 60.0;

    /// Plank length in meters
    pub const PLANK_LENGTH: f64 = 4.5;
    /// Plank thickness in meters
    pub const PLANK_THICKNESS: f64 = 0.05;
    /// Mass of the plank itself (kg)
    pub const PLANK_MASS: f64 = 75.0;
    /// Height of the plank's bottom surface above the ground at zero tilt
    pub const PLANK_HEIGHT: f64 = 0.75;
    /// Spacing between snap-to attachment slots along the surface
    pub const INTER_SLOT_DISTANCE: f64 = 0.25;

    /// Gravitational acceleration (m/s²)
    pub const GRAVITY: f64 = 9.8;

    /// Angular acceleration/velocity below this magnitude snaps to zero,
    /// preventing perpetual micro-oscillation from floating-point noise
    pub const MOTION_SNAP_EPSILON: f64 = 1e-5;
    /// Tilt angle below this magnitude snaps to exactly level
    pub const TILT_SNAP_EPSILON: f64 = 1e-4;
    /// Net mass-torque magnitude below this counts as balanced
    pub const BALANCE_TOLERANCE: f64 = 1e-6;
}

/// Rotate `point` about `center` by `angle` radians (counterclockwise).
#[inline]
pub fn rotate_about(point: DVec2, center: DVec2, angle: f64) -> DVec2 {
    let (sin, cos) = angle.sin_cos();
    let d = point - center;
    center + DVec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_rotate_about_quarter_turn() {
        let p = rotate_about(DVec2::new(2.0, 1.0), DVec2::new(1.0, 1.0), FRAC_PI_2);
        assert!((p.x - 1.0).abs() < 1e-12);
        assert!((p.y - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_rotate_about_identity_at_zero_angle() {
        let p = DVec2::new(-3.5, 0.25);
        let rotated = rotate_about(p, DVec2::new(10.0, -4.0), 0.0);
        assert_eq!(rotated, p);
    }
}
