//! Mass entities and their force indicators
//!
//! Masses are created by external collaborators and handed to the plank on
//! attach. While attached, the plank owns them and keeps their position and
//! rotation consistent with the current tilt. The engine only needs position,
//! rotation, and mass value - image-backed vs. shape-backed presentation is a
//! rendering concern.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::GRAVITY;

/// Stable identifier for a mass, assigned by the creating collaborator.
///
/// All bookkeeping (distance records, force vectors, removal) is keyed by
/// this id, never by object position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MassId(pub u32);

/// A point-like or extended mass that can sit on the plank surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mass {
    pub id: MassId,
    /// World position; mutated by the plank while attached
    pub position: DVec2,
    /// Rotation (radians); follows the plank tilt while attached
    pub rotation_angle: f64,
    /// Mass value in kilograms; read-only to the plank
    pub mass_value: f64,
    /// True while attached to a plank surface
    pub on_plank: bool,
    /// True while the user is dragging this mass. The input collaborator
    /// detaches the mass explicitly before setting this flag.
    pub user_controlled: bool,
}

impl Mass {
    pub fn new(id: MassId, mass_value: f64, position: DVec2) -> Self {
        Self {
            id,
            position,
            rotation_angle: 0.0,
            mass_value,
            on_plank: false,
            user_controlled: false,
        }
    }

    /// Weight of this mass (newtons, pointing down).
    #[inline]
    pub fn weight(&self) -> DVec2 {
        DVec2::new(0.0, -self.mass_value * GRAVITY)
    }
}

/// Force indicator tied to one attached mass.
///
/// Tracks the weight vector acting at the mass position so that rendering
/// collaborators can draw it; refreshed whenever mass positions change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MassForceVector {
    pub mass_id: MassId,
    /// Point the force acts at (the mass position)
    pub point_of_origin: DVec2,
    /// Force in newtons
    pub force: DVec2,
}

impl MassForceVector {
    pub fn for_mass(mass: &Mass) -> Self {
        Self {
            mass_id: mass.id,
            point_of_origin: mass.position,
            force: mass.weight(),
        }
    }

    /// Re-derive origin and force from the owning mass.
    pub fn refresh(&mut self, mass: &Mass) {
        debug_assert_eq!(self.mass_id, mass.id);
        self.point_of_origin = mass.position;
        self.force = mass.weight();
    }
}
