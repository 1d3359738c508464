//! The pivoted plank: torque accumulation, angular integration, and the
//! attached-mass bookkeeping that goes with them.
//!
//! The plank rotates about a fixed pivot with a single degree of freedom.
//! Attached masses contribute torque proportional to their signed distance
//! from center; the plank's own weight contributes a self-righting term.
//! There is no contact physics here - the tilt limit is an instantaneous,
//! inelastic end stop.

use glam::DVec2;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::mass::{Mass, MassForceVector, MassId};
use super::shape::PlankShape;
use super::snap;
use crate::consts::{
    BALANCE_TOLERANCE, GRAVITY, INTER_SLOT_DISTANCE, MOTION_SNAP_EPSILON, PLANK_LENGTH,
    PLANK_MASS, PLANK_THICKNESS, TILT_SNAP_EPSILON,
};
use crate::rotate_about;

/// Support columns under the plank.
///
/// Owned by an external collaborator; the plank only reads it. Any present
/// column mechanically locks the plank against rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColumnState {
    /// No support; the plank rotates freely under net torque
    #[default]
    None,
    /// Single column under the center
    Single,
    /// Symmetric pair of columns
    Double,
}

impl ColumnState {
    /// True when a physical support prevents the plank from rotating.
    #[inline]
    pub fn locks_plank(&self) -> bool {
        !matches!(self, ColumnState::None)
    }
}

/// Unrecoverable configuration errors, reported at construction time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlankError {
    #[error("pivot y={pivot_y} lies below the unrotated plank surface at y={surface_y}")]
    PivotBelowSurface { pivot_y: f64, surface_y: f64 },
    #[error("plank height {height} must be in (0, {max_height}] for a tilt limit to exist")]
    InvalidHeight { height: f64, max_height: f64 },
}

/// Why an attach operation was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AttachError {
    #[error("mass is not above the plank surface")]
    NotAbovePlank,
    #[error("no open slot within range of the drop point")]
    NoOpenSlot,
    #[error("mass is already attached")]
    AlreadyAttached,
    #[error("distance from center exceeds half the plank length")]
    DistanceOutOfRange,
}

/// A rejected attach operation. Hands the mass back to the caller so a
/// failed attach never loses or mutates it.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{reason}")]
pub struct RejectedMass {
    pub mass: Mass,
    pub reason: AttachError,
}

/// The pivoted plank and everything attached to it.
///
/// Invariants, enforced at every mutation site:
/// - `|tilt_angle| <= max_tilt_angle`
/// - `attached_masses`, `mass_distances`, and `force_vectors` always have
///   the same length and id correspondence; they mutate atomically
/// - attached mass positions/rotations and the live outline are consistent
///   with the current tilt whenever a mutating call returns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plank {
    /// World position of the plank's bottom-center at zero tilt
    bottom_center: DVec2,
    /// Fixed point the plank rotates about
    pivot: DVec2,
    length: f64,
    thickness: f64,
    /// Mass of the plank itself (kg)
    plank_mass: f64,
    inter_slot: f64,
    /// Current rotation (radians, signed)
    tilt_angle: f64,
    /// Tilt at which a plank end touches the ground
    max_tilt_angle: f64,
    angular_velocity: f64,
    /// Transient; overwritten every tick and on attach/detach
    net_torque: f64,
    moment_of_inertia: f64,
    /// Outline at zero tilt; the live outline is always derived from it
    unrotated_shape: PlankShape,
    column_state: ColumnState,
    /// Attached masses in insertion order
    attached_masses: Vec<Mass>,
    /// Signed distance-from-center per attached mass, keyed by id
    mass_distances: Vec<(MassId, f64)>,
    /// One force indicator per attached mass, same order
    force_vectors: Vec<MassForceVector>,
    /// True while the plank itself is being manually tilted
    user_controlled: bool,
}

impl Plank {
    /// Build a plank with the default geometry constants.
    pub fn new(
        bottom_center: DVec2,
        pivot: DVec2,
        column_state: ColumnState,
    ) -> Result<Self, PlankError> {
        Self::with_geometry(
            bottom_center,
            pivot,
            column_state,
            PLANK_LENGTH,
            PLANK_THICKNESS,
            PLANK_MASS,
            INTER_SLOT_DISTANCE,
        )
    }

    /// Build a plank with explicit geometry.
    pub fn with_geometry(
        bottom_center: DVec2,
        pivot: DVec2,
        column_state: ColumnState,
        length: f64,
        thickness: f64,
        plank_mass: f64,
        inter_slot: f64,
    ) -> Result<Self, PlankError> {
        let half_length = length / 2.0;
        if !(bottom_center.y > 0.0 && bottom_center.y <= half_length) {
            return Err(PlankError::InvalidHeight {
                height: bottom_center.y,
                max_height: half_length,
            });
        }
        let surface_y = bottom_center.y + thickness;
        if pivot.y < surface_y {
            return Err(PlankError::PivotBelowSurface {
                pivot_y: pivot.y,
                surface_y,
            });
        }

        Ok(Self {
            bottom_center,
            pivot,
            length,
            thickness,
            plank_mass,
            inter_slot,
            tilt_angle: 0.0,
            max_tilt_angle: (bottom_center.y / half_length).asin(),
            angular_velocity: 0.0,
            net_torque: 0.0,
            moment_of_inertia: plank_mass * (length * length + thickness * thickness) / 12.0,
            unrotated_shape: PlankShape::level(bottom_center, length, thickness),
            column_state,
            attached_masses: Vec::new(),
            mass_distances: Vec::new(),
            force_vectors: Vec::new(),
            user_controlled: false,
        })
    }

    // === Read access for rendering/input collaborators ===

    #[inline]
    pub fn tilt_angle(&self) -> f64 {
        self.tilt_angle
    }

    #[inline]
    pub fn max_tilt_angle(&self) -> f64 {
        self.max_tilt_angle
    }

    #[inline]
    pub fn angular_velocity(&self) -> f64 {
        self.angular_velocity
    }

    #[inline]
    pub fn net_torque(&self) -> f64 {
        self.net_torque
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.length
    }

    #[inline]
    pub fn pivot(&self) -> DVec2 {
        self.pivot
    }

    #[inline]
    pub fn column_state(&self) -> ColumnState {
        self.column_state
    }

    #[inline]
    pub fn is_user_controlled(&self) -> bool {
        self.user_controlled
    }

    /// The live outline: the unrotated outline rotated by the current tilt
    /// about the pivot. Always derived, never cached.
    pub fn shape(&self) -> PlankShape {
        self.unrotated_shape
            .rotated_about(self.pivot, self.tilt_angle)
    }

    pub fn attached_masses(&self) -> &[Mass] {
        &self.attached_masses
    }

    pub fn force_vectors(&self) -> &[MassForceVector] {
        &self.force_vectors
    }

    /// Signed distance-from-center recorded for an attached mass.
    pub fn mass_distance(&self, id: MassId) -> Option<f64> {
        self.mass_distances
            .iter()
            .find(|(other, _)| *other == id)
            .map(|(_, d)| *d)
    }

    pub fn is_attached(&self, id: MassId) -> bool {
        self.attached_masses.iter().any(|m| m.id == id)
    }

    // === External collaborator mutations ===

    pub fn set_column_state(&mut self, column_state: ColumnState) {
        self.column_state = column_state;
        if column_state.locks_plank() {
            self.angular_velocity = 0.0;
            self.net_torque = 0.0;
        }
    }

    pub fn set_user_controlled(&mut self, user_controlled: bool) {
        self.user_controlled = user_controlled;
        if user_controlled {
            self.angular_velocity = 0.0;
        }
    }

    /// Directly set the tilt (manual tilting). Clamped to the tilt limit;
    /// attached masses and force vectors follow immediately.
    pub fn set_tilt_angle(&mut self, angle: f64) {
        self.tilt_angle = angle.clamp(-self.max_tilt_angle, self.max_tilt_angle);
        self.angular_velocity = 0.0;
        self.refresh_attached_state();
    }

    // === Per-tick dynamics ===

    /// Advance the angular motion by one timestep.
    ///
    /// No-op while the plank is user controlled. With a support column
    /// present the plank is mechanically locked: net torque is defined as
    /// zero and the tilt is left untouched.
    pub fn step(&mut self, dt: f64) {
        if self.user_controlled {
            return;
        }
        if self.column_state.locks_plank() {
            self.net_torque = 0.0;
            self.angular_velocity = 0.0;
            return;
        }

        self.net_torque = self.compute_net_torque();

        let mut angular_acceleration = self.net_torque / self.moment_of_inertia;
        if angular_acceleration.abs() <= MOTION_SNAP_EPSILON {
            angular_acceleration = 0.0;
        }
        self.angular_velocity += angular_acceleration;
        if self.angular_velocity.abs() <= MOTION_SNAP_EPSILON {
            self.angular_velocity = 0.0;
        }

        let previous_tilt = self.tilt_angle;
        self.tilt_angle += self.angular_velocity * dt;

        if self.tilt_angle.abs() > self.max_tilt_angle {
            // End stop: hitting the ground is inelastic and instantaneous
            self.tilt_angle = self.max_tilt_angle.copysign(self.tilt_angle);
            self.angular_velocity = 0.0;
        } else if self.tilt_angle.abs() < TILT_SNAP_EPSILON {
            self.tilt_angle = 0.0;
        }

        if self.tilt_angle != previous_tilt {
            self.refresh_attached_state();
        }
    }

    /// Net torque about the pivot: mass contributions at their recorded
    /// distances plus the plank's own self-righting term. Zero whenever a
    /// support column is present.
    fn compute_net_torque(&self) -> f64 {
        if self.column_state.locks_plank() {
            return 0.0;
        }
        let mut torque = self.mass_torque_sum();
        // The plank's weight acts at its rotated center of mass, offset
        // horizontally from the pivot; signed to restore toward level.
        torque += self.plank_mass * (self.pivot.x - self.center_of_mass().x);
        torque * GRAVITY
    }

    /// Sum of `mass_value * signed_distance` over attached masses.
    fn mass_torque_sum(&self) -> f64 {
        self.mass_distances
            .iter()
            .map(|(id, distance)| {
                let mass_value = self
                    .attached_masses
                    .iter()
                    .find(|m| m.id == *id)
                    .map_or(0.0, |m| m.mass_value);
                mass_value * distance
            })
            .sum()
    }

    fn center_of_mass(&self) -> DVec2 {
        rotate_about(
            self.bottom_center + DVec2::new(0.0, self.thickness / 2.0),
            self.pivot,
            self.tilt_angle,
        )
    }

    // === Attachment and detachment ===

    /// Attach a mass at the nearest open slot to its current position.
    ///
    /// Rejected (state untouched, mass handed back) when the mass is not
    /// above the plank surface, when no open slot resolves within range, or
    /// when the id is already attached.
    pub fn add_mass_to_surface(&mut self, mass: Mass) -> Result<(), RejectedMass> {
        if self.is_attached(mass.id) {
            warn!("attach rejected: mass {:?} is already attached", mass.id);
            return Err(RejectedMass {
                mass,
                reason: AttachError::AlreadyAttached,
            });
        }
        if !self.is_point_above_plank(mass.position) {
            return Err(RejectedMass {
                mass,
                reason: AttachError::NotAbovePlank,
            });
        }

        let occupied: Vec<DVec2> = self.attached_masses.iter().map(|m| m.position).collect();
        let slots = self.slot_positions();
        let Some((distance, slot)) =
            snap::resolve_slot(mass.position, &slots, &occupied, self.inter_slot)
        else {
            return Err(RejectedMass {
                mass,
                reason: AttachError::NoOpenSlot,
            });
        };

        let mut mass = mass;
        mass.position = slot;
        mass.rotation_angle = self.tilt_angle;
        mass.on_plank = true;
        debug!(
            "attached mass {:?} ({} kg) at {:+.2} m from center",
            mass.id, mass.mass_value, distance
        );

        self.force_vectors.push(MassForceVector::for_mass(&mass));
        self.mass_distances.push((mass.id, distance));
        self.attached_masses.push(mass);
        self.refresh_attached_state();
        Ok(())
    }

    /// Attach a mass at an exact distance from center (deterministic
    /// placement, e.g. for answer checking). The mass is positioned just
    /// above the target slot and sent through the normal resolution path so
    /// the same consistency rules apply.
    pub fn add_mass_to_surface_at(
        &mut self,
        mut mass: Mass,
        distance: f64,
    ) -> Result<(), RejectedMass> {
        if distance.abs() > self.length / 2.0 {
            warn!(
                "attach rejected: distance {:+.2} exceeds half length {:.2}",
                distance,
                self.length / 2.0
            );
            return Err(RejectedMass {
                mass,
                reason: AttachError::DistanceOutOfRange,
            });
        }
        let (sin, cos) = self.tilt_angle.sin_cos();
        mass.position = self.plank_surface_center()
            + DVec2::new(cos, sin) * distance
            + DVec2::new(0.0, self.thickness);
        self.add_mass_to_surface(mass)
    }

    /// Detach a mass by id. Returns `None` (documented no-op) when the id
    /// is not attached. Removal is by identity, never by position, and is
    /// atomic across all three collections.
    pub fn remove_mass_from_surface(&mut self, id: MassId) -> Option<Mass> {
        let index = self.attached_masses.iter().position(|m| m.id == id)?;
        let mut mass = self.attached_masses.remove(index);
        self.mass_distances.retain(|(other, _)| *other != id);
        self.force_vectors.retain(|fv| fv.mass_id != id);

        mass.rotation_angle = 0.0;
        mass.on_plank = false;
        self.net_torque = self.compute_net_torque();
        debug!("detached mass {:?} ({} kg)", mass.id, mass.mass_value);
        Some(mass)
    }

    /// Detach every attached mass, with the same per-mass cleanup as
    /// single removal. Safe on an empty plank.
    pub fn remove_all_masses(&mut self) -> Vec<Mass> {
        let ids: Vec<MassId> = self.attached_masses.iter().map(|m| m.id).collect();
        ids.into_iter()
            .filter_map(|id| self.remove_mass_from_surface(id))
            .collect()
    }

    /// Re-derive every attached mass's position/rotation, its force vector,
    /// and the net torque from the current tilt.
    fn refresh_attached_state(&mut self) {
        let center = self.plank_surface_center();
        let (sin, cos) = self.tilt_angle.sin_cos();
        let along = DVec2::new(cos, sin);

        for (mass, (id, distance)) in self.attached_masses.iter_mut().zip(&self.mass_distances) {
            debug_assert_eq!(mass.id, *id);
            mass.position = center + along * *distance;
            mass.rotation_angle = self.tilt_angle;
        }
        for (fv, mass) in self.force_vectors.iter_mut().zip(&self.attached_masses) {
            fv.refresh(mass);
        }
        self.net_torque = self.compute_net_torque();
    }

    // === Derived geometric queries ===

    /// World position of the plank's top-center at the current tilt.
    pub fn plank_surface_center(&self) -> DVec2 {
        rotate_about(
            self.bottom_center + DVec2::new(0.0, self.thickness),
            self.pivot,
            self.tilt_angle,
        )
    }

    /// Height of the tilted top surface at horizontal coordinate `x`.
    ///
    /// Evaluates the surface line (slope `tan(tilt_angle)` through the
    /// surface center); only meaningful within the plank's horizontal
    /// extent - the caller checks bounds.
    pub fn surface_y_value(&self, x: f64) -> f64 {
        let center = self.plank_surface_center();
        center.y + self.tilt_angle.tan() * (x - center.x)
    }

    /// True iff `p` is within the plank's horizontal bounds and strictly
    /// above the surface line at `p.x`.
    pub fn is_point_above_plank(&self, p: DVec2) -> bool {
        let shape = self.shape();
        p.x >= shape.min_x() && p.x <= shape.max_x() && p.y > self.surface_y_value(p.x)
    }

    /// Pure torque-equilibrium test over the attached masses, independent
    /// of the current tilt and of column state.
    pub fn is_balanced(&self) -> bool {
        self.mass_torque_sum().abs() < BALANCE_TOLERANCE
    }

    /// Candidate slot positions on the current (rotated) surface, paired
    /// with their signed distance from center.
    fn slot_positions(&self) -> Vec<(f64, DVec2)> {
        let center = self.plank_surface_center();
        let (sin, cos) = self.tilt_angle.sin_cos();
        let along = DVec2::new(cos, sin);
        snap::slot_distances(self.length, self.inter_slot)
            .into_iter()
            .map(|d| (d, center + along * d))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{PLANK_HEIGHT, PLANK_THICKNESS, SIM_DT};

    fn test_plank() -> Plank {
        Plank::new(
            DVec2::new(0.0, PLANK_HEIGHT),
            DVec2::new(0.0, PLANK_HEIGHT + PLANK_THICKNESS),
            ColumnState::None,
        )
        .expect("default geometry is valid")
    }

    fn settle(plank: &mut Plank, ticks: u32) {
        for _ in 0..ticks {
            plank.step(SIM_DT);
        }
    }

    #[test]
    fn test_construction_rejects_pivot_below_surface() {
        let err = Plank::new(
            DVec2::new(0.0, 0.75),
            DVec2::new(0.0, 0.5),
            ColumnState::None,
        )
        .unwrap_err();
        assert!(matches!(err, PlankError::PivotBelowSurface { .. }));
    }

    #[test]
    fn test_construction_rejects_bad_height() {
        // Higher than half the plank length: asin argument out of range
        let err = Plank::new(
            DVec2::new(0.0, 3.0),
            DVec2::new(0.0, 3.05),
            ColumnState::None,
        )
        .unwrap_err();
        assert!(matches!(err, PlankError::InvalidHeight { .. }));

        let err = Plank::new(
            DVec2::new(0.0, 0.0),
            DVec2::new(0.0, 0.05),
            ColumnState::None,
        )
        .unwrap_err();
        assert!(matches!(err, PlankError::InvalidHeight { .. }));
    }

    #[test]
    fn test_max_tilt_from_geometry() {
        let plank = test_plank();
        let expected = (PLANK_HEIGHT / 2.25).asin();
        assert!((plank.max_tilt_angle() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_balanced_pair_stays_level() {
        // 5 kg at -0.5 m and 5 kg at +0.5 m: net mass torque is zero
        let mut plank = test_plank();
        plank
            .add_mass_to_surface_at(Mass::new(MassId(1), 5.0, DVec2::ZERO), -0.5)
            .unwrap();
        plank
            .add_mass_to_surface_at(Mass::new(MassId(2), 5.0, DVec2::ZERO), 0.5)
            .unwrap();

        assert_eq!(plank.mass_distance(MassId(1)), Some(-0.5));
        assert_eq!(plank.mass_distance(MassId(2)), Some(0.5));
        assert!(plank.is_balanced());

        settle(&mut plank, 600);
        assert_eq!(plank.tilt_angle(), 0.0);
        assert_eq!(plank.angular_velocity(), 0.0);
        assert!(plank.net_torque().abs() < 1e-9);
    }

    #[test]
    fn test_single_mass_saturates_at_tilt_limit() {
        // 10 kg at +1.0 m overwhelms the plank's restoring term
        let mut plank = test_plank();
        plank
            .add_mass_to_surface_at(Mass::new(MassId(1), 10.0, DVec2::ZERO), 1.0)
            .unwrap();
        assert!(!plank.is_balanced());

        settle(&mut plank, 600);
        assert!((plank.tilt_angle() - plank.max_tilt_angle()).abs() < 1e-12);
        assert_eq!(plank.angular_velocity(), 0.0);
    }

    #[test]
    fn test_tilt_limit_holds_for_large_dt() {
        let mut plank = test_plank();
        plank
            .add_mass_to_surface_at(Mass::new(MassId(1), 40.0, DVec2::ZERO), -2.0)
            .unwrap();
        for _ in 0..50 {
            plank.step(10.0);
            assert!(plank.tilt_angle().abs() <= plank.max_tilt_angle());
        }
        assert!((plank.tilt_angle() + plank.max_tilt_angle()).abs() < 1e-12);
    }

    #[test]
    fn test_masses_follow_tilt() {
        let mut plank = test_plank();
        plank
            .add_mass_to_surface_at(Mass::new(MassId(1), 10.0, DVec2::ZERO), 1.5)
            .unwrap();
        settle(&mut plank, 300);

        let tilt = plank.tilt_angle();
        assert!(tilt != 0.0);
        let mass = &plank.attached_masses()[0];
        assert_eq!(mass.rotation_angle, tilt);
        // Mass sits on the surface line at its recorded distance
        let expected = plank.plank_surface_center() + DVec2::new(tilt.cos(), tilt.sin()) * 1.5;
        assert!((mass.position - expected).length() < 1e-12);
        // Force vector tracks the mass
        let fv = &plank.force_vectors()[0];
        assert_eq!(fv.point_of_origin, mass.position);
        assert!((fv.force.y - (-10.0 * GRAVITY)).abs() < 1e-12);
    }

    #[test]
    fn test_attach_by_drop_point() {
        let mut plank = test_plank();
        let drop = DVec2::new(0.55, plank.surface_y_value(0.55) + 0.3);
        plank
            .add_mass_to_surface(Mass::new(MassId(1), 5.0, drop))
            .unwrap();
        assert_eq!(plank.mass_distance(MassId(1)), Some(0.5));
        let mass = &plank.attached_masses()[0];
        assert!(mass.on_plank);
        assert_eq!(mass.position.x, 0.5);
    }

    #[test]
    fn test_attach_rejects_point_not_above_plank() {
        let mut plank = test_plank();
        // Outside horizontal extent
        let err = plank
            .add_mass_to_surface(Mass::new(MassId(1), 5.0, DVec2::new(5.0, 1.0)))
            .unwrap_err();
        assert_eq!(err.reason, AttachError::NotAbovePlank);
        // Below the surface
        let err = plank
            .add_mass_to_surface(Mass::new(MassId(1), 5.0, DVec2::new(0.5, 0.1)))
            .unwrap_err();
        assert_eq!(err.reason, AttachError::NotAbovePlank);
        assert!(plank.attached_masses().is_empty());
    }

    #[test]
    fn test_attach_rejects_duplicate_id() {
        let mut plank = test_plank();
        plank
            .add_mass_to_surface_at(Mass::new(MassId(1), 5.0, DVec2::ZERO), 0.5)
            .unwrap();
        let err = plank
            .add_mass_to_surface_at(Mass::new(MassId(1), 5.0, DVec2::ZERO), 1.0)
            .unwrap_err();
        assert_eq!(err.reason, AttachError::AlreadyAttached);
        assert_eq!(plank.attached_masses().len(), 1);
    }

    #[test]
    fn test_attach_at_rejects_out_of_range_distance() {
        let mut plank = test_plank();
        let err = plank
            .add_mass_to_surface_at(Mass::new(MassId(1), 5.0, DVec2::ZERO), 3.0)
            .unwrap_err();
        assert_eq!(err.reason, AttachError::DistanceOutOfRange);
        // Rejection hands the mass back and mutates nothing
        assert_eq!(err.mass.id, MassId(1));
        assert!(plank.attached_masses().is_empty());
        assert!(plank.force_vectors().is_empty());
    }

    #[test]
    fn test_second_drop_at_same_point_gets_different_slot() {
        let mut plank = test_plank();
        let drop = DVec2::new(-0.5, plank.surface_y_value(-0.5) + 0.2);
        plank
            .add_mass_to_surface(Mass::new(MassId(1), 5.0, drop))
            .unwrap();
        let first = plank.mass_distance(MassId(1)).unwrap();

        plank
            .add_mass_to_surface(Mass::new(MassId(2), 5.0, drop))
            .unwrap();
        let second = plank.mass_distance(MassId(2)).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_no_open_slot_when_neighborhood_is_full() {
        let mut plank = test_plank();
        // Occupy the two rightmost slots, then drop near the right end
        plank
            .add_mass_to_surface_at(Mass::new(MassId(1), 1.0, DVec2::ZERO), 2.0)
            .unwrap();
        plank
            .add_mass_to_surface_at(Mass::new(MassId(2), 1.0, DVec2::ZERO), 1.75)
            .unwrap();
        let drop = DVec2::new(2.1, plank.surface_y_value(2.1) + 0.2);
        let err = plank
            .add_mass_to_surface(Mass::new(MassId(3), 1.0, drop))
            .unwrap_err();
        assert_eq!(err.reason, AttachError::NoOpenSlot);
    }

    #[test]
    fn test_remove_absent_mass_is_noop() {
        let mut plank = test_plank();
        assert!(plank.remove_mass_from_surface(MassId(9)).is_none());
    }

    #[test]
    fn test_remove_resets_mass_and_collections() {
        let mut plank = test_plank();
        plank
            .add_mass_to_surface_at(Mass::new(MassId(1), 10.0, DVec2::ZERO), 1.0)
            .unwrap();
        settle(&mut plank, 100);

        let mass = plank.remove_mass_from_surface(MassId(1)).unwrap();
        assert!(!mass.on_plank);
        assert_eq!(mass.rotation_angle, 0.0);
        assert!(plank.attached_masses().is_empty());
        assert!(plank.force_vectors().is_empty());
        assert!(plank.mass_distance(MassId(1)).is_none());
        assert!(plank.is_balanced());
    }

    #[test]
    fn test_remove_all_masses() {
        let mut plank = test_plank();
        for i in 0..4u32 {
            plank
                .add_mass_to_surface_at(
                    Mass::new(MassId(i), 2.0, DVec2::ZERO),
                    -1.0 + 0.5 * i as f64 + if i >= 2 { 0.5 } else { 0.0 },
                )
                .unwrap();
        }
        assert_eq!(plank.attached_masses().len(), 4);

        let removed = plank.remove_all_masses();
        assert_eq!(removed.len(), 4);
        assert!(removed.iter().all(|m| !m.on_plank && m.rotation_angle == 0.0));
        assert!(plank.attached_masses().is_empty());
        assert!(plank.force_vectors().is_empty());
        assert!(plank.is_balanced());

        // Safe on an empty plank
        assert!(plank.remove_all_masses().is_empty());
    }

    #[test]
    fn test_columns_lock_the_plank() {
        let mut plank = test_plank();
        plank.set_column_state(ColumnState::Double);
        plank
            .add_mass_to_surface_at(Mass::new(MassId(1), 20.0, DVec2::ZERO), 2.0)
            .unwrap();
        settle(&mut plank, 300);
        assert_eq!(plank.tilt_angle(), 0.0);
        assert_eq!(plank.net_torque(), 0.0);
        assert!(!plank.is_balanced()); // balance test ignores column state

        // Removing the columns frees the plank
        plank.set_column_state(ColumnState::None);
        settle(&mut plank, 300);
        assert!(plank.tilt_angle() > 0.0);
    }

    #[test]
    fn test_step_is_noop_while_user_controlled() {
        let mut plank = test_plank();
        plank
            .add_mass_to_surface_at(Mass::new(MassId(1), 20.0, DVec2::ZERO), 2.0)
            .unwrap();
        plank.set_user_controlled(true);
        settle(&mut plank, 120);
        assert_eq!(plank.tilt_angle(), 0.0);

        plank.set_user_controlled(false);
        settle(&mut plank, 120);
        assert!(plank.tilt_angle() != 0.0);
    }

    #[test]
    fn test_set_tilt_angle_clamps_and_moves_masses() {
        let mut plank = test_plank();
        plank
            .add_mass_to_surface_at(Mass::new(MassId(1), 5.0, DVec2::ZERO), 1.0)
            .unwrap();
        plank.set_tilt_angle(10.0);
        assert_eq!(plank.tilt_angle(), plank.max_tilt_angle());
        let mass = &plank.attached_masses()[0];
        assert_eq!(mass.rotation_angle, plank.tilt_angle());
    }

    #[test]
    fn test_surface_queries_at_zero_tilt() {
        let plank = test_plank();
        let surface_y = PLANK_HEIGHT + PLANK_THICKNESS;
        assert!((plank.surface_y_value(0.0) - surface_y).abs() < 1e-12);
        assert!((plank.surface_y_value(-1.7) - surface_y).abs() < 1e-12);

        assert!(plank.is_point_above_plank(DVec2::new(0.0, 1.0)));
        assert!(!plank.is_point_above_plank(DVec2::new(0.0, 0.5)));
        assert!(!plank.is_point_above_plank(DVec2::new(3.0, 1.0)));
        // On the surface line is not strictly above
        assert!(!plank.is_point_above_plank(DVec2::new(0.0, surface_y)));
    }

    #[test]
    fn test_shape_is_derived_from_tilt() {
        let mut plank = test_plank();
        let level = plank.shape();
        plank.set_tilt_angle(0.2);
        let tilted = plank.shape();
        assert_ne!(level, tilted);
        let expected = level.rotated_about(plank.pivot(), 0.2);
        for (a, b) in tilted.corners.iter().zip(expected.corners.iter()) {
            assert!((*a - *b).length() < 1e-12);
        }
    }

    #[test]
    fn test_state_round_trips_through_serde() {
        let mut plank = test_plank();
        plank
            .add_mass_to_surface_at(Mass::new(MassId(1), 7.5, DVec2::ZERO), -1.25)
            .unwrap();
        settle(&mut plank, 50);

        let json = serde_json::to_string(&plank).unwrap();
        let restored: Plank = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.tilt_angle(), plank.tilt_angle());
        assert_eq!(restored.attached_masses(), plank.attached_masses());
        assert_eq!(restored.mass_distance(MassId(1)), Some(-1.25));
    }
}
