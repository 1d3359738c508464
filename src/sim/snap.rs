//! Snap-to-slot placement
//!
//! The plank surface exposes evenly spaced attachment slots. Resolving a
//! drop point applies three filters in order: discard occupied slots,
//! discard slots more than one slot spacing away horizontally (so a mass
//! dropped far to one side cannot jump to the opposite end), then take the
//! candidate nearest to the drop point.

use glam::DVec2;

/// Signed distances from the plank center for every usable slot.
///
/// There are `floor(length / inter_slot) - 1` evenly spaced candidates; when
/// that count is odd the exact center slot is reserved and excluded.
pub fn slot_distances(length: f64, inter_slot: f64) -> Vec<f64> {
    let count = (length / inter_slot).floor() as i64 - 1;
    let center_index = (count + 1) / 2;
    (1..=count)
        .filter(|&i| !(count % 2 == 1 && i == center_index))
        .map(|i| -length / 2.0 + inter_slot * i as f64)
        .collect()
}

/// Resolve a drop point to the nearest free slot, if any.
///
/// `slots` pairs each signed distance-from-center with its world position on
/// the current (rotated) surface; `occupied` holds the positions of already
/// attached masses. A slot counts as occupied when a mass sits within
/// `inter_slot / 10` of it. Exact distance ties are broken arbitrarily.
pub fn resolve_slot(
    drop: DVec2,
    slots: &[(f64, DVec2)],
    occupied: &[DVec2],
    inter_slot: f64,
) -> Option<(f64, DVec2)> {
    let occupied_radius = inter_slot / 10.0;
    slots
        .iter()
        .filter(|(_, pos)| !occupied.iter().any(|m| m.distance(*pos) <= occupied_radius))
        .filter(|(_, pos)| (pos.x - drop.x).abs() <= inter_slot)
        .min_by(|a, b| {
            a.1.distance_squared(drop)
                .partial_cmp(&b.1.distance_squared(drop))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .copied()
}
