//! Demo scenario driver
//!
//! Scatters a seeded-random set of masses over the plank, steps the
//! simulation until the motion settles or the tilt saturates, and dumps the
//! final state as JSON. Pass a seed as the first argument for a different
//! arrangement (default 42).

use glam::DVec2;
use log::{info, warn};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use seesaw_sim::consts::{PLANK_HEIGHT, PLANK_THICKNESS, SIM_DT};
use seesaw_sim::{ColumnState, Mass, MassId, Plank};

/// Stop after this many ticks even if the plank never settles
const MAX_TICKS: u32 = 36_000;

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42u64);
    let mut rng = Pcg32::seed_from_u64(seed);
    info!("seed {seed}");

    let mut plank = match Plank::new(
        DVec2::new(0.0, PLANK_HEIGHT),
        DVec2::new(0.0, PLANK_HEIGHT + PLANK_THICKNESS),
        ColumnState::None,
    ) {
        Ok(plank) => plank,
        Err(err) => {
            eprintln!("invalid plank configuration: {err}");
            std::process::exit(1);
        }
    };

    // Scatter a few masses over the surface via drop-point resolution
    for id in 0..6u32 {
        let mass_value = rng.random_range(1..=8) as f64 * 2.5;
        let x = rng.random_range(-2.0..=2.0);
        let drop = DVec2::new(x, plank.surface_y_value(x) + 0.5);
        match plank.add_mass_to_surface(Mass::new(MassId(id), mass_value, drop)) {
            Ok(()) => info!(
                "placed {mass_value} kg at {:+.2} m",
                plank.mass_distance(MassId(id)).unwrap_or(f64::NAN)
            ),
            Err(rejected) => warn!("mass {:?} rejected: {}", rejected.mass.id, rejected.reason),
        }
    }
    info!("balanced at start: {}", plank.is_balanced());

    let mut ticks = 0u32;
    loop {
        plank.step(SIM_DT);
        ticks += 1;

        if ticks % 60 == 0 {
            info!(
                "t={:6.2}s tilt={:+.4} rad vel={:+.5} torque={:+.3}",
                ticks as f64 * SIM_DT,
                plank.tilt_angle(),
                plank.angular_velocity(),
                plank.net_torque()
            );
        }

        let at_rest = plank.angular_velocity() == 0.0;
        let settled = at_rest && plank.net_torque().abs() < 1e-3;
        let saturated = at_rest && plank.tilt_angle().abs() >= plank.max_tilt_angle();
        if (ticks > 60 && (settled || saturated)) || ticks >= MAX_TICKS {
            break;
        }
    }

    info!(
        "stopped after {ticks} ticks: tilt={:+.4} rad, balanced={}",
        plank.tilt_angle(),
        plank.is_balanced()
    );

    match serde_json::to_string_pretty(&plank) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("failed to serialize state: {err}"),
    }
}
