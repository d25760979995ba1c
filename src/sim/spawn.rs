//! Entity spawners and the tier-weighted obstacle variant table

use glam::Vec2;
use rand::Rng;

use super::state::{Cloud, Coin, Obstacle, ObstacleKind};
use crate::consts::*;

/// Obstacle spawn interval for a difficulty tier. Higher tiers spawn
/// faster, floored so the run stays clearable.
pub fn obstacle_interval_for_tier(tier: u32) -> u32 {
    let tier = tier.max(1);
    OBSTACLE_BASE_INTERVAL
        .saturating_sub(OBSTACLE_INTERVAL_STEP * (tier - 1))
        .max(OBSTACLE_MIN_INTERVAL)
}

/// Draw one variant from the tier's discrete distribution. Re-rolled on
/// every spawn; tier 1 is deterministic.
pub fn pick_obstacle_kind<R: Rng>(tier: u32, rng: &mut R) -> ObstacleKind {
    use ObstacleKind::*;
    let choices: &[ObstacleKind] = match tier.max(1) {
        1 => &[Low],
        2 => &[Low, Tall],
        3 => &[Low, Tall, Elevated],
        _ => &[Low, Tall, Elevated, Airborne],
    };
    choices[rng.random_range(0..choices.len())]
}

/// Create an obstacle at the right edge of the viewport, its bottom edge
/// sitting `ground_offset` above the ground line
pub fn spawn_obstacle<R: Rng>(
    tier: u32,
    viewport_w: f32,
    ground_y: f32,
    rng: &mut R,
) -> Obstacle {
    let kind = pick_obstacle_kind(tier, rng);
    let size = kind.size();
    Obstacle {
        kind,
        pos: Vec2::new(viewport_w, ground_y - size.y - kind.ground_offset()),
        wing_phase: 0.0,
    }
}

/// Create a coin at the right edge, in the band above the ground line
pub fn spawn_coin<R: Rng>(viewport_w: f32, ground_y: f32, rng: &mut R) -> Coin {
    let y = ground_y - COIN_BAND_BASE - rng.random_range(0.0..COIN_BAND_SPREAD);
    Coin {
        pos: Vec2::new(viewport_w, y),
        collected: false,
        spin: 0.0,
    }
}

/// Send a cloud that scrolled off the left edge back past the right edge
/// at a new random height
pub fn wrap_cloud<R: Rng>(cloud: &mut Cloud, viewport_w: f32, ground_y: f32, rng: &mut R) {
    cloud.pos.x = viewport_w;
    cloud.pos.y = rng.random_range(0.0..(ground_y - 100.0).max(1.0));
}
