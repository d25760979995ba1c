//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed logical step per `tick` call
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Rect, overlaps};
pub use spawn::{obstacle_interval_for_tier, pick_obstacle_kind};
pub use state::{
    Cloud, Coin, Obstacle, ObstacleKind, Particle, Player, RngState, RunEvent, RunPhase,
    RunSummary, Stance, World,
};
pub use tick::{TickInput, tick};
