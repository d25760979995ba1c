//! Crown Runner - a side-scrolling runner mini-game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collision, run state)
//! - `render`: Canvas2D render pass (wasm32 only)
//! - `platform`: Browser glue (LocalStorage, Telegram haptics)
//! - `settings`: Persisted player preferences
//! - `records`: Local best-run leaderboard

pub mod platform;
pub mod records;
#[cfg(target_arch = "wasm32")]
pub mod render;
pub mod settings;
pub mod sim;

pub use records::RunRecords;
pub use settings::Settings;

/// Game tuning constants
pub mod consts {
    /// Downward acceleration applied to the player every tick
    pub const GRAVITY: f32 = 0.6;
    /// Vertical velocity set by a jump (negative = up, canvas coordinates)
    pub const JUMP_IMPULSE: f32 = -12.0;

    /// Scroll speed at the start of a run (pixels per tick)
    pub const BASE_SCROLL_SPEED: f32 = 5.0;
    /// Scroll speed increment applied every `SPEED_STEP_INTERVAL` ticks
    pub const SPEED_STEP: f32 = 0.5;
    /// Ticks between scroll speed increments
    pub const SPEED_STEP_INTERVAL: u64 = 500;

    /// Height of the ground strip at the bottom of the viewport
    pub const GROUND_MARGIN: f32 = 50.0;

    /// Player bounding box; x never changes during a run
    pub const PLAYER_X: f32 = 80.0;
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 50.0;

    /// Inset shrinking the trailing/bottom edges of both boxes before the
    /// overlap test. Forgives near-miss grazes; tunable, not load-bearing.
    pub const HIT_INSET: f32 = 5.0;

    /// Obstacle spawn interval at tier 1, in ticks
    pub const OBSTACLE_BASE_INTERVAL: u32 = 100;
    /// Interval reduction per tier above 1
    pub const OBSTACLE_INTERVAL_STEP: u32 = 8;
    /// Spawn interval floor
    pub const OBSTACLE_MIN_INTERVAL: u32 = 60;

    /// Coin spawn interval, in ticks (independent of obstacle spawns)
    pub const COIN_INTERVAL: u32 = 60;
    pub const COIN_SIZE: f32 = 25.0;
    /// Coins spawn in a band this far above the ground line...
    pub const COIN_BAND_BASE: f32 = 80.0;
    /// ...plus a random extra height up to this much
    pub const COIN_BAND_SPREAD: f32 = 60.0;

    /// Decorative clouds maintained for the lifetime of the world
    pub const CLOUD_COUNT: usize = 3;

    /// Ticks per walk-cycle phase while walking
    pub const WALK_CYCLE_TICKS: u32 = 7;
    /// Ticks per walk-cycle phase while running
    pub const RUN_CYCLE_TICKS: u32 = 5;
    /// Number of phases in the walk cycle
    pub const WALK_PHASES: u8 = 4;
    /// Score at which the grounded stance switches from walking to running
    pub const RUN_SCORE_THRESHOLD: u64 = 300;

    /// Ticks between ambient sparkle emissions near the player
    pub const SPARKLE_INTERVAL: u64 = 9;
    /// Particles emitted in the coin-collection burst, at 45° increments
    pub const COIN_BURST_COUNT: u32 = 8;
    /// Per-tick life decay for sparkle particles (life is in [0, 1])
    pub const PARTICLE_DECAY: f32 = 0.04;
    /// Per-tick decay of the player's power aura after a coin pickup
    pub const AURA_DECAY: f32 = 0.02;
    /// Cap on live particles
    pub const MAX_PARTICLES: usize = 128;
}
