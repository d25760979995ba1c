//! Run state and core simulation types
//!
//! The whole simulation lives in the `World` aggregate so a run can be
//! serialized, stepped in tests, and inspected without hidden state.

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::spawn::obstacle_interval_for_tier;
use crate::consts::*;

/// World-level state machine. `Terminated` is absorbing until the next
/// `start` re-initializes the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RunPhase {
    /// Constructed but not yet started
    #[default]
    Idle,
    /// Active run
    Running,
    /// Run ended (collision or host stop)
    Terminated,
}

/// Grounded animation stance, chosen by elapsed score on ground contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Stance {
    #[default]
    Walking,
    Running,
}

/// Side effects recorded by the core for the shell to act on
/// (haptics, game-over UI). Drained once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEvent {
    /// Player left the ground
    Jumped,
    /// A coin was collected this tick
    CoinCollected,
    /// An obstacle collision ended the run. Emitted exactly once per run.
    Crashed,
}

/// Final numbers for a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Elapsed ticks
    pub score: u64,
    pub coins_collected: u32,
}

/// The player entity. Only `pos.y` and `velocity_y` evolve; x is fixed
/// for the whole run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub velocity_y: f32,
    pub width: f32,
    pub height: f32,
    pub is_jumping: bool,
    pub stance: Stance,
    /// Walk-cycle index in [0, WALK_PHASES)
    pub walk_phase: u8,
    /// Ticks accumulated toward the next walk-cycle advance
    pub step_ticks: u32,
    /// Power aura in [0, 1], set on coin pickup, decays toward 0
    pub aura: f32,
    /// Pulsing glow in [0, 1], a sine of total elapsed ticks
    pub glow: f32,
}

impl Player {
    pub fn new(ground_y: f32) -> Self {
        Self {
            pos: Vec2::new(PLAYER_X, ground_y - PLAYER_HEIGHT),
            velocity_y: 0.0,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            is_jumping: false,
            stance: Stance::Walking,
            walk_phase: 0,
            step_ticks: 0,
            aura: 0.0,
            glow: 0.0,
        }
    }

    pub fn hitbox(&self) -> Rect {
        Rect::new(self.pos, self.width, self.height)
    }

    /// Continuous leg/arm swing in [-1, 1], derived from the walk phase
    pub fn limb_swing(&self) -> f32 {
        (self.walk_phase as f32 * std::f32::consts::FRAC_PI_2).sin()
    }

    /// Snap to the ground line, clearing vertical motion
    pub fn land(&mut self, ground_y: f32) {
        self.pos.y = ground_y - self.height;
        self.velocity_y = 0.0;
        self.is_jumping = false;
    }

    pub fn on_ground(&self, ground_y: f32) -> bool {
        self.pos.y >= ground_y - self.height
    }
}

/// The closed set of obstacle shapes. Each maps to a fixed size and a
/// spawn-height offset above the ground line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Small rock on the ground
    Low,
    /// Tall spire on the ground
    Tall,
    /// Hazard floating above jump-under height
    Elevated,
    /// Flapping bird, highest spawn
    Airborne,
}

impl ObstacleKind {
    /// Fixed bounding-box size per variant
    pub fn size(self) -> Vec2 {
        match self {
            ObstacleKind::Low => Vec2::new(30.0, 30.0),
            ObstacleKind::Tall => Vec2::new(28.0, 50.0),
            ObstacleKind::Elevated => Vec2::new(32.0, 26.0),
            ObstacleKind::Airborne => Vec2::new(36.0, 24.0),
        }
    }

    /// Gap between the ground line and the variant's bottom edge at spawn
    pub fn ground_offset(self) -> f32 {
        match self {
            ObstacleKind::Low | ObstacleKind::Tall => 0.0,
            ObstacleKind::Elevated => 55.0,
            ObstacleKind::Airborne => 95.0,
        }
    }
}

/// A scrolling hazard. `pos.y` is fixed at spawn; `pos.x` decreases by the
/// world scroll speed each tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub pos: Vec2,
    /// Wing-flap angle, advanced each tick (airborne variant only)
    pub wing_phase: f32,
}

impl Obstacle {
    pub fn hitbox(&self) -> Rect {
        let size = self.kind.size();
        Rect::new(self.pos, size.x, size.y)
    }

    pub fn off_screen(&self) -> bool {
        self.pos.x + self.kind.size().x < 0.0
    }
}

/// A collectible coin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub pos: Vec2,
    pub collected: bool,
    /// Rotation phase for the spinning-disc effect
    pub spin: f32,
}

impl Coin {
    pub fn hitbox(&self) -> Rect {
        Rect::new(self.pos, COIN_SIZE, COIN_SIZE)
    }

    pub fn off_screen(&self) -> bool {
        self.pos.x + COIN_SIZE < 0.0
    }
}

/// Purely cosmetic background cloud; wraps around the right edge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cloud {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Clouds drift at their own speed, independent of the scroll speed
    pub drift: f32,
}

/// A cosmetic sparkle with its own velocity and decaying life in [0, 1]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32,
    pub size: f32,
}

/// RNG seed wrapper kept in the serialized state so a run's spawn pattern
/// is reproducible
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

fn default_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete run state. Owns every entity; nothing about the simulation
/// lives outside this aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    /// Run seed for reproducibility
    pub rng_state: RngState,
    /// Live RNG; rebuilt from `rng_state` after deserialization
    #[serde(skip, default = "default_rng")]
    pub rng: Pcg32,
    /// Difficulty tier (≥1), immutable after construction
    pub tier: u32,
    pub phase: RunPhase,
    /// Elapsed ticks (not distance)
    pub score: u64,
    pub coins_collected: u32,
    /// Uniform leftward speed applied to obstacles and coins
    pub speed: f32,
    pub viewport_w: f32,
    pub viewport_h: f32,
    /// Y coordinate of the ground line, derived from the viewport height
    pub ground_y: f32,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub coins: Vec<Coin>,
    pub clouds: Vec<Cloud>,
    /// Cosmetic only, dropped from saves
    #[serde(skip)]
    pub particles: Vec<Particle>,
    pub obstacle_timer: u32,
    pub obstacle_interval: u32,
    pub coin_timer: u32,
    /// Side effects for the shell, drained once per frame
    #[serde(skip)]
    pub events: Vec<RunEvent>,
}

impl World {
    /// Create a world for the given viewport, difficulty tier, and seed.
    /// The world starts `Idle`; call `start` to begin a run.
    pub fn new(viewport_w: f32, viewport_h: f32, tier: u32, seed: u64) -> Self {
        let tier = tier.max(1);
        let ground_y = viewport_h - GROUND_MARGIN;
        let mut world = Self {
            rng_state: RngState::new(seed),
            rng: Pcg32::seed_from_u64(seed),
            tier,
            phase: RunPhase::Idle,
            score: 0,
            coins_collected: 0,
            speed: BASE_SCROLL_SPEED,
            viewport_w,
            viewport_h,
            ground_y,
            player: Player::new(ground_y),
            obstacles: Vec::new(),
            coins: Vec::new(),
            clouds: Vec::new(),
            particles: Vec::new(),
            obstacle_timer: 0,
            obstacle_interval: obstacle_interval_for_tier(tier),
            coin_timer: 0,
            events: Vec::new(),
        };
        world.init_clouds();
        world
    }

    /// Rebuild the live RNG after deserialization
    pub fn rearm_rng(&mut self) {
        self.rng = self.rng_state.to_rng();
    }

    fn init_clouds(&mut self) {
        self.clouds.clear();
        for _ in 0..CLOUD_COUNT {
            let cloud = Cloud {
                pos: Vec2::new(
                    self.rng.random_range(0.0..self.viewport_w.max(1.0)),
                    self.rng.random_range(0.0..(self.ground_y - 100.0).max(1.0)),
                ),
                width: 60.0 + self.rng.random_range(0.0..40.0),
                height: 30.0,
                drift: 0.5 + self.rng.random_range(0.0..0.5),
            };
            self.clouds.push(cloud);
        }
    }

    /// Reset run state and begin a new run
    pub fn start(&mut self) {
        self.phase = RunPhase::Running;
        self.score = 0;
        self.coins_collected = 0;
        self.speed = BASE_SCROLL_SPEED;
        self.obstacles.clear();
        self.coins.clear();
        self.particles.clear();
        self.events.clear();
        self.obstacle_timer = 0;
        self.coin_timer = 0;
        self.player = Player::new(self.ground_y);
    }

    /// Halt the run without a completion event (host stop, visibility loss)
    pub fn stop(&mut self) {
        self.phase = RunPhase::Terminated;
    }

    pub fn is_running(&self) -> bool {
        self.phase == RunPhase::Running
    }

    /// Jump if grounded; a no-op while airborne or when not running.
    pub fn jump(&mut self) {
        if self.phase != RunPhase::Running || self.player.is_jumping {
            return;
        }
        self.player.velocity_y = JUMP_IMPULSE;
        self.player.is_jumping = true;
        self.events.push(RunEvent::Jumped);
    }

    /// Recompute the ground line from a new viewport size. Forwarded by
    /// the host on resize; a grounded player stays on the ground line.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        let was_grounded = !self.player.is_jumping;
        self.viewport_w = width;
        self.viewport_h = height;
        self.ground_y = height - GROUND_MARGIN;
        if was_grounded {
            self.player.land(self.ground_y);
        }
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            score: self.score,
            coins_collected: self.coins_collected,
        }
    }

    /// Take this frame's events, leaving the queue empty
    pub fn drain_events(&mut self) -> Vec<RunEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_world_is_idle_with_player_on_ground() {
        let world = World::new(800.0, 400.0, 1, 7);
        assert_eq!(world.phase, RunPhase::Idle);
        assert_eq!(world.ground_y, 350.0);
        assert_eq!(world.player.pos.y, world.ground_y - world.player.height);
        assert_eq!(world.clouds.len(), CLOUD_COUNT);
    }

    #[test]
    fn tier_clamps_to_at_least_one() {
        let world = World::new(800.0, 400.0, 0, 7);
        assert_eq!(world.tier, 1);
    }

    #[test]
    fn start_resets_run_state() {
        let mut world = World::new(800.0, 400.0, 2, 7);
        world.start();
        world.score = 42;
        world.coins_collected = 3;
        world.speed = 9.0;
        world.obstacles.push(Obstacle {
            kind: ObstacleKind::Low,
            pos: Vec2::new(100.0, 100.0),
            wing_phase: 0.0,
        });
        world.start();
        assert_eq!(world.phase, RunPhase::Running);
        assert_eq!(world.score, 0);
        assert_eq!(world.coins_collected, 0);
        assert_eq!(world.speed, BASE_SCROLL_SPEED);
        assert!(world.obstacles.is_empty());
        assert_eq!(world.player.pos.y, world.ground_y - world.player.height);
    }

    #[test]
    fn jump_is_noop_while_airborne() {
        let mut world = World::new(800.0, 400.0, 1, 7);
        world.start();
        world.jump();
        assert!(world.player.is_jumping);
        let vel = world.player.velocity_y;
        world.jump();
        assert_eq!(world.player.velocity_y, vel);
    }

    #[test]
    fn jump_is_noop_when_not_running() {
        let mut world = World::new(800.0, 400.0, 1, 7);
        world.jump();
        assert!(!world.player.is_jumping);
        assert_eq!(world.player.velocity_y, 0.0);
    }

    #[test]
    fn resize_keeps_grounded_player_on_ground() {
        let mut world = World::new(800.0, 400.0, 1, 7);
        world.start();
        world.set_viewport(640.0, 300.0);
        assert_eq!(world.ground_y, 250.0);
        assert_eq!(world.player.pos.y, world.ground_y - world.player.height);
    }

    #[test]
    fn world_round_trips_through_json() {
        let mut world = World::new(800.0, 400.0, 3, 99);
        world.start();
        let json = serde_json::to_string(&world).unwrap();
        let mut restored: World = serde_json::from_str(&json).unwrap();
        restored.rearm_rng();
        assert_eq!(restored.tier, 3);
        assert_eq!(restored.phase, RunPhase::Running);
        assert_eq!(restored.ground_y, world.ground_y);
    }
}
