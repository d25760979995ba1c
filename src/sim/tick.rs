//! Per-frame simulation step
//!
//! `tick` advances the world exactly one logical step: player physics,
//! animation counters, particle and decoration housekeeping, spawning,
//! scrolling, and collision, in a fixed order. The shell calls it once per
//! animation frame while the run is live.

use glam::Vec2;
use rand::Rng;

use super::collision::overlaps;
use super::spawn::{spawn_coin, spawn_obstacle, wrap_cloud};
use super::state::{ObstacleKind, Particle, RunEvent, RunPhase, Stance, World};
use crate::consts::*;

/// Input sampled for a single tick. `jump` is one-shot: the shell sets it
/// from key/click/touch handlers and clears it after the tick.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub jump: bool,
}

/// Advance the world by one tick. A no-op unless the run is live.
pub fn tick(world: &mut World, input: &TickInput) {
    if world.phase != RunPhase::Running {
        return;
    }

    if input.jump {
        world.jump();
    }

    // Score is elapsed ticks, not distance
    world.score += 1;

    // The sole difficulty ramp after construction
    if world.score % SPEED_STEP_INTERVAL == 0 {
        world.speed += SPEED_STEP;
    }

    integrate_player(world);
    advance_animation(world);
    update_particles(world);
    update_clouds(world);

    update_obstacles(world);
    if world.phase != RunPhase::Running {
        // Crashed mid-tick: coins are not processed
        return;
    }

    update_coins(world);
}

/// Euler-integrate the player and resolve ground contact
fn integrate_player(world: &mut World) {
    let player = &mut world.player;
    player.velocity_y += GRAVITY;
    player.pos.y += player.velocity_y;

    if player.on_ground(world.ground_y) {
        player.land(world.ground_y);
        player.stance = if world.score >= RUN_SCORE_THRESHOLD {
            Stance::Running
        } else {
            Stance::Walking
        };
    }
}

/// Advance walk-cycle, aura, and glow counters
fn advance_animation(world: &mut World) {
    let player = &mut world.player;

    if !player.is_jumping {
        player.step_ticks += 1;
        let cadence = match player.stance {
            Stance::Walking => WALK_CYCLE_TICKS,
            Stance::Running => RUN_CYCLE_TICKS,
        };
        if player.step_ticks >= cadence {
            player.step_ticks = 0;
            player.walk_phase = (player.walk_phase + 1) % WALK_PHASES;
        }
    }

    if player.aura > 0.0 {
        player.aura = (player.aura - AURA_DECAY).max(0.0);
    }
    player.glow = 0.5 + 0.5 * (world.score as f32 * 0.1).sin();
}

/// Emit the ambient sparkle on its cadence, then integrate and cull
fn update_particles(world: &mut World) {
    if world.score % SPARKLE_INTERVAL == 0 && world.particles.len() < MAX_PARTICLES {
        let player = &world.player;
        let pos = player.pos
            + Vec2::new(
                world.rng.random_range(0.0..player.width),
                world.rng.random_range(0.0..player.height),
            );
        let vel = Vec2::new(-1.0 - world.rng.random_range(0.0..1.0), -0.6);
        world.particles.push(Particle {
            pos,
            vel,
            life: 1.0,
            size: 2.0 + world.rng.random_range(0.0..2.0),
        });
    }

    for particle in &mut world.particles {
        particle.pos += particle.vel;
        particle.life -= PARTICLE_DECAY;
    }
    world.particles.retain(|p| p.life > 0.0);
}

/// Drift clouds leftward and wrap them past the right edge
fn update_clouds(world: &mut World) {
    let viewport_w = world.viewport_w;
    let ground_y = world.ground_y;
    let World { clouds, rng, .. } = world;
    for cloud in clouds.iter_mut() {
        cloud.pos.x -= cloud.drift;
        if cloud.pos.x + cloud.width < 0.0 {
            wrap_cloud(cloud, viewport_w, ground_y, rng);
        }
    }
}

/// Spawn, scroll, animate, cull, and collision-test obstacles. May
/// terminate the run.
fn update_obstacles(world: &mut World) {
    world.obstacle_timer += 1;
    if world.obstacle_timer > world.obstacle_interval {
        world.obstacle_timer = 0;
        let obstacle = spawn_obstacle(world.tier, world.viewport_w, world.ground_y, &mut world.rng);
        world.obstacles.push(obstacle);
    }

    let speed = world.speed;
    for obstacle in &mut world.obstacles {
        obstacle.pos.x -= speed;
        if obstacle.kind == ObstacleKind::Airborne {
            obstacle.wing_phase += 0.3;
        }
    }
    world.obstacles.retain(|o| !o.off_screen());

    let player_box = world.player.hitbox();
    if world
        .obstacles
        .iter()
        .any(|o| overlaps(&player_box, &o.hitbox()))
    {
        world.phase = RunPhase::Terminated;
        world.events.push(RunEvent::Crashed);
    }
}

/// Spawn, scroll, animate, cull, and collect coins
fn update_coins(world: &mut World) {
    world.coin_timer += 1;
    if world.coin_timer > COIN_INTERVAL {
        world.coin_timer = 0;
        let coin = spawn_coin(world.viewport_w, world.ground_y, &mut world.rng);
        world.coins.push(coin);
    }

    let speed = world.speed;
    let player_box = world.player.hitbox();
    let mut bursts: Vec<Vec2> = Vec::new();

    for coin in &mut world.coins {
        if coin.collected {
            continue;
        }
        coin.pos.x -= speed;
        coin.spin += 0.2;
        if overlaps(&player_box, &coin.hitbox()) {
            coin.collected = true;
            bursts.push(coin.pos + Vec2::splat(COIN_SIZE / 2.0));
        }
    }
    // Collected coins are removed the same step they are counted
    world.coins.retain(|c| !c.collected && !c.off_screen());

    for center in bursts {
        world.coins_collected += 1;
        world.events.push(RunEvent::CoinCollected);
        world.player.aura = 1.0;
        spawn_coin_burst(world, center);
    }
}

/// Celebratory burst: particles radiating at 45° increments
fn spawn_coin_burst(world: &mut World, center: Vec2) {
    for i in 0..COIN_BURST_COUNT {
        if world.particles.len() >= MAX_PARTICLES {
            break;
        }
        let angle = i as f32 * std::f32::consts::FRAC_PI_4;
        world.particles.push(Particle {
            pos: center,
            vel: Vec2::from_angle(angle) * 2.5,
            life: 1.0,
            size: 3.0,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Coin, Obstacle};

    fn world() -> World {
        let mut w = World::new(800.0, 400.0, 1, 12345);
        w.start();
        w
    }

    /// Step the world with obstacles swept out of the player's path
    fn tick_clear(world: &mut World, n: u64) {
        let input = TickInput::default();
        for _ in 0..n {
            tick(world, &input);
            world.obstacles.clear();
        }
    }

    #[test]
    fn hundred_and_one_clear_ticks() {
        // Tier 1, no jumps, nothing in the player's path: the first
        // obstacle spawns at tick 101 at the right edge, far from x=80.
        let mut w = world();
        let input = TickInput::default();
        for _ in 0..101 {
            tick(&mut w, &input);
        }
        assert_eq!(w.score, 101);
        assert_eq!(w.phase, RunPhase::Running);
        assert!(!w.player.is_jumping);
        assert_eq!(w.player.pos.y, w.ground_y - w.player.height);
    }

    #[test]
    fn player_never_sinks_below_ground() {
        let mut w = world();
        let input = TickInput::default();
        for i in 0..600u64 {
            if i % 37 == 0 {
                w.jump();
            }
            tick(&mut w, &input);
            w.obstacles.clear();
            assert!(w.player.pos.y <= w.ground_y - w.player.height + f32::EPSILON);
            if !w.player.is_jumping {
                assert_eq!(w.player.pos.y, w.ground_y - w.player.height);
            }
        }
    }

    #[test]
    fn speed_steps_every_five_hundred_ticks() {
        let mut w = world();
        let mut last = w.speed;
        for t in 1..=1500u64 {
            tick_clear(&mut w, 1);
            assert!(w.speed >= last);
            if t % SPEED_STEP_INTERVAL == 0 {
                assert_eq!(w.speed, last + SPEED_STEP);
            } else {
                assert_eq!(w.speed, last);
            }
            last = w.speed;
        }
        assert_eq!(
            w.speed,
            crate::consts::BASE_SCROLL_SPEED + 3.0 * SPEED_STEP
        );
    }

    #[test]
    fn obstacles_scroll_left_by_exactly_the_speed() {
        let mut w = world();
        w.obstacles.push(Obstacle {
            kind: ObstacleKind::Low,
            pos: Vec2::new(700.0, w.ground_y - 30.0),
            wing_phase: 0.0,
        });
        let x0 = w.obstacles[0].pos.x;
        let speed = w.speed;
        tick(&mut w, &TickInput::default());
        assert_eq!(w.obstacles[0].pos.x, x0 - speed);
    }

    #[test]
    fn coins_scroll_left_by_exactly_the_speed() {
        let mut w = world();
        w.coins.push(Coin {
            pos: Vec2::new(700.0, w.ground_y - 100.0),
            collected: false,
            spin: 0.0,
        });
        let x0 = w.coins[0].pos.x;
        let speed = w.speed;
        tick(&mut w, &TickInput::default());
        assert_eq!(w.coins[0].pos.x, x0 - speed);
    }

    #[test]
    fn exact_overlap_terminates_next_tick() {
        let mut w = world();
        // Hazard placed inside the player's footprint, offset right by
        // one tick of scroll so it lands on the player after moving.
        w.obstacles.push(Obstacle {
            kind: ObstacleKind::Low,
            pos: Vec2::new(w.player.pos.x + w.speed, w.player.pos.y + w.player.height - 30.0),
            wing_phase: 0.0,
        });
        tick(&mut w, &TickInput::default());
        assert_eq!(w.phase, RunPhase::Terminated);
        assert_eq!(w.summary().coins_collected, 0);
        let events = w.drain_events();
        assert_eq!(events.iter().filter(|e| **e == RunEvent::Crashed).count(), 1);
    }

    #[test]
    fn terminated_world_is_frozen() {
        let mut w = world();
        w.obstacles.push(Obstacle {
            kind: ObstacleKind::Low,
            pos: Vec2::new(w.player.pos.x, w.player.pos.y + w.player.height - 30.0),
            wing_phase: 0.0,
        });
        tick(&mut w, &TickInput::default());
        assert_eq!(w.phase, RunPhase::Terminated);
        w.drain_events();

        let score = w.score;
        let speed = w.speed;
        let positions: Vec<f32> = w.obstacles.iter().map(|o| o.pos.x).collect();
        for _ in 0..50 {
            tick(&mut w, &TickInput::default());
        }
        assert_eq!(w.score, score);
        assert_eq!(w.speed, speed);
        assert_eq!(
            w.obstacles.iter().map(|o| o.pos.x).collect::<Vec<_>>(),
            positions
        );
        // Crashed fired exactly once: no further events after the drain
        assert!(w.drain_events().is_empty());
    }

    #[test]
    fn second_jump_while_airborne_changes_nothing() {
        let mut w = world();
        tick(&mut w, &TickInput { jump: true });
        assert!(w.player.is_jumping);
        let vel = w.player.velocity_y;
        w.jump();
        assert_eq!(w.player.velocity_y, vel);
        // Via input as well
        tick(&mut w, &TickInput { jump: true });
        // One gravity step exactly, no new impulse
        assert_eq!(w.player.velocity_y, vel + GRAVITY);
    }

    #[test]
    fn overlapping_coin_is_collected_and_run_continues() {
        let mut w = world();
        w.coins.push(Coin {
            pos: Vec2::new(w.player.pos.x + w.speed, w.player.pos.y),
            collected: false,
            spin: 0.0,
        });
        tick(&mut w, &TickInput::default());
        assert_eq!(w.coins_collected, 1);
        assert!(w.coins.is_empty());
        assert_eq!(w.phase, RunPhase::Running);
        assert_eq!(w.player.aura, 1.0);
        let events = w.drain_events();
        assert!(events.contains(&RunEvent::CoinCollected));
        // Celebratory burst at 45° increments
        assert!(w.particles.len() >= COIN_BURST_COUNT as usize);
    }

    #[test]
    fn host_stop_terminates_without_crash_event() {
        let mut w = world();
        tick_clear(&mut w, 5);
        w.drain_events();
        w.stop();
        assert_eq!(w.phase, RunPhase::Terminated);
        assert!(w.drain_events().is_empty());
        tick(&mut w, &TickInput::default());
        assert_eq!(w.score, 5);
    }

    #[test]
    fn airborne_obstacles_flap() {
        let mut w = world();
        w.obstacles.push(Obstacle {
            kind: ObstacleKind::Airborne,
            pos: Vec2::new(600.0, w.ground_y - 120.0),
            wing_phase: 0.0,
        });
        tick(&mut w, &TickInput::default());
        assert!(w.obstacles[0].wing_phase > 0.0);
    }

    #[test]
    fn stance_switches_to_running_past_the_threshold() {
        let mut w = world();
        tick_clear(&mut w, RUN_SCORE_THRESHOLD + 1);
        assert_eq!(w.player.stance, Stance::Running);
    }

    #[test]
    fn sparkles_emit_and_decay() {
        let mut w = world();
        tick_clear(&mut w, SPARKLE_INTERVAL);
        assert!(!w.particles.is_empty());
        // With no new emissions a particle dies within 1/PARTICLE_DECAY ticks
        let lifetime = (1.0 / PARTICLE_DECAY) as u64 + 2;
        for _ in 0..lifetime {
            for particle in &mut w.particles {
                particle.life -= PARTICLE_DECAY;
            }
            w.particles.retain(|p| p.life > 0.0);
        }
        assert!(w.particles.is_empty());
    }

    #[test]
    fn same_seed_same_run() {
        let mut a = World::new(800.0, 400.0, 4, 777);
        let mut b = World::new(800.0, 400.0, 4, 777);
        a.start();
        b.start();
        let input = TickInput::default();
        for i in 0..400u64 {
            if i % 53 == 0 {
                a.jump();
                b.jump();
            }
            tick(&mut a, &input);
            tick(&mut b, &input);
            if a.phase != RunPhase::Running {
                break;
            }
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.obstacles.len(), b.obstacles.len());
        for (oa, ob) in a.obstacles.iter().zip(&b.obstacles) {
            assert_eq!(oa.kind, ob.kind);
            assert_eq!(oa.pos, ob.pos);
        }
    }
}
