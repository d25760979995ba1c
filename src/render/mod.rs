//! Canvas2D render pass
//!
//! Pure read of the world: a full redraw of the viewport each frame, never
//! mutating simulation state. Called once per tick by the shell.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use crate::consts::COIN_SIZE;
use crate::settings::Settings;
use crate::sim::{Cloud, Coin, Obstacle, ObstacleKind, Particle, Player, Stance, World};

const TAU: f64 = PI * 2.0;

/// Redraw the whole viewport from the current world state
pub fn render(ctx: &CanvasRenderingContext2d, world: &World, settings: &Settings) {
    let w = world.viewport_w as f64;
    let h = world.viewport_h as f64;
    let ground = world.ground_y as f64;

    ctx.clear_rect(0.0, 0.0, w, h);

    draw_sky(ctx, w, ground);
    for cloud in &world.clouds {
        draw_cloud(ctx, cloud);
    }
    draw_ground(ctx, w, h, ground);

    if settings.effective_particles() {
        for particle in &world.particles {
            draw_particle(ctx, particle);
        }
    }

    draw_player(ctx, &world.player, ground, settings);

    for obstacle in &world.obstacles {
        draw_obstacle(ctx, obstacle);
    }
    for coin in &world.coins {
        draw_coin(ctx, coin, world.player.glow as f64);
    }
}

fn draw_sky(ctx: &CanvasRenderingContext2d, w: f64, ground: f64) {
    let gradient = ctx.create_linear_gradient(0.0, 0.0, 0.0, ground);
    let _ = gradient.add_color_stop(0.0, "#87CEEB");
    let _ = gradient.add_color_stop(1.0, "#B0E0E6");
    ctx.set_fill_style_canvas_gradient(&gradient);
    ctx.fill_rect(0.0, 0.0, w, ground);
}

fn draw_cloud(ctx: &CanvasRenderingContext2d, cloud: &Cloud) {
    let x = cloud.pos.x as f64;
    let y = cloud.pos.y as f64;
    let cw = cloud.width as f64;
    let ch = cloud.height as f64;
    ctx.set_fill_style_str("rgba(255, 255, 255, 0.8)");
    ctx.begin_path();
    let _ = ctx.ellipse(x, y, cw / 2.0, ch / 2.0, 0.0, 0.0, TAU);
    let _ = ctx.ellipse(x + 20.0, y - 10.0, cw / 3.0, ch / 2.0, 0.0, 0.0, TAU);
    let _ = ctx.ellipse(x + 40.0, y, cw / 2.5, ch / 2.0, 0.0, 0.0, TAU);
    ctx.fill();
}

fn draw_ground(ctx: &CanvasRenderingContext2d, w: f64, h: f64, ground: f64) {
    ctx.set_fill_style_str("#90EE90");
    ctx.fill_rect(0.0, ground, w, h - ground);

    // Grass tufts
    ctx.set_fill_style_str("#228B22");
    let mut x = 0.0;
    while x < w {
        ctx.fill_rect(x, ground, 10.0, 5.0);
        x += 20.0;
    }
}

fn draw_particle(ctx: &CanvasRenderingContext2d, particle: &Particle) {
    ctx.set_global_alpha(particle.life as f64);
    ctx.set_fill_style_str("#FFF8DC");
    ctx.begin_path();
    let _ = ctx.arc(
        particle.pos.x as f64,
        particle.pos.y as f64,
        particle.size as f64 / 2.0,
        0.0,
        TAU,
    );
    ctx.fill();
    ctx.set_global_alpha(1.0);
}

fn draw_player(ctx: &CanvasRenderingContext2d, player: &Player, ground: f64, settings: &Settings) {
    let x = player.pos.x as f64;
    let y = player.pos.y as f64;
    let pw = player.width as f64;
    let ph = player.height as f64;
    let cx = x + pw / 2.0;

    // Drop shadow on the ground line
    ctx.set_fill_style_str("rgba(0, 0, 0, 0.2)");
    ctx.begin_path();
    let _ = ctx.ellipse(cx, ground - 5.0, pw / 2.0, 5.0, 0.0, 0.0, TAU);
    ctx.fill();

    // Power aura behind the figure, scaled by the decaying scalar
    if player.aura > 0.0 && !settings.reduced_motion {
        ctx.set_global_alpha(player.aura as f64 * 0.4);
        ctx.set_fill_style_str("#FFD700");
        ctx.begin_path();
        let _ = ctx.arc(cx, y + ph / 2.0, pw, 0.0, TAU);
        ctx.fill();
        ctx.set_global_alpha(1.0);
    }

    // Pulsing glow while grounded
    if !settings.reduced_motion {
        ctx.set_shadow_color("#FFD700");
        ctx.set_shadow_blur(4.0 + 8.0 * player.glow as f64);
    }

    // Dress
    let gradient = ctx.create_linear_gradient(x, y, x, y + ph);
    let _ = gradient.add_color_stop(0.0, "#9370DB");
    let _ = gradient.add_color_stop(1.0, "#8A2BE2");
    ctx.set_fill_style_canvas_gradient(&gradient);
    ctx.begin_path();
    ctx.move_to(cx, y + 15.0);
    ctx.line_to(x, y + ph);
    ctx.line_to(x + pw, y + ph);
    ctx.close_path();
    ctx.fill();

    ctx.set_shadow_blur(0.0);

    // Legs, swung by the walk cycle while grounded, tucked in the air
    let swing = if player.is_jumping {
        0.3
    } else {
        player.limb_swing() as f64
    };
    let stride = match player.stance {
        Stance::Walking => 6.0,
        Stance::Running => 10.0,
    };
    ctx.set_stroke_style_str("#FFE4B5");
    ctx.set_line_width(4.0);
    ctx.begin_path();
    ctx.move_to(cx - 6.0, y + ph - 2.0);
    ctx.line_to(cx - 6.0 - swing * stride, y + ph + 8.0);
    ctx.move_to(cx + 6.0, y + ph - 2.0);
    ctx.line_to(cx + 6.0 + swing * stride, y + ph + 8.0);
    ctx.stroke();

    // Head
    ctx.set_fill_style_str("#FFE4B5");
    ctx.begin_path();
    let _ = ctx.arc(cx, y + 10.0, 12.0, 0.0, TAU);
    ctx.fill();

    // Crown
    ctx.set_fill_style_str("#FFD700");
    ctx.begin_path();
    ctx.move_to(cx - 12.0, y + 5.0);
    ctx.line_to(cx - 8.0, y - 2.0);
    ctx.line_to(cx - 4.0, y + 3.0);
    ctx.line_to(cx, y - 5.0);
    ctx.line_to(cx + 4.0, y + 3.0);
    ctx.line_to(cx + 8.0, y - 2.0);
    ctx.line_to(cx + 12.0, y + 5.0);
    ctx.close_path();
    ctx.fill();

    // Crown jewel
    ctx.set_fill_style_str("#FF1493");
    ctx.begin_path();
    let _ = ctx.arc(cx, y - 3.0, 2.0, 0.0, TAU);
    ctx.fill();

    // Arms, counter-swinging the legs
    ctx.set_stroke_style_str("#FFE4B5");
    ctx.set_line_width(4.0);
    ctx.begin_path();
    ctx.move_to(x + 5.0, y + 20.0);
    ctx.line_to(x - 3.0 + swing * 4.0, y + 28.0);
    ctx.move_to(x + pw - 5.0, y + 20.0);
    ctx.line_to(x + pw + 3.0 - swing * 4.0, y + 28.0);
    ctx.stroke();
}

fn draw_obstacle(ctx: &CanvasRenderingContext2d, obstacle: &Obstacle) {
    let x = obstacle.pos.x as f64;
    let y = obstacle.pos.y as f64;
    let size = obstacle.kind.size();
    let ow = size.x as f64;
    let oh = size.y as f64;

    match obstacle.kind {
        ObstacleKind::Low => {
            // Rock
            ctx.set_fill_style_str("#8B4513");
            ctx.begin_path();
            ctx.move_to(x + ow / 2.0, y);
            ctx.line_to(x + ow, y + oh);
            ctx.line_to(x, y + oh);
            ctx.close_path();
            ctx.fill();
            // Texture specks
            ctx.set_fill_style_str("#654321");
            ctx.fill_rect(x + 8.0, y + 15.0, 4.0, 4.0);
            ctx.fill_rect(x + 18.0, y + 20.0, 3.0, 3.0);
        }
        ObstacleKind::Tall => {
            // Spire
            ctx.set_fill_style_str("#7A6A5A");
            ctx.begin_path();
            ctx.move_to(x + ow / 2.0, y);
            ctx.line_to(x + ow, y + oh);
            ctx.line_to(x, y + oh);
            ctx.close_path();
            ctx.fill();
            ctx.set_fill_style_str("#5E5144");
            ctx.fill_rect(x + ow / 2.0 - 2.0, y + oh * 0.4, 4.0, oh * 0.3);
        }
        ObstacleKind::Elevated => {
            // Floating slab
            ctx.set_fill_style_str("#6B8E23");
            ctx.fill_rect(x, y, ow, oh);
            ctx.set_fill_style_str("#556B2F");
            ctx.fill_rect(x, y + oh - 6.0, ow, 6.0);
        }
        ObstacleKind::Airborne => {
            // Bird: body plus wings flapping with the phase
            let cx = x + ow / 2.0;
            let cy = y + oh / 2.0;
            let flap = (obstacle.wing_phase as f64).sin() * oh / 2.0;
            ctx.set_fill_style_str("#4A4A4A");
            ctx.begin_path();
            let _ = ctx.ellipse(cx, cy, ow / 3.0, oh / 3.0, 0.0, 0.0, TAU);
            ctx.fill();
            ctx.set_stroke_style_str("#2F2F2F");
            ctx.set_line_width(3.0);
            ctx.begin_path();
            ctx.move_to(cx - ow / 3.0, cy);
            ctx.line_to(x, cy - flap);
            ctx.move_to(cx + ow / 3.0, cy);
            ctx.line_to(x + ow, cy - flap);
            ctx.stroke();
        }
    }
}

fn draw_coin(ctx: &CanvasRenderingContext2d, coin: &Coin, glow: f64) {
    let r = COIN_SIZE as f64 / 2.0;
    let cx = coin.pos.x as f64 + r;
    let cy = coin.pos.y as f64 + r;
    // Spin flattens the disc horizontally
    let rx = (r * (coin.spin as f64).cos().abs()).max(2.0);

    ctx.set_shadow_color("#FFD700");
    ctx.set_shadow_blur(6.0 + 8.0 * glow);

    ctx.set_fill_style_str("#FFD700");
    ctx.begin_path();
    let _ = ctx.ellipse(cx, cy, rx, r, 0.0, 0.0, TAU);
    ctx.fill();

    ctx.set_fill_style_str("#FFA500");
    ctx.begin_path();
    let _ = ctx.ellipse(cx, cy, rx * 0.6, r * 0.6, 0.0, 0.0, TAU);
    ctx.fill();

    ctx.set_shadow_blur(0.0);
}
