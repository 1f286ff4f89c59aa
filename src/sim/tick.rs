//! Per-frame simulation advance
//!
//! One call per rendered frame. Everything that happens in a frame happens
//! here, in a fixed order, with no internal concurrency: movement, firing,
//! integration, formation logic, collisions, and the terminal check.

use glam::Vec2;
use rand::Rng;

use super::state::{Bullet, GameEvent, GamePhase, GameState, PowerUp, PowerUpKind};

/// Per-frame input snapshot.
///
/// The engine never listens for key events; the platform layer samples its
/// devices and hands over booleans once per frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
    /// Discrete restart trigger
    pub reset: bool,
}

/// Advance the simulation by one frame.
///
/// Returns the frame's discrete events for the audio/UI collaborators. In
/// `GameOver` the call mutates nothing and returns no events until a reset
/// is requested.
pub fn advance(state: &mut GameState, input: &InputState, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if input.reset {
        state.reset();
        return events;
    }
    if state.phase == GamePhase::GameOver {
        return events;
    }

    // Clamp large real-time gaps (tab backgrounding): slow motion for one
    // frame instead of entities tunneling through collision checks.
    let dt = dt.min(state.config.max_frame_dt);
    state.time += dt;
    state.wave_time += dt;
    // Single clock read per frame; every expiry comparison below sees the
    // same instant.
    let now = state.time;

    let config = state.config.clone();

    // Player movement
    let mut steer = 0.0;
    if input.left {
        steer -= 1.0;
    }
    if input.right {
        steer += 1.0;
    }
    let mut player_speed = config.player_speed;
    if state.effects.is_active(PowerUpKind::SpeedBoost, now) {
        player_speed *= config.boost_multiplier;
    }
    let max_x = config.playfield_width - config.player_size.x - config.side_margin;
    state.player.pos.x =
        (state.player.pos.x + steer * player_speed * dt).clamp(config.side_margin, max_x);

    // Firing: one centered bullet, or a three-bullet volley under
    // spread-shot. Rapid-fire shortens the cooldown.
    if input.fire && now >= state.next_fire_at {
        let muzzle = Vec2::new(
            state.player.pos.x + config.player_size.x / 2.0 - config.bullet_size.x / 2.0,
            state.player.pos.y - config.bullet_size.y,
        );
        let offsets: Vec<f32> = if state.effects.is_active(PowerUpKind::SpreadShot, now) {
            vec![-config.spread_offset, 0.0, config.spread_offset]
        } else {
            vec![0.0]
        };
        for dx in offsets {
            state.player_bullets.push(Bullet {
                pos: muzzle + Vec2::new(dx, 0.0),
                size: config.bullet_size,
            });
        }
        let cooldown = if state.effects.is_active(PowerUpKind::RapidFire, now) {
            config.rapid_fire_cooldown
        } else {
            config.fire_cooldown
        };
        state.next_fire_at = now + cooldown;
        events.push(GameEvent::PlayerShot);
    }

    // Bullet integration; bullets leaving the playfield vertically are gone
    for bullet in &mut state.player_bullets {
        bullet.pos.y -= config.bullet_speed * dt;
    }
    state.player_bullets.retain(|b| b.pos.y + b.size.y >= 0.0);

    for bullet in &mut state.invader_bullets {
        bullet.pos.y += config.invader_bullet_speed * dt;
    }
    state
        .invader_bullets
        .retain(|b| b.pos.y <= config.playfield_height);

    // Falling power-ups
    for powerup in &mut state.powerups {
        powerup.pos.y += config.powerup_fall_speed * dt;
    }
    state
        .powerups
        .retain(|p| p.pos.y <= config.playfield_height);

    // Formation movement: march horizontally, bob vertically around each
    // invader's base height. The phase term mixes wave time with the
    // invader's x so neighbors are visibly out of step.
    let mut min_x = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    for inv in state.invaders.iter_mut().filter(|inv| inv.alive) {
        inv.pos.x += state.invader_dir * state.invader_speed * dt;
        let phase = config.bob_frequency * state.wave_time + config.bob_phase_per_px * inv.pos.x;
        inv.pos.y = inv.base_y + config.bob_amplitude * phase.sin();
        min_x = min_x.min(inv.pos.x);
        max_x = max_x.max(inv.pos.x + inv.size.x);
    }

    // Wave clear: a fresh full formation at a strictly higher speed. Score
    // carries over, bullets do not.
    if min_x == f32::INFINITY {
        state.invader_speed += config.wave_speed_increment;
        state.player_bullets.clear();
        state.invader_bullets.clear();
        state.spawn_formation();
        events.push(GameEvent::WaveCleared);
        log::info!("wave cleared, formation speed now {} px/s", state.invader_speed);
    }

    // Edge bounce: flip direction and step the formation down. If the step
    // would land within the safety margin above the player, undo it with a
    // larger rise and escalate the speed instead of ending the run there.
    if min_x < config.side_margin || max_x > config.playfield_width - config.side_margin {
        state.invader_dir = -state.invader_dir;
        let danger_y = config.player_y() - config.safety_margin;
        let mut too_close = false;
        for inv in state.invaders.iter_mut().filter(|inv| inv.alive) {
            inv.base_y += config.step_down;
            inv.pos.y += config.step_down;
            if inv.base_y + inv.size.y >= danger_y {
                too_close = true;
            }
        }
        if too_close {
            for inv in state.invaders.iter_mut().filter(|inv| inv.alive) {
                inv.base_y -= config.corrective_rise;
                inv.pos.y -= config.corrective_rise;
            }
            state.invader_speed += config.pushback_speed_bonus;
            log::debug!(
                "formation pushed back off the player, speed now {} px/s",
                state.invader_speed
            );
        }
    }

    // Player bullets vs invaders. First live match in spawn-grid order
    // wins; a bullet kills at most once and a dead invader stops matching,
    // so each invader takes at most one hit per frame.
    let mut bi = 0;
    while bi < state.player_bullets.len() {
        let bullet_rect = state.player_bullets[bi].rect();
        let hit = state
            .invaders
            .iter_mut()
            .find(|inv| inv.alive && inv.rect().overlaps(&bullet_rect));
        match hit {
            Some(inv) => {
                inv.alive = false;
                let pos = inv.pos;
                let size = inv.size;
                state.player_bullets.remove(bi);
                state.score += config.kill_score;
                events.push(GameEvent::InvaderKilled { pos });
                if state.rng.random_bool(config.drop_chance) {
                    let kind = match state.rng.random_range(0..4) {
                        0 => PowerUpKind::RapidFire,
                        1 => PowerUpKind::SpreadShot,
                        2 => PowerUpKind::Shield,
                        _ => PowerUpKind::SpeedBoost,
                    };
                    state.powerups.push(PowerUp {
                        kind,
                        pos: pos + (size - config.powerup_size) / 2.0,
                        size: config.powerup_size,
                    });
                }
            }
            None => bi += 1,
        }
    }

    // Invader bullets vs player: an active shield eats one hit and is
    // spent; anything else ends the run.
    let player_rect = state.player.rect();
    let mut bi = 0;
    while bi < state.invader_bullets.len() {
        if state.invader_bullets[bi].rect().overlaps(&player_rect) {
            state.invader_bullets.remove(bi);
            if state.effects.is_active(PowerUpKind::Shield, now) {
                state.effects.clear_shield();
                events.push(GameEvent::ShieldBlock);
            } else if state.phase == GamePhase::Running {
                state.phase = GamePhase::GameOver;
                events.push(GameEvent::PlayerHit);
                log::info!("player hit, run over at score {}", state.score);
            }
        } else {
            bi += 1;
        }
    }

    // Power-up pickup
    let mut collected: Vec<PowerUpKind> = Vec::new();
    state.powerups.retain(|powerup| {
        if powerup.rect().overlaps(&player_rect) {
            collected.push(powerup.kind);
            false
        } else {
            true
        }
    });
    for kind in collected {
        state.effects.activate(kind, now, config.effect_duration);
        events.push(GameEvent::PowerUpCollected { kind });
    }

    // Invader fire decision: when the countdown lapses, reseed it, bucket
    // the live invaders into columns on the grid pitch, pick one column at
    // random, and let its bottom-most member shoot.
    state.invader_fire_timer -= dt;
    if state.invader_fire_timer <= 0.0 {
        state.reseed_invader_fire();

        let mut columns: Vec<i32> = state
            .live_invaders()
            .map(|inv| (inv.pos.x / config.h_spacing).round() as i32)
            .collect();
        columns.sort_unstable();
        columns.dedup();

        if !columns.is_empty() {
            let column = columns[state.rng.random_range(0..columns.len())];
            let shooter = state
                .live_invaders()
                .filter(|inv| (inv.pos.x / config.h_spacing).round() as i32 == column)
                .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
                .map(|inv| (inv.pos, inv.size));
            if let Some((pos, size)) = shooter {
                state.invader_bullets.push(Bullet {
                    pos: Vec2::new(
                        pos.x + size.x / 2.0 - config.bullet_size.x / 2.0,
                        pos.y + size.y,
                    ),
                    size: config.bullet_size,
                });
                events.push(GameEvent::InvaderShot);
            }
        }
    }

    // Baseline breach: a live invader reaching the player's row ends the
    // run, unless a shield is up, in which case the shield is spent and
    // the whole formation is thrown back upward.
    let player_top = state.player.pos.y;
    let breached = state.live_invaders().any(|inv| inv.bottom() >= player_top);
    if breached {
        if state.effects.is_active(PowerUpKind::Shield, now) {
            state.effects.clear_shield();
            for inv in state.invaders.iter_mut().filter(|inv| inv.alive) {
                inv.base_y -= config.shield_rebound;
                inv.pos.y -= config.shield_rebound;
            }
            events.push(GameEvent::ShieldBlock);
        } else if state.phase == GamePhase::Running {
            state.phase = GamePhase::GameOver;
            events.push(GameEvent::PlayerHit);
            log::info!("formation reached the player, run over at score {}", state.score);
        }
    }

    events
}
