//! Headless demo runner
//!
//! Drives the simulation at a fixed 60 Hz with a scripted pilot for up to a
//! minute, reporting the events a presentation layer would consume. Doubles
//! as a smoke test and as an integration example for embedding the engine.

use pixel_invaders::Config;
use pixel_invaders::sim::{GameEvent, GamePhase, GameState, InputState, advance};

const FRAME_DT: f32 = 1.0 / 60.0;
const DEMO_FRAMES: u32 = 3600;

fn main() {
    env_logger::init();

    let mut state = GameState::new(Config::default(), 0xC0FFEE).expect("default config is valid");
    log::info!("pixel-invaders headless demo, up to {} frames", DEMO_FRAMES);

    let mut kills = 0u32;
    let mut waves = 0u32;
    for frame in 0..DEMO_FRAMES {
        let input = scripted_input(&state);
        for event in advance(&mut state, &input, FRAME_DT) {
            match event {
                GameEvent::InvaderKilled { pos } => {
                    kills += 1;
                    log::debug!("invader down at ({:.0}, {:.0})", pos.x, pos.y);
                }
                GameEvent::WaveCleared => {
                    waves += 1;
                    log::info!("wave {} cleared, speed now {} px/s", waves, state.invader_speed);
                }
                GameEvent::PowerUpCollected { kind } => log::info!("picked up {:?}", kind),
                GameEvent::ShieldBlock => log::info!("shield spent"),
                GameEvent::PlayerHit => log::info!("player hit on frame {}", frame),
                GameEvent::PlayerShot | GameEvent::InvaderShot => {}
            }
        }
        if state.phase == GamePhase::GameOver {
            break;
        }
    }

    println!(
        "final score {} ({} kills, {} waves cleared)",
        state.score, kills, waves
    );
}

/// Sway under the live formation and hold the trigger. Just enough pilot to
/// make the demo interesting; real play replaces this with the keyboard.
fn scripted_input(state: &GameState) -> InputState {
    let mut min_x = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    for inv in state.live_invaders() {
        min_x = min_x.min(inv.pos.x);
        max_x = max_x.max(inv.pos.x + inv.size.x);
    }
    let target = if min_x.is_finite() {
        (min_x + max_x) / 2.0
    } else {
        state.config.playfield_width / 2.0
    };
    let center = state.player.pos.x + state.player.size.x / 2.0;

    InputState {
        left: center > target + 2.0,
        right: center < target - 2.0,
        fire: true,
        reset: false,
    }
}
