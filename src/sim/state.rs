//! Game state and core simulation types
//!
//! Everything mutable in the game lives in one `GameState` owned by the
//! caller. Presentation layers read it between frames and consume the
//! events returned by `advance`; nothing outside the engine mutates it.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::config::{Config, ConfigError};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Run ended; `advance` is inert until an explicit reset
    GameOver,
}

/// Discrete outcomes of a single `advance` call.
///
/// The audio layer maps each to a sound and the UI layer to text/flash
/// updates; the engine itself never touches either.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Player fired (one event even for a three-bullet spread volley)
    PlayerShot,
    /// An invader fired at the player
    InvaderShot,
    /// An invader was destroyed at the given position
    InvaderKilled { pos: Vec2 },
    /// The player picked up a falling power-up
    PowerUpCollected { kind: PowerUpKind },
    /// The shield absorbed a hit and is now spent
    ShieldBlock,
    /// The player was hit without a shield; the run is over
    PlayerHit,
    /// The last invader died; a faster formation has been spawned
    WaveCleared,
}

/// The player's ship. Never destroyed, only repositioned; "dead" is
/// expressed by the game phase.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Player {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// A bullet. Player and invader bullets share the shape; travel direction
/// and speed come from which collection the bullet lives in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Bullet {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// One member of the invader formation.
///
/// Invaders are flagged dead rather than removed so iteration order stays
/// the spawn-grid order for the whole wave.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Invader {
    /// Grid column at spawn
    pub col: u32,
    /// Grid row at spawn; the renderer keys its two-tone palette off this
    pub row: u32,
    pub pos: Vec2,
    /// Oscillation rest height; stepped on edge bounces
    pub base_y: f32,
    pub size: Vec2,
    pub alive: bool,
}

impl Invader {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Lower edge, the side that threatens the player's baseline.
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    RapidFire,
    SpreadShot,
    Shield,
    SpeedBoost,
}

/// A power-up capsule falling toward the player.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub size: Vec2,
}

impl PowerUp {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// Expiry timestamps for the four power-up effects, compared against the
/// engine clock. An effect is active iff `now < expiry`; collecting a kind
/// again moves its expiry instead of stacking a second window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffects {
    rapid_fire_until: f32,
    spread_shot_until: f32,
    shield_until: f32,
    speed_boost_until: f32,
}

impl ActiveEffects {
    fn expiry(&self, kind: PowerUpKind) -> f32 {
        match kind {
            PowerUpKind::RapidFire => self.rapid_fire_until,
            PowerUpKind::SpreadShot => self.spread_shot_until,
            PowerUpKind::Shield => self.shield_until,
            PowerUpKind::SpeedBoost => self.speed_boost_until,
        }
    }

    /// Open a (or refresh the) window for `kind` ending at `now + duration`.
    pub fn activate(&mut self, kind: PowerUpKind, now: f32, duration: f32) {
        let until = now + duration;
        match kind {
            PowerUpKind::RapidFire => self.rapid_fire_until = until,
            PowerUpKind::SpreadShot => self.spread_shot_until = until,
            PowerUpKind::Shield => self.shield_until = until,
            PowerUpKind::SpeedBoost => self.speed_boost_until = until,
        }
    }

    pub fn is_active(&self, kind: PowerUpKind, now: f32) -> bool {
        now < self.expiry(kind)
    }

    /// Seconds left in the effect window, for the on-screen countdown.
    pub fn remaining(&self, kind: PowerUpKind, now: f32) -> f32 {
        (self.expiry(kind) - now).max(0.0)
    }

    /// The shield is single-use: absorbing a hit spends the whole window.
    pub fn clear_shield(&mut self) {
        self.shield_until = 0.0;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Complete simulation state.
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: Config,
    pub phase: GamePhase,
    /// Monotonically non-decreasing; +kill_score per invader destroyed
    pub score: u32,
    /// Engine clock, accumulated from clamped frame deltas. Read once per
    /// frame so every expiry comparison in a frame sees the same instant.
    pub time: f32,
    pub player: Player,
    pub player_bullets: Vec<Bullet>,
    pub invader_bullets: Vec<Bullet>,
    /// Spawn-grid order; collision tie-breaks follow this order
    pub invaders: Vec<Invader>,
    pub powerups: Vec<PowerUp>,
    pub effects: ActiveEffects,
    /// Horizontal formation direction: +1 rightward, -1 leftward
    pub invader_dir: f32,
    /// Horizontal formation speed; only ever increases while running
    pub invader_speed: f32,
    /// Seconds since the current wave spawned; oscillation phase base
    pub wave_time: f32,
    /// Earliest engine time the player may fire again
    pub next_fire_at: f32,
    /// Countdown to the next invader fire decision
    pub invader_fire_timer: f32,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Build an engine from a validated configuration and an RNG seed.
    ///
    /// All randomness (drop rolls, power-up kinds, invader fire timing)
    /// flows through the seeded RNG, so equal seeds and inputs replay
    /// identical runs.
    pub fn new(config: Config, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        let player = Player {
            pos: config.player_start(),
            size: config.player_size,
        };
        let mut state = Self {
            config,
            phase: GamePhase::Running,
            score: 0,
            time: 0.0,
            player,
            player_bullets: Vec::new(),
            invader_bullets: Vec::new(),
            invaders: Vec::new(),
            powerups: Vec::new(),
            effects: ActiveEffects::default(),
            invader_dir: 1.0,
            invader_speed: 0.0,
            wave_time: 0.0,
            next_fire_at: 0.0,
            invader_fire_timer: 0.0,
            rng: Pcg32::seed_from_u64(seed),
        };
        state.reset();
        Ok(state)
    }

    /// Return to a fresh wave-one state. The only transition out of
    /// `GameOver`.
    pub fn reset(&mut self) {
        self.phase = GamePhase::Running;
        self.score = 0;
        self.time = 0.0;
        self.player.pos = self.config.player_start();
        self.player_bullets.clear();
        self.invader_bullets.clear();
        self.powerups.clear();
        self.effects.clear();
        self.invader_speed = self.config.base_invader_speed;
        self.next_fire_at = 0.0;
        self.spawn_formation();
        self.reseed_invader_fire();
        log::info!(
            "engine reset: {}x{} formation at {} px/s",
            self.config.invader_rows,
            self.config.invader_cols,
            self.invader_speed
        );
    }

    /// Rebuild the full R x C invader grid at the configured origin and
    /// restart the wave clock. Speed is left alone: wave clears hand over
    /// an escalated value, `reset` restores the base one.
    pub(crate) fn spawn_formation(&mut self) {
        let config = &self.config;
        self.invaders.clear();
        for row in 0..config.invader_rows {
            for col in 0..config.invader_cols {
                let pos = Vec2::new(
                    config.formation_origin.x + col as f32 * config.h_spacing,
                    config.formation_origin.y + row as f32 * config.v_spacing,
                );
                self.invaders.push(Invader {
                    col,
                    row,
                    pos,
                    base_y: pos.y,
                    size: config.invader_size,
                    alive: true,
                });
            }
        }
        self.invader_dir = 1.0;
        self.wave_time = 0.0;
    }

    /// Restart the invader fire countdown with a fresh random interval.
    pub(crate) fn reseed_invader_fire(&mut self) {
        self.invader_fire_timer = self
            .rng
            .random_range(self.config.fire_interval_min..=self.config.fire_interval_max);
    }

    pub fn live_invaders(&self) -> impl Iterator<Item = &Invader> {
        self.invaders.iter().filter(|inv| inv.alive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effect_window_is_half_open() {
        let mut effects = ActiveEffects::default();
        effects.activate(PowerUpKind::RapidFire, 1.0, 6.0);

        assert!(effects.is_active(PowerUpKind::RapidFire, 1.0));
        assert!(effects.is_active(PowerUpKind::RapidFire, 6.999));
        assert!(!effects.is_active(PowerUpKind::RapidFire, 7.0));
        assert!(!effects.is_active(PowerUpKind::SpreadShot, 1.0));
    }

    #[test]
    fn reactivation_extends_instead_of_stacking() {
        let mut effects = ActiveEffects::default();
        effects.activate(PowerUpKind::SpeedBoost, 0.0, 6.0);
        effects.activate(PowerUpKind::SpeedBoost, 3.0, 6.0);

        // One window, ending six seconds after the second pickup
        assert!(effects.is_active(PowerUpKind::SpeedBoost, 8.9));
        assert!(!effects.is_active(PowerUpKind::SpeedBoost, 9.0));
        assert_eq!(effects.remaining(PowerUpKind::SpeedBoost, 4.0), 5.0);
    }

    #[test]
    fn shield_block_spends_the_window() {
        let mut effects = ActiveEffects::default();
        effects.activate(PowerUpKind::Shield, 0.0, 6.0);
        assert!(effects.is_active(PowerUpKind::Shield, 2.0));

        effects.clear_shield();
        assert!(!effects.is_active(PowerUpKind::Shield, 2.0));
        assert_eq!(effects.remaining(PowerUpKind::Shield, 2.0), 0.0);
    }

    #[test]
    fn new_state_spawns_full_formation() {
        let state = GameState::new(Config::default(), 7).unwrap();
        let config = &state.config;

        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(
            state.invaders.len(),
            (config.invader_rows * config.invader_cols) as usize
        );
        assert!(state.invaders.iter().all(|inv| inv.alive));
        assert_eq!(state.invader_speed, config.base_invader_speed);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = Config {
            invader_cols: 0,
            ..Config::default()
        };
        assert!(GameState::new(config, 7).is_err());
    }
}
