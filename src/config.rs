//! Engine configuration
//!
//! Every tunable number in the simulation lives here so the core can be
//! rebalanced (or shrunk for tests) without touching gameplay code. The
//! defaults describe the classic 240x320 pixel-art build.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected configuration values, reported at construction time.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("playfield must have positive dimensions (got {0} x {1})")]
    EmptyPlayfield(f32, f32),

    #[error("formation needs at least one row and one column")]
    EmptyFormation,

    #[error("{name} must be positive (got {value})")]
    NonPositive { name: &'static str, value: f32 },

    #[error("drop chance must be within [0, 1] (got {0})")]
    DropChanceOutOfRange(f64),

    #[error("invader fire interval range is inverted ({min} > {max})")]
    InvertedFireInterval { min: f32, max: f32 },

    #[error("formation grid does not fit the playfield")]
    FormationTooLarge,
}

/// Tunable simulation constants, supplied once at engine construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // === Playfield ===
    /// Internal pixel resolution, scaled up by the presentation layer
    pub playfield_width: f32,
    pub playfield_height: f32,
    /// Horizontal no-go band on both sides, for player and formation alike
    pub side_margin: f32,
    /// Upper bound on per-frame delta time; larger pauses are clamped so a
    /// backgrounded tab cannot tunnel entities through collision checks
    pub max_frame_dt: f32,

    // === Player ===
    pub player_size: Vec2,
    /// Gap between the bottom of the playfield and the player's top edge
    pub player_baseline: f32,
    /// Horizontal speed, px/s
    pub player_speed: f32,
    /// Multiplier applied to player speed while the speed-boost effect runs
    pub boost_multiplier: f32,

    // === Bullets ===
    pub bullet_size: Vec2,
    /// Player bullet speed (upward), px/s
    pub bullet_speed: f32,
    /// Invader bullet speed (downward), px/s
    pub invader_bullet_speed: f32,
    /// Seconds between player shots
    pub fire_cooldown: f32,
    /// Cooldown while rapid-fire is active
    pub rapid_fire_cooldown: f32,
    /// Lateral muzzle offset of the two outer spread-shot bullets, px
    pub spread_offset: f32,

    // === Formation ===
    pub invader_rows: u32,
    pub invader_cols: u32,
    pub invader_size: Vec2,
    /// Column pitch of the spawn grid, also the bucket size for the
    /// fire-decision column partition
    pub h_spacing: f32,
    /// Row pitch of the spawn grid
    pub v_spacing: f32,
    /// Top-left corner of the spawn grid
    pub formation_origin: Vec2,
    /// Vertical drop applied to the formation on each edge bounce, px
    pub step_down: f32,
    /// Horizontal formation speed at wave one, px/s
    pub base_invader_speed: f32,
    /// Speed gained on every wave clear, px/s
    pub wave_speed_increment: f32,
    /// Speed gained when a bounce is pushed back off the player, px/s
    pub pushback_speed_bonus: f32,
    /// Minimum vertical gap kept between the formation and the player
    /// before the push-back rule fires, px
    pub safety_margin: f32,
    /// How far the formation is raised when a step-down is undone; larger
    /// than `step_down` so repeated bounces net upward, px
    pub corrective_rise: f32,
    /// How far the formation is thrown upward when a shield absorbs a
    /// baseline breach, px
    pub shield_rebound: f32,

    // === Invader fire ===
    /// Uniform range the fire-decision countdown is reseeded from, seconds
    pub fire_interval_min: f32,
    pub fire_interval_max: f32,

    // === Power-ups ===
    /// Probability that a killed invader drops a power-up
    pub drop_chance: f64,
    pub powerup_size: Vec2,
    /// Fall speed of a dropped power-up, px/s
    pub powerup_fall_speed: f32,
    /// Length of every effect window, seconds
    pub effect_duration: f32,

    // === Formation oscillation ===
    /// Vertical bob amplitude, px (zero disables the oscillation)
    pub bob_amplitude: f32,
    /// Bob angular frequency, rad/s
    pub bob_frequency: f32,
    /// Phase slope along the row, rad/px, so neighbors bob out of phase
    pub bob_phase_per_px: f32,

    // === Scoring ===
    pub kill_score: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            playfield_width: 240.0,
            playfield_height: 320.0,
            side_margin: 4.0,
            max_frame_dt: 1.0 / 30.0,

            player_size: Vec2::new(12.0, 8.0),
            player_baseline: 24.0,
            player_speed: 80.0,
            boost_multiplier: 1.6,

            bullet_size: Vec2::new(2.0, 4.0),
            bullet_speed: 180.0,
            invader_bullet_speed: 100.0,
            fire_cooldown: 0.22,
            rapid_fire_cooldown: 0.09,
            spread_offset: 5.0,

            invader_rows: 4,
            invader_cols: 8,
            invader_size: Vec2::new(10.0, 8.0),
            h_spacing: 20.0,
            v_spacing: 16.0,
            formation_origin: Vec2::new(20.0, 40.0),
            step_down: 8.0,
            base_invader_speed: 20.0,
            wave_speed_increment: 6.0,
            pushback_speed_bonus: 10.0,
            safety_margin: 24.0,
            corrective_rise: 16.0,
            shield_rebound: 24.0,

            fire_interval_min: 0.8,
            fire_interval_max: 2.0,

            drop_chance: 0.15,
            powerup_size: Vec2::new(8.0, 8.0),
            powerup_fall_speed: 30.0,
            effect_duration: 6.0,

            bob_amplitude: 2.0,
            bob_frequency: 6.0,
            bob_phase_per_px: 0.05,

            kill_score: 10,
        }
    }
}

impl Config {
    /// Check the configuration before the engine is allowed to run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.playfield_width <= 0.0 || self.playfield_height <= 0.0 {
            return Err(ConfigError::EmptyPlayfield(
                self.playfield_width,
                self.playfield_height,
            ));
        }
        if self.invader_rows == 0 || self.invader_cols == 0 {
            return Err(ConfigError::EmptyFormation);
        }

        for (name, value) in [
            ("player_speed", self.player_speed),
            ("boost_multiplier", self.boost_multiplier),
            ("bullet_speed", self.bullet_speed),
            ("invader_bullet_speed", self.invader_bullet_speed),
            ("fire_cooldown", self.fire_cooldown),
            ("rapid_fire_cooldown", self.rapid_fire_cooldown),
            ("h_spacing", self.h_spacing),
            ("v_spacing", self.v_spacing),
            ("base_invader_speed", self.base_invader_speed),
            ("fire_interval_min", self.fire_interval_min),
            ("powerup_fall_speed", self.powerup_fall_speed),
            ("effect_duration", self.effect_duration),
            ("max_frame_dt", self.max_frame_dt),
        ] {
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { name, value });
            }
        }

        if !(0.0..=1.0).contains(&self.drop_chance) {
            return Err(ConfigError::DropChanceOutOfRange(self.drop_chance));
        }
        if self.fire_interval_min > self.fire_interval_max {
            return Err(ConfigError::InvertedFireInterval {
                min: self.fire_interval_min,
                max: self.fire_interval_max,
            });
        }

        // The spawn grid must sit fully inside the side margins, and above
        // the player's row, or the first frame would already be lost.
        let grid_right = self.formation_origin.x
            + (self.invader_cols - 1) as f32 * self.h_spacing
            + self.invader_size.x;
        let grid_bottom = self.formation_origin.y
            + (self.invader_rows - 1) as f32 * self.v_spacing
            + self.invader_size.y;
        let player_top = self.playfield_height - self.player_baseline;
        if self.formation_origin.x < self.side_margin
            || grid_right > self.playfield_width - self.side_margin
            || grid_bottom >= player_top
        {
            return Err(ConfigError::FormationTooLarge);
        }

        Ok(())
    }

    /// Top edge of the player sprite.
    pub fn player_y(&self) -> f32 {
        self.playfield_height - self.player_baseline
    }

    /// Centered player spawn position.
    pub fn player_start(&self) -> Vec2 {
        Vec2::new(
            (self.playfield_width - self.player_size.x) / 2.0,
            self.player_y(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(Config::default().validate(), Ok(()));
    }

    #[test]
    fn zero_rows_rejected() {
        let config = Config {
            invader_rows: 0,
            ..Config::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyFormation));
    }

    #[test]
    fn negative_speed_rejected() {
        let config = Config {
            base_invader_speed: -20.0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive { name: "base_invader_speed", .. })
        ));
    }

    #[test]
    fn drop_chance_above_one_rejected() {
        let config = Config {
            drop_chance: 1.5,
            ..Config::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::DropChanceOutOfRange(1.5)));
    }

    #[test]
    fn oversized_formation_rejected() {
        let config = Config {
            invader_cols: 30,
            ..Config::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::FormationTooLarge));
    }
}
