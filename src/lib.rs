//! Pixel Invaders - a Space Invaders style arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, waves,
//!   power-ups, difficulty escalation)
//! - `config`: Tunable constants with construction-time validation
//!
//! The simulation is headless. An external frame scheduler calls
//! [`sim::advance`] once per rendered frame with an input snapshot; the
//! renderer draws from the returned [`sim::GameState`] fields and the
//! audio/UI layers consume the returned [`sim::GameEvent`]s. The engine
//! never calls out to any of them.

pub mod config;
pub mod sim;

pub use config::{Config, ConfigError};
