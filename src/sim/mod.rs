//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and
//! deterministic:
//! - Engine-owned clock, accumulated from caller-supplied frame deltas
//! - Seeded RNG only
//! - Stable iteration order (spawn-grid order)
//! - No rendering, audio, or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::Rect;
pub use state::{
    ActiveEffects, Bullet, GameEvent, GamePhase, GameState, Invader, Player, PowerUp, PowerUpKind,
};
pub use tick::{InputState, advance};
