//! Frog Dash - an endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (obstacles, jump physics, collisions)
//! - `game`: Frame loop orchestration (start/pause/game over)
//! - `assets`: Model loading behind an asynchronous handle
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser/native platform glue
//! - `tuning`: Data-driven game balance

pub mod assets;
pub mod game;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use game::{Game, GamePhase, Renderer, Scene};
pub use tuning::{ScaleTier, Tuning};

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Horizontal scroll speed of obstacles (units/s)
    pub const SCROLL_SPEED: f32 = 22.0;
    /// X coordinate where new obstacles appear
    pub const SPAWN_EDGE: f32 = 100.0;
    /// Obstacles at or behind this X are recycled
    pub const RECYCLE_EDGE: f32 = -20.0;
    /// Minimum gap between clusters
    pub const SEPARATION_DISTANCE: f32 = 20.0;
    /// Upper bound of the gap, as a multiple of the minimum
    pub const SEPARATION_SPREAD: f32 = 1.5;
    /// Flat score bonus added on every world update
    pub const SCORE_PER_UPDATE: f32 = 10.0;
    /// Digits shown on the score board
    pub const SCORE_DIGITS: usize = 5;

    /// Player launch velocity when jumping from the ground
    pub const JUMP_VELOCITY: f32 = 40.0;
    /// Constant vertical acceleration (units/s²)
    pub const GRAVITY: f32 = -75.0;
    /// Terminal fall speed
    pub const TERMINAL_VELOCITY: f32 = -100.0;
    /// Radius of the player's collision sphere
    pub const PLAYER_RADIUS: f32 = 1.0;
    /// Height the player drops in from at session start
    pub const PLAYER_START_HEIGHT: f32 = 5.0;
    /// Ground level
    pub const GROUND_Y: f32 = 0.0;
}
