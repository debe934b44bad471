//! Game balance
//!
//! Every gameplay constant can be overridden from a (partial) JSON document.
//! Missing fields keep their defaults from [`crate::consts`].

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// One obstacle size class: every obstacle in a cluster shares the scale,
/// and a cluster holds between 1 and `max_cluster` of them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleTier {
    pub scale: f32,
    pub max_cluster: u32,
}

/// Gameplay tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === World ===
    /// Obstacle scroll speed (units/s)
    pub scroll_speed: f32,
    /// X coordinate where clusters spawn
    pub spawn_edge: f32,
    /// Obstacles at or behind this X return to the pool
    pub recycle_edge: f32,
    /// Minimum gap before the next cluster
    pub base_separation: f32,
    /// Gap is drawn from `[base, base * spread)`
    pub separation_spread: f32,
    /// Available obstacle size classes (picked uniformly)
    pub tiers: Vec<ScaleTier>,
    /// Flat score bonus per world update
    pub score_per_update: f32,

    // === Player ===
    pub jump_velocity: f32,
    pub gravity: f32,
    pub terminal_velocity: f32,
    pub player_radius: f32,
    pub player_start_height: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            scroll_speed: SCROLL_SPEED,
            spawn_edge: SPAWN_EDGE,
            recycle_edge: RECYCLE_EDGE,
            base_separation: SEPARATION_DISTANCE,
            separation_spread: SEPARATION_SPREAD,
            tiers: vec![
                ScaleTier {
                    scale: 2.0,
                    max_cluster: 2,
                },
                ScaleTier {
                    scale: 3.5,
                    max_cluster: 3,
                },
            ],
            score_per_update: SCORE_PER_UPDATE,

            jump_velocity: JUMP_VELOCITY,
            gravity: GRAVITY,
            terminal_velocity: TERMINAL_VELOCITY,
            player_radius: PLAYER_RADIUS,
            player_start_height: PLAYER_START_HEIGHT,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse overrides, falling back to defaults on malformed input
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring malformed tuning ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Upper bound of the next-cluster gap
    pub fn max_separation(&self) -> f32 {
        self.base_separation * self.separation_spread
    }
}
