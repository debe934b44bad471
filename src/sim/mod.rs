//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies; models arrive through
//!   [`crate::assets`] handles

pub mod bounds;
pub mod obstacle;
pub mod player;
pub mod random;
pub mod world;

pub use bounds::{Aabb, Sphere};
pub use obstacle::Obstacle;
pub use player::{JumpInput, Player, PlayerPhysics};
pub use random::{rand_int, rand_range};
pub use world::{NullScoreSink, ScoreSink, WorldManager, format_score};
