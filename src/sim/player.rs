//! Player entity
//!
//! Vertical jump physics and collision against the world's obstacles.
//! Only the Y component of the position ever changes.

use glam::{Quat, Vec3};

use super::bounds::Sphere;
use super::obstacle::Obstacle;
use super::world::WorldManager;
use crate::assets::{AssetLoader, Model, ModelAsset, Visual};
use crate::consts::GROUND_Y;
use crate::tuning::Tuning;

/// Held/released state of the jump control
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JumpInput {
    held: bool,
}

impl JumpInput {
    pub fn press(&mut self) {
        self.held = true;
    }

    pub fn release(&mut self) {
        self.held = false;
    }

    #[inline]
    pub fn is_held(&self) -> bool {
        self.held
    }
}

/// Jump/fall constants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerPhysics {
    pub jump_velocity: f32,
    pub gravity: f32,
    pub terminal_velocity: f32,
    pub radius: f32,
}

impl From<&Tuning> for PlayerPhysics {
    fn from(tuning: &Tuning) -> Self {
        Self {
            jump_velocity: tuning.jump_velocity,
            gravity: tuning.gravity,
            terminal_velocity: tuning.terminal_velocity,
            radius: tuning.player_radius,
        }
    }
}

/// The frog
#[derive(Debug)]
pub struct Player {
    position: Vec3,
    velocity: f32,
    bounds: Sphere,
    game_over: bool,
    physics: PlayerPhysics,
    visual: Visual,
}

impl Player {
    pub fn new(tuning: &Tuning, loader: &mut dyn AssetLoader) -> Self {
        let position = Vec3::new(0.0, tuning.player_start_height, 0.0);
        let physics = PlayerPhysics::from(tuning);
        Self {
            position,
            velocity: 0.0,
            bounds: Sphere::new(position, physics.radius),
            game_over: false,
            physics,
            visual: Visual::Loading(loader.load(ModelAsset::FROG)),
        }
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    #[inline]
    pub fn bounds(&self) -> &Sphere {
        &self.bounds
    }

    /// Set on the first collision and never cleared
    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn model(&self) -> Option<&Model> {
        self.visual.model()
    }

    #[inline]
    pub fn on_ground(&self) -> bool {
        self.position.y == GROUND_Y
    }

    /// Integrate one step, then check collisions if the model has loaded.
    ///
    /// Launch only happens from the ground, so a held key does not
    /// re-launch while airborne.
    pub fn update(&mut self, elapsed: f32, input: &JumpInput, world: &WorldManager) {
        if input.is_held() && self.on_ground() {
            self.velocity = self.physics.jump_velocity;
        }

        let acceleration = self.physics.gravity * elapsed;

        self.position.y += elapsed * (self.velocity + acceleration * 0.5);
        self.position.y = self.position.y.max(GROUND_Y);

        self.velocity += acceleration;
        self.velocity = self.velocity.max(self.physics.terminal_velocity);

        if self.visual.poll() {
            log::debug!("Player model ready");
        }

        let Some(model) = self.visual.model_mut() else {
            return;
        };
        // Imported sideways; face down the track
        model.rotation = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        model.position = self.position;

        self.check_collision(world.colliders());
    }

    fn check_collision(&mut self, colliders: &[Obstacle]) {
        self.bounds = Sphere::new(self.position, self.physics.radius);

        let hit = colliders
            .iter()
            .any(|obstacle| self.bounds.intersects_box(obstacle.collider()));

        if hit && !self.game_over {
            log::info!("Player hit an obstacle at height {:.2}", self.position.y);
            self.game_over = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::EmbeddedLoader;
    use crate::assets::testing::DeferredLoader;
    use crate::sim::world::NullScoreSink;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn grounded_tuning() -> Tuning {
        Tuning {
            player_start_height: 0.0,
            ..Tuning::default()
        }
    }

    fn empty_world() -> WorldManager {
        WorldManager::new(Tuning::default(), 1, Box::new(NullScoreSink))
    }

    fn held() -> JumpInput {
        let mut input = JumpInput::default();
        input.press();
        input
    }

    #[test]
    fn test_jump_single_step() {
        let world = empty_world();
        let mut player = Player::new(&grounded_tuning(), &mut EmbeddedLoader::new());

        player.update(0.1, &held(), &world);

        assert!((player.position().y - 3.625).abs() < 1e-5);
        assert!((player.velocity() - 32.5).abs() < 1e-5);
    }

    #[test]
    fn test_jump_trajectory_peak() {
        let world = empty_world();
        let mut loader = EmbeddedLoader::new();

        let run = |loader: &mut EmbeddedLoader| {
            let mut player = Player::new(&grounded_tuning(), loader);
            let mut input = held();
            let mut peak = (0usize, 0.0f32);
            for frame in 1..=60 {
                player.update(DT, &input, &world);
                input.release();
                if player.position().y > peak.1 {
                    peak = (frame, player.position().y);
                }
            }
            peak
        };

        let (frame, height) = run(&mut loader);
        // v² / 2g = 1600 / 150, reached at t = 40/75 = 32 frames
        assert_eq!(frame, 32);
        assert!((height - 32.0 / 3.0).abs() < 1e-3, "peak {height}");
        assert_eq!(run(&mut loader), (frame, height));
    }

    #[test]
    fn test_held_jump_does_not_relaunch_midair() {
        let world = empty_world();
        let mut player = Player::new(&grounded_tuning(), &mut EmbeddedLoader::new());
        let input = held();

        player.update(DT, &input, &world);
        let mut last_velocity = player.velocity();
        while !player.on_ground() {
            player.update(DT, &input, &world);
            if !player.on_ground() {
                assert!(player.velocity() < last_velocity);
            }
            last_velocity = player.velocity();
        }
        // Back on the ground with the key still held: launches again
        player.update(DT, &input, &world);
        assert!(player.position().y > 0.0);
    }

    #[test]
    fn test_terminal_velocity() {
        let world = empty_world();
        let tuning = Tuning {
            player_start_height: 10_000.0,
            ..Tuning::default()
        };
        let mut player = Player::new(&tuning, &mut EmbeddedLoader::new());
        for _ in 0..600 {
            player.update(DT, &JumpInput::default(), &world);
        }
        assert_eq!(player.velocity(), -100.0);
    }

    #[test]
    fn test_collision_sets_game_over() {
        let mut loader = EmbeddedLoader::new();
        let mut world = empty_world();
        world.place_obstacle(0.5, 2.0, &mut loader);
        let mut player = Player::new(&grounded_tuning(), &mut loader);

        player.update(DT, &JumpInput::default(), &world);

        assert!(player.is_game_over());
    }

    #[test]
    fn test_no_collision_when_clear() {
        let mut loader = EmbeddedLoader::new();
        let mut world = empty_world();
        world.place_obstacle(10.0, 2.0, &mut loader);
        let mut player = Player::new(&grounded_tuning(), &mut loader);

        player.update(DT, &JumpInput::default(), &world);

        assert!(!player.is_game_over());
        assert_eq!(player.bounds().center, player.position());
    }

    #[test]
    fn test_jumping_clears_obstacle() {
        let mut loader = EmbeddedLoader::new();
        let mut world = empty_world();
        world.place_obstacle(0.0, 2.0, &mut loader);
        let mut player = Player::new(&grounded_tuning(), &mut loader);
        // High enough above a 2-unit cone
        player.position.y = 5.0;

        player.update(DT, &JumpInput::default(), &world);

        assert!(!player.is_game_over());
    }

    #[test]
    fn test_unloaded_player_skips_collision() {
        let mut obstacles = EmbeddedLoader::new();
        let mut world = empty_world();
        world.place_obstacle(0.0, 2.0, &mut obstacles);

        let mut frog = DeferredLoader::default();
        let mut player = Player::new(&grounded_tuning(), &mut frog);
        player.update(DT, &JumpInput::default(), &world);
        assert!(!player.is_game_over());

        frog.resolve_all();
        player.update(DT, &JumpInput::default(), &world);
        assert!(player.is_game_over());
        assert_eq!(player.model().unwrap().position, player.position());
    }

    proptest! {
        #[test]
        fn prop_ground_clamp(steps in proptest::collection::vec(0.001f32..0.1, 1..200)) {
            let world = empty_world();
            let mut player = Player::new(&Tuning::default(), &mut EmbeddedLoader::new());
            let idle = JumpInput::default();
            for elapsed in steps {
                player.update(elapsed, &idle, &world);
                prop_assert!(player.position().y >= 0.0);
            }
            for _ in 0..60 {
                player.update(DT, &idle, &world);
            }
            prop_assert_eq!(player.position().y, 0.0);
        }

        #[test]
        fn prop_game_over_is_sticky(offsets in proptest::collection::vec(-50.0f32..50.0, 1..50)) {
            let mut loader = EmbeddedLoader::new();
            let mut world = empty_world();
            world.place_obstacle(0.0, 2.0, &mut loader);
            let mut player = Player::new(&grounded_tuning(), &mut loader);
            player.update(DT, &JumpInput::default(), &world);
            prop_assert!(player.is_game_over());

            for x in offsets {
                let obstacle = world.obstacle_mut(0);
                obstacle.position.x = x;
                obstacle.update(0.0);
                player.update(DT, &held(), &world);
                prop_assert!(player.is_game_over());
            }
        }
    }
}
