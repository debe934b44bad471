//! World manager
//!
//! Owns every obstacle ever created. An obstacle is always in exactly one of
//! two places: the active list (spawn order, scrolling toward the player) or
//! the recycle pool. Obstacles are never dropped; leaving the screen moves
//! them to the pool and the next spawn takes them back out.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::obstacle::Obstacle;
use super::random::{rand_int, rand_range};
use crate::assets::{AssetLoader, Model};
use crate::consts::SCORE_DIGITS;
use crate::tuning::Tuning;

/// Receives the formatted score whenever it changes
pub trait ScoreSink {
    fn show_score(&mut self, text: &str);
}

/// Discards score updates
#[derive(Debug, Default)]
pub struct NullScoreSink;

impl ScoreSink for NullScoreSink {
    fn show_score(&mut self, _text: &str) {}
}

/// Rounded score, zero-padded to the score board width
pub fn format_score(score: f64) -> String {
    format!("{:0width$}", score.round() as u64, width = SCORE_DIGITS)
}

/// Obstacle lifecycle, scrolling and scoring
pub struct WorldManager {
    tuning: Tuning,
    rng: Pcg32,
    /// On screen, in spawn order
    active: Vec<Obstacle>,
    /// Off screen, waiting for reuse
    pool: Vec<Obstacle>,
    /// Obstacles constructed so far (also the next id)
    created: u32,
    score: f64,
    score_text: String,
    next_spawn_threshold: f32,
    score_sink: Box<dyn ScoreSink>,
}

impl WorldManager {
    pub fn new(tuning: Tuning, seed: u64, score_sink: Box<dyn ScoreSink>) -> Self {
        let next_spawn_threshold = tuning.base_separation;
        Self {
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            active: Vec::new(),
            pool: Vec::new(),
            created: 0,
            score: 0.0,
            score_text: format_score(0.0),
            next_spawn_threshold,
            score_sink,
        }
    }

    /// Obstacles the player can collide with (read-only)
    #[inline]
    pub fn colliders(&self) -> &[Obstacle] {
        &self.active
    }

    /// Obstacles waiting in the recycle pool
    #[inline]
    pub fn recycled(&self) -> &[Obstacle] {
        &self.pool
    }

    /// Number of obstacles constructed so far
    #[inline]
    pub fn created(&self) -> u32 {
        self.created
    }

    #[inline]
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Text last sent to the score sink
    #[inline]
    pub fn score_text(&self) -> &str {
        &self.score_text
    }

    #[inline]
    pub fn next_spawn_threshold(&self) -> f32 {
        self.next_spawn_threshold
    }

    /// Loaded, visible obstacle models
    pub fn visible_models(&self) -> impl Iterator<Item = &Model> {
        self.active
            .iter()
            .filter_map(Obstacle::model)
            .filter(|m| m.visible)
    }

    /// Advance one frame: spawn, scroll/recycle, score
    pub fn update(&mut self, elapsed: f32, loader: &mut dyn AssetLoader) {
        self.maybe_spawn(loader);
        self.update_colliders(elapsed);
        self.update_score(elapsed);
    }

    /// X of the newest obstacle, or the sentinel when none are active
    fn last_object_position(&self) -> f32 {
        self.active
            .last()
            .map(|o| o.position.x)
            .unwrap_or(self.tuning.base_separation)
    }

    fn maybe_spawn(&mut self, loader: &mut dyn AssetLoader) {
        let last = self.last_object_position();
        if (self.tuning.spawn_edge - last).abs() > self.next_spawn_threshold {
            self.spawn_cluster(loader);
            self.next_spawn_threshold = rand_range(
                &mut self.rng,
                self.tuning.base_separation,
                self.tuning.max_separation(),
            );
        }
    }

    fn spawn_cluster(&mut self, loader: &mut dyn AssetLoader) {
        let Some(last_tier) = self.tuning.tiers.len().checked_sub(1) else {
            log::debug!("No obstacle tiers configured, skipping spawn");
            return;
        };
        let tier = self.tuning.tiers[rand_int(&mut self.rng, 0, last_tier as u32) as usize];
        let count = rand_int(&mut self.rng, 1, tier.max_cluster);

        for i in 0..count {
            self.spawn_obstacle(tier.scale, i as f32 * tier.scale, loader);
        }
        log::debug!(
            "Spawned cluster of {} (scale {}), active={} pooled={}",
            count,
            tier.scale,
            self.active.len(),
            self.pool.len()
        );
    }

    fn spawn_obstacle(&mut self, scale: f32, offset: f32, loader: &mut dyn AssetLoader) {
        let mut obstacle = match self.pool.pop() {
            Some(mut reused) => {
                reused.set_visible(true);
                reused
            }
            None => {
                self.created += 1;
                log::debug!("Constructing obstacle {}", self.created);
                Obstacle::new(self.created, loader)
            }
        };
        obstacle.position = Vec3::new(self.tuning.spawn_edge + offset, 0.0, 0.0);
        obstacle.scale = scale;
        self.active.push(obstacle);
    }

    /// Scroll every active obstacle; anything at or past the recycle edge
    /// goes back to the pool, the rest refresh their colliders.
    fn update_colliders(&mut self, elapsed: f32) {
        let step = elapsed * self.tuning.scroll_speed;
        let recycle_edge = self.tuning.recycle_edge;

        let mut still_active = Vec::with_capacity(self.active.len());
        for mut obstacle in std::mem::take(&mut self.active) {
            obstacle.position.x -= step;

            if obstacle.position.x <= recycle_edge {
                obstacle.set_visible(false);
                self.pool.push(obstacle);
            } else {
                obstacle.update(elapsed);
                still_active.push(obstacle);
            }
        }
        self.active = still_active;
    }

    fn update_score(&mut self, elapsed: f32) {
        self.score += f64::from(elapsed) + f64::from(self.tuning.score_per_update);

        let text = format_score(self.score);
        if text != self.score_text {
            self.score_sink.show_score(&text);
            self.score_text = text;
        }
    }
}

#[cfg(test)]
impl WorldManager {
    /// Place one obstacle at `x` and bring its collider up to date
    pub(crate) fn place_obstacle(&mut self, x: f32, scale: f32, loader: &mut dyn AssetLoader) {
        self.spawn_obstacle(scale, 0.0, loader);
        if let Some(obstacle) = self.active.last_mut() {
            obstacle.position.x = x;
            obstacle.update(0.0);
        }
    }

    pub(crate) fn obstacle_mut(&mut self, index: usize) -> &mut Obstacle {
        &mut self.active[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::EmbeddedLoader;
    use crate::assets::testing::DeferredLoader;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;

    struct RecordingSink(Rc<RefCell<Vec<String>>>);

    impl ScoreSink for RecordingSink {
        fn show_score(&mut self, text: &str) {
            self.0.borrow_mut().push(text.to_string());
        }
    }

    fn world(seed: u64) -> WorldManager {
        WorldManager::new(Tuning::default(), seed, Box::new(NullScoreSink))
    }

    /// Every constructed obstacle is in exactly one place
    fn assert_pool_invariant(world: &WorldManager) {
        let ids: Vec<u32> = world
            .active
            .iter()
            .chain(world.pool.iter())
            .map(|o| o.id)
            .collect();
        let unique: HashSet<u32> = ids.iter().copied().collect();
        assert_eq!(ids.len(), world.created as usize);
        assert_eq!(unique.len(), ids.len());
        assert!(unique.iter().all(|id| (1..=world.created).contains(id)));
    }

    #[test]
    fn test_first_update_spawns_cluster() {
        let mut loader = EmbeddedLoader::new();
        let mut world = world(1);

        world.update(0.0, &mut loader);

        let n = world.colliders().len();
        assert!((1..=3).contains(&n), "cluster size {n}");
        assert_eq!(world.created(), n as u32);
        let first_x = world.colliders()[0].position.x;
        assert_eq!(first_x, 100.0);
        // Obstacles in a cluster sit one scale apart
        let scale = world.colliders()[0].scale;
        for (i, o) in world.colliders().iter().enumerate() {
            assert_eq!(o.scale, scale);
            assert!((o.position.x - (100.0 + i as f32 * scale)).abs() < 1e-4);
        }
    }

    #[test]
    fn test_threshold_redrawn_in_range() {
        let mut loader = EmbeddedLoader::new();
        let mut world = world(9);
        for _ in 0..500 {
            world.update(1.0 / 60.0, &mut loader);
            let t = world.next_spawn_threshold();
            assert!((20.0..=30.0).contains(&t), "threshold {t}");
        }
    }

    #[test]
    fn test_spawn_cadence_boundary() {
        let mut loader = EmbeddedLoader::new();
        let mut world = world(3);
        world.spawn_obstacle(2.0, 0.0, &mut loader);
        world.next_spawn_threshold = 25.0;

        // Gap exactly equal to the threshold: no spawn
        world.active[0].position.x = 75.0;
        world.maybe_spawn(&mut loader);
        assert_eq!(world.colliders().len(), 1);

        // Gap just past it: exactly one cluster
        world.active[0].position.x = 74.9;
        world.maybe_spawn(&mut loader);
        let after_spawn = world.colliders().len();
        assert!(after_spawn > 1);

        // The new cluster sits at the spawn edge, so nothing more spawns
        world.maybe_spawn(&mut loader);
        assert_eq!(world.colliders().len(), after_spawn);
    }

    #[test]
    fn test_scroll_keeps_obstacle_above_recycle_edge() {
        let mut loader = EmbeddedLoader::new();
        let mut world = world(5);
        world.spawn_obstacle(2.0, 0.0, &mut loader);
        world.active[0].position.x = 5.0;

        world.update_colliders(1.0);

        assert_eq!(world.colliders().len(), 1);
        assert_eq!(world.colliders()[0].position.x, -17.0);
        assert!(world.recycled().is_empty());
    }

    #[test]
    fn test_scroll_to_recycle_edge_recycles() {
        let mut loader = EmbeddedLoader::new();
        let mut world = world(5);
        world.spawn_obstacle(2.0, 0.0, &mut loader);
        world.active[0].position.x = 2.0;

        world.update_colliders(1.0);

        assert!(world.colliders().is_empty());
        assert_eq!(world.recycled().len(), 1);
        assert!(!world.recycled()[0].is_visible());
        assert_pool_invariant(&world);
    }

    #[test]
    fn test_spawn_reuses_pooled_obstacle() {
        let mut loader = EmbeddedLoader::new();
        let mut world = world(5);
        world.spawn_obstacle(2.0, 0.0, &mut loader);
        world.active[0].position.x = -30.0;
        world.update_colliders(0.0);
        assert_eq!(world.recycled().len(), 1);

        world.spawn_obstacle(3.5, 0.0, &mut loader);

        assert_eq!(world.created(), 1);
        assert!(world.recycled().is_empty());
        let reused = &world.colliders()[0];
        assert_eq!(reused.id, 1);
        assert!(reused.is_visible());
        assert_eq!(reused.position.x, 100.0);
        assert_eq!(reused.scale, 3.5);
    }

    #[test]
    fn test_collider_fresh_after_update() {
        let mut loader = EmbeddedLoader::new();
        let mut world = world(11);
        world.update(0.1, &mut loader);
        for o in world.colliders() {
            let center = o.collider().center();
            assert!((center.x - o.position.x).abs() < 1e-3);
        }
    }

    #[test]
    fn test_unloaded_obstacles_still_scroll() {
        let mut loader = DeferredLoader::default();
        let mut world = world(2);
        world.update(0.5, &mut loader);

        assert!(loader.pending() > 0);
        assert!(world.colliders().iter().all(|o| o.collider().is_empty()));
        assert!(world.colliders()[0].position.x < 100.0);
        assert_eq!(world.visible_models().count(), 0);

        loader.resolve_all();
        world.update(0.0, &mut loader);
        assert!(world.colliders().iter().all(|o| !o.collider().is_empty()));
        assert_eq!(world.visible_models().count(), world.colliders().len());
    }

    #[test]
    fn test_score_accrues_flat_bonus() {
        let mut loader = EmbeddedLoader::new();
        let mut world = world(1);
        world.update(0.5, &mut loader);
        assert!((world.score() - 10.5).abs() < 1e-9);
        assert_eq!(world.score_text(), "00011");
    }

    #[test]
    fn test_score_sink_only_on_change() {
        let shown = Rc::new(RefCell::new(Vec::new()));
        let tuning = Tuning {
            score_per_update: 0.25,
            ..Tuning::default()
        };
        let mut world = WorldManager::new(tuning, 1, Box::new(RecordingSink(shown.clone())));
        let mut loader = EmbeddedLoader::new();

        for _ in 0..6 {
            world.update(0.0, &mut loader);
        }

        assert_eq!(*shown.borrow(), vec!["00001".to_string(), "00002".to_string()]);
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(0.0), "00000");
        assert_eq!(format_score(42.4), "00042");
        assert_eq!(format_score(12345.6), "12346");
        assert_eq!(format_score(123456.0), "123456");
    }

    #[test]
    fn test_long_run_reuses_pool() {
        let mut loader = EmbeddedLoader::new();
        let mut world = world(77);
        for _ in 0..60 * 120 {
            world.update(1.0 / 60.0, &mut loader);
        }
        assert_pool_invariant(&world);
        // Two minutes of play never needs more than a screenful of obstacles
        assert!(world.created() < 40, "created {}", world.created());
        assert!(world.colliders().iter().all(|o| o.position.x > -20.0));
    }

    proptest! {
        #[test]
        fn prop_pool_membership_is_exclusive(
            seed in any::<u64>(),
            steps in proptest::collection::vec(0.0f32..0.5, 1..300),
        ) {
            let mut loader = EmbeddedLoader::new();
            let mut world = world(seed);
            for elapsed in steps {
                world.update(elapsed, &mut loader);
                assert_pool_invariant(&world);
                prop_assert!(world.colliders().iter().all(|o| o.is_visible()));
                prop_assert!(world.recycled().iter().all(|o| !o.is_visible()));
            }
        }

        #[test]
        fn prop_score_increments_by_elapsed_plus_bonus(
            steps in proptest::collection::vec(0.0f32..2.0, 1..100),
        ) {
            let mut loader = EmbeddedLoader::new();
            let mut world = world(4);
            for elapsed in steps {
                let before = world.score();
                world.update(elapsed, &mut loader);
                let delta = world.score() - before;
                prop_assert!((delta - (f64::from(elapsed) + 10.0)).abs() < 1e-6);
                prop_assert_eq!(world.score_text(), format_score(world.score()));
            }
        }
    }
}
