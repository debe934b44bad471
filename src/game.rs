//! Frame loop orchestration
//!
//! The display driver calls [`Game::frame`] once per refresh with a
//! monotonically increasing timestamp. Each frame while running the player
//! steps first, then the world, then the scene is rendered. The player
//! therefore collides against obstacle positions from the previous frame.

use crate::assets::{AssetLoader, Model};
use crate::renderer::Camera;
use crate::sim::{JumpInput, NullScoreSink, Player, ScoreSink, WorldManager, format_score};
use crate::tuning::Tuning;

/// Lifecycle of a game session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Waiting for the start signal
    NotStarted,
    /// Simulation steps every frame
    Running,
    /// Frames render but the simulation is frozen
    Paused,
    /// Player collided; terminal
    Over,
}

/// What a renderer gets to draw for one frame
pub struct Scene<'a> {
    pub camera: &'a Camera,
    /// Visible models (obstacles first, then the player)
    pub models: Vec<&'a Model>,
    pub phase: GamePhase,
}

/// Produces a visual frame from the current scene
pub trait Renderer {
    fn render(&mut self, scene: &Scene<'_>);
}

/// Renderer that draws nothing (headless runs)
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    pub frames: u64,
}

impl Renderer for HeadlessRenderer {
    fn render(&mut self, _scene: &Scene<'_>) {
        self.frames += 1;
    }
}

/// Everything created when the game starts
struct Session {
    player: Player,
    world: WorldManager,
}

/// Top-level game: start/pause/game-over state plus the per-frame loop
pub struct Game {
    tuning: Tuning,
    seed: u64,
    phase: GamePhase,
    session: Option<Session>,
    loader: Box<dyn AssetLoader>,
    /// Handed to the world at start
    score_sink: Option<Box<dyn ScoreSink>>,
    input: JumpInput,
    camera: Camera,
    /// Timestamp (ms) of the previous frame
    previous_time: Option<f64>,
}

impl Game {
    pub fn new(
        tuning: Tuning,
        seed: u64,
        loader: Box<dyn AssetLoader>,
        score_sink: Box<dyn ScoreSink>,
    ) -> Self {
        Self {
            tuning,
            seed,
            phase: GamePhase::NotStarted,
            session: None,
            loader,
            score_sink: Some(score_sink),
            input: JumpInput::default(),
            camera: Camera::default(),
            previous_time: None,
        }
    }

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn player(&self) -> Option<&Player> {
        self.session.as_ref().map(|s| &s.player)
    }

    pub fn world(&self) -> Option<&WorldManager> {
        self.session.as_ref().map(|s| &s.world)
    }

    /// Accumulated score (zero before start)
    pub fn score(&self) -> f64 {
        self.world().map_or(0.0, WorldManager::score)
    }

    pub fn score_text(&self) -> String {
        format_score(self.score())
    }

    /// Create the player and world and begin running. Ignored once started.
    pub fn start(&mut self) {
        if self.phase != GamePhase::NotStarted {
            log::debug!("Start ignored in phase {:?}", self.phase);
            return;
        }

        let sink = self
            .score_sink
            .take()
            .unwrap_or_else(|| Box::new(NullScoreSink));
        let world = WorldManager::new(self.tuning.clone(), self.seed, sink);
        let player = Player::new(&self.tuning, self.loader.as_mut());

        self.session = Some(Session { player, world });
        self.phase = GamePhase::Running;
        log::info!("Game started with seed: {}", self.seed);
    }

    /// Flip between running and paused; other phases are unaffected
    pub fn toggle_pause(&mut self) -> GamePhase {
        self.phase = match self.phase {
            GamePhase::Running => {
                log::info!("Paused");
                GamePhase::Paused
            }
            GamePhase::Paused => {
                log::info!("Resumed");
                GamePhase::Running
            }
            other => {
                log::debug!("Pause ignored in phase {:?}", other);
                other
            }
        };
        self.phase
    }

    pub fn press_jump(&mut self) {
        self.input.press();
    }

    pub fn release_jump(&mut self) {
        self.input.release();
    }

    /// One display refresh. Steps the simulation if running, then renders.
    /// Before start nothing happens and the timestamp is not recorded, so
    /// the first frame of a session has zero elapsed time.
    pub fn frame(&mut self, timestamp_ms: f64, renderer: &mut dyn Renderer) {
        if self.session.is_none() {
            return;
        }

        let elapsed = match self.previous_time {
            Some(previous) => ((timestamp_ms - previous) / 1000.0) as f32,
            None => 0.0,
        };

        self.step(elapsed);
        renderer.render(&self.scene());
        self.previous_time = Some(timestamp_ms);
    }

    fn step(&mut self, elapsed: f32) {
        if self.phase != GamePhase::Running {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };

        session.player.update(elapsed, &self.input, &session.world);
        session.world.update(elapsed, self.loader.as_mut());

        if session.player.is_game_over() {
            self.phase = GamePhase::Over;
            log::info!("Game over! Final score: {}", session.world.score_text());
        }
    }

    /// Current visual state
    pub fn scene(&self) -> Scene<'_> {
        let mut models = Vec::new();
        if let Some(session) = &self.session {
            models.extend(session.world.visible_models());
            models.extend(session.player.model().filter(|m| m.visible));
        }
        Scene {
            camera: &self.camera,
            models,
            phase: self.phase,
        }
    }
}
