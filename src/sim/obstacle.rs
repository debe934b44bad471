//! Obstacle entity
//!
//! Owns its transform and a box collider. The collider only tracks the
//! model once the model has loaded; before that it stays empty and can
//! never register a hit.

use glam::{Quat, Vec3};

use super::bounds::Aabb;
use crate::assets::{AssetLoader, Model, ModelAsset, Visual};

/// A single spawnable obstacle
#[derive(Debug)]
pub struct Obstacle {
    /// Construction order, unique per world
    pub id: u32,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: f32,
    visible: bool,
    collider: Aabb,
    visual: Visual,
}

impl Obstacle {
    /// Create an obstacle and start loading its model
    pub fn new(id: u32, loader: &mut dyn AssetLoader) -> Self {
        Self {
            id,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: 1.0,
            visible: true,
            collider: Aabb::EMPTY,
            visual: Visual::Loading(loader.load(ModelAsset::CONE)),
        }
    }

    /// Box used by collision queries
    #[inline]
    pub fn collider(&self) -> &Aabb {
        &self.collider
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show or hide; applied to the model immediately if it has loaded
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if let Some(model) = self.visual.model_mut() {
            model.visible = visible;
        }
    }

    pub fn model(&self) -> Option<&Model> {
        self.visual.model()
    }

    pub fn is_loaded(&self) -> bool {
        self.visual.is_ready()
    }

    /// Recompute the collider from the model's current transform
    pub fn refresh_bounding_volume(&mut self) {
        if let Some(model) = self.visual.model() {
            self.collider = model.world_bounds();
        }
    }

    /// Push the entity transform into the model and refresh the collider.
    /// Does nothing while the model is still loading.
    pub fn update(&mut self, _elapsed: f32) {
        if self.visual.poll() {
            log::debug!("Obstacle {} model ready", self.id);
        }

        let Some(model) = self.visual.model_mut() else {
            return;
        };
        model.position = self.position;
        model.rotation = self.rotation;
        model.scale = Vec3::splat(self.scale);
        model.visible = self.visible;

        self.refresh_bounding_volume();
    }
}
