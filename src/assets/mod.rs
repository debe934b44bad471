//! Model assets and asynchronous loading
//!
//! Loading is fire-and-forget from the simulation's point of view: a loader
//! hands back an [`AssetTicket`] immediately and fulfils the matching
//! [`AssetPromise`] whenever the model is ready. Entities hold a [`Visual`]
//! and poll it during their own update, so completion is always observed on
//! the simulation's single thread. A promise that is dropped unresolved
//! leaves its entity loading forever, which is an accepted degradation.

pub mod obj;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use glam::{Affine3A, Quat, Vec3};
use thiserror::Error;

use crate::sim::Aabb;

/// Colour used when a material library has no diffuse entry
const DEFAULT_COLOR: [f32; 4] = [0.7, 0.7, 0.7, 1.0];

/// A model/material file pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelAsset {
    pub name: &'static str,
    pub obj: &'static str,
    pub mtl: &'static str,
}

impl ModelAsset {
    pub const FROG: Self = Self {
        name: "frog",
        obj: "assets/frog.obj",
        mtl: "assets/frog.mtl",
    };

    pub const CONE: Self = Self {
        name: "cone",
        obj: "assets/cone.obj",
        mtl: "assets/cone.mtl",
    };
}

/// Asset decoding/fetching failures
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("{file}:{line}: {reason}")]
    Malformed {
        file: &'static str,
        line: usize,
        reason: String,
    },
    #[error("{0} contains no vertices")]
    NoGeometry(&'static str),
    #[error("no embedded data for asset '{0}'")]
    Unknown(&'static str),
}

/// A loaded visual representation with a settable transform
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub asset: ModelAsset,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub visible: bool,
    /// Extents of the mesh in model space
    pub local_bounds: Aabb,
    /// Flat diffuse colour (RGBA)
    pub color: [f32; 4],
}

impl Model {
    pub fn new(asset: ModelAsset, local_bounds: Aabb, color: [f32; 4]) -> Self {
        Self {
            asset,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            visible: true,
            local_bounds,
            color,
        }
    }

    /// Decode a model from its OBJ and MTL sources
    pub fn from_sources(asset: ModelAsset, obj_src: &str, mtl_src: &str) -> Result<Self, AssetError> {
        let bounds = obj::parse_obj_bounds(asset.obj, obj_src)?;
        let color = obj::parse_mtl_color(asset.mtl, mtl_src)?
            .map(|[r, g, b]| [r, g, b, 1.0])
            .unwrap_or(DEFAULT_COLOR);
        Ok(Self::new(asset, bounds, color))
    }

    pub fn transform(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// World-space box around the transformed mesh
    pub fn world_bounds(&self) -> Aabb {
        self.local_bounds.transformed(&self.transform())
    }
}

type Slot = Rc<RefCell<Option<Model>>>;

/// Loader side of a pending model
pub struct AssetPromise {
    slot: Slot,
}

impl AssetPromise {
    pub fn resolve(self, model: Model) {
        *self.slot.borrow_mut() = Some(model);
    }
}

/// Entity side of a pending model
#[derive(Debug)]
pub struct AssetTicket {
    slot: Slot,
}

impl AssetTicket {
    /// Take the model if the loader has delivered it
    pub fn try_take(&mut self) -> Option<Model> {
        self.slot.borrow_mut().take()
    }

    /// True when the promise was dropped without a model: it will never resolve.
    pub fn is_abandoned(&self) -> bool {
        Rc::strong_count(&self.slot) == 1 && self.slot.borrow().is_none()
    }
}

/// Create a linked promise/ticket pair
pub fn asset_channel() -> (AssetPromise, AssetTicket) {
    let slot: Slot = Rc::new(RefCell::new(None));
    (AssetPromise { slot: slot.clone() }, AssetTicket { slot })
}

/// An entity's visual representation: either still loading or ready
#[derive(Debug)]
pub enum Visual {
    Loading(AssetTicket),
    Ready(Model),
}

impl Visual {
    /// Swap in the model if it has arrived. Returns true on the transition.
    pub fn poll(&mut self) -> bool {
        let arrived = match self {
            Visual::Loading(ticket) => ticket.try_take(),
            Visual::Ready(_) => None,
        };
        match arrived {
            Some(model) => {
                *self = Visual::Ready(model);
                true
            }
            None => false,
        }
    }

    pub fn model(&self) -> Option<&Model> {
        match self {
            Visual::Ready(model) => Some(model),
            Visual::Loading(_) => None,
        }
    }

    pub fn model_mut(&mut self) -> Option<&mut Model> {
        match self {
            Visual::Ready(model) => Some(model),
            Visual::Loading(_) => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Visual::Ready(_))
    }
}

/// Anything that can start loading a model
pub trait AssetLoader {
    fn load(&mut self, asset: ModelAsset) -> AssetTicket;
}

/// Loads the models compiled into the binary; resolves immediately
#[derive(Default)]
pub struct EmbeddedLoader {
    cache: HashMap<ModelAsset, Model>,
}

impl EmbeddedLoader {
    pub fn new() -> Self {
        Self::default()
    }

    fn sources(asset: ModelAsset) -> Option<(&'static str, &'static str)> {
        match asset.name {
            "frog" => Some((
                include_str!("../../assets/frog.obj"),
                include_str!("../../assets/frog.mtl"),
            )),
            "cone" => Some((
                include_str!("../../assets/cone.obj"),
                include_str!("../../assets/cone.mtl"),
            )),
            _ => None,
        }
    }

    fn decode(&mut self, asset: ModelAsset) -> Result<Model, AssetError> {
        if let Some(model) = self.cache.get(&asset) {
            return Ok(model.clone());
        }
        let (obj_src, mtl_src) = Self::sources(asset).ok_or(AssetError::Unknown(asset.name))?;
        let model = Model::from_sources(asset, obj_src, mtl_src)?;
        self.cache.insert(asset, model.clone());
        Ok(model)
    }
}

impl AssetLoader for EmbeddedLoader {
    fn load(&mut self, asset: ModelAsset) -> AssetTicket {
        let (promise, ticket) = asset_channel();
        match self.decode(asset) {
            Ok(model) => promise.resolve(model),
            Err(e) => log::warn!("Model '{}' unavailable: {}", asset.name, e),
        }
        ticket
    }
}


#[cfg(test)]
mod tests {
    use super::testing::DeferredLoader;
    use super::*;

    #[test]
    fn test_embedded_models_decode() {
        let mut loader = EmbeddedLoader::new();
        for asset in [ModelAsset::FROG, ModelAsset::CONE] {
            let mut ticket = loader.load(asset);
            let model = ticket.try_take().expect("embedded load resolves immediately");
            assert_eq!(model.asset, asset);
            assert!(!model.local_bounds.is_empty());
        }
    }

    #[test]
    fn test_cone_is_unit_sized() {
        let mut ticket = EmbeddedLoader::new().load(ModelAsset::CONE);
        let cone = ticket.try_take().unwrap();
        let size = cone.local_bounds.size();
        assert!((size.x - 1.0).abs() < 1e-4);
        assert!((size.y - 1.0).abs() < 1e-4);
        assert_eq!(cone.local_bounds.min.y, 0.0);
    }

    #[test]
    fn test_unknown_asset_never_resolves() {
        let bogus = ModelAsset {
            name: "bogus",
            obj: "assets/bogus.obj",
            mtl: "assets/bogus.mtl",
        };
        let mut ticket = EmbeddedLoader::new().load(bogus);
        assert!(ticket.try_take().is_none());
        assert!(ticket.is_abandoned());
    }

    #[test]
    fn test_visual_swaps_in_when_resolved() {
        let mut loader = DeferredLoader::default();
        let mut visual = Visual::Loading(loader.load(ModelAsset::CONE));

        assert!(!visual.poll());
        assert!(visual.model().is_none());

        loader.resolve_all();
        assert!(visual.poll());
        assert!(visual.is_ready());
        // Second poll is a no-op
        assert!(!visual.poll());
    }

    #[test]
    fn test_pending_ticket_not_abandoned() {
        let mut loader = DeferredLoader::default();
        let ticket = loader.load(ModelAsset::FROG);
        assert!(!ticket.is_abandoned());
        loader.abandon_all();
        assert!(ticket.is_abandoned());
    }

    #[test]
    fn test_world_bounds_follow_transform() {
        let mut model = Model::new(
            ModelAsset::CONE,
            Aabb::new(Vec3::new(-0.5, 0.0, -0.5), Vec3::new(0.5, 1.0, 0.5)),
            DEFAULT_COLOR,
        );
        model.position = Vec3::new(50.0, 0.0, 0.0);
        model.scale = Vec3::splat(2.0);
        let b = model.world_bounds();
        assert!((b.min - Vec3::new(49.0, 0.0, -1.0)).length() < 1e-4);
        assert!((b.max - Vec3::new(51.0, 2.0, 1.0)).length() < 1e-4);
    }
}
