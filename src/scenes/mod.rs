//! Scenes and the scene manager.
//!
//! A [`Scene`] is one screen of the application. The [`SceneManager`] owns
//! every registered scene, keeps exactly one of them active and runs the
//! frame:
//!
//! 1. advance the [`Transition`], running its callback at full cover
//! 2. apply a pending [`NextScene`] request
//! 3. update the active scene
//! 4. apply a pending [`NextScene`] request again
//!
//! Scene changes are only ever applied in steps 2 and 4, outside of any
//! callback, so a callback that asks for a new scene never re-enters the
//! manager.
//!
//! Submodules:
//! - [`title`] – title screen with Play / Clear data / Quit
//! - [`stagemenu`] – stage select grid, completion record
//! - [`game`] – the puzzle itself with its modal menus

pub mod game;
pub mod stagemenu;
pub mod title;

use std::fmt;

use bevy_ecs::prelude::World;
use log::{debug, info};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::resources::scene::{NextScene, SceneId, SceneParam};
use crate::resources::transition::Transition;
use crate::resources::worldtime::WorldTime;
use crate::systems::render::Renderer;
use crate::systems::transition::update_transition;

/// Longest chain of scene changes applied in one frame step.
pub const MAX_SCENE_HOPS: usize = 8;

/// Wiring errors. These are fatal: they mean a scene asked for something
/// the application was never set up to provide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    NotRegistered(SceneId),
    /// The stage with this number does not exist.
    MissingStage(usize),
    /// Scenes kept requesting each other without settling.
    TooManyHops(SceneId),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::NotRegistered(id) => write!(f, "scene '{}' is not registered", id.name()),
            SceneError::MissingStage(n) => write!(f, "stage {} does not exist", n),
            SceneError::TooManyHops(id) => write!(
                f,
                "more than {} scene changes in one frame, last to '{}'",
                MAX_SCENE_HOPS,
                id.name()
            ),
        }
    }
}

impl std::error::Error for SceneError {}

pub trait Scene {
    fn id(&self) -> SceneId;

    fn name(&self) -> &'static str {
        self.id().name()
    }

    /// Called once, the first time the scene becomes active.
    fn init(&mut self, world: &mut World) -> Result<(), SceneError>;

    fn update(&mut self, world: &mut World, dt: f32);

    fn draw(&self, world: &World, renderer: &mut dyn Renderer);

    /// Called when another scene replaces this one.
    fn dispose(&mut self, world: &mut World);

    /// Called every time the scene becomes active, after `init`.
    fn on_change(&mut self, world: &mut World, param: SceneParam) -> Result<(), SceneError>;
}

#[derive(Default)]
pub struct SceneManager {
    scenes: FxHashMap<SceneId, Box<dyn Scene>>,
    initialized: FxHashSet<SceneId>,
    active: Option<SceneId>,
}

impl SceneManager {
    pub fn new() -> Self {
        SceneManager::default()
    }

    /// Register `scene`, replacing a scene with the same id.
    pub fn register(&mut self, scene: Box<dyn Scene>) {
        let id = scene.id();
        self.initialized.remove(&id);
        self.scenes.insert(id, scene);
    }

    pub fn is_registered(&self, id: SceneId) -> bool {
        self.scenes.contains_key(&id)
    }

    pub fn active(&self) -> Option<SceneId> {
        self.active
    }

    /// Swap the active scene now. Prefer requesting changes through
    /// [`NextScene`] from inside scenes and callbacks.
    pub fn change_active_scene(
        &mut self,
        world: &mut World,
        id: SceneId,
        param: SceneParam,
    ) -> Result<(), SceneError> {
        if !self.scenes.contains_key(&id) {
            return Err(SceneError::NotRegistered(id));
        }
        if let Some(current) = self.active.take() {
            if let Some(scene) = self.scenes.get_mut(&current) {
                debug!("Disposing scene '{}'", current.name());
                scene.dispose(world);
            }
        }
        let scene = self
            .scenes
            .get_mut(&id)
            .ok_or(SceneError::NotRegistered(id))?;
        if self.initialized.insert(id) {
            debug!("Initializing scene '{}'", id.name());
            scene.init(world)?;
        }
        scene.on_change(world, param)?;
        self.active = Some(id);
        info!("Active scene is now '{}' ({:?})", id.name(), param);
        Ok(())
    }

    /// Apply pending [`NextScene`] requests. Returns whether the active
    /// scene changed.
    pub fn apply_pending(&mut self, world: &mut World) -> Result<bool, SceneError> {
        let mut hops = 0;
        loop {
            let request = world
                .get_resource_mut::<NextScene>()
                .and_then(|mut next| next.take());
            let Some((id, param)) = request else {
                break;
            };
            hops += 1;
            if hops > MAX_SCENE_HOPS {
                return Err(SceneError::TooManyHops(id));
            }
            self.change_active_scene(world, id, param)?;
        }
        Ok(hops > 0)
    }

    /// Run one frame. Input and world time must already be updated.
    pub fn update(&mut self, world: &mut World) -> Result<(), SceneError> {
        update_transition(world);
        self.apply_pending(world)?;
        let dt = world
            .get_resource::<WorldTime>()
            .map(|t| t.delta)
            .unwrap_or(0.0);
        if let Some(scene) = self.active.and_then(|id| self.scenes.get_mut(&id)) {
            scene.update(world, dt);
        }
        self.apply_pending(world)?;
        Ok(())
    }

    /// Draw the active scene, then the fade overlay.
    pub fn draw(&self, world: &World, renderer: &mut dyn Renderer) {
        if let Some(scene) = self.active.and_then(|id| self.scenes.get(&id)) {
            scene.draw(world, renderer);
        }
        if let Some(transition) = world.get_resource::<Transition>() {
            renderer.draw_fade(transition.fade_alpha());
        }
    }

    /// Dispose the active scene.
    pub fn shutdown(&mut self, world: &mut World) {
        if let Some(id) = self.active.take() {
            if let Some(scene) = self.scenes.get_mut(&id) {
                scene.dispose(world);
            }
        }
    }
}
