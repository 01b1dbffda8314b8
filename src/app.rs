//! Application bootstrap and frame loop.
//!
//! [`App`] owns the ECS [`World`] with every shared resource and the
//! [`SceneManager`]. A frontend, the command line runner or a test drives
//! it one frame at a time:
//!
//! ```text
//! input snapshot -> world time -> scene manager (transition, swaps, scene)
//! ```

use bevy_ecs::prelude::*;
use log::{error, info};

use crate::resources::audio::setup_audio;
use crate::resources::gameconfig::GameConfig;
use crate::resources::input::InputState;
use crate::resources::mapstore::{MapFile, MapStore, load_maps};
use crate::resources::scene::{NextScene, SceneId, SceneParam, StageSelection};
use crate::resources::transition::{FadeDirection, Transition};
use crate::resources::worldsignals::{QUIT_FLAG, WorldSignals};
use crate::resources::worldtime::WorldTime;
use crate::scenes::game::{GameScene, SETTINGS_CHANGED_FLAG};
use crate::scenes::stagemenu::StageMenuScene;
use crate::scenes::title::TitleScene;
use crate::scenes::{SceneError, SceneManager};
use crate::systems::input::{InputSource, update_input_state};
use crate::systems::render::Renderer;
use crate::systems::time::update_world_time;

pub struct App {
    world: World,
    scenes: SceneManager,
}

impl App {
    /// Build the world and load the stage maps named by `config`.
    pub fn new(config: GameConfig) -> Self {
        let maps = load_maps(&config.maps_dir, config.max_maps);
        Self::with_maps(config, maps)
    }

    /// Build the world around an already loaded map list.
    pub fn with_maps(config: GameConfig, maps: Vec<MapFile>) -> Self {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        world.insert_resource(WorldSignals::default());
        world.insert_resource(InputState::default());
        world.insert_resource(Transition::new());
        world.insert_resource(NextScene::new());
        world.insert_resource(StageSelection::default());
        world.insert_resource(MapStore::new(maps));
        world.insert_resource(config);
        setup_audio(&mut world);

        let mut scenes = SceneManager::new();
        scenes.register(Box::new(TitleScene::new()));
        scenes.register(Box::new(StageMenuScene::new()));
        scenes.register(Box::new(GameScene::new()));

        App { world, scenes }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn scenes(&self) -> &SceneManager {
        &self.scenes
    }

    /// Activate the first scene and uncover the screen.
    pub fn start(&mut self, scene: SceneId, param: SceneParam) -> Result<(), SceneError> {
        self.scenes
            .change_active_scene(&mut self.world, scene, param)?;
        let fade = self.world.resource::<GameConfig>().fade_duration;
        self.world
            .resource_mut::<Transition>()
            .activate(FadeDirection::Uncover, fade, None);
        Ok(())
    }

    /// Run one frame of `dt` seconds with the buttons `source` reports.
    pub fn frame(&mut self, source: &dyn InputSource, dt: f32) -> Result<(), SceneError> {
        update_input_state(&mut self.world, source);
        update_world_time(&mut self.world, dt);
        self.scenes.update(&mut self.world)
    }

    pub fn draw(&self, renderer: &mut dyn Renderer) {
        self.scenes.draw(&self.world, renderer);
    }

    pub fn should_quit(&self) -> bool {
        self.world.resource::<WorldSignals>().has_flag(QUIT_FLAG)
    }

    /// Dispose the active scene and persist settings changed in game.
    pub fn shutdown(&mut self) {
        self.scenes.shutdown(&mut self.world);
        if self
            .world
            .resource_mut::<WorldSignals>()
            .take_flag(SETTINGS_CHANGED_FLAG)
        {
            match self.world.resource::<GameConfig>().save_to_file() {
                Ok(()) => info!("Settings saved"),
                Err(e) => error!("{}", e),
            }
        }
    }
}
