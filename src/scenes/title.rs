//! Title screen.
//!
//! Main menu: Play, Clear data, Quit. Clear data asks for confirmation in a
//! second menu before wiping the progress record.

use bevy_ecs::prelude::*;
use log::{error, info};

use crate::components::menu::{Menu, MenuItem};
use crate::resources::gameconfig::GameConfig;
use crate::resources::progress::progress_mut;
use crate::resources::scene::{NextScene, SceneId, SceneParam};
use crate::resources::transition::Transition;
use crate::resources::worldsignals::{QUIT_FLAG, WorldSignals};
use crate::scenes::{Scene, SceneError};
use crate::systems::menu::run_focused_menu;
use crate::systems::render::Renderer;

pub const TITLE: &str = "COGWORKS";

#[derive(Resource, Debug, Clone)]
pub struct TitleMenus {
    pub main: Menu,
    pub confirm: Menu,
}

impl TitleMenus {
    pub fn new(fade: f32) -> Self {
        let main = Menu::new(
            TITLE,
            vec![
                MenuItem::new("Play", play).with_fade(fade),
                MenuItem::new("Clear data", ask_clear),
                MenuItem::new("Quit", quit),
            ],
        );
        let confirm = Menu::new(
            "Clear all progress?",
            vec![MenuItem::new("Yes", clear_data), MenuItem::new("No", back_to_main)],
        )
        .with_cancel(back_to_main);
        TitleMenus { main, confirm }
    }

    pub fn focused_mut(&mut self) -> Option<&mut Menu> {
        if self.confirm.is_active() {
            Some(&mut self.confirm)
        } else if self.main.is_active() {
            Some(&mut self.main)
        } else {
            None
        }
    }
}

fn play(world: &mut World) {
    world
        .resource_mut::<NextScene>()
        .set(SceneId::StageMenu, SceneParam::None);
}

fn ask_clear(world: &mut World) {
    let mut menus = world.resource_mut::<TitleMenus>();
    menus.main.deactivate();
    // Default to "No".
    menus.confirm.activate(Some(1));
}

fn back_to_main(world: &mut World) {
    let mut menus = world.resource_mut::<TitleMenus>();
    menus.confirm.deactivate();
    menus.main.activate(None);
}

fn quit(world: &mut World) {
    info!("Quit requested from the title screen");
    world.resource_mut::<WorldSignals>().set_flag(QUIT_FLAG);
}

fn clear_data(world: &mut World) {
    {
        let mut store = progress_mut(world);
        store.clear();
        match store.save() {
            Ok(()) => info!("Progress cleared"),
            Err(e) => error!("Failed to clear progress: {}", e),
        }
    }
    back_to_main(world);
}

#[derive(Debug, Default)]
pub struct TitleScene;

impl TitleScene {
    pub fn new() -> Self {
        TitleScene
    }
}

impl Scene for TitleScene {
    fn id(&self) -> SceneId {
        SceneId::Title
    }

    fn init(&mut self, world: &mut World) -> Result<(), SceneError> {
        let fade = world
            .get_resource::<GameConfig>()
            .map_or(GameConfig::new().fade_duration, |c| c.fade_duration);
        world.insert_resource(TitleMenus::new(fade));
        Ok(())
    }

    fn update(&mut self, world: &mut World, _dt: f32) {
        if world
            .get_resource::<Transition>()
            .is_some_and(|t| t.is_active())
        {
            return;
        }
        run_focused_menu::<TitleMenus>(world, TitleMenus::focused_mut);
    }

    fn draw(&self, world: &World, renderer: &mut dyn Renderer) {
        renderer.begin_frame(0, 0);
        let Some(menus) = world.get_resource::<TitleMenus>() else {
            return;
        };
        if !menus.main.is_active() {
            renderer.draw_text(TITLE);
        }
        renderer.draw_menu(&menus.main);
        renderer.draw_menu(&menus.confirm);
    }

    fn dispose(&mut self, _world: &mut World) {}

    fn on_change(&mut self, world: &mut World, _param: SceneParam) -> Result<(), SceneError> {
        let mut menus = world.resource_mut::<TitleMenus>();
        menus.confirm.deactivate();
        menus.main.activate(Some(0));
        Ok(())
    }
}
