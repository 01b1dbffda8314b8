//! The puzzle scene.
//!
//! Each frame, in order:
//!
//! 1. cosmetic systems run (cog rotation) unless a modal menu has focus
//! 2. a running transition freezes everything else
//! 3. the focused modal menu consumes the frame
//! 4. `start`/`cancel` open Pause, `reset` restarts behind a fade
//! 5. otherwise the stage ticks with the d-pad direction; a cleared stage
//!    opens the end-of-stage menu
//!
//! Menu entries are plain functions over the world. The stage they act on
//! is the [`Stage`] resource and its number is [`StageSelection`].

use bevy_ecs::prelude::*;
use log::{error, info};

use crate::components::menu::{Menu, MenuItem};
use crate::events::audio::AudioCmd;
use crate::resources::audio::{play_fx, send_audio};
use crate::resources::gameconfig::GameConfig;
use crate::resources::input::{Button, InputState};
use crate::resources::mapstore::MapStore;
use crate::resources::menus::{GameMenus, MenuKind};
use crate::resources::progress::progress_mut;
use crate::resources::scene::{NextScene, SceneId, SceneParam, StageResult, StageSelection};
use crate::resources::stage::{ClearQuality, Stage};
use crate::resources::transition::{FadeDirection, Transition};
use crate::resources::worldsignals::WorldSignals;
use crate::scenes::{Scene, SceneError};
use crate::systems::cogs::{no_menu_focused, rotate_cogs};
use crate::systems::menu::run_focused_menu;
use crate::systems::render::{Renderer, draw_stage};
use crate::systems::resolver::Instruction;

/// Raised when a Settings toggle changed the configuration.
pub const SETTINGS_CHANGED_FLAG: &str = "settings_changed";

const SFX_ITEM: usize = 0;
const MUSIC_ITEM: usize = 1;

fn on_off(enabled: bool) -> &'static str {
    if enabled { "On" } else { "Off" }
}

/// Build the Pause, Settings and End-of-stage menus, all closed.
pub fn build_menus(config: &GameConfig) -> GameMenus {
    let fade = config.fade_duration;
    let pause = Menu::new(
        "Paused",
        vec![
            MenuItem::new("Resume", resume),
            MenuItem::new("Restart", restart_stage).with_fade(fade),
            MenuItem::new("Settings", open_settings),
            MenuItem::new("Quit", quit_to_stage_menu).with_fade(fade),
        ],
    )
    .with_cancel(resume);
    let settings = Menu::new(
        "Settings",
        vec![
            MenuItem::new(format!("SFX: {}", on_off(config.sfx)), toggle_sfx),
            MenuItem::new(format!("Music: {}", on_off(config.music)), toggle_music),
            MenuItem::new("Fullscreen", toggle_fullscreen),
            MenuItem::new("Back", back_to_pause),
        ],
    )
    .with_cancel(back_to_pause);
    let end_of_stage = Menu::new(
        "Stage clear",
        vec![
            MenuItem::new("Next stage", next_stage).with_fade(fade),
            MenuItem::new("Retry", retry_stage).with_fade(fade),
            MenuItem::new("Stage menu", leave_cleared_stage).with_fade(fade),
        ],
    );
    GameMenus::new(pause, settings, end_of_stage)
}

fn resume(world: &mut World) {
    world.resource_mut::<GameMenus>().close_pause();
}

/// Rebuild the workers of the current stage and close every menu.
pub fn restart_stage(world: &mut World) {
    if let Some(mut stage) = world.get_resource_mut::<Stage>() {
        stage.reset();
    }
    if let Some(mut menus) = world.get_resource_mut::<GameMenus>() {
        menus.close_all();
    }
}

fn open_settings(world: &mut World) {
    world.resource_mut::<GameMenus>().open_settings();
}

fn back_to_pause(world: &mut World) {
    world.resource_mut::<GameMenus>().back_to_pause();
}

fn quit_to_stage_menu(world: &mut World) {
    world
        .resource_mut::<NextScene>()
        .set(SceneId::StageMenu, SceneParam::None);
}

fn settings_changed(world: &mut World) {
    if let Some(mut signals) = world.get_resource_mut::<WorldSignals>() {
        signals.set_flag(SETTINGS_CHANGED_FLAG);
    }
}

fn toggle_sfx(world: &mut World) {
    let enabled = {
        let mut config = world.resource_mut::<GameConfig>();
        config.sfx = !config.sfx;
        config.sfx
    };
    world
        .resource_mut::<GameMenus>()
        .settings
        .set_label(SFX_ITEM, format!("SFX: {}", on_off(enabled)));
    send_audio(world, AudioCmd::SetSfx(enabled));
    settings_changed(world);
}

fn toggle_music(world: &mut World) {
    let enabled = {
        let mut config = world.resource_mut::<GameConfig>();
        config.music = !config.music;
        config.music
    };
    world
        .resource_mut::<GameMenus>()
        .settings
        .set_label(MUSIC_ITEM, format!("Music: {}", on_off(enabled)));
    send_audio(world, AudioCmd::SetMusic(enabled));
    settings_changed(world);
}

fn toggle_fullscreen(world: &mut World) {
    {
        let mut config = world.resource_mut::<GameConfig>();
        config.fullscreen = !config.fullscreen;
        info!("Fullscreen: {}", on_off(config.fullscreen));
    }
    settings_changed(world);
}

fn outcome(world: &World) -> StageResult {
    world
        .get_resource::<GameMenus>()
        .and_then(|m| m.outcome)
        .unwrap_or_else(|| StageResult {
            stage: world.get_resource::<StageSelection>().map_or(1, |s| s.index),
            quality: world
                .get_resource::<Stage>()
                .map_or(ClearQuality::None, |s| s.clear_quality()),
            advance: false,
        })
}

fn next_stage(world: &mut World) {
    let result = StageResult {
        advance: true,
        ..outcome(world)
    };
    world
        .resource_mut::<NextScene>()
        .set(SceneId::StageMenu, SceneParam::Result(result));
}

fn leave_cleared_stage(world: &mut World) {
    let result = outcome(world);
    world
        .resource_mut::<NextScene>()
        .set(SceneId::StageMenu, SceneParam::Result(result));
}

fn retry_stage(world: &mut World) {
    let result = outcome(world);
    progress_mut(world).record(result.stage, result.quality.metric());
    restart_stage(world);
}

pub struct GameScene {
    cosmetics: Schedule,
}

impl Default for GameScene {
    fn default() -> Self {
        Self::new()
    }
}

impl GameScene {
    pub fn new() -> Self {
        let mut cosmetics = Schedule::default();
        cosmetics.add_systems(rotate_cogs.run_if(no_menu_focused));
        GameScene { cosmetics }
    }

    fn tick_stage(world: &mut World, dt: f32, input: &InputState) {
        let instruction = input
            .direction()
            .map(Instruction::All)
            .unwrap_or_default();
        let report = {
            let Some(mut stage) = world.get_resource_mut::<Stage>() else {
                return;
            };
            stage.tick(dt, &instruction)
        };
        if report.started_moving {
            play_fx(world, "move");
        }
        if !report.neutralized.is_empty() {
            play_fx(world, "caught");
        }
        if report.cleared {
            let result = StageResult {
                stage: world.resource::<StageSelection>().index,
                quality: world.resource::<Stage>().clear_quality(),
                advance: false,
            };
            info!("Stage {} cleared: {:?}", result.stage, result.quality);
            world.resource_mut::<GameMenus>().open_end_of_stage(result);
            play_fx(world, "clear");
        }
    }
}

impl Scene for GameScene {
    fn id(&self) -> SceneId {
        SceneId::Game
    }

    fn init(&mut self, world: &mut World) -> Result<(), SceneError> {
        world.init_resource::<StageSelection>();
        Ok(())
    }

    fn update(&mut self, world: &mut World, dt: f32) {
        self.cosmetics.run(world);

        if world
            .get_resource::<Transition>()
            .is_some_and(|t| t.is_active())
        {
            return;
        }

        if run_focused_menu::<GameMenus>(world, GameMenus::focused_mut).is_some() {
            if let Some(mut menus) = world.get_resource_mut::<GameMenus>() {
                if menus.focused() == Some(MenuKind::EndOfStage) {
                    menus.advance_end_timer(dt);
                }
            }
            return;
        }

        let input = world.get_resource::<InputState>().cloned().unwrap_or_default();
        if input.pressed(Button::Start) || input.pressed(Button::Cancel) {
            if world.resource_mut::<GameMenus>().open_pause() {
                play_fx(world, "pause");
            }
            return;
        }
        if input.pressed(Button::Reset) {
            let fade = world
                .get_resource::<GameConfig>()
                .map_or(GameConfig::new().fade_duration, |c| c.fade_duration);
            world
                .resource_mut::<Transition>()
                .activate(FadeDirection::Cover, fade, Some(restart_stage));
            return;
        }

        Self::tick_stage(world, dt, &input);
    }

    fn draw(&self, world: &World, renderer: &mut dyn Renderer) {
        let Some(stage) = world.get_resource::<Stage>() else {
            renderer.begin_frame(0, 0);
            return;
        };
        draw_stage(renderer, stage);
        let index = world.get_resource::<StageSelection>().map_or(1, |s| s.index);
        let target = stage
            .move_target()
            .map(|t| format!("/{t}"))
            .unwrap_or_default();
        renderer.draw_text(&format!("Stage {}  Turns {}{}", index, stage.turns(), target));
        let Some(menus) = world.get_resource::<GameMenus>() else {
            return;
        };
        renderer.draw_menu(&menus.pause);
        renderer.draw_menu(&menus.settings);
        if menus.end_of_stage.is_active() {
            let perfect = menus
                .outcome
                .is_some_and(|o| o.quality == ClearQuality::Perfect);
            renderer.draw_text(if perfect { "PERFECT CLEAR!" } else { "STAGE CLEAR!" });
            renderer.draw_menu(&menus.end_of_stage);
        }
    }

    /// The [`Stage`] outlives the scene; the next [`on_change`](Scene::on_change)
    /// reloads it in place.
    fn dispose(&mut self, world: &mut World) {
        world.remove_resource::<GameMenus>();
    }

    fn on_change(&mut self, world: &mut World, param: SceneParam) -> Result<(), SceneError> {
        let config = world.get_resource::<GameConfig>().cloned().unwrap_or_default();
        let index = match param {
            SceneParam::Stage(index) => index,
            SceneParam::None | SceneParam::Result(_) => {
                world.get_resource::<StageSelection>().map_or(1, |s| s.index)
            }
        };
        let map = world
            .get_resource::<MapStore>()
            .and_then(|store| store.get(index))
            .cloned()
            .ok_or_else(|| {
                error!("Stage {} requested but not loaded", index);
                SceneError::MissingStage(index)
            })?;

        if let Some(mut stage) = world.get_resource_mut::<Stage>() {
            stage.hard_reset(&map);
        } else {
            world.insert_resource(Stage::from_map(&map, config.move_rules()));
        }
        world.insert_resource(StageSelection { index });
        world.insert_resource(build_menus(&config));
        info!("Stage {} \"{}\" loaded", index, map.name);
        Ok(())
    }
}
