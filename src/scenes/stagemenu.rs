//! Stage select scene.
//!
//! Shows a 6 × 4 grid of stage slots with the completion of each stage.
//! The cursor is the [`StageSelection`] resource, so the transition
//! callback that starts a stage reads the slot that was confirmed.
//!
//! Finished stages come back here with a [`SceneParam::Result`]: the result
//! is recorded in the [`ProgressStore`] and, when asked to advance, the next
//! stage starts straight away.

use bevy_ecs::prelude::*;
use log::{info, warn};

use crate::resources::audio::play_fx;
use crate::resources::gameconfig::GameConfig;
use crate::resources::input::{Button, InputState};
use crate::resources::mapstore::{MapStore, load_maps};
use crate::resources::progress::ProgressStore;
use crate::resources::scene::{NextScene, SceneId, SceneParam, StageResult, StageSelection};
use crate::resources::stage::ClearQuality;
use crate::resources::transition::{FadeDirection, Transition};
use crate::scenes::{Scene, SceneError};
use crate::systems::render::Renderer;

pub const GRID_WIDTH: usize = 6;
pub const GRID_HEIGHT: usize = 4;
pub const GRID_SLOTS: usize = GRID_WIDTH * GRID_HEIGHT;

/// Transition callback: start the selected stage.
pub fn go_to_stage(world: &mut World) {
    let index = world.resource::<StageSelection>().index;
    world
        .resource_mut::<NextScene>()
        .set(SceneId::Game, SceneParam::Stage(index));
}

/// Transition callback: back to the title screen.
pub fn go_to_title(world: &mut World) {
    world
        .resource_mut::<NextScene>()
        .set(SceneId::Title, SceneParam::None);
}

/// Move a 1-based slot by `(dx, dy)` on the grid, wrapping inside the row
/// or column.
pub fn step_slot(index: usize, dx: i32, dy: i32) -> usize {
    let slot = index.clamp(1, GRID_SLOTS) - 1;
    let x = (slot % GRID_WIDTH) as i32;
    let y = (slot / GRID_WIDTH) as i32;
    let x = (x + dx).rem_euclid(GRID_WIDTH as i32) as usize;
    let y = (y + dy).rem_euclid(GRID_HEIGHT as i32) as usize;
    y * GRID_WIDTH + x + 1
}

fn quality_mark(metric: i32) -> char {
    match ClearQuality::from_metric(metric) {
        ClearQuality::None => ' ',
        ClearQuality::Cleared => '+',
        ClearQuality::Perfect => '*',
    }
}

/// Record `result` and, when asked to, queue the next stage.
fn accept_result(world: &mut World, result: StageResult) {
    if let Some(mut store) = world.get_resource_mut::<ProgressStore>() {
        if store.record(result.stage, result.quality.metric()) {
            info!(
                "Stage {} improved to {:?}",
                result.stage, result.quality
            );
        }
    }
    let stage_count = world.get_resource::<MapStore>().map_or(0, |m| m.len());
    let mut index = result.stage;
    if result.advance {
        if result.stage < stage_count {
            index = result.stage + 1;
            world
                .resource_mut::<NextScene>()
                .set(SceneId::Game, SceneParam::Stage(index));
        } else {
            info!("Stage {} was the last one", result.stage);
        }
    }
    world.resource_mut::<StageSelection>().index = index.max(1);
}

#[derive(Debug, Default)]
pub struct StageMenuScene;

impl StageMenuScene {
    pub fn new() -> Self {
        StageMenuScene
    }
}

impl Scene for StageMenuScene {
    fn id(&self) -> SceneId {
        SceneId::StageMenu
    }

    fn init(&mut self, world: &mut World) -> Result<(), SceneError> {
        let config = world.get_resource::<GameConfig>().cloned().unwrap_or_default();
        if !world.contains_resource::<MapStore>() {
            let maps = load_maps(&config.maps_dir, config.max_maps);
            world.insert_resource(MapStore::new(maps));
        }
        let count = world.resource::<MapStore>().len();
        if count == 0 {
            warn!("No stage maps found in {:?}", config.maps_dir);
        }
        world.insert_resource(ProgressStore::load(config.save_path.clone(), count));
        world.init_resource::<StageSelection>();
        Ok(())
    }

    fn update(&mut self, world: &mut World, _dt: f32) {
        if world
            .get_resource::<Transition>()
            .is_some_and(|t| t.is_active())
        {
            return;
        }
        let input = world.get_resource::<InputState>().cloned().unwrap_or_default();
        let fade = world
            .get_resource::<GameConfig>()
            .map_or(GameConfig::new().fade_duration, |c| c.fade_duration);

        let (dx, dy) = (input.horizontal_step(), input.vertical_step());
        if dx != 0 || dy != 0 {
            {
                let mut selection = world.resource_mut::<StageSelection>();
                selection.index = step_slot(selection.index, dx, dy);
            }
            play_fx(world, "select");
            return;
        }

        if input.pressed(Button::Confirm) {
            let index = world.resource::<StageSelection>().index;
            let exists = world
                .get_resource::<MapStore>()
                .is_some_and(|m| m.get(index).is_some());
            if exists {
                play_fx(world, "confirm");
                world.resource_mut::<Transition>().activate(
                    FadeDirection::Cover,
                    fade,
                    Some(go_to_stage),
                );
            } else {
                info!("Stage {} is not available", index);
                play_fx(world, "reject");
            }
            return;
        }

        if input.pressed(Button::Cancel) {
            play_fx(world, "cancel");
            world
                .resource_mut::<Transition>()
                .activate(FadeDirection::Cover, fade, Some(go_to_title));
        }
    }

    fn draw(&self, world: &World, renderer: &mut dyn Renderer) {
        renderer.begin_frame(0, 0);
        renderer.draw_text("Choose a stage");
        let selected = world.get_resource::<StageSelection>().map_or(1, |s| s.index);
        let maps = world.get_resource::<MapStore>();
        let progress = world.get_resource::<ProgressStore>();
        let count = maps.map_or(0, |m| m.len());
        for row in 0..GRID_HEIGHT {
            let line: Vec<String> = (0..GRID_WIDTH)
                .map(|col| {
                    let index = row * GRID_WIDTH + col + 1;
                    let (open, close) = if index == selected { ('[', ']') } else { (' ', ' ') };
                    if index <= count {
                        let mark = quality_mark(progress.map_or(0, |p| p.get(index)));
                        format!("{open}{index:02}{mark}{close}")
                    } else {
                        format!("{open}-- {close}")
                    }
                })
                .collect();
            renderer.draw_text(line.join("").trim_end());
        }
        if let Some(map) = maps.and_then(|m| m.get(selected)) {
            renderer.draw_text(&format!(
                "\"{}\"  difficulty {}",
                map.name, map.difficulty
            ));
        }
    }

    fn dispose(&mut self, _world: &mut World) {}

    fn on_change(&mut self, world: &mut World, param: SceneParam) -> Result<(), SceneError> {
        match param {
            SceneParam::Result(result) => accept_result(world, result),
            SceneParam::Stage(index) => {
                world.resource_mut::<StageSelection>().index = index.max(1);
            }
            SceneParam::None => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_wrap_inside_rows_and_columns() {
        assert_eq!(step_slot(1, 1, 0), 2);
        assert_eq!(step_slot(1, -1, 0), 6);
        assert_eq!(step_slot(6, 1, 0), 1);
        assert_eq!(step_slot(1, 0, -1), 19);
        assert_eq!(step_slot(19, 0, 1), 1);
        assert_eq!(step_slot(24, 1, 1), 1);
        // Out-of-grid selections are pulled back onto the grid first.
        assert_eq!(step_slot(40, 0, 0), 24);
    }

    #[test]
    fn marks_follow_quality() {
        assert_eq!(quality_mark(0), ' ');
        assert_eq!(quality_mark(1), '+');
        assert_eq!(quality_mark(2), '*');
    }
}
