//! Cosmetic cog rotation.
use std::f32::consts::TAU;

use bevy_ecs::prelude::*;

use crate::resources::menus::GameMenus;
use crate::resources::stage::{COG_SPEED, Stage};
use crate::resources::worldtime::WorldTime;

/// Run condition: no modal game menu has focus.
pub fn no_menu_focused(menus: Option<Res<GameMenus>>) -> bool {
    menus.is_none_or(|m| m.focused().is_none())
}

/// Spin the cogs of the loaded stage. Runs every unpaused frame, also while
/// a transition holds the simulation.
pub fn rotate_cogs(time: Res<WorldTime>, stage: Option<ResMut<Stage>>) {
    if let Some(mut stage) = stage {
        stage.cog_angle = (stage.cog_angle + COG_SPEED * time.delta).rem_euclid(TAU);
    }
}
