//! Menu systems.
//!
//! - [`poll_menu`] feeds the frame's input to a [`Menu`] and reports what it
//!   wants done
//! - [`respond`] does it: plays the feedback sound and runs the confirmed
//!   action, either immediately or behind a covering transition
//! - [`drive_menu`] and [`run_focused_menu`] combine both for menus owned by
//!   a scene or stored in a world resource
//!
//! Actions run after the menu borrow is released, so they are free to open
//! or close other menus, including the one that called them.

use crate::components::menu::{Menu, MenuAction, MenuOutcome};
use crate::resources::audio::play_fx;
use crate::resources::input::InputState;
use crate::resources::transition::{FadeDirection, Transition};
use bevy_ecs::prelude::*;
use log::debug;

/// What a menu asked for this frame.
#[derive(Clone, Copy, Debug)]
pub struct MenuResponse {
    pub outcome: MenuOutcome,
    pub action: Option<MenuAction>,
    pub fade: Option<f32>,
}

/// Feed `input` to `menu`.
pub fn poll_menu(menu: &mut Menu, input: &InputState) -> MenuResponse {
    let outcome = menu.update(input);
    let (action, fade) = match outcome {
        MenuOutcome::Confirmed(index) => match menu.items.get(index) {
            Some(item) => (Some(item.action), item.fade),
            None => (None, None),
        },
        MenuOutcome::Cancelled => (menu.on_cancel, None),
        MenuOutcome::Idle | MenuOutcome::Moved => (None, None),
    };
    MenuResponse {
        outcome,
        action,
        fade,
    }
}

/// Carry out a response returned by [`poll_menu`].
pub fn respond(world: &mut World, response: MenuResponse) {
    match response.outcome {
        MenuOutcome::Idle => {}
        MenuOutcome::Moved => play_fx(world, "select"),
        MenuOutcome::Confirmed(index) => {
            play_fx(world, "confirm");
            debug!("Menu entry {} confirmed", index);
        }
        MenuOutcome::Cancelled => {
            if response.action.is_some() {
                play_fx(world, "cancel");
            }
        }
    }
    let Some(action) = response.action else {
        return;
    };
    match response.fade {
        Some(seconds) => {
            if let Some(mut transition) = world.get_resource_mut::<Transition>() {
                transition.activate(FadeDirection::Cover, seconds, Some(action));
            } else {
                action(world);
            }
        }
        None => action(world),
    }
}

/// Poll and respond for a menu that lives outside the world.
pub fn drive_menu(world: &mut World, menu: &mut Menu) -> MenuOutcome {
    let input = world.get_resource::<InputState>().cloned().unwrap_or_default();
    let response = poll_menu(menu, &input);
    respond(world, response);
    response.outcome
}

/// Poll and respond for the menu `focus` picks out of resource `R`.
///
/// Returns `None` when the resource is missing or no menu has focus, in
/// which case the caller owns the frame.
pub fn run_focused_menu<R: Resource>(
    world: &mut World,
    focus: fn(&mut R) -> Option<&mut Menu>,
) -> Option<MenuOutcome> {
    let input = world.get_resource::<InputState>().cloned().unwrap_or_default();
    let response = {
        let mut resource = world.get_resource_mut::<R>()?;
        let menu = focus(&mut *resource)?;
        poll_menu(menu, &input)
    };
    respond(world, response);
    Some(response.outcome)
}
