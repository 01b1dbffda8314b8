//! Modal menus of the game scene.
//!
//! [`GameMenus`] owns the three modal instances and is the only place that
//! changes which one has focus:
//!
//! - Pause and Settings are mutually exclusive; Settings is only reachable
//!   from Pause and closing it gives focus back to Pause.
//! - End-of-stage supersedes both once the stage is cleared.

use std::f32::consts::TAU;

use bevy_ecs::prelude::Resource;
use log::debug;

use crate::components::menu::Menu;
use crate::resources::scene::StageResult;

/// Pulse speed of the end-of-stage banner, radians per second.
pub const END_TIMER_SPEED: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuKind {
    Pause,
    Settings,
    EndOfStage,
}

#[derive(Resource, Debug, Clone)]
pub struct GameMenus {
    pub pause: Menu,
    pub settings: Menu,
    pub end_of_stage: Menu,
    /// Banner animation phase while the end-of-stage menu is open.
    pub end_timer: f32,
    /// Result of the cleared stage, set when the end-of-stage menu opens.
    pub outcome: Option<StageResult>,
}

impl GameMenus {
    pub fn new(pause: Menu, settings: Menu, end_of_stage: Menu) -> Self {
        let mut menus = GameMenus {
            pause,
            settings,
            end_of_stage,
            end_timer: 0.0,
            outcome: None,
        };
        menus.close_all();
        menus
    }

    /// The menu consuming input, innermost first.
    pub fn focused(&self) -> Option<MenuKind> {
        if self.end_of_stage.is_active() {
            Some(MenuKind::EndOfStage)
        } else if self.settings.is_active() {
            Some(MenuKind::Settings)
        } else if self.pause.is_active() {
            Some(MenuKind::Pause)
        } else {
            None
        }
    }

    pub fn focused_mut(&mut self) -> Option<&mut Menu> {
        let kind = self.focused()?;
        Some(self.menu_mut(kind))
    }

    pub fn menu_mut(&mut self, kind: MenuKind) -> &mut Menu {
        match kind {
            MenuKind::Pause => &mut self.pause,
            MenuKind::Settings => &mut self.settings,
            MenuKind::EndOfStage => &mut self.end_of_stage,
        }
    }

    /// Open Pause with the cursor on its first entry. Ignored once the
    /// end-of-stage menu is open.
    pub fn open_pause(&mut self) -> bool {
        if self.end_of_stage.is_active() {
            return false;
        }
        self.settings.deactivate();
        self.pause.activate(Some(0));
        debug!("Pause opened");
        true
    }

    pub fn close_pause(&mut self) {
        self.pause.deactivate();
        self.settings.deactivate();
    }

    /// Hand focus from Pause to Settings, cursor on the last entry.
    pub fn open_settings(&mut self) {
        self.pause.deactivate();
        let last = self.settings.items.len().saturating_sub(1);
        self.settings.activate(Some(last));
        debug!("Settings opened");
    }

    /// Close Settings and give focus back to Pause, keeping its cursor.
    pub fn back_to_pause(&mut self) {
        self.settings.deactivate();
        self.pause.activate(None);
        debug!("Settings closed, back to pause");
    }

    pub fn open_end_of_stage(&mut self, outcome: StageResult) {
        self.pause.deactivate();
        self.settings.deactivate();
        self.end_of_stage.activate(Some(0));
        self.end_timer = 0.0;
        self.outcome = Some(outcome);
        debug!("End of stage menu opened: {:?}", outcome);
    }

    pub fn close_all(&mut self) {
        self.pause.deactivate();
        self.settings.deactivate();
        self.end_of_stage.deactivate();
        self.end_timer = 0.0;
        self.outcome = None;
    }

    pub fn advance_end_timer(&mut self, dt: f32) {
        self.end_timer = (self.end_timer + END_TIMER_SPEED * dt).rem_euclid(TAU);
    }
}
