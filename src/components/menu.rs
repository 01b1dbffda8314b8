use bevy_ecs::prelude::World;

use crate::resources::input::{Button, InputState};

/// Work bound to a menu entry.
pub type MenuAction = fn(&mut World);

#[derive(Clone, Debug)]
pub struct MenuItem {
    pub label: String,
    pub action: MenuAction,
    /// When set, the action runs as the callback of a covering transition
    /// of this many seconds per phase instead of immediately.
    pub fade: Option<f32>,
}

impl MenuItem {
    pub fn new(label: impl Into<String>, action: MenuAction) -> Self {
        Self {
            label: label.into(),
            action,
            fade: None,
        }
    }

    pub fn with_fade(mut self, seconds: f32) -> Self {
        self.fade = Some(seconds);
        self
    }
}

/// What a menu did with this frame's input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuOutcome {
    /// Inactive, or no relevant button pressed.
    Idle,
    /// The cursor moved.
    Moved,
    /// Entry at this index was confirmed.
    Confirmed(usize),
    Cancelled,
}

#[derive(Clone, Debug)]
pub struct Menu {
    pub title: String,
    pub items: Vec<MenuItem>,
    pub cursor: usize,
    pub active: bool,
    /// Run when cancel is pressed; cancel is ignored when unset.
    pub on_cancel: Option<MenuAction>,
}

impl Menu {
    pub fn new(title: impl Into<String>, items: Vec<MenuItem>) -> Self {
        Self {
            title: title.into(),
            items,
            cursor: 0,
            active: false,
            on_cancel: None,
        }
    }

    pub fn with_cancel(mut self, action: MenuAction) -> Self {
        self.on_cancel = Some(action);
        self
    }

    /// Activate with the cursor on `cursor`, or keep the current cursor
    /// when `None`.
    pub fn activate(&mut self, cursor: Option<usize>) {
        if let Some(cursor) = cursor {
            self.cursor = if self.items.is_empty() {
                0
            } else {
                cursor.min(self.items.len() - 1)
            };
        }
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn selected(&self) -> Option<&MenuItem> {
        self.items.get(self.cursor)
    }

    /// Move the cursor by `step` entries, wrapping at both ends.
    pub fn move_cursor(&mut self, step: i32) {
        let len = self.items.len() as i32;
        if len == 0 || step == 0 {
            return;
        }
        self.cursor = (self.cursor as i32 + step).rem_euclid(len) as usize;
    }

    pub fn set_label(&mut self, index: usize, label: impl Into<String>) {
        if let Some(item) = self.items.get_mut(index) {
            item.label = label.into();
        }
    }

    /// Consume this frame's input.
    pub fn update(&mut self, input: &InputState) -> MenuOutcome {
        if !self.active {
            return MenuOutcome::Idle;
        }
        if input.pressed(Button::Confirm) && !self.items.is_empty() {
            return MenuOutcome::Confirmed(self.cursor);
        }
        if input.pressed(Button::Cancel) {
            return MenuOutcome::Cancelled;
        }
        let step = input.vertical_step();
        if step != 0 && !self.items.is_empty() {
            self.move_cursor(step);
            return MenuOutcome::Moved;
        }
        MenuOutcome::Idle
    }
}
