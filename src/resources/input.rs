//! Per-frame digital input resource.
//!
//! Captures the buttons the game cares about and exposes them to scenes via
//! the [`InputState`] resource. Raw up/down polling is turned into
//! edge-triggered [`ButtonState`]s by
//! [`update_input_state`](crate::systems::input::update_input_state):
//! `Pressed` and `Released` last exactly one frame per physical transition.

use bevy_ecs::prelude::*;

use crate::components::tilegrid::Direction;

/// Logical buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    /// Accept the highlighted menu entry.
    Confirm,
    /// Back out of a menu; opens the pause menu in game.
    Cancel,
    /// Opens the pause menu in game.
    Start,
    /// Restarts the current stage.
    Reset,
}

impl Button {
    pub const ALL: [Button; 8] = [
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
        Button::Confirm,
        Button::Cancel,
        Button::Start,
        Button::Reset,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Button::Up => "up",
            Button::Down => "down",
            Button::Left => "left",
            Button::Right => "right",
            Button::Confirm => "confirm",
            Button::Cancel => "cancel",
            Button::Start => "start",
            Button::Reset => "reset",
        }
    }

    pub fn from_name(name: &str) -> Option<Button> {
        Button::ALL
            .iter()
            .copied()
            .find(|b| b.name().eq_ignore_ascii_case(name.trim()))
    }
}

/// Edge-triggered state of a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ButtonState {
    #[default]
    Up,
    Pressed,
    Held,
    Released,
}

impl ButtonState {
    /// Pressed this frame or held from an earlier one.
    pub fn is_down(self) -> bool {
        matches!(self, ButtonState::Pressed | ButtonState::Held)
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Boolean button state.
pub struct BoolState {
    /// Whether the button is currently down.
    pub active: bool,
    /// Whether the button went down this frame.
    pub just_pressed: bool,
    /// Whether the button went up this frame.
    pub just_released: bool,
}

impl BoolState {
    /// Feed the raw level for this frame.
    pub fn set(&mut self, down: bool) {
        self.just_pressed = down && !self.active;
        self.just_released = !down && self.active;
        self.active = down;
    }

    pub fn state(&self) -> ButtonState {
        match (self.active, self.just_pressed, self.just_released) {
            (true, true, _) => ButtonState::Pressed,
            (true, false, _) => ButtonState::Held,
            (false, _, true) => ButtonState::Released,
            (false, _, false) => ButtonState::Up,
        }
    }
}

/// Resource capturing the per-frame button states.
#[derive(Resource, Debug, Clone, Default)]
pub struct InputState {
    buttons: [BoolState; Button::ALL.len()],
}

impl InputState {
    pub fn button(&self, button: Button) -> ButtonState {
        self.buttons[button.index()].state()
    }

    pub fn button_by_name(&self, name: &str) -> ButtonState {
        Button::from_name(name)
            .map(|b| self.button(b))
            .unwrap_or_default()
    }

    pub fn pressed(&self, button: Button) -> bool {
        self.button(button) == ButtonState::Pressed
    }

    pub fn is_down(&self, button: Button) -> bool {
        self.button(button).is_down()
    }

    /// Feed the raw level of one button.
    pub fn set(&mut self, button: Button, down: bool) {
        self.buttons[button.index()].set(down);
    }

    /// Direction held on the d-pad, checked in up, down, left, right order.
    pub fn direction(&self) -> Option<Direction> {
        [
            (Button::Up, Direction::Up),
            (Button::Down, Direction::Down),
            (Button::Left, Direction::Left),
            (Button::Right, Direction::Right),
        ]
        .into_iter()
        .find(|(b, _)| self.is_down(*b))
        .map(|(_, d)| d)
    }

    /// Vertical menu navigation pressed this frame: `-1` up, `1` down.
    pub fn vertical_step(&self) -> i32 {
        if self.pressed(Button::Up) {
            -1
        } else if self.pressed(Button::Down) {
            1
        } else {
            0
        }
    }

    /// Horizontal navigation pressed this frame: `-1` left, `1` right.
    pub fn horizontal_step(&self) -> i32 {
        if self.pressed(Button::Left) {
            -1
        } else if self.pressed(Button::Right) {
            1
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolstate_default() {
        let bs = BoolState::default();
        assert!(!bs.active);
        assert!(!bs.just_pressed);
        assert!(!bs.just_released);
        assert_eq!(bs.state(), ButtonState::Up);
    }

    #[test]
    fn test_edges_fire_once() {
        let mut bs = BoolState::default();
        bs.set(true);
        assert_eq!(bs.state(), ButtonState::Pressed);
        bs.set(true);
        assert_eq!(bs.state(), ButtonState::Held);
        bs.set(false);
        assert_eq!(bs.state(), ButtonState::Released);
        bs.set(false);
        assert_eq!(bs.state(), ButtonState::Up);
    }

    #[test]
    fn test_button_names() {
        for b in Button::ALL {
            assert_eq!(Button::from_name(b.name()), Some(b));
        }
        assert_eq!(Button::from_name(" Confirm "), Some(Button::Confirm));
        assert_eq!(Button::from_name("jump"), None);
    }

    #[test]
    fn test_direction_priority() {
        let mut input = InputState::default();
        assert_eq!(input.direction(), None);
        input.set(Button::Right, true);
        input.set(Button::Down, true);
        assert_eq!(input.direction(), Some(Direction::Down));
        assert_eq!(input.button_by_name("right"), ButtonState::Pressed);
        assert_eq!(input.button_by_name("nothing"), ButtonState::Up);
    }
}
