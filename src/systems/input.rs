//! Input systems.
//!
//! [`update_input_state`] polls an [`InputSource`] once per frame and writes
//! the results into [`InputState`]. The source is whatever the frontend
//! provides: a keyboard, a replay script, or a test fixture.
use bevy_ecs::prelude::*;
use rustc_hash::FxHashSet;

use crate::resources::input::{Button, InputState};

/// Raw digital input provider.
pub trait InputSource {
    /// Whether `button` is physically down right now.
    fn is_down(&self, button: Button) -> bool;
}

/// Input source holding an explicit set of pressed buttons.
#[derive(Debug, Clone, Default)]
pub struct HeldButtons {
    held: FxHashSet<Button>,
}

impl HeldButtons {
    pub fn new() -> Self {
        HeldButtons::default()
    }

    pub fn with(mut self, button: Button) -> Self {
        self.held.insert(button);
        self
    }

    pub fn press(&mut self, button: Button) {
        self.held.insert(button);
    }

    pub fn release(&mut self, button: Button) {
        self.held.remove(&button);
    }
}

impl InputSource for HeldButtons {
    fn is_down(&self, button: Button) -> bool {
        self.held.contains(&button)
    }
}

/// Poll `source` and update the `InputState` resource.
pub fn update_input_state(world: &mut World, source: &dyn InputSource) {
    let mut input = world.resource_mut::<InputState>();
    for button in Button::ALL {
        input.set(button, source.is_down(button));
    }
}
