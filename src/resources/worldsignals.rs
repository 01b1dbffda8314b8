//! World-wide flags.
//!
//! Menu actions are plain `fn(&mut World)` and cannot return anything, so
//! requests that outlive the current frame are raised as named flags on
//! [`WorldSignals`] and read back by the frame loop:
//!
//! - [`QUIT_FLAG`]: leave the frame loop
//! - `settings_changed`: write the configuration file on shutdown

use bevy_ecs::prelude::Resource;
use rustc_hash::FxHashSet;

/// Raised when the application should leave its frame loop.
pub const QUIT_FLAG: &str = "quit_game";

#[derive(Debug, Clone, Default, Resource)]
pub struct WorldSignals {
    flags: FxHashSet<String>,
}

impl WorldSignals {
    pub fn set_flag(&mut self, key: impl Into<String>) {
        self.flags.insert(key.into());
    }

    pub fn clear_flag(&mut self, key: &str) {
        self.flags.remove(key);
    }

    pub fn has_flag(&self, key: &str) -> bool {
        self.flags.contains(key)
    }

    /// Clear `key`, returning whether it was raised.
    pub fn take_flag(&mut self, key: &str) -> bool {
        self.flags.remove(key)
    }
}
