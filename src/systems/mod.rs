//! Engine systems.
//!
//! This module groups the functions that advance the world each frame.
//!
//! Submodules overview
//! - [`cogs`] – cosmetic cog rotation, run on a bevy `Schedule`
//! - [`input`] – poll an input source into [`crate::resources::input::InputState`]
//! - [`menu`] – drive menus and run the confirmed actions
//! - [`render`] – draw intents and the text renderer
//! - [`resolver`] – plan and apply worker moves against one occupancy snapshot
//! - [`time`] – update simulation time and delta
//! - [`transition`] – advance the screen transition and run its callback

pub mod cogs;
pub mod input;
pub mod menu;
pub mod render;
pub mod resolver;
pub mod time;
pub mod transition;
