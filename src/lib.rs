//! Cogworks library.
//!
//! A turn-based tile puzzle engine: workers move on a tile grid, cogs of
//! their colour neutralize them, and a layer of scenes, modal menus and
//! screen transitions decides when the simulation may advance. Exposed as a
//! library for the command line runner and the integration tests.

pub mod app;
pub mod components;
pub mod events;
pub mod resources;
pub mod scenes;
pub mod systems;
