//! Message types exchanged between the core and the frontend.
//!
//! Submodules:
//! - [`audio`] – audio intents written by scenes and menus

pub mod audio;
