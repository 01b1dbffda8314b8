//! ECS resources made available to scenes and systems.
//!
//! This module groups the long-lived data injected into the ECS world:
//! the loaded stage, menus, transition, input, timing, configuration and
//! persistence. Each submodule documents the semantics and intended usage
//! of its resource(s).
//!
//! Overview
//! - `audio` – mailbox of audio intents
//! - `gameconfig` – INI configuration
//! - `input` – per-frame edge-triggered button state
//! - `mapstore` – stage maps loaded from disk
//! - `menus` – modal menus of the game scene and their focus rules
//! - `progress` – per-stage completion record
//! - `scene` – scene identity, change requests and the selected stage
//! - `stage` – the puzzle being played
//! - `transition` – screen fade gating scene changes
//! - `worldsignals` – global flags
//! - `worldtime` – simulation time and delta
pub mod audio;
pub mod gameconfig;
pub mod input;
pub mod mapstore;
pub mod menus;
pub mod progress;
pub mod scene;
pub mod stage;
pub mod transition;
pub mod worldsignals;
pub mod worldtime;
