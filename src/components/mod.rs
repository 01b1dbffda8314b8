//! Value types the simulation and the menus are built from.
//!
//! Submodules overview:
//! - [`tilegrid`] – grid points, directions and the read-only tile grid
//! - [`worker`] – workers, cogs and their motion state
//! - [`menu`] – menu entries bound to world actions, cursor and focus flag

pub mod menu;
pub mod tilegrid;
pub mod worker;
