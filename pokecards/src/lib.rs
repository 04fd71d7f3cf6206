//! Pokecards - a terminal card catalog on tui-dispatch
//!
//! This library exposes the app's modules for testing.

pub mod action;
pub mod api;
pub mod artwork;
pub mod assets;
pub mod catalog;
pub mod cell;
pub mod components;
pub mod detail;
pub mod effect;
pub mod format;
pub mod reducer;
pub mod state;
pub mod tasks;
pub mod theme;
