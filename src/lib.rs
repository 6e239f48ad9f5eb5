//! Playback controls overlay for a video view, plus a terminal host that
//! drives it against a simulated player.

pub mod app;
pub mod config;
pub mod controls;
pub mod events;
pub mod input;
pub mod player;
pub mod ui;
