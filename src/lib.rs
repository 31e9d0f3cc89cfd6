//! Spectre Bodies - corpse overlay that labels monsters worth reanimating

pub mod core;
pub mod host;
pub mod overlay;
pub mod render;
pub mod sim;
pub mod tracking;
pub mod ui;
