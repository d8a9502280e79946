//! Utility re-exports for the Two-Wheel Bot.
//!
//! This module re-exports the core components of the crate:
//!
//! - `color`: packed 24-bit RGB colors shared by headlights and nav lights
//! - `controllers`: PWM-board, nav-light, and sonar controllers
//! - `math`: differential-drive mixing from steering intent to wheel power

pub mod color;
pub mod controllers;
pub mod math;

pub use color::Color;
pub use controllers::{Config, SystemCommand, SystemController};
pub use math::mixer::mix;
