//! Math utilities for the Two-Wheel Bot.
//!
//! This module provides the differential-drive mixing that turns
//! joystick-style steering intent into per-wheel motor power.

pub mod mixer;
