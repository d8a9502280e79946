//! Core drivers and utilities for the Two-Wheel Bot on no-std embedded platforms.
//!
//! For a runnable host-side simulation, see the `mock-mcu` application.
#![no_std]

pub mod utils;
