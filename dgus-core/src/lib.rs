//! Touch screen logic for DGUS panels on 3D printers
//!
//! This crate turns key presses reported by the panel into printer actions
//! and keeps the panel's fields in step with the printer:
//!
//! - Printer collaborator traits (card, motion, thermal, job, recovery,
//!   settings, lighting)
//! - Configuration and preheat presets
//! - File catalog for the selection page
//! - Pages, key table, wait marker and retry handling
//! - The [`TouchScreen`](screen::TouchScreen) driver tying them together

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod catalog;
pub mod config;
pub mod screen;
pub mod text;
pub mod traits;
pub mod ui;

pub use screen::TouchScreen;
