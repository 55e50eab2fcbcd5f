//! Configuration types
//!
//! Machine limits for the touch screen and the preheat presets it edits.

pub mod presets;
pub mod types;

pub use presets::{
    load_presets, save_presets, Material, MaterialPreset, PresetCache, PresetError, PresetRecord,
};
pub use types::{AxisBounds, TempLimits, TouchConfig};
