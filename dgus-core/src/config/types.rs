//! Touch screen configuration
//!
//! Machine limits and timing used by the key handlers and the periodic
//! refresh. `Default` describes a 235 x 235 x 250 mm machine.

use serde::{Deserialize, Serialize};

use crate::text::{bounded, FieldText};
use crate::traits::Axis;

use super::presets::{MaterialPreset, PresetCache};

/// Travel limits for one axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisBounds {
    /// Minimum position (mm)
    pub min: f32,
    /// Maximum position (mm)
    pub max: f32,
}

impl AxisBounds {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Clamp a requested position into the travel range
    pub fn clamp(&self, position: f32) -> f32 {
        if position < self.min {
            self.min
        } else if position > self.max {
            self.max
        } else {
            position
        }
    }

    /// Check if a position lies inside the range (inclusive)
    pub fn contains(&self, position: f32) -> bool {
        position >= self.min && position <= self.max
    }
}

/// Allowed range for a temperature entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TempLimits {
    /// Minimum target (°C)
    pub min: i16,
    /// Maximum target (°C)
    pub max: i16,
}

impl TempLimits {
    pub const fn new(min: i16, max: i16) -> Self {
        Self { min, max }
    }

    /// Clamp a raw panel value into range
    pub fn clamp(&self, raw: u16) -> i16 {
        let value = i32::from(raw);
        if value > i32::from(self.max) {
            self.max
        } else if value < i32::from(self.min) {
            self.min
        } else {
            value as i16
        }
    }
}

/// Touch screen configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchConfig {
    /// Minimum time between periodic refreshes (ms)
    pub update_interval_ms: u32,
    /// Extra refresh delay while nothing changes (ms)
    pub idle_extra_ms: u32,
    /// Pause between outbound bytes (µs)
    pub pacing_us: u32,
    /// Travel limits for X, Y and Z
    pub travel: [AxisBounds; 3],
    /// Manual move feed rates for X, Y, Z and E (mm/s)
    pub jog_feed_mm_s: [f32; 4],
    /// Z offsets accepted by direct entry (mm)
    pub z_offset_range: AxisBounds,
    /// Size of one baby-step (mm)
    pub babystep_mm: f32,
    /// Window the baby-step buttons may move the offset within (mm)
    pub babystep_window: AxisBounds,
    /// Hotend limits for presets and direct entry
    pub hotend_limits: TempLimits,
    /// Bed limits for presets and direct entry
    pub bed_limits: TempLimits,
    /// Hotend temperature used for auto leveling
    pub leveling_preheat_c: i16,
    /// Minimum hotend temperature for filament moves
    pub filament_preheat_c: i16,
    /// Attempts the retry handler makes before giving up
    pub retry_budget: u8,
    /// Firmware version text
    pub version: FieldText,
    /// Build volume text
    pub build_volume: FieldText,
    /// Website text
    pub website: FieldText,
    /// Factory preheat presets
    pub default_presets: PresetCache,
}

impl Default for TouchConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: 1000,
            idle_extra_ms: 1000,
            pacing_us: 1,
            travel: [
                AxisBounds::new(0.0, 235.0),
                AxisBounds::new(0.0, 235.0),
                AxisBounds::new(0.0, 250.0),
            ],
            jog_feed_mm_s: [50.0, 50.0, 4.0, 1.0],
            z_offset_range: AxisBounds::new(-20.0, 20.0),
            babystep_mm: 0.05,
            babystep_window: AxisBounds::new(-0.52, 0.52),
            hotend_limits: TempLimits::new(5, 260),
            bed_limits: TempLimits::new(5, 100),
            leveling_preheat_c: 120,
            filament_preheat_c: 185,
            retry_budget: 3,
            version: bounded("1.0.0"),
            build_volume: bounded("235 X 235 X 250"),
            website: bounded("www.creality.com"),
            default_presets: PresetCache::new([
                MaterialPreset::new(185, 60, 255),
                MaterialPreset::new(240, 70, 255),
            ]),
        }
    }
}

impl TouchConfig {
    /// Travel limits for a jog axis
    ///
    /// The extruder has no limits; its bounds are unbounded.
    pub fn bounds(&self, axis: Axis) -> AxisBounds {
        match axis {
            Axis::X => self.travel[0],
            Axis::Y => self.travel[1],
            Axis::Z => self.travel[2],
            Axis::E => AxisBounds::new(f32::MIN, f32::MAX),
        }
    }

    /// Manual feed rate for an axis (mm/s)
    pub fn jog_feed(&self, axis: Axis) -> f32 {
        self.jog_feed_mm_s[axis.index()]
    }
}
