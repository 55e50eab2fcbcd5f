//! Preheat presets
//!
//! Two material slots (PLA and ABS), mirrored on the panel and persisted
//! through the settings store as a postcard record.

use serde::{Deserialize, Serialize};

use crate::traits::{SettingsStore, StoreError};

/// Magic number identifying a preset record
pub const PRESET_MAGIC: u32 = 0x50524554; // "PRET"

/// Current preset record version
pub const PRESET_VERSION: u8 = 1;

/// Maximum serialized record size
pub const MAX_RECORD_SIZE: usize = 32;

/// Number of material slots
pub const MATERIAL_COUNT: usize = 2;

/// Material slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Material {
    Pla,
    Abs,
}

impl Material {
    pub const fn index(self) -> usize {
        match self {
            Material::Pla => 0,
            Material::Abs => 1,
        }
    }
}

/// Preheat targets for one material
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MaterialPreset {
    /// Hotend target (°C)
    pub hotend_c: i16,
    /// Bed target (°C)
    pub bed_c: i16,
    /// Fan speed (0-255)
    pub fan: u8,
}

impl MaterialPreset {
    pub const fn new(hotend_c: i16, bed_c: i16, fan: u8) -> Self {
        Self {
            hotend_c,
            bed_c,
            fan,
        }
    }
}

/// Preset values shown on the temperature pages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PresetCache {
    presets: [MaterialPreset; MATERIAL_COUNT],
}

impl PresetCache {
    pub const fn new(presets: [MaterialPreset; MATERIAL_COUNT]) -> Self {
        Self { presets }
    }

    pub fn get(&self, material: Material) -> &MaterialPreset {
        &self.presets[material.index()]
    }

    pub fn get_mut(&mut self, material: Material) -> &mut MaterialPreset {
        &mut self.presets[material.index()]
    }
}

/// Persisted preset record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PresetRecord {
    /// Magic number for validation
    pub magic: u32,
    /// Data format version
    pub version: u8,
    /// Material presets
    pub presets: PresetCache,
}

impl PresetRecord {
    pub const fn new(presets: PresetCache) -> Self {
        Self {
            magic: PRESET_MAGIC,
            version: PRESET_VERSION,
            presets,
        }
    }

    /// Check if the magic and version match
    pub fn is_valid(&self) -> bool {
        self.magic == PRESET_MAGIC && self.version == PRESET_VERSION
    }
}

/// Preset persistence errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PresetError {
    /// Settings store failed
    Store(StoreError),
    /// Deserialization failed
    Deserialize,
    /// Serialization failed
    Serialize,
    /// Invalid magic or version
    InvalidFormat,
}

impl From<StoreError> for PresetError {
    fn from(e: StoreError) -> Self {
        PresetError::Store(e)
    }
}

/// Load presets from the settings store
///
/// Returns `defaults` if nothing is stored or the record is invalid.
pub fn load_presets<S: SettingsStore + ?Sized>(store: &mut S, defaults: PresetCache) -> PresetCache {
    match load_presets_inner(store) {
        Ok(presets) => presets,
        Err(PresetError::Store(StoreError::NotFound)) => {
            #[cfg(feature = "defmt")]
            defmt::debug!("No stored presets, using defaults");
            defaults
        }
        Err(_e) => {
            #[cfg(feature = "defmt")]
            defmt::warn!("Failed to load presets: {:?}, using defaults", _e);
            defaults
        }
    }
}

fn load_presets_inner<S: SettingsStore + ?Sized>(store: &mut S) -> Result<PresetCache, PresetError> {
    let mut buffer = [0u8; MAX_RECORD_SIZE];
    let len = store.load_presets(&mut buffer)?;

    let record: PresetRecord =
        postcard::from_bytes(&buffer[..len]).map_err(|_| PresetError::Deserialize)?;

    if !record.is_valid() {
        return Err(PresetError::InvalidFormat);
    }

    Ok(record.presets)
}

/// Save presets to the settings store
pub fn save_presets<S: SettingsStore + ?Sized>(
    store: &mut S,
    presets: &PresetCache,
) -> Result<(), PresetError> {
    let record = PresetRecord::new(*presets);

    let mut buffer = [0u8; MAX_RECORD_SIZE];
    let bytes = postcard::to_slice(&record, &mut buffer).map_err(|_| PresetError::Serialize)?;

    store.store_presets(bytes)?;
    Ok(())
}
