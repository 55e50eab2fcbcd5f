//! Print job, recovery, settings and lighting traits

use super::{CardReader, MotionControl, Thermal};

/// Errors from the settings store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Nothing stored under the requested key
    NotFound,
    /// Stored data does not fit the buffer
    BufferTooSmall,
    /// Underlying storage failed
    Storage,
}

/// Trait for the active print job
pub trait PrintJob {
    /// Check if a card print is running (not paused)
    fn is_printing(&self) -> bool;

    /// Check if any print job is active
    fn is_active(&self) -> bool;

    /// Check if the print job is paused
    fn is_paused(&self) -> bool;

    /// Check if any move has been executed since boot
    fn has_moved(&self) -> bool;

    /// Progress of the current card print, 0-100
    fn percent_done(&self) -> u8;

    /// Elapsed print time in seconds
    fn elapsed_s(&self) -> u32;

    /// Reset the print timer
    fn reset_timer(&mut self);

    /// Abort the card print at the next opportunity
    fn abort(&mut self);

    /// Check if the firmware is blocked waiting for a user confirmation
    fn waiting_for_user(&self) -> bool;

    /// Release a pending user confirmation
    fn release_user_wait(&mut self);
}

/// Trait for power-loss recovery
pub trait PowerLossRecovery {
    /// Check if a recovery record is waiting to be resumed
    fn pending(&self) -> bool;

    /// Card name of the interrupted file, as stored in the record
    fn file_name(&self) -> Option<&str>;

    /// Resume the interrupted print
    fn resume(&mut self);

    /// Delete the recovery record
    fn discard(&mut self);
}

/// Trait for persisted settings
pub trait SettingsStore {
    /// Probe Z offset in mm
    fn z_offset(&self) -> f32;

    /// Set the probe Z offset in mm
    fn set_z_offset(&mut self, mm: f32);

    /// Persist all settings
    fn save(&mut self) -> Result<(), StoreError>;

    /// Restore factory settings
    fn reset(&mut self) -> Result<(), StoreError>;

    /// Read the stored UI preset record into `buf`
    ///
    /// Returns the number of bytes read.
    fn load_presets(&mut self, buf: &mut [u8]) -> Result<usize, StoreError>;

    /// Store the UI preset record
    fn store_presets(&mut self, bytes: &[u8]) -> Result<(), StoreError>;
}

/// Trait for the case light
pub trait Lighting {
    /// Switch the light on or off
    fn set_light(&mut self, on: bool);
}

/// Everything the touch screen needs from the printer
pub trait Printer:
    CardReader + MotionControl + Thermal + PrintJob + PowerLossRecovery + SettingsStore + Lighting
{
}

impl<T> Printer for T where
    T: CardReader
        + MotionControl
        + Thermal
        + PrintJob
        + PowerLossRecovery
        + SettingsStore
        + Lighting
{
}
