//! Storage card access

use heapless::String;

/// Maximum long file name length
pub const LONG_NAME_LEN: usize = 64;

/// Maximum short (8.3) file name length
pub const CARD_NAME_LEN: usize = 13;

/// One directory entry on the card
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CardEntry {
    /// Long file name as shown to the user
    pub long_name: String<LONG_NAME_LEN>,
    /// Short name used to open the file
    pub card_name: String<CARD_NAME_LEN>,
}

/// Trait for the mounted storage card
///
/// Entries are addressed by index in directory order, oldest first.
pub trait CardReader {
    /// Check if a card is currently mounted
    fn is_mounted(&self) -> bool;

    /// Try to mount the card
    fn mount(&mut self);

    /// Number of entries in the root directory
    fn file_count(&mut self) -> u16;

    /// Read the entry at `index`
    ///
    /// Returns `None` if the index is out of range or the read fails.
    fn entry(&mut self, index: u16) -> Option<CardEntry>;
}
