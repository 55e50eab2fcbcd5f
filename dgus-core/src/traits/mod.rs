//! Printer collaborator traits
//!
//! These traits define the interface between the touch-screen logic and
//! the rest of the printer firmware. The screen only issues requests and
//! reads back simple status; it never implements motion, heating or card
//! access itself.

pub mod card;
pub mod motion;
pub mod printer;
pub mod thermal;

pub use card::{CardEntry, CardReader, CARD_NAME_LEN, LONG_NAME_LEN};
pub use motion::{Axis, MotionControl};
pub use printer::{Lighting, PowerLossRecovery, PrintJob, Printer, SettingsStore, StoreError};
pub use thermal::Thermal;
