//! DWIN DGUS Serial Protocol
//!
//! Wire format used by DGUS touch panels on their command UART. The panel
//! exposes a 16-bit addressed variable space and an 8-bit register space;
//! the printer writes variables to update what is shown and receives
//! read-variable responses when the user presses a key.
//!
//! # Frame Layout
//!
//! ```text
//! ┌──────┬──────┬────────┬─────┬─────────┬─────────────┐
//! │ 0x5A │ 0xA5 │ LENGTH │ CMD │ ADDRESS │ PAYLOAD     │
//! │ 1B   │ 1B   │ 1B     │ 1B  │ 1B / 2B │ 0–249B      │
//! └──────┴──────┴────────┴─────┴─────────┴─────────────┘
//! ```
//!
//! LENGTH counts every byte after itself. There is no checksum; the panel
//! acknowledges writes with a short `OK` frame which is discarded.

#![no_std]
#![deny(unsafe_code)]

pub mod frame;
pub mod link;
pub mod receiver;

pub use frame::{Command, FrameError, OutboundFrame, Payload, MAX_FRAME_SIZE, MAX_TEXT_LEN};
pub use link::{Link, LinkError, DEFAULT_PACING_US};
pub use receiver::{InboundMessage, Receiver, MAX_DATA_UNITS, RX_BUFFER_SIZE};
