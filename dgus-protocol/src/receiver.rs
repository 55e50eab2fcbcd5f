//! Receive accumulator for frames coming from the panel.
//!
//! Bytes are fed one at a time. The accumulator only ever holds a single
//! frame: once that frame is complete (or found to be malformed) the buffer
//! is cleared before the next byte is accepted.
//!
//! Resynchronization is implicit. A byte that cannot continue the frame in
//! progress resets the buffer. When the buffer is empty, a byte that matches
//! a later position of the common read-variable response prefix
//! (`5A A5 06 83`) is taken to mean the bytes before it were lost, and the
//! missing prefix is filled in in one step.

use heapless::Vec;

use crate::frame::{Command, FRAME_HEADER_1, FRAME_HEADER_2, HEADER_SIZE};

/// Receive buffer capacity
pub const RX_BUFFER_SIZE: usize = 64;

/// Maximum data units carried by an inbound message
pub const MAX_DATA_UNITS: usize = RX_BUFFER_SIZE - 6;

/// LENGTH byte of a single-word read-variable response
pub const SHORT_READ_LENGTH: u8 = 0x06;

/// Write acknowledgement payload
const ACK_PAYLOAD: [u8; 2] = *b"OK";

/// Known prefix of a single-word read-variable response
const FAST_PATH_PREFIX: [u8; 4] = [FRAME_HEADER_1, FRAME_HEADER_2, SHORT_READ_LENGTH, 0x83];

/// A complete frame received from the panel
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InboundMessage {
    /// Response kind (`ReadVariable` or `ReadRegister`)
    pub command: Command,
    /// Variable address, or the register address widened to 16 bits
    pub address: u16,
    /// Declared unit count (words for variables, bytes for registers)
    pub length: u8,
    /// Big-endian words for variable reads, one byte per entry for
    /// register reads
    pub data: Vec<u16, MAX_DATA_UNITS>,
}

impl InboundMessage {
    /// First data unit, or 0 when the message carries none
    pub fn value(&self) -> u16 {
        self.data.first().copied().unwrap_or(0)
    }
}

/// Frame accumulator with implicit resynchronization
#[derive(Debug, Clone, Default)]
pub struct Receiver {
    buffer: Vec<u8, RX_BUFFER_SIZE>,
    framing_errors: u32,
    acks: u32,
}

impl Receiver {
    /// Create an empty receiver
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            framing_errors: 0,
            acks: 0,
        }
    }

    /// Discard any partial frame
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Number of bytes currently accumulated
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true when no partial frame is in progress
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Frames discarded as malformed since creation
    pub fn framing_errors(&self) -> u32 {
        self.framing_errors
    }

    /// Write acknowledgements swallowed since creation
    pub fn acks(&self) -> u32 {
        self.acks
    }

    /// Feed a single byte
    ///
    /// Returns `Some(message)` when the byte completes a well-formed
    /// response. Acknowledgements, malformed frames and noise all yield
    /// `None`.
    pub fn feed(&mut self, byte: u8) -> Option<InboundMessage> {
        if self.buffer.is_empty() {
            self.start(byte);
        } else if self.buffer.len() == 1 && byte != FRAME_HEADER_2 {
            #[cfg(feature = "defmt")]
            defmt::trace!("rx: bad second header byte {=u8:#x}", byte);
            self.buffer.clear();
            self.start(byte);
        } else if self.buffer.push(byte).is_err() {
            self.discard();
        }

        self.check()
    }

    /// Feed bytes until one message completes
    ///
    /// Bytes after the completing one are not consumed; the returned count
    /// says how many were.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> (usize, Option<InboundMessage>) {
        for (i, &byte) in bytes.iter().enumerate() {
            if let Some(message) = self.feed(byte) {
                return (i + 1, Some(message));
            }
        }
        (bytes.len(), None)
    }

    /// Begin a new frame from an empty buffer
    fn start(&mut self, byte: u8) {
        let matched = match FAST_PATH_PREFIX.iter().position(|&b| b == byte) {
            Some(index) => index + 1,
            None => return,
        };
        // Capacity is far above the prefix length
        let _ = self.buffer.extend_from_slice(&FAST_PATH_PREFIX[..matched]);
    }

    /// Validate what has accumulated so far and decode once complete
    fn check(&mut self) -> Option<InboundMessage> {
        if self.buffer.len() < HEADER_SIZE {
            return None;
        }

        if self.buffer[0] != FRAME_HEADER_1 || self.buffer[1] != FRAME_HEADER_2 {
            self.discard();
            return None;
        }

        let declared = self.buffer[2] as usize;
        if declared < 3 || HEADER_SIZE + declared > RX_BUFFER_SIZE {
            self.discard();
            return None;
        }

        if self.buffer.len() > HEADER_SIZE && Command::from_byte(self.buffer[3]).is_none() {
            self.discard();
            return None;
        }

        if self.buffer.len() < HEADER_SIZE + declared {
            return None;
        }

        let result = self.decode();
        self.buffer.clear();
        result
    }

    /// Decode a complete frame held in the buffer
    fn decode(&mut self) -> Option<InboundMessage> {
        let frame = &self.buffer[..];
        let command = Command::from_byte(frame[3])?;
        let body = &frame[4..];

        match command {
            Command::WriteRegister | Command::WriteVariable => {
                if frame[2] == 3 && body == ACK_PAYLOAD {
                    self.acks = self.acks.wrapping_add(1);
                } else {
                    self.framing_errors = self.framing_errors.wrapping_add(1);
                }
                None
            }
            Command::ReadVariable => {
                // ADDRESS(2) COUNT(1) WORDS(2 * COUNT)
                if body.len() < 3 {
                    self.framing_errors = self.framing_errors.wrapping_add(1);
                    return None;
                }
                let address = u16::from_be_bytes([body[0], body[1]]);
                let length = body[2];
                let payload = &body[3..];
                if payload.len() != 2 * length as usize {
                    self.framing_errors = self.framing_errors.wrapping_add(1);
                    return None;
                }

                let mut data = Vec::new();
                for pair in payload.chunks_exact(2) {
                    data.push(u16::from_be_bytes([pair[0], pair[1]])).ok()?;
                }
                Some(InboundMessage {
                    command,
                    address,
                    length,
                    data,
                })
            }
            Command::ReadRegister => {
                // ADDRESS(1) COUNT(1) BYTES(COUNT)
                if body.len() < 2 {
                    self.framing_errors = self.framing_errors.wrapping_add(1);
                    return None;
                }
                let address = u16::from(body[0]);
                let length = body[1];
                let payload = &body[2..];
                if payload.len() != length as usize {
                    self.framing_errors = self.framing_errors.wrapping_add(1);
                    return None;
                }

                let mut data = Vec::new();
                for &byte in payload {
                    data.push(u16::from(byte)).ok()?;
                }
                Some(InboundMessage {
                    command,
                    address,
                    length,
                    data,
                })
            }
        }
    }

    /// Drop the buffer as a framing error
    fn discard(&mut self) {
        #[cfg(feature = "defmt")]
        defmt::trace!("rx: framing error after {} bytes", self.buffer.len());
        self.buffer.clear();
        self.framing_errors = self.framing_errors.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Read-variable response carrying one word
    const TEMP_RESPONSE: [u8; 9] = [0x5A, 0xA5, 0x06, 0x83, 0x10, 0x34, 0x01, 0x00, 0xC8];

    #[test]
    fn test_decode_single_word() {
        let mut rx = Receiver::new();
        let (used, message) = rx.feed_bytes(&TEMP_RESPONSE);
        let message = message.unwrap();

        assert_eq!(used, TEMP_RESPONSE.len());
        assert_eq!(message.command, Command::ReadVariable);
        assert_eq!(message.address, 0x1034);
        assert_eq!(message.length, 1);
        assert_eq!(message.value(), 200);
        assert!(rx.is_empty());
    }

    #[test]
    fn test_openers_on_empty_buffer() {
        for byte in 0..=u8::MAX {
            let mut rx = Receiver::new();
            assert!(rx.feed(byte).is_none());
            let expected: &[u8] = match byte {
                0x5A => &[0x5A],
                0xA5 => &[0x5A, 0xA5],
                0x06 => &[0x5A, 0xA5, 0x06],
                0x83 => &[0x5A, 0xA5, 0x06, 0x83],
                _ => &[],
            };
            assert_eq!(rx.buffer.as_slice(), expected, "byte {:#04x}", byte);
        }
    }

    #[test]
    fn test_headerless_read_response_decodes() {
        let mut rx = Receiver::new();
        let message = rx.feed_bytes(&[0x83, 0x10, 0x02, 0x01, 0x00, 0x01]).1.unwrap();
        assert_eq!(message.command, Command::ReadVariable);
        assert_eq!(message.address, 0x1002);
        assert_eq!(message.value(), 1);

        let message = rx.feed_bytes(&[0xA5, 0x06, 0x83, 0x10, 0x02, 0x01, 0x00, 0x02]).1.unwrap();
        assert_eq!(message.value(), 2);
    }

    #[test]
    fn test_opener_mid_run_is_plain_data() {
        let mut rx = Receiver::new();
        rx.feed(0x22);
        assert!(rx.is_empty());
        // A stale 0x5A followed by a non-A5 byte restarts from that byte
        rx.feed(0x5A);
        rx.feed(0x83);
        assert_eq!(rx.buffer.as_slice(), &[0x5A, 0xA5, 0x06, 0x83]);
    }

    #[test]
    fn test_decode_multiple_words() {
        let bytes = [0x5A, 0xA5, 0x08, 0x83, 0x20, 0xD2, 0x02, 0x00, 0x03, 0xAB, 0xCD];
        let mut rx = Receiver::new();
        let message = rx.feed_bytes(&bytes).1.unwrap();
        assert_eq!(message.data.as_slice(), &[0x0003, 0xABCD]);
    }

    #[test]
    fn test_decode_register_response() {
        // Register read: bytes are copied without reassembly
        let bytes = [0x5A, 0xA5, 0x05, 0x81, 0x03, 0x02, 0x00, 0x0B];
        let mut rx = Receiver::new();
        let message = rx.feed_bytes(&bytes).1.unwrap();
        assert_eq!(message.command, Command::ReadRegister);
        assert_eq!(message.address, 0x03);
        assert_eq!(message.length, 2);
        assert_eq!(message.data.as_slice(), &[0x00, 0x0B]);
    }

    #[test]
    fn test_ack_is_swallowed() {
        let mut rx = Receiver::new();
        let (used, message) = rx.feed_bytes(&[0x5A, 0xA5, 0x03, 0x82, b'O', b'K']);
        assert_eq!(used, 6);
        assert!(message.is_none());
        assert_eq!(rx.acks(), 1);
        assert_eq!(rx.framing_errors(), 0);
        assert!(rx.is_empty());
    }

    #[test]
    fn test_fast_path_fills_missing_prefix() {
        for skip in 1..4 {
            let mut rx = Receiver::new();
            let message = rx.feed_bytes(&TEMP_RESPONSE[skip..]).1.unwrap();
            assert_eq!(message.address, 0x1034);
            assert_eq!(message.value(), 200);
        }
    }

    #[test]
    fn test_noise_before_frame_is_dropped() {
        let mut rx = Receiver::new();
        assert!(rx.feed(0x00).is_none());
        assert!(rx.feed(0xFF).is_none());
        assert!(rx.is_empty());

        let message = rx.feed_bytes(&TEMP_RESPONSE).1.unwrap();
        assert_eq!(message.value(), 200);
    }

    #[test]
    fn test_bad_second_byte_resyncs() {
        let mut rx = Receiver::new();
        // A repeated first header byte restarts the frame
        assert!(rx.feed(0x5A).is_none());
        let message = rx.feed_bytes(&TEMP_RESPONSE).1.unwrap();
        assert_eq!(message.value(), 200);
    }

    #[test]
    fn test_unknown_command_is_framing_error() {
        let mut rx = Receiver::new();
        let (_, message) = rx.feed_bytes(&[0x5A, 0xA5, 0x06, 0x99]);
        assert!(message.is_none());
        assert!(rx.is_empty());
        assert_eq!(rx.framing_errors(), 1);
    }

    #[test]
    fn test_oversized_length_is_framing_error() {
        let mut rx = Receiver::new();
        let (_, message) = rx.feed_bytes(&[0x5A, 0xA5, 0xF0]);
        assert!(message.is_none());
        assert!(rx.is_empty());
        assert_eq!(rx.framing_errors(), 1);
    }

    #[test]
    fn test_inconsistent_length_is_dropped() {
        // Declares two words but LENGTH only covers one
        let bytes = [0x5A, 0xA5, 0x06, 0x83, 0x10, 0x34, 0x02, 0x00, 0xC8];
        let mut rx = Receiver::new();
        assert!(rx.feed_bytes(&bytes).1.is_none());
        assert!(rx.is_empty());
        assert_eq!(rx.framing_errors(), 1);
    }

    #[test]
    fn test_one_frame_per_feed_bytes() {
        let mut stream = heapless::Vec::<u8, 32>::new();
        stream.extend_from_slice(&TEMP_RESPONSE).unwrap();
        stream.extend_from_slice(&TEMP_RESPONSE).unwrap();

        let mut rx = Receiver::new();
        let (used, first) = rx.feed_bytes(&stream);
        assert_eq!(used, TEMP_RESPONSE.len());
        assert!(first.is_some());

        let (_, second) = rx.feed_bytes(&stream[used..]);
        assert!(second.is_some());
    }

    #[test]
    fn test_value_of_empty_message() {
        let message = InboundMessage {
            command: Command::ReadVariable,
            address: 0x1000,
            length: 0,
            data: Vec::new(),
        };
        assert_eq!(message.value(), 0);
    }
}
