//! Frame encoding for the DGUS serial protocol.
//!
//! Frame format:
//! - HEADER (2 bytes): 0x5A 0xA5 synchronization markers
//! - LENGTH (1 byte): number of bytes following this field
//! - COMMAND (1 byte): register/variable, read/write
//! - ADDRESS (1 byte for register commands, 2 bytes big-endian for variables)
//! - PAYLOAD (0..N bytes): raw bytes or big-endian 16-bit words
//!
//! There is no checksum. A frame never exceeds [`MAX_FRAME_SIZE`] bytes.

/// First header byte
pub const FRAME_HEADER_1: u8 = 0x5A;

/// Second header byte
pub const FRAME_HEADER_2: u8 = 0xA5;

/// Bytes before the LENGTH-counted part of the frame (HEADER + LENGTH)
pub const HEADER_SIZE: usize = 3;

/// Maximum complete frame size on the wire
pub const MAX_FRAME_SIZE: usize = 255;

/// Longest text payload that still fits a write-variable frame
/// (HEADER + LENGTH + COMMAND + 16-bit ADDRESS take six bytes)
pub const MAX_TEXT_LEN: usize = MAX_FRAME_SIZE - 6;

/// Errors that can occur while encoding a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload does not fit in a single frame
    PayloadTooLarge,
    /// Register commands only address 0x00..=0xFF
    AddressOutOfRange,
    /// Payload kind is not meaningful for the command
    UnsupportedPayload,
    /// Output buffer too small for the encoded frame
    BufferTooSmall,
}

/// Command byte of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Write to a control register (8-bit address)
    WriteRegister,
    /// Read a control register; also the register read response
    ReadRegister,
    /// Write to a variable (16-bit address)
    WriteVariable,
    /// Read a variable; also the variable read response
    ReadVariable,
}

// Wire format values
const CMD_WRITE_REGISTER: u8 = 0x80;
const CMD_READ_REGISTER: u8 = 0x81;
const CMD_WRITE_VARIABLE: u8 = 0x82;
const CMD_READ_VARIABLE: u8 = 0x83;

impl Command {
    /// Parse a command from its wire format byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            CMD_WRITE_REGISTER => Some(Command::WriteRegister),
            CMD_READ_REGISTER => Some(Command::ReadRegister),
            CMD_WRITE_VARIABLE => Some(Command::WriteVariable),
            CMD_READ_VARIABLE => Some(Command::ReadVariable),
            _ => None,
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            Command::WriteRegister => CMD_WRITE_REGISTER,
            Command::ReadRegister => CMD_READ_REGISTER,
            Command::WriteVariable => CMD_WRITE_VARIABLE,
            Command::ReadVariable => CMD_READ_VARIABLE,
        }
    }

    /// Returns true for commands that carry a 16-bit variable address
    pub fn is_variable(self) -> bool {
        matches!(self, Command::WriteVariable | Command::ReadVariable)
    }
}

/// Typed payload of an outbound frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Payload<'a> {
    /// No payload; a read request for a single unit
    None,
    /// A single byte. Written to a variable as the high byte of one word,
    /// used as the unit count of a read request.
    Byte(u8),
    /// An integer. Written to a variable as one big-endian word, or as two
    /// words when it does not fit in 16 bits. Register writes keep the low byte.
    Value(u32),
    /// Text copied byte-for-byte without escaping. Empty text sends nothing.
    Text(&'a str),
}

impl<'a> Payload<'a> {
    /// Payload for a signed integer
    ///
    /// Negative values travel as a single 16-bit two's complement word; the
    /// panel reads them back through the half-range rule.
    pub fn signed(value: i32) -> Self {
        if value < 0 {
            Payload::Value(u32::from(value as u16))
        } else {
            Payload::Value(value as u32)
        }
    }
}

/// Append-only writer over the caller's output buffer
struct Cursor<'b> {
    buf: &'b mut [u8],
    len: usize,
}

impl<'b> Cursor<'b> {
    fn new(buf: &'b mut [u8]) -> Self {
        Self { buf, len: 0 }
    }

    fn push(&mut self, byte: u8) -> Result<(), FrameError> {
        let slot = self.buf.get_mut(self.len).ok_or(FrameError::BufferTooSmall)?;
        *slot = byte;
        self.len += 1;
        Ok(())
    }

    fn push_word(&mut self, word: u16) -> Result<(), FrameError> {
        let [hi, lo] = word.to_be_bytes();
        self.push(hi)?;
        self.push(lo)
    }
}

/// Encode a frame into `buf`
///
/// Returns the number of bytes written. Empty text payloads encode to
/// nothing and return 0.
pub fn encode(
    command: Command,
    address: u16,
    payload: Payload<'_>,
    buf: &mut [u8],
) -> Result<usize, FrameError> {
    if let Payload::Text(text) = payload {
        if text.is_empty() {
            return Ok(0);
        }
        if text.len() > MAX_TEXT_LEN {
            return Err(FrameError::PayloadTooLarge);
        }
    }

    let mut out = Cursor::new(buf);
    out.push(FRAME_HEADER_1)?;
    out.push(FRAME_HEADER_2)?;
    out.push(0)?; // length, patched below
    out.push(command.to_byte())?;

    if command.is_variable() {
        out.push_word(address)?;
    } else {
        let address = u8::try_from(address).map_err(|_| FrameError::AddressOutOfRange)?;
        out.push(address)?;
    }

    match (command, payload) {
        (Command::WriteVariable, Payload::Byte(byte)) => {
            out.push(byte)?;
            out.push(0)?;
        }
        (Command::WriteVariable, Payload::Value(value)) => {
            if value > 0xFFFF {
                out.push_word((value >> 16) as u16)?;
                out.push_word((value & 0xFFFF) as u16)?;
            } else {
                out.push_word(value as u16)?;
            }
        }
        (Command::WriteVariable, Payload::Text(text)) => {
            for &byte in text.as_bytes() {
                out.push(byte)?;
            }
        }
        (Command::WriteRegister, Payload::Byte(byte)) => out.push(byte)?,
        (Command::WriteRegister, Payload::Value(value)) => out.push(value as u8)?,
        (Command::ReadVariable | Command::ReadRegister, Payload::None) => out.push(1)?,
        (Command::ReadVariable | Command::ReadRegister, Payload::Byte(count)) => out.push(count)?,
        _ => return Err(FrameError::UnsupportedPayload),
    }

    let len = out.len;
    if len > MAX_FRAME_SIZE {
        return Err(FrameError::PayloadTooLarge);
    }
    out.buf[2] = (len - HEADER_SIZE) as u8;
    Ok(len)
}

/// Staging record for a single outbound frame
///
/// Built immediately before transmission and zero-filled immediately after,
/// so nothing of one send survives into the next.
#[derive(Debug, Clone)]
pub struct OutboundFrame {
    bytes: [u8; MAX_FRAME_SIZE],
    len: usize,
}

impl Default for OutboundFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl OutboundFrame {
    /// Create an empty staging record
    pub const fn new() -> Self {
        Self {
            bytes: [0; MAX_FRAME_SIZE],
            len: 0,
        }
    }

    /// Build a frame, replacing whatever was staged before
    ///
    /// Returns the encoded bytes; empty for a no-op (empty text) send.
    pub fn build(
        &mut self,
        command: Command,
        address: u16,
        payload: Payload<'_>,
    ) -> Result<&[u8], FrameError> {
        self.clear();
        self.len = encode(command, address, payload, &mut self.bytes)?;
        Ok(&self.bytes[..self.len])
    }

    /// Currently staged bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Zero-fill the staging buffer
    pub fn clear(&mut self) {
        self.bytes.fill(0);
        self.len = 0;
    }

    /// Returns true when nothing is staged and the buffer is zeroed
    pub fn is_clear(&self) -> bool {
        self.len == 0 && self.bytes.iter().all(|&b| b == 0)
    }
}
