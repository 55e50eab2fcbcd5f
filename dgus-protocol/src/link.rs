//! Serial link to the panel
//!
//! Owns the UART, the outbound staging buffer and the receive accumulator.
//! Outbound bytes are written one at a time with a short pause between them
//! since the panel's UART has no flow control.

use embedded_hal::delay::DelayNs;
use embedded_io::{Error as _, ErrorKind, Read, ReadReady, Write};

use crate::frame::{Command, FrameError, OutboundFrame, Payload};
use crate::receiver::{InboundMessage, Receiver, RX_BUFFER_SIZE};

/// Default pause between outbound bytes
pub const DEFAULT_PACING_US: u32 = 1;

/// Link-level failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// The underlying port reported an error
    Io(ErrorKind),
    /// A frame could not be built
    Frame(FrameError),
}

impl From<FrameError> for LinkError {
    fn from(e: FrameError) -> Self {
        LinkError::Frame(e)
    }
}

/// Panel link over a byte-oriented port
pub struct Link<P, D> {
    port: P,
    delay: D,
    pacing_us: u32,
    staging: OutboundFrame,
    receiver: Receiver,
}

impl<P, D> Link<P, D>
where
    P: Read + Write + ReadReady,
    D: DelayNs,
{
    /// Create a link with the default byte pacing
    pub fn new(port: P, delay: D) -> Self {
        Self::with_pacing(port, delay, DEFAULT_PACING_US)
    }

    /// Create a link with a custom pause between outbound bytes
    pub fn with_pacing(port: P, delay: D, pacing_us: u32) -> Self {
        Self {
            port,
            delay,
            pacing_us,
            staging: OutboundFrame::new(),
            receiver: Receiver::new(),
        }
    }

    /// Build and transmit one frame
    ///
    /// An empty text payload sends nothing. The staging buffer is zeroed
    /// afterwards whether or not the write succeeded.
    pub fn send(
        &mut self,
        command: Command,
        address: u16,
        payload: Payload<'_>,
    ) -> Result<(), LinkError> {
        let result = self.transmit(command, address, payload);
        self.staging.clear();

        #[cfg(feature = "defmt")]
        if let Err(e) = &result {
            defmt::warn!("tx {=u16:#x} failed: {}", address, e);
        }

        result
    }

    fn transmit(
        &mut self,
        command: Command,
        address: u16,
        payload: Payload<'_>,
    ) -> Result<(), LinkError> {
        let bytes = self.staging.build(command, address, payload)?;
        if bytes.is_empty() {
            return Ok(());
        }

        for &byte in bytes {
            self.port
                .write_all(&[byte])
                .map_err(|e| LinkError::Io(e.kind()))?;
            self.delay.delay_us(self.pacing_us);
        }
        self.port.flush().map_err(|e| LinkError::Io(e.kind()))
    }

    /// Write a display variable
    pub fn write_variable(&mut self, address: u16, payload: Payload<'_>) -> Result<(), LinkError> {
        self.send(Command::WriteVariable, address, payload)
    }

    /// Write a numeric display variable
    pub fn write_value(&mut self, address: u16, value: u32) -> Result<(), LinkError> {
        self.send(Command::WriteVariable, address, Payload::Value(value))
    }

    /// Write a text display variable
    pub fn write_text(&mut self, address: u16, text: &str) -> Result<(), LinkError> {
        self.send(Command::WriteVariable, address, Payload::Text(text))
    }

    /// Drain available input until one message completes
    ///
    /// Reads at most [`RX_BUFFER_SIZE`] bytes per call so a chattering panel
    /// cannot starve the caller. Any bytes after the completing one stay in
    /// the port for the next call.
    pub fn poll(&mut self) -> Result<Option<InboundMessage>, LinkError> {
        for _ in 0..RX_BUFFER_SIZE {
            let ready = self
                .port
                .read_ready()
                .map_err(|e| LinkError::Io(e.kind()))?;
            if !ready {
                break;
            }

            let mut byte = [0u8; 1];
            let n = self
                .port
                .read(&mut byte)
                .map_err(|e| LinkError::Io(e.kind()))?;
            if n == 0 {
                break;
            }

            if let Some(message) = self.receiver.feed(byte[0]) {
                #[cfg(feature = "defmt")]
                defmt::trace!("rx {=u16:#x} = {=u16}", message.address, message.value());
                return Ok(Some(message));
            }
        }
        Ok(None)
    }

    /// Block for the given number of milliseconds
    pub fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    /// Receive accumulator state
    pub fn receiver(&self) -> &Receiver {
        &self.receiver
    }

    /// Borrow the underlying port
    pub fn port(&self) -> &P {
        &self.port
    }

    /// Mutably borrow the underlying port
    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    /// Give back the port and delay
    pub fn release(self) -> (P, D) {
        (self.port, self.delay)
    }
}
