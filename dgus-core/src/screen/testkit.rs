//! Test doubles for the screen driver

use core::convert::Infallible;
use std::string::{String, ToString};
use std::vec::Vec;

use dgus_protocol::InboundMessage;
use embedded_hal::delay::DelayNs;
use embedded_io::{ErrorType, Read, ReadReady, Write};

use super::TouchScreen;
use crate::config::TouchConfig;
use crate::text::bounded;
use crate::traits::{
    Axis, CardEntry, CardReader, Lighting, MotionControl, PowerLossRecovery, PrintJob,
    SettingsStore, StoreError, Thermal,
};

/// Port that records writes and replays queued input
#[derive(Default)]
pub struct MockPort {
    pub tx: Vec<u8>,
    pub rx: Vec<u8>,
    rx_pos: usize,
}

impl ErrorType for MockPort {
    type Error = Infallible;
}

impl Read for MockPort {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let remaining = &self.rx[self.rx_pos..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.rx_pos += n;
        Ok(n)
    }
}

impl ReadReady for MockPort {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(self.rx_pos < self.rx.len())
    }
}

impl Write for MockPort {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.tx.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Delay that returns at once
pub struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

pub type TestScreen = TouchScreen<MockPort, NoDelay>;

pub fn screen() -> TestScreen {
    TouchScreen::new(MockPort::default(), NoDelay, TouchConfig::default())
}

/// A frame captured from the port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentFrame {
    pub command: u8,
    pub address: u16,
    pub payload: Vec<u8>,
}

impl SentFrame {
    pub fn words(&self) -> Vec<u16> {
        self.payload
            .chunks_exact(2)
            .map(|w| u16::from_be_bytes([w[0], w[1]]))
            .collect()
    }

    pub fn text(&self) -> &str {
        core::str::from_utf8(&self.payload).unwrap()
    }

    /// Page id if this is a page switch
    pub fn page(&self) -> Option<u8> {
        let words = self.words();
        (self.address == 0x0084 && words.len() == 2 && words[0] == 0x5A01)
            .then(|| words[1] as u8)
    }
}

/// Decode and drain everything the screen has sent
pub fn frames(screen: &mut TestScreen) -> Vec<SentFrame> {
    let tx = core::mem::take(&mut screen.link_mut().port_mut().tx);
    decode(&tx)
}

pub fn decode(mut bytes: &[u8]) -> Vec<SentFrame> {
    let mut out = Vec::new();
    while !bytes.is_empty() {
        assert_eq!(&bytes[..2], &[0x5A, 0xA5], "bad header");
        let len = bytes[2] as usize;
        let command = bytes[3];
        let body = &bytes[4..3 + len];
        let (address, payload) = match command {
            0x82 | 0x83 => (u16::from_be_bytes([body[0], body[1]]), &body[2..]),
            _ => (u16::from(body[0]), &body[1..]),
        };
        out.push(SentFrame {
            command,
            address,
            payload: payload.to_vec(),
        });
        bytes = &bytes[3 + len..];
    }
    out
}

/// Queue a key press for the next poll
pub fn press(screen: &mut TestScreen, address: u16, value: u16) {
    let [ah, al] = address.to_be_bytes();
    let [vh, vl] = value.to_be_bytes();
    screen
        .link_mut()
        .port_mut()
        .rx
        .extend_from_slice(&[0x5A, 0xA5, 0x06, 0x83, ah, al, 0x01, vh, vl]);
}

/// Build a key press message
pub fn key_message(address: u16, value: u16) -> InboundMessage {
    let mut data = heapless::Vec::new();
    data.push(value).unwrap();
    InboundMessage {
        command: dgus_protocol::Command::ReadVariable,
        address,
        length: 1,
        data,
    }
}

/// Printer double recording every request
#[derive(Default)]
pub struct MockPrinter {
    pub mounted: bool,
    pub files: Vec<(String, String)>,
    pub positions: [f32; 4],
    pub homed: bool,
    pub queue_full: bool,
    pub queued_moves: bool,
    pub moves: Vec<(Axis, f32)>,
    pub enqueued: Vec<String>,
    pub injected: Vec<String>,
    pub executed: Vec<String>,
    pub babysteps: Vec<f32>,
    pub bed_level_resets: usize,
    pub feedrate: u16,
    pub hotend_c: f32,
    pub bed_c: f32,
    pub hotend_target: i16,
    pub bed_target: i16,
    pub fan: u8,
    pub heatup_cancelled: bool,
    pub printing: bool,
    pub active: bool,
    pub paused: bool,
    pub moved: bool,
    pub percent: u8,
    pub elapsed_s: u32,
    pub timer_resets: usize,
    pub aborted: bool,
    pub waiting_user: bool,
    pub user_released: bool,
    pub recovery_pending: bool,
    pub recovery_file: Option<String>,
    pub resumed: bool,
    pub discarded: bool,
    pub z_offset: f32,
    pub saves: usize,
    pub resets: usize,
    pub preset_record: Option<Vec<u8>>,
    pub light: bool,
}

impl MockPrinter {
    pub fn new() -> Self {
        Self {
            mounted: true,
            feedrate: 100,
            ..Default::default()
        }
    }

    /// Printer with a mounted card holding `(long, short)` names, oldest first
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let mut printer = Self::new();
        printer.files = files
            .iter()
            .map(|(long, short)| (long.to_string(), short.to_string()))
            .collect();
        printer
    }
}

impl CardReader for MockPrinter {
    fn is_mounted(&self) -> bool {
        self.mounted
    }

    fn mount(&mut self) {}

    fn file_count(&mut self) -> u16 {
        self.files.len() as u16
    }

    fn entry(&mut self, index: u16) -> Option<CardEntry> {
        self.files.get(index as usize).map(|(long, short)| CardEntry {
            long_name: bounded(long),
            card_name: bounded(short),
        })
    }
}

impl MotionControl for MockPrinter {
    fn position(&self, axis: Axis) -> f32 {
        self.positions[axis.index()]
    }

    fn is_homed(&self, _axis: Axis) -> bool {
        self.homed
    }

    fn queue_full(&self) -> bool {
        self.queue_full
    }

    fn has_queued_moves(&self) -> bool {
        self.queued_moves
    }

    fn move_axis(&mut self, axis: Axis, target: f32, _feed_mm_s: f32) {
        self.positions[axis.index()] = target;
        self.moves.push((axis, target));
    }

    fn enqueue(&mut self, gcode: &str) {
        self.enqueued.push(gcode.to_string());
    }

    fn inject(&mut self, gcode: &str) {
        self.injected.push(gcode.to_string());
    }

    fn execute_now(&mut self, gcode: &str) {
        self.executed.push(gcode.to_string());
    }

    fn babystep_z(&mut self, mm: f32) {
        self.babysteps.push(mm);
    }

    fn reset_bed_leveling(&mut self) {
        self.bed_level_resets += 1;
    }

    fn feedrate_percent(&self) -> u16 {
        self.feedrate
    }

    fn set_feedrate_percent(&mut self, percent: u16) {
        self.feedrate = percent;
    }
}

impl Thermal for MockPrinter {
    fn hotend_celsius(&self) -> f32 {
        self.hotend_c
    }

    fn bed_celsius(&self) -> f32 {
        self.bed_c
    }

    fn hotend_target(&self) -> i16 {
        self.hotend_target
    }

    fn bed_target(&self) -> i16 {
        self.bed_target
    }

    fn set_hotend_target(&mut self, celsius: i16) {
        self.hotend_target = celsius;
    }

    fn set_bed_target(&mut self, celsius: i16) {
        self.bed_target = celsius;
    }

    fn fan_speed(&self) -> u8 {
        self.fan
    }

    fn set_fan_speed(&mut self, speed: u8) {
        self.fan = speed;
    }

    fn cancel_heatup(&mut self) {
        self.heatup_cancelled = true;
    }
}

impl PrintJob for MockPrinter {
    fn is_printing(&self) -> bool {
        self.printing
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn has_moved(&self) -> bool {
        self.moved
    }

    fn percent_done(&self) -> u8 {
        self.percent
    }

    fn elapsed_s(&self) -> u32 {
        self.elapsed_s
    }

    fn reset_timer(&mut self) {
        self.timer_resets += 1;
    }

    fn abort(&mut self) {
        self.aborted = true;
    }

    fn waiting_for_user(&self) -> bool {
        self.waiting_user
    }

    fn release_user_wait(&mut self) {
        self.waiting_user = false;
        self.user_released = true;
    }
}

impl PowerLossRecovery for MockPrinter {
    fn pending(&self) -> bool {
        self.recovery_pending
    }

    fn file_name(&self) -> Option<&str> {
        self.recovery_file.as_deref()
    }

    fn resume(&mut self) {
        self.resumed = true;
    }

    fn discard(&mut self) {
        self.discarded = true;
        self.recovery_pending = false;
    }
}

impl SettingsStore for MockPrinter {
    fn z_offset(&self) -> f32 {
        self.z_offset
    }

    fn set_z_offset(&mut self, mm: f32) {
        self.z_offset = mm;
    }

    fn save(&mut self) -> Result<(), StoreError> {
        self.saves += 1;
        Ok(())
    }

    fn reset(&mut self) -> Result<(), StoreError> {
        self.resets += 1;
        Ok(())
    }

    fn load_presets(&mut self, buf: &mut [u8]) -> Result<usize, StoreError> {
        let record = self.preset_record.as_ref().ok_or(StoreError::NotFound)?;
        if record.len() > buf.len() {
            return Err(StoreError::BufferTooSmall);
        }
        buf[..record.len()].copy_from_slice(record);
        Ok(record.len())
    }

    fn store_presets(&mut self, bytes: &[u8]) -> Result<(), StoreError> {
        self.preset_record = Some(bytes.to_vec());
        Ok(())
    }
}

impl Lighting for MockPrinter {
    fn set_light(&mut self, on: bool) {
        self.light = on;
    }
}
