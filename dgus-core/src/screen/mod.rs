//! Touch screen driver
//!
//! [`TouchScreen`] owns the panel link and every piece of UI state. The
//! host calls [`TouchScreen::start`] once and then [`TouchScreen::poll`]
//! from its main loop; each poll syncs the card, runs the periodic refresh
//! when it is due and handles at most one key press.
//!
//! The printer is passed in on every call rather than stored, so the host
//! keeps ownership of it between polls.

mod card;
mod handlers;
mod update;

#[cfg(test)]
pub(crate) mod testkit;

use dgus_protocol::{InboundMessage, Link, LinkError, Payload};
use embedded_hal::delay::DelayNs;
use embedded_io::{Read, ReadReady, Write};

use crate::catalog::{FileCatalog, MAX_FILES};
use crate::config::{load_presets, Material, PresetCache, TouchConfig};
use crate::traits::{Axis, Printer};
use crate::ui::units::encode_z_offset;
use crate::ui::{vp, FailureClass, Page, PageRegister, RetryHandler, UpdateTimer, WaitState};

/// Pause between boot progress steps (ms)
const BOOT_PROGRESS_STEP_MS: u32 = 30;

/// Extruder retraction remembered on pause (mm)
const PAUSE_RETRACT_MM: f32 = 5.0;

/// Touch screen driver
pub struct TouchScreen<P, D> {
    link: Link<P, D>,
    config: TouchConfig,
    page: PageRegister,
    wait: WaitState,
    catalog: FileCatalog,
    presets: PresetCache,
    timer: UpdateTimer,
    retry: RetryHandler,
    /// Card state the panel was last painted for
    card_mounted: bool,
    /// Repaint the file list on the next card sync
    card_update: bool,
    /// Power-loss recovery has been offered (or ruled out) this session
    recovery_checked: bool,
    last_percent: Option<u8>,
    saved_z_offset: f32,
    last_hotend_target: i16,
    last_bed_target: i16,
    /// Targets to restore after a pause, 0 when not remembered
    resume_hotend: i16,
    resume_bed: i16,
    pause_z: f32,
    pause_e: f32,
    /// Pausing is allowed to park the head
    pause_check: bool,
    /// Park the head once the pause has taken effect
    park_pending: bool,
    had_runout: bool,
    finishing: bool,
    print_complete: bool,
    light_on: bool,
    filament_len_mm: f32,
}

impl<P, D> TouchScreen<P, D>
where
    P: Read + Write + ReadReady,
    D: DelayNs,
{
    /// Create a driver; nothing is sent until [`start`](Self::start)
    pub fn new(port: P, delay: D, config: TouchConfig) -> Self {
        let link = Link::with_pacing(port, delay, config.pacing_us);
        Self {
            link,
            presets: config.default_presets,
            timer: UpdateTimer::new(config.idle_extra_ms),
            retry: RetryHandler::new(config.retry_budget),
            config,
            page: PageRegister::new(),
            wait: WaitState::Idle,
            catalog: FileCatalog::new(),
            card_mounted: false,
            card_update: false,
            recovery_checked: false,
            last_percent: None,
            saved_z_offset: 0.0,
            last_hotend_target: 0,
            last_bed_target: 0,
            resume_hotend: 0,
            resume_bed: 0,
            pause_z: 0.0,
            pause_e: 0.0,
            pause_check: true,
            park_pending: false,
            had_runout: false,
            finishing: false,
            print_complete: false,
            light_on: false,
            filament_len_mm: 0.0,
        }
    }

    /// Bring the panel up
    ///
    /// Paints every field with its initial value, loads the file list and
    /// the presets, and leaves the panel on the boot page. The first
    /// periodic refresh moves on from there.
    pub fn start<R: Printer>(&mut self, printer: &mut R) -> Result<(), LinkError> {
        #[cfg(feature = "defmt")]
        defmt::debug!("touch screen starting");

        self.saved_z_offset = printer.z_offset();
        self.show_signed(vp::AUTO_BED_LEVEL_ZOFFSET, encode_z_offset(self.saved_z_offset))?;
        self.last_hotend_target = printer.hotend_target();
        self.last_bed_target = printer.bed_target();

        printer.set_feedrate_percent(100);
        self.show(vp::PRINT_SPEED_RATE, 100)?;
        self.show(vp::MOTOR_FREE_ICON, vp::ICON_OFF)?;

        self.show(vp::HEAD_SET_TEMP, 0)?;
        self.show(vp::BED_SET_TEMP, 0)?;
        self.show_temperatures(printer)?;

        printer.set_fan_speed(u8::MAX);
        self.show(vp::PRINTER_FANOPEN_TITLE, vp::ICON_ON)?;
        self.light_on = false;
        printer.set_light(false);
        self.show(vp::PRINTER_LEDOPEN_TITLE, vp::ICON_OFF)?;

        self.clear_words(vp::PRINTER_MACHINE_TEXT, vp::MACHINE_TEXT_WORDS)?;
        self.show_machine_info()?;
        self.show(vp::PRINT_PROCESS_TITLE, 0)?;

        for i in 0..MAX_FILES {
            self.clear_words(vp::file_text(i), vp::TEXT_FIELD_WORDS)?;
            self.show(vp::file_select_icon(i), vp::SELECT_ICON_OFF)?;
        }
        self.clear_words(vp::CONTINUE_PRINT_FILE_TEXT, vp::TEXT_FIELD_WORDS)?;
        self.init_card(printer)?;

        self.change_page(Page::Boot)?;
        for progress in 0..=100 {
            self.show(vp::START_PROCESS_ICON, progress)?;
            self.link.delay_ms(BOOT_PROGRESS_STEP_MS);
        }
        self.show(vp::SOUND, vp::START_SOUND)?;
        self.timer.set_extra(self.config.idle_extra_ms);

        self.presets = load_presets(printer, self.config.default_presets);
        let pla = *self.presets.get(Material::Pla);
        let abs = *self.presets.get(Material::Abs);
        self.show_signed(vp::PLA_HEAD_SET_DATA, i32::from(pla.hotend_c))?;
        self.show_signed(vp::PLA_BED_SET_DATA, i32::from(pla.bed_c))?;
        self.show_signed(vp::ABS_HEAD_SET_DATA, i32::from(abs.hotend_c))?;
        self.show_signed(vp::ABS_BED_SET_DATA, i32::from(abs.bed_c))?;

        Ok(())
    }

    /// Run one main-loop iteration
    ///
    /// Returns the first transmit error; the rest of the iteration is
    /// skipped when one occurs.
    pub fn poll<R: Printer>(&mut self, printer: &mut R, now_ms: u32) -> Result<(), LinkError> {
        self.sync_card(printer)?;
        self.periodic_update(printer, now_ms)?;

        if let Some(message) = self.link.poll()? {
            self.dispatch(printer, &message)?;
        }
        Ok(())
    }

    /// Handle a received message
    pub fn handle_message<R: Printer>(
        &mut self,
        printer: &mut R,
        message: &InboundMessage,
    ) -> Result<(), LinkError> {
        self.dispatch(printer, message)
    }

    /// The filament sensor reports runout
    pub fn filament_runout<R: Printer>(&mut self, printer: &mut R) -> Result<(), LinkError> {
        self.change_page(Page::ErrFilamentRunoutHotendCold)?;

        self.pause_check = false;
        self.park_pending = true;
        self.had_runout = true;
        self.remember_pause_point(printer);

        self.show(vp::FILAMENT_LOAD_ICON, vp::FILAMENT_ICON_RUNOUT)
    }

    /// The filament sensor reports filament present again
    ///
    /// Only acts after a runout that has not been resumed yet.
    pub fn filament_loaded(&mut self) -> Result<(), LinkError> {
        if self.park_pending && !self.pause_check && self.had_runout {
            self.change_page(Page::ErrFilamentRunoutFilamentLoaded)?;
            self.show(vp::FILAMENT_LOAD_ICON, vp::FILAMENT_ICON_LOADED)?;
            self.park_pending = false;
        }
        Ok(())
    }

    /// The operation the screen was waiting for has completed
    pub fn finish_wait<R: Printer>(&mut self, printer: &mut R) -> Result<(), LinkError> {
        let finished = self.wait;
        self.wait = WaitState::Idle;

        #[cfg(feature = "defmt")]
        defmt::debug!("wait {} finished", finished);

        match finished {
            WaitState::Idle | WaitState::Jogging => Ok(()),
            WaitState::Homing => {
                self.show_coordinates(printer)?;
                self.refresh_page()
            }
            WaitState::ZHoming | WaitState::Leveling => {
                self.show_signed(
                    vp::AUTO_BED_LEVEL_ZOFFSET,
                    encode_z_offset(printer.z_offset()),
                )?;
                self.change_page(Page::MenuZoffsetLeveling)
            }
            WaitState::Stopping => {
                self.show(vp::PRINT_PROCESS_TITLE, 0)?;
                self.show(vp::PRINT_PROCESS, 0)?;
                self.last_percent = None;
                self.change_page(Page::MainMenu)
            }
        }
    }

    /// Arm the retry handler for a failure
    pub fn raise_failure(&mut self, class: FailureClass) {
        #[cfg(feature = "defmt")]
        defmt::warn!("failure raised: {}", class);
        self.retry.raise(class);
    }

    /// The last print command has been queued
    ///
    /// The print counts as complete once the motion queue drains.
    pub fn print_finished(&mut self) {
        self.finishing = true;
    }

    pub fn current_page(&self) -> Page {
        self.page.current()
    }

    pub fn wait_state(&self) -> WaitState {
        self.wait
    }

    pub fn catalog(&self) -> &FileCatalog {
        &self.catalog
    }

    pub fn presets(&self) -> &PresetCache {
        &self.presets
    }

    pub fn config(&self) -> &TouchConfig {
        &self.config
    }

    pub fn failure(&self) -> FailureClass {
        self.retry.class()
    }

    /// True once a finished print has drained the motion queue
    pub fn is_print_complete(&self) -> bool {
        self.print_complete
    }

    pub fn is_light_on(&self) -> bool {
        self.light_on
    }

    pub fn link(&self) -> &Link<P, D> {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut Link<P, D> {
        &mut self.link
    }

    /// Give back the port and delay
    pub fn release(self) -> (P, D) {
        self.link.release()
    }

    fn show(&mut self, address: u16, value: u32) -> Result<(), LinkError> {
        self.link.write_value(address, value)
    }

    fn show_signed(&mut self, address: u16, value: i32) -> Result<(), LinkError> {
        self.link.write_variable(address, Payload::signed(value))
    }

    /// Zero `words` consecutive variables starting at `address`
    fn clear_words(&mut self, address: u16, words: u16) -> Result<(), LinkError> {
        for offset in 0..words {
            self.show(address + offset, 0)?;
        }
        Ok(())
    }

    fn change_page(&mut self, page: Page) -> Result<(), LinkError> {
        self.page.change_page(&mut self.link, page)
    }

    fn refresh_page(&mut self) -> Result<(), LinkError> {
        self.page.refresh_page(&mut self.link)
    }

    fn show_machine_info(&mut self) -> Result<(), LinkError> {
        self.link
            .write_text(vp::PRINTER_VERSION_TEXT, &self.config.version)?;
        self.link
            .write_text(vp::PRINTER_PRINTSIZE_TEXT, &self.config.build_volume)?;
        self.link
            .write_text(vp::PRINTER_WEBSITE_TEXT, &self.config.website)
    }

    fn show_temperatures<R: Printer>(&mut self, printer: &R) -> Result<(), LinkError> {
        self.show_signed(vp::HEAD_CURRENT_TEMP, printer.hotend_celsius() as i32)?;
        self.show_signed(vp::BED_CURRENT_TEMP, printer.bed_celsius() as i32)
    }

    fn show_targets(&mut self, hotend: i16, bed: i16) -> Result<(), LinkError> {
        self.show_signed(vp::HEAD_SET_TEMP, i32::from(hotend))?;
        self.show_signed(vp::BED_SET_TEMP, i32::from(bed))
    }

    fn show_coordinates<R: Printer>(&mut self, printer: &R) -> Result<(), LinkError> {
        use crate::ui::units::to_tenths;

        self.show_signed(vp::AXIS_X_COORD, to_tenths(printer.position(Axis::X)))?;
        self.show_signed(vp::AXIS_Y_COORD, to_tenths(printer.position(Axis::Y)))?;
        self.show_signed(vp::AXIS_Z_COORD, to_tenths(printer.position(Axis::Z)))
    }

    /// Remember where to resume and which targets to restore
    fn remember_pause_point<R: Printer>(&mut self, printer: &R) {
        self.pause_z = printer.position(Axis::Z);
        self.pause_e = printer.position(Axis::E) - PAUSE_RETRACT_MM;

        if self.resume_hotend == 0 {
            self.resume_hotend = printer.hotend_target();
        }
        if self.resume_bed == 0 {
            self.resume_bed = printer.bed_target();
        }
    }
}
