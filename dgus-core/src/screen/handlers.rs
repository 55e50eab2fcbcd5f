//! Key handlers
//!
//! Each key group reports a single word: either the index of the button that
//! was pressed or the value the user entered. Handlers run to completion; a
//! transmit error aborts the rest of the handler but leaves any printer
//! requests already made in place.

use core::fmt::Write as _;

use dgus_protocol::{Command, InboundMessage, LinkError};
use embedded_hal::delay::DelayNs;
use embedded_io::{Read, ReadReady, Write};
use heapless::String;

use super::TouchScreen;
use crate::config::{save_presets, Material};
use crate::traits::{Axis, Printer};
use crate::ui::units::{decode_z_offset, encode_z_offset, from_tenths, to_tenths};
use crate::ui::{vp, Key, Page, WaitState};

/// Scratch buffer for generated commands
type GcodeBuf = String<32>;

/// Settle time after cancelling a power-loss resume (ms)
const RECOVERY_CANCEL_SETTLE_MS: u32 = 500;

impl<P, D> TouchScreen<P, D>
where
    P: Read + Write + ReadReady,
    D: DelayNs,
{
    /// Route a received message to its key handler
    ///
    /// Messages are dropped while waiting for a blocking operation, and
    /// when their address is not a key.
    pub(super) fn dispatch<R: Printer>(
        &mut self,
        printer: &mut R,
        message: &InboundMessage,
    ) -> Result<(), LinkError> {
        if self.wait.is_waiting() {
            #[cfg(feature = "defmt")]
            defmt::debug!("dropping {=u16:#x}: waiting ({})", message.address, self.wait);
            return Ok(());
        }

        if message.command != Command::ReadVariable {
            return Ok(());
        }

        let Some(key) = Key::from_address(message.address) else {
            return Ok(());
        };
        let value = message.value();

        #[cfg(feature = "defmt")]
        defmt::debug!("key {} = {=u16}", key, value);

        match key {
            Key::MainEnter => self.on_main_enter(printer, value),
            Key::AdjustEnter => self.on_adjust(printer, value),
            Key::PrintSpeedEnter => {
                printer.set_feedrate_percent(value);
                Ok(())
            }
            Key::StopPrint => self.on_stop(printer, value),
            Key::PausePrint => self.on_pause(printer, value),
            Key::ResumePrint => self.on_resume(printer, value),
            Key::ZoffsetEnter => self.on_zoffset_entry(printer, value),
            Key::TempControl => self.on_temp_control(printer, value),
            Key::CoolDown => self.on_cool_down(printer, value),
            Key::HeaterTempEnter => {
                let target = self.config.hotend_limits.max.min(clamp_i16(value));
                printer.set_hotend_target(target);
                self.show_signed(vp::HEAD_SET_TEMP, i32::from(target))
            }
            Key::BedTempEnter => {
                let target = self.config.bed_limits.max.min(clamp_i16(value));
                printer.set_bed_target(target);
                self.show_signed(vp::BED_SET_TEMP, i32::from(target))
            }
            Key::PrepareEnter => self.on_prepare(printer, value),
            Key::BedLevel => self.on_bed_level(printer, value),
            Key::AutoHome => self.on_auto_home(printer, value),
            Key::XAxisMove => self.jog(printer, Axis::X, value),
            Key::YAxisMove => self.jog(printer, Axis::Y, value),
            Key::ZAxisMove => self.jog(printer, Axis::Z, value),
            Key::FilamentLengthEnter => {
                self.filament_len_mm = from_tenths(value);
                Ok(())
            }
            Key::FilamentLoadStart => self.on_filament(printer, value),
            Key::FanSpeedEnter => {
                let speed = u8::try_from(value).unwrap_or(u8::MAX);
                printer.set_fan_speed(speed);
                self.show(vp::FAN_SPEED_CONTROL_DATA, u32::from(speed))
            }
            Key::Error => self.on_error_ack(printer, value),
            Key::ChangePage => self.on_redraw(printer),
            Key::PowerContinue => self.on_power_continue(printer, value),
            Key::PlaHotendSet => self.set_preset_hotend(Material::Pla, value),
            Key::PlaBedSet => self.set_preset_bed(Material::Pla, value),
            Key::PlaFanSet => self.set_preset_fan(Material::Pla, value),
            Key::AbsHotendSet => self.set_preset_hotend(Material::Abs, value),
            Key::AbsBedSet => self.set_preset_bed(Material::Abs, value),
            Key::AbsFanSet => self.set_preset_fan(Material::Abs, value),
            Key::SelectFile => self.on_select_file(printer, value),
            Key::StartFile => self.on_start_file(printer, value),
        }
    }

    fn on_main_enter<R: Printer>(&mut self, printer: &mut R, value: u16) -> Result<(), LinkError> {
        match value {
            1 => {
                self.card_update = true;
                self.sync_card(printer)?;
                self.change_page(Page::FileSelection)
            }
            2 => self.change_page(Page::MenuPrepare),
            3 => self.change_page(Page::MenuControl),
            4 => self.change_page(Page::MenuZoffsetLeveling),
            5 => {
                // Back from a finished print
                self.show(vp::MOTOR_FREE_ICON, vp::ICON_ON)?;
                self.show(vp::PRINT_PROCESS_TITLE, 0)?;
                self.show(vp::PRINT_PROCESS, 0)?;
                self.show(vp::PRINT_TIME_HOUR, 0)?;
                self.show(vp::PRINT_TIME_MIN, 0)?;
                printer.reset_timer();
                self.print_complete = false;
                self.last_percent = None;
                self.change_page(Page::MainMenu)
            }
            6 => {
                let preheat = self.config.leveling_preheat_c;
                self.wait = WaitState::Leveling;
                self.show(vp::AUTO_BED_LEVEL_TITLE, vp::ICON_ON)?;
                self.show_signed(vp::AUTO_BED_PREHEAT_HEAD, i32::from(preheat))?;
                self.change_page(Page::Leveling)?;

                printer.set_hotend_target(preheat);
                self.show_signed(vp::HEAD_SET_TEMP, i32::from(preheat))?;
                if printer.hotend_celsius() < f32::from(preheat - 5) {
                    printer.enqueue("G4 S40");
                }
                printer.enqueue("G28\nG29");
                self.show(vp::MOTOR_FREE_ICON, vp::ICON_ON)
            }
            _ => Ok(()),
        }
    }

    fn on_adjust<R: Printer>(&mut self, printer: &mut R, value: u16) -> Result<(), LinkError> {
        match value {
            1 => self.change_page(Page::MenuTuning),
            2 => {
                self.timer.set_extra(self.config.idle_extra_ms);
                let z = printer.z_offset();
                if z != self.saved_z_offset {
                    self.saved_z_offset = z;
                    self.show_signed(vp::AUTO_BED_LEVEL_ZOFFSET, encode_z_offset(z))?;
                    self.save_z_offset(printer);
                }
                self.show_progress_page(printer)
            }
            3 => {
                if printer.fan_speed() == 0 {
                    self.show(vp::PRINTER_FANOPEN_TITLE, vp::ICON_ON)?;
                    printer.set_fan_speed(u8::MAX);
                } else {
                    self.show(vp::PRINTER_FANOPEN_TITLE, vp::ICON_OFF)?;
                    printer.set_fan_speed(0);
                }
                Ok(())
            }
            4 => {
                self.light_on = !self.light_on;
                let icon = if self.light_on { vp::ICON_ON } else { vp::ICON_OFF };
                self.show(vp::PRINTER_LEDOPEN_TITLE, icon)?;
                printer.set_light(self.light_on);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn on_stop<R: Printer>(&mut self, printer: &mut R, value: u16) -> Result<(), LinkError> {
        match value {
            1 => self.change_page(Page::DialogStopPrinting),
            2 => {
                self.show(vp::PRINT_TIME_HOUR, 0)?;
                self.show(vp::PRINT_TIME_MIN, 0)?;
                self.timer.set_extra(0);
                self.resume_hotend = 0;
                self.resume_bed = 0;

                printer.abort();
                printer.cancel_heatup();
                self.pause_check = true;
                self.wait = WaitState::Stopping;
                Ok(())
            }
            3 => self.show_progress_page(printer),
            _ => Ok(()),
        }
    }

    fn on_pause<R: Printer>(&mut self, printer: &mut R, value: u16) -> Result<(), LinkError> {
        match value {
            1 => self.change_page(Page::DialogPausePrinting),
            2 => {
                self.remember_pause_point(printer);
                self.change_page(Page::PrintProgressPaused)?;
                printer.inject("M25");
                self.timer.set_extra(0);
                self.park_pending = true;
                Ok(())
            }
            3 => self.change_page(Page::PrintProgressRunning),
            _ => Ok(()),
        }
    }

    fn on_resume<R: Printer>(&mut self, printer: &mut R, value: u16) -> Result<(), LinkError> {
        match value {
            1 => {
                let mut cmd = GcodeBuf::new();
                // 32 bytes always hold a formatted coordinate
                let _ = write!(cmd, "G0 Z{:.2}", self.pause_z);
                printer.execute_now(&cmd);

                cmd.clear();
                let _ = write!(cmd, "G92 E{:.2}", self.pause_e);
                printer.execute_now(&cmd);

                printer.execute_now("M24");
                self.pause_check = true;
            }
            2 => printer.set_hotend_target(self.resume_hotend),
            _ => {}
        }
        self.had_runout = false;
        Ok(())
    }

    fn on_zoffset_entry<R: Printer>(&mut self, printer: &mut R, value: u16) -> Result<(), LinkError> {
        let previous = printer.z_offset();
        let entered = decode_z_offset(value);
        let requested = self.config.z_offset_range.clamp(entered);

        // Only an in-range entry moves the nozzle
        if self.config.z_offset_range.contains(entered) {
            printer.babystep_z(requested - previous);
        }
        printer.set_z_offset(requested);
        self.show_signed(vp::AUTO_BED_LEVEL_ZOFFSET, encode_z_offset(requested))
    }

    fn on_temp_control<R: Printer>(&mut self, printer: &mut R, value: u16) -> Result<(), LinkError> {
        match value {
            2 => self.change_page(Page::MenuTemp),
            3 => self.change_page(Page::MenuPlaTemp),
            4 => self.change_page(Page::MenuAbsTemp),
            5 => self.apply_preset(printer, Material::Pla),
            6 => self.apply_preset(printer, Material::Abs),
            7 => self.change_page(Page::MenuControl),
            _ => Ok(()),
        }
    }

    fn apply_preset<R: Printer>(&mut self, printer: &mut R, material: Material) -> Result<(), LinkError> {
        let preset = *self.presets.get(material);
        printer.set_hotend_target(preset.hotend_c);
        printer.set_bed_target(preset.bed_c);
        self.show_targets(preset.hotend_c, preset.bed_c)
    }

    fn on_cool_down<R: Printer>(&mut self, printer: &mut R, value: u16) -> Result<(), LinkError> {
        match value {
            1 => {
                printer.set_hotend_target(0);
                printer.set_bed_target(0);
                self.show_targets(0, 0)
            }
            2 => self.change_page(Page::MenuTemp),
            _ => Ok(()),
        }
    }

    fn on_prepare<R: Printer>(&mut self, printer: &mut R, value: u16) -> Result<(), LinkError> {
        match value {
            3 => {
                self.show_coordinates(printer)?;
                self.change_page(Page::Move10mm)
            }
            5 => {
                self.link
                    .write_text(vp::PRINTER_WEBSITE_TEXT, &self.config.website)?;
                self.change_page(Page::MenuAbout)
            }
            6 => {
                printer.enqueue("M84");
                self.show(vp::MOTOR_FREE_ICON, vp::ICON_OFF)
            }
            7 => {
                if let Err(_e) = printer.reset() {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("settings reset failed: {}", _e);
                }
                self.presets = self.config.default_presets;
                self.save_settings(printer);
                Ok(())
            }
            8 => {
                self.save_settings(printer);
                Ok(())
            }
            9 => self.change_page(Page::MainMenu),
            _ => Ok(()),
        }
    }

    fn on_bed_level<R: Printer>(&mut self, printer: &mut R, value: u16) -> Result<(), LinkError> {
        match value {
            1 => {
                self.wait = WaitState::ZHoming;
                if !printer.is_homed(Axis::X) || !printer.is_homed(Axis::Y) {
                    printer.enqueue("G28");
                } else {
                    printer.enqueue("G28 Z");
                }
                self.show(vp::MOTOR_FREE_ICON, vp::ICON_ON)?;
                self.timer.set_extra(0);
                Ok(())
            }
            2 => self.babystep(printer, self.config.babystep_mm),
            3 => self.babystep(printer, -self.config.babystep_mm),
            4 => self.change_page(Page::MenuZoffsetLeveling),
            _ => Ok(()),
        }
    }

    /// Nudge the Z offset by one baby-step if it stays inside the window
    fn babystep<R: Printer>(&mut self, printer: &mut R, step: f32) -> Result<(), LinkError> {
        let target = printer.z_offset() + step;
        if self.config.babystep_window.contains(target) {
            printer.babystep_z(step);
            printer.set_z_offset(target);
        }
        self.show_signed(vp::AUTO_BED_LEVEL_ZOFFSET, encode_z_offset(printer.z_offset()))
    }

    fn on_auto_home<R: Printer>(&mut self, printer: &mut R, value: u16) -> Result<(), LinkError> {
        match value {
            1 => self.change_page(Page::Move10mm),
            2 => self.change_page(Page::Move1mm),
            3 => self.change_page(Page::Move01mm),
            4 => {
                self.wait = WaitState::Homing;
                printer.enqueue("G28");
                self.show(vp::MOTOR_FREE_ICON, vp::ICON_ON)?;
                self.timer.set_extra(0);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Move one axis to the entered position
    ///
    /// The target is clamped to the travel range and dropped if the planner
    /// is full. The panel is sent the position the axis actually ends at.
    fn jog<R: Printer>(&mut self, printer: &mut R, axis: Axis, value: u16) -> Result<(), LinkError> {
        self.wait = WaitState::Jogging;

        let target = self.config.bounds(axis).clamp(from_tenths(value));
        if !printer.queue_full() {
            printer.move_axis(axis, target, self.config.jog_feed(axis));
        }

        let address = match axis {
            Axis::X => vp::AXIS_X_COORD,
            Axis::Y => vp::AXIS_Y_COORD,
            _ => vp::AXIS_Z_COORD,
        };
        let result = self
            .show_signed(address, to_tenths(printer.position(axis)))
            .and_then(|()| self.show(vp::MOTOR_FREE_ICON, vp::ICON_ON));

        self.wait = WaitState::Idle;
        result
    }

    fn on_filament<R: Printer>(&mut self, printer: &mut R, value: u16) -> Result<(), LinkError> {
        let direction = match value {
            1 => 1.0,
            2 => -1.0,
            3 => return self.change_page(Page::MenuPrepare),
            4 => return self.change_page(Page::Feed),
            _ => return Ok(()),
        };

        let target = printer.position(Axis::E) + direction * self.filament_len_mm;
        let preheat = self.config.filament_preheat_c;
        if printer.hotend_celsius() < f32::from(preheat) {
            printer.set_hotend_target(preheat);
            self.show_signed(vp::HEAD_SET_TEMP, i32::from(preheat))?;
        }

        if !printer.queue_full() {
            printer.move_axis(Axis::E, target, self.config.jog_feed(Axis::E));
        }
        self.show_signed(vp::HEAD_FILAMENT_LOAD_DATA, to_tenths(self.filament_len_mm))
    }

    fn on_error_ack<R: Printer>(&mut self, printer: &mut R, value: u16) -> Result<(), LinkError> {
        if value != 1 {
            return Ok(());
        }

        if printer.is_active() {
            self.change_page(Page::PrintProgressRunning)
        } else if printer.is_paused() {
            self.change_page(Page::PrintProgressPaused)
        } else {
            self.change_page(Page::MainMenu)
        }
    }

    /// Repaint every dynamic field and the current page
    fn on_redraw<R: Printer>(&mut self, printer: &mut R) -> Result<(), LinkError> {
        self.show_selected_name()?;
        if printer.is_mounted() {
            self.paint_catalog()?;
        }
        self.show_machine_info()?;

        let fan_icon = if printer.fan_speed() > 0 { vp::ICON_ON } else { vp::ICON_OFF };
        self.show(vp::PRINTER_FANOPEN_TITLE, fan_icon)?;
        let light_icon = if self.light_on { vp::ICON_ON } else { vp::ICON_OFF };
        self.show(vp::PRINTER_LEDOPEN_TITLE, light_icon)?;

        let shown = u32::from(printer.percent_done()) + 1;
        if shown <= 100 {
            self.show(vp::PRINT_PROCESS_TITLE, shown)?;
        }

        self.show_signed(vp::AUTO_BED_LEVEL_ZOFFSET, encode_z_offset(printer.z_offset()))?;
        self.show(vp::PRINT_SPEED_RATE, u32::from(printer.feedrate_percent()))?;
        self.show_targets(printer.hotend_target(), printer.bed_target())?;
        self.refresh_page()
    }

    fn on_power_continue<R: Printer>(&mut self, printer: &mut R, value: u16) -> Result<(), LinkError> {
        if printer.waiting_for_user() {
            printer.release_user_wait();
            return self.change_page(Page::PrintProgressRunning);
        }

        match value {
            1 => {
                self.change_page(Page::PrintProgressRunning)?;
                if printer.pending() {
                    self.recovery_checked = true;
                    self.show(vp::PRINTER_FANOPEN_TITLE, vp::ICON_ON)?;
                    self.timer.set_extra(0);
                    printer.resume();
                }
                Ok(())
            }
            2 => {
                self.change_page(Page::MainMenu)?;
                self.timer.set_extra(self.config.idle_extra_ms);
                printer.abort();
                printer.cancel_heatup();
                self.pause_check = true;
                self.show(vp::MOTOR_FREE_ICON, vp::ICON_ON)?;
                self.link.delay_ms(RECOVERY_CANCEL_SETTLE_MS);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn set_preset_hotend(&mut self, material: Material, value: u16) -> Result<(), LinkError> {
        let target = self.config.hotend_limits.clamp(value);
        self.presets.get_mut(material).hotend_c = target;
        let address = match material {
            Material::Pla => vp::PLA_HEAD_SET_DATA,
            Material::Abs => vp::ABS_HEAD_SET_DATA,
        };
        self.show_signed(address, i32::from(target))
    }

    fn set_preset_bed(&mut self, material: Material, value: u16) -> Result<(), LinkError> {
        let target = self.config.bed_limits.clamp(value);
        self.presets.get_mut(material).bed_c = target;
        let address = match material {
            Material::Pla => vp::PLA_BED_SET_DATA,
            Material::Abs => vp::ABS_BED_SET_DATA,
        };
        self.show_signed(address, i32::from(target))
    }

    fn set_preset_fan(&mut self, material: Material, value: u16) -> Result<(), LinkError> {
        let fan = u8::try_from(value).unwrap_or(u8::MAX);
        self.presets.get_mut(material).fan = fan;
        let address = match material {
            Material::Pla => vp::PLA_FAN_SET_DATA,
            Material::Abs => vp::ABS_FAN_SET_DATA,
        };
        self.show(address, u32::from(fan))
    }

    /// Select a file by its 1-based position; 0 clears the selection
    fn on_select_file<R: Printer>(&mut self, printer: &mut R, value: u16) -> Result<(), LinkError> {
        if !printer.is_mounted() {
            return Ok(());
        }

        let index = match value {
            0 => None,
            n => Some(usize::from(n) - 1),
        };
        if !self.catalog.select(index) {
            return Ok(());
        }
        self.paint_selection()
    }

    fn on_start_file<R: Printer>(&mut self, printer: &mut R, value: u16) -> Result<(), LinkError> {
        match value {
            1 if printer.is_mounted() => {
                let Some(entry) = self.catalog.selected_entry() else {
                    return Ok(());
                };

                let mut cmd = GcodeBuf::new();
                let _ = cmd.push_str("M23 ");
                for c in entry.card_name.chars() {
                    let _ = cmd.push(c.to_ascii_lowercase());
                }

                #[cfg(feature = "defmt")]
                defmt::debug!("starting {}", cmd.as_str());

                printer.enqueue(&cmd);
                printer.enqueue("M24");
                printer.discard();

                self.show_selected_name()?;
                printer.set_fan_speed(u8::MAX);
                self.show(vp::PRINTER_FANOPEN_TITLE, vp::ICON_ON)?;
                self.change_page(Page::PrintProgressRunning)?;
                self.timer.set_extra(0);
                Ok(())
            }
            4 => self.change_page(Page::MainMenu),
            _ => Ok(()),
        }
    }

    /// Show the running or paused progress page
    fn show_progress_page<R: Printer>(&mut self, printer: &R) -> Result<(), LinkError> {
        if printer.is_printing() {
            self.change_page(Page::PrintProgressRunning)
        } else {
            self.change_page(Page::PrintProgressPaused)
        }
    }

    /// Persist settings without rewriting the preset record
    pub(super) fn save_z_offset<R: Printer>(&mut self, printer: &mut R) {
        if let Err(_e) = printer.save() {
            #[cfg(feature = "defmt")]
            defmt::warn!("z offset save failed: {}", _e);
        }
    }

    /// Persist presets and settings; failures are logged and ignored
    pub(super) fn save_settings<R: Printer>(&mut self, printer: &mut R) {
        if let Err(_e) = save_presets(printer, &self.presets) {
            #[cfg(feature = "defmt")]
            defmt::warn!("preset save failed: {}", _e);
        }
        if let Err(_e) = printer.save() {
            #[cfg(feature = "defmt")]
            defmt::warn!("settings save failed: {}", _e);
        }
    }
}

/// Panel word to a temperature, saturating
fn clamp_i16(value: u16) -> i16 {
    i16::try_from(value).unwrap_or(i16::MAX)
}
