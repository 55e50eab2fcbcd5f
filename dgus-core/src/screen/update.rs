//! Periodic refresh
//!
//! Runs when the refresh deadline has passed. The first passes after start
//! decide between the power-loss dialog and the main menu; after that each
//! pass mirrors live printer state onto the panel and runs the retry
//! handler.

use dgus_protocol::LinkError;
use embedded_hal::delay::DelayNs;
use embedded_io::{Read, ReadReady, Write};

use super::TouchScreen;
use crate::text::center;
use crate::traits::Printer;
use crate::ui::{vp, Page, RecoveryAction, WaitState};

impl<P, D> TouchScreen<P, D>
where
    P: Read + Write + ReadReady,
    D: DelayNs,
{
    pub(super) fn periodic_update<R: Printer>(
        &mut self,
        printer: &mut R,
        now_ms: u32,
    ) -> Result<(), LinkError> {
        if !self.timer.due(now_ms) {
            return Ok(());
        }

        if !self.recovery_checked {
            if self.card_mounted && printer.pending() {
                self.recovery_checked = true;
                return self.offer_recovery(printer);
            }
            if !printer.pending() {
                self.recovery_checked = true;
                self.timer.set_extra(self.config.idle_extra_ms);
                return self.change_page(Page::MainMenu);
            }
            // Recovery pending but no card yet: keep refreshing until it mounts
        }

        self.refresh_status(printer)?;
        self.run_retry(printer)?;
        self.timer.schedule(now_ms, self.config.update_interval_ms);
        Ok(())
    }

    /// Show the power-loss dialog for the interrupted file
    fn offer_recovery<R: Printer>(&mut self, printer: &mut R) -> Result<(), LinkError> {
        let name = printer.file_name().map(|n| n.trim_start_matches('/'));
        let entry = name.and_then(|n| self.catalog.find(n));

        match entry {
            Some(entry) => {
                #[cfg(feature = "defmt")]
                defmt::debug!("offering recovery of {}", entry.card_name.as_str());

                let centered = center(&entry.display);
                self.link
                    .write_text(vp::CONTINUE_PRINT_FILE_TEXT, &centered)?;
                self.change_page(Page::DialogPowerFailure)
            }
            None => {
                #[cfg(feature = "defmt")]
                defmt::warn!("recovery file not on card");
                self.timer.set_extra(self.config.idle_extra_ms);
                self.change_page(Page::MainMenu)
            }
        }
    }

    fn refresh_status<R: Printer>(&mut self, printer: &mut R) -> Result<(), LinkError> {
        if printer.has_moved() {
            let elapsed = printer.elapsed_s();
            self.show(vp::PRINT_TIME_HOUR, elapsed / 3600)?;
            self.show(vp::PRINT_TIME_MIN, (elapsed % 3600) / 60)?;

            let percent = printer.percent_done();
            if printer.is_printing() && self.last_percent != Some(percent) {
                if percent > 0 {
                    let shown = u32::from(percent) + 1;
                    if shown <= 100 {
                        self.show(vp::PRINT_PROCESS_TITLE, shown)?;
                    }
                } else {
                    self.show(vp::PRINT_PROCESS_TITLE, 0)?;
                }
                self.show(vp::PRINT_PROCESS, u32::from(percent))?;
                self.last_percent = Some(percent);
            }
        }

        let z = printer.z_offset();
        if z != self.saved_z_offset {
            self.save_z_offset(printer);
            self.saved_z_offset = z;
        }

        if self.finishing && !printer.has_queued_moves() {
            self.finishing = false;
            self.print_complete = true;
        }

        self.show_temperatures(printer)?;

        if self.park_pending && printer.is_paused() && !printer.has_queued_moves() {
            self.park_pending = false;
            printer.enqueue("G1 X0 Y0 F3000");
        }

        let hotend = printer.hotend_target();
        let bed = printer.bed_target();
        if hotend != self.last_hotend_target || bed != self.last_bed_target {
            printer.set_hotend_target(hotend);
            printer.set_bed_target(bed);
            self.show_targets(hotend, bed)?;

            // Refresh sooner while heating or cooling outside a print
            if !printer.is_printing() {
                self.timer.set_extra(0);
            }
            self.last_hotend_target = hotend;
            self.last_bed_target = bed;
        }
        Ok(())
    }

    fn run_retry<R: Printer>(&mut self, printer: &mut R) -> Result<(), LinkError> {
        let busy = printer.is_active() || printer.is_paused();
        match self.retry.step(busy) {
            Some(RecoveryAction::Rehome) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("retry: re-homing");
                self.wait = WaitState::Homing;
                printer.enqueue("G28");
                self.show(vp::MOTOR_FREE_ICON, vp::ICON_ON)?;
                self.timer.set_extra(0);
            }
            Some(RecoveryAction::ResetBedLeveling) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("retry: resetting bed leveling");
                printer.reset_bed_leveling();
            }
            None => {}
        }
        Ok(())
    }
}
