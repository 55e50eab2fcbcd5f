//! Card presence tracking and file list painting

use dgus_protocol::LinkError;
use embedded_hal::delay::DelayNs;
use embedded_io::{Read, ReadReady, Write};

use super::TouchScreen;
use crate::catalog::MAX_FILES;
use crate::traits::Printer;
use crate::ui::vp;

impl<P, D> TouchScreen<P, D>
where
    P: Read + Write + ReadReady,
    D: DelayNs,
{
    /// Mount the card if needed and load the file list
    pub(super) fn init_card<R: Printer>(&mut self, printer: &mut R) -> Result<(), LinkError> {
        if !printer.is_mounted() {
            printer.mount();
        }

        self.card_mounted = printer.is_mounted();
        if self.card_mounted {
            self.load_catalog(printer)?;
        }
        Ok(())
    }

    /// Follow card insertion and removal
    pub(super) fn sync_card<R: Printer>(&mut self, printer: &mut R) -> Result<(), LinkError> {
        let mounted = printer.is_mounted();
        if mounted != self.card_mounted {
            #[cfg(feature = "defmt")]
            defmt::debug!("card mounted: {}", mounted);

            if mounted {
                self.load_catalog(printer)?;
            } else {
                self.unload_catalog()?;
            }
            self.card_mounted = mounted;
        }

        if self.card_update && self.card_mounted {
            self.paint_catalog()?;
            self.card_update = false;
        }
        Ok(())
    }

    /// Rebuild the catalog and send every name
    fn load_catalog<R: Printer>(&mut self, printer: &mut R) -> Result<(), LinkError> {
        self.catalog.rebuild(printer);
        for entry in self.catalog.entries() {
            self.link.write_text(entry.address, &entry.display)?;
        }
        Ok(())
    }

    /// Blank the file list after the card went away
    fn unload_catalog(&mut self) -> Result<(), LinkError> {
        for (i, entry) in self.catalog.entries().iter().enumerate() {
            for offset in 0..vp::TEXT_FIELD_WORDS {
                self.link.write_value(entry.address + offset, 0)?;
            }
            self.link.write_value(vp::file_colour(i), vp::COLOUR_NORMAL)?;
        }

        self.clear_words(vp::CONTINUE_PRINT_FILE_TEXT, vp::TEXT_FIELD_WORDS)?;
        for i in 0..MAX_FILES {
            self.show(vp::file_select_icon(i), vp::SELECT_ICON_OFF)?;
        }
        self.catalog.clear();
        Ok(())
    }

    /// Send every name with the unselected look
    pub(super) fn paint_catalog(&mut self) -> Result<(), LinkError> {
        for (i, entry) in self.catalog.entries().iter().enumerate() {
            self.link.write_text(entry.address, &entry.display)?;
            self.link.write_value(vp::file_colour(i), vp::COLOUR_NORMAL)?;
            self.link.write_value(vp::file_select_icon(i), vp::SELECT_ICON_OFF)?;
        }
        Ok(())
    }

    /// Repaint the list so only the selected entry is highlighted
    pub(super) fn paint_selection(&mut self) -> Result<(), LinkError> {
        for i in 0..self.catalog.len() {
            self.show(vp::file_colour(i), vp::COLOUR_NORMAL)?;
            self.show(vp::file_select_icon(i), vp::SELECT_ICON_OFF)?;
        }

        if let Some(i) = self.catalog.selected() {
            self.show(vp::file_colour(i), vp::COLOUR_SELECTED)?;
            self.show(vp::file_select_icon(i), vp::SELECT_ICON_ON)?;
        }
        Ok(())
    }

    /// Show the selected file, centered, in the continue-print field
    pub(super) fn show_selected_name(&mut self) -> Result<(), LinkError> {
        self.clear_words(vp::CONTINUE_PRINT_FILE_TEXT, vp::TEXT_FIELD_WORDS)?;

        if let Some(entry) = self.catalog.selected_entry() {
            let centered = crate::text::center(&entry.display);
            self.link
                .write_text(vp::CONTINUE_PRINT_FILE_TEXT, &centered)?;
        }
        Ok(())
    }
}
