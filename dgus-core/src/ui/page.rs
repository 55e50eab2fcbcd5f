//! Panel pages
//!
//! The panel stores the page layouts; the printer only tells it which one
//! to show. Any page may follow any other.

use dgus_protocol::{Link, LinkError};
use embedded_hal::delay::DelayNs;
use embedded_io::{Read, ReadReady, Write};

use super::vp;

/// Panel pages by id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Page {
    #[default]
    Boot = 0,
    MainMenu = 1,
    FileSelection = 2,
    PrintProgressRunning = 10,
    PrintProgressPaused = 11,
    DialogPausePrinting = 12,
    DialogStopPrinting = 13,
    MenuTuning = 14,
    MenuPrepare = 21,
    MenuControl = 24,
    MenuTemp = 25,
    MenuPlaTemp = 26,
    MenuAbsTemp = 27,
    MenuZoffsetLeveling = 30,
    Leveling = 32,
    Move10mm = 40,
    Move1mm = 41,
    Move01mm = 42,
    Feed = 45,
    MenuAbout = 50,
    DialogPowerFailure = 60,
    ErrFilamentRunoutHotendCold = 70,
    ErrFilamentRunoutFilamentLoaded = 71,
}

impl Page {
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Value written to the page switch register
    pub const fn switch_value(self) -> u32 {
        vp::PAGE_CHANGE_BASE | self as u32
    }
}

/// The page the panel is showing
#[derive(Debug, Clone, Copy, Default)]
pub struct PageRegister {
    current: Page,
}

impl PageRegister {
    pub const fn new() -> Self {
        Self {
            current: Page::Boot,
        }
    }

    pub fn current(&self) -> Page {
        self.current
    }

    /// Switch the panel to `page`
    ///
    /// The register is only updated once the switch frame is sent.
    pub fn change_page<P, D>(&mut self, link: &mut Link<P, D>, page: Page) -> Result<(), LinkError>
    where
        P: Read + Write + ReadReady,
        D: DelayNs,
    {
        #[cfg(feature = "defmt")]
        defmt::debug!("page {} -> {}", self.current, page);

        link.write_value(vp::PAGE_CHANGE, page.switch_value())?;
        self.current = page;
        Ok(())
    }

    /// Send the current page again
    pub fn refresh_page<P, D>(&mut self, link: &mut Link<P, D>) -> Result<(), LinkError>
    where
        P: Read + Write + ReadReady,
        D: DelayNs,
    {
        let page = self.current;
        self.change_page(link, page)
    }
}
