//! Refresh deadline
//!
//! The periodic refresh runs when `now` passes the deadline and then
//! schedules the next one at `now + interval + extra`. Handlers shrink or
//! grow `extra` to speed up or hold back the following refresh.

/// Wrap-safe refresh deadline in milliseconds
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UpdateTimer {
    next_ms: Option<u32>,
    extra_ms: u32,
}

impl UpdateTimer {
    /// Create a timer that is due immediately
    pub const fn new(extra_ms: u32) -> Self {
        Self {
            next_ms: None,
            extra_ms,
        }
    }

    /// Check if the deadline has passed
    pub fn due(&self, now_ms: u32) -> bool {
        match self.next_ms {
            None => true,
            // Signed distance handles counter wrap
            Some(next) => (now_ms.wrapping_sub(next) as i32) > 0,
        }
    }

    /// Schedule the next deadline
    pub fn schedule(&mut self, now_ms: u32, interval_ms: u32) {
        self.next_ms = Some(now_ms.wrapping_add(interval_ms).wrapping_add(self.extra_ms));
    }

    /// Set the extra delay added to the next schedule
    pub fn set_extra(&mut self, extra_ms: u32) {
        self.extra_ms = extra_ms;
    }

    pub fn extra(&self) -> u32 {
        self.extra_ms
    }
}
