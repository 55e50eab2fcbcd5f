//! Bounded retry for known failures
//!
//! A failure raised by the host is retried once per refresh cycle until it
//! resolves or the attempt budget runs out. An exhausted failure is dropped
//! silently.

/// Failure the host asked the screen to recover from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FailureClass {
    #[default]
    None,
    /// Give up immediately
    Abort,
    /// Re-home once no print is running
    Rehome,
    /// Discard the leveling mesh
    BedLevelReset,
}

/// Action the screen must carry out for a retry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecoveryAction {
    Rehome,
    ResetBedLeveling,
}

/// Retry state
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RetryHandler {
    class: FailureClass,
    attempts: u8,
    budget: u8,
}

impl RetryHandler {
    pub const fn new(budget: u8) -> Self {
        Self {
            class: FailureClass::None,
            attempts: 0,
            budget,
        }
    }

    /// Arm the handler for a new failure
    pub fn raise(&mut self, class: FailureClass) {
        self.class = class;
        self.attempts = 0;
    }

    pub fn class(&self) -> FailureClass {
        self.class
    }

    fn clear(&mut self) {
        self.class = FailureClass::None;
        self.attempts = 0;
    }

    /// Run one retry cycle
    ///
    /// `job_busy` is true while a print is active or paused; re-homing is
    /// deferred until it is false.
    pub fn step(&mut self, job_busy: bool) -> Option<RecoveryAction> {
        if self.class == FailureClass::None {
            return None;
        }

        if self.attempts >= self.budget {
            #[cfg(feature = "defmt")]
            defmt::warn!("retry: giving up on {}", self.class);
            self.clear();
            return None;
        }

        self.attempts += 1;

        match self.class {
            FailureClass::None => None,
            FailureClass::Abort => {
                self.clear();
                None
            }
            FailureClass::Rehome if job_busy => None,
            FailureClass::Rehome => {
                self.clear();
                Some(RecoveryAction::Rehome)
            }
            FailureClass::BedLevelReset => {
                self.clear();
                Some(RecoveryAction::ResetBedLeveling)
            }
        }
    }
}
