//! Wait marker
//!
//! Set while a blocking printer operation started from the panel is in
//! flight. Every key press is dropped until the host reports completion.
//! There is no timeout: a wedged operation keeps input blocked.

/// Blocking operation the screen is waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum WaitState {
    #[default]
    Idle = 0,
    /// Auto bed leveling
    Leveling = 3,
    /// Homing all axes
    Homing = 4,
    /// A jog move is being queued
    Jogging = 5,
    /// Homing before Z offset adjustment
    ZHoming = 6,
    /// Print abort
    Stopping = 7,
}

impl WaitState {
    /// Returns true while input must be dropped
    pub const fn is_waiting(self) -> bool {
        !matches!(self, WaitState::Idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_accepts_input() {
        assert!(!WaitState::Idle.is_waiting());
        assert_eq!(WaitState::default(), WaitState::Idle);
    }

    #[test]
    fn test_codes_distinct() {
        let states = [
            WaitState::Leveling,
            WaitState::Homing,
            WaitState::Jogging,
            WaitState::ZHoming,
            WaitState::Stopping,
        ];
        for (i, a) in states.iter().enumerate() {
            assert!(a.is_waiting());
            for b in &states[i + 1..] {
                assert_ne!(*a as u8, *b as u8);
            }
        }
    }
}
