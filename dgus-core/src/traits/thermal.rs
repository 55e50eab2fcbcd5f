//! Heater and fan access

/// Trait for temperature regulation and part cooling
///
/// Temperatures are in whole degrees Celsius except the current readings,
/// which keep their fractional part.
pub trait Thermal {
    /// Current hotend temperature
    fn hotend_celsius(&self) -> f32;

    /// Current bed temperature
    fn bed_celsius(&self) -> f32;

    /// Hotend target temperature
    fn hotend_target(&self) -> i16;

    /// Bed target temperature
    fn bed_target(&self) -> i16;

    /// Set the hotend target temperature
    fn set_hotend_target(&mut self, celsius: i16);

    /// Set the bed target temperature
    fn set_bed_target(&mut self, celsius: i16);

    /// Part cooling fan speed (0-255)
    fn fan_speed(&self) -> u8;

    /// Set the part cooling fan speed (0-255)
    fn set_fan_speed(&mut self, speed: u8);

    /// Stop any blocking wait for a heater to reach its target
    fn cancel_heatup(&mut self);
}
