//! Motion queue and position access

/// Machine axes reachable from the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    X,
    Y,
    Z,
    /// Extruder
    E,
}

impl Axis {
    /// Index into per-axis tables
    pub const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
            Axis::E => 3,
        }
    }
}

/// Trait for the motion planner and command queue
pub trait MotionControl {
    /// Current logical position of an axis in mm
    fn position(&self, axis: Axis) -> f32;

    /// Check if the axis position is known (homed)
    fn is_homed(&self, axis: Axis) -> bool;

    /// Check if the planner has no room for another move
    fn queue_full(&self) -> bool;

    /// Check if any moves are still buffered
    fn has_queued_moves(&self) -> bool;

    /// Buffer a single-axis move to `target` mm at `feed_mm_s`
    ///
    /// Callers check [`queue_full`](Self::queue_full) first.
    fn move_axis(&mut self, axis: Axis, target: f32, feed_mm_s: f32);

    /// Queue a command, waiting for room if needed
    fn enqueue(&mut self, gcode: &str);

    /// Queue a command ahead of everything already buffered
    fn inject(&mut self, gcode: &str);

    /// Execute a command immediately, bypassing the queue
    fn execute_now(&mut self, gcode: &str);

    /// Apply a Z baby-step of `mm`
    fn babystep_z(&mut self, mm: f32);

    /// Discard the bed leveling mesh
    fn reset_bed_leveling(&mut self);

    /// Feed rate override in percent
    fn feedrate_percent(&self) -> u16;

    /// Set the feed rate override in percent
    fn set_feedrate_percent(&mut self, percent: u16);
}
