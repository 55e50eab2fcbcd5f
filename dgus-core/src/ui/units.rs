//! Fixed-point conversions for panel fields
//!
//! The panel only holds 16-bit words. Z offsets travel as hundredths of a
//! millimetre, with values of 32768 and up read as negative. Positions
//! travel as tenths of a millimetre.

/// Half-range threshold of a 16-bit field
const NEGATIVE_THRESHOLD: u16 = 0x8000;

/// Round to the nearest integer, halves away from zero
pub fn round(value: f32) -> i32 {
    if value >= 0.0 {
        (value + 0.5) as i32
    } else {
        (value - 0.5) as i32
    }
}

/// Z offset in mm to its panel representation
pub fn encode_z_offset(mm: f32) -> i32 {
    round(mm * 100.0)
}

/// Panel Z offset word back to mm
pub fn decode_z_offset(raw: u16) -> f32 {
    if raw >= NEGATIVE_THRESHOLD {
        (f32::from(raw) - 65536.0) / 100.0
    } else {
        f32::from(raw) / 100.0
    }
}

/// Position in mm to tenths
pub fn to_tenths(mm: f32) -> i32 {
    round(mm * 10.0)
}

/// Panel tenths back to mm
pub fn from_tenths(raw: u16) -> f32 {
    f32::from(raw) / 10.0
}
