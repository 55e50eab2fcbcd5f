//! Bounded text fields
//!
//! Every text variable on the panel is a fixed-width field. Names longer
//! than the field are cut and marked with `~~`; short names can be centered
//! by left-padding with spaces.

use heapless::String;

/// Width of a panel text field in bytes
pub const TEXT_FIELD_LEN: usize = 20;

/// Marker appended to truncated names
pub const ELLIPSIS: &str = "~~";

/// Text that fits in one panel field
pub type FieldText = String<TEXT_FIELD_LEN>;

/// Copy as much of `s` as fits into a `String<N>`
///
/// Stops at a character boundary.
pub fn bounded<const N: usize>(s: &str) -> String<N> {
    let mut out = String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// Fit a name into a text field
///
/// Names of `TEXT_FIELD_LEN` bytes or more keep their first
/// `TEXT_FIELD_LEN - 3` bytes followed by [`ELLIPSIS`], leaving room for the
/// terminator the panel expects.
pub fn fit_name(name: &str) -> FieldText {
    if name.len() < TEXT_FIELD_LEN {
        return bounded(name);
    }

    let keep = TEXT_FIELD_LEN - 1 - ELLIPSIS.len();
    let mut out = FieldText::new();
    for c in name.chars() {
        if out.len() + c.len_utf8() > keep {
            break;
        }
        // Capacity is checked above
        let _ = out.push(c);
    }
    let _ = out.push_str(ELLIPSIS);
    out
}

/// Center a name in a text field by left-padding with spaces
///
/// Names that already fill the field are returned unchanged.
pub fn center(name: &str) -> FieldText {
    let len = name.len();
    let pad = TEXT_FIELD_LEN.saturating_sub(len) / 2;

    let mut out = FieldText::new();
    for _ in 0..pad {
        let _ = out.push(' ');
    }
    for c in name.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name_unchanged() {
        assert_eq!(fit_name("PART").as_str(), "PART");
    }

    #[test]
    fn test_name_one_below_width_unchanged() {
        let name = "abcdefghijklmnopqrs";
        assert_eq!(name.len(), 19);
        assert_eq!(fit_name(name).as_str(), name);
    }

    #[test]
    fn test_long_name_truncated_with_marker() {
        let fitted = fit_name("a_really_long_model_name_v2");
        assert_eq!(fitted.as_str(), "a_really_long_mod~~");
        assert_eq!(fitted.len(), TEXT_FIELD_LEN - 1);
    }

    #[test]
    fn test_truncation_respects_char_boundary() {
        let fitted = fit_name("ééééééééééééééééééé");
        assert!(fitted.ends_with(ELLIPSIS));
        assert!(fitted.len() <= TEXT_FIELD_LEN - 1);
    }

    #[test]
    fn test_center_pads_left() {
        // (20 - 4) / 2 = 8 spaces
        assert_eq!(center("PART").as_str(), "        PART");
    }

    #[test]
    fn test_center_odd_length() {
        // (20 - 5) / 2 = 7 spaces
        assert_eq!(center("PARTS").as_str(), "       PARTS");
    }

    #[test]
    fn test_center_full_width_unchanged() {
        let name = "abcdefghijklmnopqrs";
        assert_eq!(center(name).as_str(), name);
    }

    #[test]
    fn test_bounded_truncates() {
        let s: String<4> = bounded("abcdef");
        assert_eq!(s.as_str(), "abcd");
    }
}
