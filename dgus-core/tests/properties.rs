//! Property tests for value conversions and clamping

use dgus_core::config::{AxisBounds, TempLimits, TouchConfig};
use dgus_core::text::{center, fit_name, ELLIPSIS, TEXT_FIELD_LEN};
use dgus_core::traits::Axis;
use dgus_core::ui::units::{decode_z_offset, encode_z_offset};
use proptest::prelude::*;

fn axis() -> impl Strategy<Value = Axis> {
    prop_oneof![Just(Axis::X), Just(Axis::Y), Just(Axis::Z)]
}

proptest! {
    #[test]
    fn prop_z_offset_survives_the_panel(hundredths in -2000i32..=2000) {
        let offset = hundredths as f32 / 100.0;
        let word = encode_z_offset(offset) as u16;
        let back = decode_z_offset(word);
        let diff = back - offset;
        prop_assert!(diff < 0.01 && diff > -0.01, "{} -> {:#06x} -> {}", offset, word, back);
    }

    #[test]
    fn prop_jog_clamp_is_idempotent(axis in axis(), tenths in any::<u16>()) {
        let bounds = TouchConfig::default().bounds(axis);
        let once = bounds.clamp(f32::from(tenths) / 10.0);
        prop_assert!(bounds.contains(once));
        prop_assert_eq!(bounds.clamp(once), once);
    }

    #[test]
    fn prop_target_beyond_bound_lands_on_bound(min in -50.0f32..0.0, span in 1.0f32..300.0, over in 0.0f32..1000.0) {
        let bounds = AxisBounds::new(min, min + span);
        prop_assert_eq!(bounds.clamp(bounds.max + over), bounds.max);
        prop_assert_eq!(bounds.clamp(bounds.min - over), bounds.min);
    }

    #[test]
    fn prop_temperature_entry_in_range(raw in any::<u16>()) {
        let limits = TempLimits::new(5, 260);
        let target = limits.clamp(raw);
        prop_assert!((limits.min..=limits.max).contains(&target));
    }

    #[test]
    fn prop_fitted_name_leaves_terminator_room(name in "\\PC{0,40}") {
        let fitted = fit_name(&name);
        prop_assert!(fitted.len() < TEXT_FIELD_LEN);
        if name.len() >= TEXT_FIELD_LEN {
            prop_assert!(fitted.ends_with(ELLIPSIS));
        } else {
            prop_assert_eq!(fitted.as_str(), name.as_str());
        }
    }

    #[test]
    fn prop_centered_name_keeps_text(name in "[A-Za-z0-9_.-]{0,19}") {
        let centered = center(&name);
        prop_assert!(centered.len() <= TEXT_FIELD_LEN);
        prop_assert_eq!(centered.trim_start_matches(' '), name.trim_start_matches(' '));
    }
}
