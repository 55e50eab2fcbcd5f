//! Panel variable addresses
//!
//! Addresses of the display fields the screen writes. Key addresses live
//! in [`keys`](super::keys); several keys echo into the field they edit and
//! so share an address with an entry here.

/// Page switch register (written as a variable)
pub const PAGE_CHANGE: u16 = 0x0084;
/// Page switch command; the page id goes in the low byte
pub const PAGE_CHANGE_BASE: u32 = 0x5A01_0000;
/// Buzzer control
pub const SOUND: u16 = 0x00A0;
/// Start-up sound setting
pub const START_SOUND: u32 = 0x0604_80A0;

pub const START_PROCESS_ICON: u16 = 0x1000;
pub const PRINT_SPEED_RATE: u16 = 0x1006;
pub const PRINT_PROCESS_TITLE: u16 = 0x100E;
pub const PRINT_TIME_HOUR: u16 = 0x1010;
pub const PRINT_TIME_MIN: u16 = 0x1012;
pub const PRINT_PROCESS: u16 = 0x1016;
pub const MOTOR_FREE_ICON: u16 = 0x1020;
pub const FILAMENT_LOAD_ICON: u16 = 0x1022;
pub const AUTO_BED_LEVEL_TITLE: u16 = 0x1024;
pub const AUTO_BED_LEVEL_ZOFFSET: u16 = 0x1026;
pub const HEAD_SET_TEMP: u16 = 0x1034;
pub const HEAD_CURRENT_TEMP: u16 = 0x1036;
pub const AUTO_BED_PREHEAT_HEAD: u16 = 0x1038;
pub const BED_SET_TEMP: u16 = 0x103A;
pub const BED_CURRENT_TEMP: u16 = 0x103C;
pub const AXIS_X_COORD: u16 = 0x1048;
pub const AXIS_Y_COORD: u16 = 0x104A;
pub const AXIS_Z_COORD: u16 = 0x104C;
pub const HEAD_FILAMENT_LOAD_DATA: u16 = 0x1054;
pub const FAN_SPEED_CONTROL_DATA: u16 = 0x1058;
pub const PRINTER_FANOPEN_TITLE: u16 = 0x1062;
pub const PRINTER_LEDOPEN_TITLE: u16 = 0x1064;
pub const PLA_HEAD_SET_DATA: u16 = 0x1066;
pub const PLA_BED_SET_DATA: u16 = 0x1068;
pub const PLA_FAN_SET_DATA: u16 = 0x106A;
pub const ABS_HEAD_SET_DATA: u16 = 0x106C;
pub const ABS_BED_SET_DATA: u16 = 0x106E;
pub const ABS_FAN_SET_DATA: u16 = 0x1070;
pub const FILE1_SELECT_ICON: u16 = 0x1200;
pub const FILE1_TEXT: u16 = 0x200A;
pub const PRINTER_MACHINE_TEXT: u16 = 0x2100;
pub const PRINTER_VERSION_TEXT: u16 = 0x2120;
pub const PRINTER_PRINTSIZE_TEXT: u16 = 0x2130;
pub const PRINTER_WEBSITE_TEXT: u16 = 0x2140;
pub const CONTINUE_PRINT_FILE_TEXT: u16 = 0x2160;
/// Text colour descriptors of the file list
pub const FILENAME_NATURE: u16 = 0x6003;

/// Words covered by one text field
pub const TEXT_FIELD_WORDS: u16 = 10;
/// Words covered by the machine info text block
pub const MACHINE_TEXT_WORDS: u16 = 20;

/// Generic two-state icon values
pub const ICON_ON: u32 = 1;
pub const ICON_OFF: u32 = 2;

/// File selection icon values
pub const SELECT_ICON_OFF: u32 = 10;
pub const SELECT_ICON_ON: u32 = 6;

/// File name colours
pub const COLOUR_NORMAL: u32 = 0xFFFF;
pub const COLOUR_SELECTED: u32 = 0x87F0;

/// Filament sensor icon values
pub const FILAMENT_ICON_RUNOUT: u32 = 10;
pub const FILAMENT_ICON_LOADED: u32 = 9;

/// Text variable of catalog entry `index`
pub const fn file_text(index: usize) -> u16 {
    FILE1_TEXT + TEXT_FIELD_WORDS * index as u16
}

/// Colour descriptor of catalog entry `index`
pub const fn file_colour(index: usize) -> u16 {
    FILENAME_NATURE + 16 * (index as u16 + 1)
}

/// Selection icon of catalog entry `index`
pub const fn file_select_icon(index: usize) -> u16 {
    FILE1_SELECT_ICON + index as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_addresses() {
        assert_eq!(file_text(0), 0x200A);
        assert_eq!(file_text(19), 0x200A + 190);
        assert_eq!(file_colour(0), 0x6013);
        assert_eq!(file_select_icon(2), 0x1202);
    }
}
