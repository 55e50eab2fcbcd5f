//! Key table
//!
//! Maps the variable address of a received response to the key that was
//! pressed. The first data word of the response says which button of that
//! key group was used, or carries the entered value.

/// Keys the panel reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Key {
    MainEnter,
    AdjustEnter,
    PrintSpeedEnter,
    StopPrint,
    PausePrint,
    ResumePrint,
    ZoffsetEnter,
    TempControl,
    CoolDown,
    HeaterTempEnter,
    BedTempEnter,
    PrepareEnter,
    BedLevel,
    AutoHome,
    XAxisMove,
    YAxisMove,
    ZAxisMove,
    FilamentLengthEnter,
    FilamentLoadStart,
    FanSpeedEnter,
    Error,
    ChangePage,
    PowerContinue,
    PlaHotendSet,
    PlaBedSet,
    PlaFanSet,
    AbsHotendSet,
    AbsBedSet,
    AbsFanSet,
    SelectFile,
    StartFile,
}

impl Key {
    /// Every key, in table order
    pub const ALL: [Key; 31] = [
        Key::MainEnter,
        Key::AdjustEnter,
        Key::PrintSpeedEnter,
        Key::StopPrint,
        Key::PausePrint,
        Key::ResumePrint,
        Key::ZoffsetEnter,
        Key::TempControl,
        Key::CoolDown,
        Key::HeaterTempEnter,
        Key::BedTempEnter,
        Key::PrepareEnter,
        Key::BedLevel,
        Key::AutoHome,
        Key::XAxisMove,
        Key::YAxisMove,
        Key::ZAxisMove,
        Key::FilamentLengthEnter,
        Key::FilamentLoadStart,
        Key::FanSpeedEnter,
        Key::Error,
        Key::ChangePage,
        Key::PowerContinue,
        Key::PlaHotendSet,
        Key::PlaBedSet,
        Key::PlaFanSet,
        Key::AbsHotendSet,
        Key::AbsBedSet,
        Key::AbsFanSet,
        Key::SelectFile,
        Key::StartFile,
    ];

    /// Look up the key reported at `address`
    pub const fn from_address(address: u16) -> Option<Key> {
        let key = match address {
            0x1002 => Key::MainEnter,
            0x1004 => Key::AdjustEnter,
            0x1006 => Key::PrintSpeedEnter,
            0x1008 => Key::StopPrint,
            0x100A => Key::PausePrint,
            0x100C => Key::ResumePrint,
            0x1026 => Key::ZoffsetEnter,
            0x1030 => Key::TempControl,
            0x1032 => Key::CoolDown,
            0x1034 => Key::HeaterTempEnter,
            0x103A => Key::BedTempEnter,
            0x103E => Key::PrepareEnter,
            0x1044 => Key::BedLevel,
            0x1046 => Key::AutoHome,
            0x1048 => Key::XAxisMove,
            0x104A => Key::YAxisMove,
            0x104C => Key::ZAxisMove,
            0x1054 => Key::FilamentLengthEnter,
            0x1056 => Key::FilamentLoadStart,
            0x1058 => Key::FanSpeedEnter,
            0x105C => Key::Error,
            0x105E => Key::ChangePage,
            0x105F => Key::PowerContinue,
            0x1066 => Key::PlaHotendSet,
            0x1068 => Key::PlaBedSet,
            0x106A => Key::PlaFanSet,
            0x106C => Key::AbsHotendSet,
            0x106E => Key::AbsBedSet,
            0x1070 => Key::AbsFanSet,
            0x20D2 => Key::SelectFile,
            0x20D4 => Key::StartFile,
            _ => return None,
        };
        Some(key)
    }

    /// Address the key is reported at
    pub const fn address(self) -> u16 {
        match self {
            Key::MainEnter => 0x1002,
            Key::AdjustEnter => 0x1004,
            Key::PrintSpeedEnter => 0x1006,
            Key::StopPrint => 0x1008,
            Key::PausePrint => 0x100A,
            Key::ResumePrint => 0x100C,
            Key::ZoffsetEnter => 0x1026,
            Key::TempControl => 0x1030,
            Key::CoolDown => 0x1032,
            Key::HeaterTempEnter => 0x1034,
            Key::BedTempEnter => 0x103A,
            Key::PrepareEnter => 0x103E,
            Key::BedLevel => 0x1044,
            Key::AutoHome => 0x1046,
            Key::XAxisMove => 0x1048,
            Key::YAxisMove => 0x104A,
            Key::ZAxisMove => 0x104C,
            Key::FilamentLengthEnter => 0x1054,
            Key::FilamentLoadStart => 0x1056,
            Key::FanSpeedEnter => 0x1058,
            Key::Error => 0x105C,
            Key::ChangePage => 0x105E,
            Key::PowerContinue => 0x105F,
            Key::PlaHotendSet => 0x1066,
            Key::PlaBedSet => 0x1068,
            Key::PlaFanSet => 0x106A,
            Key::AbsHotendSet => 0x106C,
            Key::AbsBedSet => 0x106E,
            Key::AbsFanSet => 0x1070,
            Key::SelectFile => 0x20D2,
            Key::StartFile => 0x20D4,
        }
    }
}
