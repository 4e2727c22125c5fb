// gps/types.rs

/// Calendar date as carried by NMEA: `year` is the two digit field (e.g. 24).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GpsDate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl GpsDate {
    pub const fn new(year: u16, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }
}

/// UTC time of day, whole seconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GpsTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl GpsTime {
    pub const fn new(hour: u8, minute: u8, second: u8) -> Self {
        Self {
            hour,
            minute,
            second,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Hemisphere {
    North,
    South,
    East,
    West,
}

impl Hemisphere {
    pub const fn is_negative(&self) -> bool {
        matches!(self, Hemisphere::South | Hemisphere::West)
    }
}

/// A latitude or longitude exactly as NMEA encodes it: whole degrees plus
/// decimal minutes, kept in ten-thousandths of a minute to stay integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Coordinate {
    pub degrees: u16,
    pub minutes_e4: u32,
    pub hemisphere: Hemisphere,
}

/// Latest decoded GPS snapshot. Replaced wholesale on every accepted sentence.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GpsFix {
    pub date: Option<GpsDate>,
    pub time: Option<GpsTime>,
    pub latitude: Option<Coordinate>,
    pub longitude: Option<Coordinate>,
    pub fix_valid: bool,
    pub satellites: u8,
}

impl GpsFix {
    pub const fn new() -> Self {
        Self {
            date: None,
            time: None,
            latitude: None,
            longitude: None,
            fix_valid: false,
            satellites: 0,
        }
    }

    /// Valid fix with both date and time present.
    pub const fn is_usable(&self) -> bool {
        self.fix_valid && self.date.is_some() && self.time.is_some()
    }

    pub const fn has_position(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GpsHealth {
    pub sentences: u32,
    pub checksum_errors: u16,
    pub parse_errors: u16,
    /// Failed UART reads (framing, overrun, break).
    pub uart_errors: u16,
}

impl GpsHealth {
    pub const fn new() -> Self {
        Self {
            sentences: 0,
            checksum_errors: 0,
            parse_errors: 0,
            uart_errors: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpsSensorError {
    InvalidChecksum,
    InvalidData,
    /// Well formed but not a sentence this parser decodes.
    Unsupported,
}
