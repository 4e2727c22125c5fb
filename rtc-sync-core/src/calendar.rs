// calendar.rs
//! Date arithmetic for turning a UTC GPS fix into local RTC fields.
use crate::gps::types::{GpsDate, GpsTime};

/// How a UTC offset is applied to the date and time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OffsetMode {
    /// Shift the hour modulo 24 and leave the date as reported in UTC.
    /// Around midnight the date is off by one day.
    #[default]
    HourOnly,
    /// Carry into day, month and year with Gregorian month lengths.
    CarryDate,
}

/// Local calendar fields after applying an offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LocalDate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
}

/// Two digit NMEA years are 2000-based. Already absolute years pass through.
pub const fn expand_year(year: u16) -> u16 {
    if year < 100 { 2000 + year } else { year }
}

pub const fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub const fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 31,
    }
}

pub fn apply_utc_offset(
    date: GpsDate,
    time: GpsTime,
    offset_hours: i8,
    mode: OffsetMode,
) -> LocalDate {
    let year = expand_year(date.year);
    let shifted = time.hour as i16 + offset_hours as i16;
    let hour = shifted.rem_euclid(24) as u8;

    let (mut year, mut month, mut day) = (year, date.month, date.day);
    if mode == OffsetMode::CarryDate {
        let mut day_shift = shifted.div_euclid(24);
        while day_shift > 0 {
            if day < days_in_month(year, month) {
                day += 1;
            } else if month < 12 {
                day = 1;
                month += 1;
            } else {
                day = 1;
                month = 1;
                year += 1;
            }
            day_shift -= 1;
        }
        while day_shift < 0 {
            if day > 1 {
                day -= 1;
            } else if month > 1 {
                month -= 1;
                day = days_in_month(year, month);
            } else {
                month = 12;
                day = 31;
                year -= 1;
            }
            day_shift += 1;
        }
    }

    LocalDate {
        year,
        month,
        day,
        hour,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_year() {
        assert_eq!(expand_year(24), 2024);
        assert_eq!(expand_year(0), 2000);
        assert_eq!(expand_year(2031), 2031);
    }

    #[test]
    fn test_leap_years() {
        assert!(is_leap_year(2024));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(2100));
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2023, 9), 30);
    }

    #[test]
    fn test_hour_only_wraps_without_carry() {
        let local = apply_utc_offset(
            GpsDate::new(24, 1, 1),
            GpsTime::new(3, 0, 0),
            -8,
            OffsetMode::HourOnly,
        );
        assert_eq!(
            local,
            LocalDate {
                year: 2024,
                month: 1,
                day: 1,
                hour: 19
            }
        );
    }

    #[test]
    fn test_carry_back_across_new_year() {
        let local = apply_utc_offset(
            GpsDate::new(24, 1, 1),
            GpsTime::new(3, 0, 0),
            -8,
            OffsetMode::CarryDate,
        );
        assert_eq!(
            local,
            LocalDate {
                year: 2023,
                month: 12,
                day: 31,
                hour: 19
            }
        );
    }

    #[test]
    fn test_carry_forward_into_leap_day() {
        let local = apply_utc_offset(
            GpsDate::new(24, 2, 28),
            GpsTime::new(20, 0, 0),
            9,
            OffsetMode::CarryDate,
        );
        assert_eq!((local.month, local.day, local.hour), (2, 29, 5));

        let local = apply_utc_offset(
            GpsDate::new(23, 2, 28),
            GpsTime::new(20, 0, 0),
            9,
            OffsetMode::CarryDate,
        );
        assert_eq!((local.month, local.day, local.hour), (3, 1, 5));
    }

    #[test]
    fn test_carry_back_into_short_month() {
        let local = apply_utc_offset(
            GpsDate::new(24, 5, 1),
            GpsTime::new(1, 0, 0),
            -5,
            OffsetMode::CarryDate,
        );
        assert_eq!((local.year, local.month, local.day, local.hour), (2024, 4, 30, 20));
    }
}
