// gps/coords.rs
//! Alternative renderings of a raw NMEA coordinate.
use crate::gps::types::{Coordinate, Hemisphere};

impl Coordinate {
    /// Signed decimal degrees; south and west are negative.
    pub fn signed_degrees(&self) -> f32 {
        let (magnitude, hemisphere) = self.decimal_degrees();
        if hemisphere.is_negative() {
            -magnitude
        } else {
            magnitude
        }
    }

    /// Unsigned decimal degrees with the hemisphere alongside.
    pub fn decimal_degrees(&self) -> (f32, Hemisphere) {
        let degrees = self.degrees as f32 + self.minutes_e4 as f32 / 600_000.0;
        (degrees, self.hemisphere)
    }

    /// Degrees, whole minutes and rounded seconds.
    pub fn dms(&self) -> (u16, u8, u8, Hemisphere) {
        let mut degrees = self.degrees;
        let mut minutes = self.minutes_e4 / 10_000;
        let mut seconds = ((self.minutes_e4 % 10_000) * 60 + 5_000) / 10_000;
        if seconds == 60 {
            seconds = 0;
            minutes += 1;
        }
        if minutes == 60 {
            minutes = 0;
            degrees += 1;
        }
        (degrees, minutes as u8, seconds as u8, self.hemisphere)
    }

    /// Signed integer microdegrees, no float math.
    pub fn microdegrees(&self) -> i32 {
        let total = self.degrees as i32 * 1_000_000 + (self.minutes_e4 * 100 / 60) as i32;
        if self.hemisphere.is_negative() {
            -total
        } else {
            total
        }
    }
}
