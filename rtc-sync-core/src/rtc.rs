// rtc.rs
use crate::calendar::{OffsetMode, apply_utc_offset, days_in_month};
use crate::gps::types::GpsFix;
use crate::types::WallTime;
use core::cell::RefCell;
use core::fmt::Write;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::RawMutex;

/// Value committed to the RTC in one transaction. Local time; the date is
/// only carried across midnight under `OffsetMode::CarryDate`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockSetting {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    /// Not tracked; always 0.
    pub weekday: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    /// Not tracked; always 0.
    pub subsecond: u32,
    pub utc_offset_hours: i8,
}

impl ClockSetting {
    /// `None` unless the fix carries both a date and a time.
    pub fn from_fix(fix: &GpsFix, utc_offset_hours: i8, mode: OffsetMode) -> Option<Self> {
        let date = fix.date?;
        let time = fix.time?;
        let local = apply_utc_offset(date, time, utc_offset_hours, mode);
        Some(Self {
            year: local.year,
            month: local.month,
            day: local.day,
            weekday: 0,
            hour: local.hour,
            minute: time.minute,
            second: time.second,
            subsecond: 0,
            utc_offset_hours,
        })
    }

    /// The UTC hour this setting was derived from.
    pub fn utc_hour(&self) -> u8 {
        (self.hour as i16 - self.utc_offset_hours as i16).rem_euclid(24) as u8
    }

    pub fn wall_time(&self) -> WallTime {
        WallTime::new(self.hour, self.minute, self.second)
    }

    /// Field ranges an RTC will accept.
    pub fn is_valid(&self) -> bool {
        (1..=12).contains(&self.month)
            && self.day >= 1
            && self.day <= days_in_month(self.year, self.month)
            && self.hour < 24
            && self.minute < 60
            && self.second < 60
    }

    /// `YYYY-MM-DD hh:mm:ss`
    pub fn format(&self) -> heapless::String<24> {
        let mut s = heapless::String::new();
        let _ = write!(
            s,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        );
        s
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RtcError {
    WriteFailed,
    ReadFailed,
    InvalidSetting,
}

/// Battery-backed clock hardware.
pub trait RtcClock {
    fn write(&mut self, setting: &ClockSetting) -> Result<(), RtcError>;
    fn read(&mut self) -> Result<ClockSetting, RtcError>;
}

/// RTC shared between the clock task (the only writer) and readers.
pub type SharedRtc<M, R> = Mutex<M, RefCell<R>>;

pub fn read_shared<M: RawMutex, R: RtcClock>(rtc: &SharedRtc<M, R>) -> Result<ClockSetting, RtcError> {
    rtc.lock(|r| r.borrow_mut().read())
}

pub fn write_shared<M: RawMutex, R: RtcClock>(
    rtc: &SharedRtc<M, R>,
    setting: &ClockSetting,
) -> Result<(), RtcError> {
    rtc.lock(|r| r.borrow_mut().write(setting))
}
