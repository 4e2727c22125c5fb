use embassy_rp::Peri;
use embassy_rp::peripherals::RTC;
use embassy_rp::rtc::{DateTime, DayOfWeek, Rtc};
use rtc_sync_core::{ClockSetting, RtcClock, RtcError, debug};

/// The RP2040's on-chip RTC behind the `RtcClock` seam.
///
/// The hardware has no notion of a UTC offset, so the offset of the last
/// write is remembered and reported back on reads.
pub struct RpRtc {
    rtc: Rtc<'static, RTC>,
    utc_offset_hours: i8,
}

impl RpRtc {
    pub fn new(rtc: Peri<'static, RTC>) -> Self {
        Self {
            rtc: Rtc::new(rtc),
            utc_offset_hours: 0,
        }
    }
}

fn day_of_week(weekday: u8) -> DayOfWeek {
    match weekday % 7 {
        1 => DayOfWeek::Monday,
        2 => DayOfWeek::Tuesday,
        3 => DayOfWeek::Wednesday,
        4 => DayOfWeek::Thursday,
        5 => DayOfWeek::Friday,
        6 => DayOfWeek::Saturday,
        _ => DayOfWeek::Sunday,
    }
}

impl RtcClock for RpRtc {
    fn write(&mut self, setting: &ClockSetting) -> Result<(), RtcError> {
        if !setting.is_valid() {
            return Err(RtcError::InvalidSetting);
        }
        let datetime = DateTime {
            year: setting.year,
            month: setting.month,
            day: setting.day,
            day_of_week: day_of_week(setting.weekday),
            hour: setting.hour,
            minute: setting.minute,
            second: setting.second,
        };
        self.rtc
            .set_datetime(datetime)
            .map_err(|_| RtcError::WriteFailed)?;
        self.utc_offset_hours = setting.utc_offset_hours;
        debug!("RTC registers written");
        Ok(())
    }

    fn read(&mut self) -> Result<ClockSetting, RtcError> {
        let now = self.rtc.now().map_err(|_| RtcError::ReadFailed)?;
        Ok(ClockSetting {
            year: now.year,
            month: now.month,
            day: now.day,
            weekday: now.day_of_week as u8,
            hour: now.hour,
            minute: now.minute,
            second: now.second,
            subsecond: 0,
            utc_offset_hours: self.utc_offset_hours,
        })
    }
}
