// Hardware doubles shared by the host tests.
use crate::rtc::{ClockSetting, RtcClock, RtcError};
use core::convert::Infallible;
use embedded_hal::digital::{ErrorType, OutputPin};
use embedded_hal_async::delay::DelayNs;

/// Output pin that remembers every level driven onto it.
pub struct MockPin {
    pub levels: heapless::Vec<bool, 32>,
}

impl MockPin {
    pub fn new() -> Self {
        Self {
            levels: heapless::Vec::new(),
        }
    }

    pub fn is_high(&self) -> bool {
        self.levels.last().copied().unwrap_or(false)
    }
}

impl ErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        let _ = self.levels.push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        let _ = self.levels.push(true);
        Ok(())
    }
}

/// RTC that stores the last committed setting.
pub struct MockRtc {
    pub setting: Option<ClockSetting>,
    pub writes: u32,
    /// Number of upcoming writes that fail.
    pub failing_writes: u32,
}

impl MockRtc {
    pub fn new() -> Self {
        Self {
            setting: None,
            writes: 0,
            failing_writes: 0,
        }
    }

    pub fn holding(setting: ClockSetting) -> Self {
        Self {
            setting: Some(setting),
            ..Self::new()
        }
    }
}

impl RtcClock for MockRtc {
    fn write(&mut self, setting: &ClockSetting) -> Result<(), RtcError> {
        if self.failing_writes > 0 {
            self.failing_writes -= 1;
            return Err(RtcError::WriteFailed);
        }
        self.writes += 1;
        self.setting = Some(*setting);
        Ok(())
    }

    fn read(&mut self) -> Result<ClockSetting, RtcError> {
        self.setting.ok_or(RtcError::ReadFailed)
    }
}

/// Delay that finishes on its second poll and tallies the time asked for.
pub struct MockDelay {
    pub elapsed_ms: u64,
    pub calls: u32,
}

impl MockDelay {
    pub fn new() -> Self {
        Self {
            elapsed_ms: 0,
            calls: 0,
        }
    }
}

impl DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ms += (ns / 1_000_000) as u64;
        self.calls += 1;
        embassy_futures::yield_now().await;
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.elapsed_ms += ms as u64;
        self.calls += 1;
        embassy_futures::yield_now().await;
    }
}

/// A qualifying snapshot: valid fix, date, time and position.
pub fn good_fix(date: (u16, u8, u8), time: (u8, u8, u8)) -> crate::GpsFix {
    use crate::gps::types::{Coordinate, GpsDate, GpsTime, Hemisphere};
    let mut fix = crate::GpsFix::new();
    fix.fix_valid = true;
    fix.satellites = 7;
    fix.date = Some(GpsDate::new(date.0, date.1, date.2));
    fix.time = Some(GpsTime::new(time.0, time.1, time.2));
    fix.latitude = Some(Coordinate {
        degrees: 37,
        minutes_e4: 232_475,
        hemisphere: Hemisphere::North,
    });
    fix.longitude = Some(Coordinate {
        degrees: 121,
        minutes_e4: 583_416,
        hemisphere: Hemisphere::West,
    });
    fix
}
