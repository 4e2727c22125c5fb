// policy.rs
//! Knobs deciding when and how the RTC is synchronised.
use crate::gps::types::GpsFix;
use crate::types::WallTime;

pub use crate::calendar::OffsetMode;

/// Decides whether a GPS snapshot is good enough to set the clock from.
pub type FixPredicate = fn(&GpsFix) -> bool;

/// Decides, from the previous and current RTC readings, whether to resync.
pub type ResyncTrigger = fn(&WallTime, &WallTime) -> bool;

/// Valid fix with date, time and a position.
pub fn position_and_date(fix: &GpsFix) -> bool {
    fix.is_usable() && fix.has_position()
}

/// Valid fix with date and time; position not required.
pub fn date_and_time(fix: &GpsFix) -> bool {
    fix.is_usable()
}

/// Fires when the clock has gone from AM to PM since the last check.
pub fn crossed_local_noon(previous: &WallTime, current: &WallTime) -> bool {
    previous.hour < 12 && current.hour >= 12
}

/// Fires when the hour has wrapped past 00:00 since the last check.
pub fn crossed_midnight(previous: &WallTime, current: &WallTime) -> bool {
    current.hour < previous.hour
}

pub fn never(_previous: &WallTime, _current: &WallTime) -> bool {
    false
}

/// What happens to GPS power between synchronisation cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpsPowerMode {
    /// Powered only while a cycle acquires a fix.
    #[default]
    DutyCycled,
    /// Switched back on after each cycle so telemetry keeps a live position.
    AlwaysOn,
}

/// Bounded retry of a failed cycle with doubling backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RetryPolicy {
    /// Total attempts including the first; 1 disables retry.
    pub max_attempts: u8,
    pub initial_backoff_ms: u32,
}

impl RetryPolicy {
    pub const fn none() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff_ms: 1_000,
        }
    }

    /// Delay before the attempt following `failed_attempts` failures.
    pub fn backoff_for(&self, failed_attempts: u8) -> u32 {
        let doublings = failed_attempts.saturating_sub(1).min(16) as u32;
        self.initial_backoff_ms.saturating_mul(1 << doublings)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

#[derive(Clone, Copy)]
pub struct SyncPolicy {
    /// Negative west of Greenwich. Standard or daylight time as appropriate.
    pub local_utc_offset_hours: i8,
    pub offset_mode: OffsetMode,
    pub fix_predicate: FixPredicate,
    pub resync_trigger: ResyncTrigger,
    pub fix_poll_interval_ms: u32,
    /// Give up on a fix after this long. `None` waits indefinitely.
    pub fix_timeout_ms: Option<u32>,
    pub telemetry_interval_ms: u32,
    pub resync_check_interval_ms: u32,
    pub gps_power_mode: GpsPowerMode,
    pub retry: RetryPolicy,
}

impl SyncPolicy {
    pub const fn new(local_utc_offset_hours: i8) -> Self {
        Self {
            local_utc_offset_hours,
            offset_mode: OffsetMode::HourOnly,
            fix_predicate: position_and_date,
            resync_trigger: crossed_local_noon,
            fix_poll_interval_ms: 250,
            fix_timeout_ms: None,
            telemetry_interval_ms: 5_000,
            resync_check_interval_ms: 60_000,
            gps_power_mode: GpsPowerMode::DutyCycled,
            retry: RetryPolicy::none(),
        }
    }

    pub const fn with_offset_mode(mut self, mode: OffsetMode) -> Self {
        self.offset_mode = mode;
        self
    }

    pub const fn with_fix_predicate(mut self, predicate: FixPredicate) -> Self {
        self.fix_predicate = predicate;
        self
    }

    pub const fn with_resync_trigger(mut self, trigger: ResyncTrigger) -> Self {
        self.resync_trigger = trigger;
        self
    }

    pub const fn with_fix_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.fix_timeout_ms = Some(timeout_ms);
        self
    }

    pub const fn with_gps_power_mode(mut self, mode: GpsPowerMode) -> Self {
        self.gps_power_mode = mode;
        self
    }

    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

impl Default for SyncPolicy {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gps::types::{Coordinate, GpsDate, GpsTime, Hemisphere};

    #[test]
    fn test_noon_crossing_trigger() {
        assert!(crossed_local_noon(
            &WallTime::new(11, 59, 0),
            &WallTime::new(13, 0, 0)
        ));
        assert!(!crossed_local_noon(
            &WallTime::new(9, 0, 0),
            &WallTime::new(10, 0, 0)
        ));
        assert!(!crossed_local_noon(
            &WallTime::new(13, 0, 0),
            &WallTime::new(14, 0, 0)
        ));
    }

    #[test]
    fn test_midnight_trigger() {
        assert!(crossed_midnight(
            &WallTime::new(23, 59, 0),
            &WallTime::new(0, 0, 30)
        ));
        assert!(!crossed_midnight(
            &WallTime::new(11, 0, 0),
            &WallTime::new(13, 0, 0)
        ));
    }

    #[test]
    fn test_position_and_date_predicate() {
        let mut fix = GpsFix::new();
        fix.fix_valid = true;
        fix.date = Some(GpsDate::new(24, 1, 1));
        fix.time = Some(GpsTime::new(12, 0, 0));
        assert!(date_and_time(&fix));
        assert!(!position_and_date(&fix));

        let here = Coordinate {
            degrees: 35,
            minutes_e4: 0,
            hemisphere: Hemisphere::North,
        };
        fix.latitude = Some(here);
        fix.longitude = Some(Coordinate {
            hemisphere: Hemisphere::West,
            ..here
        });
        assert!(position_and_date(&fix));

        fix.fix_valid = false;
        assert!(!position_and_date(&fix));
    }

    #[test]
    fn test_retry_backoff_doubles() {
        let retry = RetryPolicy {
            max_attempts: 4,
            initial_backoff_ms: 500,
        };
        assert_eq!(retry.backoff_for(1), 500);
        assert_eq!(retry.backoff_for(2), 1_000);
        assert_eq!(retry.backoff_for(3), 2_000);
    }
}
