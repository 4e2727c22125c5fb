// telemetry.rs
//! Periodic time and position reporting.
use crate::blackboard::ClockBoard;
use crate::gps::types::GpsFix;
use crate::rtc::{ClockSetting, RtcClock, SharedRtc, read_shared};
use crate::types::WallTime;
use crate::{info, warn};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::delay::DelayNs;

/// Latitude and longitude in signed microdegrees.
pub type Position = (i32, i32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TelemetryReport {
    /// RTC has been set by a completed cycle.
    Synchronized {
        clock: ClockSetting,
        position: Option<Position>,
    },
    /// No cycle has completed; time comes straight from the last GPS sentence.
    Unsynchronized {
        local: WallTime,
        position: Option<Position>,
    },
    /// Neither the RTC nor the GPS can say what time it is.
    Unavailable,
}

impl TelemetryReport {
    pub fn local_time(&self) -> Option<WallTime> {
        match self {
            TelemetryReport::Synchronized { clock, .. } => Some(clock.wall_time()),
            TelemetryReport::Unsynchronized { local, .. } => Some(*local),
            TelemetryReport::Unavailable => None,
        }
    }
}

fn position_of(fix: &GpsFix) -> Option<Position> {
    if !fix.fix_valid {
        return None;
    }
    match (fix.latitude, fix.longitude) {
        (Some(lat), Some(lon)) => Some((lat.microdegrees(), lon.microdegrees())),
        _ => None,
    }
}

/// Builds one report and records its local time on the board.
///
/// The RTC is only trusted once a cycle has completed. Before that the hour
/// of the latest GPS time is shifted by `utc_offset_hours` for display. The
/// fix is withdrawn whenever the receiver is powered down, so a switched-off
/// GPS yields no position and no GPS time.
pub fn sample<M: RawMutex, R: RtcClock>(
    board: &ClockBoard,
    rtc: &SharedRtc<M, R>,
    utc_offset_hours: i8,
) -> TelemetryReport {
    let fix = board.fix.read();
    let position = position_of(&fix);

    let mut report = TelemetryReport::Unavailable;
    if board.status.read().synchronized {
        match read_shared(rtc) {
            Ok(clock) => report = TelemetryReport::Synchronized { clock, position },
            Err(e) => warn!("RTC read failed: {:?}", e),
        }
    }
    if report == TelemetryReport::Unavailable {
        if let Some(time) = fix.time {
            let hour = (time.hour as i16 + utc_offset_hours as i16).rem_euclid(24) as u8;
            report = TelemetryReport::Unsynchronized {
                local: WallTime::new(hour, time.minute, time.second),
                position,
            };
        }
    }

    board.current_time.update(report.local_time());
    report
}

fn log_report(report: &TelemetryReport) {
    match report {
        TelemetryReport::Synchronized { clock, position } => {
            info!("Time: {} (RTC)", clock.format().as_str());
            log_position(position);
        }
        TelemetryReport::Unsynchronized { local, position } => {
            info!("Time: {} (GPS, RTC not set)", local.format().as_str());
            log_position(position);
        }
        TelemetryReport::Unavailable => info!("Time: unknown, waiting for GPS"),
    }
}

fn log_position(position: &Option<Position>) {
    match position {
        Some((lat, lon)) => info!("Position: {} {} (microdegrees)", lat, lon),
        None => info!("Position: no fix"),
    }
}

/// Reports forever, every `interval_ms`.
pub async fn run_telemetry<M: RawMutex, R: RtcClock, D: DelayNs>(
    board: &ClockBoard,
    rtc: &SharedRtc<M, R>,
    utc_offset_hours: i8,
    interval_ms: u32,
    delay: &mut D,
) -> ! {
    loop {
        let report = sample(board, rtc, utc_offset_hours);
        log_report(&report);
        delay.delay_ms(interval_ms).await;
    }
}
