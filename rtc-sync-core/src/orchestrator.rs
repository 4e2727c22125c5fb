// orchestrator.rs
use crate::blackboard::ClockBoard;
use crate::clock_sync::{ClockSync, SyncError};
use crate::policy::{GpsPowerMode, SyncPolicy};
use crate::power::PowerGate;
use crate::rtc::{ClockSetting, RtcClock, SharedRtc, read_shared};
use crate::types::WallTime;
use crate::{error, info, warn};
use core::convert::Infallible;
use embassy_futures::select::{Either, select};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;

/// Owns the GPS power gate and decides when synchronisation cycles run.
///
/// Startup runs one cycle (with retry) before anything else may read the
/// clock, then hands control to `start_telemetry`. Afterwards the RTC is
/// checked every `resync_check_interval_ms` and a new cycle runs when the
/// policy's trigger fires or a resync was requested on the board.
pub struct Orchestrator<'a, M, R, P, D> {
    board: &'a ClockBoard,
    rtc: &'a SharedRtc<M, R>,
    gate: PowerGate<P>,
    delay: D,
    sync: ClockSync,
    policy: SyncPolicy,
    last_check: Option<WallTime>,
}

impl<'a, M, R, P, D> Orchestrator<'a, M, R, P, D>
where
    M: RawMutex,
    R: RtcClock,
    P: OutputPin<Error = Infallible>,
    D: DelayNs,
{
    pub fn new(
        board: &'a ClockBoard,
        rtc: &'a SharedRtc<M, R>,
        gate: PowerGate<P>,
        delay: D,
        policy: SyncPolicy,
    ) -> Self {
        Self {
            board,
            rtc,
            gate,
            delay,
            sync: ClockSync::new(&policy),
            policy,
            last_check: None,
        }
    }

    pub fn gate(&self) -> &PowerGate<P> {
        &self.gate
    }

    /// Local time seen at the last periodic check.
    pub fn last_check(&self) -> Option<WallTime> {
        self.last_check
    }

    /// Initial cycle, then `start_telemetry`. Telemetry starts even when the
    /// cycle fails, reporting the RTC as unsynchronised.
    pub async fn startup<F: FnOnce()>(
        &mut self,
        start_telemetry: F,
    ) -> Result<ClockSetting, SyncError> {
        info!("Initial RTC sync starting");
        let result = self.sync_with_retry().await;
        if result.is_err() {
            error!("Initial RTC sync failed, RTC left unchanged");
        }
        start_telemetry();
        result
    }

    /// Runs cycles until one succeeds or the retry budget is spent.
    pub async fn sync_with_retry(&mut self) -> Result<ClockSetting, SyncError> {
        let max_attempts = self.policy.retry.max_attempts.max(1);
        let mut failed: u8 = 0;
        let result = loop {
            let attempt = self
                .sync
                .run_cycle(self.board, self.rtc, &mut self.gate, &mut self.delay)
                .await;
            match attempt {
                Ok(setting) => break Ok(setting),
                Err(SyncError::Busy) => break Err(SyncError::Busy),
                Err(e) => {
                    failed = failed.saturating_add(1);
                    if failed >= max_attempts {
                        break Err(e);
                    }
                    let backoff_ms = self.policy.retry.backoff_for(failed);
                    warn!(
                        "RTC sync attempt {} of {} failed, retrying in {} ms",
                        failed, max_attempts, backoff_ms
                    );
                    self.delay.delay_ms(backoff_ms).await;
                }
            }
        };

        if let Ok(setting) = &result {
            self.last_check = Some(setting.wall_time());
        }
        if self.policy.gps_power_mode == GpsPowerMode::AlwaysOn {
            self.gate.turn_on();
        }
        result
    }

    /// One idle period: sleep (or wake early on a request), read the RTC and
    /// run a cycle if due. Returns the cycle's outcome if one ran.
    pub async fn idle_step(&mut self) -> Option<Result<ClockSetting, SyncError>> {
        let board = self.board;
        let requested = match select(
            self.delay.delay_ms(self.policy.resync_check_interval_ms),
            board.resync_requested(),
        )
        .await
        {
            Either::First(()) => board.take_resync_request(),
            Either::Second(()) => true,
        };

        let current = match read_shared(self.rtc) {
            Ok(setting) => Some(setting.wall_time()),
            Err(e) => {
                warn!("RTC read failed during resync check: {:?}", e);
                None
            }
        };
        let triggered = match (self.last_check, current) {
            (Some(previous), Some(now)) => (self.policy.resync_trigger)(&previous, &now),
            _ => false,
        };
        if current.is_some() {
            self.last_check = current;
        }

        if !(requested || triggered) {
            return None;
        }
        if requested {
            info!("RTC resync requested");
        } else {
            info!("RTC resync due");
        }
        Some(self.sync_with_retry().await)
    }

    pub async fn run<F: FnOnce()>(mut self, start_telemetry: F) -> ! {
        let _ = self.startup(start_telemetry).await;
        loop {
            let _ = self.idle_step().await;
        }
    }
}

#[cfg(test)]
mod tests;
