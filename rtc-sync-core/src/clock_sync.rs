use crate::blackboard::ClockBoard;
use crate::calendar::OffsetMode;
use crate::fix_waiter::FixWaiter;
use crate::gps::types::GpsFix;
use crate::policy::{FixPredicate, SyncPolicy};
use crate::power::PowerGate;
use crate::rtc::{ClockSetting, RtcClock, RtcError, SharedRtc, read_shared, write_shared};
use crate::types::SyncState;
use crate::{error, info, trace, warn};
use core::convert::Infallible;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncError {
    /// The RTC rejected the new time; it keeps its previous value.
    RtcWrite(RtcError),
    /// No qualifying fix before the configured timeout.
    NoFix,
    /// The accepted fix lacked a date or time.
    IncompleteFix,
    /// Another cycle is already between power-on and power-off.
    Busy,
}

/// One pass of: GPS on, wait for a fix, write the RTC, GPS off.
///
/// Each transition is published on `ClockBoard::status`. Nothing is retried
/// here; retry belongs to the orchestrator.
pub struct ClockSync {
    pub utc_offset_hours: i8,
    pub offset_mode: OffsetMode,
    pub fix_predicate: FixPredicate,
    pub fix_poll_interval_ms: u32,
    pub fix_timeout_ms: Option<u32>,
}

impl ClockSync {
    pub fn new(policy: &SyncPolicy) -> Self {
        Self {
            utc_offset_hours: policy.local_utc_offset_hours,
            offset_mode: policy.offset_mode,
            fix_predicate: policy.fix_predicate,
            fix_poll_interval_ms: policy.fix_poll_interval_ms,
            fix_timeout_ms: policy.fix_timeout_ms,
        }
    }

    /// Local RTC fields for a fix, if it has a date and a time.
    pub fn translate(&self, fix: &GpsFix) -> Option<ClockSetting> {
        ClockSetting::from_fix(fix, self.utc_offset_hours, self.offset_mode)
    }

    pub async fn run_cycle<M, R, P, D>(
        &self,
        board: &ClockBoard,
        rtc: &SharedRtc<M, R>,
        gate: &mut PowerGate<P>,
        delay: &mut D,
    ) -> Result<ClockSetting, SyncError>
    where
        M: RawMutex,
        R: RtcClock,
        P: OutputPin<Error = Infallible>,
        D: DelayNs,
    {
        if board.status.read().state.in_progress() {
            warn!("RTC sync already running, request ignored");
            return Err(SyncError::Busy);
        }

        let cycle = CycleTracker::begin(board);
        info!("GPS on, waiting for fix...");
        let powered = gate.power_up();

        cycle.enter(SyncState::AwaitingFix);
        let fix = {
            let mut waiter = FixWaiter::new(&board.fix, delay, self.fix_poll_interval_ms);
            match self.fix_timeout_ms {
                None => Some(waiter.await_fix(self.fix_predicate).await),
                Some(timeout_ms) => {
                    waiter
                        .await_fix_within(self.fix_predicate, timeout_ms)
                        .await
                }
            }
        };

        let result = match fix {
            Some(fix) => {
                cycle.enter(SyncState::Committing);
                self.commit(&fix, rtc)
            }
            None => Err(SyncError::NoFix),
        };

        cycle.enter(SyncState::PoweringOff);
        drop(powered);
        board.invalidate_fix();
        cycle.finish(&result);

        match &result {
            Ok(_) => match read_shared(rtc) {
                Ok(now) => info!("RTC set to {}", now.format().as_str()),
                Err(e) => warn!("RTC written but read-back failed: {:?}", e),
            },
            Err(e) => error!("RTC sync failed: {:?}", e),
        }
        result
    }

    fn commit<M: RawMutex, R: RtcClock>(
        &self,
        fix: &GpsFix,
        rtc: &SharedRtc<M, R>,
    ) -> Result<ClockSetting, SyncError> {
        let setting = self.translate(fix).ok_or(SyncError::IncompleteFix)?;
        write_shared(rtc, &setting).map_err(SyncError::RtcWrite)?;
        Ok(setting)
    }
}

/// Publishes cycle transitions; resets the board to Idle and withdraws the
/// fix if the cycle future is dropped before it finishes.
struct CycleTracker<'a> {
    board: &'a ClockBoard,
    finished: bool,
}

impl<'a> CycleTracker<'a> {
    fn begin(board: &'a ClockBoard) -> Self {
        let tracker = Self {
            board,
            finished: false,
        };
        tracker.enter(SyncState::PoweringOn);
        tracker
    }

    fn enter(&self, state: SyncState) {
        trace!("sync state -> {:?}", state);
        self.board.status.modify(|s| s.state = state);
    }

    fn finish(mut self, result: &Result<ClockSetting, SyncError>) {
        self.board.status.modify(|s| match result {
            Ok(_) => {
                s.state = SyncState::Done;
                s.synchronized = true;
                s.completed_cycles = s.completed_cycles.wrapping_add(1);
            }
            Err(_) => {
                s.state = SyncState::Failed;
                s.failed_cycles = s.failed_cycles.wrapping_add(1);
            }
        });
        self.finished = true;
    }
}

impl Drop for CycleTracker<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.board.invalidate_fix();
            self.board.status.modify(|s| s.state = SyncState::Idle);
        }
    }
}
