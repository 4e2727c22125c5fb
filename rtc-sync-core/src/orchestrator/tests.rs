// orchestrator/tests.rs
#[cfg(test)]
mod tests {
    use crate::test_support::{MockDelay, MockPin, MockRtc, good_fix};
    use crate::{
        ClockBoard, ClockSetting, GpsPowerMode, Orchestrator, PowerGate, PowerState,
        RetryPolicy, SharedRtc, SyncError, SyncPolicy, SyncState, WallTime,
    };
    use core::cell::RefCell;
    use embassy_futures::{block_on, join::join, yield_now};
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    type TestRtc = SharedRtc<NoopRawMutex, MockRtc>;

    fn shared(rtc: MockRtc) -> TestRtc {
        SharedRtc::new(RefCell::new(rtc))
    }

    fn local(hour: u8, minute: u8) -> ClockSetting {
        ClockSetting {
            year: 2024,
            month: 1,
            day: 1,
            weekday: 0,
            hour,
            minute,
            second: 0,
            subsecond: 0,
            utc_offset_hours: -8,
        }
    }

    /// Keeps publishing fresh fixes so any waiting cycle sees one.
    async fn feed_fixes(board: &ClockBoard, count: usize) {
        for _ in 0..count {
            board.publish_fix(good_fix((24, 1, 1), (20, 0, 0)));
            yield_now().await;
        }
    }

    #[test]
    fn test_telemetry_starts_after_sync_done() {
        let board = ClockBoard::new();
        let rtc = shared(MockRtc::new());
        let mut orch = Orchestrator::new(
            &board,
            &rtc,
            PowerGate::new(MockPin::new()),
            MockDelay::new(),
            SyncPolicy::new(-8),
        );

        let mut seen = None;
        let (result, ()) = block_on(join(
            orch.startup(|| {
                seen = Some((
                    board.status.read().state,
                    rtc.lock(|r| r.borrow().setting),
                ));
            }),
            feed_fixes(&board, 20),
        ));

        let setting = result.unwrap();
        assert_eq!(seen, Some((SyncState::Done, Some(setting))));
        assert_eq!(setting.wall_time(), WallTime::new(12, 0, 0));
        assert_eq!(orch.gate().state(), PowerState::Off);
        assert_eq!(orch.last_check(), Some(WallTime::new(12, 0, 0)));
    }

    #[test]
    fn test_telemetry_starts_after_failed_sync() {
        let board = ClockBoard::new();
        let rtc = shared(MockRtc::new());
        let policy = SyncPolicy::new(-8).with_fix_timeout_ms(1_000);
        let mut orch = Orchestrator::new(
            &board,
            &rtc,
            PowerGate::new(MockPin::new()),
            MockDelay::new(),
            policy,
        );

        let mut started = false;
        let result = block_on(orch.startup(|| started = true));

        assert_eq!(result, Err(SyncError::NoFix));
        assert!(started);
        assert_eq!(board.status.read().state, SyncState::Failed);
        assert_eq!(rtc.lock(|r| r.borrow().writes), 0);
    }

    #[test]
    fn test_failed_cycle_is_retried() {
        let board = ClockBoard::new();
        let mut flaky = MockRtc::new();
        flaky.failing_writes = 1;
        let rtc = shared(flaky);
        let policy = SyncPolicy::new(0).with_retry(RetryPolicy {
            max_attempts: 3,
            initial_backoff_ms: 100,
        });
        let mut orch = Orchestrator::new(
            &board,
            &rtc,
            PowerGate::new(MockPin::new()),
            MockDelay::new(),
            policy,
        );

        let (result, ()) = block_on(join(orch.sync_with_retry(), feed_fixes(&board, 40)));

        assert!(result.is_ok());
        let status = board.status.read();
        assert_eq!(status.failed_cycles, 1);
        assert_eq!(status.completed_cycles, 1);
        assert!(status.synchronized);
        assert_eq!(rtc.lock(|r| r.borrow().writes), 1);
    }

    #[test]
    fn test_retry_budget_is_bounded() {
        let board = ClockBoard::new();
        let rtc = shared(MockRtc::new());
        let policy = SyncPolicy::new(0)
            .with_fix_timeout_ms(500)
            .with_retry(RetryPolicy {
                max_attempts: 2,
                initial_backoff_ms: 100,
            });
        let mut orch = Orchestrator::new(
            &board,
            &rtc,
            PowerGate::new(MockPin::new()),
            MockDelay::new(),
            policy,
        );

        let result = block_on(orch.sync_with_retry());
        assert_eq!(result, Err(SyncError::NoFix));
        assert_eq!(board.status.read().failed_cycles, 2);
    }

    #[test]
    fn test_noon_crossing_triggers_resync() {
        let board = ClockBoard::new();
        let rtc = shared(MockRtc::holding(local(11, 0)));
        let mut orch = Orchestrator::new(
            &board,
            &rtc,
            PowerGate::new(MockPin::new()),
            MockDelay::new(),
            SyncPolicy::new(-8),
        );

        // First check only records the reading.
        assert_eq!(block_on(orch.idle_step()), None);
        assert_eq!(orch.last_check(), Some(WallTime::new(11, 0, 0)));

        rtc.lock(|r| r.borrow_mut().setting = Some(local(13, 0)));
        let (outcome, ()) = block_on(join(orch.idle_step(), feed_fixes(&board, 20)));
        let setting = outcome.unwrap().unwrap();
        assert_eq!(setting.wall_time(), WallTime::new(12, 0, 0));
        assert_eq!(rtc.lock(|r| r.borrow().writes), 1);
    }

    #[test]
    fn test_morning_hours_do_not_trigger() {
        let board = ClockBoard::new();
        let rtc = shared(MockRtc::holding(local(9, 0)));
        let mut orch = Orchestrator::new(
            &board,
            &rtc,
            PowerGate::new(MockPin::new()),
            MockDelay::new(),
            SyncPolicy::new(-8),
        );

        assert_eq!(block_on(orch.idle_step()), None);
        rtc.lock(|r| r.borrow_mut().setting = Some(local(10, 0)));
        assert_eq!(block_on(orch.idle_step()), None);
        assert_eq!(rtc.lock(|r| r.borrow().writes), 0);
        assert_eq!(orch.gate().state(), PowerState::Off);
    }

    #[test]
    fn test_requested_resync_runs_immediately() {
        let board = ClockBoard::new();
        let rtc = shared(MockRtc::holding(local(9, 0)));
        let mut orch = Orchestrator::new(
            &board,
            &rtc,
            PowerGate::new(MockPin::new()),
            MockDelay::new(),
            SyncPolicy::new(-8),
        );

        board.request_resync();
        let (outcome, ()) = block_on(join(orch.idle_step(), feed_fixes(&board, 20)));
        assert!(matches!(outcome, Some(Ok(_))));
        assert!(!board.take_resync_request());
    }

    #[test]
    fn test_always_on_keeps_gps_powered_between_cycles() {
        let board = ClockBoard::new();
        let rtc = shared(MockRtc::new());
        let policy = SyncPolicy::new(0).with_gps_power_mode(GpsPowerMode::AlwaysOn);
        let mut orch = Orchestrator::new(
            &board,
            &rtc,
            PowerGate::new(MockPin::new()),
            MockDelay::new(),
            policy,
        );

        let (result, ()) = block_on(join(orch.startup(|| {}), feed_fixes(&board, 20)));
        assert!(result.is_ok());
        assert_eq!(orch.gate().state(), PowerState::On);
    }
}
