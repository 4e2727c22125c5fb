//! Deployment settings. Change the offset by hand for daylight saving time.
use rtc_sync_core::{
    OffsetMode, RetryPolicy, SyncPolicy, crossed_local_noon, position_and_date,
};

/// Pacific Standard Time.
pub const LOCAL_UTC_OFFSET_HOURS: i8 = -8;

pub const SYNC_POLICY: SyncPolicy = SyncPolicy::new(LOCAL_UTC_OFFSET_HOURS)
    .with_offset_mode(OffsetMode::HourOnly)
    .with_fix_predicate(position_and_date)
    .with_resync_trigger(crossed_local_noon)
    .with_retry(RetryPolicy {
        max_attempts: 3,
        initial_backoff_ms: 30_000,
    });
