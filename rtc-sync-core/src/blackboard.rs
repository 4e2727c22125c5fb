use crate::datacells::DataCell;
use crate::{GpsFix, GpsHealth, SyncStatus, WallTime};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

/// Shared state between the GPS reader, the clock orchestrator and telemetry.
///
/// The GPS reader is the only writer of `fix` and `gps_health`; the
/// synchronisation cycle is the only writer of `status`.
pub struct ClockBoard {
    pub fix: DataCell<GpsFix>,
    pub gps_health: DataCell<GpsHealth>,
    pub status: DataCell<SyncStatus>,
    /// Last local time anyone read from the RTC (or the GPS before the first sync).
    pub current_time: DataCell<Option<WallTime>>,
    resync: Signal<CriticalSectionRawMutex, ()>,
}

impl ClockBoard {
    pub const fn new() -> Self {
        Self {
            fix: DataCell::new(GpsFix::new()),
            gps_health: DataCell::new(GpsHealth::new()),
            status: DataCell::new(SyncStatus::new()),
            current_time: DataCell::new(None),
            resync: Signal::new(),
        }
    }

    /// Best-effort last known local time of day.
    pub fn get_current_time(&self) -> Option<WallTime> {
        self.current_time.read()
    }

    /// Asks the orchestrator for a synchronisation cycle at its next wake-up.
    /// Repeated requests before it wakes collapse into one.
    pub fn request_resync(&self) {
        self.resync.signal(());
    }

    /// Resolves once a resync has been requested, consuming the request.
    pub async fn resync_requested(&self) {
        self.resync.wait().await
    }

    /// Consumes a pending request without waiting.
    pub fn take_resync_request(&self) -> bool {
        self.resync.try_take().is_some()
    }

    /// Withdraws the published fix once the receiver is unpowered so no reader
    /// keeps treating it as live. Health counters are left alone.
    pub fn invalidate_fix(&self) {
        self.fix.update(GpsFix::new());
    }

    /// Publishes a parsed snapshot together with its health counters.
    pub fn publish_fix(&self, fix: GpsFix) {
        self.fix.update(fix);
        self.gps_health.modify(|h| h.sentences = h.sentences.wrapping_add(1));
    }
}

impl Default for ClockBoard {
    fn default() -> Self {
        Self::new()
    }
}
