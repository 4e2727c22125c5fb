// fix_waiter.rs
use crate::datacells::DataCell;
use crate::gps::types::GpsFix;
use crate::policy::FixPredicate;
use embedded_hal_async::delay::DelayNs;

/// Suspends the calling task until the GPS reader publishes a qualifying fix.
///
/// Only snapshots published after the wait began are considered, so a fix
/// left over from a previous power cycle never satisfies a new wait. Every
/// unsuccessful check sleeps for `poll_interval_ms`, handing the executor
/// to other tasks.
pub struct FixWaiter<'a, D> {
    source: &'a DataCell<GpsFix>,
    delay: &'a mut D,
    poll_interval_ms: u32,
}

impl<'a, D: DelayNs> FixWaiter<'a, D> {
    pub fn new(source: &'a DataCell<GpsFix>, delay: &'a mut D, poll_interval_ms: u32) -> Self {
        Self {
            source,
            delay,
            poll_interval_ms: poll_interval_ms.max(1),
        }
    }

    /// Waits with no upper bound. Indoors this may never return.
    pub async fn await_fix(&mut self, predicate: FixPredicate) -> GpsFix {
        loop {
            if let Some(fix) = self.wait(predicate, None).await {
                return fix;
            }
        }
    }

    /// As `await_fix`, but gives up after roughly `timeout_ms`.
    pub async fn await_fix_within(
        &mut self,
        predicate: FixPredicate,
        timeout_ms: u32,
    ) -> Option<GpsFix> {
        self.wait(predicate, Some(timeout_ms)).await
    }

    async fn wait(&mut self, predicate: FixPredicate, budget_ms: Option<u32>) -> Option<GpsFix> {
        let (_, start_sequence) = self.source.read_with_sequence();
        let mut waited_ms: u32 = 0;
        loop {
            let (fix, sequence) = self.source.read_with_sequence();
            if sequence != start_sequence && predicate(&fix) {
                return Some(fix);
            }
            if let Some(budget) = budget_ms {
                if waited_ms >= budget {
                    return None;
                }
            }
            self.delay.delay_ms(self.poll_interval_ms).await;
            waited_ms = waited_ms.saturating_add(self.poll_interval_ms);
        }
    }
}
