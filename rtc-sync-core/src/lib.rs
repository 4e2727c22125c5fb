// lib.rs
#![no_std]

pub mod blackboard;
pub mod calendar;
pub mod clock_sync;
pub mod datacells;
pub mod fix_waiter;
pub mod gps;
pub mod macros;
pub mod orchestrator;
pub mod policy;
pub mod power;
pub mod rtc;
pub mod telemetry;
pub mod types;

#[cfg(test)]
mod test_support;

pub use blackboard::ClockBoard;
pub use clock_sync::{ClockSync, SyncError};
pub use fix_waiter::FixWaiter;
pub use gps::NmeaIngest;
pub use gps::parser::{SentenceBuffer, process_line, validate_checksum};
pub use gps::types::*;
pub use orchestrator::Orchestrator;
pub use policy::*;
pub use power::{PowerGate, PoweredGps};
pub use rtc::{ClockSetting, RtcClock, RtcError, SharedRtc};
pub use telemetry::{TelemetryReport, run_telemetry};
pub use types::*;
