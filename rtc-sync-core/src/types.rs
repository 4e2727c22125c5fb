// types.rs
use core::fmt::Write;

/// Whether the GPS module's power rail is switched on.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    #[default]
    Off = 0,
    On = 1,
}

/// Phases of one RTC synchronisation cycle.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncState {
    #[default]
    Idle = 0,
    PoweringOn = 1,  // GPS rail being switched on
    AwaitingFix = 2, // Suspended until a qualifying fix arrives
    Committing = 3,  // Writing the RTC
    PoweringOff = 4, // GPS rail being switched off
    Done = 5,
    Failed = 6,
}

impl SyncState {
    /// True while a cycle is between power-on and power-off.
    pub const fn in_progress(&self) -> bool {
        matches!(
            self,
            SyncState::PoweringOn
                | SyncState::AwaitingFix
                | SyncState::Committing
                | SyncState::PoweringOff
        )
    }
}

/// Time of day as shown to consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WallTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl WallTime {
    pub const fn new(hour: u8, minute: u8, second: u8) -> Self {
        Self {
            hour,
            minute,
            second,
        }
    }

    /// `hh:mm:ss`
    pub fn format(&self) -> heapless::String<8> {
        let mut s = heapless::String::new();
        let _ = write!(s, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second);
        s
    }
}

/// Outcome bookkeeping for the synchronisation machinery.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SyncStatus {
    pub state: SyncState,
    /// Set once any cycle has committed a time to the RTC.
    pub synchronized: bool,
    pub completed_cycles: u32,
    pub failed_cycles: u32,
}

impl SyncStatus {
    pub const fn new() -> Self {
        Self {
            state: SyncState::Idle,
            synchronized: false,
            completed_cycles: 0,
            failed_cycles: 0,
        }
    }
}
