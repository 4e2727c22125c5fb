// gps/ingest.rs
use crate::blackboard::ClockBoard;
use crate::gps::parser::{SentenceBuffer, process_line};
use crate::gps::types::{GpsFix, GpsSensorError};
use crate::{debug, trace, warn};

/// Turns raw receiver bytes into published fixes.
///
/// Keeps the running fix locally and publishes a copy after every sentence
/// that parsed, so the board only ever holds whole-sentence updates. If
/// anything else wrote the board's fix since our last publish (the receiver
/// was powered down), the running fix starts over from empty.
pub struct NmeaIngest {
    framer: SentenceBuffer,
    fix: GpsFix,
    published_sequence: u32,
    /// Consecutive failed reads since the last good one.
    error_run: u16,
}

impl NmeaIngest {
    pub const fn new() -> Self {
        Self {
            framer: SentenceBuffer::new(),
            fix: GpsFix::new(),
            published_sequence: 0,
            error_run: 0,
        }
    }

    /// Feeds a chunk of UART data. Returns how many snapshots were published.
    pub fn feed(&mut self, bytes: &[u8], board: &ClockBoard) -> usize {
        if !bytes.is_empty() && self.error_run > 0 {
            debug!("GPS UART recovered after {} read errors", self.error_run);
            self.error_run = 0;
        }
        let mut published = 0;
        for &b in bytes {
            let Some(line) = self.framer.push(b) else {
                continue;
            };
            if board.fix.sequence() != self.published_sequence {
                trace!("GPS fix withdrawn, restarting from empty");
                self.fix = GpsFix::new();
                self.published_sequence = board.fix.sequence();
            }
            match process_line(line, &mut self.fix) {
                Ok(()) => {
                    board.publish_fix(self.fix);
                    self.published_sequence = board.fix.sequence();
                    published += 1;
                }
                Err(GpsSensorError::InvalidChecksum) => {
                    warn!("GPS checksum mismatch, sentence dropped");
                    board
                        .gps_health
                        .modify(|h| h.checksum_errors = h.checksum_errors.saturating_add(1));
                }
                Err(GpsSensorError::InvalidData) => {
                    warn!("GPS sentence malformed, dropped");
                    board
                        .gps_health
                        .modify(|h| h.parse_errors = h.parse_errors.saturating_add(1));
                }
                Err(GpsSensorError::Unsupported) => trace!("GPS sentence ignored"),
            }
        }
        published
    }

    /// Counts a failed UART read. Only the first error of a run is logged;
    /// an unpowered receiver can leave the line floating and error constantly.
    pub fn read_failed(&mut self, board: &ClockBoard) {
        board
            .gps_health
            .modify(|h| h.uart_errors = h.uart_errors.saturating_add(1));
        if self.error_run == 0 {
            warn!("GPS UART read error, further errors counted in health");
        }
        self.error_run = self.error_run.saturating_add(1);
    }

    pub fn fix(&self) -> &GpsFix {
        &self.fix
    }
}

impl Default for NmeaIngest {
    fn default() -> Self {
        Self::new()
    }
}
