//! Recorder statistics.
//!
//! Counts what reached the transport and what was dropped, so a host can
//! tell a quiet system from a saturated link. Counters are 32-bit because
//! Armv7-M has no 64-bit atomics; they wrap.

use core::sync::atomic::{AtomicU32, Ordering};

/// Live counters owned by the recorder.
#[derive(Debug)]
pub struct RecorderStats {
    /// Packets fully accepted by the transport.
    packets_sent: AtomicU32,
    /// Bytes accepted by the transport.
    bytes_sent: AtomicU32,
    /// Packets the transport refused in whole or part.
    packets_dropped: AtomicU32,
    /// Bytes the transport refused.
    bytes_dropped: AtomicU32,
    /// Registrations rejected for lack of slots or ids.
    registrations_rejected: AtomicU32,
}

impl RecorderStats {
    /// Create zeroed counters.
    pub const fn new() -> Self {
        Self {
            packets_sent: AtomicU32::new(0),
            bytes_sent: AtomicU32::new(0),
            packets_dropped: AtomicU32::new(0),
            bytes_dropped: AtomicU32::new(0),
            registrations_rejected: AtomicU32::new(0),
        }
    }

    /// Record one `send` of `len` bytes of which `accepted` were taken.
    pub fn record_send(&self, len: usize, accepted: usize) {
        let accepted = accepted.min(len);
        self.bytes_sent.fetch_add(accepted as u32, Ordering::Relaxed);
        if accepted == len {
            self.packets_sent.fetch_add(1, Ordering::Relaxed);
        } else {
            self.packets_dropped.fetch_add(1, Ordering::Relaxed);
            self.bytes_dropped
                .fetch_add((len - accepted) as u32, Ordering::Relaxed);
        }
    }

    /// Record a rejected registration.
    pub fn record_rejected(&self) {
        self.registrations_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current statistics snapshot.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            packets_sent: self.packets_sent.load(Ordering::Relaxed),
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
            packets_dropped: self.packets_dropped.load(Ordering::Relaxed),
            bytes_dropped: self.bytes_dropped.load(Ordering::Relaxed),
            registrations_rejected: self.registrations_rejected.load(Ordering::Relaxed),
        }
    }

    /// Reset statistics.
    pub fn reset(&self) {
        self.packets_sent.store(0, Ordering::Relaxed);
        self.bytes_sent.store(0, Ordering::Relaxed);
        self.packets_dropped.store(0, Ordering::Relaxed);
        self.bytes_dropped.store(0, Ordering::Relaxed);
        self.registrations_rejected.store(0, Ordering::Relaxed);
    }
}

impl Default for RecorderStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable snapshot of recorder statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub packets_sent: u32,
    pub bytes_sent: u32,
    pub packets_dropped: u32,
    pub bytes_dropped: u32,
    pub registrations_rejected: u32,
}
