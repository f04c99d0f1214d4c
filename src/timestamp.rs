//! 64-bit monotonic timestamps from a wrapping 32-bit cycle counter.
//!
//! The counter ticks at the core clock advertised in the session INFO
//! packet (`CLK:<hz>`), so one timestamp unit is one CPU cycle. At 168 MHz
//! the raw counter wraps every ~25.6 s; the extended value wraps after
//! ~3480 years.
//!
//! A wrap is detected when a read is smaller than the previous one, so the
//! source must be read at least once per wrap period. Every scheduler
//! event reads it, which keeps any running system well inside that bound.

use crate::platform::CycleCounter;

/// Overflow-extending timestamp source.
///
/// `now` takes `&mut self`; the recorder only reaches it while holding the
/// global lock inside a critical section, so the compare/extend/store
/// sequence is never reentered.
pub struct TimestampSource<C> {
    counter: C,
    last_low: u32,
    overflows: u32,
}

impl<C: CycleCounter> TimestampSource<C> {
    /// Wrap `counter`, seeding the wrap detector with its current value.
    pub fn new(counter: C) -> Self {
        let last_low = counter.read();
        Self {
            counter,
            last_low,
            overflows: 0,
        }
    }

    /// Current extended cycle count.
    pub fn now(&mut self) -> u64 {
        let low = self.counter.read();
        if low < self.last_low {
            self.overflows = self.overflows.wrapping_add(1);
        }
        self.last_low = low;
        (u64::from(self.overflows) << 32) | u64::from(low)
    }

    /// Number of counter wraps observed so far.
    pub fn overflows(&self) -> u32 {
        self.overflows
    }

    /// Access the underlying counter.
    pub fn counter_mut(&mut self) -> &mut C {
        &mut self.counter
    }
}
