//! Platform abstraction layer for the cycle counter.
//!
//! This module provides an abstraction over the hardware free-running
//! counter so the recorder can be exercised in user space.

#[cfg(not(all(feature = "cortex-m", target_arch = "arm")))]
use core::sync::atomic::{AtomicU32, Ordering};

/// A free-running 32-bit counter that wraps silently.
pub trait CycleCounter {
    /// Start the counter. Called once when the recorder is initialized.
    fn enable(&mut self) {}

    /// Read the current counter value.
    fn read(&self) -> u32;
}

// =============================================================================
// Real Implementation (Cortex-M DWT)
// =============================================================================

/// DWT CYCCNT, ticking at the core clock.
#[cfg(all(feature = "cortex-m", target_arch = "arm", cycle_counter))]
pub struct DwtCounter;

#[cfg(all(feature = "cortex-m", target_arch = "arm", cycle_counter))]
impl CycleCounter for DwtCounter {
    fn enable(&mut self) {
        use cortex_m::peripheral::{DCB, DWT};

        const DEMCR_TRCENA: u32 = 1 << 24;
        const DWT_CTRL_CYCCNTENA: u32 = 1;

        // SAFETY: single RMW of debug registers during init, before any
        // other recorder code reads the counter.
        unsafe {
            (*DCB::PTR).demcr.modify(|w| w | DEMCR_TRCENA);
            (*DWT::PTR).cyccnt.write(0);
            (*DWT::PTR).ctrl.modify(|w| w | DWT_CTRL_CYCCNTENA);
        }
    }

    #[inline]
    fn read(&self) -> u32 {
        cortex_m::peripheral::DWT::cycle_count()
    }
}

// =============================================================================
// Mock Implementation (host builds and tests)
// =============================================================================

/// Mock counter value for testing.
#[cfg(not(all(feature = "cortex-m", target_arch = "arm")))]
static MOCK_CYCLES: AtomicU32 = AtomicU32::new(0);

/// Counter backed by a process-wide atomic, advanced by hand.
#[cfg(not(all(feature = "cortex-m", target_arch = "arm")))]
pub struct MockCounter;

#[cfg(not(all(feature = "cortex-m", target_arch = "arm")))]
impl CycleCounter for MockCounter {
    fn read(&self) -> u32 {
        MOCK_CYCLES.load(Ordering::Relaxed)
    }
}

/// Set the mock counter.
#[cfg(not(all(feature = "cortex-m", target_arch = "arm")))]
pub fn set_mock_cycles(cycles: u32) {
    MOCK_CYCLES.store(cycles, Ordering::Relaxed);
}

/// Advance the mock counter, wrapping at 2^32 like the hardware does.
#[cfg(not(all(feature = "cortex-m", target_arch = "arm")))]
pub fn advance_mock_cycles(cycles: u32) {
    MOCK_CYCLES.fetch_add(cycles, Ordering::Relaxed);
}

// A live recorder on Arm must read the hardware counter.
#[cfg(all(cycle_counter, target_arch = "arm", not(feature = "cortex-m")))]
compile_error!("the recorder on Arm targets requires the `cortex-m` feature");

// =============================================================================
// Platform Type Alias
// =============================================================================

/// The active counter implementation.
///
/// On Cortex-M with the `cortex-m` feature: DwtCounter
/// Everywhere else: MockCounter
#[cfg(all(feature = "cortex-m", target_arch = "arm", cycle_counter))]
pub type Counter = DwtCounter;

#[cfg(not(all(feature = "cortex-m", target_arch = "arm")))]
pub type Counter = MockCounter;

/// Construct the active counter.
#[cfg(all(feature = "cortex-m", target_arch = "arm", cycle_counter))]
pub const fn counter() -> Counter {
    DwtCounter
}

#[cfg(not(all(feature = "cortex-m", target_arch = "arm")))]
pub const fn counter() -> Counter {
    MockCounter
}

/// Human-readable name of the active counter.
pub const fn counter_name() -> &'static str {
    if cfg!(all(feature = "cortex-m", target_arch = "arm")) {
        "dwt-cyccnt"
    } else {
        "mock"
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_recorder_uses_hardware_counter_on_arm() {
        if cfg!(not(target_arch = "arm")) {
            assert_eq!(counter_name(), "mock");
        } else if cfg!(cycle_counter) {
            assert_eq!(counter_name(), "dwt-cyccnt");
        }
    }

    #[cfg(not(all(feature = "cortex-m", target_arch = "arm")))]
    #[test]
    fn test_mock_cycles_wrap() {
        set_mock_cycles(u32::MAX - 1);
        advance_mock_cycles(3);
        assert_eq!(counter().read(), 1);
    }
}
