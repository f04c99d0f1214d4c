//! Recorder configuration.
//!
//! Table capacities, name limits and transport parameters are fixed at
//! build time. The few values only known at boot (core clock, builtin ISR
//! names) travel in [`RecorderConfig`].

use crate::Error;

/// Maximum number of tracked tasks.
pub const MAX_TASKS: usize = 32;

/// Maximum number of tracked queues, mutexes and semaphores.
pub const MAX_OBJECTS: usize = 32;

/// Maximum number of registered user traces.
pub const MAX_USER_TRACES: usize = 32;

/// Maximum number of registered user functions.
pub const MAX_USER_FUNCTIONS: usize = 32;

/// Name buffer capacity in bytes, including the terminator slot.
pub const NAME_CAPACITY: usize = 16;

/// Longest name stored or sent on the wire.
pub const MAX_NAME_LEN: usize = NAME_CAPACITY - 1;

/// ITM stimulus port used by the single-wire transport.
pub const ITM_PORT: usize = 1;

/// RTT up-channel used by the ring-buffer transport.
pub const RTT_CHANNEL: usize = 0;

/// Bytes reserved for the RTT up-buffer.
pub const RTT_BUFFER_SIZE: usize = 4096;

/// Bytes retained by the host capture transport.
pub const CAPTURE_CAPACITY: usize = 4096;

/// ISR id reserved for the system tick.
pub const ISR_ID_SYSTICK: u8 = 1;

/// ISR id reserved for the context-switch exception.
pub const ISR_ID_PENDSV: u8 = 2;

/// What a buffered transport does when its buffer is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backpressure {
    /// Spin until the host drains enough space.
    Block,
    /// Discard the packet that does not fit.
    Drop,
}

/// Full-buffer policy of the RTT transport.
#[cfg(feature = "rtt-drop")]
pub const RTT_BACKPRESSURE: Backpressure = Backpressure::Drop;

/// Full-buffer policy of the RTT transport.
#[cfg(not(feature = "rtt-drop"))]
pub const RTT_BACKPRESSURE: Backpressure = Backpressure::Block;

const DEFAULT_ISRS: &[(u8, &str)] = &[(ISR_ID_SYSTICK, "SysTick")];
const DEFAULT_ISRS_WITH_PENDSV: &[(u8, &str)] =
    &[(ISR_ID_SYSTICK, "SysTick"), (ISR_ID_PENDSV, "PendSV")];

/// Boot-time recorder parameters.
#[derive(Debug, Clone, Copy)]
pub struct RecorderConfig {
    /// Cycle counter frequency in Hz, advertised so the host can convert
    /// timestamps into wall-clock time.
    pub cpu_freq_hz: u32,
    /// Whether kernel hooks are traced. When false the host is told the
    /// stream carries no RTOS events.
    pub rtos: bool,
    /// ISR ids advertised at session start.
    pub builtin_isrs: &'static [(u8, &'static str)],
}

impl RecorderConfig {
    /// Configuration for a core clocked at `cpu_freq_hz`.
    pub const fn new(cpu_freq_hz: u32) -> Self {
        Self {
            cpu_freq_hz,
            rtos: cfg!(feature = "rtos"),
            builtin_isrs: DEFAULT_ISRS,
        }
    }

    /// Also advertise the PendSV exception.
    pub const fn with_pendsv(mut self) -> Self {
        self.builtin_isrs = DEFAULT_ISRS_WITH_PENDSV;
        self
    }

    /// Override RTOS tracing.
    pub const fn with_rtos(mut self, rtos: bool) -> Self {
        self.rtos = rtos;
        self
    }

    /// Replace the advertised builtin ISRs.
    pub const fn with_builtin_isrs(mut self, isrs: &'static [(u8, &'static str)]) -> Self {
        self.builtin_isrs = isrs;
        self
    }

    /// Check the configuration before the recorder starts.
    pub fn validate(&self) -> Result<(), Error> {
        if self.cpu_freq_hz == 0 {
            return Err(Error::InvalidConfig("cpu frequency must be non-zero"));
        }
        if self.builtin_isrs.iter().any(|(id, _)| *id == 0) {
            return Err(Error::InvalidConfig("ISR id 0 is reserved"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_limit_leaves_room_for_terminator() {
        assert_eq!(MAX_NAME_LEN + 1, NAME_CAPACITY);
    }

    #[test]
    fn pendsv_is_appended() {
        let cfg = RecorderConfig::new(16_000_000).with_pendsv();
        assert_eq!(cfg.builtin_isrs.len(), 2);
        assert_eq!(cfg.builtin_isrs[1], (ISR_ID_PENDSV, "PendSV"));
    }

    #[test]
    fn zero_frequency_is_rejected() {
        assert!(RecorderConfig::new(0).validate().is_err());
        assert!(RecorderConfig::new(1).validate().is_ok());
    }
}
