//! Cycle-accurate RTOS trace recorder.
//!
//! Records scheduler, synchronization-object, interrupt and user events on
//! a bare-metal target and streams them off-device as a compact binary
//! protocol, timestamped with the core's free-running cycle counter.
//!
//! # Features
//!
//! - `recorder` - active recorder (default); without it every hook is a no-op
//! - `rtos` - kernel object tracing (default)
//! - `cortex-m` - DWT cycle counter and real hardware access
//! - `transport-itm` - single-wire ITM backend
//! - `transport-rtt` - RTT ring-buffer backend (`rtt-drop` to drop when full)
//! - `freertos` - C entry points for the FreeRTOS trace macros
//!
//! With no transport feature the recorder writes into an in-memory capture
//! buffer, which is what host tests use.
//!
//! # Quick Start
//!
//! ```ignore
//! use rtrec::{RecorderConfig, UserTraceKind, hooks};
//!
//! // Once during boot, before the scheduler starts
//! rtrec::init(RecorderConfig::new(168_000_000).with_pendsv())?;
//!
//! hooks::register_user_trace(3, "adc", UserTraceKind::Graph);
//! hooks::user_value(3, read_adc());
//! ```

#![no_std]

#[macro_use]
extern crate log;

// =============================================================================
// Build-time Configuration & Wire Format
// =============================================================================

pub mod config;
pub mod name;
pub mod packet;
pub mod protocol;

// =============================================================================
// Platform Abstraction (for testing support)
// =============================================================================

pub mod platform;
pub mod rtos;
pub mod timestamp;
pub mod transport;

// =============================================================================
// Recorder
// =============================================================================

pub mod contention;
pub mod recorder;
pub mod registry;
pub mod stats;

pub mod hooks;

#[cfg(feature = "freertos")]
pub mod ffi;

// Re-export key types for convenience
pub use config::RecorderConfig;
pub use hooks::Tracer;
pub use protocol::{Edge, ObjectKind, UserTraceKind};
pub use recorder::Recorder;
pub use rtos::{NoRtos, ObjectHandle, RtosOps, TaskHandle, TaskInfo};
pub use stats::StatsSnapshot;
pub use transport::Transport;

/// Error types for recorder setup.
///
/// Hooks never fail; only initialization reports errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// `init` was already called.
    AlreadyInitialized,
    /// The recorder has not been initialized.
    NotInitialized,
    /// A configuration value was rejected.
    InvalidConfig(&'static str),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AlreadyInitialized => write!(f, "Trace recorder already initialized"),
            Self::NotInitialized => write!(f, "Trace recorder not initialized"),
            Self::InvalidConfig(msg) => write!(f, "Invalid recorder configuration: {}", msg),
        }
    }
}

impl core::error::Error for Error {}

// =============================================================================
// Initialization
// =============================================================================

/// Initialize the global recorder and open the trace session.
///
/// Call once during boot, before the scheduler starts. Enables the cycle
/// counter, brings up the transport and emits the session preamble (sync
/// marker, clock frequency, builtin ISR names). Hooks called before this
/// returns are dropped.
pub fn init(config: RecorderConfig) -> Result<(), Error> {
    info!("Initializing rtrec...");
    hooks::init(config)?;
    info!("rtrec initialization complete");
    Ok(())
}

/// Current counters of the global recorder.
pub fn stats() -> Result<StatsSnapshot, Error> {
    hooks::stats().ok_or(Error::NotInitialized)
}
