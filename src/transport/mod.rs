//! Off-device byte transport.
//!
//! One backend is selected at build time:
//!
//! - `transport-itm` - single-wire ITM stimulus port, blocking per word
//! - `transport-rtt` - RTT up-buffer, blocking or dropping when full
//! - neither - [`MemoryTransport`], a bounded in-memory capture used on the
//!   host and in tests (also chosen for `transport-itm` off-target)
//!
//! Backends never retry and never report failure upward; `send` returns the
//! number of bytes accepted so the recorder can account for drops.

mod capture;
#[cfg(feature = "transport-itm")]
mod itm;
#[cfg(feature = "transport-rtt")]
mod rtt;

pub use capture::MemoryTransport;
#[cfg(feature = "transport-itm")]
pub use itm::{ItmTransport, StimulusPort};
#[cfg(all(feature = "transport-itm", target_arch = "arm"))]
pub use itm::CortexMStimulus;
#[cfg(feature = "transport-rtt")]
pub use rtt::RttTransport;

#[cfg(all(feature = "transport-itm", feature = "transport-rtt"))]
compile_error!("features `transport-itm` and `transport-rtt` are mutually exclusive");

/// A sink for encoded packets.
///
/// Implementations must tolerate being called from interrupt context with
/// interrupts masked.
pub trait Transport {
    /// Push `bytes` off-device. Returns how many bytes were accepted.
    fn send(&mut self, bytes: &[u8]) -> usize;

    /// Backend name for diagnostics.
    fn name(&self) -> &'static str;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send(&mut self, bytes: &[u8]) -> usize {
        (**self).send(bytes)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

// =============================================================================
// Build-time Selection
// =============================================================================

/// The transport compiled into the global recorder.
#[cfg(all(feature = "transport-itm", target_arch = "arm"))]
pub type Selected = ItmTransport<CortexMStimulus>;

#[cfg(all(feature = "transport-rtt", not(all(feature = "transport-itm", target_arch = "arm"))))]
pub type Selected = RttTransport;

#[cfg(capture_transport)]
pub type Selected = MemoryTransport<{ crate::config::CAPTURE_CAPACITY }>;

/// Bring up the selected transport.
#[cfg(all(feature = "transport-itm", target_arch = "arm"))]
pub fn open() -> Selected {
    ItmTransport::new(CortexMStimulus::enable(crate::config::ITM_PORT))
}

#[cfg(all(feature = "transport-rtt", not(all(feature = "transport-itm", target_arch = "arm"))))]
pub fn open() -> Selected {
    RttTransport::init()
}

#[cfg(capture_transport)]
pub fn open() -> Selected {
    MemoryTransport::new()
}
