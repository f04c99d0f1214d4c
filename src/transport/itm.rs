//! Single-wire (ITM/SWO) transport.
//!
//! Bytes go out through one ITM stimulus port as 32-bit words while at least
//! four remain, then one byte at a time. Each write spins on the port's
//! FIFO-ready flag, so throughput is bounded by the probe's SWO rate.

use super::Transport;

/// One ITM stimulus port.
pub trait StimulusPort {
    /// Whether the port FIFO can take another write.
    fn is_ready(&self) -> bool;

    fn write_u32(&mut self, value: u32);

    fn write_u8(&mut self, value: u8);
}

/// Blocking transport over a stimulus port.
pub struct ItmTransport<P> {
    port: P,
}

impl<P: StimulusPort> ItmTransport<P> {
    pub const fn new(port: P) -> Self {
        Self { port }
    }

    /// Access the underlying port.
    pub fn port(&self) -> &P {
        &self.port
    }

    #[inline]
    fn wait_ready(&self) {
        while !self.port.is_ready() {
            core::hint::spin_loop();
        }
    }
}

impl<P: StimulusPort> Transport for ItmTransport<P> {
    fn send(&mut self, bytes: &[u8]) -> usize {
        let mut words = bytes.chunks_exact(4);
        for word in &mut words {
            self.wait_ready();
            self.port
                .write_u32(u32::from_le_bytes([word[0], word[1], word[2], word[3]]));
        }
        for &b in words.remainder() {
            self.wait_ready();
            self.port.write_u8(b);
        }
        bytes.len()
    }

    fn name(&self) -> &'static str {
        "itm"
    }
}

// =============================================================================
// Cortex-M Implementation
// =============================================================================

/// Hardware stimulus port on the core's ITM block.
#[cfg(target_arch = "arm")]
pub struct CortexMStimulus {
    port: usize,
}

#[cfg(target_arch = "arm")]
impl CortexMStimulus {
    const LAR_UNLOCK: u32 = 0xC5AC_CE55;
    const TCR_ITMENA: u32 = 1;

    /// Unlock the ITM, enable it and enable stimulus port `port` (0..32).
    pub fn enable(port: usize) -> Self {
        use cortex_m::peripheral::ITM;

        // SAFETY: configuration writes to the ITM block during recorder init,
        // before any stimulus write.
        unsafe {
            let itm = &*ITM::PTR;
            itm.lar.write(Self::LAR_UNLOCK);
            itm.tcr.modify(|w| w | Self::TCR_ITMENA);
            itm.ter[0].modify(|w| w | (1 << (port % 32)));
        }
        Self { port: port % 32 }
    }

    fn stim(&self) -> &'static mut cortex_m::peripheral::itm::Stim {
        use cortex_m::peripheral::{ITM, itm};

        // SAFETY: the recorder is the only writer of this port and reaches
        // it with the global lock held.
        unsafe { &mut (*(ITM::PTR as *mut itm::RegisterBlock)).stim[self.port] }
    }
}

#[cfg(target_arch = "arm")]
impl StimulusPort for CortexMStimulus {
    #[inline]
    fn is_ready(&self) -> bool {
        self.stim().is_fifo_ready()
    }

    #[inline]
    fn write_u32(&mut self, value: u32) {
        self.stim().write_u32(value);
    }

    #[inline]
    fn write_u8(&mut self, value: u8) {
        self.stim().write_u8(value);
    }
}
