//! RTT ring-buffer transport.
//!
//! Packets are written into a statically allocated up-buffer that the debug
//! probe drains over SWD. The full-buffer policy is fixed at build time by
//! the `rtt-drop` feature.

use rtt_target::{ChannelMode, UpChannel, rtt_init};

use super::Transport;
use crate::config::{Backpressure, RTT_BACKPRESSURE, RTT_BUFFER_SIZE, RTT_CHANNEL};

// rtt_init! takes the channel index as a literal.
const _: () = assert!(RTT_CHANNEL == 0);

/// Transport over RTT up-channel 0.
pub struct RttTransport {
    channel: UpChannel,
    policy: Backpressure,
}

impl RttTransport {
    /// Set up the RTT control block with a dedicated up-buffer.
    ///
    /// Must be called once; the recorder's init guard ensures that.
    pub fn init() -> Self {
        let channels = rtt_init! {
            up: {
                0: {
                    size: RTT_BUFFER_SIZE,
                    name: "rtrec"
                }
            }
        };
        let mut channel = channels.up.0;
        channel.set_mode(match RTT_BACKPRESSURE {
            Backpressure::Block => ChannelMode::BlockIfFull,
            Backpressure::Drop => ChannelMode::NoBlockSkip,
        });
        Self {
            channel,
            policy: RTT_BACKPRESSURE,
        }
    }

    /// Configured full-buffer policy.
    pub fn policy(&self) -> Backpressure {
        self.policy
    }
}

impl Transport for RttTransport {
    fn send(&mut self, bytes: &[u8]) -> usize {
        self.channel.write(bytes)
    }

    fn name(&self) -> &'static str {
        match self.policy {
            Backpressure::Block => "rtt-block",
            Backpressure::Drop => "rtt-drop",
        }
    }
}
