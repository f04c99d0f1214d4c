//! Integration tests for the byte transports.

use rtrec::transport::{MemoryTransport, Transport};

// =============================================================================
// Capture Transport Tests
// =============================================================================

#[test]
fn test_capture_preserves_order() {
    let mut t = MemoryTransport::<32>::new();
    t.send(&[1, 2, 3]);
    t.send(&[4, 5]);
    assert_eq!(t.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    assert_eq!(t.name(), "memory");
}

#[test]
fn test_capture_drops_whole_packets() {
    let mut t = MemoryTransport::<4>::new();
    assert_eq!(t.send(&[1, 2, 3]), 3);
    assert_eq!(t.send(&[4, 5]), 0);
    assert_eq!(t.len(), 3);
}

#[test]
fn test_capture_partial_drain() {
    let mut t = MemoryTransport::<8>::new();
    t.send(&[1, 2, 3, 4, 5]);

    let mut out = [0u8; 2];
    assert_eq!(t.drain_into(&mut out), 2);
    assert_eq!(out, [1, 2]);
    assert_eq!(t.len(), 3);

    // Freed space is reusable.
    assert_eq!(t.send(&[6, 7, 8, 9, 10]), 5);
    t.clear();
    assert!(t.is_empty());
}

fn push<T: Transport>(mut transport: T, bytes: &[u8]) -> usize {
    transport.send(bytes)
}

#[test]
fn test_send_through_mut_ref() {
    let mut t = MemoryTransport::<8>::new();
    assert_eq!(push(&mut t, &[9]), 1);
    assert_eq!(t.len(), 1);
}

// =============================================================================
// ITM Transport Tests
// =============================================================================

#[cfg(feature = "transport-itm")]
mod itm {
    use std::cell::Cell;

    use rtrec::transport::{ItmTransport, StimulusPort, Transport};

    #[derive(Debug, PartialEq)]
    enum Write {
        Word(u32),
        Byte(u8),
    }

    /// Port that reports busy on every other poll.
    #[derive(Default)]
    struct FakePort {
        polls: Cell<u32>,
        writes: Vec<Write>,
    }

    impl StimulusPort for FakePort {
        fn is_ready(&self) -> bool {
            let n = self.polls.get();
            self.polls.set(n + 1);
            n % 2 == 1
        }

        fn write_u32(&mut self, value: u32) {
            self.writes.push(Write::Word(value));
        }

        fn write_u8(&mut self, value: u8) {
            self.writes.push(Write::Byte(value));
        }
    }

    #[test]
    fn test_itm_words_then_bytes() {
        let mut t = ItmTransport::new(FakePort::default());
        let sent = t.send(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A]);
        assert_eq!(sent, 10);
        assert_eq!(
            t.port().writes,
            vec![
                Write::Word(0x0403_0201),
                Write::Word(0x0807_0605),
                Write::Byte(0x09),
                Write::Byte(0x0A),
            ]
        );
        // One wait per write, each spinning once on the busy flag.
        assert_eq!(t.port().polls.get(), 8);
        assert_eq!(t.name(), "itm");
    }
}
