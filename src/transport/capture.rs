//! In-memory capture transport.

use heapless::Deque;

use super::Transport;

/// Bounded byte capture. A packet that does not fit whole is dropped, so the
/// retained stream always splits on packet boundaries.
pub struct MemoryTransport<const N: usize> {
    buf: Deque<u8, N>,
}

impl<const N: usize> MemoryTransport<N> {
    pub const fn new() -> Self {
        Self { buf: Deque::new() }
    }

    /// Bytes currently buffered.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Move up to `out.len()` buffered bytes into `out`, oldest first.
    pub fn drain_into(&mut self, out: &mut [u8]) -> usize {
        let mut n = 0;
        while n < out.len() {
            match self.buf.pop_front() {
                Some(b) => {
                    out[n] = b;
                    n += 1;
                }
                None => break,
            }
        }
        n
    }

    /// Iterate buffered bytes without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &u8> {
        self.buf.iter()
    }

    /// Discard everything buffered.
    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

impl<const N: usize> Default for MemoryTransport<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Transport for MemoryTransport<N> {
    fn send(&mut self, bytes: &[u8]) -> usize {
        if N - self.buf.len() < bytes.len() {
            return 0;
        }
        for &b in bytes {
            // Capacity checked above.
            let _ = self.buf.push_back(b);
        }
        bytes.len()
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_packets_or_nothing() {
        let mut t = MemoryTransport::<8>::new();
        assert_eq!(t.send(&[1, 2, 3, 4, 5]), 5);
        assert_eq!(t.send(&[6, 7, 8, 9]), 0);
        assert_eq!(t.send(&[6, 7, 8]), 3);

        let mut out = [0u8; 8];
        assert_eq!(t.drain_into(&mut out), 8);
        assert_eq!(out, [1, 2, 3, 4, 5, 6, 7, 8]);
        assert!(t.is_empty());
    }
}
