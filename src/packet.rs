//! Binary packet encoder.
//!
//! Packets are encoded into a fixed-capacity buffer and handed to the
//! transport in one piece. All multi-byte fields are little-endian; nothing
//! relies on native struct layout.
//!
//! # Layouts
//!
//! | Packet        | Bytes | Fields                                            |
//! |---------------|-------|---------------------------------------------------|
//! | Event         | 10    | type, id, ts(8)                                   |
//! | UserValue     | 14    | 0x04, id, ts(8), value(i32)                       |
//! | UserToggle    | 11    | 0x0A, id, ts(8), state                            |
//! | Notify        | 15    | type, task, peer, ts(8), value(u32)               |
//! | Contention    | 12    | 0x0C, mutex, waiter, holder, ts(8)                |
//! | TaskCreate    | 22    | 0x03, id, ts(8), prio, base_prio, stack_words     |
//! | StackUsage    | 18    | 0x09, id, ts(8), used_words, total_words          |
//! | Setup         | 3+n   | code, id, n, name(n)                              |
//! | UserTraceSetup| 4+n   | 0x72, id, category, n, name(n)                    |

use heapless::Vec;

use crate::config::MAX_NAME_LEN;
use crate::protocol::{Edge, EventType, SetupCode, UserTraceKind};

/// Largest encoded packet.
pub const MAX_PACKET_LEN: usize = 22;

/// An encoded packet.
pub type Encoded = Vec<u8, MAX_PACKET_LEN>;

/// A typed packet ready for encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Packet<'a> {
    /// Start/end marker for task switches, ISRs, object operations and
    /// user functions.
    Event {
        kind: EventType,
        edge: Edge,
        id: u8,
        timestamp: u64,
    },
    UserValue {
        id: u8,
        timestamp: u64,
        value: i32,
    },
    UserToggle {
        id: u8,
        timestamp: u64,
        state: bool,
    },
    /// Task-to-task notification; give is the start edge, take the end.
    ///
    /// `task` is the task performing the operation (the notifier on give,
    /// the taker on take) and `peer` is the other side.
    Notify {
        edge: Edge,
        task: u8,
        peer: u8,
        timestamp: u64,
        value: u32,
    },
    Contention {
        mutex: u8,
        waiter: u8,
        holder: u8,
        timestamp: u64,
    },
    TaskCreate {
        id: u8,
        timestamp: u64,
        priority: u32,
        base_priority: u32,
        stack_words: u32,
    },
    StackUsage {
        id: u8,
        timestamp: u64,
        used_words: u32,
        total_words: u32,
    },
    Setup {
        code: SetupCode,
        id: u8,
        name: &'a str,
    },
    UserTraceSetup {
        id: u8,
        kind: UserTraceKind,
        name: &'a str,
    },
}

/// Little-endian writer over a packet buffer.
struct Writer(Encoded);

impl Writer {
    fn new() -> Self {
        Self(Vec::new())
    }

    fn bytes(&mut self, data: &[u8]) -> &mut Self {
        // MAX_PACKET_LEN covers the largest layout; names are clamped first.
        let _ = self.0.extend_from_slice(data);
        self
    }

    fn u8(&mut self, v: u8) -> &mut Self {
        self.bytes(&[v])
    }

    fn u32(&mut self, v: u32) -> &mut Self {
        self.bytes(&v.to_le_bytes())
    }

    fn i32(&mut self, v: i32) -> &mut Self {
        self.bytes(&v.to_le_bytes())
    }

    fn u64(&mut self, v: u64) -> &mut Self {
        self.bytes(&v.to_le_bytes())
    }

    fn name(&mut self, name: &str) -> &mut Self {
        let raw = clamp_name(name);
        self.u8(raw.len() as u8).bytes(raw)
    }

    fn finish(self) -> Encoded {
        self.0
    }
}

/// Name bytes as sent on the wire, at most [`MAX_NAME_LEN`].
pub fn clamp_name(name: &str) -> &[u8] {
    let raw = name.as_bytes();
    &raw[..raw.len().min(MAX_NAME_LEN)]
}

impl Packet<'_> {
    /// Encode into wire bytes.
    pub fn encode(&self) -> Encoded {
        let mut w = Writer::new();
        match *self {
            Self::Event {
                kind,
                edge,
                id,
                timestamp,
            } => {
                w.u8(kind.type_byte(edge)).u8(id).u64(timestamp);
            }
            Self::UserValue {
                id,
                timestamp,
                value,
            } => {
                w.u8(EventType::UserTrace as u8)
                    .u8(id)
                    .u64(timestamp)
                    .i32(value);
            }
            Self::UserToggle {
                id,
                timestamp,
                state,
            } => {
                w.u8(EventType::UserToggle as u8)
                    .u8(id)
                    .u64(timestamp)
                    .u8(state as u8);
            }
            Self::Notify {
                edge,
                task,
                peer,
                timestamp,
                value,
            } => {
                w.u8(EventType::TaskNotify.type_byte(edge))
                    .u8(task)
                    .u8(peer)
                    .u64(timestamp)
                    .u32(value);
            }
            Self::Contention {
                mutex,
                waiter,
                holder,
                timestamp,
            } => {
                w.u8(EventType::MutexContention as u8)
                    .u8(mutex)
                    .u8(waiter)
                    .u8(holder)
                    .u64(timestamp);
            }
            Self::TaskCreate {
                id,
                timestamp,
                priority,
                base_priority,
                stack_words,
            } => {
                w.u8(EventType::TaskCreate as u8)
                    .u8(id)
                    .u64(timestamp)
                    .u32(priority)
                    .u32(base_priority)
                    .u32(stack_words);
            }
            Self::StackUsage {
                id,
                timestamp,
                used_words,
                total_words,
            } => {
                w.u8(EventType::StackUsage as u8)
                    .u8(id)
                    .u64(timestamp)
                    .u32(used_words)
                    .u32(total_words);
            }
            Self::Setup { code, id, name } => {
                w.u8(code as u8).u8(id).name(name);
            }
            Self::UserTraceSetup { id, kind, name } => {
                w.u8(SetupCode::UserTrace as u8).u8(id).u8(kind as u8).name(name);
            }
        }
        w.finish()
    }

    /// Encoded length in bytes.
    pub fn encoded_len(&self) -> usize {
        match *self {
            Self::Event { .. } => 10,
            Self::UserValue { .. } => 14,
            Self::UserToggle { .. } => 11,
            Self::Notify { .. } => 15,
            Self::Contention { .. } => 12,
            Self::TaskCreate { .. } => 22,
            Self::StackUsage { .. } => 18,
            Self::Setup { name, .. } => 3 + clamp_name(name).len(),
            Self::UserTraceSetup { name, .. } => 4 + clamp_name(name).len(),
        }
    }
}
