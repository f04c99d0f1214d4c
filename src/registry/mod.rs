//! Identity registry.
//!
//! Bounded, allocation-free tables mapping kernel handles and user ids to
//! the one-byte ids used on the wire. Tables only grow by first-use
//! registration and are never shrunk at runtime. Slot positions stay
//! private; callers only ever see the wire id.
//!
//! # Tables
//!
//! - [`TaskTable`] - tasks, ids allocated sequentially from 1
//! - [`ObjectTable`] - queues, mutexes and semaphores
//! - [`UserTraceTable`] / [`UserFunctionTable`] - caller-chosen ids

mod object;
mod task;
mod user;

pub use object::{KindRevision, ObjectEntry, ObjectTable};
pub use task::{TaskEntry, TaskTable};
pub use user::{UserFunctionEntry, UserFunctionTable, UserTraceEntry, UserTraceTable};

/// Outcome of an `assign` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// The handle was already known; nothing changed.
    Existing(u8),
    /// A new entry was stored; its setup packet is still owed to the host.
    New(u8),
    /// Table full or id space exhausted.
    Rejected,
}

impl Registration {
    /// Wire id, 0 when unresolved.
    pub const fn id(self) -> u8 {
        match self {
            Self::Existing(id) | Self::New(id) => id,
            Self::Rejected => 0,
        }
    }

    pub const fn is_new(self) -> bool {
        matches!(self, Self::New(_))
    }
}

/// Monotonic wire-id allocator. Ids start at 1 and are never reused; once
/// 255 has been handed out the allocator stays exhausted.
#[derive(Debug)]
pub(crate) struct IdAllocator {
    next: u8,
}

impl IdAllocator {
    pub(crate) const fn new() -> Self {
        Self { next: 1 }
    }

    pub(crate) fn allocate(&mut self) -> Option<u8> {
        if self.is_exhausted() {
            return None;
        }
        let id = self.next;
        self.next = self.next.wrapping_add(1);
        Some(id)
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.next == 0
    }
}

/// Index of the first empty slot.
pub(crate) fn free_slot<T>(slots: &[Option<T>]) -> Option<usize> {
    slots.iter().position(Option::is_none)
}
