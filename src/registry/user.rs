//! User trace and user function tables.
//!
//! Ids are chosen by the application (1..=255). Registration is idempotent
//! per id and the first registration wins.

use super::{Registration, free_slot};
use crate::config::{MAX_USER_FUNCTIONS, MAX_USER_TRACES};
use crate::name::{self, Name};
use crate::protocol::UserTraceKind;

/// A registered user trace channel.
#[derive(Debug, Clone)]
pub struct UserTraceEntry {
    pub id: u8,
    pub name: Name,
    pub kind: UserTraceKind,
}

/// A registered user function.
#[derive(Debug, Clone)]
pub struct UserFunctionEntry {
    pub id: u8,
    pub name: Name,
}

/// Bounded user trace table.
pub struct UserTraceTable<const N: usize = MAX_USER_TRACES> {
    slots: [Option<UserTraceEntry>; N],
}

impl<const N: usize> UserTraceTable<N> {
    pub const fn new() -> Self {
        Self {
            slots: [const { None }; N],
        }
    }

    /// Register trace `id`. Id 0 and empty names are rejected.
    pub fn assign(&mut self, id: u8, name: &str, kind: UserTraceKind) -> Registration {
        if id == 0 || name.is_empty() {
            return Registration::Rejected;
        }
        if self.find(id).is_some() {
            return Registration::Existing(id);
        }
        let Some(slot) = free_slot(&self.slots) else {
            return Registration::Rejected;
        };
        self.slots[slot] = Some(UserTraceEntry {
            id,
            name: name::truncated(name),
            kind,
        });
        Registration::New(id)
    }

    /// Copy of the entry for `id`.
    pub fn find(&self, id: u8) -> Option<UserTraceEntry> {
        self.slots.iter().flatten().find(|e| e.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<const N: usize> Default for UserTraceTable<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Bounded user function table.
pub struct UserFunctionTable<const N: usize = MAX_USER_FUNCTIONS> {
    slots: [Option<UserFunctionEntry>; N],
}

impl<const N: usize> UserFunctionTable<N> {
    pub const fn new() -> Self {
        Self {
            slots: [const { None }; N],
        }
    }

    /// Register function `id`. Id 0 and empty names are rejected.
    pub fn assign(&mut self, id: u8, name: &str) -> Registration {
        if id == 0 || name.is_empty() {
            return Registration::Rejected;
        }
        if self.find(id).is_some() {
            return Registration::Existing(id);
        }
        let Some(slot) = free_slot(&self.slots) else {
            return Registration::Rejected;
        };
        self.slots[slot] = Some(UserFunctionEntry {
            id,
            name: name::truncated(name),
        });
        Registration::New(id)
    }

    /// Copy of the entry for `id`.
    pub fn find(&self, id: u8) -> Option<UserFunctionEntry> {
        self.slots.iter().flatten().find(|e| e.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<const N: usize> Default for UserFunctionTable<N> {
    fn default() -> Self {
        Self::new()
    }
}
