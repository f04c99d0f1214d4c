//! Kernel synchronization object table.
//!
//! Queues, mutexes and semaphores share one table and one id space, since
//! the kernel builds all of them on the same queue primitive.

use super::{IdAllocator, Registration, free_slot};
use crate::config::MAX_OBJECTS;
use crate::name::{self, Name};
use crate::protocol::ObjectKind;
use crate::rtos::ObjectHandle;

/// One tracked object.
#[derive(Debug, Clone)]
pub struct ObjectEntry {
    pub handle: ObjectHandle,
    pub id: u8,
    pub name: Name,
    pub kind: ObjectKind,
    /// Set once the kind has been corrected by a specific creation hook.
    pub revised: bool,
}

/// Result of a successful kind revision, carrying what the host must be
/// re-told.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindRevision {
    pub id: u8,
    pub kind: ObjectKind,
    pub name: Name,
}

/// Bounded object table.
pub struct ObjectTable<const N: usize = MAX_OBJECTS> {
    slots: [Option<ObjectEntry>; N],
    ids: IdAllocator,
}

impl<const N: usize> ObjectTable<N> {
    pub const fn new() -> Self {
        Self {
            slots: [const { None }; N],
            ids: IdAllocator::new(),
        }
    }

    fn entry(&self, handle: ObjectHandle) -> Option<&ObjectEntry> {
        self.slots.iter().flatten().find(|e| e.handle == handle)
    }

    fn entry_mut(&mut self, handle: ObjectHandle) -> Option<&mut ObjectEntry> {
        self.slots.iter_mut().flatten().find(|e| e.handle == handle)
    }

    /// Register an object, or return its existing id.
    ///
    /// An empty `name` falls back to the kind's display name.
    pub fn assign(&mut self, handle: ObjectHandle, name: &str, kind: ObjectKind) -> Registration {
        if let Some(entry) = self.entry(handle) {
            return Registration::Existing(entry.id);
        }
        let Some(slot) = free_slot(&self.slots) else {
            return Registration::Rejected;
        };
        let Some(id) = self.ids.allocate() else {
            return Registration::Rejected;
        };

        let name = if name.is_empty() {
            kind.display_name()
        } else {
            name
        };
        self.slots[slot] = Some(ObjectEntry {
            handle,
            id,
            name: name::truncated(name),
            kind,
            revised: false,
        });
        Registration::New(id)
    }

    /// Wire id and stored kind of `handle`.
    pub fn find(&self, handle: ObjectHandle) -> Option<(u8, ObjectKind)> {
        self.entry(handle).map(|e| (e.id, e.kind))
    }

    /// Copy of the entry for `handle`.
    pub fn get(&self, handle: ObjectHandle) -> Option<ObjectEntry> {
        self.entry(handle).cloned()
    }

    /// Reclassify a previously created object from a kernel type hint.
    ///
    /// Inert when the handle is unknown, its kind has already been revised,
    /// the hint is empty, or the hint would demote a recursive mutex to a
    /// plain one. The stored name becomes the hint, suffixed with the kind
    /// when the hint does not already spell it out.
    pub fn update_kind(&mut self, handle: ObjectHandle, hint: &str) -> Option<KindRevision> {
        if hint.is_empty() {
            return None;
        }
        let entry = self.entry_mut(handle)?;
        if entry.revised {
            return None;
        }

        let kind = ObjectKind::from_hint(hint);
        if entry.kind == ObjectKind::RecursiveMutex && kind == ObjectKind::Mutex {
            return None;
        }
        entry.kind = kind;
        entry.revised = true;
        entry.name = if kind.named_by(hint) {
            name::truncated(hint)
        } else {
            name::composite(hint, kind.suffix())
        };

        Some(KindRevision {
            id: entry.id,
            kind,
            name: entry.name.clone(),
        })
    }

    /// Number of tracked objects.
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for ObjectTable<N> {
    fn default() -> Self {
        Self::new()
    }
}
