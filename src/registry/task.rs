//! Task identity table.

use super::{IdAllocator, Registration, free_slot};
use crate::config::MAX_TASKS;
use crate::name::{self, Name};
use crate::rtos::{TaskHandle, TaskInfo};

/// One tracked task.
#[derive(Debug, Clone)]
pub struct TaskEntry {
    pub handle: TaskHandle,
    pub id: u8,
    pub name: Name,
    /// Task that most recently notified this one; relation only.
    pub last_notifier: Option<TaskHandle>,
    pub stack_base: usize,
    pub stack_end: Option<usize>,
    pub priority: u32,
    pub base_priority: u32,
    pub stack_depth_words: u32,
}

/// Bounded task table.
pub struct TaskTable<const N: usize = MAX_TASKS> {
    slots: [Option<TaskEntry>; N],
    ids: IdAllocator,
}

impl<const N: usize> TaskTable<N> {
    pub const fn new() -> Self {
        Self {
            slots: [const { None }; N],
            ids: IdAllocator::new(),
        }
    }

    fn entry(&self, handle: TaskHandle) -> Option<&TaskEntry> {
        self.slots.iter().flatten().find(|e| e.handle == handle)
    }

    fn entry_mut(&mut self, handle: TaskHandle) -> Option<&mut TaskEntry> {
        self.slots.iter_mut().flatten().find(|e| e.handle == handle)
    }

    /// Register a task, or return its existing id.
    pub fn assign(&mut self, info: &TaskInfo<'_>, name: &str) -> Registration {
        if let Some(entry) = self.entry(info.handle) {
            return Registration::Existing(entry.id);
        }
        let Some(slot) = free_slot(&self.slots) else {
            return Registration::Rejected;
        };
        let Some(id) = self.ids.allocate() else {
            return Registration::Rejected;
        };

        self.slots[slot] = Some(TaskEntry {
            handle: info.handle,
            id,
            name: name::truncated(name),
            last_notifier: None,
            stack_base: info.stack_base,
            stack_end: info.stack_end,
            priority: info.priority,
            base_priority: info.base_priority,
            stack_depth_words: info.stack_depth_words,
        });
        Registration::New(id)
    }

    /// Wire id of `handle`.
    pub fn find(&self, handle: TaskHandle) -> Option<u8> {
        self.entry(handle).map(|e| e.id)
    }

    /// Wire id of an optional handle, 0 when absent or untracked.
    pub fn id_or_zero(&self, handle: Option<TaskHandle>) -> u8 {
        handle.and_then(|h| self.find(h)).unwrap_or(0)
    }

    /// Copy of the entry for `handle`.
    pub fn get(&self, handle: TaskHandle) -> Option<TaskEntry> {
        self.entry(handle).cloned()
    }

    /// Total stack depth of `handle` in words, 0 when unknown.
    pub fn stack_depth(&self, handle: TaskHandle) -> u32 {
        self.entry(handle).map_or(0, |e| e.stack_depth_words)
    }

    /// Record `notifier` as the last task to notify `target`.
    pub fn set_last_notifier(&mut self, target: TaskHandle, notifier: Option<TaskHandle>) {
        if let Some(entry) = self.entry_mut(target) {
            entry.last_notifier = notifier;
        }
    }

    /// Take and clear the last notifier of `target`.
    pub fn take_last_notifier(&mut self, target: TaskHandle) -> Option<TaskHandle> {
        self.entry_mut(target).and_then(|e| e.last_notifier.take())
    }

    /// Update the live priority of `handle`. Returns false if untracked.
    pub fn set_priority(&mut self, handle: TaskHandle, priority: u32) -> bool {
        match self.entry_mut(handle) {
            Some(entry) => {
                entry.priority = priority;
                true
            }
            None => false,
        }
    }

    /// Number of tracked tasks.
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

impl<const N: usize> Default for TaskTable<N> {
    fn default() -> Self {
        Self::new()
    }
}
