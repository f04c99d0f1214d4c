//! Mutex contention detection.
//!
//! Evaluated when a task is about to block on an object, before it
//! suspends: at that instant the kernel still reports the task holding the
//! mutex. Correlations are best-effort annotations, so a task the registry
//! does not know is never registered here; the event is simply dropped.

use crate::protocol::ObjectKind;
use crate::registry::TaskTable;
use crate::rtos::TaskHandle;

/// A waiter blocked behind a holder on one mutex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contention {
    pub mutex: u8,
    pub waiter: u8,
    pub holder: u8,
}

/// Correlate a blocking task with the holder of `object`.
///
/// Returns `None` unless `kind` is mutex-like, a holder exists, the holder
/// differs from the waiter, and both tasks resolve to non-zero ids.
pub fn detect<const N: usize>(
    object_id: u8,
    kind: ObjectKind,
    waiter: Option<TaskHandle>,
    holder: Option<TaskHandle>,
    tasks: &TaskTable<N>,
) -> Option<Contention> {
    if !kind.is_mutex() {
        return None;
    }
    let holder = holder?;
    let waiter = waiter?;
    if holder == waiter {
        return None;
    }

    let holder_id = tasks.find(holder)?;
    let waiter_id = tasks.find(waiter)?;
    Some(Contention {
        mutex: object_id,
        waiter: waiter_id,
        holder: holder_id,
    })
}
