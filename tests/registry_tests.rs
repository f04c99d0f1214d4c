//! Integration tests for the identity registry.

use rtrec::config::{MAX_NAME_LEN, MAX_OBJECTS, MAX_TASKS};
use rtrec::protocol::{ObjectKind, UserTraceKind};
use rtrec::registry::{ObjectTable, Registration, TaskTable, UserTraceTable};
use rtrec::rtos::{ObjectHandle, TaskHandle, TaskInfo};

fn task(raw: usize) -> TaskHandle {
    TaskHandle::from_raw(raw).unwrap()
}

fn object(raw: usize) -> ObjectHandle {
    ObjectHandle::from_raw(raw).unwrap()
}

// =============================================================================
// Task Table Tests
// =============================================================================

#[test]
fn test_task_assign_is_idempotent() {
    let mut tasks: TaskTable = TaskTable::new();
    let info = TaskInfo::new(task(0x100), None, 1);

    assert_eq!(tasks.assign(&info, "A"), Registration::New(1));
    assert_eq!(tasks.assign(&info, "renamed"), Registration::Existing(1));
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks.get(task(0x100)).unwrap().name.as_str(), "A");
}

#[test]
fn test_task_ids_are_sequential() {
    let mut tasks: TaskTable = TaskTable::new();
    for i in 1..=5usize {
        let reg = tasks.assign(&TaskInfo::new(task(i * 8), None, 1), "T");
        assert_eq!(reg.id() as usize, i);
    }
}

#[test]
fn test_task_capacity_exhaustion() {
    let mut tasks: TaskTable = TaskTable::new();
    assert_eq!(tasks.capacity(), MAX_TASKS);
    for i in 0..MAX_TASKS {
        let reg = tasks.assign(&TaskInfo::new(task(0x1000 + i), None, 1), "T");
        assert!(reg.is_new());
    }

    let overflow = TaskInfo::new(task(0x9999), None, 1);
    assert_eq!(tasks.assign(&overflow, "late"), Registration::Rejected);
    assert_eq!(tasks.find(task(0x9999)), None);
    assert_eq!(tasks.id_or_zero(Some(task(0x9999))), 0);

    // Earlier entries are untouched.
    for i in 0..MAX_TASKS {
        assert_eq!(tasks.find(task(0x1000 + i)), Some(i as u8 + 1));
    }
}

#[test]
fn test_task_name_truncation() {
    let mut tasks: TaskTable = TaskTable::new();
    tasks.assign(&TaskInfo::new(task(0x100), None, 1), "a_twenty_char_name__");
    let entry = tasks.get(task(0x100)).unwrap();
    assert_eq!(entry.name.len(), MAX_NAME_LEN);
    assert_eq!(entry.name.as_str(), "a_twenty_char_n");
}

#[test]
fn test_last_notifier_is_taken_once() {
    let mut tasks: TaskTable = TaskTable::new();
    tasks.assign(&TaskInfo::new(task(0x100), None, 1), "A");
    tasks.assign(&TaskInfo::new(task(0x200), None, 1), "B");

    tasks.set_last_notifier(task(0x200), Some(task(0x100)));
    assert_eq!(tasks.take_last_notifier(task(0x200)), Some(task(0x100)));
    assert_eq!(tasks.take_last_notifier(task(0x200)), None);
}

#[test]
fn test_stack_geometry_recorded() {
    let mut tasks: TaskTable = TaskTable::new();
    let info = TaskInfo {
        stack_base: 0x2000_0000,
        stack_end: Some(0x2000_0400),
        stack_depth_words: 256,
        ..TaskInfo::new(task(0x100), None, 2)
    };
    tasks.assign(&info, "A");

    let entry = tasks.get(task(0x100)).unwrap();
    assert_eq!(entry.stack_end, Some(0x2000_0400));
    assert_eq!(tasks.stack_depth(task(0x100)), 256);
    assert_eq!(tasks.stack_depth(task(0x200)), 0);
    assert!(tasks.set_priority(task(0x100), 7));
    assert!(!tasks.set_priority(task(0x200), 7));
}

// =============================================================================
// Object Table Tests
// =============================================================================

#[test]
fn test_object_default_name() {
    let mut objects: ObjectTable = ObjectTable::new();
    objects.assign(object(0x10), "", ObjectKind::CountingSemaphore);
    assert_eq!(
        objects.get(object(0x10)).unwrap().name.as_str(),
        "CountingSem"
    );
}

#[test]
fn test_update_kind_changes_find() {
    let mut objects: ObjectTable = ObjectTable::new();
    objects.assign(object(0x10), "Queue", ObjectKind::Queue);

    let rev = objects.update_kind(object(0x10), "Mutex").unwrap();
    assert_eq!(rev.id, 1);
    assert_eq!(rev.kind, ObjectKind::Mutex);
    assert_eq!(rev.name.as_str(), "Mutex");
    assert_eq!(objects.find(object(0x10)), Some((1, ObjectKind::Mutex)));

    assert_eq!(objects.update_kind(object(0x10), "BinarySem"), None);
    assert_eq!(objects.update_kind(object(0x20), "Mutex"), None);
}

#[test]
fn test_update_kind_ignores_empty_hint() {
    let mut objects: ObjectTable = ObjectTable::new();
    objects.assign(object(0x10), "Lock", ObjectKind::Mutex);

    assert_eq!(objects.update_kind(object(0x10), ""), None);
    assert_eq!(objects.find(object(0x10)), Some((1, ObjectKind::Mutex)));
    assert_eq!(objects.get(object(0x10)).unwrap().name.as_str(), "Lock");

    // The empty hint does not use up the one revision.
    let rev = objects.update_kind(object(0x10), "BinarySem").unwrap();
    assert_eq!(rev.kind, ObjectKind::BinarySemaphore);
}

#[test]
fn test_update_kind_keeps_recursive_mutex() {
    let mut objects: ObjectTable = ObjectTable::new();
    objects.assign(object(0x10), "", ObjectKind::RecursiveMutex);

    assert_eq!(objects.update_kind(object(0x10), "Mutex"), None);
    assert_eq!(
        objects.find(object(0x10)),
        Some((1, ObjectKind::RecursiveMutex))
    );

    let rev = objects.update_kind(object(0x10), "RecMutex").unwrap();
    assert_eq!(rev.kind, ObjectKind::RecursiveMutex);
    assert_eq!(rev.name.as_str(), "RecMutex");
}

#[test]
fn test_update_kind_composes_name() {
    let mut objects: ObjectTable = ObjectTable::new();
    objects.assign(object(0x10), "Queue", ObjectKind::Queue);
    let rev = objects.update_kind(object(0x10), "Lock").unwrap();
    // Unrecognised hints classify as queues.
    assert_eq!(rev.kind, ObjectKind::Queue);
    assert_eq!(rev.name.as_str(), "Lock_Queue");
}

#[test]
fn test_object_capacity_exhaustion() {
    let mut objects: ObjectTable = ObjectTable::new();
    for i in 1..=MAX_OBJECTS {
        objects.assign(object(i), "", ObjectKind::Queue);
    }
    assert_eq!(
        objects.assign(object(0xFFFF), "", ObjectKind::Queue),
        Registration::Rejected
    );
    assert_eq!(objects.len(), MAX_OBJECTS);
    assert_eq!(objects.find(object(1)), Some((1, ObjectKind::Queue)));
}

#[test]
fn test_id_space_exhaustion() {
    // A table larger than the id space runs out of ids before slots.
    let mut objects = ObjectTable::<300>::new();
    for i in 1..=255usize {
        assert!(objects.assign(object(i), "", ObjectKind::Queue).is_new());
    }
    assert_eq!(
        objects.assign(object(256), "", ObjectKind::Queue),
        Registration::Rejected
    );
    assert_eq!(objects.find(object(255)), Some((255, ObjectKind::Queue)));
}

// =============================================================================
// User Table Tests
// =============================================================================

#[test]
fn test_user_trace_first_registration_wins() {
    let mut traces: UserTraceTable = UserTraceTable::new();
    assert_eq!(
        traces.assign(4, "temp", UserTraceKind::Graph),
        Registration::New(4)
    );
    assert_eq!(
        traces.assign(4, "other", UserTraceKind::Bar),
        Registration::Existing(4)
    );
    let entry = traces.find(4).unwrap();
    assert_eq!(entry.name.as_str(), "temp");
    assert_eq!(entry.kind, UserTraceKind::Graph);
}

#[test]
fn test_user_trace_rejects_invalid() {
    let mut traces: UserTraceTable = UserTraceTable::new();
    assert_eq!(
        traces.assign(0, "zero", UserTraceKind::Graph),
        Registration::Rejected
    );
    assert_eq!(traces.assign(1, "", UserTraceKind::Graph), Registration::Rejected);
    assert!(traces.is_empty());
}
