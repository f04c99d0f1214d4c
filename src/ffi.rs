//! FreeRTOS binding.
//!
//! [`FreeRtos`] answers the recorder's kernel queries through the FreeRTOS
//! C API, and the `rtrec_*` functions below are the C entry points that
//! `include/rtrec_freertos.h` wires into the kernel's trace macros.
//!
//! Optional kernel APIs are declared only when the matching feature says
//! the kernel was built with them:
//!
//! - `freertos-stack-hwm` - `uxTaskGetStackHighWaterMark`
//! - `freertos-mutex-holder` - `xQueueGetMutexHolder`
//! - `freertos-trace-facility` - `ucQueueGetQueueType`

use core::ffi::{CStr, c_char, c_void};

use crate::config::RecorderConfig;
use crate::hooks;
use crate::protocol::{Edge, ObjectKind, UserTraceKind};
use crate::rtos::{ObjectHandle, RtosOps, TaskHandle, TaskInfo};

unsafe extern "C" {
    fn xTaskGetCurrentTaskHandle() -> *mut c_void;
    fn pcTaskGetName(task: *mut c_void) -> *const c_char;
    #[cfg(feature = "freertos-stack-hwm")]
    fn uxTaskGetStackHighWaterMark(task: *mut c_void) -> core::ffi::c_ulong;
    #[cfg(feature = "freertos-mutex-holder")]
    fn xQueueGetMutexHolder(mutex: *mut c_void) -> *mut c_void;
    #[cfg(feature = "freertos-trace-facility")]
    fn ucQueueGetQueueType(queue: *mut c_void) -> u8;
}

/// Borrow a NUL-terminated UTF-8 string from C.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that stays
/// alive and unchanged for `'a`.
unsafe fn c_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    // SAFETY: non-null and NUL-terminated per the caller's contract.
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

/// Kernel queries over the FreeRTOS C API.
pub struct FreeRtos;

impl RtosOps for FreeRtos {
    fn current_task() -> Option<TaskHandle> {
        // SAFETY: plain getter, valid from any context once the scheduler
        // has been created.
        TaskHandle::from_ptr(unsafe { xTaskGetCurrentTaskHandle() })
    }

    fn task_name(task: TaskHandle) -> Option<&'static str> {
        // SAFETY: the name lives inside the TCB, which outlives the hook
        // call; the recorder copies it before returning.
        unsafe { c_str(pcTaskGetName(task.as_raw() as *mut c_void)) }
    }

    #[cfg(feature = "freertos-stack-hwm")]
    fn stack_high_water_mark(task: TaskHandle) -> Option<u32> {
        // SAFETY: `task` came from the kernel and is still alive.
        let words = unsafe { uxTaskGetStackHighWaterMark(task.as_raw() as *mut c_void) };
        Some(u32::try_from(words).unwrap_or(u32::MAX))
    }

    #[cfg(feature = "freertos-mutex-holder")]
    fn mutex_holder(object: ObjectHandle) -> Option<TaskHandle> {
        // SAFETY: only called for objects recorded as mutexes.
        TaskHandle::from_ptr(unsafe { xQueueGetMutexHolder(object.as_raw() as *mut c_void) })
    }

    #[cfg(feature = "freertos-trace-facility")]
    fn object_kind(object: ObjectHandle) -> Option<ObjectKind> {
        // SAFETY: `object` is a live queue handle passed in by the kernel.
        ObjectKind::from_raw(unsafe { ucQueueGetQueueType(object.as_raw() as *mut c_void) })
    }
}

// =============================================================================
// Lifecycle
// =============================================================================

/// Start the recorder. Returns 0 on success, -1 otherwise.
#[unsafe(no_mangle)]
pub extern "C" fn rtrec_init(cpu_freq_hz: u32) -> i32 {
    match crate::init(RecorderConfig::new(cpu_freq_hz)) {
        Ok(()) => 0,
        Err(e) => {
            warn!("rtrec_init: {}", e);
            -1
        }
    }
}

// =============================================================================
// Tasks
// =============================================================================

/// # Safety
/// `tcb` must be the new task's handle; `name` null or a valid C string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rtrec_task_created(
    tcb: *mut c_void,
    name: *const c_char,
    priority: u32,
    base_priority: u32,
    stack_base: *const c_void,
    stack_end: *const c_void,
    stack_depth_words: u32,
) {
    let Some(handle) = TaskHandle::from_ptr(tcb) else {
        return;
    };
    // SAFETY: forwarded caller contract.
    let name = unsafe { c_str(name) };
    let info = TaskInfo {
        handle,
        name,
        priority,
        base_priority,
        stack_base: stack_base as usize,
        stack_end: (!stack_end.is_null()).then_some(stack_end as usize),
        stack_depth_words,
    };
    hooks::task_created::<FreeRtos>(&info);
}

#[unsafe(no_mangle)]
pub extern "C" fn rtrec_task_switched_in() {
    hooks::task_switched_in::<FreeRtos>();
}

#[unsafe(no_mangle)]
pub extern "C" fn rtrec_task_switched_out() {
    hooks::task_switched_out::<FreeRtos>();
}

#[unsafe(no_mangle)]
pub extern "C" fn rtrec_task_priority_set(tcb: *mut c_void, priority: u32) {
    if let Some(task) = TaskHandle::from_ptr(tcb) {
        hooks::task_priority_set(task, priority);
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn rtrec_task_notify_give(tcb: *mut c_void, value: u32) {
    if let Some(dest) = TaskHandle::from_ptr(tcb) {
        hooks::notify_give::<FreeRtos>(dest, value);
    }
}

/// Indexed notification (FreeRTOS 10.4+). The index is not recorded.
#[unsafe(no_mangle)]
pub extern "C" fn rtrec_task_notify_give_indexed(tcb: *mut c_void, _index: u32, value: u32) {
    rtrec_task_notify_give(tcb, value);
}

#[unsafe(no_mangle)]
pub extern "C" fn rtrec_task_notify_take(value: u32) {
    hooks::notify_take::<FreeRtos>(value);
}

/// Indexed notification (FreeRTOS 10.4+). The index is not recorded.
#[unsafe(no_mangle)]
pub extern "C" fn rtrec_task_notify_take_indexed(_index: u32, value: u32) {
    rtrec_task_notify_take(value);
}

// =============================================================================
// Queues, Mutexes & Semaphores
// =============================================================================

/// # Safety
/// `type_hint` must be null or a valid C string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rtrec_queue_created(
    queue: *mut c_void,
    queue_type: u8,
    type_hint: *const c_char,
) {
    let Some(object) = ObjectHandle::from_ptr(queue) else {
        return;
    };
    let kind = ObjectKind::from_raw(queue_type).unwrap_or(ObjectKind::Queue);
    // SAFETY: forwarded caller contract.
    let hint = unsafe { c_str(type_hint) }.unwrap_or("");
    hooks::object_created(object, kind, hint);
}

/// # Safety
/// `type_hint` must be null or a valid C string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rtrec_queue_kind_updated(queue: *mut c_void, type_hint: *const c_char) {
    let Some(object) = ObjectHandle::from_ptr(queue) else {
        return;
    };
    // SAFETY: forwarded caller contract.
    let Some(hint) = (unsafe { c_str(type_hint) }) else {
        return;
    };
    hooks::object_kind_updated(object, hint);
}

#[unsafe(no_mangle)]
pub extern "C" fn rtrec_queue_give(queue: *mut c_void, timeout: u32) {
    if let Some(object) = ObjectHandle::from_ptr(queue) {
        hooks::object_give::<FreeRtos>(object, timeout);
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn rtrec_queue_take(queue: *mut c_void, timeout: u32) {
    if let Some(object) = ObjectHandle::from_ptr(queue) {
        hooks::object_take::<FreeRtos>(object, timeout);
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn rtrec_queue_blocking(queue: *mut c_void) {
    if let Some(object) = ObjectHandle::from_ptr(queue) {
        hooks::object_blocking::<FreeRtos>(object);
    }
}

// =============================================================================
// Interrupts & User Events
// =============================================================================

#[unsafe(no_mangle)]
pub extern "C" fn rtrec_isr_enter(id: u8) {
    hooks::isr_enter(id);
}

#[unsafe(no_mangle)]
pub extern "C" fn rtrec_isr_exit(id: u8) {
    hooks::isr_exit(id);
}

/// # Safety
/// `name` must be null or a valid C string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rtrec_register_user_trace(id: u8, name: *const c_char, kind: u8) {
    let Some(kind) = UserTraceKind::from_raw(kind) else {
        return;
    };
    // SAFETY: forwarded caller contract.
    if let Some(name) = unsafe { c_str(name) } {
        hooks::register_user_trace(id, name, kind);
    }
}

/// # Safety
/// `name` must be null or a valid C string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rtrec_register_user_function(id: u8, name: *const c_char) {
    // SAFETY: forwarded caller contract.
    if let Some(name) = unsafe { c_str(name) } {
        hooks::register_user_function(id, name);
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn rtrec_user_value(id: u8, value: i32) {
    hooks::user_value(id, value);
}

#[unsafe(no_mangle)]
pub extern "C" fn rtrec_user_toggle(id: u8, state: bool) {
    hooks::user_toggle(id, state);
}

#[unsafe(no_mangle)]
pub extern "C" fn rtrec_user_event(id: u8, start: bool) {
    hooks::user_event(id, if start { Edge::Start } else { Edge::End });
}

#[unsafe(no_mangle)]
pub extern "C" fn rtrec_function_enter(id: u8) {
    hooks::function_enter(id);
}

#[unsafe(no_mangle)]
pub extern "C" fn rtrec_function_exit(id: u8) {
    hooks::function_exit(id);
}
