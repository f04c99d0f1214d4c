//! Kernel handles and the RTOS capability interface.
//!
//! The recorder never looks inside kernel structures. Everything it needs
//! from the scheduler comes through [`RtosOps`]; capabilities a kernel
//! build lacks keep their default `None` and the matching packets are
//! simply not produced.

use core::ffi::c_void;
use core::num::NonZeroUsize;

use crate::protocol::ObjectKind;

/// Opaque task handle, stable for the task's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(NonZeroUsize);

/// Opaque handle of a queue, mutex or semaphore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectHandle(NonZeroUsize);

macro_rules! impl_handle {
    ($ty:ident) => {
        impl $ty {
            /// Wrap a raw handle value; `None` for null.
            pub const fn from_raw(raw: usize) -> Option<Self> {
                match NonZeroUsize::new(raw) {
                    Some(nz) => Some(Self(nz)),
                    None => None,
                }
            }

            /// Wrap a kernel pointer; `None` for null.
            pub fn from_ptr(ptr: *const c_void) -> Option<Self> {
                Self::from_raw(ptr as usize)
            }

            /// The raw handle value.
            pub const fn as_raw(self) -> usize {
                self.0.get()
            }
        }
    };
}

impl_handle!(TaskHandle);
impl_handle!(ObjectHandle);

/// Task control block data captured at creation time.
#[derive(Debug, Clone, Copy)]
pub struct TaskInfo<'a> {
    pub handle: TaskHandle,
    /// Display name; when `None` the kernel is asked via
    /// [`RtosOps::task_name`].
    pub name: Option<&'a str>,
    pub priority: u32,
    pub base_priority: u32,
    /// Lowest address of the task stack.
    pub stack_base: usize,
    /// Highest address of the task stack, when the kernel records it.
    pub stack_end: Option<usize>,
    /// Total stack size in words; 0 when unknown.
    pub stack_depth_words: u32,
}

impl<'a> TaskInfo<'a> {
    /// Minimal creation record with unknown stack geometry.
    pub const fn new(handle: TaskHandle, name: Option<&'a str>, priority: u32) -> Self {
        Self {
            handle,
            name,
            priority,
            base_priority: priority,
            stack_base: 0,
            stack_end: None,
            stack_depth_words: 0,
        }
    }
}

/// Kernel introspection used by the hook surface.
///
/// Implemented by the RTOS binding layer. All functions may be called from
/// scheduler or interrupt context with interrupts masked, so they must not
/// block or allocate.
pub trait RtosOps {
    /// Task currently owning the CPU.
    fn current_task() -> Option<TaskHandle>;

    /// Display name of `task`.
    fn task_name(_task: TaskHandle) -> Option<&'static str> {
        None
    }

    /// Minimum free stack observed for `task`, in words.
    fn stack_high_water_mark(_task: TaskHandle) -> Option<u32> {
        None
    }

    /// Task currently holding the mutex `object`.
    fn mutex_holder(_object: ObjectHandle) -> Option<TaskHandle> {
        None
    }

    /// Best-effort kind of an object the recorder has not seen created.
    fn object_kind(_object: ObjectHandle) -> Option<ObjectKind> {
        None
    }
}

/// Binding for bare-metal builds with no scheduler.
pub struct NoRtos;

impl RtosOps for NoRtos {
    fn current_task() -> Option<TaskHandle> {
        None
    }
}
