//! Global hook surface.
//!
//! These free functions are what the RTOS kernel calls from its trace
//! points. Each forwards to [`Backend`], chosen at build time:
//!
//! - [`ActiveTracer`] when the `recorder` feature is on and the target has a
//!   cycle counter
//! - [`NullTracer`] otherwise, where every hook compiles to nothing
//!
//! Hooks are fire-and-forget. Before [`init`] succeeds, and whenever the
//! recorder is already busy on this core (a hook re-entered from inside
//! the transport), the event is dropped.
//!
//! # Example
//!
//! ```ignore
//! use rtrec::{RecorderConfig, UserTraceKind, hooks, rtos::NoRtos};
//!
//! rtrec::init(RecorderConfig::new(168_000_000))?;
//! hooks::register_user_trace(3, "adc", UserTraceKind::Graph);
//! hooks::user_value(3, sample);
//! hooks::task_switched_in::<NoRtos>();
//! ```

#[cfg(all(feature = "recorder", cycle_counter))]
mod active;
mod null;

#[cfg(all(feature = "recorder", cycle_counter))]
pub use active::ActiveTracer;
pub use null::NullTracer;

use crate::Error;
use crate::config::RecorderConfig;
use crate::protocol::{Edge, ObjectKind, UserTraceKind};
use crate::rtos::{ObjectHandle, RtosOps, TaskHandle, TaskInfo};
use crate::stats::StatsSnapshot;

/// One implementation of the whole hook surface.
///
/// Associated functions only: the recorder state is a process-wide
/// singleton owned by the implementation.
pub trait Tracer {
    /// Bring up the transport and counter and open the trace session.
    fn init(config: RecorderConfig) -> Result<(), Error>;

    fn is_initialized() -> bool;

    /// Current transport counters, `None` before init.
    fn stats() -> Option<StatsSnapshot>;

    fn task_created<R: RtosOps>(info: &TaskInfo<'_>);
    fn task_switched_in<R: RtosOps>();
    fn task_switched_out<R: RtosOps>();
    fn task_priority_set(task: TaskHandle, priority: u32);

    fn notify_give<R: RtosOps>(dest: TaskHandle, value: u32);
    fn notify_take<R: RtosOps>(value: u32);

    fn object_created(object: ObjectHandle, kind: ObjectKind, type_hint: &str);
    fn object_kind_updated(object: ObjectHandle, type_hint: &str);
    fn object_give<R: RtosOps>(object: ObjectHandle, timeout: u32);
    fn object_take<R: RtosOps>(object: ObjectHandle, timeout: u32);
    fn object_blocking<R: RtosOps>(object: ObjectHandle);

    fn isr_enter(id: u8);
    fn isr_exit(id: u8);

    fn register_user_trace(id: u8, name: &str, kind: UserTraceKind);
    fn register_user_function(id: u8, name: &str);
    fn user_value(id: u8, value: i32);
    fn user_toggle(id: u8, state: bool);
    fn user_event(id: u8, edge: Edge);

    /// Move captured bytes into `out`; 0 unless the capture transport is
    /// compiled in.
    fn drain_capture(out: &mut [u8]) -> usize;
}

/// The tracer compiled into this build.
#[cfg(all(feature = "recorder", cycle_counter))]
pub type Backend = ActiveTracer;

/// The tracer compiled into this build.
#[cfg(not(all(feature = "recorder", cycle_counter)))]
pub type Backend = NullTracer;

// =============================================================================
// Lifecycle
// =============================================================================

/// Initialize the global recorder. See [`crate::init`].
pub fn init(config: RecorderConfig) -> Result<(), Error> {
    Backend::init(config)
}

/// Whether the global recorder accepts events.
pub fn is_initialized() -> bool {
    Backend::is_initialized()
}

/// Snapshot of the global recorder's counters.
pub fn stats() -> Option<StatsSnapshot> {
    Backend::stats()
}

/// Drain the host capture buffer.
pub fn drain_capture(out: &mut [u8]) -> usize {
    Backend::drain_capture(out)
}

/// Test helper: tear down the global recorder so `init` can run again.
#[cfg(all(feature = "test-utils", feature = "recorder", cycle_counter))]
pub fn reset_for_test() {
    active::reset();
}

// =============================================================================
// Kernel Hooks
// =============================================================================

#[inline]
pub fn task_created<R: RtosOps>(info: &TaskInfo<'_>) {
    Backend::task_created::<R>(info);
}

#[inline]
pub fn task_switched_in<R: RtosOps>() {
    Backend::task_switched_in::<R>();
}

#[inline]
pub fn task_switched_out<R: RtosOps>() {
    Backend::task_switched_out::<R>();
}

#[inline]
pub fn task_priority_set(task: TaskHandle, priority: u32) {
    Backend::task_priority_set(task, priority);
}

#[inline]
pub fn notify_give<R: RtosOps>(dest: TaskHandle, value: u32) {
    Backend::notify_give::<R>(dest, value);
}

#[inline]
pub fn notify_take<R: RtosOps>(value: u32) {
    Backend::notify_take::<R>(value);
}

#[inline]
pub fn object_created(object: ObjectHandle, kind: ObjectKind, type_hint: &str) {
    Backend::object_created(object, kind, type_hint);
}

#[inline]
pub fn object_kind_updated(object: ObjectHandle, type_hint: &str) {
    Backend::object_kind_updated(object, type_hint);
}

#[inline]
pub fn object_give<R: RtosOps>(object: ObjectHandle, timeout: u32) {
    Backend::object_give::<R>(object, timeout);
}

#[inline]
pub fn object_take<R: RtosOps>(object: ObjectHandle, timeout: u32) {
    Backend::object_take::<R>(object, timeout);
}

/// Must be called before the task suspends, while the holder is still
/// recorded by the kernel.
#[inline]
pub fn object_blocking<R: RtosOps>(object: ObjectHandle) {
    Backend::object_blocking::<R>(object);
}

// =============================================================================
// Interrupt & User Hooks
// =============================================================================

#[inline]
pub fn isr_enter(id: u8) {
    Backend::isr_enter(id);
}

#[inline]
pub fn isr_exit(id: u8) {
    Backend::isr_exit(id);
}

#[inline]
pub fn register_user_trace(id: u8, name: &str, kind: UserTraceKind) {
    Backend::register_user_trace(id, name, kind);
}

#[inline]
pub fn register_user_function(id: u8, name: &str) {
    Backend::register_user_function(id, name);
}

#[inline]
pub fn user_value(id: u8, value: i32) {
    Backend::user_value(id, value);
}

#[inline]
pub fn user_toggle(id: u8, state: bool) {
    Backend::user_toggle(id, state);
}

#[inline]
pub fn user_event(id: u8, edge: Edge) {
    Backend::user_event(id, edge);
}

#[inline]
pub fn function_enter(id: u8) {
    Backend::user_event(id, Edge::Start);
}

#[inline]
pub fn function_exit(id: u8) {
    Backend::user_event(id, Edge::End);
}
