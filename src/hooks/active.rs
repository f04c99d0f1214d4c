//! The live tracer backed by a global [`Recorder`].

use core::sync::atomic::{AtomicBool, Ordering};

use spin::Mutex;

use super::Tracer;
use crate::Error;
use crate::config::RecorderConfig;
use crate::platform::{self, CycleCounter};
use crate::protocol::{Edge, ObjectKind, UserTraceKind};
use crate::recorder::Recorder;
use crate::rtos::{ObjectHandle, RtosOps, TaskHandle, TaskInfo};
use crate::stats::StatsSnapshot;
use crate::transport::{self, Transport};

type GlobalRecorder = Recorder<transport::Selected, platform::Counter>;

/// The global recorder instance.
static RECORDER: Mutex<Option<GlobalRecorder>> = Mutex::new(None);

/// Whether [`ActiveTracer::init`] has claimed the recorder.
static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Run `f` on the global recorder with interrupts masked.
///
/// Returns `None` before init, or when the lock is already held on this
/// core (a hook fired from inside another hook).
#[inline]
fn with_recorder<T>(f: impl FnOnce(&mut GlobalRecorder) -> T) -> Option<T> {
    if !INITIALIZED.load(Ordering::Acquire) {
        return None;
    }
    critical_section::with(|_| {
        let mut guard = RECORDER.try_lock()?;
        guard.as_mut().map(f)
    })
}

/// Tracer that records into the global recorder.
pub struct ActiveTracer;

impl Tracer for ActiveTracer {
    fn init(config: RecorderConfig) -> Result<(), Error> {
        config.validate()?;
        if INITIALIZED.swap(true, Ordering::AcqRel) {
            warn!("recorder already initialized");
            return Err(Error::AlreadyInitialized);
        }

        let mut counter = platform::counter();
        counter.enable();
        let transport = transport::open();
        info!(
            "trace recorder: transport={} counter={} clock={}Hz rtos={}",
            transport.name(),
            platform::counter_name(),
            config.cpu_freq_hz,
            config.rtos
        );

        let mut recorder = Recorder::new(transport, counter, config);
        critical_section::with(|_| {
            recorder.start();
            *RECORDER.lock() = Some(recorder);
        });
        Ok(())
    }

    fn is_initialized() -> bool {
        INITIALIZED.load(Ordering::Acquire)
    }

    fn stats() -> Option<StatsSnapshot> {
        with_recorder(|r| r.stats())
    }

    fn task_created<R: RtosOps>(info: &TaskInfo<'_>) {
        with_recorder(|r| r.task_created::<R>(info));
    }

    fn task_switched_in<R: RtosOps>() {
        with_recorder(|r| r.task_switched_in::<R>());
    }

    fn task_switched_out<R: RtosOps>() {
        with_recorder(|r| r.task_switched_out::<R>());
    }

    fn task_priority_set(task: TaskHandle, priority: u32) {
        with_recorder(|r| r.task_priority_set(task, priority));
    }

    fn notify_give<R: RtosOps>(dest: TaskHandle, value: u32) {
        with_recorder(|r| r.notify_give::<R>(dest, value));
    }

    fn notify_take<R: RtosOps>(value: u32) {
        with_recorder(|r| r.notify_take::<R>(value));
    }

    fn object_created(object: ObjectHandle, kind: ObjectKind, type_hint: &str) {
        with_recorder(|r| r.object_created(object, kind, type_hint));
    }

    fn object_kind_updated(object: ObjectHandle, type_hint: &str) {
        with_recorder(|r| r.object_kind_updated(object, type_hint));
    }

    fn object_give<R: RtosOps>(object: ObjectHandle, timeout: u32) {
        with_recorder(|r| r.object_give::<R>(object, timeout));
    }

    fn object_take<R: RtosOps>(object: ObjectHandle, timeout: u32) {
        with_recorder(|r| r.object_take::<R>(object, timeout));
    }

    fn object_blocking<R: RtosOps>(object: ObjectHandle) {
        with_recorder(|r| r.object_blocking::<R>(object));
    }

    fn isr_enter(id: u8) {
        with_recorder(|r| r.isr_enter(id));
    }

    fn isr_exit(id: u8) {
        with_recorder(|r| r.isr_exit(id));
    }

    fn register_user_trace(id: u8, name: &str, kind: UserTraceKind) {
        with_recorder(|r| r.register_user_trace(id, name, kind));
    }

    fn register_user_function(id: u8, name: &str) {
        with_recorder(|r| r.register_user_function(id, name));
    }

    fn user_value(id: u8, value: i32) {
        with_recorder(|r| r.user_value(id, value));
    }

    fn user_toggle(id: u8, state: bool) {
        with_recorder(|r| r.user_toggle(id, state));
    }

    fn user_event(id: u8, edge: Edge) {
        with_recorder(|r| r.user_event(id, edge));
    }

    #[cfg(capture_transport)]
    fn drain_capture(out: &mut [u8]) -> usize {
        with_recorder(|r| r.transport_mut().drain_into(out)).unwrap_or(0)
    }

    #[cfg(not(capture_transport))]
    fn drain_capture(_out: &mut [u8]) -> usize {
        0
    }
}

/// Drop the global recorder and clear the init flag.
#[cfg(feature = "test-utils")]
pub(super) fn reset() {
    critical_section::with(|_| {
        *RECORDER.lock() = None;
    });
    INITIALIZED.store(false, Ordering::Release);
}
