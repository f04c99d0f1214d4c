//! The trace recorder.
//!
//! [`Recorder`] owns the identity tables, the timestamp source and the
//! transport, and implements every hook as a method. It performs no locking
//! of its own: the global hook surface in [`crate::hooks`] serializes access
//! with a critical section, and tests drive private instances directly.
//!
//! Setup packets are emitted lazily, exactly once per object and always
//! before the first event packet that carries the object's id.

use core::fmt::Write;

use crate::config::RecorderConfig;
use crate::contention;
use crate::name::Name;
use crate::packet::Packet;
use crate::platform::CycleCounter;
use crate::protocol::{Edge, EventType, ObjectKind, SYNC_MARKER, SetupCode, UserTraceKind};
use crate::registry::{ObjectTable, Registration, TaskTable, UserFunctionTable, UserTraceTable};
use crate::rtos::{ObjectHandle, RtosOps, TaskHandle, TaskInfo};
use crate::stats::{RecorderStats, StatsSnapshot};
use crate::timestamp::TimestampSource;
use crate::transport::Transport;

/// Name used when neither the hook nor the kernel supplies a task name.
const UNNAMED_TASK: &str = "???";

/// Trace recorder over transport `T` and cycle counter `C`.
pub struct Recorder<T, C> {
    transport: T,
    clock: TimestampSource<C>,
    config: RecorderConfig,
    started: bool,
    tasks: TaskTable,
    objects: ObjectTable,
    traces: UserTraceTable,
    functions: UserFunctionTable,
    stats: RecorderStats,
}

impl<T: Transport, C: CycleCounter> Recorder<T, C> {
    /// Create a recorder. Every hook is inert until [`start`], so no id is
    /// handed out before its setup packet can reach the host.
    ///
    /// [`start`]: Recorder::start
    pub fn new(transport: T, counter: C, config: RecorderConfig) -> Self {
        Self {
            transport,
            clock: TimestampSource::new(counter),
            config,
            started: false,
            tasks: TaskTable::new(),
            objects: ObjectTable::new(),
            traces: UserTraceTable::new(),
            functions: UserFunctionTable::new(),
            stats: RecorderStats::new(),
        }
    }

    /// Open the session: sync marker, clock info, builtin ISR names, and
    /// the no-RTOS flag when kernel tracing is off. Idempotent.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;

        self.send(&SYNC_MARKER);

        let mut info = Name::new();
        // "CLK:" plus at most ten digits fits the name buffer.
        let _ = write!(info, "CLK:{}", self.config.cpu_freq_hz);
        self.emit(&Packet::Setup {
            code: SetupCode::Info,
            id: 0,
            name: &info,
        });

        for &(id, name) in self.config.builtin_isrs {
            self.emit(&Packet::Setup {
                code: SetupCode::IsrMap,
                id,
                name,
            });
        }

        if !self.config.rtos {
            self.emit(&Packet::Setup {
                code: SetupCode::ConfigFlags,
                id: 0,
                name: "NO_RTOS",
            });
        }
    }

    /// Whether [`start`](Recorder::start) has run.
    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn tasks(&self) -> &TaskTable {
        &self.tasks
    }

    pub fn objects(&self) -> &ObjectTable {
        &self.objects
    }

    pub fn user_traces(&self) -> &UserTraceTable {
        &self.traces
    }

    pub fn user_functions(&self) -> &UserFunctionTable {
        &self.functions
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub fn reset_stats(&self) {
        self.stats.reset();
    }

    /// Current extended timestamp in cycles.
    pub fn now(&mut self) -> u64 {
        self.clock.now()
    }

    // =========================================================================
    // Emission
    // =========================================================================

    fn send(&mut self, bytes: &[u8]) {
        if !self.started {
            return;
        }
        let accepted = self.transport.send(bytes);
        self.stats.record_send(bytes.len(), accepted);
    }

    fn emit(&mut self, packet: &Packet<'_>) {
        if !self.started {
            return;
        }
        let encoded = packet.encode();
        self.send(&encoded);
    }

    fn emit_event(&mut self, kind: EventType, edge: Edge, id: u8) {
        let timestamp = self.clock.now();
        self.emit(&Packet::Event {
            kind,
            edge,
            id,
            timestamp,
        });
    }

    /// Kernel hooks record only once the session is open and RTOS tracing
    /// is on.
    fn kernel_tracing(&self) -> bool {
        self.started && self.config.rtos
    }

    fn note_registration(&self, reg: Registration, what: &str) {
        if reg == Registration::Rejected {
            self.stats.record_rejected();
            warn!("{} table full or id space exhausted; registration dropped", what);
        }
    }

    // =========================================================================
    // Tasks
    // =========================================================================

    /// A task was created. Fires once per task, before it first runs.
    pub fn task_created<R: RtosOps>(&mut self, info: &TaskInfo<'_>) {
        if !self.kernel_tracing() {
            return;
        }
        let name = info
            .name
            .or_else(|| R::task_name(info.handle))
            .unwrap_or(UNNAMED_TASK);

        let reg = self.tasks.assign(info, name);
        self.note_registration(reg, "task");
        let Registration::New(id) = reg else {
            return;
        };

        if let Some(entry) = self.tasks.get(info.handle) {
            self.emit(&Packet::Setup {
                code: SetupCode::TaskMap,
                id,
                name: &entry.name,
            });
        }
        let timestamp = self.clock.now();
        self.emit(&Packet::TaskCreate {
            id,
            timestamp,
            priority: info.priority,
            base_priority: info.base_priority,
            stack_words: info.stack_depth_words,
        });
    }

    /// The current task is about to run.
    pub fn task_switched_in<R: RtosOps>(&mut self) {
        self.task_switch::<R>(Edge::Start);
    }

    /// The current task is about to be switched out.
    pub fn task_switched_out<R: RtosOps>(&mut self) {
        self.task_switch::<R>(Edge::End);
    }

    fn task_switch<R: RtosOps>(&mut self, edge: Edge) {
        if !self.kernel_tracing() {
            return;
        }
        let current = R::current_task();
        let id = self.tasks.id_or_zero(current);
        self.emit_event(EventType::TaskSwitch, edge, id);

        if let Some(task) = current.filter(|_| id != 0) {
            self.stack_usage::<R>(task, id);
        }
    }

    fn stack_usage<R: RtosOps>(&mut self, task: TaskHandle, id: u8) {
        let total_words = self.tasks.stack_depth(task);
        if total_words == 0 {
            return;
        }
        let Some(free_words) = R::stack_high_water_mark(task) else {
            return;
        };
        let timestamp = self.clock.now();
        self.emit(&Packet::StackUsage {
            id,
            timestamp,
            used_words: total_words.saturating_sub(free_words),
            total_words,
        });
    }

    /// The kernel changed a task's priority.
    pub fn task_priority_set(&mut self, task: TaskHandle, priority: u32) {
        if !self.kernel_tracing() {
            return;
        }
        if self.tasks.set_priority(task, priority) {
            trace!("task {:#x} priority -> {}", task.as_raw(), priority);
        }
    }

    // =========================================================================
    // Task Notifications
    // =========================================================================

    /// The current task notified `dest` with `value`.
    pub fn notify_give<R: RtosOps>(&mut self, dest: TaskHandle, value: u32) {
        if !self.kernel_tracing() {
            return;
        }
        let src = R::current_task();
        let src_id = self.tasks.id_or_zero(src);
        let dest_id = self.tasks.id_or_zero(Some(dest));
        self.tasks.set_last_notifier(dest, src);

        let timestamp = self.clock.now();
        self.emit(&Packet::Notify {
            edge: Edge::Start,
            task: src_id,
            peer: dest_id,
            timestamp,
            value,
        });
    }

    /// The current task consumed a notification holding `value`.
    pub fn notify_take<R: RtosOps>(&mut self, value: u32) {
        if !self.kernel_tracing() {
            return;
        }
        let dest = R::current_task();
        let dest_id = self.tasks.id_or_zero(dest);
        let src = dest.and_then(|d| self.tasks.take_last_notifier(d));
        let src_id = self.tasks.id_or_zero(src);

        let timestamp = self.clock.now();
        // The taker leads on this edge, followed by its notifier.
        self.emit(&Packet::Notify {
            edge: Edge::End,
            task: dest_id,
            peer: src_id,
            timestamp,
            value,
        });
    }

    // =========================================================================
    // Kernel Objects
    // =========================================================================

    /// The kernel created a queue-backed object of `kind`.
    ///
    /// `type_hint` is the kernel's label for the creation path (for example
    /// `"Queue"`); it becomes the display name, suffixed with the kind when
    /// it does not already name it.
    pub fn object_created(&mut self, object: ObjectHandle, kind: ObjectKind, type_hint: &str) {
        if !self.kernel_tracing() {
            return;
        }
        let name = if type_hint.is_empty() || kind.named_by(type_hint) {
            crate::name::truncated(type_hint)
        } else {
            crate::name::composite(type_hint, kind.suffix())
        };
        self.register_object(object, &name, kind);
    }

    /// A specific creation hook reclassified `object`.
    ///
    /// Inert when the object was never created or was already revised.
    pub fn object_kind_updated(&mut self, object: ObjectHandle, type_hint: &str) {
        if !self.kernel_tracing() {
            return;
        }
        let Some(rev) = self.objects.update_kind(object, type_hint) else {
            return;
        };
        debug!("object {} reclassified as {:?}", rev.id, rev.kind);
        self.emit(&Packet::Setup {
            code: rev.kind.setup_code(),
            id: rev.id,
            name: &rev.name,
        });
    }

    /// Something was given to / sent on `object`.
    pub fn object_give<R: RtosOps>(&mut self, object: ObjectHandle, timeout: u32) {
        if !self.kernel_tracing() {
            return;
        }
        if timeout != 0 {
            trace!("give on {:#x} with timeout {}", object.as_raw(), timeout);
        }
        let (id, kind) = self.resolve_object::<R>(object);
        self.emit_event(kind.event_type(), Edge::Start, id);
    }

    /// Something was taken from / received on `object`.
    pub fn object_take<R: RtosOps>(&mut self, object: ObjectHandle, timeout: u32) {
        if !self.kernel_tracing() {
            return;
        }
        if timeout != 0 {
            trace!("take on {:#x} with timeout {}", object.as_raw(), timeout);
        }
        let (id, kind) = self.resolve_object::<R>(object);
        self.emit_event(kind.event_type(), Edge::End, id);
    }

    /// The current task is about to block on `object`.
    ///
    /// Emits a contention packet if `object` is a mutex held by another
    /// task.
    pub fn object_blocking<R: RtosOps>(&mut self, object: ObjectHandle) {
        if !self.kernel_tracing() {
            return;
        }
        let (id, kind) = self.resolve_object::<R>(object);
        if !kind.is_mutex() {
            return;
        }

        let holder = R::mutex_holder(object);
        let waiter = R::current_task();
        if let Some(c) = contention::detect(id, kind, waiter, holder, &self.tasks) {
            let timestamp = self.clock.now();
            self.emit(&Packet::Contention {
                mutex: c.mutex,
                waiter: c.waiter,
                holder: c.holder,
                timestamp,
            });
        }
    }

    /// Id and kind of `object`, registering it on first sight.
    ///
    /// A lost name is acceptable, a lost event is not: objects whose
    /// creation was never observed are registered under an inferred kind.
    fn resolve_object<R: RtosOps>(&mut self, object: ObjectHandle) -> (u8, ObjectKind) {
        if let Some(found) = self.objects.find(object) {
            return found;
        }
        let kind = R::object_kind(object).unwrap_or(ObjectKind::Queue);
        let id = self.register_object(object, "", kind);
        (id, kind)
    }

    fn register_object(&mut self, object: ObjectHandle, name: &str, kind: ObjectKind) -> u8 {
        let reg = self.objects.assign(object, name, kind);
        self.note_registration(reg, "object");
        if let Registration::New(id) = reg {
            if let Some(entry) = self.objects.get(object) {
                self.emit(&Packet::Setup {
                    code: entry.kind.setup_code(),
                    id,
                    name: &entry.name,
                });
            }
        }
        reg.id()
    }

    // =========================================================================
    // Interrupts
    // =========================================================================

    /// Interrupt handler `id` started.
    pub fn isr_enter(&mut self, id: u8) {
        if self.started && id != 0 {
            self.emit_event(EventType::Isr, Edge::Start, id);
        }
    }

    /// Interrupt handler `id` finished.
    pub fn isr_exit(&mut self, id: u8) {
        if self.started && id != 0 {
            self.emit_event(EventType::Isr, Edge::End, id);
        }
    }

    // =========================================================================
    // User Traces & Functions
    // =========================================================================

    /// Advertise user trace channel `id`. First registration wins.
    ///
    /// ISR-category channels are advertised through the ISR map so the host
    /// pairs them with [`isr_enter`](Recorder::isr_enter) events.
    pub fn register_user_trace(&mut self, id: u8, name: &str, kind: UserTraceKind) {
        if !self.started {
            return;
        }
        let reg = self.traces.assign(id, name, kind);
        if !reg.is_new() {
            return;
        }
        let Some(entry) = self.traces.find(id) else {
            return;
        };
        if kind == UserTraceKind::Isr {
            self.emit(&Packet::Setup {
                code: SetupCode::IsrMap,
                id,
                name: &entry.name,
            });
        } else {
            self.emit(&Packet::UserTraceSetup {
                id,
                kind,
                name: &entry.name,
            });
        }
    }

    /// Advertise user function `id`. First registration wins.
    pub fn register_user_function(&mut self, id: u8, name: &str) {
        if !self.started {
            return;
        }
        let reg = self.functions.assign(id, name);
        if !reg.is_new() {
            return;
        }
        if let Some(entry) = self.functions.find(id) {
            self.emit(&Packet::Setup {
                code: SetupCode::UserFunctionMap,
                id,
                name: &entry.name,
            });
        }
    }

    /// Sample `value` on user trace channel `id`.
    pub fn user_value(&mut self, id: u8, value: i32) {
        if !self.started || id == 0 {
            return;
        }
        let timestamp = self.clock.now();
        self.emit(&Packet::UserValue {
            id,
            timestamp,
            value,
        });
    }

    /// Set toggle channel `id` high or low.
    pub fn user_toggle(&mut self, id: u8, state: bool) {
        if !self.started || id == 0 {
            return;
        }
        let timestamp = self.clock.now();
        self.emit(&Packet::UserToggle {
            id,
            timestamp,
            state,
        });
    }

    /// Mark the start or end of user event `id`.
    pub fn user_event(&mut self, id: u8, edge: Edge) {
        if self.started && id != 0 {
            self.emit_event(EventType::UserFunction, edge, id);
        }
    }

    /// User function `id` was entered.
    pub fn function_enter(&mut self, id: u8) {
        self.user_event(id, Edge::Start);
    }

    /// User function `id` returned.
    pub fn function_exit(&mut self, id: u8) {
        self.user_event(id, Edge::End);
    }
}
