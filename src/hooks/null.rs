//! No-op tracer for builds without the recorder.

use super::Tracer;
use crate::Error;
use crate::config::RecorderConfig;
use crate::protocol::{Edge, ObjectKind, UserTraceKind};
use crate::rtos::{ObjectHandle, RtosOps, TaskHandle, TaskInfo};
use crate::stats::StatsSnapshot;

/// Tracer whose hooks do nothing.
pub struct NullTracer;

impl Tracer for NullTracer {
    fn init(config: RecorderConfig) -> Result<(), Error> {
        config.validate()?;
        debug!("recorder compiled out; tracing disabled");
        Ok(())
    }

    fn is_initialized() -> bool {
        false
    }

    fn stats() -> Option<StatsSnapshot> {
        None
    }

    #[inline(always)]
    fn task_created<R: RtosOps>(_info: &TaskInfo<'_>) {}
    #[inline(always)]
    fn task_switched_in<R: RtosOps>() {}
    #[inline(always)]
    fn task_switched_out<R: RtosOps>() {}
    #[inline(always)]
    fn task_priority_set(_task: TaskHandle, _priority: u32) {}
    #[inline(always)]
    fn notify_give<R: RtosOps>(_dest: TaskHandle, _value: u32) {}
    #[inline(always)]
    fn notify_take<R: RtosOps>(_value: u32) {}
    #[inline(always)]
    fn object_created(_object: ObjectHandle, _kind: ObjectKind, _type_hint: &str) {}
    #[inline(always)]
    fn object_kind_updated(_object: ObjectHandle, _type_hint: &str) {}
    #[inline(always)]
    fn object_give<R: RtosOps>(_object: ObjectHandle, _timeout: u32) {}
    #[inline(always)]
    fn object_take<R: RtosOps>(_object: ObjectHandle, _timeout: u32) {}
    #[inline(always)]
    fn object_blocking<R: RtosOps>(_object: ObjectHandle) {}
    #[inline(always)]
    fn isr_enter(_id: u8) {}
    #[inline(always)]
    fn isr_exit(_id: u8) {}
    #[inline(always)]
    fn register_user_trace(_id: u8, _name: &str, _kind: UserTraceKind) {}
    #[inline(always)]
    fn register_user_function(_id: u8, _name: &str) {}
    #[inline(always)]
    fn user_value(_id: u8, _value: i32) {}
    #[inline(always)]
    fn user_toggle(_id: u8, _state: bool) {}
    #[inline(always)]
    fn user_event(_id: u8, _edge: Edge) {}

    fn drain_capture(_out: &mut [u8]) -> usize {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtos::NoRtos;

    #[test]
    fn null_tracer_accepts_everything() {
        assert!(NullTracer::init(RecorderConfig::new(1_000_000)).is_ok());
        NullTracer::task_switched_in::<NoRtos>();
        NullTracer::user_value(1, 5);
        assert!(!NullTracer::is_initialized());
        assert_eq!(NullTracer::stats(), None);
        assert_eq!(NullTracer::drain_capture(&mut [0u8; 4]), 0);
    }

    #[test]
    fn null_tracer_still_validates() {
        assert!(NullTracer::init(RecorderConfig::new(0)).is_err());
    }
}
