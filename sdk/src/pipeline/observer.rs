//! Optional pipeline telemetry (spec.md §9 redesign flag): a trait with no-op defaults so
//! callers that don't care about step-level observability pay nothing for it.

use super::Step;
use crate::error::Error;

/// Observes a pipeline run step by step. All methods default to doing nothing.
pub trait Observer {
    fn before_step(&self, _step: &Step) {}
    fn after_step(&self, _step: &Step) {}
    fn on_error(&self, _step: &Step, _error: &Error) {}
}

/// The default observer: observes nothing.
pub struct NoopObserver;

impl Observer for NoopObserver {}

/// An observer that logs each step via the `log` crate, at the teacher's chosen
/// granularity (debug for step boundaries, error for failures).
pub struct LoggingObserver;

impl Observer for LoggingObserver {
    fn before_step(&self, step: &Step) {
        log::debug!("pipeline: starting {step:?}");
    }

    fn after_step(&self, step: &Step) {
        log::debug!("pipeline: finished {step:?}");
    }

    fn on_error(&self, step: &Step, error: &Error) {
        log::error!("pipeline: {step:?} failed: {error}");
    }
}
