//! Deterministic trace context for CI runs.
//!
//! Maps CI run metadata (run ID, run attempt, job, step) to stable
//! OpenTelemetry-compatible trace and span IDs and a W3C `traceparent`
//! header, so independent tool invocations within one run attempt emit
//! correlatable telemetry without any shared service.
//!
//! Everything here is a pure function of its inputs: no I/O, no environment
//! access, no state. Discovering the metadata and publishing the results is
//! the embedding adapter's job (see the `tracectx` binary).

pub mod context;
pub mod ids;

pub use context::{ContextError, TraceContext};
pub use ids::{IdError, RunIdentity, SpanId, StepIdentity, TraceId};
