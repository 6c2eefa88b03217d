//! W3C Trace Context formatting and parsing.

use crate::ids::{IdError, RunIdentity, SpanId, StepIdentity, TraceId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// W3C Trace Context version emitted by this crate.
const VERSION: &str = "00";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContextError {
    #[error("Traceparent must have 4 dash-separated fields, got {0}")]
    FieldCount(usize),

    #[error("Unsupported traceparent version: {0}")]
    UnsupportedVersion(String),

    #[error("Invalid trace flags: {0:?}")]
    InvalidFlags(String),

    #[error("Invalid identifier: {0}")]
    InvalidId(#[from] IdError),
}

/// A trace ID, span ID, and sampled flag, serializable as a W3C
/// `traceparent` header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    pub trace_id: TraceId,
    pub span_id: SpanId,
    pub sampled: bool,
}

impl TraceContext {
    /// Create a sampled trace context from already-derived identifiers.
    pub fn new(trace_id: TraceId, span_id: SpanId) -> Self {
        Self {
            trace_id,
            span_id,
            sampled: true,
        }
    }

    /// Derive the full context for a unit of work within a run.
    ///
    /// Span derivation does not depend on the trace ID, only on the same
    /// identifying fields, so the two derivations are independent.
    pub fn for_run(run: &RunIdentity, step: &StepIdentity) -> Self {
        Self::new(TraceId::derive(run), SpanId::derive(run, step))
    }

    pub fn with_sampled(mut self, sampled: bool) -> Self {
        self.sampled = sampled;
        self
    }

    pub fn is_sampled(&self) -> bool {
        self.sampled
    }

    /// Render as a W3C traceparent header value.
    ///
    /// Always matches `^00-[0-9a-f]{32}-[0-9a-f]{16}-[0-9a-f]{2}$` because
    /// the identifiers are lowercase hex by construction.
    pub fn to_traceparent(&self) -> String {
        let flags = if self.sampled { "01" } else { "00" };
        format!("{VERSION}-{}-{}-{flags}", self.trace_id, self.span_id)
    }

    /// Parse a W3C traceparent header value.
    pub fn from_traceparent(header: &str) -> Result<Self, ContextError> {
        let parts: Vec<&str> = header.split('-').collect();
        if parts.len() != 4 {
            return Err(ContextError::FieldCount(parts.len()));
        }

        if parts[0] != VERSION {
            return Err(ContextError::UnsupportedVersion(parts[0].to_string()));
        }

        let trace_id = TraceId::parse(parts[1])?;
        let span_id = SpanId::parse(parts[2])?;

        let flags = parts[3];
        if flags.len() != 2 || !flags.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ContextError::InvalidFlags(flags.to_string()));
        }

        Ok(Self {
            trace_id,
            span_id,
            // Lowest flag bit is "sampled" per the W3C spec.
            sampled: u8::from_str_radix(flags, 16).map(|f| f & 1 == 1).unwrap_or(false),
        })
    }
}
