//! Deterministic trace and span identifiers derived from CI run metadata.
//!
//! Independent tool invocations within the same CI run can correlate their
//! telemetry without a coordination service: the same run metadata always
//! hashes to the same identifiers.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use thiserror::Error;

/// Suffix appended to the trace-ID hash input so that trace and span
/// derivation never hash the same string.
const TRACE_DISCRIMINATOR: &str = "t";

/// One execution attempt of a CI workflow.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunIdentity {
    pub run_id: String,
    pub run_attempt: String,
}

impl RunIdentity {
    pub fn new(run_id: impl Into<String>, run_attempt: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            run_attempt: run_attempt.into(),
        }
    }
}

/// One unit of work within a run.
///
/// `step_number` participates in span-ID derivation only when its leading
/// integer parses to a value greater than zero; anything else is treated the
/// same as not supplying it at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StepIdentity {
    pub job_name: String,
    pub step_name: String,
    pub step_number: Option<String>,
}

impl StepIdentity {
    pub fn new(job_name: impl Into<String>, step_name: impl Into<String>) -> Self {
        Self {
            job_name: job_name.into(),
            step_name: step_name.into(),
            step_number: None,
        }
    }

    pub fn with_step_number(mut self, step_number: impl Into<String>) -> Self {
        self.step_number = Some(step_number.into());
        self
    }

    /// The step number as it participates in derivation, if it does at all.
    pub fn effective_step_number(&self) -> Option<&str> {
        let number = self.step_number.as_deref()?;
        if !number.is_empty() && leading_int(number).is_some_and(|n| n > 0) {
            Some(number)
        } else {
            None
        }
    }
}

/// Error returned when a hex identifier fails validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdError {
    #[error("Expected {expected} lowercase hex characters, got {found:?}")]
    Malformed { expected: usize, found: String },
}

macro_rules! define_hex_id {
    ($name:ident, $hex_len:expr) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Validate an externally supplied identifier.
            pub fn parse(s: &str) -> Result<Self, IdError> {
                if s.len() == $hex_len && s.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()) {
                    Ok(Self(s.to_string()))
                } else {
                    Err(IdError::Malformed {
                        expected: $hex_len,
                        found: s.to_string(),
                    })
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }
    };
}

define_hex_id!(TraceId, 32);
define_hex_id!(SpanId, 16);

impl TraceId {
    /// Derive the trace ID for a run attempt.
    ///
    /// SHA-256 over `run_id + run_attempt + "t"`, keeping the leading 16
    /// digest bytes. Empty fields are accepted; rejecting meaningless
    /// identity is the caller's concern.
    pub fn derive(run: &RunIdentity) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(run.run_id.as_bytes());
        hasher.update(run.run_attempt.as_bytes());
        hasher.update(TRACE_DISCRIMINATOR.as_bytes());
        let digest = hasher.finalize();
        Self(hex::encode(&digest[..16]))
    }
}

impl SpanId {
    /// Derive the span ID for a unit of work within a run.
    ///
    /// SHA-256 over `run_id + run_attempt + job_name + step_name`, with the
    /// step number appended only when it parses to a positive integer. The
    /// result is digest bytes 8..16, a different window than [`TraceId`] so
    /// the two are never truncations of the same digest region.
    pub fn derive(run: &RunIdentity, step: &StepIdentity) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(run.run_id.as_bytes());
        hasher.update(run.run_attempt.as_bytes());
        hasher.update(step.job_name.as_bytes());
        hasher.update(step.step_name.as_bytes());
        if let Some(number) = step.effective_step_number() {
            hasher.update(number.as_bytes());
        }
        let digest = hasher.finalize();
        Self(hex::encode(&digest[8..16]))
    }
}

/// Parse the leading integer of a string, `parseInt`-style: skip leading
/// whitespace, take an optional sign, honor a `0x`/`0X` prefix as base 16,
/// then consume digits until the first non-digit. Returns `None` when no
/// digits are found.
fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, s) = match s.as_bytes().first()? {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };

    let (radix, s) = if s.len() >= 2 && (s.starts_with("0x") || s.starts_with("0X")) {
        (16u32, &s[2..])
    } else {
        (10u32, s)
    };

    let digits = s
        .chars()
        .take_while(|c| c.to_digit(radix).is_some())
        .count();
    if digits == 0 {
        return None;
    }

    let mut value: i64 = 0;
    for c in s[..digits].chars() {
        let d = c.to_digit(radix).unwrap_or(0) as i64;
        value = value.saturating_mul(radix as i64).saturating_add(d);
    }
    Some(if negative { -value } else { value })
}
