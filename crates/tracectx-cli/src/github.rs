//! GitHub Actions context discovery.
//!
//! The runner exposes run metadata as environment variables. Step name and
//! number have no runner-provided variable, so they only arrive via flags.

use crate::error::{CliError, Result};
use tracectx_core::{RunIdentity, StepIdentity};

pub const RUN_ID_VAR: &str = "GITHUB_RUN_ID";
pub const RUN_ATTEMPT_VAR: &str = "GITHUB_RUN_ATTEMPT";
pub const JOB_VAR: &str = "GITHUB_JOB";

/// Caller-supplied overrides for values normally discovered from the
/// environment. Flags win over variables.
#[derive(Debug, Clone, Default)]
pub struct ContextOverrides {
    pub run_id: Option<String>,
    pub run_attempt: Option<String>,
    pub job_name: Option<String>,
    pub step_name: Option<String>,
    pub step_number: Option<String>,
}

/// Identifying fields for the current run and job, resolved and validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubContext {
    pub run: RunIdentity,
    pub step: StepIdentity,
}

impl GithubContext {
    /// Resolve from the process environment.
    pub fn from_env(overrides: &ContextOverrides) -> Result<Self> {
        Self::resolve(overrides, |key| std::env::var(key).ok())
    }

    /// Resolve against an arbitrary variable lookup.
    ///
    /// Run ID and job name are required; run attempt defaults to `"1"` the
    /// way the runner does for first attempts. Empty variables count as
    /// unset. Fails before any derivation happens.
    pub fn resolve(
        overrides: &ContextOverrides,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let run_id = overrides
            .run_id
            .clone()
            .or_else(|| var(RUN_ID_VAR))
            .ok_or(CliError::MissingContext(RUN_ID_VAR))?;
        let run_attempt = overrides
            .run_attempt
            .clone()
            .or_else(|| var(RUN_ATTEMPT_VAR))
            .unwrap_or_else(|| "1".to_string());
        let job_name = overrides
            .job_name
            .clone()
            .or_else(|| var(JOB_VAR))
            .ok_or(CliError::MissingContext(JOB_VAR))?;

        let mut step = StepIdentity::new(job_name, overrides.step_name.clone().unwrap_or_default());
        step.step_number = overrides.step_number.clone();

        Ok(Self {
            run: RunIdentity::new(run_id, run_attempt),
            step,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn resolve(
        overrides: &ContextOverrides,
        vars: &HashMap<String, String>,
    ) -> Result<GithubContext> {
        GithubContext::resolve(overrides, |key| vars.get(key).cloned())
    }

    #[test]
    fn test_resolves_from_variables() {
        let vars = env(&[
            ("GITHUB_RUN_ID", "12345"),
            ("GITHUB_RUN_ATTEMPT", "2"),
            ("GITHUB_JOB", "build"),
        ]);
        let ctx = resolve(&ContextOverrides::default(), &vars).unwrap();
        assert_eq!(ctx.run, RunIdentity::new("12345", "2"));
        assert_eq!(ctx.step.job_name, "build");
        assert_eq!(ctx.step.step_name, "");
        assert_eq!(ctx.step.step_number, None);
    }

    #[test]
    fn test_run_attempt_defaults_to_one() {
        let vars = env(&[("GITHUB_RUN_ID", "12345"), ("GITHUB_JOB", "build")]);
        let ctx = resolve(&ContextOverrides::default(), &vars).unwrap();
        assert_eq!(ctx.run.run_attempt, "1");
    }

    #[test]
    fn test_missing_run_id_is_fatal() {
        let vars = env(&[("GITHUB_JOB", "build")]);
        let err = resolve(&ContextOverrides::default(), &vars).unwrap_err();
        assert!(matches!(err, CliError::MissingContext("GITHUB_RUN_ID")));
    }

    #[test]
    fn test_empty_variable_counts_as_unset() {
        let vars = env(&[("GITHUB_RUN_ID", "12345"), ("GITHUB_JOB", "")]);
        let err = resolve(&ContextOverrides::default(), &vars).unwrap_err();
        assert!(matches!(err, CliError::MissingContext("GITHUB_JOB")));
    }

    #[test]
    fn test_overrides_win_over_variables() {
        let vars = env(&[
            ("GITHUB_RUN_ID", "12345"),
            ("GITHUB_RUN_ATTEMPT", "1"),
            ("GITHUB_JOB", "build"),
        ]);
        let overrides = ContextOverrides {
            run_id: Some("999".to_string()),
            step_name: Some("compile".to_string()),
            step_number: Some("3".to_string()),
            ..Default::default()
        };
        let ctx = resolve(&overrides, &vars).unwrap();
        assert_eq!(ctx.run.run_id, "999");
        assert_eq!(ctx.step.step_name, "compile");
        assert_eq!(ctx.step.step_number.as_deref(), Some("3"));
    }

    #[test]
    fn test_overrides_alone_suffice() {
        let overrides = ContextOverrides {
            run_id: Some("1".to_string()),
            job_name: Some("deploy".to_string()),
            ..Default::default()
        };
        let ctx = resolve(&overrides, &HashMap::new()).unwrap();
        assert_eq!(ctx.run, RunIdentity::new("1", "1"));
        assert_eq!(ctx.step.job_name, "deploy");
    }
}
