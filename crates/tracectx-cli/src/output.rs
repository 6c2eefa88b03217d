//! Publishing derived trace context to the host environment.
//!
//! On GitHub Actions, step outputs and exported variables are file commands:
//! the runner names a file in `GITHUB_OUTPUT` / `GITHUB_ENV` and picks up
//! `key=value` lines appended to it. Stdout rendering covers every other
//! host.

use crate::error::{CliError, Result};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracectx_core::TraceContext;

pub const OUTPUT_FILE_VAR: &str = "GITHUB_OUTPUT";
pub const ENV_FILE_VAR: &str = "GITHUB_ENV";

/// The three derived strings in their published spelling.
#[derive(Debug, Clone, Serialize)]
pub struct Derived {
    #[serde(rename = "trace-id")]
    pub trace_id: String,
    #[serde(rename = "span-id")]
    pub span_id: String,
    pub traceparent: String,
}

impl Derived {
    pub fn from_context(ctx: &TraceContext) -> Self {
        Self {
            trace_id: ctx.trace_id.to_string(),
            span_id: ctx.span_id.to_string(),
            traceparent: ctx.to_traceparent(),
        }
    }
}

/// Stdout rendering for `--format`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    #[default]
    Text,
    Json,
    Env,
}

pub fn render(derived: &Derived, format: Format) -> String {
    match format {
        Format::Text => format!(
            "trace-id:    {}\nspan-id:     {}\ntraceparent: {}",
            derived.trace_id, derived.span_id, derived.traceparent
        ),
        // Serialization of three plain strings cannot fail.
        Format::Json => serde_json::to_string_pretty(derived).unwrap_or_default(),
        Format::Env => format!(
            "TRACE_ID={}\nSPAN_ID={}\nTRACEPARENT={}",
            derived.trace_id, derived.span_id, derived.traceparent
        ),
    }
}

/// Append step outputs to the runner's `GITHUB_OUTPUT` file.
pub fn write_step_outputs(derived: &Derived, path: &Path) -> Result<()> {
    append_lines(
        path,
        &[
            ("trace-id", &derived.trace_id),
            ("span-id", &derived.span_id),
            ("traceparent", &derived.traceparent),
        ],
    )
}

/// Append exported variables to the runner's `GITHUB_ENV` file, making the
/// context visible to every subsequent step in the job.
pub fn export_variables(derived: &Derived, path: &Path) -> Result<()> {
    append_lines(
        path,
        &[
            ("TRACE_ID", &derived.trace_id),
            ("SPAN_ID", &derived.span_id),
            ("TRACEPARENT", &derived.traceparent),
        ],
    )
}

fn append_lines(path: &Path, pairs: &[(&str, &str)]) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| CliError::Output {
            destination: path.display().to_string(),
            source,
        })?;

    for (key, value) in pairs {
        writeln!(file, "{key}={value}").map_err(|source| CliError::Output {
            destination: path.display().to_string(),
            source,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tracectx_core::{RunIdentity, StepIdentity};

    fn derived() -> Derived {
        let run = RunIdentity::new("12345", "1");
        Derived::from_context(&TraceContext::for_run(&run, &StepIdentity::new("build", "")))
    }

    #[test]
    fn test_render_text() {
        let d = derived();
        let text = render(&d, Format::Text);
        assert!(text.contains(&format!("trace-id:    {}", d.trace_id)));
        assert!(text.contains(&format!("traceparent: {}", d.traceparent)));
    }

    #[test]
    fn test_render_json_keys() {
        let d = derived();
        let json: serde_json::Value = serde_json::from_str(&render(&d, Format::Json)).unwrap();
        assert_eq!(json["trace-id"], d.trace_id);
        assert_eq!(json["span-id"], d.span_id);
        assert_eq!(json["traceparent"], d.traceparent);
    }

    #[test]
    fn test_render_env() {
        let d = derived();
        let env = render(&d, Format::Env);
        assert!(env.starts_with(&format!("TRACE_ID={}", d.trace_id)));
        assert!(env.ends_with(&format!("TRACEPARENT={}", d.traceparent)));
    }

    #[test]
    fn test_step_outputs_appended() {
        let d = derived();
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "existing=1\n").unwrap();

        write_step_outputs(&d, file.path()).unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(
            contents,
            format!(
                "existing=1\ntrace-id={}\nspan-id={}\ntraceparent={}\n",
                d.trace_id, d.span_id, d.traceparent
            )
        );
    }

    #[test]
    fn test_export_variables_uses_env_spelling() {
        let d = derived();
        let file = tempfile::NamedTempFile::new().unwrap();

        export_variables(&d, file.path()).unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert!(contents.contains(&format!("TRACE_ID={}\n", d.trace_id)));
        assert!(contents.contains(&format!("SPAN_ID={}\n", d.span_id)));
        assert!(contents.contains(&format!("TRACEPARENT={}\n", d.traceparent)));
    }

    #[test]
    fn test_output_error_names_destination() {
        let d = derived();
        let err = write_step_outputs(&d, Path::new("/nonexistent-dir/outputs")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent-dir/outputs"));
    }
}
