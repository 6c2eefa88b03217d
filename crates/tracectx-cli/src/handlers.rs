//! Command handlers.

use crate::error::Result;
use crate::github::{ContextOverrides, GithubContext};
use crate::output::{self, Derived, Format};
use std::path::PathBuf;
use tracectx_core::TraceContext;

/// Derive the trace context for the current run and publish it.
pub fn generate(overrides: ContextOverrides, sampled: bool, format: Format) -> Result<()> {
    let ctx = GithubContext::from_env(&overrides)?;
    tracing::debug!(
        run_id = %ctx.run.run_id,
        run_attempt = %ctx.run.run_attempt,
        job = %ctx.step.job_name,
        step = %ctx.step.step_name,
        "Resolved CI context"
    );

    let trace = TraceContext::for_run(&ctx.run, &ctx.step).with_sampled(sampled);
    let derived = Derived::from_context(&trace);

    if let Some(path) = file_command(output::OUTPUT_FILE_VAR) {
        output::write_step_outputs(&derived, &path)?;
        tracing::info!(path = %path.display(), "Published step outputs");
    }
    if let Some(path) = file_command(output::ENV_FILE_VAR) {
        output::export_variables(&derived, &path)?;
        tracing::info!(path = %path.display(), "Exported environment variables");
    }

    println!("{}", output::render(&derived, format));
    Ok(())
}

/// Validate a traceparent header and print its fields.
pub fn parse(header: &str) -> Result<()> {
    let ctx = TraceContext::from_traceparent(header)?;
    println!("version:  00");
    println!("trace-id: {}", ctx.trace_id);
    println!("span-id:  {}", ctx.span_id);
    println!("sampled:  {}", ctx.is_sampled());
    Ok(())
}

fn file_command(var: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
