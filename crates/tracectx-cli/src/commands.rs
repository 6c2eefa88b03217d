//! CLI command definitions.

use crate::output::Format;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Derive trace context from the CI environment
    Generate {
        /// Run identifier (defaults to $GITHUB_RUN_ID)
        #[arg(long)]
        run_id: Option<String>,

        /// Run attempt (defaults to $GITHUB_RUN_ATTEMPT, then "1")
        #[arg(long)]
        run_attempt: Option<String>,

        /// Job name (defaults to $GITHUB_JOB)
        #[arg(long)]
        job: Option<String>,

        /// Step name to include in span derivation
        #[arg(long)]
        step_name: Option<String>,

        /// Step number; participates only when it parses greater than zero
        #[arg(long)]
        step_number: Option<String>,

        /// Emit trace flags 00 instead of 01
        #[arg(long)]
        not_sampled: bool,

        /// Stdout rendering
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Validate a traceparent header and display its fields
    Parse {
        /// The header value, e.g. 00-<32 hex>-<16 hex>-01
        header: String,
    },
}
