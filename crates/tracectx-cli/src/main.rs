//! tracectx CLI entrypoint.

use clap::Parser;

mod commands;
mod error;
mod github;
mod handlers;
mod output;

use commands::Commands;
use github::ContextOverrides;

#[derive(Parser)]
#[command(name = "tracectx")]
#[command(author, version, about = "Deterministic trace context for CI runs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            run_id,
            run_attempt,
            job,
            step_name,
            step_number,
            not_sampled,
            format,
        } => {
            let overrides = ContextOverrides {
                run_id,
                run_attempt,
                job_name: job,
                step_name,
                step_number,
            };
            handlers::generate(overrides, !not_sampled, format)?;
        }
        Commands::Parse { header } => handlers::parse(&header)?,
    }

    Ok(())
}
