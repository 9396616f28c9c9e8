mod error;
mod server;

use anyhow::Context;
use cas_validate::{validate, ValidationRequest};
use clap::{Parser, Subcommand};
use server::AppState;
use std::{net::{IpAddr, SocketAddr}, process::ExitCode, time::Duration};
use tracing_subscriber::EnvFilter;

/// The filter used when `RUST_LOG` is not set.
const DEFAULT_LOG_FILTER: &str = "cas_validate=info,cas_validate_server=info,tower_http=info";

#[derive(Parser)]
#[command(name = "cas-validate-server")]
#[command(about = "Checks student answers for mathematical equivalence.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server.
    Serve {
        /// The address to listen on.
        #[arg(long, env = "CAS_VALIDATE_HOST", default_value = "127.0.0.1")]
        host: IpAddr,

        /// The port to listen on.
        #[arg(short, long, env = "CAS_VALIDATE_PORT", default_value_t = 8000)]
        port: u16,

        /// How long a single validation may run, in milliseconds.
        #[arg(long, env = "CAS_VALIDATE_TIMEOUT_MS", default_value_t = 10_000)]
        timeout_ms: u64,
    },

    /// Validate one answer and print the result as JSON.
    Check {
        /// The student's answer.
        student: String,

        /// The reference answer.
        reference: String,

        /// A unit that must appear in the student's answer. Can be repeated.
        #[arg(short, long = "unit")]
        units: Vec<String>,
    },
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Validates a single answer from the command line.
fn check(student: String, reference: String, units: Vec<String>) -> anyhow::Result<ExitCode> {
    let request = ValidationRequest {
        student_expression: student,
        reference_expression: reference,
        variables: None,
        expected_units: (!units.is_empty()).then_some(units),
    };

    match validate(&request) {
        Ok(response) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(ExitCode::SUCCESS)
        },
        Err(err) => {
            err.report_to_stderr().context("failed to write the error report")?;
            Ok(ExitCode::FAILURE)
        },
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_logging();

    match Cli::parse().command {
        Command::Serve { host, port, timeout_ms } => {
            let state = AppState { timeout: Duration::from_millis(timeout_ms) };
            server::serve(SocketAddr::new(host, port), state)
                .await
                .context("server failed")?;
            Ok(ExitCode::SUCCESS)
        },
        Command::Check { student, reference, units } => check(student, reference, units),
    }
}
