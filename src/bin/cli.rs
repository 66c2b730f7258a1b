//! NestKV Shell
//!
//! Runs transaction commands from stdin or a script file.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use nestkv::{Config, Session};
use tracing_subscriber::{fmt, EnvFilter};

/// NestKV Shell
#[derive(Parser, Debug)]
#[command(name = "nestkv-cli")]
#[command(about = "Interactive shell for the NestKV nested-transaction store")]
#[command(version)]
struct Args {
    /// Read commands from this file instead of stdin
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Print this value for missing keys instead of (nil)
    #[arg(long, allow_hyphen_values = true)]
    sentinel: Option<i64>,

    /// Maximum transaction nesting depth
    #[arg(short = 'd', long)]
    max_depth: Option<usize>,

    /// Suppress OK acknowledgements
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    // Initialize tracing/logging (stderr, so responses stay clean on stdout)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,nestkv=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    tracing::debug!("NestKV Shell v{}", nestkv::VERSION);

    let mut builder = Config::builder().echo_acks(!args.quiet);
    if let Some(sentinel) = args.sentinel {
        builder = builder.missing_sentinel(sentinel);
    }
    if let Some(depth) = args.max_depth {
        builder = builder.max_depth(depth);
    }
    let config = builder.build();

    let mut session = match Session::new(config) {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("Failed to start session: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let stdout = io::stdout();
    let mut output = stdout.lock();

    let result = match &args.script {
        Some(path) => match File::open(path) {
            Ok(file) => session.run_script(BufReader::new(file), &mut output),
            Err(e) => {
                tracing::error!("Failed to open script {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => session.run_script(io::stdin().lock(), &mut output),
    };

    match result {
        Ok(stats) => {
            tracing::info!(
                "{} commands, {} mutations, {} errors",
                stats.commands,
                stats.mutations,
                stats.errors
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Shell error: {}", e);
            ExitCode::FAILURE
        }
    }
}
