//! bramconv CLI - Convert images to 12-bit BRAM initializer listings

use bramconv::Config;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "bramconv", about = "Convert images to 12-bit BRAM initializer listings")]
struct Args {
    /// Input image file
    input: PathBuf,
    /// Listing output path (default: input with a .joj extension)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Number of worker threads (invalid values fall back to 4)
    #[arg(short, long, allow_hyphen_values = true)]
    threads: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bramconv=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let args = Args::parse();
    let result = Config::resolve(args.input, args.output, args.threads.as_deref())
        .and_then(|config| bramconv::run(&config));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
