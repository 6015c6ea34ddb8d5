//! Run configuration: input, output paths and worker count.

use crate::{BramError, Result};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_WORKERS: NonZeroUsize = match NonZeroUsize::new(4) {
    Some(n) => n,
    None => unreachable!(),
};

/// Extension given to a listing whose path was derived from the input.
pub const LISTING_EXTENSION: &str = "joj";

/// The preview is always written here, relative to the working directory.
pub const PREVIEW_PATH: &str = "out.png";

pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    pub workers: NonZeroUsize,
    pub preview: PathBuf,
    pub grace: Duration,
}

impl Config {
    /// Validate the input and fill in defaults for anything not given.
    pub fn resolve(input: PathBuf, output: Option<PathBuf>, threads: Option<&str>) -> Result<Self> {
        if !input.is_file() {
            return Err(BramError::Config(format!(
                "input image \"{}\" does not exist",
                input.display()
            )));
        }
        let output = output.unwrap_or_else(|| listing_path(&input));
        let workers = threads.map_or(DEFAULT_WORKERS, parse_workers);
        Ok(Self {
            input,
            output,
            workers,
            preview: PathBuf::from(PREVIEW_PATH),
            grace: SHUTDOWN_GRACE,
        })
    }
}

/// Parse a worker count, falling back to the default for anything not positive.
pub fn parse_workers(value: &str) -> NonZeroUsize {
    match value.trim().parse::<i64>() {
        Ok(n) if n > 0 => match usize::try_from(n).ok().and_then(NonZeroUsize::new) {
            Some(n) => n,
            None => fallback(value, "is out of range"),
        },
        Ok(_) => fallback(value, "is not a valid thread count"),
        Err(_) => fallback(value, "is not a valid integer"),
    }
}

fn fallback(value: &str, reason: &str) -> NonZeroUsize {
    tracing::warn!("\"{value}\" {reason}! Setting threads to {DEFAULT_WORKERS}.");
    DEFAULT_WORKERS
}

pub fn listing_path(input: &Path) -> PathBuf {
    input.with_extension(LISTING_EXTENSION)
}
