//! Image to 12-bit BRAM initializer conversion.

pub mod assemble;
pub mod chunk;
pub mod config;
pub mod frame;
pub mod pool;
pub mod quantize;

pub use assemble::Conversion;
pub use config::Config;
pub use frame::{write_listing, Frame};
pub use pool::WorkerPool;
pub use quantize::Quantized;

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BramError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Failed to decode {}: {source}", .path.display())]
    Decode { path: PathBuf, source: image::ImageError },
    #[error("Failed to encode {}: {source}", .path.display())]
    Encode { path: PathBuf, source: image::ImageError },
    #[error("Failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: std::io::Error },
    #[error("Worker pool error: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
    #[error("Only {exited} of {expected} workers exited within {grace:?}")]
    ShutdownTimeout { expected: usize, exited: usize, grace: Duration },
}

pub type Result<T> = std::result::Result<T, BramError>;

/// Parallel converter with a fixed number of workers
pub struct Converter {
    pool: WorkerPool,
}

impl Converter {
    pub fn new(workers: NonZeroUsize) -> Result<Self> {
        Ok(Self { pool: WorkerPool::new(workers)? })
    }

    pub fn workers(&self) -> NonZeroUsize {
        self.pool.workers()
    }

    pub fn convert(&self, frame: &Frame) -> Conversion {
        let ranges = chunk::partition(frame.len(), self.pool.workers());

        let start = Instant::now();
        let output = self.pool.run(frame.pixels(), &ranges);
        tracing::info!("Completed in {} ms.", start.elapsed().as_millis());

        Conversion::assemble(frame.width(), frame.height(), output)
    }

    /// Stop the workers, waiting at most `grace` for them to exit.
    pub fn shutdown(self, grace: Duration) -> Result<()> {
        self.pool.shutdown(grace)
    }

    /// Shut down and hand back `outcome` unchanged.
    /// A slow shutdown is only logged; it never fails the run.
    pub fn finish(self, grace: Duration, outcome: Result<()>) -> Result<()> {
        tracing::info!("Waiting for worker thread termination...");
        if let Err(e) = self.shutdown(grace) {
            tracing::warn!(%e, "worker pool did not shut down cleanly");
        }
        outcome
    }
}

/// Convert `config.input`, writing the listing and the preview image.
pub fn run(config: &Config) -> Result<()> {
    tracing::info!("Loading input image \"{}\"...", config.input.display());
    let frame = Frame::open(&config.input)?;

    tracing::info!("Processing input image with {} thread(s)...", config.workers);
    let converter = Converter::new(config.workers)?;
    let conversion = converter.convert(&frame);

    let saved = save(config, &conversion);
    converter.finish(config.grace, saved)?;
    tracing::info!("Done.");
    Ok(())
}

fn save(config: &Config, conversion: &Conversion) -> Result<()> {
    tracing::info!("Saving BRAM initializer at \"{}\"...", config.output.display());
    write_listing(&config.output, conversion.listing())?;

    tracing::info!("Saving 12-bit color image at \"{}\"...", config.preview.display());
    conversion.save_preview(&config.preview)
}
