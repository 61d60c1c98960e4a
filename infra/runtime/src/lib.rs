//! # Runtime
//!
//! Tokio runtime profiles shared by the forge binaries.
//!
//! * **High performance**: the HTTP server. Every worker, long keep-alive.
//! * **Memory efficient**: the CLI. Half the workers, smaller stacks.
//!
//! Compiler and deployer children are spawned through `tokio::process`, so every profile
//! enables the IO and time drivers.
//!
//! ```rust,ignore
//! #[tforge_runtime::main(high_performance)]
//! async fn main() -> anyhow::Result<()> {
//!     Ok(())
//! }
//! ```

pub use anyhow::Result;
pub use tforge_derive::main;

use anyhow::anyhow;
use std::{sync::OnceLock, thread::available_parallelism, time::Duration};
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

const DEFAULT_WORKER_THREADS: usize = 4;
const MAX_WORKER_THREADS: usize = 1024;
/// 3 `MiB`.
const DEFAULT_STACK_SIZE: usize = 3 * 1024 * 1024;
const MIN_STACK_SIZE: usize = 1024 * 1024;
const MAX_STACK_SIZE: usize = 16 * 1024 * 1024;
const THREAD_KEEP_ALIVE: Duration = Duration::from_secs(60);
const FALLBACK_THREAD_NAME: &str = "tforge-worker";

static WORKER_THREADS: OnceLock<usize> = OnceLock::new();

/// `TOKIO_WORKER_THREADS` when valid, otherwise the available parallelism.
fn detected_worker_threads() -> usize {
    *WORKER_THREADS.get_or_init(|| {
        std::env::var("TOKIO_WORKER_THREADS")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|&n| n > 0 && n <= MAX_WORKER_THREADS)
            .unwrap_or_else(|| {
                available_parallelism().map(std::num::NonZero::get).unwrap_or(DEFAULT_WORKER_THREADS)
            })
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub worker_threads: usize,
    pub stack_size: usize,
    pub thread_name: String,
    pub thread_keep_alive: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            worker_threads: detected_worker_threads(),
            stack_size: DEFAULT_STACK_SIZE,
            thread_name: FALLBACK_THREAD_NAME.to_owned(),
            thread_keep_alive: THREAD_KEEP_ALIVE,
        }
    }
}

impl RuntimeConfig {
    /// Server profile.
    #[must_use]
    pub fn high_performance() -> Self {
        Self {
            worker_threads: detected_worker_threads(),
            stack_size: 4 * 1024 * 1024,
            thread_name: "tforge-srv".to_owned(),
            thread_keep_alive: Duration::from_secs(300),
        }
    }

    /// CLI profile.
    #[must_use]
    pub fn memory_efficient() -> Self {
        Self {
            worker_threads: (detected_worker_threads() / 2).max(1),
            stack_size: 2 * 1024 * 1024,
            thread_name: "tforge-cli".to_owned(),
            thread_keep_alive: Duration::from_secs(30),
        }
    }

    #[must_use]
    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = threads.clamp(1, MAX_WORKER_THREADS);
        self
    }

    #[must_use]
    pub fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = bytes.clamp(MIN_STACK_SIZE, MAX_STACK_SIZE);
        self
    }

    #[must_use]
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Clamps out-of-range values and replaces a blank thread name.
    fn normalized(&self) -> Self {
        let thread_name = if self.thread_name.trim().is_empty() {
            FALLBACK_THREAD_NAME.to_owned()
        } else {
            self.thread_name.clone()
        };

        Self {
            worker_threads: self.worker_threads.clamp(1, MAX_WORKER_THREADS),
            stack_size: self.stack_size.clamp(MIN_STACK_SIZE, MAX_STACK_SIZE),
            thread_name,
            thread_keep_alive: self.thread_keep_alive,
        }
    }
}

/// Builds a multi-threaded runtime with every driver enabled.
///
/// # Errors
/// Fails when the OS refuses to create the worker threads.
pub fn build_runtime_with_config(config: &RuntimeConfig) -> Result<Runtime> {
    let config = config.normalized();
    debug!(?config, "Building tokio runtime");

    Builder::new_multi_thread()
        .worker_threads(config.worker_threads)
        .thread_name(&config.thread_name)
        .thread_stack_size(config.stack_size)
        .thread_keep_alive(config.thread_keep_alive)
        .enable_all()
        .build()
        .map_err(|e| anyhow!("Failed to initialize runtime: {e}"))
}
