//! portsync Sync - Reconciliation scheduling
//!
//! Provides:
//! - The login retry policy applied before the first cycle
//! - The scheduler that drives reconciliation once or on an interval
//!
//! ## Modules
//!
//! - [`retry`] - Login retry policy with a tagged attempt outcome
//! - [`scheduler`] - BOOTSTRAP / RUNNING / STOPPED loop around `reconcile`

pub mod retry;
pub mod scheduler;

use portsync_core::domain::{ClientError, CycleError};
use thiserror::Error;

pub use retry::{AttemptOutcome, LoginRetryPolicy};
pub use scheduler::{Credentials, Scheduler};

/// Errors that stop the scheduler
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// Logging in before the first cycle failed for good
    #[error("login failed after {attempts} attempt(s): {source}")]
    Bootstrap {
        /// Number of login attempts made
        attempts: u32,
        #[source]
        source: ClientError,
    },

    /// The only cycle of a single-shot run failed
    #[error("reconciliation failed: {0}")]
    Cycle(#[from] CycleError),
}
