//! Login retry policy
//!
//! Decides, after each login attempt, whether the scheduler should try
//! again. Credentials rejected by the server are never retried; neither is
//! anything in a single-shot run.

use std::time::Duration;

use portsync_core::{config::Config, domain::ClientError};

/// Classification of one login attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success,
    /// Wait [`LoginRetryPolicy::delay`] and try again
    RetryableFailure(ClientError),
    /// Give up
    FatalFailure(ClientError),
}

/// Bounded, fixed-delay retry policy for the bootstrap login
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginRetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl LoginRetryPolicy {
    /// Creates a policy allowing `max_attempts` attempts, `delay` apart
    ///
    /// A budget of zero is treated as one attempt.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.sync.login_attempts, config.login_delay())
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Classifies the result of login attempt number `attempt` (1-based)
    pub fn evaluate(
        &self,
        attempt: u32,
        result: Result<(), ClientError>,
        single_shot: bool,
    ) -> AttemptOutcome {
        match result {
            Ok(()) => AttemptOutcome::Success,
            Err(e) if e.is_login_failed() || single_shot || attempt >= self.max_attempts => {
                AttemptOutcome::FatalFailure(e)
            }
            Err(e) => AttemptOutcome::RetryableFailure(e),
        }
    }
}

impl Default for LoginRetryPolicy {
    fn default() -> Self {
        Self::new(20, Duration::from_secs(10))
    }
}
