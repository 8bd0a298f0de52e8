//! Scheduler - drives reconciliation cycles
//!
//! The [`Scheduler`] owns the port source and the control session. It logs
//! in before the first cycle, then runs [`reconcile`] once (single-shot) or
//! on a fixed interval until the cancellation token fires.
//!
//! ## Flow
//!
//! ```text
//! BOOTSTRAP ──login ok──→ RUNNING ──cycle──→ wait(interval) ──→ RUNNING
//!     │                     │                      │
//!  fatal / cancelled     single-shot            cancelled
//!     ↓                     ↓                      ↓
//!  Err / STOPPED         STOPPED                STOPPED
//! ```
//!
//! A cycle that fails because the session expired marks it for a fresh
//! login at the start of the next cycle.

use std::{fmt, time::Duration};

use portsync_core::{
    config::Config,
    domain::CycleError,
    ports::{IControlSession, IPortSource},
    usecases::{reconcile, ReconcileOutcome},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::{
    retry::{AttemptOutcome, LoginRetryPolicy},
    SchedulerError,
};

/// Login credentials for the control API
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopState {
    Bootstrap,
    Running,
    Stopped,
}

/// Runs reconciliation cycles against one port source and one session
pub struct Scheduler<S, C> {
    source: S,
    session: C,
    credentials: Credentials,
    /// Zero runs a single cycle
    poll_interval: Duration,
    retry: LoginRetryPolicy,
    /// Set when the last cycle was rejected as unauthenticated
    needs_login: bool,
}

impl<S, C> Scheduler<S, C>
where
    S: IPortSource,
    C: IControlSession,
{
    /// Creates a scheduler with the default login retry policy
    pub fn new(source: S, session: C, credentials: Credentials, poll_interval: Duration) -> Self {
        Self {
            source,
            session,
            credentials,
            poll_interval,
            retry: LoginRetryPolicy::default(),
            needs_login: false,
        }
    }

    /// Creates a scheduler from the credentials, interval and retry settings
    /// in `config`
    pub fn from_config(source: S, session: C, config: &Config) -> Self {
        let credentials = Credentials::new(&config.qbit.username, &config.qbit.password);
        Self::new(source, session, credentials, config.poll_interval())
            .with_retry_policy(LoginRetryPolicy::from_config(config))
    }

    pub fn with_retry_policy(mut self, retry: LoginRetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn session(&self) -> &C {
        &self.session
    }

    pub fn is_single_shot(&self) -> bool {
        self.poll_interval.is_zero()
    }

    /// Runs until the loop stops
    ///
    /// Returns `Ok(())` when cancelled or after a successful single-shot
    /// cycle. In interval mode cycle failures are logged and the loop
    /// carries on; in single-shot mode the cycle's error is returned.
    ///
    /// # Errors
    /// - [`SchedulerError::Bootstrap`] when the initial login gives up
    /// - [`SchedulerError::Cycle`] when the single-shot cycle fails
    pub async fn run(&mut self, cancel: &CancellationToken) -> Result<(), SchedulerError> {
        info!(
            interval_secs = self.poll_interval.as_secs(),
            single_shot = self.is_single_shot(),
            "Scheduler starting"
        );

        let mut state = LoopState::Bootstrap;
        loop {
            state = match state {
                LoopState::Bootstrap => self.bootstrap(cancel).await?,
                LoopState::Running => {
                    let result = self.run_cycle().await;
                    if self.is_single_shot() {
                        result?;
                        LoopState::Stopped
                    } else {
                        if let Err(e) = result {
                            warn!(error = %e, "Reconciliation cycle failed");
                        }
                        self.wait(cancel).await
                    }
                }
                LoopState::Stopped => break,
            };
        }

        info!("Scheduler stopped");
        Ok(())
    }

    /// Logs in, retrying according to the policy
    async fn bootstrap(&mut self, cancel: &CancellationToken) -> Result<LoopState, SchedulerError> {
        let single_shot = self.is_single_shot();
        let mut attempt = 0;

        loop {
            attempt += 1;
            let result = self
                .session
                .login(&self.credentials.username, &self.credentials.password)
                .await;

            match self.retry.evaluate(attempt, result, single_shot) {
                AttemptOutcome::Success => {
                    self.needs_login = false;
                    return Ok(LoopState::Running);
                }
                AttemptOutcome::FatalFailure(source) => {
                    error!(attempt, error = %source, "Giving up on qBittorrent login");
                    return Err(SchedulerError::Bootstrap {
                        attempts: attempt,
                        source,
                    });
                }
                AttemptOutcome::RetryableFailure(e) => {
                    warn!(
                        attempt,
                        max_attempts = self.retry.max_attempts(),
                        delay_secs = self.retry.delay().as_secs(),
                        error = %e,
                        "qBittorrent login failed, retrying"
                    );
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => {
                            info!("Cancelled while waiting to retry login");
                            return Ok(LoopState::Stopped);
                        }
                        _ = tokio::time::sleep(self.retry.delay()) => {}
                    }
                }
            }
        }
    }

    /// Runs one reconciliation cycle, logging in first if the session expired
    async fn run_cycle(&mut self) -> Result<ReconcileOutcome, CycleError> {
        if self.needs_login {
            info!("qBittorrent session expired, logging in again");
            self.session
                .login(&self.credentials.username, &self.credentials.password)
                .await?;
            self.needs_login = false;
        }

        let result = reconcile(&self.source, &self.session).await;
        match &result {
            Ok(outcome) => debug!(?outcome, "Reconciliation cycle complete"),
            Err(e) if e.is_unauthenticated() => self.needs_login = true,
            Err(_) => {}
        }
        result
    }

    /// Sleeps for the poll interval; cancellation wins
    async fn wait(&self, cancel: &CancellationToken) -> LoopState {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("Shutdown requested");
                LoopState::Stopped
            }
            _ = tokio::time::sleep(self.poll_interval) => LoopState::Running,
        }
    }
}

// ============================================================================
// Unit tests
// ============================================================================
