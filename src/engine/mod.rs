// src/engine/mod.rs
pub mod collector;
pub mod dispatcher;
pub mod queue;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use log::info;
use serde::Serialize;

use crate::brute::{Probe, ProbeRegistry, Target};
use crate::common::interrupt::Interrupt;
use crate::config::RunConfig;
use crate::credentials::CredentialPair;
use crate::error::ConfigError;

pub use collector::ResultCollector;
pub use dispatcher::Dispatcher;
pub use queue::WorkQueue;

/// Why the worker pool stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Every queued pair was attempted.
    Drained,
    /// A success was found with stop-on-first-success enabled.
    FirstSuccess,
    /// The caller's shutdown signal fired.
    Interrupted,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StopReason::Drained => "queue drained",
            StopReason::FirstSuccess => "stopped on first success",
            StopReason::Interrupted => "interrupted",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    NothingTried,
    NoneFound,
    Found(usize),
}

/// What a run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultSet {
    pub found: Vec<CredentialPair>,
    pub queued: usize,
    pub attempted: usize,
    pub stop: StopReason,
}

impl ResultSet {
    pub fn status(&self) -> RunStatus {
        if !self.found.is_empty() {
            RunStatus::Found(self.found.len())
        } else if self.attempted == 0 {
            RunStatus::NothingTried
        } else {
            RunStatus::NoneFound
        }
    }

    pub fn contains(&self, pair: &CredentialPair) -> bool {
        self.found.contains(pair)
    }
}

/// A validated run: probe resolved, credentials loaded, queue filled.
///
/// Every configuration error surfaces from [`Plan::build`], before a single
/// attempt is made.
pub struct Plan {
    config: RunConfig,
    probe: Arc<dyn Probe>,
    target: Target,
    queue: Arc<WorkQueue>,
    queued: usize,
}

impl Plan {
    pub fn build(config: &RunConfig, registry: &ProbeRegistry) -> Result<Self, ConfigError> {
        config.validate()?;
        let probe = registry.resolve(&config.protocol)?;
        let pairs = config.credentials.load()?;

        let target = Target {
            host: config.target.clone(),
            port: config.port.unwrap_or_else(|| probe.default_port(config.tls)),
            tls: config.tls,
            timeout: config.timeout,
        };

        let queued = pairs.len();
        info!(
            "Queued {} credential pairs for {}:{} over {}",
            queued,
            target.host,
            target.port,
            probe.name()
        );

        Ok(Plan {
            config: config.clone(),
            probe,
            target,
            queue: Arc::new(pairs.into_iter().collect()),
            queued,
        })
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn protocol(&self) -> &'static str {
        self.probe.name()
    }

    pub fn queued(&self) -> usize {
        self.queued
    }

    /// Runs the worker pool until the queue drains, the first success (if
    /// enabled) or `shutdown` completes.
    pub async fn execute<F>(self, shutdown: F) -> ResultSet
    where
        F: Future<Output = ()>,
    {
        let collector = Arc::new(ResultCollector::new(self.config.output.clone()));
        let dispatcher = Dispatcher::new(self.probe, self.target, Arc::clone(&collector))
            .concurrency(self.config.concurrency)
            .stop_on_first_success(self.config.stop_on_first_success)
            .progress(self.config.progress);

        let stop = dispatcher.run_until(Arc::clone(&self.queue), shutdown).await;

        ResultSet {
            found: collector.found(),
            queued: self.queued,
            attempted: collector.attempts(),
            stop,
        }
    }

    /// Runs the plan unless `interrupt` is already raised, and stops early
    /// once it is.
    pub async fn execute_interruptible(self, interrupt: Interrupt) -> ResultSet {
        if interrupt.is_raised() {
            info!("Interrupted before any attempt was made");
            return self.abandon();
        }
        self.execute(interrupt.raised()).await
    }

    /// The result of a plan dropped before dispatch.
    pub fn abandon(self) -> ResultSet {
        ResultSet {
            found: Vec::new(),
            queued: self.queued,
            attempted: 0,
            stop: StopReason::Interrupted,
        }
    }
}

/// Builds and executes a plan in one step.
pub async fn run<F>(config: &RunConfig, registry: &ProbeRegistry, shutdown: F) -> Result<ResultSet, ConfigError>
where
    F: Future<Output = ()>,
{
    let plan = Plan::build(config, registry)?;
    Ok(plan.execute(shutdown).await)
}
