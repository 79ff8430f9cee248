use std::future::{self, Future};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use indicatif::ProgressBar;
use log::{debug, error, info, warn};
use tokio::task::JoinSet;

use crate::brute::{Outcome, Probe, Target};
use crate::common::utils;
use crate::config::DEFAULT_THREADS;
use crate::engine::collector::ResultCollector;
use crate::engine::queue::WorkQueue;
use crate::engine::StopReason;

/// Fixed-size pool of blocking workers draining a [`WorkQueue`].
pub struct Dispatcher {
    probe: Arc<dyn Probe>,
    target: Arc<Target>,
    collector: Arc<ResultCollector>,
    concurrency: usize,
    stop_on_first_success: bool,
    progress: bool,
}

impl Dispatcher {
    pub fn new(probe: Arc<dyn Probe>, target: Target, collector: Arc<ResultCollector>) -> Self {
        Dispatcher {
            probe,
            target: Arc::new(target),
            collector,
            concurrency: DEFAULT_THREADS,
            stop_on_first_success: false,
            progress: false,
        }
    }

    pub fn concurrency(mut self, workers: usize) -> Self {
        self.concurrency = workers.max(1);
        self
    }

    pub fn stop_on_first_success(mut self, enabled: bool) -> Self {
        self.stop_on_first_success = enabled;
        self
    }

    pub fn progress(mut self, enabled: bool) -> Self {
        self.progress = enabled;
        self
    }

    /// Drains `queue` to the end or until the first success, if enabled.
    pub async fn run(&self, queue: Arc<WorkQueue>) -> StopReason {
        self.run_until(queue, future::pending()).await
    }

    /// Like [`Dispatcher::run`], but also stops when `shutdown` completes.
    ///
    /// Stopping is cooperative: workers finish the attempt in hand, and every
    /// worker has exited by the time this returns.
    pub async fn run_until<F>(&self, queue: Arc<WorkQueue>, shutdown: F) -> StopReason
    where
        F: Future<Output = ()>,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let pb = if self.progress {
            utils::create_progress_bar(queue.len() as u64, &format!("{} attempts", self.probe.name()))
        } else {
            ProgressBar::hidden()
        };

        info!(
            "Starting {} workers for {} pairs against {}:{} ({})",
            self.concurrency,
            queue.len(),
            self.target.host,
            self.target.port,
            self.probe.name()
        );

        let mut workers = JoinSet::new();
        for id in 0..self.concurrency {
            let worker = Worker {
                id,
                probe: Arc::clone(&self.probe),
                target: Arc::clone(&self.target),
                queue: Arc::clone(&queue),
                collector: Arc::clone(&self.collector),
                stop: Arc::clone(&stop),
                stop_on_first_success: self.stop_on_first_success,
                pb: pb.clone(),
            };
            workers.spawn_blocking(move || worker.run());
        }

        tokio::pin!(shutdown);
        let mut interrupted = false;
        loop {
            tokio::select! {
                joined = workers.join_next() => match joined {
                    None => break,
                    Some(Ok(())) => {}
                    Some(Err(e)) => error!("Worker terminated abnormally: {}", e),
                },
                _ = &mut shutdown, if !interrupted => {
                    interrupted = true;
                    stop.store(true, Ordering::Release);
                    warn!("Stop requested, waiting for in-flight attempts to finish");
                }
            }
        }

        pb.finish_with_message(format!(
            "Found {} valid {} credentials",
            self.collector.found_count(),
            self.probe.name()
        ));

        if interrupted {
            StopReason::Interrupted
        } else if stop.load(Ordering::Acquire) {
            StopReason::FirstSuccess
        } else {
            StopReason::Drained
        }
    }
}

struct Worker {
    id: usize,
    probe: Arc<dyn Probe>,
    target: Arc<Target>,
    queue: Arc<WorkQueue>,
    collector: Arc<ResultCollector>,
    stop: Arc<AtomicBool>,
    stop_on_first_success: bool,
    pb: ProgressBar,
}

impl Worker {
    fn run(self) {
        debug!("Worker {} started", self.id);

        while !self.stop.load(Ordering::Acquire) {
            let pair = match self.queue.get() {
                Some(pair) => pair,
                None => break,
            };
            self.collector.note_attempt();

            let attempt = panic::catch_unwind(AssertUnwindSafe(|| self.probe.attempt(&self.target, &pair)));
            match attempt {
                Ok(Ok(Outcome::Success)) => {
                    info!("Success! {}", pair);
                    if let Err(e) = self.collector.record(pair) {
                        error!("Failed to append result to output file: {}", e);
                    }
                    if self.stop_on_first_success {
                        info!("Worker {} stopping the run after first success", self.id);
                        self.stop.store(true, Ordering::Release);
                    }
                }
                Ok(Ok(Outcome::Failure)) => {
                    debug!("Failed: {}:{}", pair.login, pair.password);
                }
                Ok(Ok(Outcome::TransportError(reason))) => {
                    debug!("Failed: {}:{} ({})", pair.login, pair.password, reason);
                }
                Ok(Err(e)) => {
                    error!("{} probe error for login '{}': {}", self.probe.name(), pair.login, e);
                }
                Err(_) => {
                    error!("{} probe panicked for login '{}'", self.probe.name(), pair.login);
                }
            }

            self.queue.task_done();
            self.pb.inc(1);
        }

        debug!("Worker {} finished", self.id);
    }
}
