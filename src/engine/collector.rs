use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use log::info;

use crate::credentials::CredentialPair;
use crate::output::file;

/// Thread-safe, append-only record of successful pairs.
///
/// When a sink is configured each recorded pair is also appended to it as
/// `Login: <login>, Password: <password>` before `record` returns.
#[derive(Debug, Default)]
pub struct ResultCollector {
    found: Mutex<Vec<CredentialPair>>,
    sink: Option<PathBuf>,
    attempts: AtomicUsize,
}

impl ResultCollector {
    pub fn new(sink: Option<PathBuf>) -> Self {
        ResultCollector {
            found: Mutex::new(Vec::new()),
            sink,
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn sink(&self) -> Option<&Path> {
        self.sink.as_deref()
    }

    /// Stores `pair` and streams it to the sink.
    ///
    /// The pair stays recorded in memory even if the sink write fails.
    pub fn record(&self, pair: CredentialPair) -> io::Result<()> {
        let mut found = self.found.lock().unwrap_or_else(PoisonError::into_inner);
        let line = format!("{}\n", pair);
        found.push(pair);

        // 持锁写入, 保证每行完整
        if let Some(sink) = &self.sink {
            file::append_to_file(sink, &line)?;
            info!("Result written to {}", sink.display());
        }
        Ok(())
    }

    pub fn note_attempt(&self) {
        self.attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::Relaxed)
    }

    /// Copy of everything recorded so far.
    pub fn found(&self) -> Vec<CredentialPair> {
        self.found.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn found_count(&self) -> usize {
        self.found.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
