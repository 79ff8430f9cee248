// src/common/interrupt.rs
use std::future;
use std::io;

use log::warn;
use tokio::sync::watch;

/// Ctrl-C state shared by every stage of a run.
///
/// The OS handler is installed by [`Interrupt::ctrl_c`] itself, not on first
/// poll, so a Ctrl-C during setup is caught as well.
#[derive(Debug, Clone)]
pub struct Interrupt {
    raised: watch::Receiver<bool>,
}

impl Interrupt {
    /// Installs the Ctrl-C handler. Must be called inside a tokio runtime.
    pub fn ctrl_c() -> io::Result<Self> {
        #[cfg(unix)]
        let mut signal = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())?;
        #[cfg(windows)]
        let mut signal = tokio::signal::windows::ctrl_c()?;

        let (tx, interrupt) = Self::channel();
        tokio::spawn(async move {
            if signal.recv().await.is_some() {
                warn!("Ctrl-C received");
                let _ = tx.send(true);
            }
        });
        Ok(interrupt)
    }

    /// An interrupt raised by sending `true` on the returned sender.
    pub fn channel() -> (watch::Sender<bool>, Self) {
        let (tx, raised) = watch::channel(false);
        (tx, Interrupt { raised })
    }

    pub fn is_raised(&self) -> bool {
        *self.raised.borrow()
    }

    /// Completes once the interrupt is raised. Never completes if the
    /// sender goes away first.
    pub async fn raised(mut self) {
        if self.raised.wait_for(|raised| *raised).await.is_err() {
            future::pending::<()>().await;
        }
    }
}
