// src/brute/mod.rs
pub mod ftp;
pub mod http;
pub mod registry;
pub mod ssh;

use std::time::Duration;

use crate::credentials::CredentialPair;
use crate::error::ProbeError;

pub use registry::ProbeRegistry;

/// Where and how every attempt of a run connects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub host: String,
    pub port: u16,
    pub tls: bool,
    pub timeout: Duration,
}

/// Result of one authentication attempt.
///
/// `TransportError` is handled exactly like `Failure` by the dispatcher; the
/// distinction only shows up in the logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
    TransportError(String),
}

/// A protocol-specific authentication attempt.
///
/// Implementations open a fresh connection per call and release it before
/// returning. Expected failures (rejection, refused connection, timeout) are
/// reported through `Outcome`; `Err` is reserved for faults inside the probe.
pub trait Probe: Send + Sync {
    fn name(&self) -> &'static str;

    fn default_port(&self, tls: bool) -> u16;

    fn attempt(&self, target: &Target, pair: &CredentialPair) -> Result<Outcome, ProbeError>;
}
