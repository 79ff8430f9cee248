use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal problems detected before any work is queued.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read list file {}: {source}", path.display())]
    ListFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid password generation rule '{rule}': {reason} (expected min:max:alphabet)")]
    InvalidRule { rule: String, reason: String },

    #[error("unsupported protocol '{name}' (supported: {supported})")]
    UnsupportedProtocol { name: String, supported: String },

    #[error("no logins given: use --login or --login-file")]
    MissingLogins,

    #[error("no passwords given: use --password, --password-file or --generate")]
    MissingPasswords,

    #[error("concurrency must be at least 1, got {0}")]
    InvalidConcurrency(usize),

    #[error("timeout must be greater than zero")]
    InvalidTimeout,

    #[error("generation cap must be between 1 and {max}, got {cap}")]
    InvalidGenerationCap { cap: usize, max: usize },

    #[error("session file {}, line {line}: {reason}", path.display())]
    Session {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("session file {}: {source}", path.display())]
    SessionIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Faults inside a probe that are not a plain rejection or an unreachable host.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("ssh library error: {0}")]
    Ssh(#[from] ssh2::Error),

    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}
