// src/config.rs
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::brute::http::DEFAULT_LOGIN_PATH;
use crate::credentials::{CredentialSpec, GenerationRule, MAX_GENERATION_CAP};
use crate::error::ConfigError;
use crate::output::file;
use crate::output::report::ReportFormat;

pub const DEFAULT_THREADS: usize = 4;
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Settings for one run. Built once at start-up and shared read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub target: String,
    pub protocol: String,
    /// Explicit port; the probe's default is used when unset.
    pub port: Option<u16>,
    pub tls: bool,
    pub concurrency: usize,
    pub timeout: Duration,
    pub stop_on_first_success: bool,
    /// Append-only success log.
    pub output: Option<PathBuf>,
    pub verbose: bool,
    pub credentials: CredentialSpec,
    pub http_path: String,
    pub report: Option<PathBuf>,
    pub report_format: ReportFormat,
    /// Draw a progress bar while workers run. Not persisted in sessions.
    pub progress: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            target: String::new(),
            protocol: String::new(),
            port: None,
            tls: false,
            concurrency: DEFAULT_THREADS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            stop_on_first_success: false,
            output: None,
            verbose: false,
            credentials: CredentialSpec::default(),
            http_path: DEFAULT_LOGIN_PATH.to_string(),
            report: None,
            report_format: ReportFormat::Text,
            progress: false,
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency(self.concurrency));
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout);
        }
        let cap = self.credentials.generation_cap;
        if cap == 0 || cap > MAX_GENERATION_CAP {
            return Err(ConfigError::InvalidGenerationCap {
                cap,
                max: MAX_GENERATION_CAP,
            });
        }
        Ok(())
    }

    /// Writes the configuration as `key: value` lines.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        file::write_to_file(path, &self.to_session()).map_err(|source| ConfigError::SessionIo {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads a file written by [`RunConfig::save`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::SessionIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_session(path, &content)
    }

    fn to_session(&self) -> String {
        fn opt<T: ToString>(value: &Option<T>) -> String {
            value.as_ref().map(ToString::to_string).unwrap_or_default()
        }
        fn opt_path(value: &Option<PathBuf>) -> String {
            value.as_ref().map(|p| p.display().to_string()).unwrap_or_default()
        }

        let creds = &self.credentials;
        let entries = [
            ("target", self.target.clone()),
            ("protocol", self.protocol.clone()),
            ("port", opt(&self.port)),
            ("tls", self.tls.to_string()),
            ("threads", self.concurrency.to_string()),
            ("timeout", self.timeout.as_secs().to_string()),
            ("exit_on_success", self.stop_on_first_success.to_string()),
            ("output", opt_path(&self.output)),
            ("verbose", self.verbose.to_string()),
            ("login", opt(&creds.login)),
            ("login_file", opt_path(&creds.login_file)),
            ("password", opt(&creds.password)),
            ("password_file", opt_path(&creds.password_file)),
            ("generate", opt(&creds.generate)),
            ("generate_cap", creds.generation_cap.to_string()),
            ("seed", opt(&creds.seed)),
            ("http_path", self.http_path.clone()),
            ("report", opt_path(&self.report)),
            ("report_format", self.report_format.to_string()),
        ];

        let mut out = String::new();
        for (key, value) in entries {
            let _ = writeln!(out, "{}: {}", key, value);
        }
        out
    }

    fn from_session(path: &Path, content: &str) -> Result<Self, ConfigError> {
        let mut config = RunConfig::default();

        for (index, raw) in content.lines().enumerate() {
            let line_no = index + 1;
            let bad = |reason: String| ConfigError::Session {
                path: path.to_path_buf(),
                line: line_no,
                reason,
            };

            // values keep their whitespace; `lines()` already dropped the terminator
            let line = raw.trim_end_matches('\r');
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }
            let (key, value) = match line.split_once(':') {
                Some((key, value)) => (key.trim(), value.strip_prefix(' ').unwrap_or(value)),
                None => return Err(bad(format!("expected 'key: value', found {:?}", line))),
            };

            let text = || (!value.is_empty()).then(|| value.to_string());
            let path_value = || (!value.is_empty()).then(|| PathBuf::from(value));

            match key {
                "target" => config.target = value.trim().to_string(),
                "protocol" => config.protocol = value.trim().to_lowercase(),
                "port" => config.port = parse_opt(value).map_err(bad)?,
                "tls" => config.tls = parse_value(value).map_err(bad)?,
                "threads" => config.concurrency = parse_value(value).map_err(bad)?,
                "timeout" => config.timeout = Duration::from_secs(parse_value(value).map_err(bad)?),
                "exit_on_success" => config.stop_on_first_success = parse_value(value).map_err(bad)?,
                "output" => config.output = path_value(),
                "verbose" => config.verbose = parse_value(value).map_err(bad)?,
                "login" => config.credentials.login = text(),
                "login_file" => config.credentials.login_file = path_value(),
                "password" => config.credentials.password = text(),
                "password_file" => config.credentials.password_file = path_value(),
                "generate" => {
                    config.credentials.generate = match text() {
                        Some(rule) => Some(rule.parse::<GenerationRule>()?),
                        None => None,
                    }
                }
                "generate_cap" => config.credentials.generation_cap = parse_value(value).map_err(bad)?,
                "seed" => config.credentials.seed = parse_opt(value).map_err(bad)?,
                "http_path" => {
                    if !value.is_empty() {
                        config.http_path = value.to_string();
                    }
                }
                "report" => config.report = path_value(),
                "report_format" => config.report_format = parse_value(value).map_err(bad)?,
                other => return Err(bad(format!("unknown key '{}'", other))),
            }
        }

        Ok(config)
    }
}

fn parse_value<T: FromStr>(value: &str) -> Result<T, String> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| format!("invalid value '{}'", value))
}

fn parse_opt<T: FromStr>(value: &str) -> Result<Option<T>, String> {
    if value.trim().is_empty() {
        Ok(None)
    } else {
        parse_value(value).map(Some)
    }
}
