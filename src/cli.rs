use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{RunConfig, DEFAULT_THREADS, DEFAULT_TIMEOUT_SECS};
use crate::credentials::{CredentialSpec, GenerationRule, DEFAULT_GENERATION_CAP};
use crate::error::ConfigError;
use crate::output::report::ReportFormat;

#[derive(Parser, Debug)]
#[command(
    name = "credspray-rs",
    version,
    about = "Tries login/password combinations against an HTTP, FTP or SSH service",
    after_help = "Example: credspray-rs -l admin -P passwords.txt 192.168.1.1 ftp"
)]
pub struct Args {
    /// Target host (IP address or domain name)
    #[arg(required_unless_present = "config")]
    pub target: Option<String>,

    /// Protocol: http, ftp or ssh
    #[arg(required_unless_present = "config")]
    pub protocol: Option<String>,

    /// Single login to try
    #[arg(short = 'l', long)]
    pub login: Option<String>,

    /// File with one login per line
    #[arg(short = 'L', long)]
    pub login_file: Option<PathBuf>,

    /// Single password to try
    #[arg(short = 'p', long)]
    pub password: Option<String>,

    /// File with one password per line
    #[arg(short = 'P', long)]
    pub password_file: Option<PathBuf>,

    /// Generate passwords, format min:max:alphabet (e.g. 1:3:abc123)
    #[arg(short = 'x', long)]
    pub generate: Option<String>,

    /// Maximum number of generated passwords
    #[arg(long, default_value_t = DEFAULT_GENERATION_CAP)]
    pub generate_cap: usize,

    /// Seed for the order of generated passwords
    #[arg(long)]
    pub seed: Option<u64>,

    /// Port to connect to (default depends on protocol)
    #[arg(short = 's', long)]
    pub port: Option<u16>,

    /// Use TLS (HTTPS for the http protocol)
    #[arg(short = 'S', long)]
    pub tls: bool,

    /// Number of parallel workers
    #[arg(short = 't', long, default_value_t = DEFAULT_THREADS)]
    pub threads: usize,

    /// Per-attempt timeout in seconds
    #[arg(short = 'w', long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Stop after the first valid pair is found
    #[arg(short = 'f', long)]
    pub exit_on_success: bool,

    /// Append found pairs to this file
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Login form path for the http protocol
    #[arg(long, default_value = "/login")]
    pub http_path: String,

    /// Write a summary report to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub report_format: ReportFormat,

    /// Log file (logs go to stdout otherwise)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Verbose output (shows every failed attempt)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Silent mode (no banner, errors only)
    #[arg(long)]
    pub silent: bool,

    /// Do not draw a progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Save the effective configuration to this file
    #[arg(long)]
    pub save_config: Option<PathBuf>,

    /// Load a saved configuration, ignoring the other options
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Builds the run configuration, either from a saved session or from flags.
    pub fn build_config(&self) -> Result<RunConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => RunConfig::load(path)?,
            None => self.flags_to_config()?,
        };
        config.progress = !(config.verbose || self.silent || self.no_progress);
        config.validate()?;
        Ok(config)
    }

    fn flags_to_config(&self) -> Result<RunConfig, ConfigError> {
        let generate = match &self.generate {
            Some(rule) => Some(rule.parse::<GenerationRule>()?),
            None => None,
        };

        Ok(RunConfig {
            target: self.target.clone().unwrap_or_default(),
            protocol: self.protocol.clone().unwrap_or_default().to_lowercase(),
            port: self.port,
            tls: self.tls,
            concurrency: self.threads,
            timeout: Duration::from_secs(self.timeout),
            stop_on_first_success: self.exit_on_success,
            output: self.output.clone(),
            verbose: self.verbose,
            credentials: CredentialSpec {
                login: self.login.clone(),
                login_file: self.login_file.clone(),
                password: self.password.clone(),
                password_file: self.password_file.clone(),
                generate,
                generation_cap: self.generate_cap,
                seed: self.seed,
            },
            http_path: self.http_path.clone(),
            report: self.report.clone(),
            report_format: self.report_format,
            progress: false,
        })
    }
}
