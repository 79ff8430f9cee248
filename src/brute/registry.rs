use std::collections::BTreeMap;
use std::sync::Arc;

use crate::brute::ftp::FtpProbe;
use crate::brute::http::HttpProbe;
use crate::brute::ssh::SshProbe;
use crate::brute::Probe;
use crate::config::RunConfig;
use crate::error::ConfigError;

/// Maps lower-case protocol identifiers to probes.
#[derive(Default, Clone)]
pub struct ProbeRegistry {
    probes: BTreeMap<String, Arc<dyn Probe>>,
}

impl ProbeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the `http`, `ftp` and `ssh` probes.
    pub fn builtin(config: &RunConfig) -> Self {
        let mut registry = Self::new();
        registry.register("http", HttpProbe::new(config.http_path.clone()));
        registry.register("ftp", FtpProbe);
        registry.register("ssh", SshProbe);
        registry
    }

    pub fn register<P: Probe + 'static>(&mut self, name: &str, probe: P) {
        self.probes.insert(name.to_lowercase(), Arc::new(probe));
    }

    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Probe>, ConfigError> {
        self.probes
            .get(&name.to_lowercase())
            .cloned()
            .ok_or_else(|| ConfigError::UnsupportedProtocol {
                name: name.to_string(),
                supported: self.protocols().join(", "),
            })
    }

    /// Registered identifiers, sorted.
    pub fn protocols(&self) -> Vec<&str> {
        self.probes.keys().map(String::as_str).collect()
    }
}
