// src/brute/http.rs
use log::debug;
use reqwest::blocking::Client;
use reqwest::StatusCode;

use crate::brute::{Outcome, Probe, Target};
use crate::common::utils;
use crate::credentials::CredentialPair;
use crate::error::ProbeError;

pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// Form login: POSTs `username` and `password`, HTTP 200 means accepted.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    login_path: String,
}

impl Default for HttpProbe {
    fn default() -> Self {
        HttpProbe::new(DEFAULT_LOGIN_PATH)
    }
}

impl HttpProbe {
    pub fn new(login_path: impl Into<String>) -> Self {
        let mut login_path = login_path.into();
        if !login_path.starts_with('/') {
            login_path.insert(0, '/');
        }
        HttpProbe { login_path }
    }

    pub fn url(&self, target: &Target) -> String {
        let scheme = if target.tls { "https" } else { "http" };
        format!("{}://{}{}", scheme, utils::host_port(&target.host, target.port), self.login_path)
    }
}

impl Probe for HttpProbe {
    fn name(&self) -> &'static str {
        "http"
    }

    fn default_port(&self, tls: bool) -> u16 {
        if tls {
            443
        } else {
            80
        }
    }

    fn attempt(&self, target: &Target, pair: &CredentialPair) -> Result<Outcome, ProbeError> {
        // 每次尝试使用新的客户端, 不复用连接
        let client = Client::builder()
            .timeout(target.timeout)
            .connect_timeout(target.timeout)
            .danger_accept_invalid_certs(true) // 忽略SSL证书错误
            .pool_max_idle_per_host(0)
            .build()?;

        let url = self.url(target);
        let response = client
            .post(&url)
            .form(&[("username", pair.login.as_str()), ("password", pair.password.as_str())])
            .send();

        match response {
            Ok(response) if response.status() == StatusCode::OK => Ok(Outcome::Success),
            Ok(response) => {
                debug!("HTTP {} for {}:{} at {}", response.status(), pair.login, pair.password, url);
                Ok(Outcome::Failure)
            }
            Err(e) if e.is_builder() => Err(ProbeError::Http(e)),
            Err(e) => Ok(Outcome::TransportError(e.to_string())),
        }
    }
}
