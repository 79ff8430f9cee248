// src/brute/ssh.rs
use log::debug;
use ssh2::{ErrorCode, Session};

use crate::brute::{Outcome, Probe, Target};
use crate::common::utils;
use crate::credentials::CredentialPair;
use crate::error::ProbeError;

// libssh2 错误码
const LIBSSH2_ERROR_SOCKET_SEND: i32 = -7;
const LIBSSH2_ERROR_TIMEOUT: i32 = -9;
const LIBSSH2_ERROR_SOCKET_DISCONNECT: i32 = -13;
const LIBSSH2_ERROR_PASSWORD_EXPIRED: i32 = -16;
const LIBSSH2_ERROR_AUTHENTICATION_FAILED: i32 = -18;
const LIBSSH2_ERROR_SOCKET_TIMEOUT: i32 = -30;
const LIBSSH2_ERROR_SOCKET_RECV: i32 = -43;

/// SSH password authentication. The TLS flag does not apply.
#[derive(Debug, Clone, Copy, Default)]
pub struct SshProbe;

impl Probe for SshProbe {
    fn name(&self) -> &'static str {
        "ssh"
    }

    fn default_port(&self, _tls: bool) -> u16 {
        22
    }

    fn attempt(&self, target: &Target, pair: &CredentialPair) -> Result<Outcome, ProbeError> {
        // 创建TCP连接
        let tcp = match utils::connect(&target.host, target.port, target.timeout) {
            Ok(tcp) => tcp,
            Err(e) => return Ok(Outcome::TransportError(e.to_string())),
        };

        let mut session = Session::new()?;
        session.set_timeout(u32::try_from(target.timeout.as_millis()).unwrap_or(u32::MAX));
        session.set_tcp_stream(tcp);

        if let Err(e) = session.handshake() {
            return Ok(Outcome::TransportError(format!("handshake failed: {}", e)));
        }

        let result = match session.userauth_password(&pair.login, &pair.password) {
            Ok(()) if session.authenticated() => Ok(Outcome::Success),
            Ok(()) => Ok(Outcome::Failure),
            Err(e) => classify(e),
        };

        let _ = session.disconnect(None, "bye", None);

        result
    }
}

fn classify(error: ssh2::Error) -> Result<Outcome, ProbeError> {
    match error.code() {
        ErrorCode::Session(LIBSSH2_ERROR_AUTHENTICATION_FAILED)
        | ErrorCode::Session(LIBSSH2_ERROR_PASSWORD_EXPIRED) => {
            debug!("SSH authentication rejected: {}", error);
            Ok(Outcome::Failure)
        }
        ErrorCode::Session(LIBSSH2_ERROR_SOCKET_SEND)
        | ErrorCode::Session(LIBSSH2_ERROR_TIMEOUT)
        | ErrorCode::Session(LIBSSH2_ERROR_SOCKET_DISCONNECT)
        | ErrorCode::Session(LIBSSH2_ERROR_SOCKET_TIMEOUT)
        | ErrorCode::Session(LIBSSH2_ERROR_SOCKET_RECV) => Ok(Outcome::TransportError(error.to_string())),
        _ => Err(ProbeError::Ssh(error)),
    }
}
