// src/brute/ftp.rs
use std::io::{self, BufRead, BufReader, Write};
use std::net::{Shutdown, TcpStream};

use log::debug;

use crate::brute::{Outcome, Probe, Target};
use crate::common::utils;
use crate::credentials::CredentialPair;
use crate::error::ProbeError;

/// FTP login over the plain control channel. The TLS flag is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct FtpProbe;

impl Probe for FtpProbe {
    fn name(&self) -> &'static str {
        "ftp"
    }

    fn default_port(&self, _tls: bool) -> u16 {
        21
    }

    fn attempt(&self, target: &Target, pair: &CredentialPair) -> Result<Outcome, ProbeError> {
        let stream = match utils::connect(&target.host, target.port, target.timeout) {
            Ok(stream) => stream,
            Err(e) => return Ok(Outcome::TransportError(e.to_string())),
        };

        let mut control = BufReader::new(stream);
        let outcome = match login(&mut control, pair) {
            Ok(outcome) => outcome,
            Err(e) => Outcome::TransportError(e.to_string()),
        };

        // 无论成功与否都关闭会话
        let _ = send(&mut control, "QUIT");
        let _ = control.get_ref().shutdown(Shutdown::Both);

        Ok(outcome)
    }
}

fn login(control: &mut BufReader<TcpStream>, pair: &CredentialPair) -> io::Result<Outcome> {
    let (code, text) = read_reply(control)?;
    if code != 220 {
        return Ok(Outcome::TransportError(format!("unexpected greeting: {} {}", code, text)));
    }

    send(control, &format!("USER {}", pair.login))?;
    let (code, text) = read_reply(control)?;
    match code {
        230 => return Ok(Outcome::Success),
        331 | 332 => {}
        _ => {
            debug!("FTP rejected user {}: {} {}", pair.login, code, text);
            return Ok(Outcome::Failure);
        }
    }

    send(control, &format!("PASS {}", pair.password))?;
    let (code, text) = read_reply(control)?;
    match code {
        230 | 202 => Ok(Outcome::Success),
        _ => {
            debug!("FTP rejected {}:{}: {} {}", pair.login, pair.password, code, text);
            Ok(Outcome::Failure)
        }
    }
}

fn send(control: &mut BufReader<TcpStream>, command: &str) -> io::Result<()> {
    let stream = control.get_mut();
    stream.write_all(command.as_bytes())?;
    stream.write_all(b"\r\n")?;
    stream.flush()
}

/// Reads one reply, following `123-` continuation lines up to the closing `123 `.
fn read_reply<R: BufRead>(reader: &mut R) -> io::Result<(u16, String)> {
    let first = read_line(reader)?;
    let code = parse_code(&first)?;

    if first.as_bytes().get(3) == Some(&b'-') {
        let terminator = format!("{} ", &first[..3]);
        loop {
            let line = read_line(reader)?;
            if line.starts_with(&terminator) {
                return Ok((code, line[4..].to_string()));
            }
        }
    }

    Ok((code, first.get(4..).unwrap_or("").to_string()))
}

fn read_line<R: BufRead>(reader: &mut R) -> io::Result<String> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "connection closed by server"));
    }
    Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
}

fn parse_code(line: &str) -> io::Result<u16> {
    line.get(..3)
        .and_then(|code| code.parse::<u16>().ok())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, format!("malformed reply: {:?}", line)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::net::TcpListener;
    use std::thread;
    use std::time::Duration;

    /// Serves one FTP session accepting only `admin` / `secret`.
    fn fake_ftp_server() -> (u16, thread::JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut writer = stream.try_clone().unwrap();
            let mut reader = BufReader::new(stream);
            let mut commands = Vec::new();
            let mut user = String::new();

            writer.write_all(b"220-Welcome\r\n220 Test FTP ready\r\n").unwrap();
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap_or(0) == 0 {
                    break;
                }
                let line = line.trim_end().to_string();
                commands.push(line.clone());
                let reply: &[u8] = if let Some(name) = line.strip_prefix("USER ") {
                    user = name.to_string();
                    b"331 Password required\r\n"
                } else if let Some(pass) = line.strip_prefix("PASS ") {
                    if user == "admin" && pass == "secret" {
                        b"230 Logged in\r\n"
                    } else {
                        b"530 Login incorrect\r\n"
                    }
                } else if line == "QUIT" {
                    writer.write_all(b"221 Bye\r\n").unwrap();
                    break;
                } else {
                    b"502 Not implemented\r\n"
                };
                writer.write_all(reply).unwrap();
            }
            commands
        });
        (port, handle)
    }

    fn target(port: u16) -> Target {
        Target {
            host: "127.0.0.1".to_string(),
            port,
            tls: false,
            timeout: Duration::from_secs(2),
        }
    }

    #[test]
    fn test_valid_login_succeeds_and_quits() {
        let (port, server) = fake_ftp_server();
        let outcome = FtpProbe.attempt(&target(port), &CredentialPair::new("admin", "secret")).unwrap();
        assert_eq!(outcome, Outcome::Success);
        assert_eq!(server.join().unwrap(), vec!["USER admin", "PASS secret", "QUIT"]);
    }

    #[test]
    fn test_wrong_password_fails() {
        let (port, server) = fake_ftp_server();
        let outcome = FtpProbe.attempt(&target(port), &CredentialPair::new("admin", "nope")).unwrap();
        assert_eq!(outcome, Outcome::Failure);
        assert_eq!(server.join().unwrap().last().map(String::as_str), Some("QUIT"));
    }

    #[test]
    fn test_closed_port_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        let outcome = FtpProbe.attempt(&target(port), &CredentialPair::new("a", "b")).unwrap();
        assert!(matches!(outcome, Outcome::TransportError(_)));
    }

    #[test]
    fn test_read_multiline_reply() {
        let mut input = Cursor::new("230-first\r\n second\r\n230 done\r\n");
        assert_eq!(read_reply(&mut input).unwrap(), (230, "done".to_string()));
    }

    #[test]
    fn test_malformed_reply_is_error() {
        let mut input = Cursor::new("hello\r\n");
        assert!(read_reply(&mut input).is_err());
    }
}
