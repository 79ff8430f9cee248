use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::net::{Ipv6Addr, TcpStream as StdTcpStream, ToSocketAddrs};
use std::path::Path;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;

/// 从文件中读取行 (trimmed, blank lines dropped)
pub fn read_lines_from_file(file_path: impl AsRef<Path>) -> io::Result<Vec<String>> {
    let file = File::open(file_path)?;
    let reader = BufReader::new(file);
    let mut lines = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() {
            lines.push(line.to_string());
        }
    }

    Ok(lines)
}

/// `host:port`, with IPv6 literals in brackets.
pub fn host_port(host: &str, port: u16) -> String {
    if host.parse::<Ipv6Addr>().is_ok() {
        format!("[{}]:{}", host, port)
    } else {
        format!("{}:{}", host, port)
    }
}

/// 异步检查TCP端口是否开放
pub async fn check_port_open(host: &str, port: u16, timeout_duration: Duration) -> bool {
    let addr = host_port(host, port);

    matches!(timeout(timeout_duration, TcpStream::connect(&addr)).await, Ok(Ok(_)))
}

/// Blocking connect that tries every resolved address within `timeout_duration`.
///
/// Read and write timeouts on the returned stream are set to the same value.
pub fn connect(host: &str, port: u16, timeout_duration: Duration) -> io::Result<StdTcpStream> {
    let mut last_err = None;

    for addr in (host, port).to_socket_addrs()? {
        match StdTcpStream::connect_timeout(&addr, timeout_duration) {
            Ok(stream) => {
                stream.set_read_timeout(Some(timeout_duration))?;
                stream.set_write_timeout(Some(timeout_duration))?;
                return Ok(stream);
            }
            Err(e) => last_err = Some(e),
        }
    }

    Err(last_err.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, format!("{} did not resolve to any address", host))
    }))
}

/// 创建进度条
pub fn create_progress_bar(total: u64, message: &str) -> indicatif::ProgressBar {
    let pb = indicatif::ProgressBar::new(total);
    if let Ok(style) = indicatif::ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("=>-"));
    }
    pb.set_message(message.to_string());
    pb
}
