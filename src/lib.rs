// src/lib.rs
//! # credspray-rs
//!
//! `credspray-rs` tries every (login, password) combination against one
//! HTTP, FTP or SSH service and reports the combinations that authenticate.
//! Only use it against systems you are authorised to test.
//!
//! ## 用法
//!
//! ```text
//! # 单个用户名 + 密码字典
//! credspray-rs -l admin -P passwords.txt 192.168.1.1 ftp
//!
//! # 用户名字典 + 生成密码, 8 个线程, 找到后立即停止
//! credspray-rs -L users.txt -x 1:3:abc123 -t 8 -f 192.168.1.1 ssh
//!
//! # HTTPS 表单登录, 结果追加到文件
//! credspray-rs -l admin -P passwords.txt -S --http-path /auth -o found.txt example.org http
//! ```
//!
//! The pipeline is: [`credentials`] produces pairs, [`engine::Plan`] queues
//! them, [`engine::Dispatcher`] drains the queue through a [`brute::Probe`]
//! chosen from the [`brute::ProbeRegistry`], and successes land in the
//! [`engine::ResultCollector`].

pub mod brute;
pub mod cli;
pub mod common;
pub mod config;
pub mod credentials;
pub mod engine;
pub mod error;
pub mod output;

pub use brute::{Outcome, Probe, ProbeRegistry, Target};
pub use config::RunConfig;
pub use credentials::{CredentialPair, CredentialSpec, GenerationRule};
pub use engine::{Plan, ResultSet, RunStatus, StopReason};
pub use error::{ConfigError, ProbeError};
