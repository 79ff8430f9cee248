// src/output/report.rs
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::Result;
use chrono::Local;
use clap::ValueEnum;
use serde::Serialize;

use crate::brute::Target;
use crate::credentials::CredentialPair;
use crate::engine::{ResultSet, StopReason};
use crate::output::file;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Text => f.write_str("text"),
            ReportFormat::Json => f.write_str("json"),
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("unknown report format '{}'", other)),
        }
    }
}

#[derive(Serialize)]
struct Report<'a> {
    timestamp: String,
    target: &'a str,
    port: u16,
    protocol: &'a str,
    tls: bool,
    summary: Summary,
    credentials: &'a [CredentialPair],
}

#[derive(Serialize)]
struct Summary {
    queued: usize,
    attempted: usize,
    found: usize,
    stop_reason: StopReason,
}

/// Writes (overwriting) a summary of one run.
pub fn generate(
    output_path: &Path,
    format: ReportFormat,
    protocol: &str,
    target: &Target,
    results: &ResultSet,
) -> Result<()> {
    // 创建报告
    let report = Report {
        timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        target: &target.host,
        port: target.port,
        protocol,
        tls: target.tls,
        summary: Summary {
            queued: results.queued,
            attempted: results.attempted,
            found: results.found.len(),
            stop_reason: results.stop,
        },
        credentials: &results.found,
    };

    let content = match format {
        ReportFormat::Json => serde_json::to_string_pretty(&report)?,
        ReportFormat::Text => render_text(&report),
    };
    file::write_to_file(output_path, &content)?;

    Ok(())
}

fn render_text(report: &Report<'_>) -> String {
    let mut content = String::new();

    content.push_str("# CREDSPRAY-RS REPORT\n");
    content.push_str(&format!("Date: {}\n", report.timestamp));
    content.push_str(&format!(
        "Target: {}:{} ({}{})\n\n",
        report.target,
        report.port,
        report.protocol,
        if report.tls { ", tls" } else { "" }
    ));

    // 摘要
    content.push_str("## SUMMARY\n");
    content.push_str(&format!("Queued: {}\n", report.summary.queued));
    content.push_str(&format!("Attempted: {}\n", report.summary.attempted));
    content.push_str(&format!("Found: {}\n", report.summary.found));
    content.push_str(&format!("Stop: {}\n\n", report.summary.stop_reason));

    // 凭证
    content.push_str("## CREDENTIALS\n");
    if report.credentials.is_empty() {
        content.push_str("none\n");
    }
    for cred in report.credentials {
        content.push_str(&format!("- {}\n", cred));
    }

    content
}
