// src/main.rs
use std::process;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use log::{error, info, warn};

use credspray_rs::cli::Args;
use credspray_rs::common::interrupt::Interrupt;
use credspray_rs::common::{banner, logger, utils};
use credspray_rs::engine::{Plan, RunStatus, StopReason};
use credspray_rs::output::report;
use credspray_rs::{ProbeRegistry, RunConfig};

fn main() {
    let args = Args::parse();

    // 先解析配置, 以便会话文件中的 verbose 也能生效
    let config = args.build_config();
    let verbose = config.as_ref().map(|c| c.verbose).unwrap_or(args.verbose);

    if let Err(e) = logger::init(verbose, args.silent, args.log_file.as_deref()) {
        eprintln!("[-] {:#}", e);
        process::exit(1);
    }
    if !args.silent {
        banner::show();
    }

    let result = config.map_err(anyhow::Error::from).and_then(|config| run(&args, config));
    if let Err(e) = result {
        error!("{:#}", e);
        eprintln!("{} {:#}", "[-]".red(), e);
        process::exit(1);
    }
}

fn run(args: &Args, config: RunConfig) -> Result<()> {
    if let Some(path) = &args.save_config {
        config.save(path)?;
        info!("Configuration saved to {}", path.display());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .max_blocking_threads(config.concurrency + 1)
        .build()
        .context("failed to start the async runtime")?;

    // Ctrl-C 处理需在加载字典和预检之前安装
    let interrupt = {
        let _guard = runtime.enter();
        Interrupt::ctrl_c().unwrap_or_else(|e| {
            error!("Cannot listen for Ctrl-C: {}", e);
            Interrupt::channel().1
        })
    };

    let registry = ProbeRegistry::builtin(&config);
    let plan = Plan::build(&config, &registry)?;
    let target = plan.target().clone();
    let protocol = plan.protocol();

    info!(
        "Starting brute force against {}:{} over {} with {} threads",
        target.host, target.port, protocol, config.concurrency
    );

    let start_time = Instant::now();
    let results = runtime.block_on(async {
        let reachable = tokio::select! {
            open = utils::check_port_open(&target.host, target.port, target.timeout) => Some(open),
            _ = interrupt.clone().raised() => None,
        };
        match reachable {
            Some(true) => {}
            Some(false) => warn!(
                "{}:{} is not reachable right now; attempts will be counted as failures",
                target.host, target.port
            ),
            None => return plan.abandon(),
        }
        plan.execute_interruptible(interrupt).await
    });

    if results.stop == StopReason::Interrupted {
        warn!("Interrupted by user");
        println!("\n{}", "[!] Interrupted by user".yellow());
    }

    // 输出结果
    match results.status() {
        RunStatus::Found(count) => {
            info!("Found {} valid login/password pair(s)", count);
            println!("\n[+] Found {} valid pair(s):", count);
            for pair in &results.found {
                println!("  [+] {}", pair.to_string().green());
            }
        }
        RunStatus::NoneFound => {
            info!("No passwords found");
            println!("\n[-] No passwords found ({} attempts)", results.attempted);
        }
        RunStatus::NothingTried => {
            warn!("No credential pairs were tried");
            println!("\n[-] No credential pairs were tried");
        }
    }

    if let Some(path) = &config.report {
        report::generate(path, config.report_format, protocol, &target, &results)
            .with_context(|| format!("failed to write report {}", path.display()))?;
        info!("Report written to {}", path.display());
    }

    println!(
        "[*] Done in {:.2}s: {} of {} pairs attempted, {}",
        start_time.elapsed().as_secs_f64(),
        results.attempted,
        results.queued,
        results.stop
    );

    Ok(())
}
