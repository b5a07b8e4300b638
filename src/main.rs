use anyhow::Context;
use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;

mod cli;
mod config;
mod error;
mod models;
mod services;

use cli::CommandArgs;
use services::{write_report, ProcessSnapshotProvider, ServiceChecker, SysinfoSnapshotProvider};

/// `--strict` 下存在未运行的服务
const EXIT_STOPPED: u8 = 1;
/// 探测失败或配置错误
const EXIT_FAILURE: u8 = 2;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = CommandArgs::parse();
    let env_services = std::env::var("SVCPROBE_SERVICES").ok();

    let mut stdout = io::stdout().lock();
    match run(
        &args,
        SysinfoSnapshotProvider::new(),
        env_services.as_deref(),
        &mut stdout,
    ) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            log::debug!("Full error chain:");
            for cause in e.chain() {
                log::debug!("  - {}", cause);
            }
            eprintln!("svcprobe: {:#}", e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

/// 解析服务列表、取一次快照并输出报告，返回退出码
///
/// 探测失败时不向 `out` 写任何内容。
fn run<P, W>(
    args: &CommandArgs,
    provider: P,
    env_services: Option<&str>,
    out: &mut W,
) -> anyhow::Result<u8>
where
    P: ProcessSnapshotProvider,
    W: Write,
{
    let (services, source) =
        config::resolve_services(&args.services, args.config.as_deref(), env_services)
            .context("failed to resolve service list")?;
    log::debug!("Checking {} service(s) from {}", services.len(), source);

    let checker = ServiceChecker::new(provider).with_match_mode(args.match_mode());
    let result = checker.check(services.as_slice())?;

    write_report(out, &result, args.format).context("failed to write report")?;

    if args.strict && !result.all_running() {
        log::info!("Some services are stopped, exiting with {}", EXIT_STOPPED);
        return Ok(EXIT_STOPPED);
    }

    Ok(0)
}
