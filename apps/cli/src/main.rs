//! `warden`: demo driver for the guarded stack.
//!
//! Pushes `0..count`, pops everything back printing one value per line on
//! stdout, dumps the stack to stderr and frees it. The first failing
//! operation prints `error <code>`, frees the stack and exits non-zero.

mod cli;

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use warden_stack::{GuardedStack, StackConfig, StackError};

use crate::cli::Cli;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let _log_guard = init_logging(&cli)?;

    let config = if cli.verbose {
        StackConfig::debug()
    } else {
        StackConfig::production()
    };

    let mut stack = match GuardedStack::with_config(cli.capacity, None, config) {
        Ok(stack) => stack,
        Err(err) => return report_failure(&err),
    };

    let status = run(&mut stack, &cli);
    let freed = stack.free();

    match status.and(freed) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => report_failure(&err),
    }
}

fn init_logging(cli: &Cli) -> Result<warden_log::LoggerGuard> {
    let mut config = warden_log::Config::from_env().with_format(cli.log_format);
    if cli.verbose {
        config = config.with_level("warden_stack=trace,info");
    } else if std::env::var_os("WARDEN_LOG").is_none() && std::env::var_os("RUST_LOG").is_none() {
        config = config.with_level("warn");
    }
    warden_log::init_with(config).context("failed to initialise logging")
}

fn run(stack: &mut GuardedStack, cli: &Cli) -> Result<(), StackError> {
    for value in 0..cli.count {
        stack.push(value)?;
    }

    #[cfg(feature = "tamper")]
    if let Some(target) = cli.tamper {
        damage(stack, target);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for _ in 0..cli.count {
        let value = stack.pop()?;
        // a closed stdout is not a stack failure
        let _ = writeln!(out, "{value}");
    }
    drop(out);

    stack.dump()
}

#[cfg(feature = "tamper")]
fn damage(stack: &mut GuardedStack, target: cli::TamperTarget) {
    use crate::cli::TamperTarget;

    tracing::warn!(?target, "tampering with stack memory");
    let mut tamper = stack.tamper();
    match target {
        TamperTarget::FrontGuard => tamper.front_struct_guard(0),
        TamperTarget::BackGuard => tamper.back_struct_guard(0),
        TamperTarget::DataGuard => tamper.back_data_guard(0),
        TamperTarget::Length => tamper.len(0),
    };
}

fn report_failure(err: &StackError) -> Result<ExitCode> {
    tracing::error!(code = err.code(), error = %err, "stack operation failed");
    println!("\nerror {}", err.code());
    Ok(ExitCode::FAILURE)
}
