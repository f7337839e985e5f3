#![allow(clippy::print_stdout, clippy::print_stderr)]

mod app;
mod args;
mod handlers;

use crate::args::{Cli, Command};
use anyhow::{Context, Result};
use clap::Parser;
use rosetta_domain::config::{AppConfig, LogConfig};
use rosetta_kernel::config::load_config;
use rosetta_logger::{LevelFilter, Logger};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config: AppConfig = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    let _logger = init_logger(&config.log)?;

    if let Command::Metrics { source, code } = &cli.command {
        handlers::metrics(source, code.as_deref());
        return Ok(());
    }

    let mut translator = app::bootstrap(&config, cli.strategy.as_deref(), cli.database.as_deref())?;
    match cli.command {
        Command::Warmup => handlers::warmup(&mut translator)?,
        Command::ClearCache => handlers::clear_cache(&mut translator)?,
        Command::RebuildCache => handlers::rebuild_cache(&mut translator)?,
        Command::Trans { id, locale, domain, params, count } => handlers::trans(
            &mut translator,
            &id,
            locale.as_deref(),
            domain.as_deref(),
            params,
            count,
        ),
        Command::Dump { locale, domains } => {
            handlers::dump(&mut translator, locale.as_deref(), &domains)?;
        },
        Command::Metrics { .. } => {},
    }
    Ok(())
}

fn init_logger(log: &LogConfig) -> Result<Logger> {
    let level: LevelFilter =
        log.level.parse().with_context(|| format!("Invalid log level '{}'", log.level))?;

    let mut builder = Logger::builder().name("rosetta").level(level).stderr(true);
    if let Some(filter) = &log.filter {
        builder = builder.env_filter(filter.clone());
    }
    if let Some(dir) = &log.dir {
        builder = builder.file(dir);
        if log.json {
            builder = builder.json();
        }
    }
    Ok(builder.init()?)
}
