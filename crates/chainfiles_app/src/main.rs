//! Command-line front end for the chainfiles reconciliation engine.
mod args;
mod render;
mod settings;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chainfiles_engine::{ClientSettings, HttpLedgerClient, Reconciler};
use clap::Parser;
use engine_logging::LogDestination;
use log::LevelFilter;

use crate::args::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let destination = match &cli.log_file {
        Some(path) => LogDestination::TerminalAndFile(path),
        None => LogDestination::Terminal,
    };
    engine_logging::initialize(destination, level);

    let defaults = settings::load_defaults(Path::new("."));
    let endpoint = cli.endpoint(&defaults)?;
    let options = cli.reconcile_options(&defaults);

    if cli.save_defaults {
        let updated = settings::AppDefaults {
            endpoint: endpoint.to_string(),
            page_size: options.fetch.page_size,
        };
        settings::save_defaults(Path::new("."), &updated)?;
    }

    let client = HttpLedgerClient::new(ClientSettings::new(endpoint))?;
    let reconciler = Reconciler::new(Arc::new(client));

    let runtime = tokio::runtime::Runtime::new().context("tokio runtime")?;
    let result = runtime.block_on(reconciler.reconcile(&cli.address, &options))?;

    render::print_result(&result, cli.json);
    Ok(())
}
