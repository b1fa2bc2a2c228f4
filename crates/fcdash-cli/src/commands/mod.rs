mod init_schema;
mod render;
mod serve;
mod sql;

use std::process::ExitCode;

use fcdash_core::AppConfig;
use tracing::debug;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<ExitCode, CliError> {
    let config = load_config(cli)?;
    debug!(warehouse = %config.warehouse.target(), "configuration loaded");

    match &cli.command {
        Command::Serve(args) => serve::run(&config, args).await,
        Command::Render(args) => render::run(&config, args).await,
        // Warehouse calls block; keep them off the async workers.
        Command::Sql(args) => {
            let args = args.clone();
            tokio::task::spawn_blocking(move || sql::run(&config, &args)).await?
        }
        Command::InitSchema => tokio::task::spawn_blocking(move || init_schema::run(&config)).await?,
    }
}

fn load_config(cli: &Cli) -> Result<AppConfig, CliError> {
    let config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::load_default()?,
    };
    Ok(config)
}
