use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use fcdash_core::{AppConfig, DashboardContext, HttpImageProbe};
use fcdash_web::AppState;

use crate::cli::ServeArgs;
use crate::error::CliError;

pub async fn run(config: &AppConfig, args: &ServeArgs) -> Result<ExitCode, CliError> {
    let context = Arc::new(DashboardContext::from_config(config));
    let probe = HttpImageProbe::new(Duration::from_millis(config.dashboard.probe_timeout_ms));

    fcdash_web::serve(AppState::new(context, Arc::new(probe)), args.bind).await?;
    Ok(ExitCode::SUCCESS)
}
