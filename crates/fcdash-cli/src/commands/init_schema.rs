use std::fs;
use std::process::ExitCode;

use fcdash_core::AppConfig;
use fcdash_warehouse::{Warehouse, WarehouseTarget};
use tracing::info;

use crate::error::CliError;

pub fn run(config: &AppConfig) -> Result<ExitCode, CliError> {
    let target = config.warehouse.target();
    if let WarehouseTarget::Local(path) = &target {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
    }

    Warehouse::new(config.warehouse.clone()).init_schema()?;
    info!(warehouse = %target, "analytics schema ready");
    Ok(ExitCode::SUCCESS)
}
