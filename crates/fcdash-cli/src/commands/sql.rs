use std::process::ExitCode;

use fcdash_core::AppConfig;
use fcdash_warehouse::{QueryResult, Warehouse, WarehouseError};

use crate::cli::SqlArgs;
use crate::error::CliError;
use crate::output::print_json;

pub fn run(config: &AppConfig, args: &SqlArgs) -> Result<ExitCode, CliError> {
    let result = query(config, &args.query)?;
    print_json(&result, args.pretty)?;
    Ok(ExitCode::SUCCESS)
}

fn query(config: &AppConfig, sql: &str) -> Result<QueryResult, WarehouseError> {
    Warehouse::new(config.warehouse.clone()).execute_read_only(sql)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_are_refused() {
        let temp = tempfile::tempdir().expect("tempdir");
        let config = AppConfig::from_toml_str("", temp.path()).expect("config");

        let error = query(&config, "DROP TABLE analytics.ranking_info").expect_err("write");
        assert!(matches!(error, WarehouseError::QueryRejected(_)));
        assert_eq!(CliError::from(error).exit_code(), 3);
    }

    #[test]
    fn select_returns_columns_in_order() {
        let temp = tempfile::tempdir().expect("tempdir");
        let config = AppConfig::from_toml_str("", temp.path()).expect("config");

        let result = query(&config, "SELECT 1 AS a, 'x' AS b").expect("select");
        let names: Vec<_> = result.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(result.row_count, 1);
    }
}
