use fcdash_warehouse::{QueryResult, SqlQuery, Warehouse, WarehouseError};

/// Runs one parameterized query against the warehouse.
///
/// The dashboard context only talks to the warehouse through this trait, so
/// tests can count or fail executions without a real database.
pub trait QueryExecutor: Send + Sync {
    fn execute(&self, query: &SqlQuery) -> Result<QueryResult, WarehouseError>;
}

impl QueryExecutor for Warehouse {
    fn execute(&self, query: &SqlQuery) -> Result<QueryResult, WarehouseError> {
        Warehouse::execute(self, query)
    }
}
