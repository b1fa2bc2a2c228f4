//! The process-wide dashboard context.

use std::sync::Arc;

use fcdash_warehouse::{QueryResult, SqlQuery, Warehouse};
use tracing::{info, warn};

use crate::cache::{CacheEntry, QueryCache};
use crate::config::{AppConfig, DashboardConfig};
use crate::diagnostic::{Diagnostic, Diagnostics};
use crate::executor::QueryExecutor;
use crate::router::{Action, PageId, PageState};

/// Executor, cache, and settings shared by every render.
///
/// Built once at process start and handed to the router and page handlers.
pub struct DashboardContext {
    executor: Arc<dyn QueryExecutor>,
    cache: QueryCache,
    config: DashboardConfig,
}

impl DashboardContext {
    pub fn new(executor: Arc<dyn QueryExecutor>, config: DashboardConfig) -> Self {
        Self {
            executor,
            cache: QueryCache::new(),
            config,
        }
    }

    /// Context backed by the configured warehouse. Nothing connects yet.
    pub fn from_config(config: &AppConfig) -> Self {
        info!(warehouse = %config.warehouse.target(), "dashboard context created");
        Self::new(
            Arc::new(Warehouse::new(config.warehouse.clone())),
            config.dashboard.clone(),
        )
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Cached query. Failures become `None` plus a diagnostic, never an error.
    pub fn query(
        &self,
        query: &SqlQuery,
        diagnostics: &mut Diagnostics,
    ) -> Option<Arc<QueryResult>> {
        let entry = self
            .cache
            .get_or_insert_with(query, || match self.executor.execute(query) {
                Ok(result) => CacheEntry::Ready(Arc::new(result)),
                Err(error) => {
                    warn!(%query, %error, "query failed; section will show no data");
                    CacheEntry::Absent {
                        diagnostic: Diagnostic::from_error(&error),
                    }
                }
            });

        match entry {
            CacheEntry::Ready(result) => Some(result),
            CacheEntry::Absent { diagnostic } => {
                diagnostics.push(diagnostic);
                None
            }
        }
    }

    /// Like [`query`](Self::query), but an empty result is also `None`.
    pub fn query_rows(
        &self,
        query: &SqlQuery,
        diagnostics: &mut Diagnostics,
    ) -> Option<Arc<QueryResult>> {
        self.query(query, diagnostics)
            .filter(|result| !result.is_empty())
    }

    /// Drop every cached result; the next lookups go to the warehouse.
    pub fn refresh(&self) {
        let entries = self.cache.len();
        self.cache.invalidate_all();
        info!(entries, "dashboard data refresh requested");
    }

    /// Apply a user action and return the state of the next render.
    pub fn apply(&self, state: &PageState, action: Action) -> PageState {
        match action {
            Action::Navigate { page } => state.navigate(PageId::resolve(Some(&page))),
            Action::SearchRanker { name } => state.navigate(PageId::ranker(&name)),
            Action::Toggle { key } => {
                let mut next = state.clone();
                next.selection.toggle(&key);
                next
            }
            Action::ResetSelection => {
                let mut next = state.clone();
                next.selection.reset();
                next
            }
            Action::Refresh => {
                self.refresh();
                state.clone()
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticKind;
    use fcdash_warehouse::WarehouseError;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Executor that counts calls and answers from a closure.
    pub(crate) struct CountingExecutor {
        calls: AtomicUsize,
        seen: Mutex<Vec<SqlQuery>>,
        answer: Box<dyn Fn(&SqlQuery) -> Result<QueryResult, WarehouseError> + Send + Sync>,
    }

    impl CountingExecutor {
        pub(crate) fn new(
            answer: impl Fn(&SqlQuery) -> Result<QueryResult, WarehouseError> + Send + Sync + 'static,
        ) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
                answer: Box::new(answer),
            }
        }

        pub(crate) fn failing_connection() -> Self {
            Self::new(|_| Err(WarehouseError::Connection(String::from("connection refused"))))
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub(crate) fn calls_for(&self, query: &SqlQuery) -> usize {
            self.seen
                .lock()
                .expect("seen")
                .iter()
                .filter(|seen| *seen == query)
                .count()
        }
    }

    impl QueryExecutor for CountingExecutor {
        fn execute(&self, query: &SqlQuery) -> Result<QueryResult, WarehouseError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().expect("seen").push(query.clone());
            (self.answer)(query)
        }
    }

    fn echo_params(query: &SqlQuery) -> Result<QueryResult, WarehouseError> {
        let row = query
            .params()
            .iter()
            .map(|param| json!(param.to_string()))
            .collect();
        Ok(QueryResult::from_rows(&["param"], vec![row]))
    }

    fn context(executor: &Arc<CountingExecutor>) -> DashboardContext {
        DashboardContext::new(executor.clone(), DashboardConfig::default())
    }

    #[test]
    fn repeated_query_executes_once() {
        let executor = Arc::new(CountingExecutor::new(echo_params));
        let ctx = context(&executor);
        let query = SqlQuery::new("SELECT ? AS param").bind(1_i64);
        let mut diagnostics = Diagnostics::new();

        let first = ctx.query(&query, &mut diagnostics).expect("first");
        let second = ctx.query(&query, &mut diagnostics).expect("second");

        assert_eq!(executor.calls(), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn refresh_reexecutes_next_lookup() {
        let executor = Arc::new(CountingExecutor::new(echo_params));
        let ctx = context(&executor);
        let query = SqlQuery::new("SELECT 1");
        let mut diagnostics = Diagnostics::new();

        ctx.query(&query, &mut diagnostics);
        ctx.refresh();
        ctx.query(&query, &mut diagnostics);

        assert_eq!(executor.calls_for(&query), 2);
    }

    #[test]
    fn distinct_parameters_are_independent_entries() {
        let executor = Arc::new(CountingExecutor::new(echo_params));
        let ctx = context(&executor);
        let template = "SELECT * FROM analytics.ranking_info WHERE gamer_nickname = ?";
        let alice = SqlQuery::new(template).bind("Alice");
        let bob = SqlQuery::new(template).bind("Bob");
        let mut diagnostics = Diagnostics::new();

        let alice_rows = ctx.query(&alice, &mut diagnostics).expect("alice");
        let bob_rows = ctx.query(&bob, &mut diagnostics).expect("bob");
        ctx.query(&alice, &mut diagnostics);

        assert_eq!(executor.calls_for(&alice), 1);
        assert_eq!(executor.calls_for(&bob), 1);
        assert_eq!(alice_rows.text(0, "param").as_deref(), Some("'Alice'"));
        assert_eq!(bob_rows.text(0, "param").as_deref(), Some("'Bob'"));
    }

    #[test]
    fn connection_failure_is_absent_with_diagnostic() {
        let executor = Arc::new(CountingExecutor::failing_connection());
        let ctx = context(&executor);
        let query = SqlQuery::new("SELECT 1");
        let mut diagnostics = Diagnostics::new();

        assert!(ctx.query(&query, &mut diagnostics).is_none());
        assert!(ctx.query(&query, &mut diagnostics).is_none());

        assert_eq!(executor.calls(), 1);
        assert_eq!(diagnostics.len(), 1);
        let diagnostic = diagnostics.iter().next().expect("diagnostic");
        assert_eq!(diagnostic.kind, DiagnosticKind::ConnectionFailure);
    }

    #[test]
    fn failed_entries_are_retried_after_refresh() {
        let executor = Arc::new(CountingExecutor::failing_connection());
        let ctx = context(&executor);
        let query = SqlQuery::new("SELECT 1");
        let mut diagnostics = Diagnostics::new();

        ctx.query(&query, &mut diagnostics);
        ctx.apply(&PageState::default(), Action::Refresh);
        ctx.query(&query, &mut diagnostics);

        assert_eq!(executor.calls(), 2);
    }

    #[test]
    fn query_rows_treats_empty_results_as_absent() {
        let executor = Arc::new(CountingExecutor::new(|_| {
            Ok(QueryResult::from_rows(&["a"], Vec::new()))
        }));
        let ctx = context(&executor);
        let mut diagnostics = Diagnostics::new();

        assert!(ctx
            .query(&SqlQuery::new("SELECT 1"), &mut diagnostics)
            .is_some());
        assert!(ctx
            .query_rows(&SqlQuery::new("SELECT 1"), &mut diagnostics)
            .is_none());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn actions_produce_next_state() {
        let executor = Arc::new(CountingExecutor::new(echo_params));
        let ctx = context(&executor);
        let state = PageState::default();

        let state = ctx.apply(
            &state,
            Action::Navigate {
                page: String::from("mf"),
            },
        );
        assert_eq!(state.page.as_param(), "mf");

        let state = ctx.apply(
            &state,
            Action::Toggle {
                key: String::from("7"),
            },
        );
        assert!(state.selection.is_open("7"));

        let state = ctx.apply(
            &state,
            Action::SearchRanker {
                name: String::from("DNFS"),
            },
        );
        assert_eq!(state.page, PageId::Ranker(String::from("DNFS")));
        assert!(state.selection.is_open("7"));

        let state = ctx.apply(&state, Action::ResetSelection);
        assert_eq!(state.selection.selected(), None);
    }
}
