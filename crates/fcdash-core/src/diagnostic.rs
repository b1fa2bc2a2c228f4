//! User-facing failure reports collected during one render.

use std::fmt::{Display, Formatter};

use fcdash_warehouse::WarehouseError;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    ConnectionFailure,
    QueryFailure,
}

/// A failure shown next to the page instead of aborting it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn from_error(error: &WarehouseError) -> Self {
        if error.is_connection_failure() {
            Self {
                kind: DiagnosticKind::ConnectionFailure,
                message: format!("웨어하우스 연결 오류: {error}"),
            }
        } else {
            Self {
                kind: DiagnosticKind::QueryFailure,
                message: format!("쿼리 실행 오류: {error}"),
            }
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Diagnostics of one render, without duplicates.
///
/// A page may hit the same failed cache entry several times; the user sees
/// the message once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        if !self.0.contains(&diagnostic) {
            self.0.push(diagnostic);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_errors_are_reported_as_connection_failures() {
        let diagnostic =
            Diagnostic::from_error(&WarehouseError::Connection(String::from("timeout")));

        assert_eq!(diagnostic.kind, DiagnosticKind::ConnectionFailure);
        assert!(diagnostic.message.starts_with("웨어하우스 연결 오류"));
        assert!(diagnostic.message.contains("timeout"));
    }

    #[test]
    fn other_errors_are_query_failures() {
        let diagnostic =
            Diagnostic::from_error(&WarehouseError::QueryRejected(String::from("no writes")));

        assert_eq!(diagnostic.kind, DiagnosticKind::QueryFailure);
        assert!(diagnostic.message.starts_with("쿼리 실행 오류"));
    }

    #[test]
    fn duplicate_diagnostics_are_reported_once() {
        let error = WarehouseError::Connection(String::from("refused"));
        let mut diagnostics = Diagnostics::new();

        diagnostics.push(Diagnostic::from_error(&error));
        diagnostics.push(Diagnostic::from_error(&error));

        assert_eq!(diagnostics.len(), 1);
    }
}
