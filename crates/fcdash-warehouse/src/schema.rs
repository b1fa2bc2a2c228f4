//! Local `analytics` schema for development warehouses.
//!
//! The production warehouse owns its schema; these migrations only create the
//! same tables in a local `DuckDB` file so the dashboard can run offline.

use ::duckdb::{params, Connection};

struct Migration {
    version: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "0001_analytics_tables",
        sql: r#"
CREATE SCHEMA IF NOT EXISTS analytics;

CREATE TABLE IF NOT EXISTS analytics.division_info (
    division_id INTEGER PRIMARY KEY,
    division_name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS analytics.ranking_info (
    rank_no INTEGER NOT NULL,
    gamer_nickname TEXT NOT NULL,
    gamer_level INTEGER,
    division_id INTEGER NOT NULL,
    team_worth BIGINT,
    winning_rate DOUBLE,
    total_win INTEGER,
    total_draw INTEGER,
    total_lose INTEGER,
    formation TEXT,
    team_color TEXT
);

CREATE TABLE IF NOT EXISTS analytics.match_info (
    gamer_nickname TEXT NOT NULL,
    spid BIGINT NOT NULL,
    "position" INTEGER NOT NULL,
    spgrade INTEGER
);

CREATE TABLE IF NOT EXISTS analytics.player_info (
    spid BIGINT PRIMARY KEY,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS analytics.season_info (
    season_id BIGINT PRIMARY KEY,
    name TEXT NOT NULL,
    image_url TEXT
);

CREATE TABLE IF NOT EXISTS analytics.position_info (
    spposition INTEGER PRIMARY KEY,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS analytics.player_review_info (
    spid BIGINT NOT NULL,
    review TEXT,
    prediction INTEGER
);
"#,
    },
    Migration {
        version: "0002_indexes",
        sql: r#"
CREATE INDEX IF NOT EXISTS idx_ranking_info_division ON analytics.ranking_info(division_id);
CREATE INDEX IF NOT EXISTS idx_ranking_info_nickname ON analytics.ranking_info(gamer_nickname);
CREATE INDEX IF NOT EXISTS idx_match_info_spid ON analytics.match_info(spid);
CREATE INDEX IF NOT EXISTS idx_player_review_info_spid ON analytics.player_review_info(spid);
"#,
    },
];

/// Apply every pending migration.
///
/// # Errors
/// Returns an error if any migration statement fails.
pub fn apply_migrations(connection: &Connection) -> Result<(), ::duckdb::Error> {
    connection.execute_batch(
        r#"
CREATE TABLE IF NOT EXISTS schema_migrations (
    version TEXT PRIMARY KEY,
    applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
"#,
    )?;

    for migration in MIGRATIONS {
        let applied_count: i64 = connection.query_row(
            "SELECT COUNT(*) FROM schema_migrations WHERE version = ?",
            params![migration.version],
            |row| row.get(0),
        )?;

        if applied_count == 0 {
            connection.execute_batch(migration.sql)?;
            connection.execute(
                "INSERT INTO schema_migrations (version) VALUES (?)",
                params![migration.version],
            )?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let connection = Connection::open_in_memory().expect("connection");

        apply_migrations(&connection).expect("first apply");
        apply_migrations(&connection).expect("second apply");

        let applied: i64 = connection
            .query_row("SELECT COUNT(*) FROM schema_migrations", [], |row| row.get(0))
            .expect("count");
        assert_eq!(applied, MIGRATIONS.len() as i64);
    }

    #[test]
    fn creates_analytics_tables() {
        let connection = Connection::open_in_memory().expect("connection");
        apply_migrations(&connection).expect("apply");

        let tables: i64 = connection
            .query_row(
                "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = 'analytics'",
                [],
                |row| row.get(0),
            )
            .expect("count");
        assert_eq!(tables, 7);
    }
}
