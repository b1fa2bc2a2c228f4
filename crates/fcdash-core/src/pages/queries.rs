//! Query templates issued by the page handlers.
//!
//! Every user-supplied or page-derived value is a bound parameter. Row
//! limits are internal integers and are part of the template text.

use fcdash_warehouse::SqlQuery;

use crate::router::{Position, Tier};

/// Match rows tagged with their position category.
const CATEGORIZED_MATCHES: &str = r#"WITH categorized AS (
    SELECT *,
        CASE
            WHEN "position" BETWEEN 1 AND 8 THEN 'df'
            WHEN "position" BETWEEN 20 AND 27 THEN 'fw'
            WHEN "position" = 0 THEN 'gk'
            WHEN "position" = 28 THEN 'sub'
            ELSE 'mf'
        END AS position_cat
    FROM analytics.match_info
)"#;

/// The first three digits of a player id are the season id.
const SEASON_OF_SPID: &str = "CAST(LEFT(CAST({spid} AS VARCHAR), 3) AS BIGINT)";

/// Match position of substitutes; excluded from usage counts.
const SUBSTITUTE_POSITION: i64 = 28;

fn season_of(spid_column: &str) -> String {
    SEASON_OF_SPID.replace("{spid}", spid_column)
}

pub fn overview() -> SqlQuery {
    SqlQuery::new(
        "SELECT COUNT(*) AS total_rankers, AVG(winning_rate) AS avg_winning_rate \
         FROM analytics.ranking_info",
    )
}

pub fn best_formation() -> SqlQuery {
    SqlQuery::new(
        "SELECT formation, AVG(winning_rate) AS avg_winning_rate, COUNT(*) AS users \
         FROM analytics.ranking_info \
         WHERE formation IS NOT NULL \
         GROUP BY formation \
         ORDER BY avg_winning_rate DESC, users DESC, formation \
         LIMIT 1",
    )
}

pub fn popular_players(limit: u32) -> SqlQuery {
    SqlQuery::new(format!(
        "SELECT m.spid, p.name, COUNT(*) AS num \
         FROM analytics.match_info m \
         JOIN analytics.player_info p ON m.spid = p.spid \
         WHERE m.\"position\" <> ? \
         GROUP BY m.spid, p.name \
         ORDER BY num DESC, m.spid \
         LIMIT {limit}"
    ))
    .bind(SUBSTITUTE_POSITION)
}

pub fn tier_team_worth() -> SqlQuery {
    SqlQuery::new(
        "SELECT division_id, AVG(team_worth) AS avg_team_worth \
         FROM analytics.ranking_info \
         GROUP BY division_id \
         ORDER BY division_id",
    )
}

pub fn tier_enhancement() -> SqlQuery {
    SqlQuery::new(
        "SELECT r.division_id, AVG(m.spgrade) AS avg_spgrade \
         FROM analytics.ranking_info r \
         JOIN analytics.match_info m ON r.gamer_nickname = m.gamer_nickname \
         GROUP BY r.division_id \
         ORDER BY r.division_id",
    )
}

pub fn player_profile(spid: i64) -> SqlQuery {
    SqlQuery::new(format!(
        "SELECT p.spid, p.name, s.name AS season_name, s.image_url, \
                (SELECT COUNT(*) FROM analytics.match_info m WHERE m.spid = p.spid) AS num \
         FROM analytics.player_info p \
         LEFT JOIN analytics.season_info s ON s.season_id = {season} \
         WHERE p.spid = ?",
        season = season_of("p.spid"),
    ))
    .bind(spid)
}

pub fn review_summary(spid: i64) -> SqlQuery {
    SqlQuery::new(
        "SELECT COUNT(*) AS total, \
                COALESCE(SUM(CASE WHEN prediction = 1 THEN 1 ELSE 0 END), 0) AS positive, \
                COALESCE(SUM(CASE WHEN prediction = 0 THEN 1 ELSE 0 END), 0) AS negative \
         FROM analytics.player_review_info \
         WHERE spid = ?",
    )
    .bind(spid)
}

pub fn tier_rankers(tier: Tier, limit: u32) -> SqlQuery {
    SqlQuery::new(format!(
        "SELECT rank_no, gamer_nickname, team_worth, winning_rate, \
                total_win, total_draw, total_lose, team_color, formation \
         FROM analytics.ranking_info \
         WHERE division_id = ? \
         ORDER BY rank_no \
         LIMIT {limit}"
    ))
    .bind(tier.division_id())
}

pub fn tier_popular_players(tier: Tier) -> SqlQuery {
    SqlQuery::new(format!(
        "SELECT m.spid, p.name, s.name AS season_name, COUNT(*) AS num \
         FROM analytics.ranking_info r \
         JOIN analytics.match_info m ON r.gamer_nickname = m.gamer_nickname \
         JOIN analytics.player_info p ON m.spid = p.spid \
         LEFT JOIN analytics.season_info s ON s.season_id = {season} \
         WHERE r.division_id = ? AND m.\"position\" <> ? \
         GROUP BY m.spid, p.name, s.name \
         ORDER BY num DESC, m.spid \
         LIMIT 5",
        season = season_of("m.spid"),
    ))
    .bind(tier.division_id())
    .bind(SUBSTITUTE_POSITION)
}

pub fn tier_formations(tier: Tier) -> SqlQuery {
    SqlQuery::new(
        "SELECT formation, COUNT(*) AS num \
         FROM analytics.ranking_info \
         WHERE division_id = ? AND formation IS NOT NULL \
         GROUP BY formation \
         ORDER BY num DESC, formation \
         LIMIT 8",
    )
    .bind(tier.division_id())
}

pub fn tier_team_colors(tier: Tier) -> SqlQuery {
    SqlQuery::new(
        "SELECT team_color, COUNT(*) AS num \
         FROM analytics.ranking_info \
         WHERE division_id = ? AND team_color IS NOT NULL \
         GROUP BY team_color \
         ORDER BY num DESC, team_color",
    )
    .bind(tier.division_id())
}

pub fn position_top_players(position: Position) -> SqlQuery {
    SqlQuery::new(format!(
        "{CATEGORIZED_MATCHES}
         SELECT c.spid, p.name, s.name AS season_name, s.image_url, COUNT(*) AS num \
         FROM categorized c \
         JOIN analytics.player_info p ON c.spid = p.spid \
         LEFT JOIN analytics.season_info s ON s.season_id = {season} \
         WHERE c.position_cat = ? \
         GROUP BY c.spid, p.name, s.name, s.image_url \
         ORDER BY num DESC, c.spid \
         LIMIT 10",
        season = season_of("c.spid"),
    ))
    .bind(position.key())
}

pub fn position_share(position: Position) -> SqlQuery {
    SqlQuery::new(format!(
        "{CATEGORIZED_MATCHES}
         SELECT i.name, COUNT(*) AS num \
         FROM categorized c \
         JOIN analytics.position_info i ON c.\"position\" = i.spposition \
         WHERE c.position_cat = ? \
         GROUP BY i.name \
         ORDER BY num DESC, i.name"
    ))
    .bind(position.key())
}

pub fn position_average_grade(position: Position) -> SqlQuery {
    SqlQuery::new(format!(
        "{CATEGORIZED_MATCHES}
         SELECT AVG(spgrade) AS avg_spgrade \
         FROM categorized \
         WHERE position_cat = ?"
    ))
    .bind(position.key())
}

pub fn ranker_lookup(name: &str) -> SqlQuery {
    SqlQuery::new(
        "SELECT r.gamer_nickname, r.gamer_level, d.division_name, r.team_worth, \
                r.winning_rate, r.total_win, r.total_draw, r.total_lose, r.formation \
         FROM analytics.ranking_info r \
         LEFT JOIN analytics.division_info d ON r.division_id = d.division_id \
         WHERE r.gamer_nickname = ? \
         ORDER BY r.rank_no \
         LIMIT 1",
    )
    .bind(name)
}
