//! Player picker and detail panel shared by the main and position pages.

use fcdash_warehouse::QueryResult;

use crate::context::DashboardContext;
use crate::diagnostic::Diagnostics;
use crate::pages::queries;
use crate::router::Selection;
use crate::view::{ImageCard, PlayerButton, PlayerDetail, PlayerPicker};

/// Managers' review verdict on a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    NoReviews,
    Favorable,
    Unfavorable,
    Mixed,
}

impl Sentiment {
    pub fn from_counts(positive: i64, negative: i64, total: i64) -> Self {
        if total == 0 {
            Self::NoReviews
        } else if positive > negative {
            Self::Favorable
        } else if negative > positive {
            Self::Unfavorable
        } else {
            Self::Mixed
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            Self::NoReviews => "📢 이 선수의 후기는 없어요. 당신이 첫 번째 후기를 남겨주세요!",
            Self::Favorable => "😃 이 선수는 감독들한테 평가가 좋아요!",
            Self::Unfavorable => "😞 이 선수의 평가는 좋지는 않네요..",
            Self::Mixed => "🤔 이 선수는 당신이 쓰기 나름이에요!",
        }
    }
}

/// Build a picker from rows carrying `spid` and `name` columns.
///
/// The detail panel is only queried when the selected player is listed and
/// expanded.
pub(crate) fn picker(
    ctx: &DashboardContext,
    players: &QueryResult,
    selection: &Selection,
    diagnostics: &mut Diagnostics,
) -> PlayerPicker {
    let buttons: Vec<PlayerButton> = (0..players.row_count)
        .filter_map(|row| {
            let key = players.text(row, "spid")?;
            let name = players.text(row, "name").unwrap_or_else(|| key.clone());
            Some(PlayerButton {
                selected: selection.is_open(&key),
                key,
                name,
            })
        })
        .collect();

    let detail = buttons
        .iter()
        .find(|button| button.selected)
        .and_then(|button| detail(ctx, &button.key, diagnostics));

    PlayerPicker {
        players: buttons,
        detail,
    }
}

fn detail(
    ctx: &DashboardContext,
    key: &str,
    diagnostics: &mut Diagnostics,
) -> Option<PlayerDetail> {
    let spid: i64 = key.parse().ok()?;
    let profile = ctx.query_rows(&queries::player_profile(spid), diagnostics)?;

    // A failed review lookup leaves the verdict unknown, not "no reviews".
    let sentiment = ctx
        .query(&queries::review_summary(spid), diagnostics)
        .map(|reviews| {
            Sentiment::from_counts(
                reviews.int(0, "positive").unwrap_or(0),
                reviews.int(0, "negative").unwrap_or(0),
                reviews.int(0, "total").unwrap_or(0),
            )
        });

    let name = profile.text(0, "name").unwrap_or_else(|| key.to_string());
    Some(PlayerDetail {
        key: key.to_string(),
        action_image: ImageCard {
            caption: name.clone(),
            url: ctx.config().player_image_url(key),
        },
        name,
        season: profile.text(0, "season_name"),
        season_image_url: profile.text(0, "image_url"),
        usage_count: profile.int(0, "num"),
        sentiment: sentiment.map(|verdict| verdict.message().to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::context::tests::CountingExecutor;
    use fcdash_warehouse::{SqlQuery, WarehouseError};
    use serde_json::json;
    use std::sync::Arc;

    fn profile_or_failing_reviews(query: &SqlQuery) -> Result<QueryResult, WarehouseError> {
        let sql = query.sql();
        if sql.contains("player_review_info") {
            Err(WarehouseError::QueryRejected(String::from(
                "relation analytics.player_review_info does not exist",
            )))
        } else if sql.contains("FROM analytics.player_info p") {
            Ok(QueryResult::from_rows(
                &["spid", "name", "season_name", "image_url", "num"],
                vec![vec![
                    json!(265_231_747),
                    json!("음바페"),
                    json!("LIVE"),
                    json!(null),
                    json!(12),
                ]],
            ))
        } else {
            Ok(QueryResult::from_rows(&["unused"], Vec::new()))
        }
    }

    fn reviews_without_rows(query: &SqlQuery) -> Result<QueryResult, WarehouseError> {
        if query.sql().contains("player_review_info") {
            Ok(QueryResult::from_rows(
                &["total", "positive", "negative"],
                vec![vec![json!(0), json!(0), json!(0)]],
            ))
        } else {
            profile_or_failing_reviews(query)
        }
    }

    #[test]
    fn failed_review_lookup_is_not_reported_as_no_reviews() {
        let executor = Arc::new(CountingExecutor::new(profile_or_failing_reviews));
        let ctx = DashboardContext::new(executor.clone(), DashboardConfig::default());
        let mut diagnostics = Diagnostics::default();

        let detail = detail(&ctx, "265231747", &mut diagnostics).expect("profile rows");

        assert_eq!(detail.name, "음바페");
        assert_eq!(detail.sentiment, None);
        assert_ne!(
            detail.sentiment.as_deref(),
            Some(Sentiment::NoReviews.message())
        );
        assert!(!diagnostics.is_empty());
        assert_eq!(executor.calls_for(&queries::review_summary(265_231_747)), 1);
    }

    #[test]
    fn zero_reviews_show_the_first_review_prompt() {
        let executor = Arc::new(CountingExecutor::new(reviews_without_rows));
        let ctx = DashboardContext::new(executor, DashboardConfig::default());
        let mut diagnostics = Diagnostics::default();

        let detail = detail(&ctx, "265231747", &mut diagnostics).expect("profile rows");

        assert_eq!(
            detail.sentiment.as_deref(),
            Some(Sentiment::NoReviews.message())
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn sentiment_follows_review_balance() {
        assert_eq!(Sentiment::from_counts(0, 0, 0), Sentiment::NoReviews);
        assert_eq!(Sentiment::from_counts(3, 1, 4), Sentiment::Favorable);
        assert_eq!(Sentiment::from_counts(1, 3, 4), Sentiment::Unfavorable);
        assert_eq!(Sentiment::from_counts(2, 2, 4), Sentiment::Mixed);
        assert!(Sentiment::NoReviews.message().contains("첫 번째 후기"));
    }
}
