use crate::context::DashboardContext;
use crate::diagnostic::Diagnostics;
use crate::format::{format_magnitude, format_win_record, top_n_with_rest, MagnitudeStyle};
use crate::pages::{cell, queries, Page};
use crate::router::Tier;
use crate::view::{Section, SectionBody, Series, SeriesPoint, TableView};

const TEAM_COLOR_SLICES: usize = 5;
const REST_LABEL: &str = "기타";

pub(crate) fn render(ctx: &DashboardContext, tier: Tier, diagnostics: &mut Diagnostics) -> Page {
    Page {
        title: format!("{} 랭커 분석", tier.label()),
        sections: vec![
            rankers(ctx, tier, diagnostics),
            popular_players(ctx, tier, diagnostics),
            formations(ctx, tier, diagnostics),
            team_colors(ctx, tier, diagnostics),
        ],
        back_to_main: true,
    }
}

fn rankers(ctx: &DashboardContext, tier: Tier, diagnostics: &mut Diagnostics) -> Section {
    const HEADING: &str = "랭커 정보";
    let query = queries::tier_rankers(tier, ctx.config().ranker_limit);
    let Some(rows) = ctx.query_rows(&query, diagnostics) else {
        return Section::no_data(HEADING);
    };

    let table = TableView {
        columns: ["순위", "이름", "팀 가치", "승률(승|무|패)", "팀 컬러", "포메이션"]
            .map(String::from)
            .to_vec(),
        rows: (0..rows.row_count)
            .map(|row| {
                vec![
                    cell(&rows, row, "rank_no"),
                    cell(&rows, row, "gamer_nickname"),
                    rows.int(row, "team_worth").map_or_else(
                        || String::from("-"),
                        |worth| format_magnitude(worth, MagnitudeStyle::Full),
                    ),
                    format_win_record(
                        rows.float(row, "winning_rate").unwrap_or(0.0),
                        rows.int(row, "total_win").unwrap_or(0),
                        rows.int(row, "total_draw").unwrap_or(0),
                        rows.int(row, "total_lose").unwrap_or(0),
                    ),
                    cell(&rows, row, "team_color"),
                    cell(&rows, row, "formation"),
                ]
            })
            .collect(),
    };
    Section::new(HEADING, SectionBody::Table(table))
}

fn popular_players(ctx: &DashboardContext, tier: Tier, diagnostics: &mut Diagnostics) -> Section {
    const HEADING: &str = "인기 선수";
    let Some(rows) = ctx.query_rows(&queries::tier_popular_players(tier), diagnostics) else {
        return Section::no_data(HEADING);
    };

    let table = TableView {
        columns: ["순위", "시즌", "선수명"].map(String::from).to_vec(),
        rows: (0..rows.row_count)
            .map(|row| {
                vec![
                    (row + 1).to_string(),
                    cell(&rows, row, "season_name"),
                    cell(&rows, row, "name"),
                ]
            })
            .collect(),
    };
    Section::new(HEADING, SectionBody::Table(table))
}

fn formations(ctx: &DashboardContext, tier: Tier, diagnostics: &mut Diagnostics) -> Section {
    const HEADING: &str = "인기 포메이션";
    let Some(rows) = ctx.query_rows(&queries::tier_formations(tier), diagnostics) else {
        return Section::no_data(HEADING);
    };

    Section::new(
        HEADING,
        SectionBody::Bar(Series {
            title: String::from(HEADING),
            category_label: String::from("포메이션"),
            value_label: String::from("사용 횟수"),
            points: counted_points(&rows, "formation"),
        }),
    )
}

fn team_colors(ctx: &DashboardContext, tier: Tier, diagnostics: &mut Diagnostics) -> Section {
    const HEADING: &str = "인기 팀 컬러";
    let Some(rows) = ctx.query_rows(&queries::tier_team_colors(tier), diagnostics) else {
        return Section::no_data(HEADING);
    };

    Section::new(
        HEADING,
        SectionBody::Pie(Series {
            title: String::from(HEADING),
            category_label: String::from("팀 컬러"),
            value_label: String::from("사용 비중"),
            points: top_n_with_rest(
                counted_points(&rows, "team_color"),
                TEAM_COLOR_SLICES,
                REST_LABEL,
            ),
        }),
    )
}

fn counted_points(rows: &fcdash_warehouse::QueryResult, label_column: &str) -> Vec<SeriesPoint> {
    (0..rows.row_count)
        .map(|row| {
            SeriesPoint::new(
                cell(rows, row, label_column),
                rows.float(row, "num").unwrap_or(0.0),
            )
        })
        .collect()
}
