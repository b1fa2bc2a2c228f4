use crate::context::DashboardContext;
use crate::diagnostic::Diagnostics;
use crate::format::{
    format_decimal, format_magnitude, format_percent, format_thousands, MagnitudeStyle,
};
use crate::pages::{player, queries, Page};
use crate::router::{Selection, Tier};
use crate::view::{ImageCard, Metric, Section, SectionBody, Series, SeriesPoint};

const PICKER_SIZE: u32 = 5;
const IMAGE_CARDS: usize = 3;

pub(crate) fn render(
    ctx: &DashboardContext,
    selection: &Selection,
    diagnostics: &mut Diagnostics,
) -> Page {
    let mut sections = vec![overview(ctx, diagnostics)];

    let popular = ctx.query_rows(&queries::popular_players(PICKER_SIZE), diagnostics);
    sections.push(match &popular {
        Some(players) => Section::new(
            "인기 선수 TOP 3",
            SectionBody::Images(
                (0..players.row_count.min(IMAGE_CARDS))
                    .filter_map(|row| {
                        let spid = players.text(row, "spid")?;
                        Some(ImageCard {
                            caption: players.text(row, "name").unwrap_or_else(|| spid.clone()),
                            url: ctx.config().player_image_url(&spid),
                        })
                    })
                    .collect(),
            ),
        ),
        None => Section::no_data("인기 선수 TOP 3"),
    });

    sections.push(tier_team_worth(ctx, diagnostics));
    sections.push(tier_enhancement(ctx, diagnostics));

    match &popular {
        Some(players) => {
            sections.push(Section::new(
                "⚽ 인기 선수 TOP 5",
                SectionBody::Players(player::picker(ctx, players, selection, diagnostics)),
            ));
            sections.push(Section::new(
                "인기 선수 비교",
                SectionBody::Bar(Series {
                    title: String::from("랭커의 선수별 사용횟수"),
                    category_label: String::from("선수"),
                    value_label: String::from("횟수"),
                    points: (0..players.row_count)
                        .map(|row| {
                            SeriesPoint::new(
                                players.text(row, "name").unwrap_or_default(),
                                players.float(row, "num").unwrap_or(0.0),
                            )
                        })
                        .collect(),
                }),
            ));
        }
        None => {
            sections.push(Section::no_data("⚽ 인기 선수 TOP 5"));
            sections.push(Section::no_data("인기 선수 비교"));
        }
    }

    Page {
        title: String::from("FC온라인 대시보드 🚀"),
        sections,
        back_to_main: false,
    }
}

fn overview(ctx: &DashboardContext, diagnostics: &mut Diagnostics) -> Section {
    let Some(totals) = ctx.query_rows(&queries::overview(), diagnostics) else {
        return Section::no_data("Overview");
    };
    let best = ctx.query_rows(&queries::best_formation(), diagnostics);

    let total_rankers = totals.int(0, "total_rankers").unwrap_or(0);
    if total_rankers == 0 {
        return Section::no_data("Overview");
    }

    Section::new(
        "Overview",
        SectionBody::Metrics(vec![
            Metric::new("전체 랭커 수", format_thousands(total_rankers)),
            Metric::new(
                "전체 평균 승률",
                totals
                    .float(0, "avg_winning_rate")
                    .map_or_else(|| String::from("-"), format_percent),
            ),
            Metric::new(
                "최고 승률 포메이션",
                best.and_then(|best| best.text(0, "formation"))
                    .unwrap_or_else(|| String::from("-")),
            ),
        ]),
    )
}

/// Division rows renamed to tier labels; unknown divisions are skipped.
fn tier_points(
    rows: &fcdash_warehouse::QueryResult,
    value_column: &str,
    display: impl Fn(f64) -> String,
) -> Vec<SeriesPoint> {
    (0..rows.row_count)
        .filter_map(|row| {
            let tier = Tier::from_division_id(rows.int(row, "division_id")?)?;
            let value = rows.float(row, value_column)?;
            Some(SeriesPoint::new(tier.label(), value).with_display(display(value)))
        })
        .collect()
}

fn tier_team_worth(ctx: &DashboardContext, diagnostics: &mut Diagnostics) -> Section {
    const HEADING: &str = "등급별 구단 가치";
    let Some(rows) = ctx.query_rows(&queries::tier_team_worth(), diagnostics) else {
        return Section::no_data(HEADING);
    };

    let points = tier_points(&rows, "avg_team_worth", |value| {
        format_magnitude(value.round() as i64, MagnitudeStyle::Compact)
    });
    if points.is_empty() {
        return Section::no_data(HEADING);
    }

    Section::new(
        HEADING,
        SectionBody::Bar(Series {
            title: String::from(HEADING),
            category_label: String::from("등급"),
            value_label: String::from("평균 팀 가치"),
            points,
        }),
    )
}

fn tier_enhancement(ctx: &DashboardContext, diagnostics: &mut Diagnostics) -> Section {
    const HEADING: &str = "등급별 강화 레벨 수준";
    let Some(rows) = ctx.query_rows(&queries::tier_enhancement(), diagnostics) else {
        return Section::no_data(HEADING);
    };

    let points = tier_points(&rows, "avg_spgrade", format_decimal);
    if points.is_empty() {
        return Section::no_data(HEADING);
    }

    Section::new(
        HEADING,
        SectionBody::Bar(Series {
            title: String::from(HEADING),
            category_label: String::from("등급"),
            value_label: String::from("평균 강화 레벨"),
            points,
        }),
    )
}
