use crate::context::DashboardContext;
use crate::diagnostic::Diagnostics;
use crate::format::format_decimal;
use crate::pages::{cell, player, queries, Page};
use crate::router::{Position, Selection};
use crate::view::{Metric, Section, SectionBody, Series, SeriesPoint};

pub(crate) fn render(
    ctx: &DashboardContext,
    position: Position,
    selection: &Selection,
    diagnostics: &mut Diagnostics,
) -> Page {
    let label = position.label();
    let picker_heading = format!("{label} 포지션 인기 선수 Top10");

    let picker = match ctx.query_rows(&queries::position_top_players(position), diagnostics) {
        Some(players) => Section::new(
            picker_heading,
            SectionBody::Players(player::picker(ctx, &players, selection, diagnostics)),
        ),
        None => Section::no_data(picker_heading),
    };

    Page {
        title: format!("랭커들이 애용하는 {label} 포지션 선수 분석"),
        sections: vec![
            picker,
            position_share(ctx, position, diagnostics),
            average_grade(ctx, position, diagnostics),
        ],
        back_to_main: true,
    }
}

fn position_share(
    ctx: &DashboardContext,
    position: Position,
    diagnostics: &mut Diagnostics,
) -> Section {
    const HEADING: &str = "세부 포지션 비중";
    let Some(rows) = ctx.query_rows(&queries::position_share(position), diagnostics) else {
        return Section::no_data(HEADING);
    };

    Section::new(
        HEADING,
        SectionBody::Pie(Series {
            title: String::from("포지션 별 비중"),
            category_label: String::from("포지션"),
            value_label: String::from("횟수"),
            points: (0..rows.row_count)
                .map(|row| {
                    SeriesPoint::new(
                        cell(&rows, row, "name"),
                        rows.float(row, "num").unwrap_or(0.0),
                    )
                })
                .collect(),
        }),
    )
}

fn average_grade(
    ctx: &DashboardContext,
    position: Position,
    diagnostics: &mut Diagnostics,
) -> Section {
    const HEADING: &str = "평균 강화등급";
    // AVG over zero rows is a single NULL row.
    let grade = ctx
        .query_rows(&queries::position_average_grade(position), diagnostics)
        .and_then(|rows| rows.float(0, "avg_spgrade"));

    match grade {
        Some(grade) => Section::new(
            HEADING,
            SectionBody::Metrics(vec![Metric::new("강화등급", format_decimal(grade))]),
        ),
        None => Section::no_data(HEADING),
    }
}
