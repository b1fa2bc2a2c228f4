use crate::context::DashboardContext;
use crate::diagnostic::Diagnostics;
use crate::format::{format_magnitude, format_percent, format_thousands, MagnitudeStyle};
use crate::pages::{cell, queries, Page};
use crate::view::{Metric, NoData, Section, SectionBody};

pub(crate) fn render(ctx: &DashboardContext, name: &str, diagnostics: &mut Diagnostics) -> Page {
    let heading = format!("{name}의 선수정보");

    let section = match ctx.query(&queries::ranker_lookup(name), diagnostics) {
        Some(rows) if !rows.is_empty() => {
            let count = |column: &str| {
                rows.int(0, column)
                    .map_or_else(|| String::from("-"), format_thousands)
            };
            Section::new(
                heading,
                SectionBody::Metrics(vec![
                    Metric::new("등급", cell(&rows, 0, "division_name")),
                    Metric::new("감독레벨", cell(&rows, 0, "gamer_level")),
                    Metric::new(
                        "구단가치",
                        rows.int(0, "team_worth").map_or_else(
                            || String::from("-"),
                            |worth| format_magnitude(worth, MagnitudeStyle::Full),
                        ),
                    ),
                    Metric::new(
                        "승률",
                        rows.float(0, "winning_rate")
                            .map_or_else(|| String::from("-"), format_percent),
                    ),
                    Metric::new("승리횟수", count("total_win")),
                    Metric::new("무승부횟수", count("total_draw")),
                    Metric::new("패배횟수", count("total_lose")),
                    Metric::new("사용포메이션", cell(&rows, 0, "formation")),
                ]),
            )
        }
        Some(_) => Section::new(
            heading,
            SectionBody::NoData(NoData {
                message: format!("랭커 '{name}'을(를) 찾을 수 없습니다."),
            }),
        ),
        None => Section::no_data(heading),
    };

    Page {
        title: format!("랭커 {name} 정보"),
        sections: vec![section],
        back_to_main: true,
    }
}
