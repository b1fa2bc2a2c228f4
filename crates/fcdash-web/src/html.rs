//! Server-side HTML rendering of a [`PageView`].
//!
//! Every interaction is a plain form POST followed by a redirect, so the page
//! works without client-side scripts.

use std::fmt::Write as _;

use fcdash_core::view::{
    ImageCard, Metric, NoData, PageView, PlayerPicker, Section, SectionBody, Series, TableView,
};
use fcdash_core::{Position, Tier};

const STYLE: &str = "\
body{font-family:sans-serif;margin:0;display:flex}\
nav{width:220px;padding:16px;background:#f4f5f7;min-height:100vh}\
main{flex:1;padding:24px}\
nav form{margin:4px 0}\
nav button{width:100%}\
.updated{text-align:right;color:#666}\
.diagnostic{background:#fdecea;color:#611a15;padding:8px;margin:4px 0}\
.metrics{display:flex;gap:24px}\
.metric b{display:block;font-size:1.6em}\
.cards{display:flex;gap:16px}\
.cards figure{margin:0;text-align:center}\
.cards img{height:160px}\
.bar{background:#aec7e8;white-space:nowrap;padding:2px 4px;margin:2px 0}\
table{border-collapse:collapse}\
td,th{border:1px solid #ddd;padding:4px 8px}\
.picker{display:flex;gap:24px}\
.selected{font-weight:bold}\
.nodata{color:#888}";

/// Escape text for HTML element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

pub fn render_page(view: &PageView) -> String {
    let mut html = String::with_capacity(8 * 1024);
    let _ = write!(
        html,
        "<!DOCTYPE html><html lang=\"ko\"><head><meta charset=\"utf-8\">\
         <title>FC온라인 대시보드</title><style>{STYLE}</style></head><body>"
    );
    render_sidebar(&mut html, &view.page);

    html.push_str("<main>");
    let _ = write!(
        html,
        "<div class=\"updated\">최신 업데이트: {}</div><h1>{}</h1>",
        escape(&view.updated_at),
        escape(&view.title)
    );
    for diagnostic in &view.diagnostics {
        let _ = write!(
            html,
            "<div class=\"diagnostic\">{}</div>",
            escape(&diagnostic.message)
        );
    }

    for section in &view.sections {
        render_section(&mut html, section, &view.page);
    }

    if view.back_to_main {
        html.push_str(&action_button("/navigate", &[("page", "main")], "⬅ 메인 화면으로 돌아가기"));
    }
    html.push_str("</main></body></html>");
    html
}

fn render_sidebar(html: &mut String, page: &str) {
    html.push_str("<nav><h2>🔍 검색</h2>");
    html.push_str(
        "<form method=\"post\" action=\"/search\">\
         <input name=\"name\" placeholder=\"랭커 이름을 입력하세요\" required>\
         <button type=\"submit\">검색</button></form>",
    );

    html.push_str("<h2>공식 경기 등급</h2>");
    for tier in Tier::ALL {
        html.push_str(&action_button("/navigate", &[("page", tier.key())], tier.label()));
    }

    html.push_str("<h2>⚽ 선수 포지션</h2>");
    for position in Position::ALL {
        html.push_str(&action_button(
            "/navigate",
            &[("page", position.key())],
            position.label(),
        ));
    }

    html.push_str("<hr>");
    html.push_str(&action_button("/refresh", &[("page", page)], "🔄 데이터 새로고침"));
    html.push_str("</nav>");
}

fn action_button(action: &str, fields: &[(&str, &str)], label: &str) -> String {
    let mut form = format!("<form method=\"post\" action=\"{}\">", escape(action));
    for (name, value) in fields {
        let _ = write!(
            form,
            "<input type=\"hidden\" name=\"{}\" value=\"{}\">",
            escape(name),
            escape(value)
        );
    }
    let _ = write!(form, "<button type=\"submit\">{}</button></form>", escape(label));
    form
}

fn render_section(html: &mut String, section: &Section, page: &str) {
    let _ = write!(html, "<section><h2>{}</h2>", escape(&section.heading));
    match &section.body {
        SectionBody::Metrics(metrics) => render_metrics(html, metrics),
        SectionBody::Table(table) => render_table(html, table),
        SectionBody::Bar(series) => render_bar(html, series),
        SectionBody::Pie(series) => render_pie(html, series),
        SectionBody::Images(cards) => render_cards(html, cards),
        SectionBody::Players(picker) => render_picker(html, picker, page),
        SectionBody::NoData(NoData { message }) => {
            let _ = write!(html, "<p class=\"nodata\">{}</p>", escape(message));
        }
    }
    html.push_str("</section>");
}

fn render_metrics(html: &mut String, metrics: &[Metric]) {
    html.push_str("<div class=\"metrics\">");
    for metric in metrics {
        let _ = write!(
            html,
            "<div class=\"metric\">{}<b>{}</b></div>",
            escape(&metric.label),
            escape(&metric.value)
        );
    }
    html.push_str("</div>");
}

fn render_table(html: &mut String, table: &TableView) {
    html.push_str("<table><thead><tr>");
    for column in &table.columns {
        let _ = write!(html, "<th>{}</th>", escape(column));
    }
    html.push_str("</tr></thead><tbody>");
    for row in &table.rows {
        html.push_str("<tr>");
        for cell in row {
            let _ = write!(html, "<td>{}</td>", escape(cell));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
}

fn render_bar(html: &mut String, series: &Series) {
    let max = series
        .points
        .iter()
        .map(|point| point.value)
        .fold(0.0_f64, f64::max);

    let _ = write!(html, "<h3>{}</h3>", escape(&series.title));
    for point in &series.points {
        let width = if max > 0.0 { point.value / max * 100.0 } else { 0.0 };
        let text = if point.display.is_empty() {
            fcdash_core::format::format_decimal(point.value)
        } else {
            point.display.clone()
        };
        let _ = write!(
            html,
            "<div class=\"bar\" style=\"width:{width:.1}%\">{} · {}</div>",
            escape(&point.label),
            escape(&text)
        );
    }
}

fn render_pie(html: &mut String, series: &Series) {
    let total: f64 = series.points.iter().map(|point| point.value).sum();

    let _ = write!(html, "<h3>{}</h3><ul>", escape(&series.title));
    for point in &series.points {
        let share = if total > 0.0 { point.value / total * 100.0 } else { 0.0 };
        let _ = write!(
            html,
            "<li>{} {}</li>",
            escape(&point.label),
            escape(&fcdash_core::format::format_percent(share))
        );
    }
    html.push_str("</ul>");
}

fn render_cards(html: &mut String, cards: &[ImageCard]) {
    html.push_str("<div class=\"cards\">");
    for card in cards {
        let _ = write!(
            html,
            "<figure><img src=\"{}\" alt=\"{caption}\"><figcaption>{caption}</figcaption></figure>",
            escape(&card.url),
            caption = escape(&card.caption)
        );
    }
    html.push_str("</div>");
}

fn render_picker(html: &mut String, picker: &PlayerPicker, page: &str) {
    html.push_str("<div class=\"picker\"><div>");
    for player in &picker.players {
        let label = if player.selected {
            format!("▶ {}", player.name)
        } else {
            player.name.clone()
        };
        html.push_str(&action_button(
            "/select",
            &[("key", &player.key), ("page", page)],
            &label,
        ));
    }
    html.push_str("</div>");

    if let Some(detail) = &picker.detail {
        let _ = write!(html, "<div><h3>📌 {} 상세 정보</h3>", escape(&detail.name));
        if let Some(url) = &detail.season_image_url {
            let _ = write!(html, "<img src=\"{}\" alt=\"\">", escape(url));
        }
        if let Some(season) = &detail.season {
            let _ = write!(html, "<p><b>시즌:</b> {}</p>", escape(season));
        }
        if let Some(count) = detail.usage_count {
            let _ = write!(
                html,
                "<p><b>사용 횟수:</b> {}</p>",
                fcdash_core::format::format_thousands(count)
            );
        }
        let _ = write!(
            html,
            "<img src=\"{}\" alt=\"{}\">",
            escape(&detail.action_image.url),
            escape(&detail.action_image.caption)
        );
        match &detail.sentiment {
            Some(sentiment) => {
                let _ = write!(html, "<h4>{}</h4>", escape(sentiment));
            }
            None => {
                let _ = write!(
                    html,
                    "<p class=\"nodata\">{}</p>",
                    escape(&NoData::default().message)
                );
            }
        }
        html.push_str(&action_button("/reset", &[("page", page)], "⬅ 선수 선택 초기화"));
        html.push_str("</div>");
    }
    html.push_str("</div>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use fcdash_core::view::{PlayerButton, PlayerDetail, SeriesPoint};

    fn view(sections: Vec<Section>) -> PageView {
        PageView {
            page: String::from("fw"),
            title: String::from("<FW>"),
            updated_at: String::from("2025-03-02 08:30"),
            sections,
            back_to_main: true,
            diagnostics: Vec::new(),
        }
    }

    #[test]
    fn escapes_markup_and_quotes() {
        assert_eq!(
            escape(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn page_carries_title_sidebar_and_back_button() {
        let html = render_page(&view(vec![Section::no_data("평균 강화등급")]));

        assert!(html.contains("<h1>&lt;FW&gt;</h1>"));
        assert!(html.contains("슈퍼 챔피언스"));
        assert!(html.contains("action=\"/search\""));
        assert!(html.contains("메인 화면으로 돌아가기"));
        assert!(html.contains("class=\"nodata\""));
    }

    #[test]
    fn player_buttons_post_their_key_and_current_page() {
        let html = render_page(&view(vec![Section::new(
            "FW 포지션 인기 선수 Top10",
            SectionBody::Players(PlayerPicker {
                players: vec![PlayerButton {
                    key: String::from("265231747"),
                    name: String::from("음바페"),
                    selected: false,
                }],
                detail: None,
            }),
        )]));

        assert!(html.contains("action=\"/select\""));
        assert!(html.contains("name=\"key\" value=\"265231747\""));
        assert!(html.contains("name=\"page\" value=\"fw\""));
    }

    #[test]
    fn unknown_review_verdict_renders_as_no_data() {
        let picker = |sentiment: Option<String>| {
            render_page(&view(vec![Section::new(
                "FW 포지션 인기 선수 Top10",
                SectionBody::Players(PlayerPicker {
                    players: Vec::new(),
                    detail: Some(PlayerDetail {
                        key: String::from("265231747"),
                        name: String::from("음바페"),
                        season: None,
                        season_image_url: None,
                        action_image: ImageCard {
                            caption: String::from("음바페"),
                            url: String::from("https://img.example/p265231747.png"),
                        },
                        usage_count: None,
                        sentiment,
                    }),
                }),
            )]))
        };

        let unknown = picker(None);
        assert!(unknown.contains("class=\"nodata\">데이터가 없습니다."));
        assert!(!unknown.contains("<h4>"));

        let known = picker(Some(String::from("😃 이 선수는 감독들한테 평가가 좋아요!")));
        assert!(known.contains("<h4>😃 이 선수는 감독들한테 평가가 좋아요!</h4>"));
    }

    #[test]
    fn bars_scale_to_the_largest_value() {
        let html = render_page(&view(vec![Section::new(
            "인기 포메이션",
            SectionBody::Bar(Series {
                title: String::from("인기 포메이션"),
                category_label: String::from("포메이션"),
                value_label: String::from("사용 횟수"),
                points: vec![SeriesPoint::new("4-3-3", 40.0), SeriesPoint::new("4-4-2", 20.0)],
            }),
        )]));

        assert!(html.contains("width:100.0%\">4-3-3 · 40"));
        assert!(html.contains("width:50.0%\">4-4-2 · 20"));
    }
}
