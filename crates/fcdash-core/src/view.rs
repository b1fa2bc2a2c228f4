//! Render model handed to the presentation layer.
//!
//! A [`PageView`] is plain data: every value is already formatted or is a
//! primitive number, so HTML and JSON renderers never look at warehouse rows.

use serde::Serialize;

use crate::diagnostic::Diagnostic;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    /// `page` parameter of the rendered page.
    pub page: String,
    pub title: String,
    /// "YYYY-MM-DD HH:MM" in the configured offset.
    pub updated_at: String,
    pub sections: Vec<Section>,
    /// Whether a back-to-main action is offered.
    pub back_to_main: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl PageView {
    pub fn section(&self, heading: &str) -> Option<&Section> {
        self.sections
            .iter()
            .find(|section| section.heading == heading)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub heading: String,
    #[serde(flatten)]
    pub body: SectionBody,
}

impl Section {
    pub fn new(heading: impl Into<String>, body: SectionBody) -> Self {
        Self {
            heading: heading.into(),
            body,
        }
    }

    pub fn no_data(heading: impl Into<String>) -> Self {
        Self::new(heading, SectionBody::NoData(NoData::default()))
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self.body, SectionBody::NoData(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum SectionBody {
    Metrics(Vec<Metric>),
    Table(TableView),
    Bar(Series),
    Pie(Series),
    Images(Vec<ImageCard>),
    Players(PlayerPicker),
    NoData(NoData),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoData {
    pub message: String,
}

impl Default for NoData {
    fn default() -> Self {
        Self {
            message: String::from("데이터가 없습니다."),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metric {
    pub label: String,
    pub value: String,
}

impl Metric {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Category/value pairs for a bar or pie chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub title: String,
    pub category_label: String,
    pub value_label: String,
    pub points: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
    /// Text drawn on the bar; empty when the raw value is shown.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub display: String,
}

impl SeriesPoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
            display: String::new(),
        }
    }

    #[must_use]
    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = display.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageCard {
    pub caption: String,
    /// Image URL to show; replaced with the placeholder when the probe fails.
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerPicker {
    pub players: Vec<PlayerButton>,
    /// Detail panel of the selected player, when open.
    pub detail: Option<PlayerDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerButton {
    /// Selection key (the player's `spid`).
    pub key: String,
    pub name: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerDetail {
    pub key: String,
    pub name: String,
    pub season: Option<String>,
    pub season_image_url: Option<String>,
    pub action_image: ImageCard,
    pub usage_count: Option<i64>,
    /// `None` when the review lookup failed.
    pub sentiment: Option<String>,
}
