//! Page identifiers, navigation state, and user actions.
//!
//! The `page` URL parameter is parsed into a [`PageId`] on every render. The
//! grammar is:
//!
//! ```text
//! main | super_champions | champions | superchallengers | challengers
//!      | worldclass | fw | mf | df | gk | ranker_<name>
//! ```
//!
//! Anything else resolves to [`PageId::Main`].

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

const RANKER_PREFIX: &str = "ranker_";

/// Official-match tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    SuperChampions,
    Champions,
    SuperChallengers,
    Challengers,
    WorldClass,
}

impl Tier {
    pub const ALL: [Self; 5] = [
        Self::SuperChampions,
        Self::Champions,
        Self::SuperChallengers,
        Self::Challengers,
        Self::WorldClass,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Self::SuperChampions => "super_champions",
            Self::Champions => "champions",
            Self::SuperChallengers => "superchallengers",
            Self::Challengers => "challengers",
            Self::WorldClass => "worldclass",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::SuperChampions => "슈퍼 챔피언스",
            Self::Champions => "챔피언스",
            Self::SuperChallengers => "슈퍼챌린저",
            Self::Challengers => "챌린저",
            Self::WorldClass => "월드클래스",
        }
    }

    /// Division id used by `analytics.ranking_info`.
    pub const fn division_id(self) -> i64 {
        match self {
            Self::SuperChampions => 800,
            Self::Champions => 900,
            Self::SuperChallengers => 1000,
            Self::Challengers => 1100,
            Self::WorldClass => 2000,
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tier| tier.key() == key)
    }

    pub fn from_division_id(division_id: i64) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|tier| tier.division_id() == division_id)
    }
}

/// Position category derived from the numeric match position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Fw,
    Mf,
    Df,
    Gk,
}

impl Position {
    pub const ALL: [Self; 4] = [Self::Fw, Self::Mf, Self::Df, Self::Gk];

    pub const fn key(self) -> &'static str {
        match self {
            Self::Fw => "fw",
            Self::Mf => "mf",
            Self::Df => "df",
            Self::Gk => "gk",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Fw => "FW",
            Self::Mf => "MF",
            Self::Df => "DF",
            Self::Gk => "GK",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|position| position.key() == key)
    }
}

/// Which page handler runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum PageId {
    #[default]
    Main,
    Tier(Tier),
    Position(Position),
    Ranker(String),
}

impl PageId {
    /// Parse the `page` parameter; absent or unrecognized values are `Main`.
    pub fn resolve(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Main;
        };

        if let Some(tier) = Tier::from_key(raw) {
            return Self::Tier(tier);
        }
        if let Some(position) = Position::from_key(raw) {
            return Self::Position(position);
        }
        match raw.strip_prefix(RANKER_PREFIX) {
            Some(name) if !name.is_empty() => Self::Ranker(name.to_string()),
            _ => Self::Main,
        }
    }

    /// Page for a ranker search box submission.
    pub fn ranker(name: &str) -> Self {
        Self::resolve(Some(&format!("{RANKER_PREFIX}{}", name.trim())))
    }

    /// The `page` parameter value for this page.
    pub fn as_param(&self) -> String {
        match self {
            Self::Main => String::from("main"),
            Self::Tier(tier) => tier.key().to_string(),
            Self::Position(position) => position.key().to_string(),
            Self::Ranker(name) => format!("{RANKER_PREFIX}{name}"),
        }
    }
}

impl Display for PageId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_param())
    }
}

/// Which entity detail panels are open.
///
/// `expanded` remembers a flag per entity key; only the currently
/// `selected` entity can show its panel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    expanded: BTreeMap<String, bool>,
    selected: Option<String>,
}

impl Selection {
    /// Select `key` and flip its expanded flag.
    pub fn toggle(&mut self, key: &str) {
        self.selected = Some(key.to_string());
        let flag = self.expanded.entry(key.to_string()).or_insert(false);
        *flag = !*flag;
    }

    pub fn is_expanded(&self, key: &str) -> bool {
        self.expanded.get(key).copied().unwrap_or(false)
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Whether the detail panel of `key` is shown.
    pub fn is_open(&self, key: &str) -> bool {
        self.selected() == Some(key) && self.is_expanded(key)
    }

    /// Clear the selected slot and every flag.
    pub fn reset(&mut self) {
        self.expanded.clear();
        self.selected = None;
    }
}

/// Input of one render: the page plus the session's selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageState {
    pub page: PageId,
    pub selection: Selection,
}

impl PageState {
    pub fn new(page: PageId, selection: Selection) -> Self {
        Self { page, selection }
    }

    /// State for a fresh request carrying `page=<raw>`.
    pub fn from_param(raw: Option<&str>) -> Self {
        Self::new(PageId::resolve(raw), Selection::default())
    }

    /// A new state showing `page`; the selection is carried over.
    #[must_use]
    pub fn navigate(&self, page: PageId) -> Self {
        Self::new(page, self.selection.clone())
    }
}

/// A user interaction that leads to one fresh render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Navigate { page: String },
    SearchRanker { name: String },
    Toggle { key: String },
    ResetSelection,
    Refresh,
}
