//! Page handlers.
//!
//! [`render`] is the only entry point: it dispatches on the [`PageId`] and
//! builds a [`PageView`] from cached query results. Handlers never fail; a
//! section whose query is absent or empty renders as "no data".

mod main;
mod player;
mod position;
pub mod queries;
mod ranker;
mod tier;

use fcdash_warehouse::QueryResult;
use time::OffsetDateTime;
use tracing::debug;

use crate::context::DashboardContext;
use crate::diagnostic::Diagnostics;
use crate::router::{PageId, PageState};
use crate::view::{PageView, Section};

pub use player::Sentiment;

/// What a handler produces before the shared header is attached.
pub(crate) struct Page {
    pub(crate) title: String,
    pub(crate) sections: Vec<Section>,
    pub(crate) back_to_main: bool,
}

/// Render the page named by `state`.
pub fn render(ctx: &DashboardContext, state: &PageState, rendered_at: OffsetDateTime) -> PageView {
    let mut diagnostics = Diagnostics::new();

    let page = match &state.page {
        PageId::Main => main::render(ctx, &state.selection, &mut diagnostics),
        PageId::Tier(tier) => tier::render(ctx, *tier, &mut diagnostics),
        PageId::Position(position) => {
            position::render(ctx, *position, &state.selection, &mut diagnostics)
        }
        PageId::Ranker(name) => ranker::render(ctx, name, &mut diagnostics),
    };

    debug!(
        page = %state.page,
        sections = page.sections.len(),
        diagnostics = diagnostics.len(),
        "page rendered"
    );

    PageView {
        page: state.page.as_param(),
        title: page.title,
        updated_at: format_timestamp(rendered_at.to_offset(ctx.config().utc_offset())),
        sections: page.sections,
        back_to_main: page.back_to_main,
        diagnostics: diagnostics.into_vec(),
    }
}

/// `YYYY-MM-DD HH:MM`.
pub fn format_timestamp(at: OffsetDateTime) -> String {
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}",
        at.year(),
        u8::from(at.month()),
        at.day(),
        at.hour(),
        at.minute()
    )
}

/// Text of a cell, `-` for NULL.
pub(crate) fn cell(rows: &QueryResult, row: usize, column: &str) -> String {
    rows.text(row, column).unwrap_or_else(|| String::from("-"))
}
