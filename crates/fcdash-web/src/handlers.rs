//! Request handlers.
//!
//! Reads render the page named by `?page=`. Writes apply one [`Action`] and
//! redirect back to a page URL, so the browser history tracks navigation.

use axum::extract::{Form, Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use fcdash_core::{Action, PageView};

use crate::error::WebError;
use crate::{html, AppState};

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PageForm {
    #[serde(default)]
    pub page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SelectForm {
    pub key: String,
    #[serde(default)]
    pub page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    pub name: String,
}

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, WebError> {
    let view = state.render(query.page).await?;
    Ok(Html(html::render_page(&view)))
}

pub async fn page_json(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageView>, WebError> {
    Ok(Json(state.render(query.page).await?))
}

pub async fn navigate(
    State(state): State<AppState>,
    Form(form): Form<PageForm>,
) -> Result<Redirect, WebError> {
    let page = form.page.unwrap_or_default();
    state.apply(None, Action::Navigate { page }).await
}

pub async fn select(
    State(state): State<AppState>,
    Form(form): Form<SelectForm>,
) -> Result<Redirect, WebError> {
    debug!(key = %form.key, "player selection toggled");
    state.apply(form.page, Action::Toggle { key: form.key }).await
}

pub async fn reset(
    State(state): State<AppState>,
    Form(form): Form<PageForm>,
) -> Result<Redirect, WebError> {
    state.apply(form.page, Action::ResetSelection).await
}

pub async fn refresh(
    State(state): State<AppState>,
    Form(form): Form<PageForm>,
) -> Result<Redirect, WebError> {
    state.apply(form.page, Action::Refresh).await
}

pub async fn search(
    State(state): State<AppState>,
    Form(form): Form<SearchForm>,
) -> Result<Redirect, WebError> {
    state
        .apply(None, Action::SearchRanker { name: form.name })
        .await
}

pub async fn health(State(state): State<AppState>) -> Response {
    let cache = state.context.cache();
    let stats = cache.stats();
    Json(json!({
        "status": "ok",
        "cached_queries": cache.len(),
        "cache_hits": stats.hits,
        "cache_misses": stats.misses,
    }))
    .into_response()
}
