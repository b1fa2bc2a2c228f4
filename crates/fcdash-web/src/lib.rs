//! # fcdash Web
//!
//! HTTP surface of the ranking dashboard.
//!
//! | Route | Method | Purpose |
//! |-------|--------|---------|
//! | `/` | GET | HTML page for `?page=` |
//! | `/api/page` | GET | The same page as JSON |
//! | `/navigate` | POST | Switch page |
//! | `/select` | POST | Toggle a player's detail panel |
//! | `/reset` | POST | Clear the player selection |
//! | `/refresh` | POST | Invalidate every cached result |
//! | `/search` | POST | Open a ranker's page |
//! | `/health` | GET | Liveness plus cache counters |
//!
//! Every POST redirects to `/?page=...`, so each interaction ends in exactly
//! one fresh render.

pub mod error;
pub mod handlers;
pub mod html;

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use axum::response::Redirect;
use axum::routing::{get, post};
use axum::Router;
use time::OffsetDateTime;
use tower_http::trace::TraceLayer;
use tracing::info;

use fcdash_core::{
    pages, resolve_images, Action, DashboardContext, ImageProbe, PageId, PageState, PageView,
    Selection,
};

pub use error::WebError;

/// Shared state of every handler.
///
/// The dashboard has a single session per process, so one [`Selection`] is
/// shared by all requests.
#[derive(Clone)]
pub struct AppState {
    context: Arc<DashboardContext>,
    session: Arc<Mutex<Selection>>,
    probe: Arc<dyn ImageProbe>,
}

impl AppState {
    pub fn new(context: Arc<DashboardContext>, probe: Arc<dyn ImageProbe>) -> Self {
        Self {
            context,
            session: Arc::new(Mutex::new(Selection::default())),
            probe,
        }
    }

    pub fn context(&self) -> &DashboardContext {
        &self.context
    }

    /// Render `page` with the current selection, then resolve its images.
    pub async fn render(&self, page: Option<String>) -> Result<PageView, WebError> {
        let context = Arc::clone(&self.context);
        let session = Arc::clone(&self.session);

        // Warehouse calls block; keep them off the async workers. Holding the
        // session lock serializes renders.
        let mut view = tokio::task::spawn_blocking(move || {
            let selection = session.lock().unwrap_or_else(PoisonError::into_inner);
            let state = PageState::new(PageId::resolve(page.as_deref()), selection.clone());
            pages::render(&context, &state, OffsetDateTime::now_utc())
        })
        .await?;

        resolve_images(
            &mut view,
            self.probe.as_ref(),
            &self.context.config().placeholder_image_url,
        )
        .await;
        Ok(view)
    }

    /// Apply `action` on `page` and redirect to the page of the next render.
    pub async fn apply(&self, page: Option<String>, action: Action) -> Result<Redirect, WebError> {
        let context = Arc::clone(&self.context);
        let session = Arc::clone(&self.session);

        let next = tokio::task::spawn_blocking(move || {
            let mut selection = session.lock().unwrap_or_else(PoisonError::into_inner);
            let state = PageState::new(PageId::resolve(page.as_deref()), selection.clone());
            let next = context.apply(&state, action);
            *selection = next.selection;
            next.page
        })
        .await?;

        Ok(Redirect::to(&page_url(&next)))
    }
}

/// `/?page=<param>` with the parameter percent-encoded.
pub fn page_url(page: &PageId) -> String {
    format!("/?page={}", urlencoding::encode(&page.as_param()))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/page", get(handlers::page_json))
        .route("/navigate", post(handlers::navigate))
        .route("/select", post(handlers::select))
        .route("/reset", post(handlers::reset))
        .route("/refresh", post(handlers::refresh))
        .route("/search", post(handlers::search))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(state: AppState, addr: SocketAddr) -> Result<(), WebError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("fcdash dashboard listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;
    Ok(())
}
