//! # fcdash Core
//!
//! Query caching, page routing, and page handlers for the FC Online ranking
//! dashboard.
//!
//! ## Overview
//!
//! This crate sits between the warehouse and the presentation layer:
//!
//! - **Dashboard context** owning the query executor, the result cache, and settings
//! - **Query cache** keyed by query template plus bound parameters
//! - **Router** mapping the `page` parameter to a page handler
//! - **Page handlers** turning cached results into a [`PageView`]
//! - **Formatting** helpers for Korean magnitude units, percentages, and top-N series
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`cache`] | Result memoization and invalidation |
//! | [`config`] | Secret file and dashboard settings |
//! | [`context`] | The shared dashboard context |
//! | [`diagnostic`] | User-facing failure reports |
//! | [`executor`] | Query executor trait |
//! | [`format`] | Presentation transforms |
//! | [`image`] | Player image existence probe |
//! | [`pages`] | Page handlers and their queries |
//! | [`router`] | Page ids, selection state, and user actions |
//! | [`view`] | Render model |
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  Web / CLI      │
//! └────────┬────────┘
//!          │ PageState
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │  pages::render  │────▶│ DashboardContext │
//! └────────┬────────┘     └────────┬─────────┘
//!          │                       │
//!          ▼                       ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │    PageView     │     │ QueryCache       │
//! └─────────────────┘     │   └▶ Warehouse   │
//!                         └──────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fcdash_core::{pages, AppConfig, DashboardContext, PageState};
//! use time::OffsetDateTime;
//!
//! let config = AppConfig::load_default()?;
//! let ctx = DashboardContext::from_config(&config);
//!
//! let view = pages::render(&ctx, &PageState::from_param(Some("champions")), OffsetDateTime::now_utc());
//! println!("{}", serde_json::to_string_pretty(&view)?);
//! ```
//!
//! ## Error Handling
//!
//! Rendering never fails. Warehouse errors are cached as absent entries and
//! surface as [`Diagnostic`]s on the [`PageView`]; the affected sections show
//! "no data". Only configuration loading returns an error ([`ConfigError`]).

pub mod cache;
pub mod config;
pub mod context;
pub mod diagnostic;
pub mod error;
pub mod executor;
pub mod format;
pub mod image;
pub mod pages;
pub mod router;
pub mod view;

pub use cache::{CacheEntry, CacheStats, QueryCache};
pub use config::{resolve_fcdash_home, AppConfig, DashboardConfig, CONFIG_FILE_NAME};
pub use context::DashboardContext;
pub use diagnostic::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::ConfigError;
pub use executor::QueryExecutor;
pub use format::{format_magnitude, MagnitudeStyle};
pub use image::{resolve_images, AssumeExists, HttpImageProbe, ImageProbe};
pub use router::{Action, PageId, PageState, Position, Selection, Tier};
pub use view::{PageView, Section, SectionBody};
