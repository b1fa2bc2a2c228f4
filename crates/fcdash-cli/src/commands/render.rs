use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use fcdash_core::{
    pages, resolve_images, Action, AppConfig, DashboardContext, HttpImageProbe, ImageProbe,
    PageState, PageView,
};
use time::OffsetDateTime;
use tracing::warn;

use crate::cli::RenderArgs;
use crate::error::CliError;
use crate::output::print_json;

pub async fn run(config: &AppConfig, args: &RenderArgs) -> Result<ExitCode, CliError> {
    let probe = HttpImageProbe::new(Duration::from_millis(config.dashboard.probe_timeout_ms));
    let view = render_page(config, args, &probe).await?;
    print_json(&view, args.pretty)?;

    if view.diagnostics.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        for diagnostic in &view.diagnostics {
            warn!(kind = ?diagnostic.kind, "{}", diagnostic.message);
        }
        Ok(ExitCode::from(3))
    }
}

async fn render_page(
    config: &AppConfig,
    args: &RenderArgs,
    probe: &dyn ImageProbe,
) -> Result<PageView, CliError> {
    let ctx = Arc::new(DashboardContext::from_config(config));
    let page = args.page.clone();
    let select = args.select.clone();

    // Warehouse calls block; keep them off the async workers.
    let worker = Arc::clone(&ctx);
    let mut view = tokio::task::spawn_blocking(move || {
        let mut state = PageState::from_param(page.as_deref());
        if let Some(key) = select {
            state = worker.apply(&state, Action::Toggle { key });
        }
        pages::render(&worker, &state, OffsetDateTime::now_utc())
    })
    .await?;

    resolve_images(&mut view, probe, &config.dashboard.placeholder_image_url).await;
    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fcdash_core::{AssumeExists, SectionBody};
    use fcdash_warehouse::Warehouse;

    fn seeded_config(temp: &tempfile::TempDir) -> AppConfig {
        let config = AppConfig::from_toml_str("[warehouse]\npath = \"fc.duckdb\"\n", temp.path())
            .expect("config");
        let warehouse = Warehouse::new(config.warehouse.clone());
        warehouse.init_schema().expect("schema");
        warehouse
            .execute_script(
                "INSERT INTO analytics.division_info VALUES (900, '챔피언스');
                 INSERT INTO analytics.ranking_info VALUES
                    (1, 'DNFS', 120, 900, 200000000, 80.0, 40, 5, 5, '4-3-3', '레알 마드리드');
                 INSERT INTO analytics.match_info VALUES ('DNFS', 265231747, 24, 8);
                 INSERT INTO analytics.player_info VALUES (265231747, '음바페');
                 INSERT INTO analytics.season_info VALUES (265, 'LIVE', NULL);
                 INSERT INTO analytics.position_info VALUES (24, 'ST');",
            )
            .expect("seed");
        config
    }

    #[tokio::test]
    async fn select_opens_the_detail_panel() {
        let temp = tempfile::tempdir().expect("tempdir");
        let config = seeded_config(&temp);
        let args = RenderArgs {
            page: Some(String::from("fw")),
            select: Some(String::from("265231747")),
            pretty: false,
        };

        let view = render_page(&config, &args, &AssumeExists)
            .await
            .expect("render");

        assert_eq!(view.page, "fw");
        let detail = view.sections.iter().find_map(|section| match &section.body {
            SectionBody::Players(picker) => picker.detail.as_ref(),
            _ => None,
        });
        assert_eq!(detail.map(|detail| detail.name.as_str()), Some("음바페"));
    }

    #[tokio::test]
    async fn unknown_page_renders_main() {
        let temp = tempfile::tempdir().expect("tempdir");
        let config = seeded_config(&temp);
        let args = RenderArgs {
            page: Some(String::from("does-not-exist")),
            select: None,
            pretty: true,
        };

        let view = render_page(&config, &args, &AssumeExists)
            .await
            .expect("render");

        assert_eq!(view.page, "main");
        assert!(view.diagnostics.is_empty());
    }
}
