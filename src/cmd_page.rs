//! Page subcommand handlers: apply, preview, scrape, status and ping.

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use pdpwriter_core::{Badge, Controller, RecordingSink};
use pdpwriter_protocols::{PageRequest, RouterRequest, ScrapedRecord};

use crate::app::App;
use crate::console::ConsoleSink;

/// Run the apply flow and write the rewritten page.
pub(crate) async fn apply(
    app: &App,
    file: &Path,
    url: Option<String>,
    output: Option<&Path>,
) -> anyhow::Result<ExitCode> {
    let (page, tab) = app.open_tab(file, url).await?;
    let controller = Controller::new(Some(tab), app.background(), Arc::new(ConsoleSink));

    if controller.apply().await.is_err() {
        return Ok(ExitCode::FAILURE);
    }

    let html = page.html();
    match output {
        Some(path) => {
            tokio::fs::write(path, html)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "Wrote rewritten page");
        }
        None => print!("{}", html),
    }
    Ok(ExitCode::SUCCESS)
}

/// Run the preview flow; the result is rendered as the status line.
pub(crate) async fn preview(app: &App, file: &Path, url: Option<String>) -> anyhow::Result<ExitCode> {
    let (_page, tab) = app.open_tab(file, url).await?;
    let controller = Controller::new(Some(tab), app.background(), Arc::new(ConsoleSink));

    Ok(match controller.preview().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    })
}

/// Print the scraped record as JSON.
pub(crate) async fn scrape(app: &App, file: &Path, url: Option<String>) -> anyhow::Result<ExitCode> {
    let (_page, tab) = app.open_tab(file, url).await?;
    let record: ScrapedRecord = tab
        .send(PageRequest::Scrape)
        .await?
        .into_data("Scrape failed")
        .map_err(anyhow::Error::msg)?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(ExitCode::SUCCESS)
}

pub(crate) async fn status(app: &App) -> anyhow::Result<ExitCode> {
    let controller = Controller::new(None, app.background(), Arc::new(RecordingSink::new()));
    let badge = controller.refresh_badge().await;
    println!("{}\t{}", badge.label(), badge.tooltip());

    Ok(if badge == Badge::Unavailable {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

pub(crate) async fn ping(app: &App) -> anyhow::Result<ExitCode> {
    let reply: String = app
        .background()
        .send(RouterRequest::Ping)
        .await?
        .into_data("Ping failed")
        .map_err(anyhow::Error::msg)?;
    println!("{}", reply);
    Ok(ExitCode::SUCCESS)
}
