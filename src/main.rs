//! pdpwriter - rewrite product-detail-page copy with an LLM.
//!
//! Main entry point for the pdpwriter CLI.

mod app;
mod cli;
mod cmd_page;
mod cmd_settings;
mod console;

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pdpwriter_config::ConfigLoader;

use crate::app::App;
use crate::cli::{Cli, Commands};
use crate::cmd_settings::SettingsArgs;

fn init_tracing(data_dir: &Path) -> anyhow::Result<()> {
    let log_dir = data_dir.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("pdpwriter")
        .filename_suffix("log")
        .max_log_files(30)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Flushes the file writer on exit.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        // Console layer on stderr; stdout carries command output
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_ansi(true),
        )
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let data_dir = cli
        .data_dir
        .as_deref()
        .map(ConfigLoader::expand_path)
        .unwrap_or_else(ConfigLoader::default_data_dir);
    init_tracing(&data_dir)?;

    let app = App::load(cli.defaults.as_deref(), &data_dir)?;
    let url = cli.url;

    match cli.command {
        Commands::Apply { file, output } => cmd_page::apply(&app, &file, url, output.as_deref()).await,
        Commands::Preview { file } => cmd_page::preview(&app, &file, url).await,
        Commands::Scrape { file } => cmd_page::scrape(&app, &file, url).await,
        Commands::Status => cmd_page::status(&app).await,
        Commands::Ping => cmd_page::ping(&app).await,
        Commands::Settings {
            api_key,
            model,
            mock,
            live,
            show,
        } => {
            let args = SettingsArgs {
                api_key,
                model,
                mock,
                live,
                show,
            };
            cmd_settings::handle(&app, args).await
        }
    }
}
