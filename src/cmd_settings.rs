//! Settings subcommand: the command-line counterpart of an options page.

use std::process::ExitCode;

use pdpwriter_config::{ConfigResolver, SettingsStore, StoredSettings};

use crate::app::App;

pub(crate) struct SettingsArgs {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub mock: bool,
    pub live: bool,
    pub show: bool,
}

impl SettingsArgs {
    /// Settings to persist, or `None` when no value was given.
    fn update(&self) -> Option<StoredSettings> {
        let use_mock = match (self.mock, self.live) {
            (true, _) => Some(true),
            (false, true) => Some(false),
            (false, false) => None,
        };
        let update =
            StoredSettings::from_form(self.api_key.as_deref(), self.model.as_deref(), use_mock);
        (!update.is_empty()).then_some(update)
    }
}

pub(crate) async fn handle(app: &App, args: SettingsArgs) -> anyhow::Result<ExitCode> {
    let update = args.update();
    if let Some(update) = &update {
        app.store().save(update).await?;
        println!("Saved.");
    }
    if args.show || update.is_none() {
        show(app).await?;
    }
    Ok(ExitCode::SUCCESS)
}

async fn show(app: &App) -> anyhow::Result<()> {
    let stored = app.store().load().await?;
    let config = ConfigResolver::resolve(app.defaults(), &stored);

    let key_state = |key: Option<&str>| match key.map(str::trim) {
        Some(key) if !key.is_empty() => "<set>",
        _ => "<not set>",
    };

    println!("Settings file: {}", app.store().path().display());
    println!("  OPENAI_API_KEY: {}", key_state(stored.api_key.as_deref()));
    println!(
        "  USE_MOCK: {}",
        stored.use_mock.map_or("<not set>".to_string(), |v| v.to_string())
    );
    println!("  MODEL: {}", stored.model.as_deref().unwrap_or("<not set>"));
    println!(
        "Effective: mode={} model={} key={}",
        if config.use_mock { "mock" } else { "live" },
        config.model,
        if config.has_key() { "<set>" } else { "<not set>" }
    );
    Ok(())
}
