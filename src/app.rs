//! Wiring of the defaults template, settings store, background worker and
//! page tabs for a single CLI invocation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use tracing::debug;

use pdpwriter_config::{ConfigLoader, ConfigResolver, Defaults, FileSettingsStore};
use pdpwriter_core::{BackgroundHandle, BackgroundWorker, MessageRouter, RewriteService};
use pdpwriter_page::{ContentScript, HtmlPage, PageAgent, TabHandle, WaitOptions};
use pdpwriter_provider_openai::ChatClient;

pub(crate) struct App {
    defaults: Defaults,
    store: Arc<FileSettingsStore>,
}

impl App {
    /// Load the defaults template (embedded unless `defaults_path` is given)
    /// and open the settings store in `data_dir`.
    pub fn load(defaults_path: Option<&Path>, data_dir: &Path) -> anyhow::Result<Self> {
        let defaults = match defaults_path {
            Some(path) => ConfigLoader::load(path)
                .with_context(|| format!("Failed to load defaults from {}", path.display()))?,
            None => ConfigLoader::builtin()?,
        };
        debug!(defaults = ?defaults, "Loaded defaults template");

        Ok(Self {
            defaults,
            store: Arc::new(FileSettingsStore::new(data_dir)),
        })
    }

    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    pub fn store(&self) -> &Arc<FileSettingsStore> {
        &self.store
    }

    pub fn resolver(&self) -> ConfigResolver {
        ConfigResolver::new(self.defaults.clone(), self.store.clone())
    }

    /// Handle to a fresh background worker. It starts on the first message.
    pub fn background(&self) -> BackgroundHandle {
        let client = ChatClient::with_url(self.defaults.provider.api_url.as_str());
        let service = RewriteService::new(Arc::new(self.resolver()), client)
            .with_mock_delay(self.defaults.mock.delay());
        BackgroundWorker::new(Arc::new(MessageRouter::new(Arc::new(service))))
            .with_idle_timeout(self.defaults.worker.idle_timeout())
            .handle()
    }

    /// Load `file` as the active tab with a content script attached.
    pub async fn open_tab(
        &self,
        file: &Path,
        url: Option<String>,
    ) -> anyhow::Result<(Arc<HtmlPage>, TabHandle)> {
        let html = tokio::fs::read_to_string(file)
            .await
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let url = url.or_else(|| file_url(file));

        let page = Arc::new(match &url {
            Some(url) => HtmlPage::with_url(url.as_str(), html),
            None => HtmlPage::new(html),
        });
        let wait = WaitOptions::new(
            self.defaults.page.wait_timeout(),
            self.defaults.page.poll_interval(),
        );
        let agent = PageAgent::new(page.clone()).with_wait(wait);
        Ok((page, ContentScript::spawn(agent, url)))
    }
}

fn file_url(path: &Path) -> Option<String> {
    let absolute: PathBuf = std::fs::canonicalize(path).ok()?;
    url::Url::from_file_path(absolute).ok().map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_open_tab_uses_file_url() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("page.html");
        std::fs::write(&file, "<h1>Lamp</h1>").unwrap();

        let app = App::load(None, dir.path()).unwrap();
        let (page, tab) = app.open_tab(&file, None).await.unwrap();

        assert_eq!(page.html(), "<h1>Lamp</h1>");
        assert!(tab.url().unwrap().starts_with("file://"));
        assert!(tab.url().unwrap().ends_with("page.html"));
    }

    #[tokio::test]
    async fn test_open_tab_prefers_explicit_url() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("page.html");
        std::fs::write(&file, "<h1>Lamp</h1>").unwrap();

        let app = App::load(None, dir.path()).unwrap();
        let (_page, tab) = app
            .open_tab(&file, Some("https://shop.example/lamp".to_string()))
            .await
            .unwrap();
        assert_eq!(tab.url(), Some("https://shop.example/lamp"));
    }

    #[tokio::test]
    async fn test_open_tab_missing_file() {
        let dir = TempDir::new().unwrap();
        let app = App::load(None, dir.path()).unwrap();
        let err = app.open_tab(&dir.path().join("nope.html"), None).await.unwrap_err();
        assert!(err.to_string().starts_with("Failed to read"));
    }

    #[test]
    fn test_load_alternate_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("defaults.toml");
        std::fs::write(&path, "use_mock = true\nmodel = \"gpt-4o\"\n").unwrap();

        let app = App::load(Some(&path), dir.path()).unwrap();
        assert!(app.defaults().use_mock);
        assert_eq!(app.defaults().model, "gpt-4o");
    }
}
