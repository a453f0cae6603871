use super::*;
use crate::rewrite::RewriteService;
use crate::router::MessageRouter;
use crate::worker::BackgroundWorker;
use pdpwriter_config::{Config, ConfigError, ConfigSource};
use pdpwriter_page::{ContentScript, HtmlPage, PageAgent, PageSource, WaitOptions};
use pdpwriter_provider_openai::ChatClient;
use std::time::Duration;

const PAGE: &str = r#"<html lang="en"><body>
    <span id="productTitle"></span>
    <div id="productDescription"><p>Great shoes</p></div>
    <div id="mir-layout-DELIVERY_BLOCK">Ships in 2 days</div>
    <div id="RETURNS_POLICY">30-day returns</div>
</body></html>"#;

fn background(config: impl ConfigSource + 'static) -> BackgroundHandle {
    let service = RewriteService::new(Arc::new(config), ChatClient::new())
        .with_mock_delay(Duration::from_millis(250));
    BackgroundWorker::new(Arc::new(MessageRouter::new(Arc::new(service)))).handle()
}

fn tab(page: &Arc<HtmlPage>) -> TabHandle {
    let agent = PageAgent::new(page.clone())
        .with_wait(WaitOptions::new(Duration::ZERO, Duration::from_millis(10)));
    ContentScript::spawn(agent, page.url())
}

fn setup(config: Config) -> (Arc<HtmlPage>, Arc<RecordingSink>, Controller) {
    let page = Arc::new(HtmlPage::with_url("https://shop.example/shoes", PAGE));
    let sink = Arc::new(RecordingSink::new());
    let controller = Controller::new(Some(tab(&page)), background(config), sink.clone());
    (page, sink, controller)
}

#[tokio::test]
async fn test_apply_flow_in_mock_mode() {
    let (page, sink, controller) = setup(Config::mock());

    let record = controller.apply().await.unwrap();
    assert_eq!(record.title, "Sample Product — Enhanced");

    assert_eq!(
        sink.statuses(),
        vec!["Scraping page...", "Calling LLM...", "Replacing content...", "Done ✅"]
    );
    assert_eq!(sink.badge(), Some(Badge::Mock));

    let html = page.html();
    assert!(html.contains("Sample Product — Enhanced"));
    assert!(html.contains("Great shoes<br><br>• Benefits-focused copy"));
    assert!(html.contains("• Standard shipping 3–5 business days"));
}

#[tokio::test]
async fn test_preview_flow_leaves_page_untouched() {
    let (page, sink, controller) = setup(Config::mock());
    let before = page.html();

    let record = controller.preview().await.unwrap();

    assert_eq!(page.html(), before);
    let last = sink.last_status().unwrap();
    assert!(last.starts_with("Preview:\n{\n  \"title\": \"Sample Product — Enhanced\""));
    let shown: RewrittenRecord = serde_json::from_str(last.trim_start_matches("Preview:\n")).unwrap();
    assert_eq!(shown, record);
    assert_eq!(sink.statuses()[0], "Scraping page...");
}

#[tokio::test]
async fn test_missing_key_error_surfaces() {
    let (page, sink, controller) = setup(Config::live("", "gpt-4o-mini"));
    let before = page.html();

    let err = controller.apply().await.unwrap_err();
    assert!(err.to_string().starts_with("Missing API key"));
    assert!(sink.last_status().unwrap().starts_with("Error: Missing API key"));
    assert_eq!(sink.badge(), Some(Badge::NeedsKey));
    assert_eq!(page.html(), before);
}

#[tokio::test]
async fn test_missing_content_script() {
    let sink = Arc::new(RecordingSink::new());
    let controller = Controller::new(
        Some(TabHandle::without_content_script(Some("https://shop.example".to_string()))),
        background(Config::mock()),
        sink.clone(),
    );

    controller.apply().await.unwrap_err();
    assert_eq!(
        sink.last_status().unwrap(),
        "Error: Content script not found. Please refresh the page and try again."
    );
    assert_eq!(sink.badge(), Some(Badge::Mock));
}

#[tokio::test]
async fn test_no_active_tab() {
    let sink = Arc::new(RecordingSink::new());
    let controller = Controller::new(None, background(Config::mock()), sink.clone());

    let err = controller.preview().await.unwrap_err();
    assert_eq!(err, ControllerError::NoActiveTab);
    assert_eq!(sink.statuses(), vec!["Scraping page...", "No active tab"]);
    assert!(sink.badge().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_flow_rejected() {
    let (_page, _sink, controller) = setup(Config::mock());

    let (first, second) = tokio::join!(controller.apply(), controller.preview());
    assert!(first.is_ok());
    assert_eq!(second.unwrap_err(), ControllerError::Busy);

    controller.preview().await.unwrap();
}

#[tokio::test]
async fn test_badge_live_names_model() {
    let (_page, _sink, controller) = setup(Config::live("sk-test", "gpt-4o"));
    let badge = controller.refresh_badge().await;
    assert_eq!(badge.label(), "LIVE");
    assert_eq!(badge.tooltip(), "Live mode • Model: gpt-4o");
}

struct BrokenConfig;

#[async_trait::async_trait]
impl ConfigSource for BrokenConfig {
    async fn load(&self) -> Result<Config, ConfigError> {
        Err(ConfigError::InvalidFormat("bad settings".to_string()))
    }
}

#[tokio::test]
async fn test_badge_unavailable_on_status_error() {
    let sink = Arc::new(RecordingSink::new());
    let controller = Controller::new(None, background(BrokenConfig), sink.clone());
    assert_eq!(controller.refresh_badge().await, Badge::Unavailable);
    assert_eq!(sink.badge().unwrap().label(), "…");
}

#[test]
fn test_badge_from_status() {
    let status = |use_mock, has_key| StatusInfo {
        use_mock,
        model: "gpt-4o-mini".to_string(),
        has_key,
    };
    assert_eq!(Badge::from_status(&status(true, false)), Badge::Mock);
    assert_eq!(Badge::from_status(&status(true, true)), Badge::Mock);
    assert_eq!(Badge::from_status(&status(false, false)), Badge::NeedsKey);
    assert_eq!(
        Badge::from_status(&status(false, true)),
        Badge::Live {
            model: "gpt-4o-mini".to_string()
        }
    );
}
