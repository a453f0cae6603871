use super::*;
use pdpwriter_config::Config;
use pdpwriter_protocols::ProviderError;
use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

fn service(config: Config, client: ChatClient) -> RewriteService {
    RewriteService::new(Arc::new(config), client).with_mock_delay(Duration::ZERO)
}

fn scraped() -> ScrapedRecord {
    ScrapedRecord {
        url: Some("https://shop.example/p/7".to_string()),
        language: Some("en-GB".to_string()),
        title: "Wool Scarf".to_string(),
        description: "Warm.".to_string(),
        shipping: "Ships tomorrow".to_string(),
        returns: "No returns".to_string(),
    }
}

fn completion(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "id": "chatcmpl-1",
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    }))
}

#[tokio::test]
async fn test_mock_mode_title_fallback() {
    let input = ScrapedRecord {
        title: String::new(),
        description: "Great shoes".to_string(),
        ..Default::default()
    };
    let out = service(Config::mock(), ChatClient::new()).rewrite(&input).await.unwrap();
    assert_eq!(out.title, "Sample Product — Enhanced");
    assert!(out.description.starts_with("Great shoes"));
    assert!(!out.shipping.is_empty());
    assert!(!out.returns.is_empty());
}

#[tokio::test]
async fn test_mock_mode_ignores_missing_key_and_endpoint() {
    let mock_server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .respond_with(completion("{}"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = ChatClient::with_url(mock_server.uri());
    service(Config::mock(), client).rewrite(&scraped()).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_mock_mode_delay() {
    let service = RewriteService::new(Arc::new(Config::mock()), ChatClient::new())
        .with_mock_delay(Duration::from_millis(250));
    let start = tokio::time::Instant::now();
    service.rewrite(&scraped()).await.unwrap();
    assert!(start.elapsed() >= Duration::from_millis(250));
}

#[tokio::test]
async fn test_live_mode_without_key() {
    let err = service(Config::live("  ", "gpt-4o-mini"), ChatClient::new())
        .rewrite(&scraped())
        .await
        .unwrap_err();
    assert!(matches!(err, RewriteError::MissingApiKey));
    assert!(err.to_string().starts_with("Missing API key"));
}

#[tokio::test]
async fn test_live_mode_merges_reply() {
    let mock_server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .and(matchers::header("Authorization", "Bearer sk-live"))
        .and(matchers::body_partial_json(serde_json::json!({
            "model": "gpt-4o",
            "temperature": 0.2,
            "response_format": {"type": "json_object"}
        })))
        .respond_with(completion(r#"{"title":"Merino Wool Scarf","description":"Soft and warm."}"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ChatClient::with_url(mock_server.uri());
    let out = service(Config::live("sk-live", "gpt-4o"), client)
        .rewrite(&scraped())
        .await
        .unwrap();

    assert_eq!(out.title, "Merino Wool Scarf");
    assert_eq!(out.description, "Soft and warm.");
    assert_eq!(out.shipping, "Ships tomorrow");
    assert_eq!(out.returns, "No returns");
}

#[tokio::test]
async fn test_live_mode_sends_scraped_record() {
    let mock_server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .respond_with(completion("{}"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ChatClient::with_url(mock_server.uri());
    service(Config::live("sk-live", "gpt-4o-mini"), client)
        .rewrite(&scraped())
        .await
        .unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["messages"][0]["role"], "system");
    let user: serde_json::Value =
        serde_json::from_str(body["messages"][1]["content"].as_str().unwrap()).unwrap();
    assert_eq!(user["url"], "https://shop.example/p/7");
    assert_eq!(user["language"], "en-GB");
    assert_eq!(user["title"], "Wool Scarf");
}

#[tokio::test]
async fn test_live_mode_http_error() {
    let mock_server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&mock_server)
        .await;

    let client = ChatClient::with_url(mock_server.uri());
    let err = service(Config::live("sk-live", "gpt-4o-mini"), client)
        .rewrite(&scraped())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RewriteError::Provider(ProviderError::ApiError { status: 500, .. })
    ));
    assert_eq!(err.to_string(), "LLM error: 500 upstream exploded");
}

#[tokio::test]
async fn test_live_mode_invalid_model_json() {
    let mock_server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .respond_with(completion("not json at all"))
        .mount(&mock_server)
        .await;

    let client = ChatClient::with_url(mock_server.uri());
    let err = service(Config::live("sk-live", "gpt-4o-mini"), client)
        .rewrite(&scraped())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Model did not return valid JSON.");
}

#[tokio::test]
async fn test_live_mode_non_json_body() {
    let mock_server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&mock_server)
        .await;

    let client = ChatClient::with_url(mock_server.uri());
    let err = service(Config::live("sk-live", "gpt-4o-mini"), client)
        .rewrite(&scraped())
        .await
        .unwrap_err();
    assert!(matches!(err, RewriteError::ModelResponse));
}

#[tokio::test]
async fn test_live_mode_choice_without_message_keeps_scraped() {
    let mock_server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"choices":[{"index":0}]}"#))
        .mount(&mock_server)
        .await;

    let client = ChatClient::with_url(mock_server.uri());
    let record = service(Config::live("sk-live", "gpt-4o-mini"), client)
        .rewrite(&scraped())
        .await
        .unwrap();
    assert_eq!(record, scraped().to_rewritten());
}

#[tokio::test]
async fn test_status_never_exposes_key() {
    let status = service(Config::live("sk-secret", "gpt-4o"), ChatClient::new())
        .status()
        .await
        .unwrap();
    assert!(!status.use_mock);
    assert!(status.has_key);
    assert_eq!(status.model, "gpt-4o");
    assert!(!serde_json::to_string(&status).unwrap().contains("sk-secret"));
}
