use super::*;
use serde_json::json;

#[test]
fn test_page_request_wire_names() {
    let scrape = serde_json::to_value(PageRequest::Scrape).unwrap();
    assert_eq!(scrape, json!({"type": "scrapePDP"}));

    let replace = PageRequest::Replace {
        payload: RewrittenRecord {
            title: "New".to_string(),
            ..Default::default()
        },
    };
    let value = serde_json::to_value(&replace).unwrap();
    assert_eq!(value["type"], "replacePDP");
    assert_eq!(value["payload"]["title"], "New");
}

#[test]
fn test_page_request_replace_requires_payload() {
    let result = serde_json::from_value::<PageRequest>(json!({"type": "replacePDP"}));
    assert!(result.is_err());
}

#[test]
fn test_router_request_parse_known_types() {
    let ping: RouterRequest = serde_json::from_value(json!({"type": "PING"})).unwrap();
    assert_eq!(ping, RouterRequest::Ping);

    let status: RouterRequest = serde_json::from_value(json!({"type": "GET_STATUS"})).unwrap();
    assert_eq!(status, RouterRequest::GetStatus);

    let generate: RouterRequest = serde_json::from_value(json!({
        "type": "LLM_GENERATE",
        "payload": {"title": "Boots", "url": "https://shop.example/boots"}
    }))
    .unwrap();
    match generate {
        RouterRequest::Generate { payload } => {
            assert_eq!(payload.title, "Boots");
            assert_eq!(payload.url.as_deref(), Some("https://shop.example/boots"));
        }
        other => panic!("Expected Generate, got {:?}", other),
    }
}

#[test]
fn test_router_request_unknown_type() {
    let request: RouterRequest = serde_json::from_value(json!({"type": "RESET_ALL"})).unwrap();
    assert_eq!(request, RouterRequest::Unknown);
    assert_eq!(request.kind(), "unknown");
}

#[test]
fn test_response_success_shape() {
    let response = Response::success("pong");
    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value, json!({"ok": true, "data": "pong"}));
}

#[test]
fn test_response_failure_shape() {
    let response = Response::failure("Unknown message type");
    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value, json!({"ok": false, "error": "Unknown message type"}));
}

#[test]
fn test_response_from_result() {
    let ok: Result<u32, String> = Ok(3);
    assert_eq!(Response::from_result(ok).data, Some(json!(3)));

    let err: Result<u32, String> = Err("boom".to_string());
    let response = Response::from_result(err);
    assert!(!response.ok);
    assert_eq!(response.error.as_deref(), Some("boom"));
}

#[test]
fn test_into_data_decodes_payload() {
    let status = StatusInfo {
        use_mock: true,
        model: "gpt-4o-mini".to_string(),
        has_key: false,
    };
    let decoded: StatusInfo = Response::success(&status).into_data("status error").unwrap();
    assert_eq!(decoded, status);
}

#[test]
fn test_into_data_uses_fallback_for_bare_failure() {
    let response = Response {
        ok: false,
        data: None,
        error: None,
    };
    let result: Result<(), String> = response.into_data("Scrape failed");
    assert_eq!(result.unwrap_err(), "Scrape failed");
}

#[test]
fn test_into_data_unit_for_empty_success() {
    let result: Result<(), String> = Response::empty().into_data("Replace failed");
    assert!(result.is_ok());
}

#[test]
fn test_into_data_malformed_payload() {
    let result: Result<StatusInfo, String> = Response::success("pong").into_data("x");
    assert!(result.unwrap_err().starts_with("Malformed response"));
}

#[test]
fn test_status_info_camel_case() {
    let status = StatusInfo {
        use_mock: false,
        model: "gpt-4o".to_string(),
        has_key: true,
    };
    let value = serde_json::to_value(&status).unwrap();
    assert_eq!(value, json!({"useMock": false, "model": "gpt-4o", "hasKey": true}));
}
