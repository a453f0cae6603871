//! Live-mode prompt and reply handling.

use serde_json::{json, Value};

use pdpwriter_protocols::{Field, RewriteError, RewrittenRecord, ScrapedRecord};
use pdpwriter_provider_openai::ApiRequest;

pub const SYSTEM_PROMPT: &str = "You are an e-commerce copywriter.
Return STRICT JSON with keys: title, description, shipping, returns.
- Title: <= 70 chars, no emojis, no shouting.
- Description: 2-4 short paragraphs; benefits-first; keep facts consistent with input.
- Shipping/Returns: concise bullet points; no promises not present in input.
- Never invent specs or guarantees.";

pub const TEMPERATURE: f32 = 0.2;

const DEFAULT_LANGUAGE: &str = "en";

/// JSON user message for `input`. `url` is omitted when unknown.
pub fn user_payload(input: &ScrapedRecord) -> Value {
    let language = input
        .language
        .as_deref()
        .filter(|lang| !lang.is_empty())
        .unwrap_or(DEFAULT_LANGUAGE);

    let mut payload = json!({
        "language": language,
        "title": input.title,
        "description": input.description,
        "shipping": input.shipping,
        "returns": input.returns,
    });
    if let Some(url) = &input.url {
        payload["url"] = json!(url);
    }
    payload
}

pub fn build_request(model: &str, input: &ScrapedRecord) -> ApiRequest {
    ApiRequest::json_chat(model, SYSTEM_PROMPT, user_payload(input).to_string(), TEMPERATURE)
}

/// Merge the model's reply over the scraped values.
///
/// A field takes the model's value only when it is a non-empty string or a
/// non-empty list of strings; anything else keeps the scraped text.
pub fn merge_reply(content: &str, input: &ScrapedRecord) -> Result<RewrittenRecord, RewriteError> {
    let parsed: Value = serde_json::from_str(content).map_err(|_| RewriteError::ModelResponse)?;

    let mut out = input.to_rewritten();
    for field in Field::ALL {
        if let Some(value) = parsed.get(field.as_str()).and_then(model_text) {
            out.set(field, value);
        }
    }
    Ok(out)
}

fn model_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(Value::as_str)
            .collect::<Option<Vec<_>>>()?
            .join("\n"),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}
