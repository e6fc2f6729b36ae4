//! Gemini REST client

use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::core::config::ServiceConfig;
use crate::core::errors::{Result, TranslationError};
use crate::core::models::RemoteModel;

/// Thin async client for the Gemini `generateContent` and `models` endpoints
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    api_endpoint: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelsPage {
    #[serde(default)]
    models: Vec<RemoteModel>,
    #[serde(default)]
    next_page_token: Option<String>,
}

impl GeminiClient {
    /// Create a client; fails when no credential is configured
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(TranslationError::missing_credential)?
            .to_string();

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .pool_idle_timeout(Some(Duration::from_secs(30)))
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(Self {
            client,
            api_key,
            api_endpoint: config.api_endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Run a single generation call against `model`
    pub async fn generate_content(
        &self,
        model: &str,
        text: &str,
        instruction: &str,
    ) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.api_endpoint,
            model_id(model)
        );

        let body = serde_json::json!({
            "system_instruction": {
                "parts": [{ "text": instruction }]
            },
            "contents": [{
                "role": "user",
                "parts": [{ "text": text }]
            }]
        });

        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| TranslationError::NetworkError {
                message: e.to_string(),
            })?;

        let json = read_json(response).await?;
        extract_text(&json)
    }

    /// List every model visible to this key, following pagination
    pub async fn list_models(&self) -> Result<Vec<RemoteModel>> {
        let url = format!("{}/models", self.api_endpoint);
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(&url)
                .header("x-goog-api-key", &self.api_key);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let response = request
                .send()
                .await
                .map_err(|e| TranslationError::NetworkError {
                    message: e.to_string(),
                })?;

            let page: ModelsPage = serde_json::from_value(read_json(response).await?)?;
            models.extend(page.models);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        debug!("Listed {} models", models.len());
        Ok(models)
    }
}

/// Accept both `gemini-2.0-flash` and `models/gemini-2.0-flash`
pub fn model_id(model: &str) -> &str {
    model.strip_prefix("models/").unwrap_or(model)
}

async fn read_json(response: reqwest::Response) -> Result<serde_json::Value> {
    let status = response.status();

    if status.is_success() {
        return response
            .json()
            .await
            .map_err(|e| TranslationError::InvalidResponseError {
                message: e.to_string(),
            });
    }

    let error_text = response.text().await.unwrap_or_default();
    Err(error_from_status(status.as_u16(), &error_text))
}

/// Map a non-2xx provider response to an error
pub fn error_from_status(status: u16, body: &str) -> TranslationError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());

    if status == 429 {
        return TranslationError::RateLimitError { message };
    }

    TranslationError::ApiError { status, message }
}

/// Pull the generated text out of a `generateContent` response
pub fn extract_text(json: &serde_json::Value) -> Result<String> {
    let candidate = match json["candidates"].get(0) {
        Some(candidate) => candidate,
        None => {
            let message = match json["promptFeedback"]["blockReason"].as_str() {
                Some(reason) => format!("Prompt blocked: {}", reason),
                None => "No candidates in response".to_string(),
            };
            return Err(TranslationError::InvalidResponseError { message });
        }
    };

    let parts = candidate["content"]["parts"].as_array().ok_or_else(|| {
        let reason = candidate["finishReason"].as_str().unwrap_or("unknown");
        TranslationError::InvalidResponseError {
            message: format!("No content in response (finish reason: {})", reason),
        }
    })?;

    Ok(parts
        .iter()
        .filter_map(|p| p["text"].as_str())
        .collect::<Vec<_>>()
        .concat())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_json_diff::assert_json_eq;
    use axum::extract::Query;
    use axum::http::{HeaderMap, Method, StatusCode, Uri};
    use axum::routing::get;
    use axum::Router;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_client_requires_key() {
        let config = ServiceConfig::default();
        assert!(matches!(
            GeminiClient::new(&config),
            Err(TranslationError::ServiceUnavailable { .. })
        ));

        let config = ServiceConfig {
            api_key: Some("test_key".to_string()),
            ..Default::default()
        };
        assert!(GeminiClient::new(&config).is_ok());
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let response = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{ "text": "How are " }, { "text": "you today?\n" }]
                },
                "finishReason": "STOP"
            }]
        });
        assert_eq!(extract_text(&response).unwrap(), "How are you today?\n");
    }

    #[test]
    fn test_extract_text_blocked_prompt() {
        let response = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        let err = extract_text(&response).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn test_extract_text_missing_content() {
        let response = json!({ "candidates": [{ "finishReason": "MAX_TOKENS" }] });
        let err = extract_text(&response).unwrap_err();
        assert!(err.to_string().contains("MAX_TOKENS"));
    }

    #[test]
    fn test_error_from_status() {
        let body = r#"{"error": {"code": 404, "message": "models/gemini-x is not found", "status": "NOT_FOUND"}}"#;
        match error_from_status(404, body) {
            TranslationError::ApiError { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "models/gemini-x is not found");
            }
            other => panic!("unexpected error: {:?}", other),
        }

        assert!(matches!(
            error_from_status(429, "quota"),
            TranslationError::RateLimitError { .. }
        ));

        assert_eq!(
            error_from_status(500, " upstream down ").to_string(),
            "API error: 500 - upstream down"
        );
    }

    /// What the fake endpoint saw for one request
    #[derive(Debug, Clone)]
    struct Captured {
        method: String,
        path: String,
        query: Option<String>,
        api_key: Option<String>,
        body: String,
    }

    type Log = Arc<Mutex<Vec<Captured>>>;

    /// Serve `app` on an ephemeral local port, returning its `/v1beta` base URL
    async fn spawn_endpoint(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/v1beta", addr)
    }

    fn client_for(endpoint: &str) -> GeminiClient {
        let config = ServiceConfig {
            api_key: Some("test_key".to_string()),
            api_endpoint: endpoint.to_string(),
            timeout_ms: 5000,
            ..Default::default()
        };
        GeminiClient::new(&config).unwrap()
    }

    /// Record every request, then answer with a fixed status and body
    fn recording_app(log: Log, status: StatusCode, reply: Value) -> Router {
        Router::new().fallback(
            move |method: Method, uri: Uri, headers: HeaderMap, body: String| {
                let log = log.clone();
                let reply = reply.clone();
                async move {
                    log.lock().unwrap().push(Captured {
                        method: method.to_string(),
                        path: uri.path().to_string(),
                        query: uri.query().map(str::to_string),
                        api_key: headers
                            .get("x-goog-api-key")
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string),
                        body,
                    });
                    (status, axum::Json(reply))
                }
            },
        )
    }

    #[tokio::test]
    async fn test_generate_content_request_shape() {
        let log: Log = Arc::default();
        let reply = json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "We're eating rice" }] },
                "finishReason": "STOP"
            }]
        });
        let endpoint = spawn_endpoint(recording_app(log.clone(), StatusCode::OK, reply)).await;
        let client = client_for(&endpoint);

        let text = client
            .generate_content("models/gemini-2.0-flash", "api bath kanawa", "Translate Singlish.")
            .await
            .unwrap();
        assert_eq!(text, "We're eating rice");

        let seen = log.lock().unwrap().clone();
        assert_eq!(seen.len(), 1);
        let request = &seen[0];
        assert_eq!(request.method, "POST");
        assert_eq!(request.path, "/v1beta/models/gemini-2.0-flash:generateContent");
        assert_eq!(request.api_key.as_deref(), Some("test_key"));
        assert!(request.query.is_none());

        let body: Value = serde_json::from_str(&request.body).unwrap();
        assert_json_eq!(
            body,
            json!({
                "system_instruction": { "parts": [{ "text": "Translate Singlish." }] },
                "contents": [{ "role": "user", "parts": [{ "text": "api bath kanawa" }] }]
            })
        );
    }

    #[tokio::test]
    async fn test_generate_content_rate_limited() {
        let log: Log = Arc::default();
        let reply = json!({
            "error": { "code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED" }
        });
        let endpoint =
            spawn_endpoint(recording_app(log.clone(), StatusCode::TOO_MANY_REQUESTS, reply)).await;

        let err = client_for(&endpoint)
            .generate_content("gemini-flash-latest", "oya kohomada adha", "instruction")
            .await
            .unwrap_err();

        match err {
            TranslationError::RateLimitError { message } => {
                assert_eq!(message, "Resource has been exhausted");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_generate_content_not_found() {
        let log: Log = Arc::default();
        let reply = json!({ "error": { "code": 404, "message": "models/gemini-x is not found" } });
        let endpoint = spawn_endpoint(recording_app(log, StatusCode::NOT_FOUND, reply)).await;

        let err = client_for(&endpoint)
            .generate_content("gemini-x", "hello", "instruction")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "API error: 404 - models/gemini-x is not found");
    }

    #[tokio::test]
    async fn test_list_models_follows_pages() {
        let log: Log = Arc::default();
        let app = {
            let log = log.clone();
            Router::new().route(
                "/v1beta/models",
                get(
                    move |headers: HeaderMap, Query(params): Query<HashMap<String, String>>| {
                        let log = log.clone();
                        async move {
                            log.lock().unwrap().push(Captured {
                                method: "GET".to_string(),
                                path: "/v1beta/models".to_string(),
                                query: params.get("pageToken").cloned(),
                                api_key: headers
                                    .get("x-goog-api-key")
                                    .and_then(|v| v.to_str().ok())
                                    .map(str::to_string),
                                body: String::new(),
                            });

                            let page = match params.get("pageToken").map(String::as_str) {
                                None => json!({
                                    "models": [{
                                        "name": "models/gemini-2.0-flash",
                                        "displayName": "Gemini 2.0 Flash",
                                        "supportedGenerationMethods": ["generateContent"]
                                    }],
                                    "nextPageToken": "page-2"
                                }),
                                Some(_) => json!({
                                    "models": [{
                                        "name": "models/text-embedding-004",
                                        "supportedGenerationMethods": ["embedContent"]
                                    }]
                                }),
                            };
                            axum::Json(page)
                        }
                    },
                ),
            )
        };
        let endpoint = spawn_endpoint(app).await;

        let models = client_for(&endpoint).list_models().await.unwrap();
        let names: Vec<&str> = models.iter().map(|m| model_id(&m.name)).collect();
        assert_eq!(names, vec!["gemini-2.0-flash", "text-embedding-004"]);
        assert!(models[0].supports_generate_content());
        assert!(!models[1].supports_generate_content());

        let seen = log.lock().unwrap().clone();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].query, None);
        assert_eq!(seen[1].query.as_deref(), Some("page-2"));
        assert!(seen.iter().all(|r| r.api_key.as_deref() == Some("test_key")));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_network_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client_for(&format!("http://{}/v1beta", addr))
            .generate_content("gemini-2.0-flash", "hari", "instruction")
            .await
            .unwrap_err();
        assert!(matches!(err, TranslationError::NetworkError { .. }));
    }

    #[test]
    fn test_model_id() {
        assert_eq!(model_id("models/gemini-2.0-flash"), "gemini-2.0-flash");
        assert_eq!(model_id("gemini-pro-latest"), "gemini-pro-latest");
    }
}
