//! HTTP Routes
//!
//! API Endpoints:
//! - /v1/audio/speech     POST  合成语音（缓冲或流式）
//! - /v1/models           GET   列出模型
//! - /v1/voices           GET   列出音色（?lang= 前缀筛选）
//! - /v1/voices/refresh   POST  立即刷新音色目录
//! - /health              GET   健康检查（?backend=true 探测后端）

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::middleware::require_api_key;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .nest("/v1", v1_routes(state))
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
}

/// OpenAI 兼容路由（配置 api_key 时需鉴权）
fn v1_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/audio/speech", post(handlers::create_speech))
        .route("/models", get(handlers::list_models))
        .route("/voices", get(handlers::list_voices))
        .route("/voices/refresh", post(handlers::refresh_voices))
        .route_layer(middleware::from_fn_with_state(state, require_api_key))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        response::Response,
        Router,
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;
    use tower::util::ServiceExt;

    use crate::application::{DispatchConfig, NativeVoice, RefreshVoiceCatalog};
    use crate::config::{model_definitions, AppConfig};
    use crate::infrastructure::adapters::{FakeSynthesisFailure, FakeTtsClient};
    use crate::infrastructure::http::handlers::REQUEST_ID_HEADER;
    use crate::infrastructure::http::server::build_app;
    use crate::infrastructure::http::state::{AppState, GatewayOptions};
    use crate::infrastructure::memory::{InMemoryVoiceCatalog, StaticModelRegistry};

    const XIAOXIAO: &str = "zh-CN-XiaoxiaoNeural";

    struct TestApp {
        app: Router,
        backend: Arc<FakeTtsClient>,
    }

    async fn setup_with(options: GatewayOptions, load_catalog: bool) -> TestApp {
        let backend = Arc::new(FakeTtsClient::with_defaults());
        let catalog = Arc::new(InMemoryVoiceCatalog::new());
        let models = Arc::new(StaticModelRegistry::new(
            model_definitions(&AppConfig::default()).unwrap(),
        ));

        let state = Arc::new(AppState::new(
            backend.clone(),
            catalog,
            models,
            options,
        ));
        if load_catalog {
            state
                .refresh_catalog_handler
                .handle(RefreshVoiceCatalog)
                .await
                .unwrap();
        }

        TestApp {
            app: build_app(state, 1024 * 1024),
            backend,
        }
    }

    async fn setup() -> TestApp {
        setup_with(GatewayOptions::default(), true).await
    }

    fn short_timeouts() -> GatewayOptions {
        GatewayOptions {
            dispatch: DispatchConfig {
                first_byte_timeout: Duration::from_millis(50),
                chunk_timeout: Duration::from_millis(50),
            },
            ..GatewayOptions::default()
        }
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        app.clone().oneshot(request).await.unwrap()
    }

    async fn speech(app: &Router, body: Value) -> Response {
        send(app, Method::POST, "/v1/audio/speech", Some(body)).await
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn header_str<'a>(response: &'a Response, name: &str) -> Option<&'a str> {
        response.headers().get(name).and_then(|v| v.to_str().ok())
    }

    // ========================================================================
    // 合成
    // ========================================================================

    #[tokio::test]
    async fn test_buffered_speech_returns_audio() {
        let t = setup().await;

        let response = speech(
            &t.app,
            json!({"model": "tts-1", "input": "你好", "voice": XIAOXIAO}),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(header_str(&response, "content-type"), Some("audio/mpeg"));
        assert!(header_str(&response, REQUEST_ID_HEADER).is_some());

        let expected = t.backend.expected_audio(XIAOXIAO, "你好", 0, 0);
        let expected_len = expected.len().to_string();
        assert_eq!(
            header_str(&response, "content-length"),
            Some(expected_len.as_str())
        );

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(bytes.as_ref(), expected.as_slice());
        assert_eq!(t.backend.synthesize_calls(), 1);
    }

    #[tokio::test]
    async fn test_streaming_speech_returns_chunked_audio() {
        let t = setup().await;

        let response = speech(
            &t.app,
            json!({"model": "tts-1", "input": "流式测试", "voice": XIAOXIAO, "stream": true}),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(header_str(&response, "content-type"), Some("audio/mpeg"));
        assert!(header_str(&response, "content-length").is_none());

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(
            bytes.as_ref(),
            t.backend.expected_audio(XIAOXIAO, "流式测试", 0, 0).as_slice()
        );
    }

    #[tokio::test]
    async fn test_alias_resolves_to_native_voice() {
        let t = setup().await;

        let response = speech(
            &t.app,
            json!({"model": "tts-1", "input": "别名", "voice": "shimmer"}),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(
            bytes.as_ref(),
            t.backend.expected_audio(XIAOXIAO, "别名", 0, 0).as_slice()
        );
    }

    #[tokio::test]
    async fn test_prosody_is_forwarded() {
        let t = setup().await;

        let response = speech(
            &t.app,
            json!({"model": "tts-1", "input": "快一点", "voice": XIAOXIAO, "speed": 1.5, "pitch": "0.8"}),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(
            bytes.as_ref(),
            t.backend.expected_audio(XIAOXIAO, "快一点", 50, -20).as_slice()
        );
    }

    #[tokio::test]
    async fn test_identical_requests_return_same_length() {
        let t = setup().await;
        let body = json!({"model": "tts-1", "input": "重复请求", "voice": XIAOXIAO});

        let first = to_bytes(speech(&t.app, body.clone()).await.into_body(), usize::MAX)
            .await
            .unwrap();
        let second = to_bytes(speech(&t.app, body).await.into_body(), usize::MAX)
            .await
            .unwrap();

        assert!(!first.is_empty());
        assert_eq!(first.len(), second.len());
        assert_eq!(t.backend.synthesize_calls(), 2);
    }

    // ========================================================================
    // 客户端错误
    // ========================================================================

    #[tokio::test]
    async fn test_missing_input_is_client_error() {
        let t = setup().await;

        let response = speech(&t.app, json!({"model": "tts-1", "voice": XIAOXIAO})).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["param"], "input");
        assert_eq!(body["error"]["type"], "invalid_request_error");
        assert_eq!(t.backend.synthesize_calls(), 0);
    }

    #[tokio::test]
    async fn test_unknown_voice_names_voice() {
        let t = setup().await;

        let response = speech(
            &t.app,
            json!({"model": "tts-1", "input": "测试", "voice": "invalid-voice-name"}),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["param"], "voice");
        assert_eq!(body["error"]["code"], "unknown_voice");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("invalid-voice-name"));
        assert_eq!(t.backend.synthesize_calls(), 0);
    }

    #[tokio::test]
    async fn test_stream_on_non_streaming_model_rejected() {
        let t = setup().await;

        let response = speech(
            &t.app,
            json!({"model": "tts-1-hd", "input": "测试", "voice": XIAOXIAO, "stream": true}),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["param"], "stream");
        assert_eq!(t.backend.synthesize_calls(), 0);
    }

    #[tokio::test]
    async fn test_malformed_json_is_client_error() {
        let t = setup().await;

        let request = Request::builder()
            .method(Method::POST)
            .uri("/v1/audio/speech")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"model\": \"tts-1\", "))
            .unwrap();
        let response = t.app.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "invalid_body");
        assert_eq!(t.backend.synthesize_calls(), 0);
    }

    // ========================================================================
    // 上游失败
    // ========================================================================

    #[tokio::test]
    async fn test_upstream_unavailable_maps_to_bad_gateway() {
        let t = setup().await;
        t.backend.fail_next_synthesis(FakeSynthesisFailure::Unavailable);

        let response = speech(
            &t.app,
            json!({"model": "tts-1", "input": "测试", "voice": XIAOXIAO}),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            body_json(response).await["error"]["code"],
            "upstream_unavailable"
        );
    }

    #[tokio::test]
    async fn test_upstream_rejected_maps_to_unprocessable() {
        let t = setup().await;
        t.backend
            .fail_next_synthesis(FakeSynthesisFailure::Rejected("bad ssml".to_string()));

        let response = speech(
            &t.app,
            json!({"model": "tts-1", "input": "测试", "voice": XIAOXIAO}),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "upstream_rejected");
        assert!(body["error"]["message"].as_str().unwrap().contains("bad ssml"));
    }

    #[tokio::test]
    async fn test_empty_audio_is_rejected() {
        let t = setup().await;
        t.backend.fail_next_synthesis(FakeSynthesisFailure::Empty);

        let response = speech(
            &t.app,
            json!({"model": "tts-1", "input": "测试", "voice": XIAOXIAO, "stream": true}),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_first_byte_timeout_maps_to_gateway_timeout() {
        let t = setup_with(short_timeouts(), true).await;
        t.backend.fail_next_synthesis(FakeSynthesisFailure::StallAfter(0));

        let response = speech(
            &t.app,
            json!({"model": "tts-1", "input": "测试", "voice": XIAOXIAO, "stream": true}),
        )
        .await;

        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body_json(response).await["error"]["code"], "upstream_timeout");
        assert_eq!(t.backend.open_streams(), 0);
    }

    #[tokio::test]
    async fn test_buffered_break_fails_whole_request() {
        let t = setup().await;
        t.backend.fail_next_synthesis(FakeSynthesisFailure::BreakAfter(1));

        let response = speech(
            &t.app,
            json!({"model": "tts-1", "input": "测试", "voice": XIAOXIAO}),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_mid_stream_break_aborts_body() {
        let t = setup().await;
        t.backend.fail_next_synthesis(FakeSynthesisFailure::BreakAfter(1));

        let response = speech(
            &t.app,
            json!({"model": "tts-1", "input": "测试", "voice": XIAOXIAO, "stream": true}),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(to_bytes(response.into_body(), usize::MAX).await.is_err());
    }

    #[tokio::test]
    async fn test_mid_stream_stall_aborts_body() {
        let t = setup_with(short_timeouts(), true).await;
        t.backend.fail_next_synthesis(FakeSynthesisFailure::StallAfter(1));

        let response = speech(
            &t.app,
            json!({"model": "tts-1", "input": "测试", "voice": XIAOXIAO, "stream": true}),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(to_bytes(response.into_body(), usize::MAX).await.is_err());
        assert_eq!(t.backend.open_streams(), 0);
    }

    #[tokio::test]
    async fn test_client_disconnect_releases_backend_stream() {
        let t = setup().await;
        t.backend.fail_next_synthesis(FakeSynthesisFailure::StallAfter(1));

        let response = speech(
            &t.app,
            json!({"model": "tts-1", "input": "测试", "voice": XIAOXIAO, "stream": true}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(t.backend.open_streams(), 1);

        drop(response);
        assert_eq!(t.backend.open_streams(), 0);
        assert_eq!(t.backend.synthesize_calls(), 1);
    }

    // ========================================================================
    // 目录
    // ========================================================================

    #[tokio::test]
    async fn test_unloaded_catalog_is_service_unavailable() {
        let t = setup_with(GatewayOptions::default(), false).await;

        let response = speech(
            &t.app,
            json!({"model": "tts-1", "input": "测试", "voice": XIAOXIAO}),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(t.backend.synthesize_calls(), 0);
    }

    #[tokio::test]
    async fn test_refresh_replaces_voice_list() {
        let t = setup().await;
        t.backend.set_voices(vec![NativeVoice {
            id: "en-GB-SoniaNeural".to_string(),
            display_name: "Sonia".to_string(),
            locale: "en-GB".to_string(),
            gender: "Female".to_string(),
        }]);

        let response = send(&t.app, Method::POST, "/v1/voices/refresh", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["voice_count"], 1);
        assert_eq!(body["added"], 1);
        assert_eq!(body["removed"], 9);

        let voices = body_json(send(&t.app, Method::GET, "/v1/voices", None).await).await;
        let data = voices["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["id"], "en-GB-SoniaNeural");
        assert_eq!(data[0]["lang"], "en");
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_last_snapshot() {
        let t = setup().await;
        let before = body_json(send(&t.app, Method::GET, "/v1/voices", None).await).await;

        t.backend.set_listing_available(false);
        let response = send(&t.app, Method::POST, "/v1/voices/refresh", None).await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let after = body_json(send(&t.app, Method::GET, "/v1/voices", None).await).await;
        assert_eq!(before["data"], after["data"]);

        let response = speech(
            &t.app,
            json!({"model": "tts-1", "input": "测试", "voice": XIAOXIAO}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    // ========================================================================
    // 列表
    // ========================================================================

    #[tokio::test]
    async fn test_models_lists_exact_registry() {
        let t = setup().await;

        let response = send(&t.app, Method::GET, "/v1/models", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["object"], "list");
        let mut ids: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["id"].as_str().unwrap())
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["tts-1", "tts-1-hd"]);
    }

    #[tokio::test]
    async fn test_voices_include_chinese_and_english() {
        let t = setup().await;

        let response = send(&t.app, Method::GET, "/v1/voices", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let langs: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["lang"].as_str().unwrap())
            .collect();
        assert!(langs.iter().any(|l| l.starts_with("zh")));
        assert!(langs.iter().any(|l| l.starts_with("en")));
    }

    #[tokio::test]
    async fn test_voices_filter_by_language() {
        let t = setup().await;

        let body = body_json(send(&t.app, Method::GET, "/v1/voices?lang=en", None).await).await;
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert!(data.iter().all(|v| v["lang"] == "en"));
    }

    #[tokio::test]
    async fn test_health_reports_catalog() {
        let t = setup().await;

        let response = send(&t.app, Method::GET, "/health?backend=true", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["catalog"]["loaded"], true);
        assert_eq!(body["catalog"]["voice_count"], 9);
        assert_eq!(body["backend_reachable"], true);
    }

    // ========================================================================
    // 路由与鉴权
    // ========================================================================

    #[tokio::test]
    async fn test_unknown_path_and_wrong_method() {
        let t = setup().await;

        let response = send(&t.app, Method::GET, "/v1/nope", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"]["code"], "not_found");

        let response = send(&t.app, Method::GET, "/v1/audio/speech", None).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let allow = header_str(&response, "allow").unwrap_or_default().to_string();
        assert!(allow.contains("POST"));
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "method_not_allowed");
        assert_eq!(body["error"]["type"], "invalid_request_error");
    }

    #[tokio::test]
    async fn test_cors_preflight_allows_any_origin() {
        let options = GatewayOptions {
            api_key: Some("secret".to_string()),
            ..GatewayOptions::default()
        };
        let t = setup_with(options, true).await;

        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/v1/audio/speech")
            .header(header::ORIGIN, "https://reader.example")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization,content-type")
            .body(Body::empty())
            .unwrap();
        let response = t.app.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(header_str(&response, "access-control-allow-origin"), Some("*"));
        let allowed = header_str(&response, "access-control-allow-headers")
            .unwrap_or_default()
            .to_ascii_lowercase();
        assert!(allowed.contains("authorization"));
        assert!(allowed.contains("content-type"));

        let request = Request::builder()
            .uri("/health")
            .header(header::ORIGIN, "https://reader.example")
            .body(Body::empty())
            .unwrap();
        let response = t.app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(header_str(&response, "access-control-allow-origin"), Some("*"));
    }

    #[tokio::test]
    async fn test_api_key_required_when_configured() {
        let options = GatewayOptions {
            api_key: Some("secret".to_string()),
            ..GatewayOptions::default()
        };
        let t = setup_with(options, true).await;

        let response = send(&t.app, Method::GET, "/v1/models", None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await["error"]["type"],
            "authentication_error"
        );

        let request = Request::builder()
            .uri("/v1/models")
            .header(header::AUTHORIZATION, "Bearer wrong")
            .body(Body::empty())
            .unwrap();
        let response = t.app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let request = Request::builder()
            .uri("/v1/models")
            .header(header::AUTHORIZATION, "Bearer secret")
            .body(Body::empty())
            .unwrap();
        let response = t.app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(&t.app, Method::GET, "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
