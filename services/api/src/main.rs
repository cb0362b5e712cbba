mod coverage;
mod error;
mod export;
mod extractors;
mod interview;
mod risk;
mod session;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Json, Router,
};
use kanon_classifier::{ChatClient, ChatClientConfig, ChatCompletion, RiskEngine};
use kanon_common::types::ServiceInfo;
use kanon_config::{init_tracing, AppConfig};
use tower_http::cors::CorsLayer;

use crate::interview::engine::{CannedResponses, ResponseSource};
use crate::session::store::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub store: SessionStore,
    pub engine: Arc<RiskEngine<Box<dyn ChatCompletion>>>,
    /// Server-side credential used when a session carries none.
    pub default_model_key: Option<String>,
    pub response_source: Arc<dyn ResponseSource>,
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn info() -> Json<ServiceInfo> {
    Json(ServiceInfo::new("kanon-api"))
}

fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            "http://localhost:3000".parse::<HeaderValue>().unwrap(),
            "http://127.0.0.1:3000".parse::<HeaderValue>().unwrap(),
        ])
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            "x-session-id".parse().unwrap(),
        ]);

    Router::new()
        .route("/health", get(health))
        .route("/info", get(info))
        .merge(session::router())
        .merge(risk::router())
        .merge(interview::router())
        .merge(coverage::router())
        .merge(export::router())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    let config = AppConfig::from_env().expect("failed to load config");
    init_tracing(&config.log_level);
    tracing::info!(service = "kanon-api", "starting");

    let chat_config = ChatClientConfig::from_env();
    let default_model_key = chat_config.api_key.clone();
    let chat = ChatClient::new(chat_config).expect("failed to build chat client");

    let state = AppState {
        store: SessionStore::default(),
        engine: Arc::new(RiskEngine::new(
            Box::new(chat) as Box<dyn ChatCompletion>
        )),
        default_model_key,
        response_source: Arc::new(CannedResponses),
    };

    let app = build_router(state);
    let addr: SocketAddr = config.bind_addr().parse().expect("invalid bind address");

    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind");
    axum::serve(listener, app).await.expect("server error");
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use kanon_classifier::ChatClientError;
    use tower::ServiceExt;
    use uuid::Uuid;

    struct MockChat {
        reply: Option<String>,
    }

    #[async_trait]
    impl ChatCompletion for MockChat {
        async fn complete(
            &self,
            _api_key: &str,
            _system_prompt: &str,
            _policy_text: &str,
        ) -> Result<String, ChatClientError> {
            match &self.reply {
                Some(content) => Ok(content.clone()),
                None => Err(ChatClientError::Transport("mock offline".to_string())),
            }
        }
    }

    fn test_state(model_reply: Option<&str>) -> AppState {
        let chat = MockChat {
            reply: model_reply.map(str::to_string),
        };
        AppState {
            store: SessionStore::default(),
            engine: Arc::new(RiskEngine::new(
                Box::new(chat) as Box<dyn ChatCompletion>
            )),
            default_model_key: None,
            response_source: Arc::new(CannedResponses),
        }
    }

    fn json_request(method: &str, uri: &str, session: Option<Uuid>, body: serde_json::Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json");
        if let Some(id) = session {
            builder = builder.header("x-session-id", id.to_string());
        }
        builder
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    }

    fn get_request(uri: &str, session: Option<Uuid>) -> Request<Body> {
        let mut builder = Request::get(uri);
        if let Some(id) = session {
            builder = builder.header("x-session-id", id.to_string());
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn read_body(resp: axum::http::Response<Body>) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn read_body_string(resp: axum::http::Response<Body>) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn create_session(app: &Router, allow_fallback: bool, model_key: Option<&str>) -> Uuid {
        let mut body = serde_json::json!({
            "app_name": "HoloFit",
            "app_description": "VR fitness coaching app",
            "region": "EU",
            "allow_fallback": allow_fallback
        });
        if let Some(key) = model_key {
            body["model_key"] = serde_json::json!(key);
        }
        let resp = app
            .clone()
            .oneshot(json_request("POST", "/sessions", None, body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = read_body(resp).await;
        body["id"].as_str().unwrap().parse().unwrap()
    }

    async fn set_policy(app: &Router, session: Uuid, text: &str) {
        let resp = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/session/policy",
                Some(session),
                serde_json::json!({ "text": text }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    // ── Health / Info ───────────────────────────────────────────────

    #[tokio::test]
    async fn health_returns_ok() {
        let app = build_router(test_state(None));
        let resp = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = read_body(resp).await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn info_returns_service_name() {
        let app = build_router(test_state(None));
        let resp = app
            .oneshot(Request::get("/info").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = read_body(resp).await;
        assert_eq!(body["name"], "kanon-api");
    }

    // ── Session lifecycle ───────────────────────────────────────────

    #[tokio::test]
    async fn create_session_empty_name_returns_400() {
        let app = build_router(test_state(None));
        let body = serde_json::json!({
            "app_name": "  ",
            "app_description": "something",
            "allow_fallback": true
        });
        let resp = app
            .oneshot(json_request("POST", "/sessions", None, body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = read_body(resp).await;
        assert!(body["error"].as_str().unwrap().contains("app_name"));
    }

    #[tokio::test]
    async fn create_session_empty_description_returns_400() {
        let app = build_router(test_state(None));
        let body = serde_json::json!({
            "app_name": "HoloFit",
            "app_description": "",
            "allow_fallback": true
        });
        let resp = app
            .oneshot(json_request("POST", "/sessions", None, body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = read_body(resp).await;
        assert!(body["error"].as_str().unwrap().contains("app_description"));
    }

    #[tokio::test]
    async fn session_snapshot_hides_model_key() {
        let app = build_router(test_state(None));
        let id = create_session(&app, true, Some("sk-secret")).await;

        let resp = app
            .oneshot(get_request("/session", Some(id)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let raw = read_body_string(resp).await;
        assert!(!raw.contains("sk-secret"));

        let body: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(body["app_name"], "HoloFit");
        assert_eq!(body["has_model_key"], true);
        assert_eq!(body["policy_set"], false);
        assert!(body.get("model_key").is_none());
    }

    #[tokio::test]
    async fn missing_session_header_returns_400() {
        let app = build_router(test_state(None));
        let resp = app
            .oneshot(get_request("/session", None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = read_body(resp).await;
        assert!(body["error"].as_str().unwrap().contains("x-session-id"));
    }

    #[tokio::test]
    async fn unknown_session_returns_404() {
        let app = build_router(test_state(None));
        let resp = app
            .oneshot(get_request("/session", Some(Uuid::new_v4())))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    // ── Classification ──────────────────────────────────────────────

    #[tokio::test]
    async fn classify_without_policy_returns_400() {
        let app = build_router(test_state(None));
        let id = create_session(&app, true, None).await;

        let resp = app
            .oneshot(json_request(
                "POST",
                "/session/classify",
                Some(id),
                serde_json::json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = read_body(resp).await;
        assert!(body["error"].as_str().unwrap().contains("policy"));
    }

    #[tokio::test]
    async fn classify_no_key_fallback_disallowed_returns_400() {
        let app = build_router(test_state(None));
        let id = create_session(&app, false, None).await;
        set_policy(&app, id, "We collect eye tracking and gaze data.").await;

        let resp = app
            .oneshot(json_request(
                "POST",
                "/session/classify",
                Some(id),
                serde_json::json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = read_body(resp).await;
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("fallback is disabled"));
    }

    #[tokio::test]
    async fn classify_fallback_high_risk_selects_strict_framework() {
        let app = build_router(test_state(None));
        let id = create_session(&app, true, None).await;
        set_policy(
            &app,
            id,
            "We use facial recognition, eye tracking, heart rate and voice recording.",
        )
        .await;

        let resp = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/session/classify",
                Some(id),
                serde_json::json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = read_body(resp).await;
        assert_eq!(body["path"], "fallback_no_credential");
        assert_eq!(body["verdict"]["level"], "high-risk");
        assert_eq!(body["verdict"]["usedFallback"], true);
        assert!(body["notice"]
            .as_str()
            .unwrap()
            .contains("no API key provided"));
        assert_eq!(
            body["framework"]["name"],
            "High Risk AI/VR Compliance Checklist"
        );
        assert_eq!(body["framework"]["items"].as_array().unwrap().len(), 20);
    }

    #[tokio::test]
    async fn classify_model_low_risk_selects_standard_framework() {
        let app = build_router(test_state(Some(
            r#"{"is_high_risk_signal": false, "signals": [], "rationale": "No Annex III category applies."}"#,
        )));
        let id = create_session(&app, true, Some("sk-test")).await;
        set_policy(&app, id, "We only store display preferences locally.").await;

        let resp = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/session/classify",
                Some(id),
                serde_json::json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = read_body(resp).await;
        assert_eq!(body["path"], "model");
        assert_eq!(body["verdict"]["level"], "low-risk");
        assert_eq!(body["verdict"]["usedFallback"], false);
        assert!(body["notice"].is_null());
        assert_eq!(
            body["framework"]["name"],
            "Standard VR/AR Compliance Checklist"
        );
        assert_eq!(body["framework"]["items"].as_array().unwrap().len(), 17);
    }

    #[tokio::test]
    async fn classify_transport_failure_carries_fallback_notice() {
        let app = build_router(test_state(None));
        let id = create_session(&app, false, Some("sk-test")).await;
        set_policy(&app, id, "We collect eye tracking data.").await;

        let resp = app
            .oneshot(json_request(
                "POST",
                "/session/classify",
                Some(id),
                serde_json::json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = read_body(resp).await;
        assert_eq!(body["path"], "fallback_transport");
        assert!(body["notice"]
            .as_str()
            .unwrap()
            .ends_with("Falling back to keyword detection."));
    }

    #[tokio::test]
    async fn checklist_requires_classification() {
        let app = build_router(test_state(None));
        let id = create_session(&app, true, None).await;

        let resp = app
            .oneshot(get_request("/session/checklist", Some(id)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn scenarios_returns_fixed_list() {
        let app = build_router(test_state(None));
        let id = create_session(&app, true, None).await;

        let resp = app
            .oneshot(get_request("/session/scenarios", Some(id)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = read_body(resp).await;
        assert_eq!(body["scenarios"].as_array().unwrap().len(), 5);
        assert_eq!(body["scenarios"][0]["title"], "Data Collection Consent");
    }

    // ── Full wizard, fallback path ──────────────────────────────────

    #[tokio::test]
    async fn wizard_end_to_end_over_fallback() {
        let app = build_router(test_state(None));
        let id = create_session(&app, true, None).await;
        set_policy(&app, id, "We process eye tracking data during sessions.").await;

        // One keyword match: potential risk, strict checklist.
        let resp = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/session/classify",
                Some(id),
                serde_json::json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = read_body(resp).await;
        assert_eq!(body["verdict"]["level"], "potential-risk");

        let resp = app
            .clone()
            .oneshot(get_request("/session/checklist", Some(id)))
            .await
            .unwrap();
        let body = read_body(resp).await;
        assert_eq!(body["items"].as_array().unwrap().len(), 20);
        assert_eq!(body["risk_path"], "HIGH RISK PATH");

        // Two interview turns, one answered and one skipped.
        let resp = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/session/interview/next",
                Some(id),
                serde_json::json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = read_body(resp).await;
        assert!(body["question"].as_str().unwrap().contains("lawful basis"));
        assert!(body["reply"].as_str().is_some());
        assert_eq!(body["done"], false);

        let resp = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/session/interview/next",
                Some(id),
                serde_json::json!({ "skip": true }),
            ))
            .await
            .unwrap();
        let body = read_body(resp).await;
        assert!(body["reply"].is_null());

        let resp = app
            .clone()
            .oneshot(get_request("/session/interview/transcript", Some(id)))
            .await
            .unwrap();
        let body = read_body(resp).await;
        // Turn 1 question, reply, plus the skipped item's question. The
        // canned first reply is uncertain, so a conflict turn appears too.
        assert_eq!(body["transcript"].as_array().unwrap().len(), 4);
        assert_eq!(body["conflicts"].as_array().unwrap().len(), 1);
        assert_eq!(body["facts"].as_array().unwrap().len(), 1);

        let resp = app
            .clone()
            .oneshot(get_request("/session/coverage", Some(id)))
            .await
            .unwrap();
        let body = read_body(resp).await;
        assert_eq!(body["rows"].as_array().unwrap().len(), 20);
        assert_eq!(body["progress"]["total_items"], 20);
        assert_eq!(body["progress"]["completed"], 1);
        assert_eq!(body["progress"]["in_progress"], 1);

        let resp = app
            .clone()
            .oneshot(get_request("/session/redlines", Some(id)))
            .await
            .unwrap();
        let body = read_body(resp).await;
        assert_eq!(body["redlines"].as_array().unwrap().len(), 3);

        // Exports.
        let resp = app
            .clone()
            .oneshot(get_request("/session/export/project", Some(id)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp
            .headers()
            .get("content-disposition")
            .unwrap()
            .to_str()
            .unwrap()
            .contains("_project.json"));
        let project = read_body(resp).await;
        assert_eq!(project["app_name"], "HoloFit");
        assert_eq!(project["verdict"]["level"], "potential-risk");
        assert!(project.get("model_key").is_none());

        let resp = app
            .clone()
            .oneshot(get_request("/session/export/transcript", Some(id)))
            .await
            .unwrap();
        assert_eq!(
            resp.headers().get("content-type").unwrap().to_str().unwrap(),
            "text/markdown"
        );
        let markdown = read_body_string(resp).await;
        assert!(markdown.starts_with("# VR/AR Compliance Interview Transcript"));
        assert!(markdown.contains("### Turn 1 - INTERVIEWER"));
        assert!(markdown.contains("## Conflicts Summary"));

        let resp = app
            .clone()
            .oneshot(get_request("/session/export/coverage", Some(id)))
            .await
            .unwrap();
        assert_eq!(
            resp.headers().get("content-type").unwrap().to_str().unwrap(),
            "text/csv"
        );
        let csv = read_body_string(resp).await;
        assert!(csv.starts_with("Item ID,Description,Status,Questions Asked,Evidence\n"));
        assert_eq!(csv.lines().count(), 21);

        let resp = app
            .clone()
            .oneshot(get_request("/session/export/redlines", Some(id)))
            .await
            .unwrap();
        let markdown = read_body_string(resp).await;
        assert!(markdown.starts_with("# VR/AR Privacy Policy Redlines"));
        assert!(markdown.contains("## 1. Legal Basis: Clarify Lawful Basis for Processing"));
    }

    #[tokio::test]
    async fn reclassification_resets_interview_state() {
        let app = build_router(test_state(None));
        let id = create_session(&app, true, None).await;
        set_policy(&app, id, "We process eye tracking data.").await;

        app.clone()
            .oneshot(json_request(
                "POST",
                "/session/classify",
                Some(id),
                serde_json::json!({}),
            ))
            .await
            .unwrap();
        app.clone()
            .oneshot(json_request(
                "POST",
                "/session/interview/next",
                Some(id),
                serde_json::json!({}),
            ))
            .await
            .unwrap();

        // New policy, new classification: the transcript starts over.
        set_policy(&app, id, "We only store display preferences.").await;
        app.clone()
            .oneshot(json_request(
                "POST",
                "/session/classify",
                Some(id),
                serde_json::json!({}),
            ))
            .await
            .unwrap();

        let resp = app
            .oneshot(get_request("/session/interview/transcript", Some(id)))
            .await
            .unwrap();
        let body = read_body(resp).await;
        assert_eq!(body["transcript"].as_array().unwrap().len(), 0);
        assert_eq!(body["facts"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn interview_completes_after_all_items() {
        let app = build_router(test_state(Some(
            r#"{"is_high_risk_signal": false, "signals": [], "rationale": "ok"}"#,
        )));
        let id = create_session(&app, true, Some("sk-test")).await;
        set_policy(&app, id, "Local preferences only.").await;
        app.clone()
            .oneshot(json_request(
                "POST",
                "/session/classify",
                Some(id),
                serde_json::json!({}),
            ))
            .await
            .unwrap();

        // Standard framework has 17 items; the 18th step reports done.
        for _ in 0..17 {
            let resp = app
                .clone()
                .oneshot(json_request(
                    "POST",
                    "/session/interview/next",
                    Some(id),
                    serde_json::json!({}),
                ))
                .await
                .unwrap();
            let body = read_body(resp).await;
            assert_eq!(body["done"], false);
        }

        let resp = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/session/interview/next",
                Some(id),
                serde_json::json!({}),
            ))
            .await
            .unwrap();
        let body = read_body(resp).await;
        assert_eq!(body["done"], true);
        assert!(body["question"].is_null());
    }
}
