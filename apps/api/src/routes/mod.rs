pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::session::handlers as sessions;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // One-shot analysis
        .route("/api/v1/analysis/roadmap", post(analysis::handle_roadmap))
        .route("/api/v1/analysis/insights", post(analysis::handle_insights))
        .route(
            "/api/v1/analysis/positioning",
            post(analysis::handle_positioning),
        )
        .route(
            "/api/v1/analysis/interview-questions",
            post(analysis::handle_interview_questions),
        )
        // Sessions
        .route("/api/v1/sessions", post(sessions::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(sessions::handle_get_session).delete(sessions::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/generate",
            post(sessions::handle_generate),
        )
        .route(
            "/api/v1/sessions/:id/positioning",
            post(sessions::handle_request_positioning),
        )
        .route(
            "/api/v1/sessions/:id/positioning/reset",
            post(sessions::handle_reset_positioning),
        )
        .route(
            "/api/v1/sessions/:id/interview",
            post(sessions::handle_request_interview),
        )
        .route("/api/v1/sessions/:id/tab", put(sessions::handle_set_tab))
        .route("/api/v1/sessions/:id/reset", post(sessions::handle_reset))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::llm_client::testing::FakeLlm;
    use crate::llm_client::TextCompletion;

    fn test_config() -> Config {
        Config {
            api_key: Some("test-key".into()),
            model: "gemini-2.5-flash".into(),
            api_base: "http://127.0.0.1:9".into(),
            port: 0,
            rust_log: "info".into(),
            llm_timeout_secs: 5,
            llm_max_attempts: 1,
            max_sessions: 8,
        }
    }

    fn app(llm: &Arc<FakeLlm>) -> Router {
        let llm = Arc::clone(llm) as Arc<dyn TextCompletion>;
        build_router(AppState::new(llm, test_config()))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    fn query_body() -> Value {
        json!({
            "role": "Data Engineer",
            "location": "Bengaluru",
            "level": "Junior",
            "goal": "Senior Data Engineer"
        })
    }

    #[tokio::test]
    async fn test_health() {
        let llm = Arc::new(FakeLlm::new());
        let (status, body) = send(&app(&llm), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "pathwise-api");
        assert_eq!(body["apiKeyConfigured"], true);
    }

    #[tokio::test]
    async fn test_roadmap_endpoint_returns_chart() {
        let llm = Arc::new(FakeLlm::new());
        llm.reply(
            "Senior Career Data Scientist",
            r#"{"roleSummary": "ok", "salaryTrends": [{"label": "Entry", "value": 850000}]}"#,
        );

        let (status, body) = send(
            &app(&llm),
            "POST",
            "/api/v1/analysis/roadmap",
            Some(query_body()),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["roleSummary"], "ok");
        assert_eq!(body["salaryChart"][0]["display"], "850k");
        assert_eq!(body["salaryView"], "annual");
        let requests = llm.requests.lock().unwrap();
        assert!(requests[0].prompt.contains(r#"Complexity "Intermediate""#));
    }

    #[tokio::test]
    async fn test_roadmap_endpoint_monthly_view() {
        let llm = Arc::new(FakeLlm::new());
        llm.reply(
            "Senior Career Data Scientist",
            r#"{"salaryTrends": [{"label": "Entry", "value": 0}, {"label": "Mid", "value": 2400000}]}"#,
        );

        let (status, body) = send(
            &app(&llm),
            "POST",
            "/api/v1/analysis/roadmap?view=monthly",
            Some(query_body()),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["salaryCaption"], "Monthly Est.");
        let chart = body["salaryChart"].as_array().unwrap();
        assert_eq!(chart.len(), 1);
        assert_eq!(chart[0]["label"], "Mid");
        assert_eq!(chart[0]["value"], 200_000.0);
    }

    #[tokio::test]
    async fn test_blank_field_is_rejected_without_model_call() {
        let llm = Arc::new(FakeLlm::new());
        let mut body = query_body();
        body["goal"] = json!("  ");

        let (status, body) = send(&app(&llm), "POST", "/api/v1/analysis/roadmap", Some(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_model_failure_is_bad_gateway() {
        let llm = Arc::new(FakeLlm::new());
        let (status, body) = send(
            &app(&llm),
            "POST",
            "/api/v1/analysis/interview-questions",
            Some(json!({"role": "SRE"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(
            body["error"]["message"],
            "Unable to analyze career data. Please verify inputs and try again."
        );
    }

    #[tokio::test]
    async fn test_positioning_endpoint_includes_summary() {
        let llm = Arc::new(FakeLlm::new());
        llm.reply(
            "Strategic Career Advisor",
            r#"{"readinessScore": 85, "verdict": "**Strong** fit"}"#,
        );
        let request = json!({
            "query": query_body(),
            "profile": {
                "education": "Bachelors",
                "skills": "Python, SQL",
                "experienceLevel": "1-3 Years",
                "experience": "Pipelines"
            }
        });

        let (status, body) = send(
            &app(&llm),
            "POST",
            "/api/v1/analysis/positioning",
            Some(request),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["readinessScore"], 85.0);
        assert_eq!(body["summary"]["label"], "Highly Strategic");
        assert_eq!(body["summary"]["verdictHtml"], "<strong>Strong</strong> fit");
    }

    #[tokio::test]
    async fn test_session_flow() {
        let llm = Arc::new(FakeLlm::new());
        llm.reply("Senior Career Data Scientist", r#"{"roleSummary": "ok"}"#)
            .reply("local tech ecosystem", r#"{"topCities": []}"#);
        let app = app(&llm);

        let (status, created) = send(&app, "POST", "/api/v1/sessions", None).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["sessionId"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            "POST",
            &format!("/api/v1/sessions/{id}/interview"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "UNPROCESSABLE_ENTITY");

        let (status, body) = send(
            &app,
            "POST",
            &format!("/api/v1/sessions/{id}/generate"),
            Some(query_body()),
        )
        .await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body["state"]["roadmap"]["loading"], true);
        assert_eq!(body["status"]["roadmap"], "loading");

        let mut state = Value::Null;
        for _ in 0..100 {
            let (_, body) = send(&app, "GET", &format!("/api/v1/sessions/{id}"), None).await;
            state = body["state"].clone();
            if state["insights"]["loading"] == false {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(state["roadmap"]["data"]["data"]["roleSummary"], "ok");
        assert!(state["insights"]["data"].is_object());

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/api/v1/sessions/{id}/tab"),
            Some(json!({"tab": "companies"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"]["activeTab"], "companies");

        let (status, _) = send(&app, "DELETE", &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, "GET", &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
