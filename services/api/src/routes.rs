use crate::infra::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use deal_score::scoring::{DealScorer, ScoreRequest, ScoreResult, ScoringConfig};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

pub(crate) fn deal_score_router(scorer: Arc<DealScorer>) -> Router {
    Router::new()
        .route("/api/v1/deal-score", post(score_endpoint))
        .route("/api/v1/deal-score/config", get(config_endpoint))
        .with_state(scorer)
}

pub(crate) fn with_service_routes(scorer: Arc<DealScorer>) -> Router {
    deal_score_router(scorer)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn score_endpoint(
    State(scorer): State<Arc<DealScorer>>,
    Json(request): Json<ScoreRequest>,
) -> Json<ScoreResult> {
    let result = scorer.score_request(&request);
    info!(
        score = result.score,
        confidence = result.confidence,
        "deal scored"
    );
    Json(result)
}

pub(crate) async fn config_endpoint(State(scorer): State<Arc<DealScorer>>) -> Json<ScoringConfig> {
    Json(scorer.config().clone())
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Acquire);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn app(ready: bool) -> Router {
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_service_routes(Arc::new(DealScorer::default())).layer(Extension(state))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    }

    async fn read_json_body(response: axum::response::Response) -> Value {
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json body")
    }

    #[tokio::test]
    async fn scores_inputs_payloads() {
        let response = app(true)
            .oneshot(post_json(
                "/api/v1/deal-score",
                json!({
                    "inputs": {
                        "purchasePrice": 800000,
                        "askingPrice": 820000,
                        "yieldPercent": 5.5,
                        "cashFlowWeekly": 150
                    }
                }),
            ))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert_eq!(payload["subs"].as_array().map(Vec::len), Some(5));
        assert_eq!(payload["confidenceLabel"], "Medium");
        assert!(payload.get("scoreRange").is_some());
    }

    #[tokio::test]
    async fn scores_report_payloads() {
        let response = app(true)
            .oneshot(post_json(
                "/api/v1/deal-score",
                json!({
                    "report": {
                        "valueSnapshot": { "indicativeMidpoint": "650000", "askingPrice": 680000 }
                    }
                }),
            ))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert_eq!(payload["subs"][0]["available"], true);
        assert_eq!(payload["confidenceLabel"], "Low");
    }

    #[tokio::test]
    async fn rejects_payloads_without_a_source() {
        let response = app(true)
            .oneshot(post_json("/api/v1/deal-score", json!({ "deal": {} })))
            .await
            .expect("route executes");

        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn exposes_active_config() {
        let response = app(true)
            .oneshot(
                Request::get("/api/v1/deal-score/config")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert_eq!(payload["weights"]["cashFlow"], 0.3);
    }

    #[tokio::test]
    async fn readiness_reflects_startup_flag() {
        let response = app(false)
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = app(true)
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn health_and_metrics_respond() {
        let response = app(true)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);

        let response = app(true)
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }
}
