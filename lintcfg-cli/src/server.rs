//! HTTP server for lintcfg - the lint desk that answers "what should I check?" (made by FontLab https://www.fontlab.com/)
//!
//! The spec is parsed once at startup and shared by every request. Callers
//! post font metadata and get back the tests each font should run.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use log::info;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::task;

use lintcfg_core::document::SpecDocument;
use lintcfg_core::font::FontInfo;
use lintcfg_core::lint::{resolve_fonts, FontTests, ResolveOptions};

/// Fonts waiting to hear which checks apply to them.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResolveRequest {
    /// Metadata for each font, in the order results should come back
    pub fonts: Vec<FontInfo>,
    /// Number of parallel workers for this request
    pub jobs: Option<usize>,
    /// Also list the tests each font should skip
    pub disabled: bool,
}

/// One verdict per requested font.
#[derive(Debug, Serialize, Deserialize)]
pub struct ResolveResponse {
    pub results: Vec<FontTests>,
}

/// Bind `bind` and serve until the process is stopped.
pub async fn serve(bind: &str, doc: Arc<SpecDocument>) -> Result<()> {
    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("binding HTTP server to {bind}"))?;
    info!("serving {} spec blocks on {bind}", doc.len());

    axum::serve(listener, router(doc))
        .await
        .context("serving HTTP")?;
    Ok(())
}

/// Routes: health check, catalog listing, resolution.
pub fn router(doc: Arc<SpecDocument>) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/tags", get(tags_handler))
        .route("/resolve", post(resolve_handler))
        .with_state(doc)
}

async fn tags_handler(State(doc): State<Arc<SpecDocument>>) -> Json<Vec<String>> {
    Json(
        doc.catalog()
            .entries()
            .iter()
            .map(|entry| entry.tag.clone())
            .collect(),
    )
}

async fn resolve_handler(
    State(doc): State<Arc<SpecDocument>>,
    Json(req): Json<ResolveRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.fonts.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "at least one font is required".to_string(),
        ));
    }

    if matches!(req.jobs, Some(0)) {
        return Err((
            StatusCode::BAD_REQUEST,
            "jobs must be at least 1 when provided".to_string(),
        ));
    }

    let opts = ResolveOptions {
        jobs: req.jobs,
        include_disabled: req.disabled,
    };

    // resolution is CPU-bound; keep it off the async workers
    let results = task::spawn_blocking(move || resolve_fonts(&doc, &req.fonts, &opts))
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("task join error: {e}"),
            )
        })?
        .map_err(to_bad_request)?;

    Ok(Json(ResolveResponse { results }))
}

fn to_bad_request(err: impl std::fmt::Display) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::json;
    use tower::util::ServiceExt;

    fn app() -> Router {
        let doc = SpecDocument::parse("vendor Adobe\ndisable name\n").expect("parse spec");
        router(Arc::new(doc))
    }

    async fn post_json(payload: serde_json::Value) -> (StatusCode, Vec<u8>) {
        let request = Request::post("/resolve")
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn resolve_endpoint_applies_spec() {
        let payload = json!({
            "fonts": [
                {"filename": "A.otf", "vendor": "Adobe"},
                {"filename": "B.ttf", "vendor": "Monotype"}
            ],
            "disabled": true,
            "jobs": 1
        });

        let (status, body) = post_json(payload).await;
        assert_eq!(status, StatusCode::OK);

        let parsed: ResolveResponse = serde_json::from_slice(&body).expect("parse response");
        assert_eq!(parsed.results.len(), 2);
        assert!(!parsed.results[0].tests.contains(&"name/copyright".to_string()));
        assert!(parsed.results[0]
            .disabled
            .as_ref()
            .expect("disabled listed")
            .contains(&"name".to_string()));
        assert!(parsed.results[1].tests.contains(&"name/copyright".to_string()));
    }

    #[tokio::test]
    async fn resolve_endpoint_requires_fonts() {
        let (status, body) = post_json(json!({"fonts": []})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let text = String::from_utf8(body).expect("utf8 body");
        assert!(text.contains("at least one font is required"), "body: {text}");
    }

    #[tokio::test]
    async fn resolve_endpoint_rejects_zero_jobs() {
        let (status, body) = post_json(json!({"fonts": [{"filename": "A.ttf"}], "jobs": 0})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let text = String::from_utf8(body).expect("utf8 body");
        assert!(text.contains("jobs must be at least 1"), "body: {text}");
    }

    #[tokio::test]
    async fn tags_endpoint_lists_catalog_in_outline_order() {
        let request = Request::get("/tags").body(Body::empty()).unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let tags: Vec<String> = serde_json::from_slice(&body).expect("parse tags");
        assert_eq!(tags.first().map(String::as_str), Some("name"));
        assert_eq!(tags.last().map(String::as_str), Some("reachable"));
    }

    #[tokio::test]
    async fn health_endpoint_returns_ok() {
        let request = Request::get("/health").body(Body::empty()).unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body.as_ref(), b"ok");
    }
}
