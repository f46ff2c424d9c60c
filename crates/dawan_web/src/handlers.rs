use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SendDigestRequest {
    pub recipients: Vec<String>,
}

pub async fn send_digest(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<SendDigestRequest>,
) -> impl IntoResponse {
    if let Some(expected) = &state.trigger_secret {
        let provided = headers
            .get("x-digest-secret")
            .and_then(|v| v.to_str().ok());
        if provided != Some(expected.as_str()) {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "missing or invalid trigger secret"})),
            )
                .into_response();
        }
    }

    if request.recipients.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "no recipients given"})),
        )
            .into_response();
    }

    match state.job.run(&request.recipients).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => {
            warn!("digest run failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": e.to_string()})),
            )
                .into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UnsubscribeParams {
    #[serde(default)]
    pub token: String,
}

pub async fn unsubscribe(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UnsubscribeParams>,
) -> impl IntoResponse {
    match state.tokens.verify(&params.token) {
        Ok(verified) => {
            // Subscriber flagging lives in the CMS; here the verified email
            // is logged and the reader gets a confirmation page.
            info!("🪪 verified unsubscribe for {}", verified.email);
            Html(
                "<html><body><h1>Waad ka baxday warsidaha Dawan TV.</h1><p>Waan ka xunnahay inaad na barakacday.</p></body></html>"
                    .to_string(),
            )
            .into_response()
        }
        Err(e) => {
            warn!("rejected unsubscribe token: {}", e);
            (
                StatusCode::BAD_REQUEST,
                Html("<html><body><h1>Link-gu waa khalad ama wuu dhacay.</h1></body></html>".to_string()),
            )
                .into_response()
        }
    }
}
