use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use tally_rank::top_n;
use tally_types::{ScoreRecord, Submission};

use crate::error::ApiError;
use crate::router::AppState;

/// Plain acknowledgement body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Health check response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".into(),
            version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}

pub async fn home_handler() -> Json<MessageResponse> {
    Json(MessageResponse::new("Tally leaderboard API is running"))
}

/// Health check handler.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// `GET /scores`: the current leaderboard.
pub async fn scores_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<ScoreRecord>>, ApiError> {
    let store = Arc::clone(&state.store);
    let records = tokio::task::spawn_blocking(move || store.read_all()).await?;
    Ok(Json(top_n(&records, state.top_n)))
}

/// `POST /submit`: validate and persist one score.
pub async fn submit_handler(
    State(state): State<AppState>,
    Json(submission): Json<Submission>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let record = submission.validate()?;
    let (name, score) = (record.name.clone(), record.score);

    let store = Arc::clone(&state.store);
    tokio::task::spawn_blocking(move || store.append(record)).await??;

    info!(%name, score, "score saved");
    Ok((StatusCode::CREATED, Json(MessageResponse::new("score saved"))))
}
