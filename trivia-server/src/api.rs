use crate::answers::Stats;
use crate::error::ApiError;
use crate::questions::{past_questions, question_for, PastQuestion, Question};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::IntoResponse,
    routing::{get, get_service, post, MethodRouter},
    Json, Router,
};
use bytes::Bytes;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::{debug, error, info, warn};

pub const MIN_ANSWER: i64 = 1;
pub const MAX_ANSWER: i64 = 100_000;

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: &'static str,
    pub id: i64,
}

pub fn router(state: Arc<AppState>) -> Router {
    let index = get_service(ServeFile::new(&state.index_path)).handle_error(handle_io_error);
    let assets: MethodRouter =
        get_service(ServeDir::new(&state.public_dir)).handle_error(handle_io_error);

    Router::new()
        .route("/", index)
        .route("/api/questions", get(questions_handler))
        .route("/api/questions/today", get(today_question_handler))
        .route("/api/past-questions", get(past_questions_handler))
        .route("/api/answers", post(submit_answer_handler))
        .route("/api/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .fallback_service(assets)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn handle_io_error(err: std::io::Error) -> impl IntoResponse {
    error!("Failed to serve static file: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Failed to serve file" })),
    )
}

pub async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Full question file; the page picks today's entry itself.
pub async fn questions_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Question>>, ApiError> {
    let questions = state.questions.load().await.map_err(ApiError::questions)?;
    Ok(Json(questions))
}

pub async fn today_question_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Question>, ApiError> {
    let questions = state.questions.load().await.map_err(ApiError::questions)?;
    let today = state.clock.today();
    match question_for(&questions, today) {
        Some(q) => Ok(Json(q.clone())),
        None => {
            debug!(%today, "No question scheduled");
            Err(ApiError::NotFound("No question available for today".into()))
        }
    }
}

pub async fn past_questions_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PastQuestion>>, ApiError> {
    let questions = state.questions.load().await.map_err(ApiError::questions)?;
    Ok(Json(past_questions(&questions, state.clock.today())))
}

pub async fn submit_answer_handler(
    State(state): State<Arc<AppState>>,
    req: Request<Body>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let mut req = req;
    let body_bytes = to_bytes(req.body_mut(), state.max_request_body_bytes).await?;

    let body: Value = match serde_json::from_slice(&body_bytes) {
        Ok(v) => v,
        Err(e) => {
            warn!("Failed to parse answer body: {}", e);
            return Err(ApiError::InvalidAnswer);
        }
    };
    let answer = parse_answer(&body).ok_or(ApiError::InvalidAnswer)?;

    let id = state
        .answers
        .record(answer)
        .await
        .map_err(ApiError::storage("Failed to save answer"))?;
    info!(id, answer, "Recorded answer");

    Ok(Json(SubmitResponse {
        success: true,
        message: "Answer saved successfully",
        id,
    }))
}

pub async fn stats_handler(State(state): State<Arc<AppState>>) -> Result<Json<Stats>, ApiError> {
    let stats = state
        .answers
        .stats()
        .await
        .map_err(ApiError::storage("Failed to get stats"))?;
    Ok(Json(stats))
}

/// Extracts an integral `answer` within the accepted range.
///
/// JSON numbers written with a fractional part of zero (`42.0`) are accepted,
/// anything else that is not a number is not.
fn parse_answer(body: &Value) -> Option<i64> {
    let raw = body.get("answer")?;
    let value = match raw.as_i64() {
        Some(v) => v,
        None => {
            let f = raw.as_f64()?;
            if f.fract() != 0.0 {
                return None;
            }
            // saturating cast; out-of-range values fail the bounds check below
            f as i64
        }
    };
    (MIN_ANSWER..=MAX_ANSWER).contains(&value).then_some(value)
}

// Helper to read the full body with size limit
async fn to_bytes(body: &mut Body, max_size: usize) -> Result<Bytes, ApiError> {
    use axum::body::HttpBody;
    use bytes::BytesMut;

    let mut buf = BytesMut::new();
    let mut total_size: usize = 0;

    while let Some(chunk_res) = body.data().await {
        let chunk = match chunk_res {
            Ok(chunk) => chunk,
            Err(e) => {
                warn!("Failed to read request body: {}", e);
                return Err(ApiError::InvalidAnswer);
            }
        };

        total_size = match total_size.checked_add(chunk.len()) {
            Some(new_size) if new_size <= max_size => new_size,
            _ => return Err(ApiError::PayloadTooLarge),
        };

        buf.extend_from_slice(&chunk);
    }

    Ok(buf.freeze())
}
