use crate::questions::QuestionError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Answer must be a number between 1 and 100,000")]
    InvalidAnswer,

    #[error("Request body too large")]
    PayloadTooLarge,

    #[error("{0}")]
    NotFound(String),

    #[error("{context}")]
    Storage {
        context: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("{context}")]
    Questions {
        context: &'static str,
        #[source]
        source: QuestionError,
    },
}

impl ApiError {
    pub fn storage(context: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| ApiError::Storage { context, source }
    }

    /// Maps a question file failure to the message the client sees.
    pub fn questions(source: QuestionError) -> Self {
        let context = match source {
            QuestionError::Read { .. } => "Failed to load questions",
            QuestionError::Parse { .. } => "Failed to parse questions",
        };
        ApiError::Questions { context, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidAnswer => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Storage { .. } | ApiError::Questions { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Storage { context, source } => error!("{}: {}", context, source),
            ApiError::Questions { context, source } => error!("{}: {}", context, source),
            other => warn!(%status, "Rejected request: {}", other),
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = hyper::body::to_bytes(resp.into_body())
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn invalid_answer_is_bad_request_with_message() {
        let resp = ApiError::InvalidAnswer.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(resp).await,
            json!({ "error": "Answer must be a number between 1 and 100,000" })
        );
    }

    #[tokio::test]
    async fn storage_error_hides_driver_details() {
        let err = ApiError::storage("Failed to save answer")(sqlx::Error::PoolClosed);
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(resp).await,
            json!({ "error": "Failed to save answer" })
        );
    }

    #[test]
    fn question_errors_map_to_distinct_messages() {
        let read = ApiError::questions(QuestionError::Read {
            path: PathBuf::from("questions.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        });
        assert_eq!(read.to_string(), "Failed to load questions");
        assert_eq!(read.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let parse = ApiError::questions(QuestionError::Parse {
            path: PathBuf::from("questions.json"),
            source: parse_err,
        });
        assert_eq!(parse.to_string(), "Failed to parse questions");
    }
}
