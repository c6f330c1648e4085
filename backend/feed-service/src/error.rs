/// Error types for feed-service
///
/// `AppError` is the request-level error converted into HTTP responses.
/// `FeedQueryError` is the typed result of the feed page queries; its
/// `RankingUnavailable` kind is the one condition the degradation
/// supervisor retries on.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

/// Result type for feed-service operations
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        HttpResponse::build(status).json(serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }))
    }
}

/// Errors from the feed page queries.
#[derive(Debug, Error)]
pub enum FeedQueryError {
    /// The store rejected the ranked shape because its ordering columns are
    /// not queryable yet (schema still rolling out). Retried once with the
    /// recency shape.
    #[error("ranking columns unavailable: {0}")]
    RankingUnavailable(sqlx::Error),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl FeedQueryError {
    /// Classify a store error returned by the ranked query shape.
    pub fn from_ranked_query(err: sqlx::Error) -> Self {
        let missing = match &err {
            sqlx::Error::Database(db) => {
                missing_ranking_column(db.code().as_deref(), db.message())
            }
            _ => false,
        };

        if missing {
            FeedQueryError::RankingUnavailable(err)
        } else {
            FeedQueryError::Database(err)
        }
    }
}

impl From<FeedQueryError> for AppError {
    fn from(err: FeedQueryError) -> Self {
        match err {
            FeedQueryError::RankingUnavailable(e) | FeedQueryError::Database(e) => {
                AppError::Database(e)
            }
        }
    }
}

/// True when a store error says the ranked shape's ordering columns do not
/// exist: Postgres undefined_column (42703), or a message naming one of
/// them, for stores that do not surface SQLSTATE codes.
fn missing_ranking_column(code: Option<&str>, message: &str) -> bool {
    let names_column = message.contains("priority_rank") || message.contains("is_pinned");

    match code {
        Some("42703") => names_column,
        _ => names_column && message.contains("does not exist"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undefined_rank_column_is_retryable() {
        assert!(missing_ranking_column(
            Some("42703"),
            r#"column "priority_rank" does not exist"#
        ));
        assert!(missing_ranking_column(
            Some("42703"),
            r#"column p.is_pinned does not exist"#
        ));
    }

    #[test]
    fn test_other_undefined_columns_are_not_retryable() {
        assert!(!missing_ranking_column(
            Some("42703"),
            r#"column "content" does not exist"#
        ));
    }

    #[test]
    fn test_message_pattern_without_sqlstate() {
        assert!(missing_ranking_column(
            None,
            r#"column "priority_rank" of relation "posts" does not exist"#
        ));
        assert!(!missing_ranking_column(None, "priority_rank constraint violated"));
    }

    #[test]
    fn test_unrelated_errors_are_not_retryable() {
        assert!(!missing_ranking_column(Some("57014"), "canceling statement due to statement timeout"));
        assert!(!missing_ranking_column(Some("42703"), "column \"author_id\" does not exist"));
    }
}
