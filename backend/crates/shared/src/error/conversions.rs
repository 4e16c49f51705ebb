//! `From` conversions into [`AppError`] and its axum response rendering.

use super::app_error::AppError;
#[cfg(feature = "sqlx")]
use super::kind::ErrorKind;

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_data() {
            AppError::bad_request("Invalid request body").with_source(err)
        } else {
            AppError::internal("JSON serialization error").with_source(err)
        }
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => AppError::not_found("Record not found").with_source(err),
            sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => {
                AppError::service_unavailable("Database unavailable").with_source(err)
            }
            sqlx::Error::Database(db_err) => {
                // https://www.postgresql.org/docs/current/errcodes-appendix.html
                let kind = match db_err.code().as_deref() {
                    Some("23505") => ErrorKind::Conflict,
                    Some("23502") | Some("23514") | Some("22001") => ErrorKind::BadRequest,
                    Some("53300") | Some("57P01") | Some("57P03") => ErrorKind::ServiceUnavailable,
                    _ => ErrorKind::InternalServerError,
                };
                let message = match kind {
                    ErrorKind::Conflict => "Duplicate key value",
                    ErrorKind::BadRequest => "Invalid value",
                    ErrorKind::ServiceUnavailable => "Database unavailable",
                    _ => "Database error",
                };
                AppError::new(kind, message).with_source(err)
            }
            _ => AppError::internal("Database error").with_source(err),
        }
    }
}

/// Renders as RFC 7807 problem details.
#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = serde_json::json!({
            "type": format!("https://httpstatuses.io/{}", self.status_code()),
            "title": self.kind().as_str(),
            "status": self.status_code(),
            "detail": self.message(),
            "action": self.action(),
        });

        (status, Json(body)).into_response()
    }
}
