//! Typed error surface for repository operations.
//!
//! Filtering and pagination are fail-open: malformed client input never
//! produces an error, the offending clause is simply dropped. Store failures
//! are the opposite: they are classified into this taxonomy and propagated,
//! never retried or swallowed. Internal detail (driver messages, constraint
//! names) is logged via `tracing` and kept out of the response body.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use std::fmt;

#[derive(Debug)]
pub enum ApiError {
    /// 404: the requested record does not exist.
    NotFound {
        resource: String,
        id: Option<String>,
    },

    /// 409: unique constraint violated.
    Duplicate { message: String },

    /// 422: the payload is structurally valid but semantically wrong.
    InvalidData { errors: Vec<String> },

    /// 409: a foreign-key constraint blocks the operation.
    ForeignKey { message: String },

    /// 500: store failure; the driver error is logged, not exposed.
    Database { message: String, internal: DbErr },

    /// 403: caller is authenticated but not allowed.
    PermissionDenied { message: String },

    /// 400: the request itself is malformed.
    InvalidRequest { message: String },
}

impl ApiError {
    pub fn not_found(resource: impl Into<String>, id: Option<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id,
        }
    }

    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::Duplicate {
            message: message.into(),
        }
    }

    pub fn invalid_data(errors: Vec<String>) -> Self {
        Self::InvalidData { errors }
    }

    pub fn foreign_key(message: impl Into<String>) -> Self {
        Self::ForeignKey {
            message: message.into(),
        }
    }

    pub fn database(err: DbErr) -> Self {
        Self::Database {
            message: "A database error occurred".to_string(),
            internal: err,
        }
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Duplicate { .. } | Self::ForeignKey { .. } => StatusCode::CONFLICT,
            Self::InvalidData { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::PermissionDenied { .. } => StatusCode::FORBIDDEN,
            Self::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
        }
    }

    fn user_message(&self) -> String {
        match self {
            Self::NotFound { resource, id } => match id {
                Some(id) => format!("{resource} with ID '{id}' not found"),
                None => format!("{resource} not found"),
            },
            Self::Duplicate { message }
            | Self::ForeignKey { message }
            | Self::PermissionDenied { message }
            | Self::InvalidRequest { message }
            | Self::Database { message, .. } => message.clone(),
            Self::InvalidData { errors } => {
                if errors.len() == 1 {
                    errors[0].clone()
                } else {
                    format!("Invalid data: {}", errors.join(", "))
                }
            }
        }
    }

    fn log_internal(&self) {
        match self {
            Self::Database { internal, .. } => {
                tracing::error!(error = ?internal, "database error");
            }
            _ => {
                tracing::debug!(
                    error = %self.user_message(),
                    status = %self.status_code(),
                    "api error"
                );
            }
        }
    }
}

/// Sanitized response body.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log_internal();

        let status = self.status_code();
        let response = match &self {
            Self::InvalidData { errors } => ErrorResponse {
                error: "Invalid data".to_string(),
                details: Some(errors.clone()),
            },
            _ => ErrorResponse {
                error: self.user_message(),
                details: None,
            },
        };

        (status, Json(response)).into_response()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for ApiError {}

/// Classify store failures.
///
/// Unique and foreign-key violations are recognised through
/// [`DbErr::sql_err`]; `RecordNotFound` becomes 404; everything else is an
/// opaque database error whose detail only reaches the logs.
impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::Duplicate {
                message: "Duplicate entry".to_string(),
            },
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => Self::ForeignKey {
                message: "Operation violates a relation constraint".to_string(),
            },
            _ => match err {
                DbErr::RecordNotFound(msg) => {
                    let resource = msg.split_whitespace().next().unwrap_or("Resource");
                    Self::NotFound {
                        resource: resource.to_string(),
                        id: None,
                    }
                }
                _ => Self::Database {
                    message: "A database error occurred".to_string(),
                    internal: err,
                },
            },
        }
    }
}
