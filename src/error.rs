//! Error type shared by repositories, services and handlers, and its
//! WordPress-shaped JSON envelope.
//!
//! ```json
//! {
//!   "code": "rest_invalid_param",
//!   "message": "Invalid parameter(s): orderby",
//!   "data": { "status": 400, "replies": { "orderby": "..." } }
//! }
//! ```

use axum::{
    Json,
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::ValidationErrors;

pub const REST_INVALID_PARAM_CODE: &str = "rest_invalid_param";
pub const REST_NO_ROUTE_CODE: &str = "rest_no_route";
pub const REST_INVALID_ID_CODE: &str = "rest_post_invalid_id";

const NO_ROUTE_MESSAGE: &str = "No route was found matching the URL and request method";
const INVALID_POST_ID_MESSAGE: &str = "Invalid post ID.";

/// Error envelope returned on every non-2xx response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    pub data: ErrorData,
}

/// `data` member of [`ErrorBody`].
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorData {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub replies: Option<BTreeMap<String, String>>,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A single-row lookup matched nothing.
    #[error("resource not found")]
    NotFound,

    /// The primary entity of a single-item request does not exist.
    #[error("invalid post id")]
    InvalidId,

    /// A filter or ordering combination the store cannot answer.
    #[error("invalid parameter `{param}`: {reason}")]
    InvalidParameter { param: String, reason: String },

    #[error("no route was found matching the URL and request method")]
    NoRoute,

    #[error("database query failed: {0}")]
    Query(#[from] sqlx::Error),
}

impl AppError {
    pub fn invalid_param(param: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.into(),
            reason: reason.into(),
        }
    }

    /// Renders the WordPress error envelope for this error.
    pub fn to_error_body(&self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::NotFound | AppError::InvalidId => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: REST_INVALID_ID_CODE.to_string(),
                    message: INVALID_POST_ID_MESSAGE.to_string(),
                    data: ErrorData {
                        status: StatusCode::NOT_FOUND.as_u16(),
                        replies: None,
                    },
                },
            ),
            AppError::NoRoute => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: REST_NO_ROUTE_CODE.to_string(),
                    message: NO_ROUTE_MESSAGE.to_string(),
                    data: ErrorData {
                        status: StatusCode::NOT_FOUND.as_u16(),
                        replies: None,
                    },
                },
            ),
            AppError::InvalidParameter { param, reason } => (
                StatusCode::BAD_REQUEST,
                invalid_param_body(param, Some(reason)),
            ),
            // Store failures never leak their text to the client.
            AppError::Query(_) => (StatusCode::BAD_REQUEST, invalid_param_body("", None)),
        }
    }
}

fn invalid_param_body(param: &str, reason: Option<&String>) -> ErrorBody {
    let replies = match reason {
        Some(reason) if !param.is_empty() => {
            Some(BTreeMap::from([(param.to_string(), reason.clone())]))
        }
        _ => None,
    };

    ErrorBody {
        code: REST_INVALID_PARAM_CODE.to_string(),
        message: format!("Invalid parameter(s): {}", param),
        data: ErrorData {
            status: StatusCode::BAD_REQUEST.as_u16(),
            replies,
        },
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        match fields.first() {
            Some((field, errs)) => {
                let reason = errs
                    .first()
                    .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| format!("{} is out of range.", field));
                AppError::invalid_param(field.to_string(), reason)
            }
            None => AppError::invalid_param("", "invalid request"),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::invalid_param("query", rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Query(e) = &self {
            tracing::error!(error = %e, "store query failed");
        }

        let (status, body) = self.to_error_body();
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_id_maps_to_404() {
        let (status, body) = AppError::InvalidId.to_error_body();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.code, REST_INVALID_ID_CODE);
        assert_eq!(body.data.status, 404);
    }

    #[test]
    fn test_no_route_maps_to_404() {
        let (status, body) = AppError::NoRoute.to_error_body();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.code, REST_NO_ROUTE_CODE);
    }

    #[test]
    fn test_invalid_parameter_carries_replies() {
        let err = AppError::invalid_param("orderby", "you need to define a search term");
        let (status, body) = err.to_error_body();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, REST_INVALID_PARAM_CODE);
        assert_eq!(body.message, "Invalid parameter(s): orderby");
        let replies = body.data.replies.unwrap();
        assert_eq!(replies["orderby"], "you need to define a search term");
    }

    #[test]
    fn test_query_error_is_generic_400() {
        let err = AppError::Query(sqlx::Error::RowNotFound);
        let (status, body) = err.to_error_body();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, REST_INVALID_PARAM_CODE);
        assert!(body.data.replies.is_none());

        let json = serde_json::to_value(&body).unwrap();
        assert!(json["data"].get("replies").is_none());
    }
}
