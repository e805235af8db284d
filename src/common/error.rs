use std::fmt::Display;

use axum::{http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub enum AppError {
    NotFound(String),
    Unauthorized(ErrorTypes),
    Internal(anyhow::Error),
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self {
            Self::NotFound(msg) => {
                helpers::error_response(StatusCode::NOT_FOUND, ErrorTypes::NotFound, &msg)
            }
            Self::Unauthorized(error_type) => helpers::error_response(
                StatusCode::UNAUTHORIZED,
                error_type,
                "Token update requested",
            ),
            Self::Internal(why) => {
                tracing::error!("Request failed: {:#}", why);
                helpers::error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorTypes::InternalError,
                    &format!("Something went wrong: {}", why),
                )
            }
        }
    }
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    fn from(value: E) -> Self {
        Self::Internal(value.into())
    }
}

pub mod helpers {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::common::error::{ErrorResponse, ErrorTypes};

    pub fn error_response(
        status: StatusCode,
        error_type: ErrorTypes,
        error_msg: &str,
    ) -> axum::response::Response {
        (
            status,
            axum::Json(ErrorResponse::new(error_type, error_msg)),
        )
            .into_response()
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error_type: String,
    pub error_msg: String,
}

impl ErrorResponse {
    pub fn new(error_type: ErrorTypes, error_msg: &str) -> Self {
        Self {
            error_type: error_type.to_string(),
            error_msg: error_msg.to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ErrorTypes {
    InternalError,
    JwtTokenExpired,
    NoAuthHeader,
    NotFound,
}

impl Display for ErrorTypes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InternalError => write!(f, "server_internal_error"),
            Self::JwtTokenExpired => write!(f, "jwt_token_expired"),
            Self::NoAuthHeader => write!(f, "no_auth_header"),
            Self::NotFound => write!(f, "not_found"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_types_str() {
        assert_eq!(ErrorTypes::InternalError.to_string(), "server_internal_error");
        assert_eq!(ErrorTypes::JwtTokenExpired.to_string(), "jwt_token_expired");
        assert_eq!(ErrorTypes::NoAuthHeader.to_string(), "no_auth_header");
        assert_eq!(ErrorTypes::NotFound.to_string(), "not_found");
    }

    #[test]
    fn test_app_error_status() {
        let resp = AppError::not_found("Course not found").into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = AppError::Unauthorized(ErrorTypes::NoAuthHeader).into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = AppError::from(anyhow::anyhow!("boom")).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
