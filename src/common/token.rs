use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::{
    common::error::{AppError, ErrorTypes},
    AppState,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: u32,
    pub exp: i64,
}

/// The authenticated user behind a `Authorization: Bearer <jwt>` header.
///
/// Extract `Option<AuthHeader>` on views that anonymous users may see too;
/// a missing or invalid token then yields `None` instead of a 401.
#[derive(Debug, Clone)]
pub struct AuthHeader {
    pub claims: Claims,
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|s| s.split_whitespace().last())
        .filter(|s| !s.is_empty())
}

pub fn verify_jwt_token(token: &str, secret: &str) -> anyhow::Result<Claims> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(claims.claims)
}

impl FromRequestParts<AppState> for AuthHeader {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token =
            bearer_token(parts).ok_or(AppError::Unauthorized(ErrorTypes::NoAuthHeader))?;

        match verify_jwt_token(token, &state.config.jwt_secret) {
            Ok(claims) => Ok(Self { claims }),
            Err(why) => {
                tracing::debug!("Rejected token: {}", why);
                Err(AppError::Unauthorized(ErrorTypes::JwtTokenExpired))
            }
        }
    }
}

impl OptionalFromRequestParts<AppState> for AuthHeader {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(bearer_token(parts)
            .and_then(|token| verify_jwt_token(token, &state.config.jwt_secret).ok())
            .map(|claims| Self { claims }))
    }
}

#[cfg(test)]
pub fn issue_test_token(user_id: u32, secret: &str) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let claims = Claims {
        id: user_id,
        exp: (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_jwt_token() {
        let token = issue_test_token(7, "secret");
        let claims = verify_jwt_token(&token, "secret").unwrap();
        assert_eq!(claims.id, 7);

        assert!(verify_jwt_token(&token, "another secret").is_err());
        assert!(verify_jwt_token("garbage", "secret").is_err());
    }
}
