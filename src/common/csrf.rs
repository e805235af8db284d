use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

pub const CSRF_COOKIE_NAME: &str = "csrftoken";

/// Makes sure the client holds a CSRF cookie.
///
/// Reuses the token from the request cookie when there is one, otherwise
/// mints a new one. Return `jar` with the response so a freshly minted
/// cookie reaches the client.
pub struct CsrfToken {
    pub token: String,
    pub jar: CookieJar,
}

fn new_token() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

impl<S: Send + Sync> FromRequestParts<S> for CsrfToken {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        if let Some(cookie) = jar.get(CSRF_COOKIE_NAME) {
            if !cookie.value().is_empty() {
                let token = cookie.value().to_owned();
                return Ok(Self { token, jar });
            }
        }

        let token = new_token();
        let cookie = Cookie::build((CSRF_COOKIE_NAME, token.clone()))
            .path("/")
            .same_site(SameSite::Lax);
        Ok(Self {
            token,
            jar: jar.add(cookie),
        })
    }
}
