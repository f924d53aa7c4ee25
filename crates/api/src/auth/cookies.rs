//! `Set-Cookie` values carrying the token pair to browsers.

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderName, HeaderValue};

use crate::auth::jwt::{TokenPair, TokenSigner, TokenSigners};
use crate::error::{AppError, AppResult};

pub const ACCESS_COOKIE: &str = "accessToken";
pub const REFRESH_COOKIE: &str = "refreshToken";

/// Build one HttpOnly, SameSite=Strict cookie whose Max-Age matches the
/// lifetime of the token it carries.
pub fn token_cookie(
    name: &str,
    token: &str,
    signer: &TokenSigner,
    secure: bool,
) -> AppResult<HeaderValue> {
    let max_age = signer.lifetime().num_seconds();
    let secure = if secure { "; Secure" } else { "" };
    let cookie = format!("{name}={token}; Path=/; HttpOnly; SameSite=Strict; Max-Age={max_age}{secure}");

    HeaderValue::from_str(&cookie)
        .map_err(|e| AppError::InternalError(format!("Invalid cookie value: {e}")))
}

/// Both token cookies, ready for `AppendHeaders`.
pub fn session_cookies(
    tokens: &TokenPair,
    signers: &TokenSigners,
    secure: bool,
) -> AppResult<[(HeaderName, HeaderValue); 2]> {
    Ok([
        (
            SET_COOKIE,
            token_cookie(ACCESS_COOKIE, &tokens.access_token, &signers.access, secure)?,
        ),
        (
            SET_COOKIE,
            token_cookie(REFRESH_COOKIE, &tokens.refresh_token, &signers.refresh, secure)?,
        ),
    ])
}

/// Read a cookie by name from the request's `Cookie` headers.
pub fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}
