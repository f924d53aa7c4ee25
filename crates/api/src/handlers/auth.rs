//! Handlers for the `/auth` resource (register, login, refresh, me).

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{AppendHeaders, IntoResponse};
use axum::Json;
use serde::{Deserialize, Serialize};
use shopgate_db::models::user::UserResponse;

use crate::auth::cookies::{read_cookie, session_cookies, REFRESH_COOKIE};
use crate::auth::jwt::TokenPair;
use crate::auth::session::{AuthSession, RegisterInput};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::response::{ApiResponse, STATUS_SUCCESS};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
///
/// Missing fields deserialize as empty and are reported by validation.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub full_name: String,
    pub user_name: String,
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginRequest {
    pub email_or_username: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh-token`. The body may be omitted
/// entirely when the refresh cookie is present.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

/// `data` payload of register and login.
#[derive(Debug, Serialize)]
pub struct SessionPayload {
    pub user: UserResponse,
    #[serde(flatten)]
    pub tokens: TokenPair,
}

/// Body of `GET /auth/me`.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub status: &'static str,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    AppJson(input): AppJson<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    let session = state
        .sessions
        .register(RegisterInput {
            full_name: input.full_name,
            username: input.user_name,
            email: input.email,
            password: input.password,
        })
        .await?;

    session_response(&state, StatusCode::CREATED, "User registered successfully", session)
}

/// POST /api/auth/login
///
/// `emailOrUsername` matches either column; email wins if both would match.
pub async fn login(
    State(state): State<AppState>,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let session = state
        .sessions
        .login(&input.email_or_username, &input.password)
        .await?;

    session_response(&state, StatusCode::OK, "Login successful", session)
}

/// POST /api/auth/refresh-token
///
/// Reads `refreshToken` from the JSON body, falling back to the
/// `refreshToken` cookie. Both tokens are rotated.
pub async fn refresh_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> AppResult<impl IntoResponse> {
    let body = body?;
    let input: RefreshRequest = if body.iter().all(u8::is_ascii_whitespace) {
        RefreshRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))?
    };

    let presented = input
        .refresh_token
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .or_else(|| read_cookie(&headers, REFRESH_COOKIE));

    let tokens = state.refresher.refresh(presented).await?;
    let cookies = session_cookies(&tokens, &state.signers, state.config.production)?;

    Ok((
        AppendHeaders(cookies),
        Json(ApiResponse::success("Token refreshed", tokens)),
    ))
}

/// GET /api/auth/me
pub async fn me(AuthUser(user): AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        status: STATUS_SUCCESS,
        user: UserResponse::from(&user),
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn session_response(
    state: &AppState,
    status: StatusCode,
    message: &str,
    session: AuthSession,
) -> AppResult<impl IntoResponse> {
    let cookies = session_cookies(&session.tokens, &state.signers, state.config.production)?;
    let payload = SessionPayload {
        user: UserResponse::from(&session.user),
        tokens: session.tokens,
    };

    Ok((
        status,
        AppendHeaders(cookies),
        Json(ApiResponse::success(message, payload)),
    ))
}
