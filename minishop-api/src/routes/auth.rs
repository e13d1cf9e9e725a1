/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /login` - Verify credentials and start a session
/// - `POST /logout` - End the current session (session required)
///
/// The session token travels in the `minishop_session` cookie; see
/// [`crate::middleware::session`].

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ApiJson,
    middleware::session::{removal_cookie, session_cookie, session_token, CurrentUser},
    routes::MessageResponse,
};
use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    Extension, Json,
};
use minishop_shared::{auth::password, models::user::User};
use serde::{Deserialize, Serialize};

/// Login request
///
/// Both fields are required; they are optional here so a missing one maps
/// to 400 instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user_id: i64,
}

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized("Invalid username or password".to_string())
}

/// Login endpoint
///
/// ```text
/// POST /login
/// Content-Type: application/json
///
/// {"username": "alice", "password": "secret"}
/// ```
///
/// On success the response carries `Set-Cookie: minishop_session=...`.
/// A session cookie presented with the request is revoked first. Failed
/// attempts leave any existing session untouched.
///
/// # Errors
///
/// - `400 Bad Request`: malformed body or missing field
/// - `401 Unauthorized`: unknown user or wrong password
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<([(header::HeaderName, HeaderValue); 1], Json<LoginResponse>)> {
    let (Some(username), Some(plaintext)) = (req.username, req.password) else {
        return Err(ApiError::BadRequest("Invalid request data".to_string()));
    };

    let Some(user) = User::find_by_username(&state.db, &username).await? else {
        password::dummy_verify_blocking(plaintext).await;
        tracing::info!(username = %username, "Login failed: unknown user");
        return Err(invalid_credentials());
    };

    if !password::verify_password_blocking(plaintext, user.password_hash.clone()).await? {
        tracing::info!(user_id = user.id, "Login failed: wrong password");
        return Err(invalid_credentials());
    }

    if let Some(previous) = session_token(&headers) {
        state.sessions.revoke(&previous).await;
    }

    let token = state.sessions.create(user.id, &user.username).await;
    let cookie = session_cookie(&token, &state)?;

    tracing::info!(user_id = user.id, "Login successful");

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse {
            message: "Login successful".to_string(),
            user_id: user.id,
        }),
    ))
}

/// Logout endpoint
///
/// Revokes the session and clears the cookie.
pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<([(header::HeaderName, HeaderValue); 1], Json<MessageResponse>)> {
    state.sessions.revoke(&user.token).await;

    tracing::info!(user_id = user.user_id, "Logout");

    Ok((
        [(header::SET_COOKIE, removal_cookie(&state)?)],
        Json(MessageResponse::new("Logout successful")),
    ))
}
