/// User sign-up endpoint
///
/// # Endpoint
///
/// ```text
/// POST /api/user/add
/// Content-Type: application/json
///
/// {"username": "alice", "password": "secret"}
/// ```
///
/// # Response (201)
///
/// ```json
/// {"message": "User added successfully", "id": 1}
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: `username` or `password` missing, or username empty/too long
/// - `409 Conflict`: username already taken

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ApiJson,
};
use axum::{extract::State, http::StatusCode, Json};
use minishop_shared::{
    auth::password,
    models::user::{CreateUser, User},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Sign-up request
#[derive(Debug, Deserialize, Validate)]
pub struct AddUserRequest {
    #[validate(length(min = 1, max = 80, message = "Username must be 1-80 characters"))]
    pub username: Option<String>,

    pub password: Option<String>,
}

/// Sign-up response
#[derive(Debug, Serialize)]
pub struct UserCreatedResponse {
    pub message: String,
    pub id: i64,
}

/// Creates a user account
pub async fn add_user(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<AddUserRequest>,
) -> ApiResult<(StatusCode, Json<UserCreatedResponse>)> {
    req.validate()?;

    let (Some(username), Some(plaintext)) = (req.username, req.password) else {
        return Err(ApiError::BadRequest("Invalid request data".to_string()));
    };

    let password_hash = password::hash_password_blocking(plaintext).await?;

    let user = User::create(
        &state.db,
        CreateUser {
            username,
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User added");

    Ok((
        StatusCode::CREATED,
        Json(UserCreatedResponse {
            message: "User added successfully".to_string(),
            id: user.id,
        }),
    ))
}
