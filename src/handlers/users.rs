use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;

use crate::db::models::PublicUser;
use crate::error::SkycastError;
use crate::middleware::JsonBody;
use crate::middleware::validate::{validate_credentials, validate_id, validate_location};
use crate::router::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePasswordRequest {
    pub username: Option<String>,
    pub old_password: Option<String>,
    pub new_password: Option<String>,
}

/// Clients send ids both as JSON numbers and as numeric strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawUserId {
    Number(i64),
    Text(String),
}

impl RawUserId {
    fn validate(&self) -> Result<i64, SkycastError> {
        match self {
            RawUserId::Number(n) => validate_id(&n.to_string()),
            RawUserId::Text(s) => validate_id(s),
        }
    }
}

fn require_user_id(raw: Option<&RawUserId>) -> Result<i64, SkycastError> {
    raw.ok_or_else(|| SkycastError::invalid("User id is required."))?
        .validate()
}

#[derive(Debug, Deserialize)]
pub struct DeleteUserRequest {
    pub user_id: Option<RawUserId>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateLocationRequest {
    pub user_id: Option<RawUserId>,
    pub location: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedUser {
    pub message: String,
    pub user_id: i64,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: PublicUser,
}

/// POST /api/create-user
pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateUserRequest>,
) -> Result<(StatusCode, Json<CreatedUser>), SkycastError> {
    let (username, password) =
        validate_credentials(req.username.as_deref(), req.password.as_deref())?;
    let location = match req.location.as_deref() {
        Some(raw) => validate_location(Some(raw))?,
        None => state.config.default_location.clone(),
    };

    let user_id = state
        .users
        .create_user(&username, &password, &location)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedUser {
            message: "User created successfully".to_string(),
            user_id,
        }),
    ))
}

/// DELETE /api/delete-user
pub async fn delete_user(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<DeleteUserRequest>,
) -> Result<Json<Value>, SkycastError> {
    let user_id = require_user_id(req.user_id.as_ref())?;
    state.users.delete_user(user_id).await?;
    Ok(Json(json!({ "message": "User deleted successfully" })))
}

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, SkycastError> {
    let (username, password) =
        validate_credentials(req.username.as_deref(), req.password.as_deref())?;
    let user = state.users.verify_credentials(&username, &password).await?;
    info!(user_id = user.id, %username, "login succeeded");
    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        user: user.into(),
    }))
}

/// POST /api/update-password
pub async fn update_password(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<UpdatePasswordRequest>,
) -> Result<Json<Value>, SkycastError> {
    let (username, old_password) =
        validate_credentials(req.username.as_deref(), req.old_password.as_deref())?;
    let new_password = req
        .new_password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| SkycastError::invalid("New password is required."))?;

    state
        .users
        .update_password(&username, &old_password, &new_password)
        .await?;
    Ok(Json(json!({ "message": "Password updated successfully" })))
}

/// PUT /api/update-location
pub async fn update_location(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<UpdateLocationRequest>,
) -> Result<Json<Value>, SkycastError> {
    let user_id = require_user_id(req.user_id.as_ref())?;
    let location = validate_location(req.location.as_deref())?;
    state.users.update_location(user_id, &location).await?;
    Ok(Json(json!({
        "message": "Location updated successfully",
        "location": location,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_accepts_number_or_numeric_string() {
        let n: DeleteUserRequest = serde_json::from_value(json!({"user_id": 7})).unwrap();
        let s: DeleteUserRequest = serde_json::from_value(json!({"user_id": "7"})).unwrap();
        assert_eq!(require_user_id(n.user_id.as_ref()).unwrap(), 7);
        assert_eq!(require_user_id(s.user_id.as_ref()).unwrap(), 7);
    }

    #[test]
    fn user_id_rejects_missing_and_non_positive() {
        let missing: DeleteUserRequest = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(
            require_user_id(missing.user_id.as_ref()),
            Err(SkycastError::InvalidInput(_))
        ));
        let zero: DeleteUserRequest = serde_json::from_value(json!({"user_id": 0})).unwrap();
        assert!(require_user_id(zero.user_id.as_ref()).is_err());
        let text: DeleteUserRequest = serde_json::from_value(json!({"user_id": "abc"})).unwrap();
        assert!(require_user_id(text.user_id.as_ref()).is_err());
    }
}
