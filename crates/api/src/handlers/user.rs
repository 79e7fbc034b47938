//! Handlers for the authenticated user's own account.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use storefront_core::error::CoreError;
use storefront_core::types::DbId;
use storefront_db::models::user::{User, UserResponse};
use storefront_db::repositories::{RoleRepo, UserRepo};
use validator::Validate;

use crate::auth::password::{hash_password, validate_new_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

/// Request body for `PUT /user/profile`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 255, message = "The name field is required"))]
    pub name: String,
    #[validate(email(message = "The email must be a valid email address"))]
    pub email: String,
}

/// Request body for `PUT /user/password`.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub password: String,
    pub password_confirmation: String,
}

/// Request body for `POST /user/set-password`.
#[derive(Debug, Deserialize)]
pub struct SetPasswordRequest {
    pub password: String,
    pub password_confirmation: String,
}

/// GET /api/v1/user
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = load_user(&state, auth_user.user_id).await?;
    Ok(Json(DataResponse {
        data: UserResponse::from_user(&user, auth_user.role),
    }))
}

/// PUT /api/v1/user/profile
pub async fn update_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    AppJson(input): AppJson<UpdateProfileRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    input.validate()?;
    let email = input.email.trim().to_lowercase();

    if let Some(other) = UserRepo::find_by_email(&state.pool, &email).await? {
        if other.id != auth_user.user_id {
            return Err(CoreError::Conflict("The email has already been taken".into()).into());
        }
    }

    let user = UserRepo::update_profile(&state.pool, auth_user.user_id, input.name.trim(), &email)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: auth_user.user_id,
        })?;
    let role = RoleRepo::resolve_name(&state.pool, user.role_id).await?;

    tracing::info!(user_id = user.id, "Profile updated");

    Ok(Json(DataResponse {
        data: UserResponse::from_user(&user, role),
    }))
}

/// PUT /api/v1/user/password
///
/// Change the password of an account that already has one.
pub async fn change_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    AppJson(input): AppJson<ChangePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    let user = load_user(&state, auth_user.user_id).await?;
    let Some(current_hash) = user.password_hash.as_deref() else {
        return Err(AppError::BadRequest(
            "No password is set for this account. Use set-password instead.".into(),
        ));
    };

    let matches = verify_password(&input.current_password, current_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !matches {
        return Err(CoreError::Validation("The current password is incorrect".into()).into());
    }

    store_new_password(&state, &user, &input.password, &input.password_confirmation).await?;
    Ok(Json(MessageResponse {
        message: "Password updated successfully",
    }))
}

/// POST /api/v1/user/set-password
///
/// First password for an account created through Google sign-in.
pub async fn set_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    AppJson(input): AppJson<SetPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    let user = load_user(&state, auth_user.user_id).await?;
    if user.has_password() {
        return Err(AppError::BadRequest(
            "Password already set. Use the change password endpoint instead.".into(),
        ));
    }

    store_new_password(&state, &user, &input.password, &input.password_confirmation).await?;
    Ok(Json(MessageResponse {
        message: "Password set successfully",
    }))
}

async fn load_user(state: &AppState, user_id: DbId) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "User",
                id: user_id,
            })
        })
}

async fn store_new_password(
    state: &AppState,
    user: &User,
    password: &str,
    confirmation: &str,
) -> AppResult<()> {
    validate_new_password(password, confirmation).map_err(CoreError::Validation)?;
    let hash = hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, user.id, &hash).await?;
    tracing::info!(user_id = user.id, "Password updated");
    Ok(())
}
