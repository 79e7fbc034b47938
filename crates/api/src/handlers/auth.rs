//! Handlers for registration, login, token refresh, logout and Google sign-in.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use storefront_core::error::CoreError;
use storefront_core::roles::CUSTOMER_ROLE_ID;
use storefront_db::models::session::CreateSession;
use storefront_db::models::user::{CreateUser, User, UserResponse};
use storefront_db::repositories::{RoleRepo, SessionRepo, UserRepo};
use validator::Validate;

use crate::auth::google::GoogleProfile;
use crate::auth::jwt::{hash_refresh_token, issue_access_token, RefreshToken};
use crate::auth::password::{hash_password, validate_new_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::response::MessageResponse;
use crate::state::AppState;

/// Maximum consecutive failed login attempts before locking the account.
const MAX_FAILED_ATTEMPTS: i32 = 5;

/// Duration in minutes to lock an account after exceeding failed attempts.
const LOCK_DURATION_MINS: i64 = 15;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 255, message = "The name field is required"))]
    pub name: String,
    #[validate(email(message = "The email must be a valid email address"))]
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

/// Request body for `POST /login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "The email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "The password field is required"))]
    pub password: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Successful authentication response returned by register, login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    /// Bearer access token.
    pub token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

/// Query string Google appends to the callback URL.
#[derive(Debug, Deserialize)]
pub struct GoogleCallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/register
///
/// Create a customer account and sign it in.
pub async fn register(
    State(state): State<AppState>,
    AppJson(input): AppJson<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_new_password(&input.password, &input.password_confirmation)
        .map_err(CoreError::Validation)?;

    let email = input.email.trim().to_lowercase();
    if UserRepo::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(CoreError::Conflict("The email has already been taken".into()).into());
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            name: input.name.trim().to_string(),
            email,
            password_hash: Some(password_hash),
            google_id: None,
            avatar: None,
            role_id: CUSTOMER_ROLE_ID,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "User registered");

    let response = create_auth_response(&state, &user).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/login
///
/// Authenticate with email + password. Returns access and refresh tokens.
pub async fn login(
    State(state): State<AppState>,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    input.validate()?;
    let email = input.email.trim().to_lowercase();

    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "The provided credentials are incorrect".into(),
            ))
        })?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    if let Some(locked_until) = user.locked_until {
        if locked_until > Utc::now() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Account is temporarily locked. Try again later.".into(),
            )));
        }
    }

    let Some(password_hash) = user.password_hash.as_deref() else {
        return Err(AppError::Core(CoreError::Forbidden(
            "This account signs in with Google".into(),
        )));
    };

    let password_valid = verify_password(&input.password, password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        let failed = UserRepo::increment_failed_login(&state.pool, user.id).await?;
        if failed >= MAX_FAILED_ATTEMPTS {
            let lock_until = Utc::now() + chrono::Duration::minutes(LOCK_DURATION_MINS);
            UserRepo::lock_account(&state.pool, user.id, lock_until).await?;
            tracing::warn!(user_id = user.id, failed, "Account locked after failed logins");
        }

        return Err(AppError::Core(CoreError::Unauthorized(
            "The provided credentials are incorrect".into(),
        )));
    }

    UserRepo::record_successful_login(&state.pool, user.id).await?;

    let response = create_auth_response(&state, &user).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a valid refresh token for new access + refresh tokens.
pub async fn refresh(
    State(state): State<AppState>,
    AppJson(input): AppJson<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let token_hash = hash_refresh_token(&input.refresh_token);

    // Rotation: the presented token is single-use.
    let session = SessionRepo::consume(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let response = create_auth_response(&state, &user).await?;
    Ok(Json(response))
}

/// POST /api/v1/logout
///
/// End all refresh sessions of the authenticated user.
pub async fn logout(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<MessageResponse>> {
    let ended = SessionRepo::end_all_for_user(&state.pool, auth_user.user_id).await?;
    tracing::info!(user_id = auth_user.user_id, sessions = ended, "User logged out");
    Ok(Json(MessageResponse {
        message: "Logged out successfully",
    }))
}

/// GET /api/v1/auth/google
///
/// Redirect the browser to Google's consent screen.
pub async fn google_redirect(State(state): State<AppState>) -> AppResult<Redirect> {
    let provider = state
        .google
        .as_ref()
        .ok_or_else(|| AppError::ServiceUnavailable("Google sign-in is not configured".into()))?;
    let url = provider
        .authorize_url()
        .map_err(|e| AppError::InternalError(e.to_string()))?;
    Ok(Redirect::to(&url))
}

/// GET /api/v1/auth/google/callback
///
/// Finish Google sign-in and hand the tokens to the storefront. Every
/// failure redirects to the storefront login page instead of returning JSON.
pub async fn google_callback(
    State(state): State<AppState>,
    Query(params): Query<GoogleCallbackParams>,
) -> Redirect {
    let frontend = state.config.frontend_url.clone();
    match complete_google_sign_in(&state, params).await {
        Ok(auth) => {
            let needs_password = if auth.user.has_password { "false" } else { "true" };
            let target = reqwest::Url::parse_with_params(
                &format!("{frontend}/auth/google/callback"),
                &[
                    ("token", auth.token.as_str()),
                    ("refresh_token", auth.refresh_token.as_str()),
                    ("needs_password", needs_password),
                ],
            );
            match target {
                Ok(url) => Redirect::to(url.as_str()),
                Err(e) => {
                    tracing::error!(error = %e, "Invalid FRONTEND_URL");
                    login_failure_redirect(&frontend)
                }
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Google sign-in failed");
            login_failure_redirect(&frontend)
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn login_failure_redirect(frontend: &str) -> Redirect {
    Redirect::to(&format!("{frontend}/login?error=Authentication%20failed"))
}

async fn complete_google_sign_in(
    state: &AppState,
    params: GoogleCallbackParams,
) -> AppResult<AuthResponse> {
    let provider = state
        .google
        .as_ref()
        .ok_or_else(|| AppError::ServiceUnavailable("Google sign-in is not configured".into()))?;
    if let Some(error) = params.error {
        return Err(AppError::BadRequest(format!("Google returned an error: {error}")));
    }
    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing authorization code".into()))?;

    let profile = provider
        .fetch_profile(&code)
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let user = find_or_create_google_user(state, &profile).await?;
    if !user.is_active {
        return Err(CoreError::Forbidden("Account is deactivated".into()).into());
    }
    UserRepo::record_successful_login(&state.pool, user.id).await?;
    create_auth_response(state, &user).await
}

/// Match a Google profile to an account by Google id or email, linking the
/// Google identity to an existing email account, or create a passwordless
/// customer.
async fn find_or_create_google_user(state: &AppState, profile: &GoogleProfile) -> AppResult<User> {
    let email = profile.email.trim().to_lowercase();

    if let Some(user) = UserRepo::find_by_google_id_or_email(&state.pool, &profile.id, &email).await? {
        if user.google_id.is_some() {
            return Ok(user);
        }
        let linked = UserRepo::link_google(&state.pool, user.id, &profile.id, profile.avatar.as_deref())
            .await?
            .ok_or(CoreError::NotFound {
                entity: "User",
                id: user.id,
            })?;
        tracing::info!(user_id = linked.id, "Linked Google account");
        return Ok(linked);
    }

    let name = profile
        .name
        .clone()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| email.clone());
    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            name,
            email,
            password_hash: None,
            google_id: Some(profile.id.clone()),
            avatar: profile.avatar.clone(),
            role_id: CUSTOMER_ROLE_ID,
        },
    )
    .await?;
    tracing::info!(user_id = user.id, "User registered via Google");
    Ok(user)
}

/// Generate access + refresh tokens, persist a session row, and build the response.
///
/// The user's revoked and expired sessions are purged first.
pub(crate) async fn create_auth_response(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let role = RoleRepo::resolve_name(&state.pool, user.role_id).await?;

    let purged = SessionRepo::purge_stale(&state.pool, user.id).await?;
    if purged > 0 {
        tracing::debug!(user_id = user.id, purged, "Stale sessions removed");
    }

    let access = issue_access_token(user.id, &role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    let refresh = RefreshToken::generate();

    SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: refresh.hash,
            expires_at: state.config.jwt.refresh_expires_at(Utc::now()),
            user_agent: None,
            ip_address: None,
        },
    )
    .await?;

    Ok(AuthResponse {
        user: UserResponse::from_user(user, role),
        token: access.token,
        refresh_token: refresh.plaintext,
        expires_in: access.expires_in,
    })
}
