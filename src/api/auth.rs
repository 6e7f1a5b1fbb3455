//! Authentication endpoints.

use axum::{extract::State, Extension, Json};

use super::{error, success, ApiResult};
use crate::auth::{verify_password, CurrentUser, SessionToken};
use crate::errors::AppError;
use crate::models::{LoginRequest, LoginResponse, UpdateProfileRequest, User};
use crate::AppState;

/// POST /api/auth/login - Authenticate a demo account.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let revision_id = state.store.revision_id().await;

    let user = state.store.find_user_by_email(&request.email).await;
    // The comparison runs whether or not the account exists, so a probe
    // cannot distinguish the two by timing.
    let password_ok = verify_password(&request.password, &state.config.demo_password);

    let Some(user) = user.filter(|_| password_ok) else {
        return error(
            AppError::Unauthorized("Invalid credentials".to_string()),
            revision_id,
        );
    };

    let user = state.store.record_login(&user.id).await.unwrap_or(user);
    let token = state.sessions.issue(&user.id).await;
    tracing::info!(email = %user.email, role = user.role.as_str(), "User logged in");

    let revision_id = state.store.revision_id().await;
    success(LoginResponse { token, user }, revision_id)
}

/// POST /api/auth/logout - Revoke the current session.
pub async fn logout(
    State(state): State<AppState>,
    Extension(SessionToken(token)): Extension<SessionToken>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<()> {
    state.sessions.revoke(&token).await;
    tracing::info!(email = %user.email, "User logged out");

    success((), state.store.revision_id().await)
}

/// GET /api/auth/me - The authenticated user.
pub async fn me(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<User> {
    success(user, state.store.revision_id().await)
}

/// PUT /api/auth/profile - Update the authenticated user's own profile.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(request): Json<UpdateProfileRequest>,
) -> ApiResult<User> {
    let revision_id = state.store.revision_id().await;

    if matches!(&request.name, Some(name) if name.trim().is_empty()) {
        return error(
            AppError::Validation("Name must not be empty".to_string()),
            revision_id,
        );
    }
    if matches!(&request.email, Some(email) if email.trim().is_empty()) {
        return error(
            AppError::Validation("Email must not be empty".to_string()),
            revision_id,
        );
    }

    match state.store.update_profile(&user.id, &request).await {
        Ok(user) => {
            let new_revision = state.store.revision_id().await;
            success(user, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}
