//! User management endpoints.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;

use super::{error, success, ApiResult};
use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::models::{
    has_role, CreateUserRequest, QuestionnaireResponse, Role, UpdateUserRequest, User,
};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    role: Option<Role>,
}

/// GET /api/users - List users. Admins see everyone and may filter by
/// role; SSP staff only ever see the apprentices they support.
pub async fn list_users(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<ListUsersQuery>,
) -> ApiResult<Vec<User>> {
    let revision_id = state.store.revision_id().await;

    let users = match user.role {
        Role::Admin => match query.role {
            Some(role) => state.store.list_users_by_role(role).await,
            None => state.store.list_users().await,
        },
        Role::Ssp => state.store.list_users_by_role(Role::Apprentice).await,
        Role::Apprentice => {
            return error(
                AppError::Forbidden("Apprentices cannot list users".to_string()),
                revision_id,
            )
        }
    };

    success(users, revision_id)
}

/// POST /api/users - Create a new user (admin only).
pub async fn create_user(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(request): Json<CreateUserRequest>,
) -> ApiResult<User> {
    let revision_id = state.store.revision_id().await;

    if !has_role(Some(&user), &[Role::Admin]) {
        return error(
            AppError::Forbidden("Only administrators can create users".to_string()),
            revision_id,
        );
    }
    if request.email.trim().is_empty() {
        return error(
            AppError::Validation("Email is required".to_string()),
            revision_id,
        );
    }
    if request.name.trim().is_empty() {
        return error(
            AppError::Validation("Name is required".to_string()),
            revision_id,
        );
    }

    match state.store.create_user(&request).await {
        Ok(created) => {
            tracing::info!(email = %created.email, "User created");
            let new_revision = state.store.revision_id().await;
            success(created, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/users/:id - Get a single user. Allowed for admins, for the
/// user themselves, and for SSP staff looking at an apprentice.
pub async fn get_user(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<User> {
    let revision_id = state.store.revision_id().await;

    let Some(target) = state.store.get_user(&id).await else {
        return error(
            AppError::NotFound(format!("User {} not found", id)),
            revision_id,
        );
    };

    let allowed = user.id == target.id
        || has_role(Some(&user), &[Role::Admin])
        || (user.role == Role::Ssp && target.role == Role::Apprentice);
    if !allowed {
        return error(
            AppError::Forbidden("Not allowed to view this user".to_string()),
            revision_id,
        );
    }

    success(target, revision_id)
}

/// PUT /api/users/:id - Update a user (admin only).
pub async fn update_user(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(request): Json<UpdateUserRequest>,
) -> ApiResult<User> {
    let revision_id = state.store.revision_id().await;

    if !has_role(Some(&user), &[Role::Admin]) {
        return error(
            AppError::Forbidden("Only administrators can update users".to_string()),
            revision_id,
        );
    }

    match state.store.update_user(&id, &request).await {
        Ok(updated) => {
            let new_revision = state.store.revision_id().await;
            success(updated, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/users/:id - Delete a user (admin only).
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let revision_id = state.store.revision_id().await;

    if !has_role(Some(&user), &[Role::Admin]) {
        return error(
            AppError::Forbidden("Only administrators can delete users".to_string()),
            revision_id,
        );
    }
    if user.id == id {
        return error(
            AppError::Validation("Cannot delete your own account".to_string()),
            revision_id,
        );
    }

    match state.store.delete_user(&id).await {
        Ok(()) => {
            tracing::info!(user_id = %id, "User deleted");
            let new_revision = state.store.revision_id().await;
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/users/:id/responses - List a user's questionnaire responses.
/// Allowed for the user themselves and for SSP/admin staff.
pub async fn list_user_responses(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Vec<QuestionnaireResponse>> {
    let revision_id = state.store.revision_id().await;

    let allowed = user.id == id || has_role(Some(&user), &[Role::Ssp, Role::Admin]);
    if !allowed {
        return error(
            AppError::Forbidden("Not allowed to view these responses".to_string()),
            revision_id,
        );
    }

    success(state.store.list_responses_for_user(&id).await, revision_id)
}
