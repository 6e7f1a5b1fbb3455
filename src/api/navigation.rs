//! Navigation endpoint.

use axum::{extract::State, Extension};

use super::{success, ApiResult};
use crate::auth::CurrentUser;
use crate::models::{visible_items, NavItem};
use crate::AppState;

/// GET /api/navigation - The menu entries visible to the caller's role.
pub async fn get_navigation(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Vec<NavItem>> {
    let revision_id = state.store.revision_id().await;
    success(visible_items(&user), revision_id)
}
