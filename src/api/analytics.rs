//! Analytics endpoints.

use axum::{extract::State, Extension};

use super::{success, ApiResult};
use crate::auth::CurrentUser;
use crate::models::RoleAnalytics;
use crate::AppState;

/// GET /api/analytics - The analytics sections the caller's role may see.
pub async fn get_analytics(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<RoleAnalytics> {
    let revision_id = state.store.revision_id().await;
    let data = state.store.analytics().await;
    success(RoleAnalytics::for_role(&data, user.role), revision_id)
}
