//! Display metadata endpoint.
//!
//! French labels for the closed enumerations, so clients render the same
//! vocabulary everywhere without hardcoding it.

use axum::{extract::State, Extension};
use serde::Serialize;

use super::{success, ApiResult};
use crate::auth::CurrentUser;
use crate::models::{EventStatus, EventType, Role};
use crate::AppState;

const EVENT_TYPES: [EventType; 6] = [
    EventType::Interview,
    EventType::FollowUp,
    EventType::Meeting,
    EventType::Workshop,
    EventType::Assessment,
    EventType::Other,
];

const EVENT_STATUSES: [EventStatus; 4] = [
    EventStatus::Scheduled,
    EventStatus::Completed,
    EventStatus::Cancelled,
    EventStatus::Rescheduled,
];

const ROLES: [Role; 3] = [Role::Apprentice, Role::Ssp, Role::Admin];

#[derive(Debug, Serialize)]
pub struct LabeledValue<T: Serialize> {
    pub value: T,
    pub label: &'static str,
}

/// Display vocabulary of the dashboard.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub roles: Vec<LabeledValue<Role>>,
    pub event_types: Vec<LabeledValue<EventType>>,
    pub event_statuses: Vec<LabeledValue<EventStatus>>,
}

/// GET /api/meta - Labels for roles, event types and event statuses.
pub async fn get_meta(
    State(state): State<AppState>,
    Extension(CurrentUser(_user)): Extension<CurrentUser>,
) -> ApiResult<Meta> {
    let meta = Meta {
        roles: ROLES
            .iter()
            .map(|r| LabeledValue {
                value: *r,
                label: r.display_name(),
            })
            .collect(),
        event_types: EVENT_TYPES
            .iter()
            .map(|t| LabeledValue {
                value: *t,
                label: t.display_name(),
            })
            .collect(),
        event_statuses: EVENT_STATUSES
            .iter()
            .map(|s| LabeledValue {
                value: *s,
                label: s.display_name(),
            })
            .collect(),
    };

    success(meta, state.store.revision_id().await)
}
