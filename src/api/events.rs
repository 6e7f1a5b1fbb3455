//! Event and calendar endpoints.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{Datelike, Utc};
use serde::Deserialize;

use super::{error, success, ApiResult};
use crate::auth::CurrentUser;
use crate::calendar::{self, CalendarMonth, DEFAULT_UPCOMING_LIMIT};
use crate::errors::AppError;
use crate::models::{has_role, CreateEventRequest, Event, Role, UpdateEventRequest};
use crate::AppState;

/// GET /api/events - List the events visible to the caller.
pub async fn list_events(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Vec<Event>> {
    let revision_id = state.store.revision_id().await;
    success(state.store.list_events_for(&user).await, revision_id)
}

/// GET /api/events/:id - Get a single visible event.
pub async fn get_event(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Event> {
    let revision_id = state.store.revision_id().await;

    match state.store.get_event_for(&id, &user).await {
        Some(event) => success(event, revision_id),
        None => error(
            AppError::NotFound(format!("Event {} not found", id)),
            revision_id,
        ),
    }
}

/// POST /api/events - Create an event (SSP and admin only).
pub async fn create_event(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(request): Json<CreateEventRequest>,
) -> ApiResult<Event> {
    let revision_id = state.store.revision_id().await;

    if !has_role(Some(&user), &[Role::Ssp, Role::Admin]) {
        return error(
            AppError::Forbidden("Only SSP staff and administrators can create events".to_string()),
            revision_id,
        );
    }
    if request.title.trim().is_empty() {
        return error(
            AppError::Validation("Title is required".to_string()),
            revision_id,
        );
    }
    if request.end_date < request.start_date {
        return error(
            AppError::Validation("Event end date must not precede its start date".to_string()),
            revision_id,
        );
    }

    let event = state.store.create_event(&request, &user.id).await;
    tracing::info!(event = %event.id, title = %event.title, "Event created");

    let new_revision = state.store.revision_id().await;
    success(event, new_revision)
}

/// PUT /api/events/:id - Update an event (SSP and admin only).
pub async fn update_event(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(request): Json<UpdateEventRequest>,
) -> ApiResult<Event> {
    let revision_id = state.store.revision_id().await;

    if !has_role(Some(&user), &[Role::Ssp, Role::Admin]) {
        return error(
            AppError::Forbidden("Only SSP staff and administrators can update events".to_string()),
            revision_id,
        );
    }

    match state.store.update_event(&id, &request).await {
        Ok(event) => {
            let new_revision = state.store.revision_id().await;
            success(event, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/events/:id - Delete an event (SSP and admin only).
pub async fn delete_event(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let revision_id = state.store.revision_id().await;

    if !has_role(Some(&user), &[Role::Ssp, Role::Admin]) {
        return error(
            AppError::Forbidden("Only SSP staff and administrators can delete events".to_string()),
            revision_id,
        );
    }

    match state.store.delete_event(&id).await {
        Ok(()) => {
            tracing::info!(event = %id, "Event deleted");
            let new_revision = state.store.revision_id().await;
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    year: Option<i32>,
    month: Option<u32>,
}

/// GET /api/events/calendar - The 42-cell month grid of the caller's
/// visible events. Defaults to the current month.
pub async fn event_calendar(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<CalendarQuery>,
) -> ApiResult<CalendarMonth> {
    let revision_id = state.store.revision_id().await;

    let today = Utc::now().date_naive();
    let year = query.year.unwrap_or_else(|| today.year());
    let month = query.month.unwrap_or_else(|| today.month());

    let events = state.store.list_events_for(&user).await;
    match calendar::month_grid(year, month, today, &events) {
        Ok(grid) => success(grid, revision_id),
        Err(e) => error(e, revision_id),
    }
}

#[derive(Debug, Deserialize)]
pub struct UpcomingQuery {
    limit: Option<usize>,
}

/// GET /api/events/upcoming - The caller's next scheduled events.
pub async fn upcoming_events(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<UpcomingQuery>,
) -> ApiResult<Vec<Event>> {
    let revision_id = state.store.revision_id().await;

    let events = state.store.list_events_for(&user).await;
    let limit = query.limit.unwrap_or(DEFAULT_UPCOMING_LIMIT);
    success(calendar::upcoming(&events, Utc::now(), limit), revision_id)
}
