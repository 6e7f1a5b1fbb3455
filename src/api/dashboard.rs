//! Role-composed dashboard endpoint.
//!
//! One call returning what the landing screen of each role shows, so the
//! client does not fan out over half the API on login.

use axum::{extract::State, Extension};
use chrono::Utc;
use serde::Serialize;

use super::{success, ApiResult};
use crate::auth::CurrentUser;
use crate::calendar::{self, DEFAULT_UPCOMING_LIMIT};
use crate::models::{Event, Questionnaire, QuestionnaireResponse, Role, User};
use crate::AppState;

/// A questionnaire paired with the caller's response to it, if any.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionnaireEntry {
    pub questionnaire: Questionnaire,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<QuestionnaireResponse>,
}

/// Headline figures of the SSP landing screen.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SspStats {
    pub total_apprentices: usize,
    pub upcoming_appointments: usize,
}

/// Headline figures of the admin landing screen.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_users: usize,
    pub total_questionnaires: usize,
    pub total_events: usize,
}

/// The composed dashboard payload. Sections are per-role.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub user: User,
    pub upcoming_events: Vec<Event>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub questionnaires: Option<Vec<QuestionnaireEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apprentices: Option<Vec<User>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssp_stats: Option<SspStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_stats: Option<AdminStats>,
}

/// GET /api/dashboard - The landing-screen composition for the caller's
/// role.
pub async fn get_dashboard(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<DashboardData> {
    let revision_id = state.store.revision_id().await;

    let events = state.store.list_events_for(&user).await;
    let upcoming_events = calendar::upcoming(&events, Utc::now(), DEFAULT_UPCOMING_LIMIT);

    let mut data = DashboardData {
        user: user.clone(),
        upcoming_events,
        questionnaires: None,
        apprentices: None,
        ssp_stats: None,
        admin_stats: None,
    };

    match user.role {
        Role::Apprentice => {
            let mut entries = Vec::new();
            for questionnaire in state.store.list_questionnaires_for_role(user.role).await {
                let response = state.store.get_response(&questionnaire.id, &user.id).await;
                entries.push(QuestionnaireEntry {
                    questionnaire,
                    response,
                });
            }
            data.questionnaires = Some(entries);
        }
        Role::Ssp => {
            let apprentices = state.store.list_users_by_role(Role::Apprentice).await;
            data.ssp_stats = Some(SspStats {
                total_apprentices: apprentices.len(),
                upcoming_appointments: data.upcoming_events.len(),
            });
            data.apprentices = Some(apprentices);
        }
        Role::Admin => {
            data.admin_stats = Some(AdminStats {
                total_users: state.store.list_users().await.len(),
                total_questionnaires: state
                    .store
                    .list_questionnaires_for_role(Role::Admin)
                    .await
                    .len(),
                total_events: events.len(),
            });
        }
    }

    success(data, revision_id)
}
