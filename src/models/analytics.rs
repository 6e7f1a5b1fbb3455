//! Pre-computed analytics aggregates.
//!
//! The dashboard serves these as-is; nothing is derived at request time.

use serde::{Deserialize, Serialize};

use super::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionCount {
    pub region: String,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: String,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressBucket {
    pub range: String,
    pub count: u32,
}

/// Apprentice population aggregates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprenticeAnalytics {
    pub total: u32,
    pub active: u32,
    pub at_risk: u32,
    pub completed: u32,
    pub by_region: Vec<RegionCount>,
    pub by_status: Vec<StatusCount>,
    pub progress_distribution: Vec<ProgressBucket>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionnaireTypeStats {
    #[serde(rename = "type")]
    pub questionnaire_type: String,
    pub responses: u32,
    pub avg_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyResponses {
    pub month: String,
    pub responses: u32,
}

/// Questionnaire completion aggregates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionnaireAnalytics {
    pub total_responses: u32,
    pub completion_rate: f64,
    pub average_score: f64,
    pub by_type: Vec<QuestionnaireTypeStats>,
    pub responses_trend: Vec<MonthlyResponses>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTypeStats {
    #[serde(rename = "type")]
    pub event_type: String,
    pub count: u32,
    pub attendance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyEvents {
    pub month: String,
    pub scheduled: u32,
    pub completed: u32,
}

/// Event attendance aggregates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAnalytics {
    pub total_events: u32,
    pub completed_events: u32,
    pub attendance_rate: f64,
    pub by_type: Vec<EventTypeStats>,
    pub monthly_trend: Vec<MonthlyEvents>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyUsers {
    pub date: String,
    pub users: u32,
}

/// Platform engagement aggregates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementAnalytics {
    pub daily_active_users: u32,
    pub weekly_active_users: u32,
    pub monthly_active_users: u32,
    /// Average session length in minutes.
    pub session_duration: f64,
    pub page_views: u32,
    pub user_activity_trend: Vec<DailyUsers>,
}

/// The full analytics aggregate object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsData {
    pub apprentices: ApprenticeAnalytics,
    pub questionnaires: QuestionnaireAnalytics,
    pub events: EventAnalytics,
    pub engagement: EngagementAnalytics,
}

/// Analytics sections a given role is allowed to see.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleAnalytics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apprentices: Option<ApprenticeAnalytics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub questionnaires: Option<QuestionnaireAnalytics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<EventAnalytics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement: Option<EngagementAnalytics>,
}

impl RoleAnalytics {
    /// Filter the aggregates down to what the role may see: admins see
    /// everything, SSP staff the operational sections, apprentices only
    /// their own engagement figures.
    pub fn for_role(data: &AnalyticsData, role: Role) -> Self {
        match role {
            Role::Admin => Self {
                apprentices: Some(data.apprentices.clone()),
                questionnaires: Some(data.questionnaires.clone()),
                events: Some(data.events.clone()),
                engagement: Some(data.engagement.clone()),
            },
            Role::Ssp => Self {
                apprentices: Some(data.apprentices.clone()),
                questionnaires: Some(data.questionnaires.clone()),
                events: Some(data.events.clone()),
                engagement: None,
            },
            Role::Apprentice => Self {
                apprentices: None,
                questionnaires: None,
                events: None,
                engagement: Some(data.engagement.clone()),
            },
        }
    }
}
