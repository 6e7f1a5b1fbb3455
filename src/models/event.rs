//! Event model for appointments and follow-up meetings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum EventType {
    Interview,
    FollowUp,
    Meeting,
    Workshop,
    Assessment,
    Other,
}

impl EventType {
    /// French label shown in the dashboard.
    pub fn display_name(&self) -> &'static str {
        match self {
            EventType::Interview => "Entretien",
            EventType::FollowUp => "Suivi",
            EventType::Meeting => "Réunion",
            EventType::Workshop => "Atelier",
            EventType::Assessment => "Évaluation",
            EventType::Other => "Autre",
        }
    }
}

/// Scheduling status. Transitions are not modeled; this is a label.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Scheduled,
    Completed,
    Cancelled,
    Rescheduled,
}

impl EventStatus {
    /// French label shown in the dashboard.
    pub fn display_name(&self) -> &'static str {
        match self {
            EventStatus::Scheduled => "Programmé",
            EventStatus::Completed => "Terminé",
            EventStatus::Cancelled => "Annulé",
            EventStatus::Rescheduled => "Reporté",
        }
    }
}

/// Attendee references by role.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAttendees {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apprentice_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssp_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_attendees: Option<Vec<String>>,
}

/// Reminder channels and lead time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventReminders {
    pub email: bool,
    pub sms: bool,
    pub push: bool,
    /// Minutes before the event start.
    pub reminder_time: u32,
}

impl Default for EventReminders {
    fn default() -> Self {
        Self {
            email: true,
            sms: false,
            push: true,
            reminder_time: 60,
        }
    }
}

/// A scheduled appointment, workshop or meeting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub status: EventStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub is_virtual: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
    pub attendees: EventAttendees,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub reminders: EventReminders,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Request body for creating a new event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub event_type: EventType,
    #[serde(default = "default_status")]
    pub status: EventStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub is_virtual: bool,
    #[serde(default)]
    pub meeting_link: Option<String>,
    #[serde(default)]
    pub attendees: EventAttendees,
    #[serde(default)]
    pub reminders: EventReminders,
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_status() -> EventStatus {
    EventStatus::Scheduled
}

/// Request body for updating an existing event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub event_type: Option<EventType>,
    #[serde(default)]
    pub status: Option<EventStatus>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub is_virtual: Option<bool>,
    #[serde(default)]
    pub meeting_link: Option<String>,
    #[serde(default)]
    pub attendees: Option<EventAttendees>,
    #[serde(default)]
    pub reminders: Option<EventReminders>,
    #[serde(default)]
    pub notes: Option<String>,
}
