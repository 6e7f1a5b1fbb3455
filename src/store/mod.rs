//! In-memory application store.
//!
//! There is no persistence layer; all data is seeded at startup and lives
//! behind a single `RwLock` for the lifetime of the process. A revision
//! counter is bumped on every mutation and carried in every response
//! envelope so clients can detect staleness.

mod seed;

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::form;
use crate::models::{
    AnalyticsData, AnswerValue, CreateEventRequest, CreateUserRequest, Event, Questionnaire,
    QuestionnaireResponse, ResponseStatus, Role, TargetRole, UpdateEventRequest,
    UpdateProfileRequest, UpdateUserRequest, User,
};

struct StoreInner {
    revision_id: i64,
    users: Vec<User>,
    questionnaires: Vec<Questionnaire>,
    responses: Vec<QuestionnaireResponse>,
    events: Vec<Event>,
    analytics: AnalyticsData,
}

impl StoreInner {
    fn bump_revision(&mut self) -> i64 {
        self.revision_id += 1;
        self.revision_id
    }
}

/// Application data store.
pub struct Store {
    inner: RwLock<StoreInner>,
}

impl Store {
    /// Create a store populated with the demo seed data.
    pub fn seeded() -> Self {
        let questionnaires = seed::questionnaires();
        let responses = seed::responses(&questionnaires);
        Self {
            inner: RwLock::new(StoreInner {
                revision_id: 0,
                users: seed::users(),
                questionnaires,
                responses,
                events: seed::events(),
                analytics: seed::analytics(),
            }),
        }
    }

    /// Get the current revision ID.
    pub async fn revision_id(&self) -> i64 {
        self.inner.read().await.revision_id
    }

    // ==================== USER OPERATIONS ====================

    /// List all users.
    pub async fn list_users(&self) -> Vec<User> {
        self.inner.read().await.users.clone()
    }

    /// List users holding one role.
    pub async fn list_users_by_role(&self, role: Role) -> Vec<User> {
        self.inner
            .read()
            .await
            .users
            .iter()
            .filter(|u| u.role == role)
            .cloned()
            .collect()
    }

    /// Get a user by ID.
    pub async fn get_user(&self, id: &str) -> Option<User> {
        self.inner
            .read()
            .await
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
    }

    /// Look a user up by login email.
    pub async fn find_user_by_email(&self, email: &str) -> Option<User> {
        self.inner
            .read()
            .await
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned()
    }

    /// Stamp a successful login on the user.
    pub async fn record_login(&self, id: &str) -> Option<User> {
        let mut inner = self.inner.write().await;
        let user = inner.users.iter_mut().find(|u| u.id == id)?;
        user.last_login = Some(Utc::now());
        let user = user.clone();
        inner.bump_revision();
        Some(user)
    }

    /// Create a new user. The login email must be unique.
    pub async fn create_user(&self, request: &CreateUserRequest) -> Result<User, AppError> {
        let mut inner = self.inner.write().await;
        if inner.users.iter().any(|u| u.email == request.email) {
            return Err(AppError::Conflict(format!(
                "A user with email {} already exists",
                request.email
            )));
        }

        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            email: request.email.clone(),
            name: request.name.clone(),
            role: request.role,
            avatar: request.avatar.clone(),
            created_at: Utc::now(),
            last_login: None,
        };
        inner.users.push(user.clone());
        inner.bump_revision();
        Ok(user)
    }

    /// Update a user (admin operation).
    pub async fn update_user(
        &self,
        id: &str,
        request: &UpdateUserRequest,
    ) -> Result<User, AppError> {
        let mut inner = self.inner.write().await;

        if let Some(email) = &request.email {
            if inner.users.iter().any(|u| u.email == *email && u.id != id) {
                return Err(AppError::Conflict(format!(
                    "A user with email {} already exists",
                    email
                )));
            }
        }

        let user = inner
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;

        if let Some(email) = &request.email {
            user.email = email.clone();
        }
        if let Some(name) = &request.name {
            user.name = name.clone();
        }
        if let Some(role) = request.role {
            user.role = role;
        }
        if let Some(avatar) = &request.avatar {
            user.avatar = Some(avatar.clone());
        }

        let user = user.clone();
        inner.bump_revision();
        Ok(user)
    }

    /// Update the caller's own profile. Role changes are not possible here.
    pub async fn update_profile(
        &self,
        id: &str,
        request: &UpdateProfileRequest,
    ) -> Result<User, AppError> {
        let admin_request = UpdateUserRequest {
            email: request.email.clone(),
            name: request.name.clone(),
            role: None,
            avatar: request.avatar.clone(),
        };
        self.update_user(id, &admin_request).await
    }

    /// Delete a user.
    pub async fn delete_user(&self, id: &str) -> Result<(), AppError> {
        let mut inner = self.inner.write().await;
        let before = inner.users.len();
        inner.users.retain(|u| u.id != id);
        if inner.users.len() == before {
            return Err(AppError::NotFound(format!("User {} not found", id)));
        }
        inner.bump_revision();
        Ok(())
    }

    // ==================== QUESTIONNAIRE OPERATIONS ====================

    /// List the questionnaires a role may answer. Admins see every
    /// questionnaire including drafts; other roles see active ones
    /// addressed to them.
    pub async fn list_questionnaires_for_role(&self, role: Role) -> Vec<Questionnaire> {
        let inner = self.inner.read().await;
        match role {
            Role::Admin => inner.questionnaires.clone(),
            Role::Apprentice | Role::Ssp => {
                let target = match role {
                    Role::Apprentice => TargetRole::Apprentice,
                    _ => TargetRole::Ssp,
                };
                inner
                    .questionnaires
                    .iter()
                    .filter(|q| {
                        q.status == crate::models::QuestionnaireStatus::Active
                            && (q.target_role == target || q.target_role == TargetRole::All)
                    })
                    .cloned()
                    .collect()
            }
        }
    }

    /// Get a questionnaire by ID.
    pub async fn get_questionnaire(&self, id: &str) -> Option<Questionnaire> {
        self.inner
            .read()
            .await
            .questionnaires
            .iter()
            .find(|q| q.id == id)
            .cloned()
    }

    // ==================== RESPONSE OPERATIONS ====================

    /// List all of a user's responses.
    pub async fn list_responses_for_user(&self, user_id: &str) -> Vec<QuestionnaireResponse> {
        self.inner
            .read()
            .await
            .responses
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Get one user's response to one questionnaire.
    pub async fn get_response(
        &self,
        questionnaire_id: &str,
        user_id: &str,
    ) -> Option<QuestionnaireResponse> {
        self.inner
            .read()
            .await
            .responses
            .iter()
            .find(|r| r.questionnaire_id == questionnaire_id && r.user_id == user_id)
            .cloned()
    }

    /// Create or update a draft/in-progress response. Progress is always
    /// recomputed from the questionnaire's required questions; the client
    /// never supplies it.
    pub async fn save_response(
        &self,
        questionnaire: &Questionnaire,
        user_id: &str,
        answers: HashMap<String, AnswerValue>,
        status: ResponseStatus,
    ) -> Result<QuestionnaireResponse, AppError> {
        let now = Utc::now();
        let progress = form::calculate_progress(&answers, &questionnaire.questions);

        let mut inner = self.inner.write().await;
        let existing = inner
            .responses
            .iter()
            .position(|r| r.questionnaire_id == questionnaire.id && r.user_id == user_id);

        let response = match existing {
            Some(index) => {
                let response = &mut inner.responses[index];
                if response.status == ResponseStatus::Submitted {
                    return Err(AppError::Conflict(
                        "Response has already been submitted".to_string(),
                    ));
                }
                response.answers = answers;
                response.status = status;
                response.progress = progress;
                response.last_saved_at = now;
                if status == ResponseStatus::Completed {
                    response.completed_at.get_or_insert(now);
                }
                response.clone()
            }
            None => {
                let response = QuestionnaireResponse {
                    id: uuid::Uuid::new_v4().to_string(),
                    questionnaire_id: questionnaire.id.clone(),
                    user_id: user_id.to_string(),
                    answers,
                    status,
                    progress,
                    started_at: now,
                    completed_at: (status == ResponseStatus::Completed).then_some(now),
                    last_saved_at: now,
                };
                inner.responses.push(response.clone());
                response
            }
        };

        inner.bump_revision();
        Ok(response)
    }

    /// Submit a response: full-form validation of visible questions, then
    /// a terminal status change. The already-submitted check runs under
    /// the write lock, so two racing submits cannot both succeed.
    pub async fn submit_response(
        &self,
        questionnaire: &Questionnaire,
        user_id: &str,
        answers: HashMap<String, AnswerValue>,
    ) -> Result<QuestionnaireResponse, AppError> {
        let errors = form::validate_all(&questionnaire.questions, &answers);
        if !errors.is_empty() {
            return Err(AppError::AnswersInvalid(errors));
        }

        let now = Utc::now();
        let progress = form::calculate_progress(&answers, &questionnaire.questions);

        let mut inner = self.inner.write().await;
        let existing = inner
            .responses
            .iter()
            .position(|r| r.questionnaire_id == questionnaire.id && r.user_id == user_id);

        let response = match existing {
            Some(index) => {
                let response = &mut inner.responses[index];
                if response.status == ResponseStatus::Submitted {
                    return Err(AppError::Conflict(
                        "Response has already been submitted".to_string(),
                    ));
                }
                response.answers = answers;
                response.status = ResponseStatus::Submitted;
                response.progress = progress;
                response.completed_at = Some(now);
                response.last_saved_at = now;
                response.clone()
            }
            None => {
                let response = QuestionnaireResponse {
                    id: uuid::Uuid::new_v4().to_string(),
                    questionnaire_id: questionnaire.id.clone(),
                    user_id: user_id.to_string(),
                    answers,
                    status: ResponseStatus::Submitted,
                    progress,
                    started_at: now,
                    completed_at: Some(now),
                    last_saved_at: now,
                };
                inner.responses.push(response.clone());
                response
            }
        };

        inner.bump_revision();
        Ok(response)
    }

    // ==================== EVENT OPERATIONS ====================

    /// Events visible to a user: apprentices see events they attend, SSP
    /// staff see events they attend or created, admins see everything.
    pub async fn list_events_for(&self, user: &User) -> Vec<Event> {
        self.inner
            .read()
            .await
            .events
            .iter()
            .filter(|e| event_visible_to(e, user))
            .cloned()
            .collect()
    }

    /// Get an event by ID, but only when the user may see it.
    pub async fn get_event_for(&self, id: &str, user: &User) -> Option<Event> {
        self.inner
            .read()
            .await
            .events
            .iter()
            .find(|e| e.id == id && event_visible_to(e, user))
            .cloned()
    }

    /// Create a new event.
    pub async fn create_event(&self, request: &CreateEventRequest, created_by: &str) -> Event {
        let now = Utc::now();
        let event = Event {
            id: uuid::Uuid::new_v4().to_string(),
            title: request.title.clone(),
            description: request.description.clone(),
            event_type: request.event_type,
            status: request.status,
            start_date: request.start_date,
            end_date: request.end_date,
            location: request.location.clone(),
            is_virtual: request.is_virtual,
            meeting_link: request.meeting_link.clone(),
            attendees: request.attendees.clone(),
            created_by: created_by.to_string(),
            created_at: now,
            updated_at: now,
            reminders: request.reminders.clone(),
            notes: request.notes.clone(),
        };

        let mut inner = self.inner.write().await;
        inner.events.push(event.clone());
        inner.bump_revision();
        event
    }

    /// Update an event. The merged start/end pair must stay ordered.
    pub async fn update_event(
        &self,
        id: &str,
        request: &UpdateEventRequest,
    ) -> Result<Event, AppError> {
        let mut inner = self.inner.write().await;
        let event = inner
            .events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Event {} not found", id)))?;

        let start = request.start_date.unwrap_or(event.start_date);
        let end = request.end_date.unwrap_or(event.end_date);
        if end < start {
            return Err(AppError::Validation(
                "Event end date must not precede its start date".to_string(),
            ));
        }

        if let Some(title) = &request.title {
            event.title = title.clone();
        }
        if let Some(description) = &request.description {
            event.description = Some(description.clone());
        }
        if let Some(event_type) = request.event_type {
            event.event_type = event_type;
        }
        if let Some(status) = request.status {
            event.status = status;
        }
        event.start_date = start;
        event.end_date = end;
        if let Some(location) = &request.location {
            event.location = Some(location.clone());
        }
        if let Some(is_virtual) = request.is_virtual {
            event.is_virtual = is_virtual;
        }
        if let Some(meeting_link) = &request.meeting_link {
            event.meeting_link = Some(meeting_link.clone());
        }
        if let Some(attendees) = &request.attendees {
            event.attendees = attendees.clone();
        }
        if let Some(reminders) = &request.reminders {
            event.reminders = reminders.clone();
        }
        if let Some(notes) = &request.notes {
            event.notes = Some(notes.clone());
        }
        event.updated_at = Utc::now();

        let event = event.clone();
        inner.bump_revision();
        Ok(event)
    }

    /// Delete an event.
    pub async fn delete_event(&self, id: &str) -> Result<(), AppError> {
        let mut inner = self.inner.write().await;
        let before = inner.events.len();
        inner.events.retain(|e| e.id != id);
        if inner.events.len() == before {
            return Err(AppError::NotFound(format!("Event {} not found", id)));
        }
        inner.bump_revision();
        Ok(())
    }

    // ==================== ANALYTICS OPERATIONS ====================

    /// Get the pre-computed analytics aggregates.
    pub async fn analytics(&self) -> AnalyticsData {
        self.inner.read().await.analytics.clone()
    }
}

fn event_visible_to(event: &Event, user: &User) -> bool {
    match user.role {
        Role::Apprentice => event.attendees.apprentice_id.as_deref() == Some(user.id.as_str()),
        Role::Ssp => {
            event.attendees.ssp_id.as_deref() == Some(user.id.as_str())
                || event.created_by == user.id
        }
        Role::Admin => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pre_orientation_answers() -> HashMap<String, AnswerValue> {
        let mut answers = HashMap::new();
        answers.insert(
            "q1".to_string(),
            AnswerValue::Text("Trouver un emploi stable".to_string()),
        );
        answers.insert("q2".to_string(), AnswerValue::Text("masonry".to_string()));
        answers.insert("q4".to_string(), AnswerValue::Number(8.0));
        answers
    }

    #[tokio::test]
    async fn test_save_recomputes_progress() {
        let store = Store::seeded();
        let questionnaire = store.get_questionnaire("1").await.unwrap();

        let mut answers = HashMap::new();
        answers.insert("q1".to_string(), AnswerValue::Text("objectif".to_string()));

        let response = store
            .save_response(&questionnaire, "2", answers, ResponseStatus::InProgress)
            .await
            .unwrap();

        // 1 of 3 required questions answered
        assert_eq!(response.progress, 33);
        assert_eq!(response.status, ResponseStatus::InProgress);
    }

    #[tokio::test]
    async fn test_submit_rejects_incomplete_answers() {
        let store = Store::seeded();
        let questionnaire = store.get_questionnaire("1").await.unwrap();

        let err = store
            .submit_response(&questionnaire, "2", HashMap::new())
            .await
            .unwrap_err();

        match err {
            AppError::AnswersInvalid(errors) => {
                assert!(errors.contains_key("q1"));
                assert!(errors.contains_key("q2"));
                assert!(errors.contains_key("q4"));
                // q3 is hidden (q2 unanswered), q5 optional
                assert!(!errors.contains_key("q3"));
                assert!(!errors.contains_key("q5"));
            }
            other => panic!("expected AnswersInvalid, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_submit_then_double_submit_conflicts() {
        let store = Store::seeded();
        let questionnaire = store.get_questionnaire("1").await.unwrap();

        let response = store
            .submit_response(&questionnaire, "2", pre_orientation_answers())
            .await
            .unwrap();
        assert_eq!(response.status, ResponseStatus::Submitted);
        assert_eq!(response.progress, 100);
        assert!(response.completed_at.is_some());

        let err = store
            .submit_response(&questionnaire, "2", pre_orientation_answers())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_save_over_submitted_response_conflicts() {
        let store = Store::seeded();
        let questionnaire = store.get_questionnaire("1").await.unwrap();

        store
            .submit_response(&questionnaire, "2", pre_orientation_answers())
            .await
            .unwrap();

        let err = store
            .save_response(
                &questionnaire,
                "2",
                HashMap::new(),
                ResponseStatus::Draft,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_create_user_duplicate_email_conflicts() {
        let store = Store::seeded();
        let request = CreateUserRequest {
            email: "apprentice@btpcfa.fr".to_string(),
            name: "Doublon".to_string(),
            role: Role::Apprentice,
            avatar: None,
        };

        let err = store.create_user(&request).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_event_visibility_per_role() {
        let store = Store::seeded();

        let apprentice = store.get_user("1").await.unwrap();
        let ssp = store.get_user("2").await.unwrap();
        let admin = store.get_user("3").await.unwrap();

        // Marie attends events 1 and 2; the workshop has no apprentice
        assert_eq!(store.list_events_for(&apprentice).await.len(), 2);
        // Jean attends 1 and 2 and created both; admin created event 3
        // but Jean is its SSP attendee
        assert_eq!(store.list_events_for(&ssp).await.len(), 3);
        assert_eq!(store.list_events_for(&admin).await.len(), 3);
    }

    #[tokio::test]
    async fn test_revision_bumps_on_mutation() {
        let store = Store::seeded();
        let before = store.revision_id().await;

        let questionnaire = store.get_questionnaire("1").await.unwrap();
        store
            .save_response(
                &questionnaire,
                "2",
                HashMap::new(),
                ResponseStatus::Draft,
            )
            .await
            .unwrap();

        assert!(store.revision_id().await > before);
    }
}
