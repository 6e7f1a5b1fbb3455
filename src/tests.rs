//! Integration tests for the suivi backend.

use std::sync::Arc;

use chrono::{Duration, Utc};
use reqwest::Client;
use serde_json::{json, Value};

use crate::auth::Sessions;
use crate::config::Config;
use crate::store::Store;
use crate::{create_router, AppState};

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
}

impl TestFixture {
    async fn new() -> Self {
        let config = Config {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "warn".to_string(),
            demo_password: "demo".to_string(),
        };

        let state = AppState {
            store: Arc::new(Store::seeded()),
            sessions: Arc::new(Sessions::new()),
            config: Arc::new(config),
        };

        let app = create_router(state);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        // Spawn server
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        TestFixture {
            client: Client::new(),
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Log a demo account in and return its bearer token.
    async fn login(&self, email: &str) -> String {
        let resp = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&json!({ "email": email, "password": "demo" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200, "login failed for {}", email);

        let body: Value = resp.json().await.unwrap();
        body["data"]["token"].as_str().unwrap().to_string()
    }

    async fn login_apprentice(&self) -> String {
        self.login("apprentice@btpcfa.fr").await
    }

    async fn login_ssp(&self) -> String {
        self.login("ssp@btpcfa.fr").await
    }

    async fn login_admin(&self) -> String {
        self.login("admin@btpcfa.fr").await
    }
}

// ==================== HEALTH & AUTH ====================

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_login_success() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/auth/login"))
        .json(&json!({ "email": "apprentice@btpcfa.fr", "password": "demo" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert!(body["data"]["token"].is_string());
    assert_eq!(body["data"]["user"]["name"], "Marie Dubois");
    assert_eq!(body["data"]["user"]["role"], "apprentice");
    assert!(body["data"]["user"]["lastLogin"].is_string());
}

#[tokio::test]
async fn test_login_wrong_password() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/auth/login"))
        .json(&json!({ "email": "apprentice@btpcfa.fr", "password": "wrong" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    assert_eq!(body["error"]["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_login_unknown_email() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/auth/login"))
        .json(&json!({ "email": "nobody@btpcfa.fr", "password": "demo" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    // Same generic message as a wrong password
    assert_eq!(body["error"]["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/auth/me"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_invalid_token_rejected() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/auth/me"))
        .bearer_auth("not-a-token")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn test_logout_revokes_session() {
    let fixture = TestFixture::new().await;
    let token = fixture.login_apprentice().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/auth/logout"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = fixture
        .client
        .get(fixture.url("/api/auth/me"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn test_me_and_profile_update() {
    let fixture = TestFixture::new().await;
    let token = fixture.login_apprentice().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/auth/me"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["email"], "apprentice@btpcfa.fr");

    let resp = fixture
        .client
        .put(fixture.url("/api/auth/profile"))
        .bearer_auth(&token)
        .json(&json!({ "name": "Marie Dupont" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["name"], "Marie Dupont");
    // Role cannot change through the profile route
    assert_eq!(body["data"]["role"], "apprentice");
}

// ==================== NAVIGATION ====================

#[tokio::test]
async fn test_navigation_is_role_filtered() {
    let fixture = TestFixture::new().await;

    let token = fixture.login_apprentice().await;
    let resp = fixture
        .client
        .get(fixture.url("/api/navigation"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let hrefs: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["href"].as_str().unwrap())
        .collect();
    assert_eq!(
        hrefs,
        vec![
            "/dashboard",
            "/profile",
            "/questionnaires",
            "/appointments",
            "/resources"
        ]
    );

    let token = fixture.login_admin().await;
    let resp = fixture
        .client
        .get(fixture.url("/api/navigation"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let hrefs: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["href"].as_str().unwrap())
        .collect();
    assert!(hrefs.contains(&"/users"));
    assert!(hrefs.contains(&"/settings"));
    assert!(!hrefs.contains(&"/questionnaires"));
}

// ==================== DASHBOARD ====================

#[tokio::test]
async fn test_dashboard_composition_per_role() {
    let fixture = TestFixture::new().await;

    // Apprentice: questionnaires with their responses attached
    let token = fixture.login_apprentice().await;
    let resp = fixture
        .client
        .get(fixture.url("/api/dashboard"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let entries = body["data"]["questionnaires"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["response"]["status"], "completed");
    assert!(body["data"]["sspStats"].is_null());

    // SSP: apprentice roster and headline figures
    let token = fixture.login_ssp().await;
    let resp = fixture
        .client
        .get(fixture.url("/api/dashboard"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["sspStats"]["totalApprentices"], 1);
    assert_eq!(body["data"]["apprentices"].as_array().unwrap().len(), 1);
    assert!(body["data"]["questionnaires"].is_null());

    // Admin: system counts
    let token = fixture.login_admin().await;
    let resp = fixture
        .client
        .get(fixture.url("/api/dashboard"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["adminStats"]["totalUsers"], 3);
    assert_eq!(body["data"]["adminStats"]["totalEvents"], 3);
}

// ==================== QUESTIONNAIRES ====================

#[tokio::test]
async fn test_questionnaires_listed_for_apprentice() {
    let fixture = TestFixture::new().await;
    let token = fixture.login_apprentice().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/questionnaires"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let list = body["data"].as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["title"], "Questionnaire de pré-orientation");
    assert_eq!(list[0]["questions"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_apprentice_questionnaire_hidden_from_ssp() {
    let fixture = TestFixture::new().await;
    let token = fixture.login_ssp().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/questionnaires/1"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 403);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_unknown_questionnaire_is_404() {
    let fixture = TestFixture::new().await;
    let token = fixture.login_apprentice().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/questionnaires/999"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_questionnaire_end_to_end() {
    let fixture = TestFixture::new().await;
    let token = fixture.login_apprentice().await;

    // Start from a blank answer set: progress is 0
    let resp = fixture
        .client
        .put(fixture.url("/api/questionnaires/1/response"))
        .bearer_auth(&token)
        .json(&json!({ "answers": {}, "status": "draft" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["progress"], 0);
    assert_eq!(body["data"]["status"], "draft");

    // Submitting the blank form is blocked with per-question errors
    let resp = fixture
        .client
        .post(fixture.url("/api/questionnaires/1/response/submit"))
        .bearer_auth(&token)
        .json(&json!({ "answers": {} }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    let errors = &body["error"]["details"]["errors"];
    assert!(errors["q1"].is_string());
    assert!(errors["q2"].is_string());
    assert!(errors["q4"].is_string());
    // q3 is conditional on q2 == "other" and stays hidden; q5 is optional
    assert!(errors["q3"].is_null());
    assert!(errors["q5"].is_null());

    // Answer the three required questions; q3 stays hidden since
    // q2 != "other"
    let answers = json!({
        "q1": "Obtenir un diplôme reconnu",
        "q2": "masonry",
        "q4": 8
    });

    let resp = fixture
        .client
        .put(fixture.url("/api/questionnaires/1/response"))
        .bearer_auth(&token)
        .json(&json!({ "answers": answers, "status": "in-progress" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["progress"], 100);

    // Submit succeeds
    let resp = fixture
        .client
        .post(fixture.url("/api/questionnaires/1/response/submit"))
        .bearer_auth(&token)
        .json(&json!({ "answers": answers }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["status"], "submitted");
    assert_eq!(body["data"]["progress"], 100);
    assert!(body["data"]["completedAt"].is_string());

    // A second submit is rejected
    let resp = fixture
        .client
        .post(fixture.url("/api/questionnaires/1/response/submit"))
        .bearer_auth(&token)
        .json(&json!({ "answers": answers }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_submit_rejects_out_of_bounds_scale() {
    let fixture = TestFixture::new().await;
    let token = fixture.login_apprentice().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/questionnaires/1/response/submit"))
        .bearer_auth(&token)
        .json(&json!({ "answers": {
            "q1": "Objectif",
            "q2": "masonry",
            "q4": 11
        }}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"]["details"]["errors"]["q4"].is_string());
}

#[tokio::test]
async fn test_conditional_question_required_when_revealed() {
    let fixture = TestFixture::new().await;
    let token = fixture.login_apprentice().await;

    // q2 = "other" reveals q3; it is optional, so submission still works
    let resp = fixture
        .client
        .post(fixture.url("/api/questionnaires/1/response/submit"))
        .bearer_auth(&token)
        .json(&json!({ "answers": {
            "q1": "Objectif",
            "q2": "other",
            "q3": "Couverture",
            "q4": 5
        }}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn test_step_validation_scopes_to_page() {
    let fixture = TestFixture::new().await;
    let token = fixture.login_apprentice().await;

    // Page 0 holds q1-q3; q3 stays hidden without q2 == "other"
    let resp = fixture
        .client
        .post(fixture.url("/api/questionnaires/1/response/validate"))
        .bearer_auth(&token)
        .json(&json!({ "answers": {}, "step": 0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["valid"], false);
    assert_eq!(body["data"]["totalSteps"], 2);
    let errors = &body["data"]["errors"];
    assert!(errors["q1"].is_string());
    assert!(errors["q2"].is_string());
    assert!(errors["q3"].is_null());
    // q4 lives on page 1 and is not checked here
    assert!(errors["q4"].is_null());

    // With page 0 answered, the step advance is clean even though q4 is
    // still missing
    let resp = fixture
        .client
        .post(fixture.url("/api/questionnaires/1/response/validate"))
        .bearer_auth(&token)
        .json(&json!({ "answers": {
            "q1": "Objectif",
            "q2": "masonry"
        }, "step": 0 }))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["valid"], true);
    assert_eq!(body["data"]["progress"], 67);
}

#[tokio::test]
async fn test_meta_labels() {
    let fixture = TestFixture::new().await;
    let token = fixture.login_apprentice().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/meta"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let roles = body["data"]["roles"].as_array().unwrap();
    assert_eq!(roles.len(), 3);
    assert!(roles
        .iter()
        .any(|r| r["value"] == "ssp" && r["label"] == "Service Socio-Pro"));
    let types = body["data"]["eventTypes"].as_array().unwrap();
    assert!(types
        .iter()
        .any(|t| t["value"] == "workshop" && t["label"] == "Atelier"));
}

#[tokio::test]
async fn test_get_my_response_returns_seeded_draft() {
    let fixture = TestFixture::new().await;
    let token = fixture.login_apprentice().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/questionnaires/2/response"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["status"], "in-progress");
    assert_eq!(body["data"]["answers"]["p1"], "family");
}

// ==================== EVENTS & CALENDAR ====================

#[tokio::test]
async fn test_event_visibility_per_role() {
    let fixture = TestFixture::new().await;

    let token = fixture.login_apprentice().await;
    let resp = fixture
        .client
        .get(fixture.url("/api/events"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    // Marie attends the interview and the follow-up, not the workshop
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let token = fixture.login_admin().await;
    let resp = fixture
        .client
        .get(fixture.url("/api/events"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_apprentice_cannot_create_events() {
    let fixture = TestFixture::new().await;
    let token = fixture.login_apprentice().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/events"))
        .bearer_auth(&token)
        .json(&json!({
            "title": "Rendez-vous",
            "type": "meeting",
            "startDate": "2025-01-10T10:00:00Z",
            "endDate": "2025-01-10T11:00:00Z"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 403);
}

#[tokio::test]
async fn test_event_crud_as_ssp() {
    let fixture = TestFixture::new().await;
    let token = fixture.login_ssp().await;

    // Create
    let resp = fixture
        .client
        .post(fixture.url("/api/events"))
        .bearer_auth(&token)
        .json(&json!({
            "title": "Entretien de suivi",
            "type": "interview",
            "startDate": "2025-01-10T10:00:00Z",
            "endDate": "2025-01-10T11:00:00Z",
            "location": "Bureau 202",
            "attendees": { "apprenticeId": "1", "sspId": "2" }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let event_id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["status"], "scheduled");
    assert_eq!(body["data"]["createdBy"], "2");
    let revision_after_create = body["revisionId"].as_i64().unwrap();

    // Get
    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/events/{}", event_id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // Update
    let resp = fixture
        .client
        .put(fixture.url(&format!("/api/events/{}", event_id)))
        .bearer_auth(&token)
        .json(&json!({ "status": "completed", "notes": "Fait" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["status"], "completed");
    assert_eq!(body["data"]["notes"], "Fait");
    let revision_after_update = body["revisionId"].as_i64().unwrap();
    assert!(revision_after_update > revision_after_create);

    // Delete
    let resp = fixture
        .client
        .delete(fixture.url(&format!("/api/events/{}", event_id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // Verify deleted
    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/events/{}", event_id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_event_dates_validated() {
    let fixture = TestFixture::new().await;
    let token = fixture.login_ssp().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/events"))
        .bearer_auth(&token)
        .json(&json!({
            "title": "Inversé",
            "type": "meeting",
            "startDate": "2025-01-10T11:00:00Z",
            "endDate": "2025-01-10T10:00:00Z"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_calendar_grid_shape() {
    let fixture = TestFixture::new().await;
    let token = fixture.login_admin().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/events/calendar?year=2024&month=12"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let days = body["data"]["days"].as_array().unwrap();
    assert_eq!(days.len(), 42);

    let current: usize = days
        .iter()
        .filter(|d| d["isCurrentMonth"] == true)
        .count();
    assert_eq!(current, 31);

    // The seeded interview lands on December 15th
    let dec15 = days
        .iter()
        .find(|d| d["date"] == "2024-12-15")
        .unwrap();
    assert_eq!(dec15["events"].as_array().unwrap().len(), 1);
    assert_eq!(dec15["overflow"], 0);
}

#[tokio::test]
async fn test_calendar_invalid_month() {
    let fixture = TestFixture::new().await;
    let token = fixture.login_admin().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/events/calendar?year=2024&month=13"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_upcoming_events_only_future_scheduled() {
    let fixture = TestFixture::new().await;
    let token = fixture.login_ssp().await;

    // The seeded December 2024 events are in the past by now
    let resp = fixture
        .client
        .get(fixture.url("/api/events/upcoming"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let before = body["data"].as_array().unwrap().len();

    // Schedule something tomorrow; it must show up
    let start = Utc::now() + Duration::days(1);
    let end = start + Duration::hours(1);
    let resp = fixture
        .client
        .post(fixture.url("/api/events"))
        .bearer_auth(&token)
        .json(&json!({
            "title": "Entretien à venir",
            "type": "interview",
            "startDate": start.to_rfc3339(),
            "endDate": end.to_rfc3339()
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = fixture
        .client
        .get(fixture.url("/api/events/upcoming"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let upcoming = body["data"].as_array().unwrap();
    assert_eq!(upcoming.len(), before + 1);
    assert!(upcoming
        .iter()
        .any(|e| e["title"] == "Entretien à venir"));
}

// ==================== ANALYTICS ====================

#[tokio::test]
async fn test_analytics_sections_per_role() {
    let fixture = TestFixture::new().await;

    let token = fixture.login_admin().await;
    let resp = fixture
        .client
        .get(fixture.url("/api/analytics"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert!(body["data"]["apprentices"]["total"].is_number());
    assert!(body["data"]["engagement"]["dailyActiveUsers"].is_number());

    let token = fixture.login_ssp().await;
    let resp = fixture
        .client
        .get(fixture.url("/api/analytics"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert!(body["data"]["apprentices"]["total"].is_number());
    assert!(body["data"]["engagement"].is_null());

    let token = fixture.login_apprentice().await;
    let resp = fixture
        .client
        .get(fixture.url("/api/analytics"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert!(body["data"]["apprentices"].is_null());
    assert!(body["data"]["engagement"]["dailyActiveUsers"].is_number());
}

// ==================== USERS ====================

#[tokio::test]
async fn test_user_crud_as_admin() {
    let fixture = TestFixture::new().await;
    let token = fixture.login_admin().await;

    // Create
    let resp = fixture
        .client
        .post(fixture.url("/api/users"))
        .bearer_auth(&token)
        .json(&json!({
            "email": "nouveau@btpcfa.fr",
            "name": "Paul Nouveau",
            "role": "apprentice"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let user_id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["name"], "Paul Nouveau");

    // Duplicate email is a conflict
    let resp = fixture
        .client
        .post(fixture.url("/api/users"))
        .bearer_auth(&token)
        .json(&json!({
            "email": "nouveau@btpcfa.fr",
            "name": "Doublon",
            "role": "apprentice"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);

    // Update
    let resp = fixture
        .client
        .put(fixture.url(&format!("/api/users/{}", user_id)))
        .bearer_auth(&token)
        .json(&json!({ "name": "Paul Renommé" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["name"], "Paul Renommé");

    // Delete
    let resp = fixture
        .client
        .delete(fixture.url(&format!("/api/users/{}", user_id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // Verify deleted
    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/users/{}", user_id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_user_listing_gates() {
    let fixture = TestFixture::new().await;

    // Apprentices cannot list users at all
    let token = fixture.login_apprentice().await;
    let resp = fixture
        .client
        .get(fixture.url("/api/users"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    // SSP staff only see apprentices
    let token = fixture.login_ssp().await;
    let resp = fixture
        .client
        .get(fixture.url("/api/users"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let list = body["data"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["role"], "apprentice");

    // Admins see everyone
    let token = fixture.login_admin().await;
    let resp = fixture
        .client
        .get(fixture.url("/api/users"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_response_listing_access() {
    let fixture = TestFixture::new().await;

    // Marie sees her own two seeded responses
    let token = fixture.login_apprentice().await;
    let resp = fixture
        .client
        .get(fixture.url("/api/users/1/responses"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    // But not anyone else's
    let resp = fixture
        .client
        .get(fixture.url("/api/users/2/responses"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    // SSP staff may review an apprentice's responses
    let token = fixture.login_ssp().await;
    let resp = fixture
        .client
        .get(fixture.url("/api/users/1/responses"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}
