//! Session-based demo authentication.
//!
//! The dashboard ships with seeded demo accounts sharing one password;
//! there is no real identity provider. The mechanics are still done
//! properly: constant-time password comparison and opaque bearer tokens
//! resolved by a middleware layer.

use std::collections::HashMap;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use subtle::ConstantTimeEq;
use tokio::sync::RwLock;

use crate::errors::{codes, ErrorDetails, ErrorResponse};
use crate::models::User;
use crate::AppState;

/// The authenticated user attached to a request by the session layer.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// The raw bearer token of the request, kept around so logout can revoke it.
#[derive(Debug, Clone)]
pub struct SessionToken(pub String);

/// In-memory session registry mapping bearer tokens to user IDs.
///
/// Sessions live for the process lifetime or until logout; there is no
/// expiry, persistence or refresh.
#[derive(Default)]
pub struct Sessions {
    tokens: RwLock<HashMap<String, String>>,
}

impl Sessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh opaque token for a user.
    pub async fn issue(&self, user_id: &str) -> String {
        let token = uuid::Uuid::new_v4().to_string();
        self.tokens
            .write()
            .await
            .insert(token.clone(), user_id.to_string());
        token
    }

    /// Resolve a token to its user ID.
    pub async fn resolve(&self, token: &str) -> Option<String> {
        self.tokens.read().await.get(token).cloned()
    }

    /// Revoke a token. Returns whether it existed.
    pub async fn revoke(&self, token: &str) -> bool {
        self.tokens.write().await.remove(token).is_some()
    }
}

/// Constant-time password check.
pub fn verify_password(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// Session middleware for all protected routes.
///
/// Resolves `Authorization: Bearer <token>` to a [`CurrentUser`] request
/// extension, or answers 401 with the standard error envelope.
pub async fn session_auth_layer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(&request) else {
        return unauthorized_response("Missing session token");
    };

    let Some(user_id) = state.sessions.resolve(&token).await else {
        return unauthorized_response("Invalid or expired session token");
    };

    // The account may have been deleted while the session was alive.
    let Some(user) = state.store.get_user(&user_id).await else {
        state.sessions.revoke(&token).await;
        return unauthorized_response("Invalid or expired session token");
    };

    request.extensions_mut().insert(CurrentUser(user));
    request.extensions_mut().insert(SessionToken(token));
    next.run(request).await
}

/// Extract the bearer token from the Authorization header.
fn bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.to_string())
}

/// Create an unauthorized response.
fn unauthorized_response(message: &str) -> Response {
    let body = ErrorResponse {
        success: false,
        error: ErrorDetails {
            code: codes::UNAUTHORIZED.to_string(),
            message: message.to_string(),
            details: None,
        },
        revision_id: 0,
    };

    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}
