//! Questionnaire and response endpoints.

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use super::{error, success, ApiResult};
use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::form;
use crate::models::{
    has_role, Questionnaire, QuestionnaireResponse, Role, SaveResponseRequest,
    SubmitResponseRequest, TargetRole, User, ValidateResponseRequest, ValidationOutcome,
};
use crate::AppState;

/// Whether a questionnaire is addressed to this user.
fn questionnaire_allowed(questionnaire: &Questionnaire, user: &User) -> bool {
    if has_role(Some(user), &[Role::Admin]) {
        return true;
    }
    let target = match user.role {
        Role::Apprentice => TargetRole::Apprentice,
        _ => TargetRole::Ssp,
    };
    questionnaire.target_role == target || questionnaire.target_role == TargetRole::All
}

/// GET /api/questionnaires - List the questionnaires addressed to the
/// caller's role.
pub async fn list_questionnaires(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Vec<Questionnaire>> {
    let revision_id = state.store.revision_id().await;
    let questionnaires = state.store.list_questionnaires_for_role(user.role).await;
    success(questionnaires, revision_id)
}

/// GET /api/questionnaires/:id - Get a single questionnaire.
pub async fn get_questionnaire(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Questionnaire> {
    let revision_id = state.store.revision_id().await;

    let Some(questionnaire) = state.store.get_questionnaire(&id).await else {
        return error(
            AppError::NotFound(format!("Questionnaire {} not found", id)),
            revision_id,
        );
    };
    if !questionnaire_allowed(&questionnaire, &user) {
        return error(
            AppError::Forbidden("Questionnaire is not addressed to your role".to_string()),
            revision_id,
        );
    }

    success(questionnaire, revision_id)
}

/// GET /api/questionnaires/:id/response - The caller's response to this
/// questionnaire.
pub async fn get_my_response(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<QuestionnaireResponse> {
    let revision_id = state.store.revision_id().await;

    match state.store.get_response(&id, &user.id).await {
        Some(response) => success(response, revision_id),
        None => error(
            AppError::NotFound(format!("No response to questionnaire {} yet", id)),
            revision_id,
        ),
    }
}

/// PUT /api/questionnaires/:id/response - Save (autosave) the caller's
/// response. Partial and invalid answers are accepted here; only
/// submission validates.
pub async fn save_my_response(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(request): Json<SaveResponseRequest>,
) -> ApiResult<QuestionnaireResponse> {
    let revision_id = state.store.revision_id().await;

    let Some(questionnaire) = state.store.get_questionnaire(&id).await else {
        return error(
            AppError::NotFound(format!("Questionnaire {} not found", id)),
            revision_id,
        );
    };
    if !questionnaire_allowed(&questionnaire, &user) {
        return error(
            AppError::Forbidden("Questionnaire is not addressed to your role".to_string()),
            revision_id,
        );
    }

    match state
        .store
        .save_response(&questionnaire, &user.id, request.answers, request.status.into())
        .await
    {
        Ok(response) => {
            let new_revision = state.store.revision_id().await;
            success(response, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/questionnaires/:id/response/validate - Dry-run validation of
/// an answer set, for one form page or the whole form. Nothing is stored.
pub async fn validate_my_response(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(request): Json<ValidateResponseRequest>,
) -> ApiResult<ValidationOutcome> {
    let revision_id = state.store.revision_id().await;

    let Some(questionnaire) = state.store.get_questionnaire(&id).await else {
        return error(
            AppError::NotFound(format!("Questionnaire {} not found", id)),
            revision_id,
        );
    };
    if !questionnaire_allowed(&questionnaire, &user) {
        return error(
            AppError::Forbidden("Questionnaire is not addressed to your role".to_string()),
            revision_id,
        );
    }

    let errors = match request.step {
        Some(step) => form::validate_step(&questionnaire.questions, step, &request.answers),
        None => form::validate_all(&questionnaire.questions, &request.answers),
    };

    success(
        ValidationOutcome {
            valid: errors.is_empty(),
            errors,
            progress: form::calculate_progress(&request.answers, &questionnaire.questions),
            total_steps: form::total_steps(&questionnaire.questions),
        },
        revision_id,
    )
}

/// POST /api/questionnaires/:id/response/submit - Validate and submit the
/// caller's response. A second submit is rejected with a conflict.
pub async fn submit_my_response(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(request): Json<SubmitResponseRequest>,
) -> ApiResult<QuestionnaireResponse> {
    let revision_id = state.store.revision_id().await;

    let Some(questionnaire) = state.store.get_questionnaire(&id).await else {
        return error(
            AppError::NotFound(format!("Questionnaire {} not found", id)),
            revision_id,
        );
    };
    if !questionnaire_allowed(&questionnaire, &user) {
        return error(
            AppError::Forbidden("Questionnaire is not addressed to your role".to_string()),
            revision_id,
        );
    }

    match state
        .store
        .submit_response(&questionnaire, &user.id, request.answers)
        .await
    {
        Ok(response) => {
            tracing::info!(
                questionnaire = %questionnaire.id,
                user = %user.email,
                "Questionnaire response submitted"
            );
            let new_revision = state.store.revision_id().await;
            success(response, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}
