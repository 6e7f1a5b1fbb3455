//! Questionnaire, question and response models.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of input a question collects.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Text,
    Textarea,
    Select,
    Radio,
    Checkbox,
    Number,
    Date,
    Scale,
}

impl QuestionType {
    /// Types whose answers are numeric and carry `[min, max]` bounds.
    pub fn is_numeric(&self) -> bool {
        matches!(self, QuestionType::Number | QuestionType::Scale)
    }
}

/// One selectable option of a choice question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionOption {
    pub id: String,
    pub label: String,
    pub value: String,
}

/// Declarative validation bounds for a question.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRules {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Values a question's dependency must take for it to be shown.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShowWhen {
    One(String),
    AnyOf(Vec<String>),
}

/// Visibility rule referencing another question's answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalRule {
    pub depends_on: String,
    pub show_when: ShowWhen,
}

/// A single question of a questionnaire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<QuestionOption>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationRules>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditional_logic: Option<ConditionalRule>,
}

/// Thematic category of a questionnaire.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionnaireCategory {
    PreGuidance,
    PersonalSituation,
    FormationEvaluation,
    FollowUp,
    Custom,
}

/// Publication status of a questionnaire.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QuestionnaireStatus {
    Draft,
    Active,
    Archived,
}

/// Which role a questionnaire is addressed to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TargetRole {
    Apprentice,
    Ssp,
    All,
}

/// An ordered set of questions assigned to a role.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Questionnaire {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: QuestionnaireCategory,
    pub status: QuestionnaireStatus,
    pub questions: Vec<Question>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: String,
    pub target_role: TargetRole,
    /// Estimated completion time in minutes.
    pub estimated_duration: u32,
}

/// An answer to a single question.
///
/// Untagged: text questions answer with a string, number/scale with a
/// number, checkbox with a list of option values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AnswerValue {
    Number(f64),
    Text(String),
    Multi(Vec<String>),
}

impl AnswerValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            AnswerValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// An empty text answer counts as unanswered; everything else counts.
    pub fn is_answered(&self) -> bool {
        !matches!(self, AnswerValue::Text(s) if s.is_empty())
    }
}

/// Progress state of a response.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ResponseStatus {
    Draft,
    InProgress,
    Completed,
    Submitted,
}

/// A user's answer set for one questionnaire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionnaireResponse {
    pub id: String,
    pub questionnaire_id: String,
    pub user_id: String,
    pub answers: HashMap<String, AnswerValue>,
    pub status: ResponseStatus,
    /// Percentage of required questions answered, always recomputed
    /// server-side.
    pub progress: u8,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub last_saved_at: DateTime<Utc>,
}

/// Statuses a client may save a response in; submission has its own
/// endpoint and is never set through a save.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SaveStatus {
    Draft,
    InProgress,
    Completed,
}

impl From<SaveStatus> for ResponseStatus {
    fn from(status: SaveStatus) -> Self {
        match status {
            SaveStatus::Draft => ResponseStatus::Draft,
            SaveStatus::InProgress => ResponseStatus::InProgress,
            SaveStatus::Completed => ResponseStatus::Completed,
        }
    }
}

/// Request body for saving (autosaving) a response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponseRequest {
    #[serde(default)]
    pub answers: HashMap<String, AnswerValue>,
    pub status: SaveStatus,
}

/// Request body for submitting a response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponseRequest {
    #[serde(default)]
    pub answers: HashMap<String, AnswerValue>,
}

/// Request body for validating answers without saving them. With a step
/// index, only that page of the form is checked (the "Suivant" button);
/// without one, the whole form is (the submit gate).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponseRequest {
    #[serde(default)]
    pub answers: HashMap<String, AnswerValue>,
    #[serde(default)]
    pub step: Option<usize>,
}

/// Outcome of a validation pass.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    pub valid: bool,
    pub errors: HashMap<String, String>,
    pub progress: u8,
    pub total_steps: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_value_untagged_decode() {
        let text: AnswerValue = serde_json::from_str("\"masonry\"").unwrap();
        assert_eq!(text, AnswerValue::Text("masonry".to_string()));

        let number: AnswerValue = serde_json::from_str("8").unwrap();
        assert_eq!(number, AnswerValue::Number(8.0));

        let multi: AnswerValue = serde_json::from_str("[\"manual\",\"team\"]").unwrap();
        assert_eq!(
            multi,
            AnswerValue::Multi(vec!["manual".to_string(), "team".to_string()])
        );
    }

    #[test]
    fn test_answer_value_is_answered() {
        assert!(!AnswerValue::Text(String::new()).is_answered());
        assert!(AnswerValue::Text("x".to_string()).is_answered());
        assert!(AnswerValue::Number(0.0).is_answered());
        assert!(AnswerValue::Multi(vec![]).is_answered());
    }
}
