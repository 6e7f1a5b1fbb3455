//! Questionnaire form engine.
//!
//! Pure view-model computations over a question list and an answer map:
//! conditional visibility, per-answer validation, completion progress and
//! step pagination. Validation never applies to hidden questions.

use std::collections::HashMap;

use regex::Regex;

use crate::models::{AnswerValue, Question, QuestionType, ShowWhen};

/// Fixed page size of the multi-step form.
pub const QUESTIONS_PER_STEP: usize = 3;

const REQUIRED_MESSAGE: &str = "Cette question est obligatoire";
const PATTERN_MESSAGE: &str = "Format invalide";

/// Whether a question is currently visible.
///
/// A question without a conditional rule is always shown. With a rule,
/// the dependency's answer must equal the scalar `show_when` value or be
/// a member of the list form. A missing or non-text dependency answer
/// hides the question.
pub fn should_show_question(question: &Question, answers: &HashMap<String, AnswerValue>) -> bool {
    let Some(rule) = &question.conditional_logic else {
        return true;
    };

    let Some(answer) = answers.get(&rule.depends_on).and_then(AnswerValue::as_text) else {
        return false;
    };

    match &rule.show_when {
        ShowWhen::One(value) => answer == value,
        ShowWhen::AnyOf(values) => values.iter().any(|v| v == answer),
    }
}

/// Validate a single answer against its question.
///
/// Returns a French error message, or `None` when the answer is
/// acceptable. The required-empty check runs first; bound and pattern
/// checks only apply when an answer of the matching kind is present.
pub fn validate_answer(question: &Question, value: Option<&AnswerValue>) -> Option<String> {
    if question.required && !value.map(AnswerValue::is_answered).unwrap_or(false) {
        return Some(REQUIRED_MESSAGE.to_string());
    }

    let rules = question.validation.as_ref()?;

    if question.question_type.is_numeric() {
        if let Some(n) = value.and_then(AnswerValue::as_number) {
            if let Some(min) = rules.min {
                if n < min {
                    return Some(rules.message.clone().unwrap_or_else(|| {
                        format!("La valeur doit être supérieure ou égale à {}", min)
                    }));
                }
            }
            if let Some(max) = rules.max {
                if n > max {
                    return Some(rules.message.clone().unwrap_or_else(|| {
                        format!("La valeur doit être inférieure ou égale à {}", max)
                    }));
                }
            }
        }
    }

    if question.question_type == QuestionType::Text {
        if let (Some(pattern), Some(text)) = (
            rules.pattern.as_deref(),
            value.and_then(AnswerValue::as_text),
        ) {
            if !text.is_empty() {
                // An unparseable pattern disables the check rather than
                // failing every answer.
                if let Ok(re) = Regex::new(pattern) {
                    if !re.is_match(text) {
                        return Some(
                            rules
                                .message
                                .clone()
                                .unwrap_or_else(|| PATTERN_MESSAGE.to_string()),
                        );
                    }
                }
            }
        }
    }

    None
}

/// Completion percentage: answered required questions over all required
/// questions, rounded to the nearest integer. 0 when nothing is required.
pub fn calculate_progress(answers: &HashMap<String, AnswerValue>, questions: &[Question]) -> u8 {
    let required: Vec<&Question> = questions.iter().filter(|q| q.required).collect();
    if required.is_empty() {
        return 0;
    }

    let answered = required
        .iter()
        .filter(|q| {
            answers
                .get(&q.id)
                .map(AnswerValue::is_answered)
                .unwrap_or(false)
        })
        .count();

    ((answered as f64 / required.len() as f64) * 100.0).round() as u8
}

/// Number of pages in the multi-step form.
pub fn total_steps(questions: &[Question]) -> usize {
    questions.len().div_ceil(QUESTIONS_PER_STEP)
}

/// The slice of questions shown on one page. An out-of-range step is an
/// empty page.
pub fn step_questions(questions: &[Question], step: usize) -> &[Question] {
    let start = step.saturating_mul(QUESTIONS_PER_STEP).min(questions.len());
    let end = (start + QUESTIONS_PER_STEP).min(questions.len());
    &questions[start..end]
}

/// Validate the visible questions of one page. An empty map means the
/// step may advance.
pub fn validate_step(
    questions: &[Question],
    step: usize,
    answers: &HashMap<String, AnswerValue>,
) -> HashMap<String, String> {
    validate_questions(step_questions(questions, step), answers)
}

/// Validate every visible question of the form. An empty map means the
/// response may be submitted.
pub fn validate_all(
    questions: &[Question],
    answers: &HashMap<String, AnswerValue>,
) -> HashMap<String, String> {
    validate_questions(questions, answers)
}

fn validate_questions(
    questions: &[Question],
    answers: &HashMap<String, AnswerValue>,
) -> HashMap<String, String> {
    let mut errors = HashMap::new();
    for question in questions {
        if !should_show_question(question, answers) {
            continue;
        }
        if let Some(message) = validate_answer(question, answers.get(&question.id)) {
            errors.insert(question.id.clone(), message);
        }
    }
    errors
}
