//! Question update reconciliation.
//!
//! Keeps `answer ∈ choices` (or `answer` unset) true across partial edits.
//! Each call is a pure function of the current question and the proposed
//! changes; the store applies the result or discards it as a whole.
//!
//! Dispatch depends on which of `choices` / `answer` the payload carries:
//!   - neither: choices and answer untouched
//!   - choices only: answer kept, or remapped by position if it was dropped
//!   - answer only: must be one of the current choices
//!   - both: answer must be one of the new choices

use tracing::{debug, instrument};

use crate::domain::{Question, QuestionDraft};
use crate::error::ValidationError;

/// Proposed changes to a question.
///
/// `answer` is tri-state: `None` when absent from the payload,
/// `Some(None)` when explicitly null, `Some(Some(_))` when set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuestionUpdate {
    pub question: Option<String>,
    pub choices: Option<Vec<String>>,
    pub answer: Option<Option<String>>,
}

/// Which of the two reconciled fields an update touches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UpdateIntent {
    Neither,
    ChoicesOnly(Vec<String>),
    AnswerOnly(Option<String>),
    Both {
        choices: Vec<String>,
        answer: Option<String>,
    },
}

impl QuestionUpdate {
    /// Split into the free-text change and the reconciliation intent.
    pub fn into_parts(self) -> (Option<String>, UpdateIntent) {
        let intent = match (self.choices, self.answer) {
            (None, None) => UpdateIntent::Neither,
            (Some(choices), None) => UpdateIntent::ChoicesOnly(choices),
            (None, Some(answer)) => UpdateIntent::AnswerOnly(answer),
            (Some(choices), Some(answer)) => UpdateIntent::Both { choices, answer },
        };
        (self.question, intent)
    }
}

/// Creation rule: a set answer must be one of the supplied choices.
pub fn validate_new(draft: &QuestionDraft) -> Result<(), ValidationError> {
    match &draft.answer {
        Some(a) if !draft.choices.contains(a) => Err(ValidationError::AnswerNotInChoices),
        _ => Ok(()),
    }
}

/// Compute the next state of `current` under `update`, or reject it.
#[instrument(level = "debug", skip_all, fields(id = current.id))]
pub fn reconcile(current: &Question, update: QuestionUpdate) -> Result<Question, ValidationError> {
    let (question, intent) = update.into_parts();

    let (choices, answer) = match intent {
        UpdateIntent::Neither => (current.choices.clone(), current.answer.clone()),
        UpdateIntent::ChoicesOnly(new_choices) => {
            let answer = remap_answer(&current.choices, &new_choices, current.answer.as_deref());
            (new_choices, answer)
        }
        UpdateIntent::AnswerOnly(proposed) => match proposed {
            Some(a) if current.choices.contains(&a) => (current.choices.clone(), Some(a)),
            _ => return Err(ValidationError::AnswerNotInCurrentChoices),
        },
        UpdateIntent::Both { choices: new_choices, answer: proposed } => {
            // Accepted iff the answer is in the new set, whether or not it was in the old one.
            match proposed {
                Some(a) if new_choices.contains(&a) => (new_choices, Some(a)),
                _ => return Err(ValidationError::AnswerNotInNewChoices),
            }
        }
    };

    let next = Question {
        id: current.id,
        question: question.unwrap_or_else(|| current.question.clone()),
        choices,
        answer,
    };
    debug!(target: "question", id = next.id, answer = ?next.answer, choices = next.choices.len(), "Reconciled update");
    Ok(next)
}

/// Answer to keep when only the choices change.
///
/// An answer dropped from the list is replaced by the new choice at its old
/// position, or cleared when the new list is too short.
fn remap_answer(old: &[String], new: &[String], answer: Option<&str>) -> Option<String> {
    let a = answer?;
    match old.iter().position(|c| c == a) {
        Some(pos) if !new.iter().any(|c| c == a) => new.get(pos).cloned(),
        _ => Some(a.to_string()),
    }
}
