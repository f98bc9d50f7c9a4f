//! Domain models: questions, per-user answer records and the authenticated user.

use serde::{Deserialize, Serialize};

/// Multiple-choice question as persisted in the store.
///
/// At rest `answer` is either `None` or one of `choices`.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Question {
  pub id: u64,
  pub question: String,
  pub choices: Vec<String>,
  pub answer: Option<String>,
}

impl Question {
  /// True if the stored answer is unset or one of the choices.
  pub fn is_consistent(&self) -> bool {
    match &self.answer {
      Some(a) => self.choices.contains(a),
      None => true,
    }
  }
}

/// Question content before an id has been assigned.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct QuestionDraft {
  pub question: String,
  pub choices: Vec<String>,
  #[serde(default)] pub answer: Option<String>,
}

impl QuestionDraft {
  pub fn into_question(self, id: u64) -> Question {
    Question { id, question: self.question, choices: self.choices, answer: self.answer }
  }
}

/// A user's attempt at a question. The three flags are independent.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct UserAnswer {
  pub id: u64,
  pub user_id: u64,
  pub question_id: u64,
  pub user_answer: String,
  pub is_correct: bool,
  pub is_submitted: bool,
  pub is_bookmarked: bool,
}

/// Partial change to an answer record; `None` leaves the field alone.
#[derive(Clone, Debug, Default)]
pub struct UserAnswerChanges {
  pub user_answer: Option<String>,
  pub is_correct: Option<bool>,
  pub is_submitted: Option<bool>,
  pub is_bookmarked: Option<bool>,
}

impl UserAnswerChanges {
  pub fn apply(self, record: &mut UserAnswer) {
    if let Some(v) = self.user_answer { record.user_answer = v; }
    if let Some(v) = self.is_correct { record.is_correct = v; }
    if let Some(v) = self.is_submitted { record.is_submitted = v; }
    if let Some(v) = self.is_bookmarked { record.is_bookmarked = v; }
  }
}

/// Caller identity resolved from the API token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
  pub id: u64,
  pub email: String,
}
