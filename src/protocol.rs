//! Public protocol structs for HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{Question, QuestionDraft, UserAnswer, UserAnswerChanges};
use crate::error::{ApiError, ApiResult};
use crate::reconcile::QuestionUpdate;
use crate::state::NewUserAnswer;

/// `choices` as sent by clients: either a JSON array or a string holding one
/// (form-style clients send `"[\"A\", \"B\"]"`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ChoicesField {
    List(Vec<String>),
    Encoded(String),
}

impl ChoicesField {
    pub fn decode(self) -> ApiResult<Vec<String>> {
        match self {
            ChoicesField::List(v) => Ok(v),
            ChoicesField::Encoded(s) => serde_json::from_str::<Vec<String>>(&s).map_err(|e| {
                ApiError::BadRequest(format!("choices must be a JSON list of strings: {}", e))
            }),
        }
    }
}

/// Distinguishes an explicit `null` (`Some(None)`) from an absent field (`None`).
fn present<'de, D, T>(d: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(d).map(Some)
}

//
// Questions
//

/// POST body.
#[derive(Debug, Deserialize)]
pub struct QuestionIn {
    pub question: String,
    pub choices: ChoicesField,
    #[serde(default)]
    pub answer: Option<String>,
}

impl QuestionIn {
    pub fn into_draft(self) -> ApiResult<QuestionDraft> {
        Ok(QuestionDraft {
            question: self.question,
            choices: self.choices.decode()?,
            answer: self.answer,
        })
    }
}

/// PUT body: text and choices are required, `answer` may be omitted.
#[derive(Debug, Deserialize)]
pub struct QuestionPut {
    pub question: String,
    pub choices: ChoicesField,
    #[serde(default, deserialize_with = "present")]
    pub answer: Option<Option<String>>,
}

impl QuestionPut {
    pub fn into_update(self) -> ApiResult<QuestionUpdate> {
        Ok(QuestionUpdate {
            question: Some(self.question),
            choices: Some(self.choices.decode()?),
            answer: self.answer,
        })
    }
}

/// PATCH body: every field optional.
#[derive(Debug, Default, Deserialize)]
pub struct QuestionPatch {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub choices: Option<Option<ChoicesField>>,
    #[serde(default, deserialize_with = "present")]
    pub answer: Option<Option<String>>,
}

impl QuestionPatch {
    pub fn into_update(self) -> ApiResult<QuestionUpdate> {
        let choices = match self.choices {
            None => None,
            Some(None) => return Err(ApiError::BadRequest("choices may not be null".into())),
            Some(Some(c)) => Some(c.decode()?),
        };
        Ok(QuestionUpdate { question: self.question, choices, answer: self.answer })
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct QuestionOut {
    pub id: u64,
    pub question: String,
    pub choices: Vec<String>,
    pub answer: Option<String>,
}

impl From<Question> for QuestionOut {
    fn from(q: Question) -> Self {
        QuestionOut { id: q.id, question: q.question, choices: q.choices, answer: q.answer }
    }
}

//
// Answer records
//

#[derive(Debug, Deserialize)]
pub struct UserAnswerIn {
    #[serde(alias = "question")]
    pub question_id: u64,
    pub user_answer: String,
    #[serde(default)]
    pub is_correct: bool,
    #[serde(default)]
    pub is_submitted: bool,
    #[serde(default)]
    pub is_bookmarked: bool,
}

impl From<UserAnswerIn> for NewUserAnswer {
    fn from(a: UserAnswerIn) -> Self {
        NewUserAnswer {
            question_id: a.question_id,
            user_answer: a.user_answer,
            is_correct: a.is_correct,
            is_submitted: a.is_submitted,
            is_bookmarked: a.is_bookmarked,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UserAnswerPatch {
    pub user_answer: Option<String>,
    pub is_correct: Option<bool>,
    pub is_submitted: Option<bool>,
    pub is_bookmarked: Option<bool>,
}

impl From<UserAnswerPatch> for UserAnswerChanges {
    fn from(p: UserAnswerPatch) -> Self {
        UserAnswerChanges {
            user_answer: p.user_answer,
            is_correct: p.is_correct,
            is_submitted: p.is_submitted,
            is_bookmarked: p.is_bookmarked,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserAnswerOut {
    pub id: u64,
    pub question: u64,
    pub user: u64,
    pub user_answer: String,
    pub is_correct: bool,
    pub is_submitted: bool,
    pub is_bookmarked: bool,
}

impl From<UserAnswer> for UserAnswerOut {
    fn from(a: UserAnswer) -> Self {
        UserAnswerOut {
            id: a.id,
            question: a.question_id,
            user: a.user_id,
            user_answer: a.user_answer,
            is_correct: a.is_correct,
            is_submitted: a.is_submitted,
            is_bookmarked: a.is_bookmarked,
        }
    }
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choices_accept_list_or_encoded_string() {
        let list: QuestionIn = serde_json::from_str(r#"{"question":"q","choices":["A","B"],"answer":"A"}"#).unwrap();
        assert_eq!(list.into_draft().unwrap().choices, vec!["A", "B"]);

        let encoded: QuestionIn =
            serde_json::from_str(r#"{"question":"q","choices":"[\"Test1\", \"Test2\"]","answer":"Test1"}"#).unwrap();
        assert_eq!(encoded.into_draft().unwrap().choices, vec!["Test1", "Test2"]);
    }

    #[test]
    fn malformed_encoded_choices_are_bad_request() {
        let body: QuestionIn = serde_json::from_str(r#"{"question":"q","choices":"not json"}"#).unwrap();
        assert!(matches!(body.into_draft(), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn patch_distinguishes_absent_and_null_answer() {
        let absent: QuestionPatch = serde_json::from_str(r#"{"question":"New question"}"#).unwrap();
        let update = absent.into_update().unwrap();
        assert_eq!(update.answer, None);
        assert_eq!(update.choices, None);
        assert_eq!(update.question.as_deref(), Some("New question"));

        let null: QuestionPatch = serde_json::from_str(r#"{"answer":null}"#).unwrap();
        assert_eq!(null.into_update().unwrap().answer, Some(None));

        let set: QuestionPatch = serde_json::from_str(r#"{"answer":"C"}"#).unwrap();
        assert_eq!(set.into_update().unwrap().answer, Some(Some("C".into())));
    }

    #[test]
    fn patch_rejects_null_choices() {
        let body: QuestionPatch = serde_json::from_str(r#"{"choices":null}"#).unwrap();
        assert!(matches!(body.into_update(), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn user_answer_accepts_question_alias() {
        let body: UserAnswerIn =
            serde_json::from_str(r#"{"question":4,"user_answer":"Test Answer","is_submitted":true}"#).unwrap();
        let new: NewUserAnswer = body.into();
        assert_eq!(new.question_id, 4);
        assert!(new.is_submitted);
        assert!(!new.is_correct);
        assert!(!new.is_bookmarked);
    }
}
