//! Application state: in-memory question and answer stores plus the token table.
//!
//! This module owns:
//!   - questions by id (reconciled updates are applied under the write lock)
//!   - per-user answer records by id
//!   - the API token -> user lookup
//!
//! Lock order is always questions before answers.

use std::{
    collections::{BTreeMap, HashMap},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};
use tokio::sync::RwLock;
use tracing::{error, info, instrument, warn};

use crate::config::{load_config_from_env, AppConfig};
use crate::domain::{AuthUser, Question, QuestionDraft, UserAnswer, UserAnswerChanges};
use crate::error::{ApiError, ApiResult};
use crate::reconcile::{reconcile, validate_new, QuestionUpdate};

/// Fields for a new answer record.
#[derive(Clone, Debug)]
pub struct NewUserAnswer {
    pub question_id: u64,
    pub user_answer: String,
    pub is_correct: bool,
    pub is_submitted: bool,
    pub is_bookmarked: bool,
}

#[derive(Clone)]
pub struct AppState {
    pub questions: Arc<RwLock<BTreeMap<u64, Question>>>,
    pub answers: Arc<RwLock<BTreeMap<u64, UserAnswer>>>,
    pub users_by_token: Arc<HashMap<String, AuthUser>>,
    next_question_id: Arc<AtomicU64>,
    next_answer_id: Arc<AtomicU64>,
}

impl AppState {
    /// Build state from env: load config, register users, seed the question bank.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        Self::from_config(load_config_from_env())
    }

    /// Build state from an already loaded config.
    #[instrument(level = "info", skip_all)]
    pub fn from_config(cfg: AppConfig) -> Self {
        let mut users_by_token = HashMap::<String, AuthUser>::new();
        for u in cfg.users {
            let user = AuthUser { id: u.id, email: u.email };
            if let Some(prev) = users_by_token.insert(u.token, user.clone()) {
                warn!(target: "auth", replaced = prev.id, by = user.id, "Duplicate API token; last entry wins");
            }
        }

        // Bank entries go through the same validation as API creation.
        let mut by_id = BTreeMap::<u64, Question>::new();
        let mut next_id = 1u64;
        for draft in cfg.questions {
            if let Err(e) = validate_new(&draft) {
                error!(target: "question", question = %draft.question, error = %e, "Skipping bank question");
                continue;
            }
            by_id.insert(next_id, draft.into_question(next_id));
            next_id += 1;
        }

        info!(target: "exam_backend", users = users_by_token.len(), questions = by_id.len(), "Startup inventory");

        Self {
            questions: Arc::new(RwLock::new(by_id)),
            answers: Arc::new(RwLock::new(BTreeMap::new())),
            users_by_token: Arc::new(users_by_token),
            next_question_id: Arc::new(AtomicU64::new(next_id)),
            next_answer_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Resolve an API token to its user.
    pub fn authenticate(&self, token: &str) -> Option<AuthUser> {
        self.users_by_token.get(token).cloned()
    }

    /// Validate and insert a new question.
    #[instrument(level = "debug", skip(self, draft), fields(choices = draft.choices.len()))]
    pub async fn create_question(&self, draft: QuestionDraft) -> ApiResult<Question> {
        validate_new(&draft)?;
        let id = self.next_question_id.fetch_add(1, Ordering::Relaxed);
        let q = draft.into_question(id);
        self.questions.write().await.insert(id, q.clone());
        info!(target: "question", id, "Question created");
        Ok(q)
    }

    /// All questions, newest first.
    #[instrument(level = "debug", skip(self))]
    pub async fn list_questions(&self) -> Vec<Question> {
        self.questions.read().await.values().rev().cloned().collect()
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn get_question(&self, id: u64) -> Option<Question> {
        self.questions.read().await.get(&id).cloned()
    }

    /// Reconcile and store an update. The write lock is held from read to write so
    /// concurrent updates of the same question see each other's results.
    #[instrument(level = "debug", skip(self, update))]
    pub async fn update_question(&self, id: u64, update: QuestionUpdate) -> ApiResult<Question> {
        let mut questions = self.questions.write().await;
        let current = questions
            .get_mut(&id)
            .ok_or_else(|| ApiError::NotFound(format!("exam_question {}", id)))?;
        let next = reconcile(current, update).map_err(|e| {
            warn!(target: "question", id, error = %e, "Update rejected");
            e
        })?;
        *current = next.clone();
        info!(target: "question", id, "Question updated");
        Ok(next)
    }

    /// Remove a question and its answer records. Returns false if it did not exist.
    #[instrument(level = "debug", skip(self))]
    pub async fn delete_question(&self, id: u64) -> bool {
        let mut questions = self.questions.write().await;
        if questions.remove(&id).is_none() {
            return false;
        }
        let mut answers = self.answers.write().await;
        let before = answers.len();
        answers.retain(|_, a| a.question_id != id);
        info!(target: "question", id, cascaded = before - answers.len(), "Question deleted");
        true
    }

    /// Record an answer for an existing question.
    #[instrument(level = "debug", skip(self, user, new), fields(user = user.id, question_id = new.question_id))]
    pub async fn create_answer(&self, user: &AuthUser, new: NewUserAnswer) -> ApiResult<UserAnswer> {
        // Held across the insert so the question cannot be deleted in between.
        let questions = self.questions.read().await;
        if !questions.contains_key(&new.question_id) {
            return Err(ApiError::BadRequest(format!("Unknown question {}", new.question_id)));
        }
        let id = self.next_answer_id.fetch_add(1, Ordering::Relaxed);
        let record = UserAnswer {
            id,
            user_id: user.id,
            question_id: new.question_id,
            user_answer: new.user_answer,
            is_correct: new.is_correct,
            is_submitted: new.is_submitted,
            is_bookmarked: new.is_bookmarked,
        };
        self.answers.write().await.insert(id, record.clone());
        info!(target: "answer", id, user = user.id, question_id = record.question_id, "Answer recorded");
        Ok(record)
    }

    /// The user's answer records, newest first.
    #[instrument(level = "debug", skip(self))]
    pub async fn list_answers(&self, user_id: u64) -> Vec<UserAnswer> {
        self.answers
            .read()
            .await
            .values()
            .rev()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect()
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn get_answer(&self, user_id: u64, id: u64) -> Option<UserAnswer> {
        self.answers
            .read()
            .await
            .get(&id)
            .filter(|a| a.user_id == user_id)
            .cloned()
    }

    #[instrument(level = "debug", skip(self, changes))]
    pub async fn update_answer(&self, user_id: u64, id: u64, changes: UserAnswerChanges) -> ApiResult<UserAnswer> {
        let mut answers = self.answers.write().await;
        let record = answers
            .get_mut(&id)
            .filter(|a| a.user_id == user_id)
            .ok_or_else(|| ApiError::NotFound(format!("user_answer {}", id)))?;
        changes.apply(record);
        Ok(record.clone())
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn delete_answer(&self, user_id: u64, id: u64) -> bool {
        let mut answers = self.answers.write().await;
        match answers.get(&id) {
            Some(a) if a.user_id == user_id => {
                answers.remove(&id);
                true
            }
            _ => false,
        }
    }
}
