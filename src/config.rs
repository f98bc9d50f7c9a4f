//! Loading backend configuration (API users + optional question bank) from TOML.
//!
//! Example:
//!
//! ```toml
//! [[users]]
//! id = 1
//! email = "teacher@example.com"
//! token = "9944b09199c62bcf9418ad846dd0e4bbdfc6ee4b"
//!
//! [[questions]]
//! question = "Which planet is closest to the sun?"
//! choices = ["Mercury", "Venus", "Earth", "Mars"]
//! answer = "Mercury"
//! ```

use serde::Deserialize;
use tracing::{error, info, warn};

use crate::domain::QuestionDraft;

/// Id given to the user created from `EXAM_API_TOKEN` when it is not already configured.
const ENV_TOKEN_USER_ID: u64 = 1;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
  #[serde(default)]
  pub users: Vec<UserCfg>,
  #[serde(default)]
  pub questions: Vec<QuestionDraft>,
}

/// API user accepted in TOML configuration.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct UserCfg {
  pub id: u64,
  pub email: String,
  pub token: String,
}

impl AppConfig {
  /// Parse a TOML document.
  pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
    toml::from_str(s)
  }

  /// Register a quick-start token unless some user already owns it.
  pub fn with_env_token(mut self, token: Option<String>) -> Self {
    let Some(token) = token.filter(|t| !t.trim().is_empty()) else { return self };
    if self.users.iter().any(|u| u.token == token) {
      return self;
    }
    let id = match self.users.iter().map(|u| u.id).max() {
      None => ENV_TOKEN_USER_ID,
      Some(m) => match m.checked_add(1) {
        Some(id) => id,
        None => {
          warn!(target: "auth", max_id = m, "No free user id for EXAM_API_TOKEN; token ignored");
          return self;
        }
      },
    };
    self.users.push(UserCfg { id, email: format!("user{}@localhost", id), token });
    self
  }
}

/// Load config from EXAM_CONFIG_PATH and EXAM_API_TOKEN. On any parsing/IO error the
/// file is ignored and defaults are used.
pub fn load_config_from_env() -> AppConfig {
  let env_token = std::env::var("EXAM_API_TOKEN").ok();
  let base = match std::env::var("EXAM_CONFIG_PATH") {
    Ok(path) => match std::fs::read_to_string(&path) {
      Ok(s) => match AppConfig::from_toml_str(&s) {
        Ok(cfg) => {
          info!(target: "exam_backend", %path, users = cfg.users.len(), questions = cfg.questions.len(), "Loaded config (TOML)");
          cfg
        }
        Err(e) => {
          error!(target: "exam_backend", %path, error = %e, "Failed to parse TOML config");
          AppConfig::default()
        }
      },
      Err(e) => {
        error!(target: "exam_backend", %path, error = %e, "Failed to read TOML config file");
        AppConfig::default()
      }
    },
    Err(_) => AppConfig::default(),
  };

  let cfg = base.with_env_token(env_token);
  if cfg.users.is_empty() {
    warn!(target: "auth", "No API users configured; every protected request will be rejected with 401.");
  }
  cfg
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_users_and_question_bank() {
    let cfg = AppConfig::from_toml_str(r#"
      [[users]]
      id = 3
      email = "user@example.com"
      token = "abc"

      [[questions]]
      question = "Pick one"
      choices = ["A", "B"]
      answer = "B"

      [[questions]]
      question = "No answer yet"
      choices = ["X"]
    "#).unwrap();

    assert_eq!(cfg.users, vec![UserCfg { id: 3, email: "user@example.com".into(), token: "abc".into() }]);
    assert_eq!(cfg.questions.len(), 2);
    assert_eq!(cfg.questions[0].answer.as_deref(), Some("B"));
    assert_eq!(cfg.questions[1].answer, None);
  }

  #[test]
  fn empty_document_is_default() {
    let cfg = AppConfig::from_toml_str("").unwrap();
    assert!(cfg.users.is_empty());
    assert!(cfg.questions.is_empty());
  }

  #[test]
  fn env_token_adds_user_once() {
    let cfg = AppConfig::default().with_env_token(Some("tok".into()));
    assert_eq!(cfg.users.len(), 1);
    assert_eq!(cfg.users[0].id, ENV_TOKEN_USER_ID);

    let again = cfg.with_env_token(Some("tok".into()));
    assert_eq!(again.users.len(), 1);

    let other = again.with_env_token(Some("tok2".into()));
    assert_eq!(other.users[1].id, ENV_TOKEN_USER_ID + 1);
  }

  #[test]
  fn env_token_skipped_when_user_ids_exhausted() {
    let cfg = AppConfig {
      users: vec![UserCfg { id: u64::MAX, email: "max@example.com".into(), token: "a".into() }],
      questions: vec![],
    };
    let cfg = cfg.with_env_token(Some("b".into()));
    assert_eq!(cfg.users.len(), 1);
    assert_eq!(cfg.users[0].token, "a");
  }

  #[test]
  fn blank_env_token_is_ignored() {
    let cfg = AppConfig::default().with_env_token(Some("  ".into())).with_env_token(None);
    assert!(cfg.users.is_empty());
  }
}
