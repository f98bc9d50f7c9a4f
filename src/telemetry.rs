//! Log subscriber setup for the exam backend.
//!
//! Targets emitted by this crate:
//!   exam_backend : startup, config loading, shutdown
//!   question     : question create/update/delete and reconciliation results
//!   answer       : per-user answer records
//!   auth         : token checks and user table warnings
//!
//! LOG_LEVEL takes EnvFilter directives (default below); LOG_FORMAT=json
//! switches to structured output. Request spans come from the TraceLayer in
//! `routes`.

use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVES: &str = "info,question=debug,answer=info,auth=info,exam_backend=debug,tower_http=info,axum=info";

pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    // Choose JSON vs pretty; the two builders have different types.
    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => {
            builder.json().init();
        }
        _ => {
            builder.init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_directives_parse() {
        assert!(EnvFilter::try_new(DEFAULT_DIRECTIVES).is_ok());
    }
}
