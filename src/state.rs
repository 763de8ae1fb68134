use std::sync::Arc;

use crate::config::Config;
use crate::email::Mailer;
use crate::tracker::IssueTracker;

/// Per-process application state, assembled once at startup and cloned
/// into each handler. The outbound clients sit behind trait objects so no
/// handler reaches for the environment or a module-level SDK client.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub mailer: Arc<dyn Mailer>,
    pub tracker: Arc<dyn IssueTracker>,
    pub http: reqwest::Client,
}
