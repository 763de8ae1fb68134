use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::EnvFilter;

use grant_gateway::config::Config;
use grant_gateway::email::SendGridMailer;
use grant_gateway::routes;
use grant_gateway::state::AppState;
use grant_gateway::tracker::GitHubTracker;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Arc::new(Config::from_env());
    config.log_missing();

    // One shared client with an explicit timeout; the hosting platform's
    // request deadline is not a substitute for a per-call bound.
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    let state = AppState {
        mailer: Arc::new(SendGridMailer::new(config.clone(), http.clone())),
        tracker: Arc::new(GitHubTracker::new(config.clone(), http.clone())),
        http,
        config: config.clone(),
    };

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", config.port)).await?;
    info!("serving grant gateway at http://{}", listener.local_addr()?);
    axum::serve(listener, routes::router(state)).await?;

    Ok(())
}
