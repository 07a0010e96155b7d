use std::env;
use std::sync::Arc;
use std::time::Duration;

use mealie_bridge::client::{
    Api, FileTokenStore, HttpClient, MemoryTokenStore, TokenStore, UpdateError,
};
use mealie_bridge::updater::Updater;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".to_string().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Get configuration from environment variables
    let base_url =
        env::var("MEALIE_BASE_URL").unwrap_or_else(|_| "http://localhost:9000".to_string());

    let username = env::var("MEALIE_USERNAME").unwrap_or_else(|_| "admin".to_string());

    let password = env::var("MEALIE_PASSWORD").unwrap_or_else(|_| "admin".to_string());

    let poll_minutes: u64 = env::var("MEALIE_POLL_MINUTES")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(30);

    // With MEALIE_TOKEN_FILE set the bearer token survives restarts.
    let tokens: Arc<dyn TokenStore> = match env::var("MEALIE_TOKEN_FILE") {
        Ok(path) => Arc::new(FileTokenStore::new(path)),
        Err(_) => Arc::new(MemoryTokenStore::new()),
    };

    let api = Arc::new(Api::new(HttpClient::new(), base_url.clone(), tokens));

    tracing::info!("Validating Mealie credentials...");
    if let Err(e) = api.authenticate(&username, &password).await {
        tracing::error!("Authentication failed: {}", e);
        tracing::error!("Please verify:");
        tracing::error!("  - MEALIE_BASE_URL is correct: {}", base_url);
        tracing::error!("  - MEALIE_USERNAME is correct: {}", username);
        tracing::error!("  - MEALIE_PASSWORD is correct");
        tracing::error!("  - Mealie server is running and accessible");
        std::process::exit(1);
    }
    tracing::info!("Successfully authenticated with Mealie");

    let updater = Updater::new(api.clone());
    let mut ticker = tokio::time::interval(Duration::from_secs(poll_minutes * 60));
    tracing::info!("Polling every {} minutes", poll_minutes);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match updater.refresh().await {
                    Ok(snapshot) => {
                        for (key, value) in &snapshot {
                            match value {
                                Some(value) => tracing::info!(sensor = key, state = %value, "updated"),
                                None => tracing::info!(sensor = key, "no data"),
                            }
                        }
                    }
                    Err(UpdateError::AuthRequired(error)) => {
                        tracing::warn!(%error, "token refresh rejected, re-authenticating");
                        if let Err(error) = api.authenticate(&username, &password).await {
                            tracing::error!(%error, "re-authentication failed, sensors unavailable");
                        }
                    }
                    Err(UpdateError::Failed(error)) => {
                        tracing::warn!(%error, "refresh failed, sensors unavailable until next poll");
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down...");
                break;
            }
        }
    }

    Ok(())
}
