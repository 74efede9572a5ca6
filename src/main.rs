use anyhow::{Context, Result};
use dosage_text_service::api::{self, AppState};
use dosage_text_service::config::Config;
use dosage_text_service::converter::BuiltinConverter;
use dosage_text_service::translation::Translator;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("dosage_text_service=info".parse()?),
        )
        .init();

    info!("Starting dosage text service");

    // Load configuration from environment
    let config = Config::from_env()?;

    let mut translator = Translator::new();
    if let Some(timeout) = config.render_timeout {
        translator = translator.with_render_timeout(timeout);
    }
    let mut state = AppState::new(Arc::new(BuiltinConverter::new())).with_translator(translator);
    if let Some(timeout) = config.request_timeout {
        state = state.with_request_timeout(timeout);
    }

    // Warm the resolver caches for the common locales
    if !config.preload_locales.is_empty() {
        let ready = state.preload(&config.preload_locales);
        info!("Preloaded {} resolver(s)", ready);
    }

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("Listening on {}", address);

    axum::serve(listener, api::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!("Unable to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
