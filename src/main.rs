//! Symptom Bot - rule-based symptom checker for Telegram
//!
//! Collects symptoms through a chat conversation and matches them against
//! a fixed, ordered rule table.

mod api;
mod config;
mod rules;
mod runtime;
mod state_machine;
mod telegram;

use api::{create_router, AppState};
use config::BotConfig;
use runtime::RuntimeManager;
use std::sync::Arc;
use telegram::{run_polling, TelegramClient};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "symptom_bot=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = BotConfig::from_env()?;

    let client = Arc::new(TelegramClient::new(&config.telegram)?);
    let me = client.get_me().await?;
    tracing::info!(
        bot_id = me.id,
        username = me.username.as_deref().unwrap_or("<none>"),
        rules = rules::RULES.len(),
        symptoms = rules::Symptom::ALL.len(),
        "Connected to Telegram"
    );

    let runtime = Arc::new(RuntimeManager::new(client.clone(), config.keyboard_columns));

    // Stop on Ctrl-C
    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => tracing::info!("Shutdown requested"),
                Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl-C"),
            }
            shutdown.cancel();
        });
    }

    let result: Result<(), Box<dyn std::error::Error>> = match &config.webhook {
        Some(webhook) => {
            client
                .set_webhook(&webhook.url, webhook.secret.as_deref())
                .await?;
            tracing::info!(url = %webhook.url, "Webhook registered");

            let state = AppState::new(runtime.clone(), webhook.secret.clone(), me.username.clone());
            let app = create_router(state).layer(TraceLayer::new_for_http());

            tracing::info!("Symptom bot webhook server listening on {}", webhook.listen);
            let listener = tokio::net::TcpListener::bind(webhook.listen).await?;
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown.clone().cancelled_owned())
                .await
                .map_err(Into::into)
        }
        None => {
            // getUpdates is refused while a webhook is registered
            client.delete_webhook().await?;
            run_polling(client.clone(), runtime.clone(), me.username.clone(), shutdown.clone())
                .await
                .map_err(Into::into)
        }
    };

    runtime.shutdown().await;
    result
}
