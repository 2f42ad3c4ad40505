//! Long-polling update loop

use super::{TelegramClient, TelegramError};
use crate::runtime::RuntimeManager;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Poll Telegram for updates and hand them to the runtime until `shutdown`
/// fires or a non-retryable error occurs.
pub async fn run_polling(
    client: Arc<TelegramClient>,
    runtime: Arc<RuntimeManager>,
    bot_username: Option<String>,
    shutdown: CancellationToken,
) -> Result<(), TelegramError> {
    let mut offset: i64 = 0;
    let mut failures: u32 = 0;

    tracing::info!("Polling for updates");

    loop {
        let result = tokio::select! {
            biased;

            () = shutdown.cancelled() => {
                tracing::info!("Polling stopped");
                return Ok(());
            }

            result = client.get_updates(offset) => result,
        };

        match result {
            Ok(updates) => {
                failures = 0;
                for update in updates {
                    offset = offset.max(update.update_id + 1);
                    if let Some(inbound) = update.into_inbound(bot_username.as_deref()) {
                        runtime.dispatch(inbound).await;
                    }
                }
            }
            Err(e) if e.is_retryable() => {
                failures += 1;
                let delay = e.retry_after.unwrap_or_else(|| retry_delay(failures));
                tracing::warn!(
                    error = %e,
                    attempt = failures,
                    delay_ms = %delay.as_millis(),
                    "getUpdates failed, retrying"
                );
                tokio::select! {
                    () = shutdown.cancelled() => return Ok(()),
                    () = tokio::time::sleep(delay) => {}
                }
            }
            Err(e) => {
                tracing::error!(error = %e, kind = ?e.kind, "getUpdates failed permanently");
                return Err(e);
            }
        }
    }
}

/// Exponential backoff: 1s, 2s, 4s ... capped, plus up to 250ms of jitter
fn retry_delay(attempt: u32) -> Duration {
    let exp = attempt.saturating_sub(1).min(5);
    let base = Duration::from_secs(1 << exp).min(MAX_RETRY_DELAY);
    let jitter = Duration::from_millis(rand::thread_rng().gen_range(0..250));
    base + jitter
}
