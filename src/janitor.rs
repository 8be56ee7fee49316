use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::state::SharedState;

/// Periodically evict rate-limit keys whose newest submission left the window.
/// Runs until the shutdown channel flips to true.
pub fn spawn(state: SharedState, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
    let period = state.submission_limiter.window().max(Duration::from_secs(1));

    tokio::spawn(async move {
        tracing::debug!("Rate limit janitor started (every {}s)", period.as_secs());

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                _ = tokio::time::sleep(period) => {
                    let before = state.submission_limiter.tracked_keys();
                    state.submission_limiter.cleanup();
                    let after = state.submission_limiter.tracked_keys();
                    if before != after {
                        tracing::debug!("Evicted {} stale rate limit keys", before.saturating_sub(after));
                    }
                }
                changed = shutdown.changed() => {
                    // Sender dropped.
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        tracing::debug!("Rate limit janitor stopped");
    })
}
