//! Backoff for store reads.
//!
//! The contents API is reached over the public internet, so a GET may die
//! on a reset connection or a timeout. Those are replayed a couple of times.
//! Writes never go through here: the store may have committed a PUT whose
//! response was lost, and replaying it would conflict with itself.

use std::future::Future;
use std::time::Duration;

/// Replays allowed after the first request.
pub const MAX_RETRIES: u32 = 2;

/// Pause before the first replay; doubled for each later one.
const FIRST_DELAY: Duration = Duration::from_millis(150);

/// Issue the request built by `send` until it yields a response.
///
/// A response of any status counts as delivered; only `reqwest::Error`
/// (no response at all) triggers a replay. After `MAX_RETRIES` replays the
/// last error is returned.
pub(crate) async fn retry_send<F, Fut>(send: F) -> Result<reqwest::Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    let mut delay = FIRST_DELAY;
    let mut replays = 0;
    loop {
        match send().await {
            Ok(resp) => return Ok(resp),
            Err(e) if replays < MAX_RETRIES => {
                replays += 1;
                tracing::warn!(replay = replays, ?delay, error = %e, "store read failed");
                tokio::time::sleep(delay).await;
                delay *= 2;
            }
            Err(e) => return Err(e),
        }
    }
}
