use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};
use tracing::warn;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A JSON fetcher that enforces a minimum delay between calls made through
/// one instance.
///
/// The last-call timestamp is shared per instance: concurrent callers queue on
/// the mutex, each waiting out the remaining delay before recording its own
/// call time. Failures never surface as errors — every method logs and returns
/// `None`, and the upstream source treats that as "no data". No retries.
pub struct PacedClient {
    client: reqwest::Client,
    base_url: String,
    min_delay: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl PacedClient {
    pub fn new(base_url: &str, min_delay: Duration) -> Self {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(USER_AGENT),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(ACCEPT),
        );
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            reqwest::header::HeaderValue::from_static(ACCEPT_LANGUAGE),
        );

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            min_delay,
            last_call: Mutex::new(None),
        }
    }

    /// GET a JSON document. `None` on any network, status, or decode failure.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Option<T> {
        self.pace().await;

        let url = format!("{}{}", self.base_url, path);
        let resp = match self.client.get(&url).query(params).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(url, error = %e, "Request failed");
                return None;
            }
        };
        decode(url, resp).await
    }

    /// POST a JSON body and decode a JSON reply. Same failure contract as
    /// [`get_json`](Self::get_json).
    pub async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        params: &[(&str, &str)],
        body: &B,
    ) -> Option<T> {
        self.pace().await;

        let url = format!("{}{}", self.base_url, path);
        let resp = match self.client.post(&url).query(params).json(body).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(url, error = %e, "Request failed");
                return None;
            }
        };
        decode(url, resp).await
    }

    /// Wait until the minimum inter-call delay has elapsed since the last
    /// recorded call, then record now as the last call time. The lock is held
    /// across the wait so concurrent callers serialize instead of stampeding.
    async fn pace(&self) {
        let mut last = self.last_call.lock().await;
        if let Some(prev) = *last {
            let next_allowed = prev + self.min_delay;
            if next_allowed > Instant::now() {
                sleep_until(next_allowed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

async fn decode<T: DeserializeOwned>(url: String, resp: reqwest::Response) -> Option<T> {
    let status = resp.status();
    if !status.is_success() {
        warn!(url, status = status.as_u16(), "Request returned non-success status");
        return None;
    }
    match resp.json::<T>().await {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!(url, error = %e, "Failed to decode response body");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn first_call_does_not_wait() {
        let client = PacedClient::new("http://localhost", Duration::from_secs(2));
        let t0 = Instant::now();
        client.pace().await;
        assert!(
            t0.elapsed() < Duration::from_millis(1),
            "first call should go straight through, waited {:?}",
            t0.elapsed()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn second_call_waits_out_the_minimum_delay() {
        let client = PacedClient::new("http://localhost", Duration::from_millis(1500));
        let t0 = Instant::now();
        client.pace().await;
        client.pace().await;
        assert!(
            t0.elapsed() >= Duration::from_millis(1500),
            "second call should have waited, elapsed {:?}",
            t0.elapsed()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_serialize() {
        let client = PacedClient::new("http://localhost", Duration::from_secs(3));
        let t0 = Instant::now();
        tokio::join!(client.pace(), client.pace(), client.pace());
        assert!(
            t0.elapsed() >= Duration::from_secs(6),
            "three calls through one instance should span two full delays, elapsed {:?}",
            t0.elapsed()
        );
    }

    #[test]
    fn base_url_is_normalized() {
        let client = PacedClient::new("https://example.com/", Duration::from_secs(1));
        assert_eq!(client.base_url, "https://example.com");
    }
}
