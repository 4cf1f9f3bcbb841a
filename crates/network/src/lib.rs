use pipe_trait::Pipe;
use reqwest::{Client, RequestBuilder};
use std::{future::IntoFuture, time::Duration};
use tokio::sync::Semaphore;

/// Upper bound of a single fetch, connection included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Wrapper around [`Client`] with concurrent request limit enforced by the [`Semaphore`] mechanism.
#[derive(Debug)]
pub struct ThrottledClient {
    semaphore: Semaphore,
    client: Client,
    timeout: Duration,
}

impl ThrottledClient {
    /// Acquire a permit and run `proc` with the underlying [`Client`].
    pub async fn run_with_permit<Proc, ProcFuture>(&self, proc: Proc) -> ProcFuture::Output
    where
        Proc: FnOnce(&Client) -> ProcFuture,
        ProcFuture: IntoFuture,
    {
        let permit =
            self.semaphore.acquire().await.expect("semaphore shouldn't have been closed this soon");
        let result = proc(&self.client).await;
        drop(permit);
        result
    }

    /// Start a `GET` request carrying the client's timeout and user agent.
    pub fn get(&self, client: &Client, url: &str) -> RequestBuilder {
        client.get(url).timeout(self.timeout).header("user-agent", "crx-cli")
    }

    /// Construct a new throttled client based on the number of CPUs.
    /// If the number of CPUs is greater than 16, the number of permits will be equal to the number of CPUs.
    /// Otherwise, the number of permits will be 16.
    pub fn new_from_cpu_count() -> Self {
        const MIN_PERMITS: usize = 16;
        let semaphore = num_cpus::get().max(MIN_PERMITS).pipe(Semaphore::new);
        let client = Client::new();
        ThrottledClient { semaphore, client, timeout: DEFAULT_TIMEOUT }
    }

    /// Replace the per-request timeout.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        ThrottledClient { timeout, ..self }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// This is only necessary for tests.
impl Default for ThrottledClient {
    fn default() -> Self {
        ThrottledClient::new_from_cpu_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_timeout_is_thirty_seconds() {
        assert_eq!(ThrottledClient::default().timeout(), Duration::from_secs(30));
    }

    #[test]
    fn timeout_can_be_replaced() {
        let client = ThrottledClient::default().with_timeout(Duration::from_millis(250));
        assert_eq!(client.timeout(), Duration::from_millis(250));
    }

    #[tokio::test]
    async fn permit_is_released_after_each_call() {
        let client = ThrottledClient::default();
        for expected in 0..32 {
            let value = client.run_with_permit(|_| async move { expected }).await;
            assert_eq!(value, expected);
        }
    }
}
