use crate::adapters::http::ReqwestTransport;
use crate::core::{ConfigProvider, Joke, JokeProvider, RequestContext, Transport};
use crate::utils::error::{JokeError, Result, TransportError};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

pub const RANDOM_JOKE_PATH: &str = "/random_joke";
pub const TEN_JOKES_PATH: &str = "/random_ten";

const STATUS_OK: u16 = 200;

/// HTTP implementation of `JokeProvider`.
///
/// Holds only the base URL and a transport handle; clones share the
/// transport and concurrent calls never touch each other's state.
#[derive(Debug, Clone)]
pub struct JokeClient<T: Transport = ReqwestTransport> {
    transport: T,
    base_url: String,
}

impl JokeClient<ReqwestTransport> {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let transport = ReqwestTransport::new(timeout)?;
        Ok(Self::with_transport(base_url, transport))
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(config.base_url(), config.timeout())
    }
}

impl<T: Transport> JokeClient<T> {
    pub fn with_transport(base_url: impl Into<String>, transport: T) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Appends `path` to the base URL's path, collapsing a trailing slash.
    pub fn endpoint_url(&self, path: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| JokeError::RequestError {
            url: self.base_url.clone(),
            reason: format!("failed to create full path: {}", e),
        })?;

        url.path_segments_mut()
            .map_err(|_| JokeError::RequestError {
                url: self.base_url.clone(),
                reason: "URL cannot be used as a base".to_string(),
            })?
            .pop_if_empty()
            .extend(path.split('/').filter(|segment| !segment.is_empty()));

        Ok(url)
    }

    async fn fetch_json<D: DeserializeOwned>(&self, ctx: &RequestContext, path: &str) -> Result<D> {
        let url = self.endpoint_url(path)?;

        let response = match ctx.run(self.transport.get(url.clone())).await {
            Ok(Ok(response)) => response,
            Ok(Err(TransportError::Http(e))) if e.is_builder() => {
                return Err(JokeError::RequestError {
                    url: url.to_string(),
                    reason: e.to_string(),
                });
            }
            Ok(Err(e)) | Err(e) => {
                tracing::debug!("Request to {} failed: {}", url, e);
                return Err(e.into());
            }
        };

        // 非 200 時不讀取主體，直接丟棄
        if response.status != STATUS_OK {
            tracing::warn!("Unexpected status {} from {}", response.status, url);
            return Err(JokeError::UnexpectedStatus {
                status: response.status,
            });
        }

        let body = match ctx.run(response.bytes()).await {
            Ok(Ok(body)) => body,
            Ok(Err(e)) | Err(e) => {
                tracing::debug!("Reading body from {} failed: {}", url, e);
                return Err(e.into());
            }
        };

        decode_first_value(&body)
    }
}

/// Decodes the first JSON value in `body`; anything after it is ignored.
fn decode_first_value<D: DeserializeOwned>(body: &[u8]) -> Result<D> {
    let mut deserializer = serde_json::Deserializer::from_slice(body);
    let decoded = serde::Deserialize::deserialize(&mut deserializer)?;
    Ok(decoded)
}

#[async_trait]
impl<T: Transport> JokeProvider for JokeClient<T> {
    async fn fetch_random_joke(&self, ctx: &RequestContext) -> Result<Joke> {
        self.fetch_json(ctx, RANDOM_JOKE_PATH).await
    }

    async fn fetch_ten_jokes(&self, ctx: &RequestContext) -> Result<Vec<Joke>> {
        let jokes: Vec<Joke> = self.fetch_json(ctx, TEN_JOKES_PATH).await?;
        tracing::debug!("Decoded {} jokes", jokes.len());
        Ok(jokes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TransportResponse;
    use crate::utils::error::ErrorCategory;
    use std::sync::{Arc, Mutex};

    #[derive(Clone)]
    struct StubTransport {
        status: u16,
        body: String,
        requested: Arc<Mutex<Vec<String>>>,
    }

    impl StubTransport {
        fn new(status: u16, body: &str) -> Self {
            Self {
                status,
                body: body.to_string(),
                requested: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn get(&self, url: Url) -> std::result::Result<TransportResponse, TransportError> {
            self.requested.lock().unwrap().push(url.to_string());
            Ok(TransportResponse::ready(self.status, self.body.clone()))
        }
    }

    struct HangingTransport;

    #[async_trait]
    impl Transport for HangingTransport {
        async fn get(&self, _url: Url) -> std::result::Result<TransportResponse, TransportError> {
            std::future::pending().await
        }
    }

    struct BrokenTransport;

    #[async_trait]
    impl Transport for BrokenTransport {
        async fn get(&self, _url: Url) -> std::result::Result<TransportResponse, TransportError> {
            Err(TransportError::Other {
                message: "connection refused".to_string(),
            })
        }
    }

    /// Sends headers fine, then fails while the body is read.
    struct UnreadableBodyTransport {
        status: u16,
    }

    #[async_trait]
    impl Transport for UnreadableBodyTransport {
        async fn get(&self, _url: Url) -> std::result::Result<TransportResponse, TransportError> {
            Ok(TransportResponse::new(self.status, async {
                Err(TransportError::Other {
                    message: "connection reset while reading body".to_string(),
                })
            }))
        }
    }

    struct StalledBodyTransport;

    #[async_trait]
    impl Transport for StalledBodyTransport {
        async fn get(&self, _url: Url) -> std::result::Result<TransportResponse, TransportError> {
            Ok(TransportResponse::new(200, std::future::pending()))
        }
    }

    #[test]
    fn test_endpoint_url_join() {
        let client = JokeClient::with_transport("https://example.com", BrokenTransport);
        assert_eq!(
            client.endpoint_url(RANDOM_JOKE_PATH).unwrap().as_str(),
            "https://example.com/random_joke"
        );

        let client = JokeClient::with_transport("https://example.com/api/", BrokenTransport);
        assert_eq!(
            client.endpoint_url(TEN_JOKES_PATH).unwrap().as_str(),
            "https://example.com/api/random_ten"
        );
    }

    #[test]
    fn test_endpoint_url_rejects_bad_base() {
        let client = JokeClient::with_transport("not a url", BrokenTransport);
        let err = client.endpoint_url(RANDOM_JOKE_PATH).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Request);

        let client = JokeClient::with_transport("mailto:someone@example.com", BrokenTransport);
        let err = client.endpoint_url(RANDOM_JOKE_PATH).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Request);
    }

    #[tokio::test]
    async fn test_fetch_random_joke_decodes_body() {
        let transport = StubTransport::new(200, r#"{"id":1,"setup":"S","punchline":"P"}"#);
        let client = JokeClient::with_transport("http://jokes.test", transport.clone());

        let joke = client
            .fetch_random_joke(&RequestContext::background())
            .await
            .unwrap();

        assert_eq!(joke.id, 1);
        assert_eq!(joke.setup, "S");
        assert_eq!(joke.punchline, "P");
        assert_eq!(transport.requested(), vec!["http://jokes.test/random_joke"]);
    }

    #[tokio::test]
    async fn test_fetch_ten_jokes_keeps_order() {
        let body: Vec<serde_json::Value> = (1..=10)
            .map(|i| serde_json::json!({"id": i, "type": "general", "setup": format!("setup {i}"), "punchline": format!("punch {i}")}))
            .collect();
        let transport = StubTransport::new(200, &serde_json::to_string(&body).unwrap());
        let client = JokeClient::with_transport("http://jokes.test", transport.clone());

        let jokes = client
            .fetch_ten_jokes(&RequestContext::background())
            .await
            .unwrap();

        assert_eq!(jokes.len(), 10);
        for (i, joke) in jokes.iter().enumerate() {
            assert_eq!(joke.id, i as u64 + 1);
            assert_eq!(joke.setup, format!("setup {}", i + 1));
        }
        assert_eq!(transport.requested(), vec!["http://jokes.test/random_ten"]);
    }

    #[tokio::test]
    async fn test_non_200_status_is_reported() {
        for status in [201, 204, 301, 400, 404, 500] {
            let client =
                JokeClient::with_transport("http://jokes.test", StubTransport::new(status, "{}"));
            let err = client
                .fetch_random_joke(&RequestContext::background())
                .await
                .unwrap_err();
            assert_eq!(err.status(), Some(status));
            assert!(err.to_string().contains(&status.to_string()));
        }
    }

    #[tokio::test]
    async fn test_decode_failure_returns_no_result() {
        let client =
            JokeClient::with_transport("http://jokes.test", StubTransport::new(200, r#"{"id":"#));
        let err = client
            .fetch_random_joke(&RequestContext::background())
            .await
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Decode);

        // an object where an array is expected
        let client =
            JokeClient::with_transport("http://jokes.test", StubTransport::new(200, r#"{"id":1}"#));
        let err = client
            .fetch_ten_jokes(&RequestContext::background())
            .await
            .unwrap_err();
        assert!(matches!(err, JokeError::DecodeError(_)));
    }

    #[tokio::test]
    async fn test_transport_failure_is_classified() {
        let client = JokeClient::with_transport("http://jokes.test", BrokenTransport);
        let err = client
            .fetch_ten_jokes(&RequestContext::background())
            .await
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Transport);
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_cancelled_context_aborts_hanging_call() {
        let client = JokeClient::with_transport("http://jokes.test", HangingTransport);
        let ctx = RequestContext::background();
        ctx.cancel();

        let err = client.fetch_random_joke(&ctx).await.unwrap_err();
        assert!(matches!(
            err,
            JokeError::TransportError(TransportError::Cancelled)
        ));
    }

    #[tokio::test]
    async fn test_deadline_aborts_hanging_call() {
        let client = JokeClient::with_transport("http://jokes.test", HangingTransport);
        let ctx = RequestContext::with_timeout(Duration::from_millis(30));

        let err = client.fetch_ten_jokes(&ctx).await.unwrap_err();
        assert!(err.is_timeout());
        assert_eq!(err.category(), ErrorCategory::Transport);
    }

    #[tokio::test]
    async fn test_works_behind_trait_object() {
        let provider: Box<dyn JokeProvider> = Box::new(JokeClient::with_transport(
            "http://jokes.test",
            StubTransport::new(200, r#"{"setup":"a","punchline":"b"}"#),
        ));
        let joke = provider
            .fetch_random_joke(&RequestContext::default())
            .await
            .unwrap();
        assert_eq!(joke.to_string(), "a, b");
    }

    #[tokio::test]
    async fn test_non_200_status_wins_over_unreadable_body() {
        let client =
            JokeClient::with_transport("http://jokes.test", UnreadableBodyTransport { status: 503 });
        let err = client
            .fetch_ten_jokes(&RequestContext::background())
            .await
            .unwrap_err();
        assert!(matches!(err, JokeError::UnexpectedStatus { status: 503 }));
    }

    #[tokio::test]
    async fn test_unreadable_body_on_200_is_transport_failure() {
        let client =
            JokeClient::with_transport("http://jokes.test", UnreadableBodyTransport { status: 200 });
        let err = client
            .fetch_random_joke(&RequestContext::background())
            .await
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Transport);
        assert!(err.to_string().contains("connection reset"));
    }

    #[tokio::test]
    async fn test_deadline_covers_body_read() {
        let client = JokeClient::with_transport("http://jokes.test", StalledBodyTransport);
        let ctx = RequestContext::with_timeout(Duration::from_millis(30));

        let err = client.fetch_random_joke(&ctx).await.unwrap_err();
        assert!(matches!(
            err,
            JokeError::TransportError(TransportError::DeadlineExceeded)
        ));
    }

    #[tokio::test]
    async fn test_trailing_data_after_first_value_is_ignored() {
        let client = JokeClient::with_transport(
            "http://jokes.test",
            StubTransport::new(200, "{\"id\":4,\"setup\":\"S\"}\n{\"id\":5} trailing"),
        );
        let joke = client
            .fetch_random_joke(&RequestContext::background())
            .await
            .unwrap();
        assert_eq!(joke.id, 4);
        assert_eq!(joke.setup, "S");
    }

    #[tokio::test]
    async fn test_empty_body_is_decode_failure() {
        let client = JokeClient::with_transport("http://jokes.test", StubTransport::new(200, ""));
        let err = client
            .fetch_ten_jokes(&RequestContext::background())
            .await
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Decode);
    }
}
