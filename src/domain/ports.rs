use crate::domain::context::RequestContext;
use crate::domain::model::Joke;
use crate::utils::error::{Result, TransportError};
use async_trait::async_trait;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use url::Url;

/// Fetches jokes from somewhere. `JokeClient` is the HTTP implementation;
/// tests can plug in fixture-backed providers.
#[async_trait]
pub trait JokeProvider: Send + Sync {
    async fn fetch_random_joke(&self, ctx: &RequestContext) -> Result<Joke>;
    async fn fetch_ten_jokes(&self, ctx: &RequestContext) -> Result<Vec<Joke>>;
}

type BodyFuture = Pin<Box<dyn Future<Output = std::result::Result<Vec<u8>, TransportError>> + Send>>;

/// Status of a single GET, with the body left unread.
///
/// The body is only pulled when `bytes` is awaited; dropping the response
/// releases it unread.
pub struct TransportResponse {
    pub status: u16,
    body: BodyFuture,
}

impl TransportResponse {
    pub fn new<F>(status: u16, body: F) -> Self
    where
        F: Future<Output = std::result::Result<Vec<u8>, TransportError>> + Send + 'static,
    {
        Self {
            status,
            body: Box::pin(body),
        }
    }

    /// A response whose body is already in memory.
    pub fn ready(status: u16, body: impl Into<Vec<u8>>) -> Self {
        let body = body.into();
        Self::new(status, async move { Ok(body) })
    }

    pub async fn bytes(self) -> std::result::Result<Vec<u8>, TransportError> {
        self.body.await
    }
}

impl fmt::Debug for TransportResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportResponse")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: Url) -> std::result::Result<TransportResponse, TransportError>;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn timeout(&self) -> Duration;
}
