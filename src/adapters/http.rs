use crate::domain::ports::{Transport, TransportResponse};
use crate::utils::error::{JokeError, Result, TransportError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// `Transport` backed by a `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Builds a client that aborts any single call running longer than `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(JokeError::ClientBuildError)?;
        Ok(Self { client })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: Url) -> std::result::Result<TransportResponse, TransportError> {
        tracing::debug!("Making API request to: {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status().as_u16();
        tracing::debug!("API response status: {}", status);

        // 回應主體延後到呼叫端確認狀態碼後才讀取
        Ok(TransportResponse::new(status, async move {
            Ok::<_, TransportError>(response.bytes().await?.to_vec())
        }))
    }
}
