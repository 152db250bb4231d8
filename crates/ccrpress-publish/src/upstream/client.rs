use std::time::Duration;

use async_trait::async_trait;
use ccrpress_core::config::UpstreamConfig;
use ccrpress_core::models::{Issue, SubmissionMetadata};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::EditorialBackend;
use super::payload::{RawSubmission, normalize_issue, normalize_submission};
use crate::error::{PublishError, Result};

/// Client for the editorial backend's REST API (`{base_url}/api/v1/...`).
///
/// Every call goes to the network: no caching, no retries.
pub struct OjsClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl OjsClient {
    pub fn new(config: &UpstreamConfig, token: impl Into<String>) -> Result<Self> {
        Self::with_params(
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
            &config.user_agent,
            token,
        )
    }

    pub fn with_params(
        base_url: &str,
        timeout: Duration,
        user_agent: &str,
        token: impl Into<String>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .gzip(true)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/api/v1/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let url = self.url(endpoint);
        debug!(%url, "GET");
        let resp = self
            .client
            .get(&url)
            .query(query)
            .bearer_auth(&self.token)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(PublishError::Api(url, format!("HTTP {status}: {body}")));
        }

        let text = resp.text().await?;
        serde_json::from_str(&text).map_err(|e| PublishError::Payload(format!("{url}: {e}")))
    }

    /// Checks that the token is accepted by listing a single submission.
    pub async fn verify(&self) -> Result<()> {
        let _: Value = self.get_json("submissions", &[("count", "1")]).await?;
        Ok(())
    }
}

#[async_trait]
impl EditorialBackend for OjsClient {
    async fn submission(&self, id: u64) -> Result<SubmissionMetadata> {
        let raw: RawSubmission = self.get_json(&format!("submissions/{id}"), &[]).await?;
        let publication_id = raw.current_publication_id.ok_or_else(|| {
            PublishError::Payload(format!("submission {} has no current publication", raw.id))
        })?;
        let publication: Value = self
            .get_json(&format!("submissions/{id}/publications/{publication_id}"), &[])
            .await?;
        normalize_submission(id, publication)
    }

    async fn issue(&self, id: u64) -> Result<Issue> {
        let issue: Value = self.get_json(&format!("issues/{id}"), &[]).await?;
        normalize_issue(issue)
    }
}
