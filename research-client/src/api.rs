//! HTTP access to the two research endpoints.
//!
//! [`JobClient`] is deliberately thin: one call per endpoint, errors
//! normalized into [`ResearchError`], no retries. Retry and scheduling policy
//! live in the polling controller, not here.

use async_trait::async_trait;
use research_types::{JobHandle, JobStatus, ResearchRequest, StartResearchResponse};

use crate::error::ResearchError;

const START_ENDPOINT: &str = "/api/research/start";
const STATUS_ENDPOINT: &str = "/api/research/status";

/// The network operations the polling controller depends on.
///
/// Kept as a trait so tests can script status sequences without a server.
#[async_trait]
pub trait ResearchApi: Send + Sync + 'static {
    async fn start_research(&self, request: &ResearchRequest) -> Result<JobHandle, ResearchError>;
    async fn fetch_status(&self, handle: &JobHandle) -> Result<JobStatus, ResearchError>;
}

/// reqwest-backed client for the research backend.
#[derive(Debug, Clone)]
pub struct JobClient {
    http: reqwest::Client,
    base_url: String,
}

impl JobClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Reuse an existing `reqwest::Client` (connection pool sharing).
    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ResearchApi for JobClient {
    async fn start_research(&self, request: &ResearchRequest) -> Result<JobHandle, ResearchError> {
        let url = format!("{}{}", self.base_url, START_ENDPOINT);
        tracing::debug!(topic = %request.topic, "starting research job");

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ResearchError::Transport {
                endpoint: START_ENDPOINT,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResearchError::HttpStatus {
                endpoint: START_ENDPOINT,
                status: status.as_u16(),
            });
        }

        let body: StartResearchResponse =
            response.json().await.map_err(|e| ResearchError::Decode {
                endpoint: START_ENDPOINT,
                message: e.to_string(),
            })?;

        Ok(JobHandle(body.research_id))
    }

    async fn fetch_status(&self, handle: &JobHandle) -> Result<JobStatus, ResearchError> {
        let url = format!("{}{}/{}", self.base_url, STATUS_ENDPOINT, handle.as_str());

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ResearchError::Transport {
                endpoint: STATUS_ENDPOINT,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResearchError::HttpStatus {
                endpoint: STATUS_ENDPOINT,
                status: status.as_u16(),
            });
        }

        response.json().await.map_err(|e| ResearchError::Decode {
            endpoint: STATUS_ENDPOINT,
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_strips_trailing_slash() {
        let client = JobClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }
}
