use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::autocomplete::{SchoolLookup, MIN_QUERY_CHARS};
use crate::form::{FormError, GuardianForm};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Incomplete(#[from] FormError),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("submission rejected: {0}")]
    Rejected(String),
}

#[derive(Debug, Deserialize)]
struct SubmitReply {
    success: bool,
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

/// HTTP client for the survey API, used by the questionnaire front end.
#[derive(Debug, Clone)]
pub struct SurveyClient {
    base_url: String,
    http: reqwest::Client,
}

impl SurveyClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Validates `form` locally and sends it. Incomplete forms never leave the
    /// client. On success the form is cleared for the next respondent and the
    /// stored row, as echoed by the server, is returned. A rejected or failed
    /// send leaves the answers in place.
    pub async fn submit_guardian(
        &self,
        form: &mut GuardianForm,
    ) -> Result<serde_json::Value, ClientError> {
        form.validate()?;

        let response = self
            .http
            .post(format!("{}/api/submit-form", self.base_url))
            .json(&form.to_submission())
            .send()
            .await?;

        let status = response.status();
        let reply: SubmitReply = response.json().await?;

        if !status.is_success() || !reply.success {
            let reason = reply
                .error
                .unwrap_or_else(|| format!("server answered {status}"));
            return Err(ClientError::Rejected(reason));
        }

        form.reset();
        Ok(reply.data.unwrap_or(serde_json::Value::Null))
    }

    /// Queries shorter than the minimum return no suggestions without a round
    /// trip.
    pub async fn search_schools(&self, query: &str) -> Result<Vec<String>, ClientError> {
        if query.chars().count() < MIN_QUERY_CHARS {
            return Ok(Vec::new());
        }

        debug!(query = %query, "Searching schools");
        let names = self
            .http
            .get(format!("{}/api/search-schools", self.base_url))
            .query(&[("q", query)])
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<String>>()
            .await?;

        Ok(names)
    }
}

#[async_trait]
impl SchoolLookup for SurveyClient {
    async fn lookup(&self, query: &str) -> Result<Vec<String>, ClientError> {
        self.search_schools(query).await
    }
}
