// src/client.rs
use reqwest::Client;
use serde_json::Value;

use crate::models::{interpret_response, AnalysisRequest, AnalysisResult, CONNECTION_FAILURE_MESSAGE};
use crate::session::{AnalysisState, Session, SessionError};
use crate::upload::ImageUpload;

/// Talks to a running analysis server on behalf of one user session.
#[derive(Clone)]
pub struct AnalyzeClient {
    base_url: String,
    client: Client,
}

impl AnalyzeClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Posts an encoded image and turns the reply into a result or a user-facing message.
    pub async fn request_analysis(&self, image: &str) -> Result<AnalysisResult, String> {
        let url = format!("{}/api/analyze", self.base_url);
        let body = AnalysisRequest { image: image.to_string() };

        let resp = match self.client.post(&url).json(&body).send().await {
            Ok(resp) => resp,
            Err(e) => {
                log::error!("Error analyzing graph: {}", e);
                return Err(CONNECTION_FAILURE_MESSAGE.to_string());
            }
        };

        let success = resp.status().is_success();
        let payload: Value = match resp.json().await {
            Ok(payload) => payload,
            Err(e) => {
                log::error!("Error decoding analysis response: {}", e);
                return Err(CONNECTION_FAILURE_MESSAGE.to_string());
            }
        };

        interpret_response(success, &payload)
    }

    /// Drives `session` through one upload. Returns `Ok(false)` without touching
    /// the session when no image was captured.
    pub async fn submit(
        &self,
        session: &mut Session,
        upload: Option<ImageUpload>,
    ) -> Result<bool, SessionError> {
        self.submit_with_progress(session, upload, |_| {}).await
    }

    /// Like `submit`, calling `on_analyzing` once the session has entered
    /// `Analyzing` and before the request goes out.
    pub async fn submit_with_progress<F>(
        &self,
        session: &mut Session,
        upload: Option<ImageUpload>,
        on_analyzing: F,
    ) -> Result<bool, SessionError>
    where
        F: FnOnce(&AnalysisState),
    {
        let Some(upload) = upload else {
            return Ok(false);
        };

        let image = upload.to_data_url();
        session.begin(image.clone())?;
        on_analyzing(session.state());

        let outcome = self.request_analysis(&image).await;
        session.finish(outcome)?;
        Ok(true)
    }
}
