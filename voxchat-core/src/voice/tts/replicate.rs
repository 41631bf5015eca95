//! Replicate predictions API client

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use super::provider::PredictionApi;
use super::types::{SynthesisJob, SynthesisRequestParameters};
use crate::voice::error::SpeechError;

pub const DEFAULT_BASE_URL: &str = "https://api.replicate.com/v1";
pub const DEFAULT_MODEL_VERSION: &str =
    "dfdf537ba482b029e0a761699e6f55e9162cfd159270bfe0e44857caa5f275a6";

#[derive(Debug, Clone)]
pub struct ReplicateConfig {
    pub base_url: String,
    pub api_token: String,
    pub model_version: String,
    pub request_timeout: Duration,
}

impl ReplicateConfig {
    pub fn new(api_token: String) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_token,
            model_version: DEFAULT_MODEL_VERSION.to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

pub struct ReplicateClient {
    config: ReplicateConfig,
    client: Client,
}

impl ReplicateClient {
    pub fn new(config: ReplicateConfig) -> Result<Self, SpeechError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| SpeechError::Transport(anyhow::anyhow!("Failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    fn predictions_url(&self) -> String {
        format!("{}/predictions", self.config.base_url.trim_end_matches('/'))
    }
}

#[derive(Serialize)]
struct CreatePredictionRequest<'a> {
    version: &'a str,
    input: &'a SynthesisRequestParameters,
}

async fn read_job(response: Response) -> Result<SynthesisJob, SpeechError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| SpeechError::Transport(anyhow::anyhow!("Failed to read response: {e}")))?;

    if !status.is_success() {
        debug!(?status, ?body, "Replicate API returned error");
        return Err(SpeechError::Status {
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body).map_err(|e| {
        SpeechError::MalformedResponse(format!("Failed to parse prediction: {e} - Response: {body}"))
    })
}

#[async_trait]
impl PredictionApi for ReplicateClient {
    async fn create_prediction(
        &self,
        params: &SynthesisRequestParameters,
    ) -> Result<SynthesisJob, SpeechError> {
        let request = CreatePredictionRequest {
            version: &self.config.model_version,
            input: params,
        };

        let response = self
            .client
            .post(self.predictions_url())
            .bearer_auth(&self.config.api_token)
            .json(&request)
            .send()
            .await
            .map_err(|e| SpeechError::Transport(anyhow::anyhow!("Network error: {e}")))?;

        read_job(response).await
    }

    async fn get_prediction(&self, id: &str) -> Result<SynthesisJob, SpeechError> {
        let response = self
            .client
            .get(format!("{}/{}", self.predictions_url(), id))
            .bearer_auth(&self.config.api_token)
            .send()
            .await
            .map_err(|e| SpeechError::Transport(anyhow::anyhow!("Network error: {e}")))?;

        read_job(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voice::tts::types::{JobStatus, VoiceParameters};
    use mockito::Matcher;
    use serde_json::json;

    fn client(base_url: String) -> ReplicateClient {
        let mut config = ReplicateConfig::new("r8_test".to_string());
        config.base_url = base_url;
        config.model_version = "v1234".to_string();
        ReplicateClient::new(config).unwrap()
    }

    #[tokio::test]
    async fn create_prediction_posts_version_and_input() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("POST", "/predictions")
            .match_header("authorization", "Bearer r8_test")
            .match_body(Matcher::Json(json!({
                "version": "v1234",
                "input": {
                    "text": "Hi there",
                    "language": "en",
                    "temperature": 0.75,
                    "length": 1.0,
                    "speed": 1.1,
                    "voice": "af_bella"
                }
            })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(json!({"id": "job-1", "status": "starting"}).to_string())
            .create_async()
            .await;

        let params = SynthesisRequestParameters::new("Hi there", &VoiceParameters::default());
        let job = client(server.url()).create_prediction(&params).await.unwrap();

        assert_eq!(job.id, "job-1");
        assert_eq!(job.status, JobStatus::Starting);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn create_prediction_without_id_is_malformed() {
        let mut server = mockito::Server::new_async().await;

        let _mock = server
            .mock("POST", "/predictions")
            .with_status(201)
            .with_body(json!({"status": "starting"}).to_string())
            .create_async()
            .await;

        let params = SynthesisRequestParameters::new("Hi", &VoiceParameters::default());
        let err = client(server.url())
            .create_prediction(&params)
            .await
            .unwrap_err();

        assert!(matches!(err, SpeechError::MalformedResponse(_)), "{err:?}");
    }

    #[tokio::test]
    async fn get_prediction_reads_status_and_output() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/predictions/job-1")
            .match_header("authorization", "Bearer r8_test")
            .with_status(200)
            .with_body(
                json!({
                    "id": "job-1",
                    "status": "succeeded",
                    "output": "http://x/audio.wav"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let job = client(server.url()).get_prediction("job-1").await.unwrap();

        assert_eq!(job.status, JobStatus::Succeeded);
        assert_eq!(job.output_url(), Some("http://x/audio.wav"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn get_prediction_surfaces_http_errors() {
        let mut server = mockito::Server::new_async().await;

        let _mock = server
            .mock("GET", "/predictions/job-1")
            .with_status(503)
            .with_body("unavailable")
            .create_async()
            .await;

        let err = client(server.url())
            .get_prediction("job-1")
            .await
            .unwrap_err();

        match err {
            SpeechError::Status { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "unavailable");
            }
            other => panic!("Expected SpeechError::Status, got {other:?}"),
        }
    }
}
