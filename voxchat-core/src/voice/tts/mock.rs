use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::provider::PredictionApi;
use super::types::{JobStatus, SynthesisJob, SynthesisRequestParameters};
use crate::voice::error::SpeechError;

pub const MOCK_JOB_ID: &str = "mock-job";

/// One scripted answer from the mock prediction service
#[derive(Debug, Clone)]
pub enum MockPrediction {
    Job {
        status: JobStatus,
        output: Option<String>,
    },
    /// Answer only after `delay` has passed, simulating a slow request
    Delayed {
        delay: Duration,
        then: Box<MockPrediction>,
    },
    TransportError,
    StatusError(u16),
    Malformed,
}

impl MockPrediction {
    pub fn starting() -> Self {
        Self::Job {
            status: JobStatus::Starting,
            output: None,
        }
    }

    pub fn processing() -> Self {
        Self::Job {
            status: JobStatus::Processing,
            output: None,
        }
    }

    pub fn succeeded(url: impl Into<String>) -> Self {
        Self::Job {
            status: JobStatus::Succeeded,
            output: Some(url.into()),
        }
    }

    pub fn failed() -> Self {
        Self::Job {
            status: JobStatus::Failed,
            output: None,
        }
    }

    pub fn delayed(self, delay: Duration) -> Self {
        Self::Delayed {
            delay,
            then: Box::new(self),
        }
    }
}

/// Scripted prediction service. Polls beyond the end of the script keep
/// reporting `processing`.
#[derive(Clone)]
pub struct MockPredictionApi {
    create: MockPrediction,
    polls: Arc<Mutex<VecDeque<MockPrediction>>>,
    created: Arc<Mutex<Vec<SynthesisRequestParameters>>>,
    poll_count: Arc<Mutex<usize>>,
}

impl MockPredictionApi {
    pub fn new(create: MockPrediction, polls: Vec<MockPrediction>) -> Self {
        Self {
            create,
            polls: Arc::new(Mutex::new(polls.into())),
            created: Arc::new(Mutex::new(Vec::new())),
            poll_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Job starts, then follows `polls`
    pub fn with_polls(polls: Vec<MockPrediction>) -> Self {
        Self::new(MockPrediction::starting(), polls)
    }

    pub fn poll_count(&self) -> usize {
        *self.poll_count.lock().unwrap()
    }

    pub fn created_requests(&self) -> Vec<SynthesisRequestParameters> {
        self.created.lock().unwrap().clone()
    }

    async fn answer(prediction: MockPrediction) -> Result<SynthesisJob, SpeechError> {
        let prediction = match prediction {
            MockPrediction::Delayed { delay, then } => {
                tokio::time::sleep(delay).await;
                *then
            }
            other => other,
        };

        match prediction {
            MockPrediction::Job { status, output } => {
                let mut job = SynthesisJob::new(MOCK_JOB_ID, status);
                if let Some(url) = output {
                    job = job.with_output(url);
                }
                Ok(job)
            }
            MockPrediction::TransportError => Err(SpeechError::Transport(anyhow::anyhow!(
                "Network error: connection reset"
            ))),
            MockPrediction::StatusError(status) => Err(SpeechError::Status {
                status,
                body: "mock error".to_string(),
            }),
            MockPrediction::Malformed | MockPrediction::Delayed { .. } => Err(
                SpeechError::MalformedResponse("Failed to parse prediction".to_string()),
            ),
        }
    }
}

#[async_trait]
impl PredictionApi for MockPredictionApi {
    async fn create_prediction(
        &self,
        params: &SynthesisRequestParameters,
    ) -> Result<SynthesisJob, SpeechError> {
        self.created.lock().unwrap().push(params.clone());
        Self::answer(self.create.clone()).await
    }

    async fn get_prediction(&self, _id: &str) -> Result<SynthesisJob, SpeechError> {
        *self.poll_count.lock().unwrap() += 1;
        let next = self
            .polls
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(MockPrediction::processing);
        Self::answer(next).await
    }
}
