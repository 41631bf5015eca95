use async_trait::async_trait;

use super::types::{SynthesisJob, SynthesisRequestParameters};
use crate::voice::error::SpeechError;

/// A speech service that runs synthesis as a background job
#[async_trait]
pub trait PredictionApi: Send + Sync {
    /// Submit a synthesis job; the service answers immediately with its id
    async fn create_prediction(
        &self,
        params: &SynthesisRequestParameters,
    ) -> Result<SynthesisJob, SpeechError>;

    /// Fetch the current state of a previously created job
    async fn get_prediction(&self, id: &str) -> Result<SynthesisJob, SpeechError>;
}
