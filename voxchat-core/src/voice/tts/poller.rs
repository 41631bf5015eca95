//! Drives a prediction from submission to a playable audio URL

use reqwest::Url;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep_until, timeout_at, Instant};
use tracing::{debug, info, warn};

use super::provider::PredictionApi;
use super::types::{JobStatus, SynthesisJob, SynthesisRequestParameters, VoiceParameters};
use crate::voice::error::SpeechError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

pub struct SpeechSynthesizer {
    api: Arc<dyn PredictionApi>,
    voice: VoiceParameters,
    timeout: Duration,
    poll_interval: Duration,
}

impl SpeechSynthesizer {
    pub fn new(api: Arc<dyn PredictionApi>, voice: VoiceParameters) -> Self {
        Self {
            api,
            voice,
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Submit `text` for synthesis and wait for the job to finish.
    ///
    /// Returns `Ok(None)` when no audio is available: the job failed, was
    /// canceled, succeeded without output, or did not finish within the
    /// timeout. One deadline covers every poll of the job, and no request is
    /// allowed to run past it.
    ///
    /// Errors are transport or HTTP status failures, and a creation response
    /// that does not carry a job id.
    pub async fn synthesize(&self, text: &str) -> Result<Option<Url>, SpeechError> {
        let params = SynthesisRequestParameters::new(text, &self.voice);
        let mut job = self.api.create_prediction(&params).await?;
        // A budget too large to represent never expires
        let deadline = Instant::now().checked_add(self.timeout);
        let id = job.id.clone();

        info!(%id, status = %job.status, voice = %self.voice.voice, "Speech synthesis job submitted");

        loop {
            match job.status {
                JobStatus::Succeeded => return Ok(output_location(&job)),
                JobStatus::Failed | JobStatus::Canceled => {
                    warn!(%id, status = %job.status, error = ?job.error, "Speech synthesis did not succeed");
                    return Ok(None);
                }
                JobStatus::Starting | JobStatus::Processing => {}
            }

            let now = Instant::now();
            if is_past(deadline, now) {
                return Ok(self.timed_out(&id));
            }

            match next_wake(now.checked_add(self.poll_interval), deadline) {
                Some(wake) => sleep_until(wake).await,
                None => std::future::pending::<()>().await,
            }
            if is_past(deadline, Instant::now()) {
                return Ok(self.timed_out(&id));
            }

            let polled = match deadline {
                Some(deadline) => timeout_at(deadline, self.api.get_prediction(&id)).await,
                None => Ok(self.api.get_prediction(&id).await),
            };

            job = match polled {
                Err(_) => return Ok(self.timed_out(&id)),
                // A response landing exactly on the deadline is still too late
                Ok(_) if is_past(deadline, Instant::now()) => return Ok(self.timed_out(&id)),
                Ok(Ok(next)) => next,
                Ok(Err(SpeechError::MalformedResponse(reason))) => {
                    warn!(%id, %reason, "Unreadable prediction status; skipping audio");
                    return Ok(None);
                }
                Ok(Err(e)) => return Err(e),
            };

            debug!(%id, status = %job.status, "Polled speech synthesis job");
        }
    }

    fn timed_out(&self, id: &str) -> Option<Url> {
        info!(%id, timeout = ?self.timeout, "Speech synthesis timed out; skipping audio");
        None
    }
}

fn is_past(deadline: Option<Instant>, now: Instant) -> bool {
    deadline.is_some_and(|deadline| now >= deadline)
}

fn next_wake(interval_end: Option<Instant>, deadline: Option<Instant>) -> Option<Instant> {
    match (interval_end, deadline) {
        (Some(end), Some(deadline)) => Some(end.min(deadline)),
        (end, None) => end,
        (None, deadline) => deadline,
    }
}

fn output_location(job: &SynthesisJob) -> Option<Url> {
    let Some(raw) = job.output_url() else {
        warn!(id = %job.id, "Speech synthesis succeeded without output");
        return None;
    };

    match Url::parse(raw) {
        Ok(url) => Some(url),
        Err(e) => {
            warn!(id = %job.id, output = %raw, error = %e, "Speech synthesis output is not a URL");
            None
        }
    }
}
