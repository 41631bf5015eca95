//! Retrieval of synthesized audio and local playback

pub mod mock;
pub mod playback;

use reqwest::{Client, Url};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub use playback::{AudioPlayer, Platform, SystemPlayer};

use crate::voice::error::SpeechError;

/// Downloads synthesized audio and hands it to an [`AudioPlayer`]
pub struct AudioOutput {
    client: Client,
    player: Arc<dyn AudioPlayer>,
}

impl AudioOutput {
    pub fn new(player: Arc<dyn AudioPlayer>, request_timeout: Duration) -> Result<Self, SpeechError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| SpeechError::Transport(anyhow::anyhow!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, player })
    }

    /// Download the payload at `location` into a fresh temporary file, play
    /// it, and remove the file whether or not playback succeeded.
    pub async fn fetch_and_play(&self, location: &Url) -> Result<(), SpeechError> {
        let bytes = self.download(location).await?;

        let mut file = tempfile::Builder::new()
            .prefix("voxchat-")
            .suffix(".wav")
            .tempfile()?;
        file.write_all(&bytes)?;
        file.flush()?;

        debug!(path = %file.path().display(), bytes = bytes.len(), "Audio staged for playback");
        let played = self.player.play(file.path()).await;

        // Dropping the handle also unlinks, this only surfaces the error
        let path = file.path().to_path_buf();
        if let Err(e) = file.close() {
            warn!(path = %path.display(), error = %e, "Failed to remove temporary audio file");
        }

        played
    }

    async fn download(&self, location: &Url) -> Result<Vec<u8>, SpeechError> {
        let response = self
            .client
            .get(location.clone())
            .send()
            .await
            .map_err(|e| SpeechError::Transport(anyhow::anyhow!("Failed to download audio: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SpeechError::Transport(anyhow::anyhow!("Failed to read audio bytes: {e}")))?;

        Ok(bytes.to_vec())
    }
}
