use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::playback::AudioPlayer;
use crate::voice::error::SpeechError;

#[derive(Debug, Clone, Copy, Default)]
pub enum PlayerBehavior {
    #[default]
    Succeed,
    Fail,
}

/// What the player saw when it was asked to play
#[derive(Debug, Clone)]
pub struct PlayRecord {
    pub path: PathBuf,
    pub contents: Vec<u8>,
}

/// Player that records each file instead of making any sound
#[derive(Clone, Default)]
pub struct RecordingPlayer {
    behavior: PlayerBehavior,
    plays: Arc<Mutex<Vec<PlayRecord>>>,
}

impl RecordingPlayer {
    pub fn new(behavior: PlayerBehavior) -> Self {
        Self {
            behavior,
            plays: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn plays(&self) -> Vec<PlayRecord> {
        self.plays.lock().unwrap().clone()
    }
}

#[async_trait]
impl AudioPlayer for RecordingPlayer {
    async fn play(&self, path: &Path) -> Result<(), SpeechError> {
        let contents = tokio::fs::read(path).await?;
        self.plays.lock().unwrap().push(PlayRecord {
            path: path.to_path_buf(),
            contents,
        });

        match self.behavior {
            PlayerBehavior::Succeed => Ok(()),
            PlayerBehavior::Fail => Err(SpeechError::Playback(anyhow::anyhow!(
                "audio device unavailable"
            ))),
        }
    }
}
