//! Audio playback through the host's native command line player

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::voice::error::SpeechError;

/// Plays an audio file and returns once playback has finished
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    async fn play(&self, path: &Path) -> Result<(), SpeechError>;
}

/// Host platforms with a known blocking playback primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Linux,
    Windows,
}

impl Platform {
    /// Platform of the running process
    pub fn detect() -> Result<Self, SpeechError> {
        Self::from_os(std::env::consts::OS)
    }

    pub fn from_os(os: &str) -> Result<Self, SpeechError> {
        match os {
            "macos" => Ok(Platform::MacOs),
            "linux" => Ok(Platform::Linux),
            "windows" => Ok(Platform::Windows),
            other => Err(SpeechError::UnsupportedPlatform(other.to_string())),
        }
    }

    pub fn program(self) -> &'static str {
        match self {
            Platform::MacOs => "afplay",
            Platform::Linux => "aplay",
            Platform::Windows => "powershell",
        }
    }

    pub fn args(self, path: &Path) -> Vec<String> {
        let path = path.to_string_lossy();
        match self {
            Platform::MacOs => vec![path.into_owned()],
            Platform::Linux => vec!["-q".to_string(), path.into_owned()],
            Platform::Windows => vec![
                "-NoProfile".to_string(),
                "-NonInteractive".to_string(),
                "-Command".to_string(),
                format!(
                    "(New-Object System.Media.SoundPlayer '{}').PlaySync()",
                    path.replace('\'', "''")
                ),
            ],
        }
    }
}

/// Shells out to `afplay`, `aplay` or PowerShell's `SoundPlayer`
#[derive(Debug, Clone, Copy)]
pub struct SystemPlayer {
    platform: Platform,
}

impl SystemPlayer {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }
}

#[async_trait]
impl AudioPlayer for SystemPlayer {
    async fn play(&self, path: &Path) -> Result<(), SpeechError> {
        let program = self.platform.program();
        debug!(program, path = %path.display(), "Playing audio");

        let output = Command::new(program)
            .args(self.platform.args(path))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| SpeechError::Playback(anyhow::anyhow!("Failed to execute {program}: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SpeechError::Playback(anyhow::anyhow!(
                "{program} exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(())
    }
}
