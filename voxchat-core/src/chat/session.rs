use anyhow::{Context, Result};
use std::sync::Arc;

use crate::ai::openai::{OpenAiCompatibleProvider, OpenAiConfig};
use crate::ai::provider::ChatProvider;
use crate::settings::Settings;
use crate::voice::audio::{AudioOutput, AudioPlayer};
use crate::voice::tts::provider::PredictionApi;
use crate::voice::tts::replicate::{ReplicateClient, ReplicateConfig};
use crate::voice::{Speaker, SpeechSynthesizer};

/// Clients and credentials for one conversation, built once at startup
pub struct Session {
    chat: Arc<dyn ChatProvider>,
    speaker: Option<Speaker>,
}

impl Session {
    pub fn new(chat: Arc<dyn ChatProvider>, speaker: Option<Speaker>) -> Self {
        Self { chat, speaker }
    }

    /// Build the HTTP clients described by `settings`. Speech clients are
    /// only created (and their token only required) when speech is enabled.
    pub fn from_settings(settings: &Settings, player: Arc<dyn AudioPlayer>) -> Result<Self> {
        settings.validate()?;

        let chat = OpenAiCompatibleProvider::new(OpenAiConfig {
            base_url: settings.chat.base_url.clone(),
            api_key: settings.chat_api_key()?,
            model: settings.chat.model.clone(),
            request_timeout: settings.chat.request_timeout(),
        })
        .context("Failed to set up chat client")?;

        let speaker = if settings.speech.enabled {
            let speech = &settings.speech;
            let api: Arc<dyn PredictionApi> = Arc::new(
                ReplicateClient::new(ReplicateConfig {
                    base_url: speech.base_url.clone(),
                    api_token: settings.speech_api_token()?,
                    model_version: speech.model_version.clone(),
                    request_timeout: speech.request_timeout(),
                })
                .context("Failed to set up speech client")?,
            );

            let synthesizer = SpeechSynthesizer::new(api, speech.voice_parameters())
                .with_timeout(speech.timeout())
                .with_poll_interval(speech.poll_interval());
            let output = AudioOutput::new(player, speech.request_timeout())
                .context("Failed to set up audio download client")?;

            Some(Speaker::new(synthesizer, output))
        } else {
            None
        };

        Ok(Self::new(Arc::new(chat), speaker))
    }

    pub fn chat(&self) -> &dyn ChatProvider {
        self.chat.as_ref()
    }

    pub fn speaker(&self) -> Option<&Speaker> {
        self.speaker.as_ref()
    }
}
