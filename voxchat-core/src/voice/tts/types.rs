use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Named voice presets offered by the synthesis model
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VoicePreset {
    #[default]
    AfBella,
    AfZoe,
    AfLisa,
    AfMia,
    AfSamantha,
    AfOlivia,
    AfIsabella,
}

/// Everything about the voice except the text being spoken
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceParameters {
    pub language: String,
    pub voice: VoicePreset,
    pub speed: f64,
    pub temperature: f64,
    pub length: f64,
}

impl Default for VoiceParameters {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            voice: VoicePreset::default(),
            speed: 1.1,
            temperature: 0.75,
            length: 1.0,
        }
    }
}

/// The `input` object of a prediction creation request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesisRequestParameters {
    pub text: String,
    pub language: String,
    pub temperature: f64,
    pub length: f64,
    pub speed: f64,
    pub voice: VoicePreset,
}

impl SynthesisRequestParameters {
    pub fn new(text: impl Into<String>, voice: &VoiceParameters) -> Self {
        Self {
            text: text.into(),
            language: voice.language.clone(),
            temperature: voice.temperature,
            length: voice.length,
            speed: voice.speed,
            voice: voice.voice,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Starting,
    Processing,
    Succeeded,
    Failed,
    Canceled,
}

impl JobStatus {
    pub fn is_pending(self) -> bool {
        matches!(self, JobStatus::Starting | JobStatus::Processing)
    }
}

/// Prediction output is a URL, or a list of URLs for multi-file models
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictionOutput {
    Single(String),
    Many(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisJob {
    pub id: String,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default)]
    pub output: Option<PredictionOutput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<serde_json::Value>,
}

impl SynthesisJob {
    pub fn new(id: impl Into<String>, status: JobStatus) -> Self {
        Self {
            id: id.into(),
            status,
            output: None,
            error: None,
        }
    }

    pub fn with_output(mut self, url: impl Into<String>) -> Self {
        self.output = Some(PredictionOutput::Single(url.into()));
        self
    }

    /// First non-blank output URL, if any
    pub fn output_url(&self) -> Option<&str> {
        let url = match self.output.as_ref()? {
            PredictionOutput::Single(url) => Some(url.as_str()),
            PredictionOutput::Many(urls) => urls
                .iter()
                .map(String::as_str)
                .find(|url| !url.trim().is_empty()),
        }?;

        let url = url.trim();
        (!url.is_empty()).then_some(url)
    }
}
