use tracing::{debug, info, warn};

use crate::ai::error::AiError;
use crate::chat::history::ConversationHistory;
use crate::chat::session::Session;
use crate::formatter::EventFormatter;
use crate::voice::SpeechOutcome;

pub const EMPTY_INPUT_NUDGE: &str =
    "If you want her to talk, you have to give me something to say!";
pub const NO_RESPONSE_FALLBACK: &str = "No response from the model...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioOutcome {
    Played,
    /// Synthesis finished without audio, or ran out of time
    Unavailable,
    /// Synthesis, download or playback raised an error
    Failed,
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Blank input; nothing was sent
    Nudged,
    Answered { answer: String, audio: AudioOutcome },
}

/// The chat loop: waits for input, then runs one complete turn (chat
/// request, printed answer, speech) before accepting the next line.
pub struct Conversation {
    session: Session,
    history: ConversationHistory,
    formatter: Box<dyn EventFormatter>,
}

impl Conversation {
    pub fn new(
        session: Session,
        system_prompt: Option<String>,
        formatter: Box<dyn EventFormatter>,
    ) -> Self {
        Self {
            session,
            history: ConversationHistory::new(system_prompt),
            formatter,
        }
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    /// Run one turn for a line of user input.
    ///
    /// A response without message content is replaced by
    /// [`NO_RESPONSE_FALLBACK`], which is kept in history like a real reply.
    /// Transport and HTTP status failures are printed and returned with the
    /// history left as it was before the turn. Speech problems never fail the
    /// turn.
    pub async fn handle_input(&mut self, input: &str) -> Result<TurnOutcome, AiError> {
        if input.trim().is_empty() {
            self.formatter.print_system(EMPTY_INPUT_NUDGE);
            return Ok(TurnOutcome::Nudged);
        }

        let request = self.history.with_pending(input);
        debug!(
            provider = self.session.chat().name(),
            messages = request.len(),
            "Sending chat turn"
        );
        self.formatter.print_thinking();

        let answer = match self.session.chat().complete(&request).await {
            Ok(completion) => completion.content,
            Err(e) if e.is_malformed() => {
                warn!(error = %e, "Chat response had no content, using fallback");
                NO_RESPONSE_FALLBACK.to_string()
            }
            Err(e) => {
                self.formatter
                    .print_error(&format!("The model could not be reached: {e}"));
                return Err(e);
            }
        };

        self.formatter.print_ai(&answer);
        self.history.push_turn(input, answer.as_str());

        let audio = self.speak(&answer).await;
        Ok(TurnOutcome::Answered { answer, audio })
    }

    async fn speak(&mut self, answer: &str) -> AudioOutcome {
        let Some(speaker) = self.session.speaker() else {
            return AudioOutcome::Disabled;
        };

        match speaker.speak(answer).await {
            Ok(SpeechOutcome::Played) => AudioOutcome::Played,
            Ok(SpeechOutcome::Unavailable) => {
                info!("No audio for this reply");
                AudioOutcome::Unavailable
            }
            Err(e) => {
                warn!(error = %e, "Speech failed; continuing without audio");
                self.formatter
                    .print_warning(&format!("Could not play the reply: {e}"));
                AudioOutcome::Failed
            }
        }
    }
}
