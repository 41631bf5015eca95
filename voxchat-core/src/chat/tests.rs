use std::sync::{Arc, Once};
use std::time::Duration;

use crate::ai::mock::{MockBehavior, MockProvider};
use crate::ai::types::{ChatMessage, MessageRole};
use crate::ai::AiError;
use crate::chat::conversation::{
    AudioOutcome, Conversation, TurnOutcome, EMPTY_INPUT_NUDGE, NO_RESPONSE_FALLBACK,
};
use crate::chat::session::Session;
use crate::formatter::{FormattedLine, RecordingFormatter};
use crate::voice::audio::mock::{PlayerBehavior, RecordingPlayer};
use crate::voice::audio::AudioOutput;
use crate::voice::tts::mock::{MockPrediction, MockPredictionApi};
use crate::voice::tts::types::VoiceParameters;
use crate::voice::{Speaker, SpeechSynthesizer};

static TRACING_INIT: Once = Once::new();

fn setup_tracing() {
    TRACING_INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

struct TestFixture {
    conversation: Conversation,
    provider: MockProvider,
    predictions: MockPredictionApi,
    player: RecordingPlayer,
    formatter: RecordingFormatter,
}

impl TestFixture {
    fn new(behavior: MockBehavior, predictions: MockPredictionApi) -> Self {
        Self::build(behavior, Some(predictions), Some("Be grumpy.".to_string()))
    }

    fn without_speech(behavior: MockBehavior) -> Self {
        Self::build(behavior, None, Some("Be grumpy.".to_string()))
    }

    fn build(
        behavior: MockBehavior,
        predictions: Option<MockPredictionApi>,
        system_prompt: Option<String>,
    ) -> Self {
        setup_tracing();

        let provider = MockProvider::new(behavior);
        let player = RecordingPlayer::new(PlayerBehavior::Succeed);
        let formatter = RecordingFormatter::new();

        let speaker = predictions.as_ref().map(|api| {
            let synthesizer =
                SpeechSynthesizer::new(Arc::new(api.clone()), VoiceParameters::default());
            let output = AudioOutput::new(Arc::new(player.clone()), Duration::from_secs(5))
                .expect("Failed to build audio output");
            Speaker::new(synthesizer, output)
        });

        let session = Session::new(Arc::new(provider.clone()), speaker);
        let conversation = Conversation::new(session, system_prompt, Box::new(formatter.clone()));

        Self {
            conversation,
            provider,
            predictions: predictions.unwrap_or_else(|| MockPredictionApi::with_polls(vec![])),
            player,
            formatter,
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_blank_input_is_nudged_without_remote_calls() {
    let mut fixture = TestFixture::new(MockBehavior::Echo, MockPredictionApi::with_polls(vec![]));

    for input in ["", "   ", "\t\n"] {
        let outcome = fixture.conversation.handle_input(input).await.unwrap();
        assert_eq!(outcome, TurnOutcome::Nudged);
    }

    assert_eq!(fixture.conversation.history().len(), 1);
    assert_eq!(fixture.provider.get_call_count(), 0);
    assert!(fixture.predictions.created_requests().is_empty());
    assert_eq!(
        fixture.formatter.lines(),
        vec![FormattedLine::System(EMPTY_INPUT_NUDGE.to_string()); 3]
    );
}

#[tokio::test]
async fn test_turn_appends_user_then_assistant() {
    let mut fixture = TestFixture::without_speech(MockBehavior::Reply("Hi there".to_string()));

    let outcome = fixture.conversation.handle_input("Hello").await.unwrap();

    assert_eq!(
        outcome,
        TurnOutcome::Answered {
            answer: "Hi there".to_string(),
            audio: AudioOutcome::Disabled,
        }
    );
    assert_eq!(
        fixture.conversation.history().messages(),
        &[
            ChatMessage::system("Be grumpy."),
            ChatMessage::user("Hello"),
            ChatMessage::assistant("Hi there"),
        ]
    );
    assert_eq!(
        fixture.provider.get_last_captured_request().unwrap(),
        vec![ChatMessage::system("Be grumpy."), ChatMessage::user("Hello")]
    );
    assert_eq!(
        fixture.formatter.lines(),
        vec![FormattedLine::Ai("Hi there".to_string())]
    );
}

#[tokio::test]
async fn test_each_turn_sends_full_history() {
    let mut fixture = TestFixture::without_speech(MockBehavior::Echo);

    fixture.conversation.handle_input("one").await.unwrap();
    fixture.conversation.handle_input("two").await.unwrap();
    fixture.conversation.handle_input("three").await.unwrap();

    let requests = fixture.provider.get_captured_requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[0].len(), 2);
    assert_eq!(requests[1].len(), 4);
    assert_eq!(requests[2].len(), 6);
    assert_eq!(requests[2][3], ChatMessage::user("two"));
    assert_eq!(requests[2][4], ChatMessage::assistant("Echo: two"));
    assert_eq!(requests[2][5], ChatMessage::user("three"));
    assert_eq!(fixture.conversation.history().len(), 7);

    let history = fixture.conversation.history().messages();
    for pair in history[1..].chunks(2) {
        assert_eq!(pair[0].role, MessageRole::User);
        assert_eq!(pair[1].role, MessageRole::Assistant);
    }
}

#[tokio::test]
async fn test_malformed_response_uses_fallback_and_keeps_it() {
    let mut fixture = TestFixture::without_speech(MockBehavior::BehaviorQueue {
        behaviors: vec![MockBehavior::Malformed, MockBehavior::Echo],
    });

    let outcome = fixture.conversation.handle_input("Hello").await.unwrap();
    assert!(matches!(
        outcome,
        TurnOutcome::Answered { ref answer, .. } if answer == NO_RESPONSE_FALLBACK
    ));

    fixture.conversation.handle_input("Again").await.unwrap();

    let second_request = fixture.provider.get_last_captured_request().unwrap();
    assert_eq!(second_request[2], ChatMessage::assistant(NO_RESPONSE_FALLBACK));
}

#[tokio::test]
async fn test_transport_failure_leaves_history_untouched() {
    let mut fixture = TestFixture::without_speech(MockBehavior::BehaviorQueue {
        behaviors: vec![
            MockBehavior::TransportError,
            MockBehavior::StatusError { status: 502 },
            MockBehavior::Reply("Finally".to_string()),
        ],
    });

    let err = fixture.conversation.handle_input("Hello").await.unwrap_err();
    assert!(matches!(err, AiError::Transport(_)));
    assert_eq!(fixture.conversation.history().len(), 1);

    let err = fixture.conversation.handle_input("Hello").await.unwrap_err();
    assert!(matches!(err, AiError::Status { status: 502, .. }));
    assert_eq!(fixture.conversation.history().len(), 1);

    fixture.conversation.handle_input("Hello").await.unwrap();
    assert_eq!(fixture.conversation.history().len(), 3);

    let lines = fixture.formatter.lines();
    assert_eq!(lines.len(), 3);
    assert!(matches!(lines[0], FormattedLine::Error(_)));
    assert!(matches!(lines[1], FormattedLine::Error(_)));
    assert_eq!(lines[2], FormattedLine::Ai("Finally".to_string()));
}

#[tokio::test(start_paused = true)]
async fn test_synthesis_timeout_skips_playback() {
    let mut fixture = TestFixture::new(
        MockBehavior::Reply("Hi there".to_string()),
        MockPredictionApi::with_polls(vec![]),
    );

    let outcome = fixture.conversation.handle_input("Hello").await.unwrap();

    assert_eq!(
        outcome,
        TurnOutcome::Answered {
            answer: "Hi there".to_string(),
            audio: AudioOutcome::Unavailable,
        }
    );
    assert!(fixture.player.plays().is_empty());
    assert_eq!(fixture.predictions.created_requests()[0].text, "Hi there");
    assert_eq!(fixture.conversation.history().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_failed_job_skips_playback() {
    let mut fixture = TestFixture::new(
        MockBehavior::Echo,
        MockPredictionApi::with_polls(vec![MockPrediction::failed()]),
    );

    let outcome = fixture.conversation.handle_input("Hello").await.unwrap();

    assert!(matches!(
        outcome,
        TurnOutcome::Answered {
            audio: AudioOutcome::Unavailable,
            ..
        }
    ));
    assert!(fixture.player.plays().is_empty());
    assert_eq!(fixture.predictions.poll_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_speech_errors_do_not_fail_the_turn() {
    let mut fixture = TestFixture::new(
        MockBehavior::Reply("Hi there".to_string()),
        MockPredictionApi::new(MockPrediction::Malformed, vec![]),
    );

    let outcome = fixture.conversation.handle_input("Hello").await.unwrap();

    assert!(matches!(
        outcome,
        TurnOutcome::Answered {
            audio: AudioOutcome::Failed,
            ..
        }
    ));

    let lines = fixture.formatter.lines();
    assert_eq!(lines[0], FormattedLine::Ai("Hi there".to_string()));
    assert!(matches!(lines[1], FormattedLine::Warning(_)));

    // The loop keeps going after a failed voice
    fixture.conversation.handle_input("Still there?").await.unwrap();
    assert_eq!(fixture.conversation.history().len(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_polling_transport_error_is_turn_scoped() {
    let mut fixture = TestFixture::new(
        MockBehavior::Echo,
        MockPredictionApi::with_polls(vec![MockPrediction::TransportError]),
    );

    let outcome = fixture.conversation.handle_input("Hello").await.unwrap();

    assert!(matches!(
        outcome,
        TurnOutcome::Answered {
            audio: AudioOutcome::Failed,
            ..
        }
    ));
    assert_eq!(fixture.conversation.history().len(), 3);
}

#[tokio::test]
async fn test_without_system_prompt_history_starts_with_user() {
    let mut fixture = TestFixture::build(MockBehavior::Echo, None, None);

    fixture.conversation.handle_input("Hello").await.unwrap();

    let history = fixture.conversation.history();
    assert_eq!(history.system_prompt(), None);
    assert_eq!(history.messages()[0], ChatMessage::user("Hello"));
}
