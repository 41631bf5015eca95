use anyhow::{Context, Result};
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use voxchat_core::chat::{Conversation, Session};
use voxchat_core::formatter::{EventFormatter, VerboseFormatter};
use voxchat_core::settings::SettingsManager;
use voxchat_core::voice::{Platform, SystemPlayer};

pub struct InteractiveApp {
    conversation: Conversation,
}

impl InteractiveApp {
    /// Every configuration problem surfaces here, before the first prompt
    pub fn new(
        settings_path: Option<PathBuf>,
        system_prompt_path: Option<PathBuf>,
        no_voice: bool,
    ) -> Result<Self> {
        let mut settings_manager = match settings_path {
            Some(path) => SettingsManager::from_path(path)?,
            None => SettingsManager::new()?,
        };

        settings_manager.update_setting(|settings| {
            if let Some(path) = system_prompt_path {
                settings.system_prompt_path = path;
            }
            if no_voice {
                settings.speech.enabled = false;
            }
        });
        let settings = settings_manager.settings();

        let platform = Platform::detect()?;
        let session = Session::from_settings(settings, Arc::new(SystemPlayer::new(platform)))
            .with_context(|| {
                format!("Invalid configuration in {:?}", settings_manager.path())
            })?;

        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        let system_prompt = settings.load_system_prompt(&cwd)?;

        info!(
            ?platform,
            speech = settings.speech.enabled,
            voice = %settings.speech.voice,
            has_system_prompt = system_prompt.is_some(),
            "Session ready"
        );

        let mut formatter = VerboseFormatter::new().with_colors(std::io::stdout().is_terminal());
        clear_screen();
        match &system_prompt {
            Some(prompt) => println!("\nSYSTEM PROMPT:\n{prompt}\n"),
            None => formatter.print_system(&format!(
                "No system prompt found at {:?}; starting without one",
                settings.system_prompt_path
            )),
        }

        let conversation = Conversation::new(session, system_prompt, Box::new(formatter));

        Ok(Self { conversation })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut rl = DefaultEditor::new()?;

        loop {
            let line = match rl.readline("You: ") {
                Ok(line) => line,
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
                Err(err) => return Err(err.into()),
            };

            if !line.trim().is_empty() {
                rl.add_history_entry(&line)?;
            }

            // Already reported to the user; the next prompt starts a fresh turn
            if let Err(e) = self.conversation.handle_input(&line).await {
                error!(error = %e, "Chat turn failed");
            }
        }

        println!("\nGoodbye!");
        Ok(())
    }
}

fn clear_screen() {
    let _ = execute!(std::io::stdout(), Clear(ClearType::All), MoveTo(0, 0));
}
