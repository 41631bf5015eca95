use super::EventFormatter;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormattedLine {
    System(String),
    Ai(String),
    Warning(String),
    Error(String),
}

/// Collects output instead of printing it; clones share one buffer
#[derive(Clone, Default)]
pub struct RecordingFormatter {
    lines: Arc<Mutex<Vec<FormattedLine>>>,
}

impl RecordingFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<FormattedLine> {
        self.lines.lock().unwrap().clone()
    }

    fn push(&self, line: FormattedLine) {
        self.lines.lock().unwrap().push(line);
    }
}

impl EventFormatter for RecordingFormatter {
    fn print_system(&mut self, msg: &str) {
        self.push(FormattedLine::System(msg.to_string()));
    }

    fn print_ai(&mut self, msg: &str) {
        self.push(FormattedLine::Ai(msg.to_string()));
    }

    fn print_warning(&mut self, msg: &str) {
        self.push(FormattedLine::Warning(msg.to_string()));
    }

    fn print_error(&mut self, msg: &str) {
        self.push(FormattedLine::Error(msg.to_string()));
    }
}
