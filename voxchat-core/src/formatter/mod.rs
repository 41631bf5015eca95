mod recording;
mod verbose;

pub use recording::{FormattedLine, RecordingFormatter};
pub use verbose::VerboseFormatter;

/// Trait for formatting and displaying conversation output in the terminal
pub trait EventFormatter: Send {
    fn print_system(&mut self, msg: &str);

    fn print_ai(&mut self, msg: &str);

    fn print_warning(&mut self, msg: &str);

    fn print_error(&mut self, msg: &str);

    /// Shown while a remote call is in flight; cleared by the next line
    fn print_thinking(&mut self) {}
}
