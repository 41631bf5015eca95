use super::EventFormatter;
use std::io::Write;

#[derive(Clone)]
pub struct VerboseFormatter {
    use_colors: bool,
    assistant_name: String,
    thinking_shown: bool,
}

impl Default for VerboseFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl VerboseFormatter {
    pub fn new() -> Self {
        Self {
            use_colors: true,
            assistant_name: "Her".to_string(),
            thinking_shown: false,
        }
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    fn clear_thinking_if_shown(&mut self) {
        if self.thinking_shown {
            print!("\r\x1b[2K");
            self.thinking_shown = false;
        }
    }

    fn print_line(&mut self, line: &str) {
        self.clear_thinking_if_shown();
        println!("{line}");
    }

    fn eprint_line(&mut self, line: &str) {
        self.clear_thinking_if_shown();
        eprintln!("{line}");
    }
}

impl EventFormatter for VerboseFormatter {
    fn print_system(&mut self, msg: &str) {
        if self.use_colors {
            self.print_line(&format!("\x1b[33m[System]\x1b[0m {msg}"));
        } else {
            self.print_line(&format!("[System] {msg}"));
        }
    }

    fn print_ai(&mut self, msg: &str) {
        let name = self.assistant_name.clone();
        if self.use_colors {
            self.print_line(&format!("\x1b[32m{name}:\x1b[0m {msg}"));
        } else {
            self.print_line(&format!("{name}: {msg}"));
        }
    }

    fn print_warning(&mut self, msg: &str) {
        if self.use_colors {
            self.eprint_line(&format!("\x1b[33m[Warning]\x1b[0m {msg}"));
        } else {
            self.eprint_line(&format!("[Warning] {msg}"));
        }
    }

    fn print_error(&mut self, msg: &str) {
        if self.use_colors {
            self.eprint_line(&format!("\x1b[31m[Error]\x1b[0m {msg}"));
        } else {
            self.eprint_line(&format!("[Error] {msg}"));
        }
    }

    fn print_thinking(&mut self) {
        if self.use_colors {
            print!("\x1b[90m...\x1b[0m");
        } else {
            print!("...");
        }
        let _ = std::io::stdout().flush();
        self.thinking_shown = true;
    }
}
