//! Line-oriented `UserInterface` over stdin/stderr.
//!
//! Prompts go to stderr so stdout carries only command messages. A preset
//! name (`--to`) or `--yes` answers the matching prompt without reading.

use std::io::{self, BufRead, Write};

use core_actions::UserInterface;

pub struct TerminalUi<R, W> {
    input: R,
    prompt_out: W,
    preset_name: Option<String>,
    assume_yes: bool,
}

impl TerminalUi<io::StdinLock<'static>, io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> TerminalUi<R, W> {
    pub fn new(input: R, prompt_out: W) -> Self {
        Self {
            input,
            prompt_out,
            preset_name: None,
            assume_yes: false,
        }
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.preset_name = name;
        self
    }

    pub fn assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }

    /// One line of input without its line ending; `None` at end of input or
    /// on a read error.
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        if let Err(e) = write!(self.prompt_out, "{prompt}").and_then(|()| self.prompt_out.flush()) {
            tracing::debug!(target: "runtime", error = %e, "prompt_write_failed");
        }
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(e) => {
                tracing::warn!(target: "runtime", error = %e, "prompt_read_failed");
                None
            }
        }
    }
}

impl<R: BufRead, W: Write> UserInterface for TerminalUi<R, W> {
    fn read_file_name(&mut self, prompt: &str, initial: &str) -> Option<String> {
        if let Some(name) = self.preset_name.take() {
            return Some(name);
        }
        let line = self.read_line(&format!("{prompt}[{initial}] "))?;
        let line = line.trim();
        if line.is_empty() {
            Some(initial.to_string())
        } else {
            Some(line.to_string())
        }
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        self.read_line(&format!("{prompt}(yes or no) "))
            .is_some_and(|answer| matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
    }

    fn message(&mut self, text: &str) {
        println!("{text}");
    }
}
