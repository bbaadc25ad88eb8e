//! User interaction seam.
//!
//! The commands suspend only here: the new-name prompt, the delete
//! confirmation, and (when `verbose` is on) a result message.

use std::collections::VecDeque;

pub trait UserInterface {
    /// Ask for a file name, pre-filled with `initial`. `None` means the user
    /// cancelled the prompt.
    fn read_file_name(&mut self, prompt: &str, initial: &str) -> Option<String>;
    /// Ask a yes/no question.
    fn confirm(&mut self, prompt: &str) -> bool;
    /// Echo a notification.
    fn message(&mut self, text: &str);
}

impl<T: UserInterface + ?Sized> UserInterface for &mut T {
    fn read_file_name(&mut self, prompt: &str, initial: &str) -> Option<String> {
        (**self).read_file_name(prompt, initial)
    }
    fn confirm(&mut self, prompt: &str) -> bool {
        (**self).confirm(prompt)
    }
    fn message(&mut self, text: &str) {
        (**self).message(text)
    }
}

/// Non-interactive interface answering from queued replies.
///
/// When the name queue runs dry the pre-filled value is accepted (as if the
/// user pressed return); when the confirmation queue runs dry the answer is
/// "no". Prompts and messages are recorded for inspection.
#[derive(Debug, Default, Clone)]
pub struct ScriptedUi {
    names: VecDeque<Option<String>>,
    confirmations: VecDeque<bool>,
    pub prompts: Vec<String>,
    pub messages: Vec<String>,
}

impl ScriptedUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer_name(mut self, name: impl Into<String>) -> Self {
        self.names.push_back(Some(name.into()));
        self
    }

    pub fn cancel_name(mut self) -> Self {
        self.names.push_back(None);
        self
    }

    pub fn answer_confirm(mut self, yes: bool) -> Self {
        self.confirmations.push_back(yes);
        self
    }
}

impl UserInterface for ScriptedUi {
    fn read_file_name(&mut self, prompt: &str, initial: &str) -> Option<String> {
        self.prompts.push(prompt.to_string());
        self.names
            .pop_front()
            .unwrap_or_else(|| Some(initial.to_string()))
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        self.prompts.push(prompt.to_string());
        self.confirmations.pop_front().unwrap_or(false)
    }

    fn message(&mut self, text: &str) {
        self.messages.push(text.to_string());
    }
}
