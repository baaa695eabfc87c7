use parking_lot::Mutex;
use std::{
    collections::VecDeque,
    io::{self, BufRead, Write},
};

/// How the library talks back to a person: blocking notices and yes/no questions.
pub trait Prompt {
    fn notify(&self, message: &str);
    fn confirm(&self, question: &str) -> bool;
}

/// Terminal prompt: notices on stderr, confirmations read from stdin.
pub struct TerminalPrompt {
    pub assume_yes: bool,
}

impl Prompt for TerminalPrompt {
    fn notify(&self, message: &str) {
        eprintln!("⚠️  {message}");
    }

    fn confirm(&self, question: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        eprint!("{question} [y/N] ");
        let _ = io::stderr().flush();
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line).is_err() {
            return false;
        }
        matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

/// Records notices and answers confirmations from a script. Used by tests and
/// non-interactive callers.
#[derive(Default)]
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<bool>>,
    notices: Mutex<Vec<String>>,
    questions: Mutex<Vec<String>>,
}

impl ScriptedPrompt {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn notices(&self) -> Vec<String> {
        self.notices.lock().clone()
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().clone()
    }
}

impl Prompt for ScriptedPrompt {
    fn notify(&self, message: &str) {
        self.notices.lock().push(message.to_string());
    }

    /// Unscripted questions are declined.
    fn confirm(&self, question: &str) -> bool {
        self.questions.lock().push(question.to_string());
        self.answers.lock().pop_front().unwrap_or(false)
    }
}
