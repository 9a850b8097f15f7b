use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use super::{CompletionError, TextCompletion};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Human,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatTurn {
    pub speaker: Speaker,
    pub message: String,
    pub at: DateTime<Utc>,
}

/// Conversation history and token usage for one visitor.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChatSession {
    history: Vec<ChatTurn>,
    token_count: u64,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sends `prompt` to `model` and records both turns.
    ///
    /// A failed or empty completion leaves the history and token count untouched.
    pub fn ask(
        &mut self,
        model: &dyn TextCompletion,
        prompt: &str,
    ) -> Result<&ChatTurn, CompletionError> {
        let completion = model.complete(prompt)?;
        if completion.text.trim().is_empty() {
            return Err(CompletionError::EmptyResponse);
        }

        let now = Utc::now();
        self.history.push(ChatTurn {
            speaker: Speaker::Human,
            message: prompt.to_string(),
            at: now,
        });
        self.history.push(ChatTurn {
            speaker: Speaker::Ai,
            message: completion.text,
            at: now,
        });
        self.token_count += completion.total_tokens;
        debug!(
            turns = self.history.len(),
            token_count = self.token_count,
            "recorded chat exchange"
        );

        self.history
            .last()
            .ok_or(CompletionError::EmptyResponse)
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    pub fn token_count(&self) -> u64 {
        self.token_count
    }

    pub fn last_reply(&self) -> Option<&str> {
        self.history
            .iter()
            .rev()
            .find(|turn| turn.speaker == Speaker::Ai)
            .map(|turn| turn.message.as_str())
    }
}
