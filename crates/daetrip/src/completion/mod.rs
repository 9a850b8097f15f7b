//! Seams for an external text-completion model and the post-processing of its output.

mod labels;
mod session;

pub use labels::CategoryMatcher;
pub use session::{ChatSession, ChatTurn, Speaker};

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::survey::{SurveyDefinition, SurveyResponse};

/// Text returned by a completion backend plus the tokens the call consumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub text: String,
    #[serde(default)]
    pub total_tokens: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("completion backend unavailable: {0}")]
    Unavailable(String),
    #[error("completion backend returned no text")]
    EmptyResponse,
}

/// Chat-completion backend. Transport, retries and authentication live in the implementation.
pub trait TextCompletion: Send + Sync {
    fn complete(&self, prompt: &str) -> Result<Completion, CompletionError>;
}

const PROMPT_PREAMBLE: &str = "Based on the following responses to travel preference questions, \
please provide an analysis of my traveler type and recommend relevant touristic sites or \
activities specifically in Daejeon, South Korea:";

/// Numbered survey prompt, one `N. question (Response: value)` line per answer.
pub fn survey_prompt(survey: &SurveyDefinition, responses: &SurveyResponse) -> String {
    let mut prompt = format!("{PROMPT_PREAMBLE}\n\n");
    for (index, (question, response)) in survey
        .questions()
        .iter()
        .zip(responses.values())
        .enumerate()
    {
        // Writing into a String cannot fail.
        let _ = writeln!(prompt, "{}. {} (Response: {})", index + 1, question, response);
    }
    prompt
}
