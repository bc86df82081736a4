use errors::ValidationError;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Number of most recent conversation turns forwarded upstream.
pub const MAX_HISTORY_TURNS: usize = 5;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String
}

impl ChatTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into()
        }
    }
}

/// A single prompt handed to the completion gateway.
///
/// Built once per HTTP request and dropped when the gateway returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub system_instructions: String,
    pub user_content: String,
    pub max_output_tokens: u32,
    pub recent_history: Vec<ChatTurn>
}

impl CompletionRequest {
    pub fn new(
        system_instructions: impl Into<String>,
        user_content: impl Into<String>,
        max_output_tokens: u32
    ) -> Self {
        Self {
            system_instructions: system_instructions.into(),
            user_content: user_content.into(),
            max_output_tokens,
            recent_history: Vec::new()
        }
    }

    /// Attaches conversation history, keeping only the most recent
    /// [`MAX_HISTORY_TURNS`] turns in their original order.
    pub fn with_history(mut self, history: Vec<ChatTurn>) -> Self {
        let skip = history.len().saturating_sub(MAX_HISTORY_TURNS);
        self.recent_history = history.into_iter().skip(skip).collect();
        self
    }

    /// Renders the user-side prompt sent upstream.
    pub fn render_prompt(&self) -> String {
        if self.recent_history.is_empty() {
            return self.user_content.clone();
        }

        let context = self
            .recent_history
            .iter()
            .map(|turn| format!("{}: {}", turn.role, turn.content))
            .collect::<Vec<_>>()
            .join("\n");

        format!("Previous conversation:\n{}\n\n{}", context, self.user_content)
    }
}

/// Checks that `content` is non-blank and at most `max_chars` characters.
pub fn validate_content(field: &str, content: &str, max_chars: usize) -> Result<(), ValidationError> {
    if content.trim().is_empty() {
        return Err(ValidationError::EmptyContent {
            field: field.to_string()
        });
    }

    let length = content.chars().count();
    if length > max_chars {
        return Err(ValidationError::ContentTooLong {
            field: field.to_string(),
            length,
            max: max_chars
        });
    }

    Ok(())
}

/// Classified failure category reported to callers once attempts are exhausted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ErrorClass {
    RateLimited,
    AuthFailure,
    Timeout,
    ContentFiltered,
    Unknown
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionResult {
    Success {
        text: String
    },
    Failure {
        error_class: ErrorClass,
        raw_message: String
    }
}

impl CompletionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, CompletionResult::Success { .. })
    }

    pub fn error_class(&self) -> Option<ErrorClass> {
        match self {
            CompletionResult::Success { .. } => None,
            CompletionResult::Failure { error_class, .. } => Some(*error_class)
        }
    }
}

/// Which of the two interchangeable upstream clients serves an attempt.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StrategyKind {
    Primary,
    Secondary
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: [String; 4],
    pub correct: usize
}

impl QuizQuestion {
    pub fn is_well_formed(&self) -> bool {
        !self.question.trim().is_empty()
            && self.correct < self.options.len()
            && self.options.iter().all(|o| !o.trim().is_empty())
    }
}
