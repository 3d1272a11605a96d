//! Portfolio assistant: conversation state and reply backends
//!
//! With an API key the assistant forwards questions to Gemini; without one it
//! answers from a short list of keyword-triggered replies after a fake typing
//! delay.

use super::config::{ChatConfig, ScriptedTopic};
use super::gemini::GeminiClient;
use super::markup::escape_html;

/// Shown when the endpoint answered but produced no text
pub const EMPTY_REPLY_MESSAGE: &str =
    "I'm having trouble connecting to Google's AI servers right now. Please try again later.";
/// Shown when the request itself failed
pub const TRANSPORT_FAILURE_MESSAGE: &str =
    "Oops! Something went wrong with the connection. Please check your internet or API key.";

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("response contained no reply text")]
    EmptyResponse,
}

impl ChatError {
    /// What the visitor sees instead of a reply
    pub fn user_message(&self) -> &'static str {
        match self {
            ChatError::EmptyResponse => EMPTY_REPLY_MESSAGE,
            ChatError::Transport(_) | ChatError::Decode(_) => TRANSPORT_FAILURE_MESSAGE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

/// Widget state: visibility and transcript
#[derive(Debug, Default)]
pub struct ChatState {
    open: bool,
    transcript: Vec<ChatMessage>,
}

impl ChatState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Flip visibility, returning the new state
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    pub fn push(&mut self, role: ChatRole, text: impl Into<String>) {
        self.transcript.push(ChatMessage {
            role,
            text: text.into(),
        });
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }
}

/// Trimmed question, `None` when there is nothing to send
pub fn normalize_prompt(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Keyword-matching replies used when no API key is configured
#[derive(Clone, Debug)]
pub struct ScriptedResponder {
    topics: Vec<ScriptedTopic>,
    unmatched_reply: String,
}

impl ScriptedResponder {
    pub fn new(config: &ChatConfig) -> Self {
        Self {
            topics: config
                .topics
                .iter()
                .map(|t| ScriptedTopic {
                    keywords: t.keywords.iter().map(|k| k.to_lowercase()).collect(),
                    reply: t.reply.clone(),
                })
                .collect(),
            unmatched_reply: config.unmatched_reply.clone(),
        }
    }

    /// First topic with a keyword contained in the (lowercased) prompt wins
    pub fn reply(&self, prompt: &str) -> String {
        let lower = prompt.to_lowercase();
        self.topics
            .iter()
            .find(|topic| topic.keywords.iter().any(|k| lower.contains(k.as_str())))
            .map(|topic| topic.reply.clone())
            .unwrap_or_else(|| {
                // The reply is rendered as markup, so the echoed question must not be
                self.unmatched_reply
                    .replace("{prompt}", &escape_html(prompt))
            })
    }
}

/// Where replies come from
#[derive(Clone, Debug)]
pub enum ChatBackend {
    Scripted {
        responder: ScriptedResponder,
        typing_delay_ms: u32,
    },
    Remote(GeminiClient),
}

impl ChatBackend {
    pub fn from_config(config: &ChatConfig) -> Self {
        if config.api_key.trim().is_empty() {
            ChatBackend::Scripted {
                responder: ScriptedResponder::new(config),
                typing_delay_ms: config.typing_delay_ms,
            }
        } else {
            ChatBackend::Remote(GeminiClient::new(config))
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, ChatBackend::Remote(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn responder() -> ScriptedResponder {
        ScriptedResponder::new(&ChatConfig::default())
    }

    #[test]
    fn test_toggle_and_transcript() {
        let mut state = ChatState::new();
        assert!(!state.is_open());
        assert!(state.toggle());
        assert!(!state.toggle());

        state.push(ChatRole::User, "hi");
        state.push(ChatRole::Assistant, "hello");
        assert_eq!(state.transcript().len(), 2);
        assert_eq!(state.transcript()[0].role, ChatRole::User);
        assert_eq!(state.transcript()[1].text, "hello");
    }

    #[test]
    fn test_normalize_prompt() {
        assert_eq!(normalize_prompt("  hello \n"), Some("hello".to_string()));
        assert_eq!(normalize_prompt("   "), None);
        assert_eq!(normalize_prompt(""), None);
    }

    #[test]
    fn test_scripted_topics_case_insensitive() {
        let r = responder();
        assert!(r.reply("What is your TECH stack?").contains("ASP.NET MVC"));
        assert!(r.reply("Tell me about his Experience").contains("Accenture"));
        assert!(r.reply("Any projects?").contains("Retail Inventory System"));
        assert!(r.reply("How can I reach him").contains("@gmail.com"));
    }

    #[test]
    fn test_scripted_topic_order_wins() {
        // "skill" (first topic) and "project" (third) both present
        let reply = responder().reply("Which skills did the projects need?");
        assert!(reply.contains("tech stack"));
    }

    #[test]
    fn test_unmatched_reply_echoes_escaped_prompt() {
        let reply = responder().reply("<img src=x> hobbies?");
        assert!(reply.starts_with("I see you're asking about \"&lt;img src=x&gt; hobbies?\""));
        assert!(!reply.contains("<img"));
    }

    #[test]
    fn test_backend_selection() {
        let mut config = ChatConfig::default();
        assert!(!ChatBackend::from_config(&config).is_remote());

        config.api_key = "   ".to_string();
        assert!(!ChatBackend::from_config(&config).is_remote());

        config.api_key = "key".to_string();
        assert!(ChatBackend::from_config(&config).is_remote());
    }

    #[test]
    fn test_error_user_messages() {
        assert_eq!(ChatError::EmptyResponse.user_message(), EMPTY_REPLY_MESSAGE);
        assert_eq!(
            ChatError::Transport("offline".into()).user_message(),
            TRANSPORT_FAILURE_MESSAGE
        );
    }
}
