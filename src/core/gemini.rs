//! Request/response contract of the Gemini `generateContent` endpoint
//!
//! Only the pieces the assistant uses are modelled: one user turn with one
//! text part going out, the first candidate's first text part coming back.
//! Transport lives with each platform (`fetch` in the browser, reqwest in the CLI).

use serde::{Deserialize, Serialize};

use super::chat::ChatError;
use super::config::ChatConfig;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateResponse {
    /// Text of the first part of the first candidate
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
    }
}

/// Everything needed to call the endpoint for one site
#[derive(Clone)]
pub struct GeminiClient {
    endpoint: String,
    model: String,
    api_key: String,
    context: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    pub fn new(config: &ChatConfig) -> Self {
        Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.trim().to_string(),
            context: config.assistant_context.clone(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// `POST` target, key passed as a query parameter
    pub fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint, self.model, self.api_key
        )
    }

    /// Single user turn carrying the site context and the question
    pub fn request(&self, prompt: &str) -> GenerateRequest {
        GenerateRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(format!(
                        "System Instruction: {}\n\nUser Question: {}",
                        self.context, prompt
                    )),
                }],
            }],
        }
    }

    /// JSON body for `prompt`
    pub fn request_body(&self, prompt: &str) -> Result<String, ChatError> {
        serde_json::to_string(&self.request(prompt)).map_err(ChatError::Decode)
    }
}

/// Extract the reply text from a response body
pub fn parse_reply(body: &str) -> Result<String, ChatError> {
    let response: GenerateResponse = serde_json::from_str(body)?;
    response
        .first_text()
        .map(str::to_string)
        .ok_or(ChatError::EmptyResponse)
}
