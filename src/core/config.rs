//! Site configuration
//!
//! Every field has a default, so an empty JSON object (or no config at all)
//! yields the stock portfolio page. The browser build reads JSON from a
//! `<script type="application/json" id="portfolio-config">` element; native
//! binaries read the file named by `PORTFOLIO_CONFIG`.

use serde::{Deserialize, Serialize};

/// Id of the optional inline JSON config element
pub const CONFIG_ELEMENT_ID: &str = "portfolio-config";
/// Native: path to a JSON config file
pub const CONFIG_PATH_ENV: &str = "PORTFOLIO_CONFIG";
/// Native: overrides `chat.api_key`
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub canvas: CanvasConfig,
    pub reveal: RevealConfig,
    pub chat: ChatConfig,
}

impl SiteConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Native config: optional JSON file from `PORTFOLIO_CONFIG`, then the API
    /// key from `GEMINI_API_KEY` when set
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => {
                let json = std::fs::read_to_string(&path)
                    .map_err(|source| ConfigError::Io { path, source })?;
                Self::from_json(&json)?
            }
            Err(_) => Self::default(),
        };
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            config.chat.api_key = key;
        }
        Ok(config)
    }
}

/// Background animation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub enabled: bool,
    pub element_id: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            element_id: "network-canvas".to_string(),
        }
    }
}

/// Reveal-on-scroll
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub selector: String,
    pub active_class: String,
    /// Visible fraction that triggers the reveal
    pub threshold: f64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            selector: ".reveal".to_string(),
            active_class: "active".to_string(),
            threshold: 0.1,
        }
    }
}

/// Chat widget and its backend
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Empty means the scripted responder is used
    #[serde(skip_serializing)]
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
    /// Simulated typing time of the scripted responder
    pub typing_delay_ms: u32,
    /// System instruction sent with every remote prompt
    pub assistant_context: String,
    /// Scripted replies, checked in order
    pub topics: Vec<ScriptedTopic>,
    /// Scripted reply when no topic matches; `{prompt}` is replaced with the question
    pub unmatched_reply: String,
    pub elements: ChatElements,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gemini-2.5-flash-preview-09-2025".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            typing_delay_ms: 1500,
            assistant_context: DEFAULT_ASSISTANT_CONTEXT.trim().to_string(),
            topics: default_topics(),
            unmatched_reply: "I see you're asking about \"{prompt}\". In real mode, I'd analyze \
                Amit's resume to answer that. In this demo, I can tell you about his **Skills**, \
                **Experience**, or **Projects**."
                .to_string(),
            elements: ChatElements::default(),
        }
    }
}

/// Keyword-triggered scripted reply
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScriptedTopic {
    /// Lowercase substrings; any match selects the topic
    pub keywords: Vec<String>,
    pub reply: String,
}

impl ScriptedTopic {
    fn new(keywords: &[&str], reply: &str) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            reply: reply.to_string(),
        }
    }
}

fn default_topics() -> Vec<ScriptedTopic> {
    vec![
        ScriptedTopic::new(
            &["skill", "stack", "tech"],
            "Amit's tech stack includes **ASP.NET MVC, C#, SQL Server, Oracle PL/SQL**, and \
             **Automic**. He is also an expert in **Incident Management** and **RCA**.",
        ),
        ScriptedTopic::new(
            &["experience", "work", "job"],
            "Amit has been a **Custom Software Engineering Analyst at Accenture** since Feb 2022. \
             He specializes in L2/L3 support, Azure-to-AWS migrations, and automation.",
        ),
        ScriptedTopic::new(
            &["project"],
            "Key projects include the **Retail Inventory System** (End-to-end .NET jobs), \
             **Enterprise Sales Portal** (Oracle/SAP integration), and a **SharePoint Automation \
             Utility**.",
        ),
        ScriptedTopic::new(
            &["contact", "email", "reach"],
            "You can reach Amit at **amitwankhede39@gmail.com**.",
        ),
    ]
}

const DEFAULT_ASSISTANT_CONTEXT: &str = r#"
You are the AI Assistant for Amit Wankhede's portfolio. You represent Amit, a Custom Software Engineering Analyst.
Your tone is professional, humble, confident, and reliable.

Key Details about Amit:
- Role: Custom Software Engineering Analyst at Accenture (Feb 2022 - Present).
- Focus: Application Support (L2/L3), Stability, Automation, .NET Development.
- Tech Stack: ASP.NET MVC, C# .NET, SQL Server, Oracle PL/SQL, HTML/CSS.
- Tools: Automic (Batch Monitoring), ServiceNow, Jira, WinSCP, Excel.
- Key Projects:
    1. Retail Inventory System: Built Inbound/Outbound jobs, ASP.NET MVC UI, MS SQL backend.
    2. Enterprise Sales Portal: Maintained ASP.NET app + Oracle DB, connected to SAP. Did RCA.
    3. SharePoint Utility: Built C# automation tool for file uploads.
- Achievements: Accenture Pinnacle Award "Rising Star" (2023), 30% reduction in manual effort via automation.
- Philosophy: "I turn complex problems into quiet mornings." (Stability focused).
- Contact: amitwankhede39@gmail.com.

Instructions:
- Answer questions based on this context.
- Keep answers concise (under 3 sentences usually).
- Be helpful and encouraging about hiring Amit.
- If asked about something not here, say you don't have that specific info but suggest contacting Amit.
"#;

/// DOM hooks of the chat widget
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatElements {
    pub toggle_button: String,
    pub window: String,
    pub close_button: String,
    pub form: String,
    pub input: String,
    pub messages: String,
    /// CSS selector for one-click question buttons
    pub quick_actions: String,
}

impl Default for ChatElements {
    fn default() -> Self {
        Self {
            toggle_button: "ai-toggle-btn".to_string(),
            window: "ai-chat-window".to_string(),
            close_button: "ai-close-btn".to_string(),
            form: "chat-form".to_string(),
            input: "chat-input".to_string(),
            messages: "chat-messages".to_string(),
            quick_actions: ".quick-action".to_string(),
        }
    }
}
