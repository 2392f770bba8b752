//! Optional cloud text-assist client
//!
//! One-shot text transformations over an OpenAI-compatible chat-completion
//! endpoint. The client is stateless; replies are returned to the caller and
//! never persisted. Callers get a plain string in every case — the model
//! reply, or a human-readable message when the service is unconfigured or
//! unreachable — so no separate error branch is needed.

use reqwest::{Client, Request, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const ENV_ASSIST_API_KEY: &str = "OPENAI_API_KEY";
const ENV_ASSIST_MODEL: &str = "OPENAI_ASSIST_MODEL";
const ENV_ASSIST_BASE_URL: &str = "OPENAI_BASE_URL";

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Text transformations offered by the assistant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssistAction {
    /// Fix grammar and spelling
    Grammar,
    /// Condense the text
    Summarize,
    /// Extract the main keywords
    Keywords,
    /// Add detail and description
    Expand,
    /// Rewrite for a general audience
    Simplify,
}

impl AssistAction {
    /// Instruction prompt sent for this action
    fn prompt(self, text: &str) -> String {
        match self {
            Self::Grammar => format!(
                "Correct any grammar and spelling mistakes in the following text. Only return the corrected text, without any preamble or explanation.\n\nText: \"{text}\""
            ),
            Self::Summarize => format!(
                "Summarize the following text concisely. Only return the summary.\n\nText: \"{text}\""
            ),
            Self::Keywords => format!(
                "Extract the main keywords from the following text. Return them as a comma-separated list. Only return the list.\n\nText: \"{text}\""
            ),
            Self::Expand => format!(
                "Expand on the following text, adding more detail and making it more descriptive. Only return the expanded text.\n\nText: \"{text}\""
            ),
            Self::Simplify => format!(
                "Simplify the following text to make it easier to read for a general audience. Only return the simplified text.\n\nText: \"{text}\""
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum AssistMode {
    Disabled,
    OpenAi {
        base_url: String,
        api_key: String,
        model: String,
    },
}

/// Errors from assist configuration and requests
#[derive(Debug, Error)]
pub enum AssistError {
    #[error("The assistant is not configured. Set OPENAI_API_KEY to enable it.")]
    NotConfigured,
    #[error("Invalid assist configuration: {0}")]
    InvalidConfiguration(&'static str),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Assist API error: {0}")]
    Api(String),
}

type AssistResult<T> = Result<T, AssistError>;

/// Stateless client for one-shot text transformations
#[derive(Clone)]
pub struct AssistClient {
    client: Client,
    mode: AssistMode,
}

impl AssistClient {
    /// Build the client from environment configuration
    ///
    /// Without `OPENAI_API_KEY` the client starts in disabled mode and every
    /// call reports the missing configuration in its reply text.
    pub fn from_env() -> AssistResult<Self> {
        let api_key = std::env::var(ENV_ASSIST_API_KEY)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        let mode = if let Some(api_key) = api_key {
            let base_url = std::env::var(ENV_ASSIST_BASE_URL)
                .ok()
                .map(|value| value.trim().trim_end_matches('/').to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

            if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
                return Err(AssistError::InvalidConfiguration(
                    "OPENAI_BASE_URL must start with http:// or https://",
                ));
            }

            let model = std::env::var(ENV_ASSIST_MODEL)
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string());

            AssistMode::OpenAi {
                base_url,
                api_key,
                model,
            }
        } else {
            AssistMode::Disabled
        };

        Ok(Self {
            client: Client::builder().build()?,
            mode,
        })
    }

    /// Whether a credential is configured
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !matches!(self.mode, AssistMode::Disabled)
    }

    /// Run one assist action over the given text
    ///
    /// The reply — or a readable failure message — comes back as plain text.
    pub async fn run(&self, action: AssistAction, text: &str) -> String {
        match self.complete(action, text).await {
            Ok(reply) => reply,
            Err(error @ AssistError::NotConfigured) => error.to_string(),
            Err(error) => format!("Error interacting with the assistant: {error}"),
        }
    }

    async fn complete(&self, action: AssistAction, text: &str) -> AssistResult<String> {
        let request = self.build_completion_request(action, text)?;
        let response = self.client.execute(request).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(AssistError::Api(
                "Unauthorized assist request (check the configured API key)".to_string(),
            ));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AssistError::Api(format!(
                "Assist request failed with {status}: {body}"
            )));
        }

        let payload: ChatCompletionResponse = response.json().await?;
        let reply = payload
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default();
        Ok(reply.trim().to_string())
    }

    fn build_completion_request(
        &self,
        action: AssistAction,
        text: &str,
    ) -> AssistResult<Request> {
        let (base_url, api_key, model) = match &self.mode {
            AssistMode::Disabled => return Err(AssistError::NotConfigured),
            AssistMode::OpenAi {
                base_url,
                api_key,
                model,
            } => (base_url, api_key, model),
        };

        let endpoint = format!("{base_url}/v1/chat/completions");
        let body = ChatCompletionRequest {
            model: model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: action.prompt(text),
            }],
        };

        self.client
            .post(endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .build()
            .map_err(AssistError::Http)
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ChatReplyMessage {
    content: String,
}
