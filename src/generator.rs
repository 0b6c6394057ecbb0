//! Design plan generation through Gemini's `generateContent` endpoint.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::AppConfig;

/// Generated natural-language description of a home design.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct DesignPlan {
    /// Plan text, passed around untouched.
    pub text: String,
}

/// Why no design plan came back.
#[derive(Debug)]
pub enum DesignError {
    /// `GOOGLE_API_KEY` was not configured.
    MissingApiKey,
    /// The request never completed (connect, timeout, body read).
    Transport(reqwest::Error),
    /// The API answered with a non-success status.
    Api {
        /// HTTP status code
        status: u16,
        /// Message from the error body, or the raw body
        message: String,
    },
    /// The prompt was refused by the safety filter.
    Blocked(String),
    /// The body was not the JSON we expect.
    Malformed(serde_json::Error),
    /// The model answered with no text.
    EmptyResponse,
}

impl std::fmt::Display for DesignError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingApiKey => write!(f, "GOOGLE_API_KEY is not set"),
            Self::Transport(err) => write!(f, "Request to the generation service failed: {err}"),
            Self::Api { status, message } => write!(f, "{status} {message}"),
            Self::Blocked(reason) => write!(f, "Prompt blocked: {reason}"),
            Self::Malformed(err) => write!(f, "Failed to parse generation response: {err}"),
            Self::EmptyResponse => write!(f, "Unable to generate design."),
        }
    }
}

impl std::error::Error for DesignError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            Self::Malformed(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for DesignError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err)
    }
}

#[derive(Serialize, Debug)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize, Debug)]
struct Content<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize, Debug)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Debug)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
    #[serde(default)]
    block_reason_message: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize, Debug)]
struct ErrorBody {
    message: String,
}

impl GenerateContentResponse {
    fn into_text(self) -> Result<String, DesignError> {
        if let Some(feedback) = self.prompt_feedback
            && let Some(reason) = feedback.block_reason
        {
            return Err(DesignError::Blocked(
                feedback.block_reason_message.unwrap_or(reason),
            ));
        }

        let text = self
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(DesignError::EmptyResponse);
        }
        Ok(text)
    }
}

fn api_error(status: u16, body: &str) -> DesignError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    DesignError::Api { status, message }
}

/// Sends `prompt` to the configured Gemini model and returns the plan text.
///
/// One call, no retry. The client's timeout bounds the wait.
#[instrument(level = "debug", skip_all, fields(model = %config.model))]
pub async fn generate_design(
    client: &reqwest::Client,
    config: &AppConfig,
    prompt: &str,
) -> Result<DesignPlan, DesignError> {
    let api_key = config
        .google_api_key
        .as_deref()
        .ok_or(DesignError::MissingApiKey)?;

    let url = format!(
        "{}/v1beta/models/{}:generateContent",
        config.gemini_base_url, config.model
    );
    let body = GenerateContentRequest {
        contents: [Content {
            parts: [RequestPart { text: prompt }],
        }],
    };

    let response = client
        .post(&url)
        .header("x-goog-api-key", api_key)
        .json(&body)
        .send()
        .await?;

    let status = response.status();
    let bytes = response.bytes().await?;
    debug!("generateContent answered {} with {} bytes", status, bytes.len());
    if !status.is_success() {
        return Err(api_error(
            status.as_u16(),
            &String::from_utf8_lossy(&bytes),
        ));
    }

    let parsed: GenerateContentResponse =
        serde_json::from_slice(&bytes).map_err(DesignError::Malformed)?;
    let text = parsed.into_text()?;
    Ok(DesignPlan { text })
}
