//! Prompt model trait

use serde_json::Value;

/// Result of a model call.
pub type ModelResult<T> = Result<T, ModelError>;

/// Failures of the remote model call. Never shown to the user verbatim.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
	/// Nothing to authenticate with; no request was sent.
	#[error("no API key configured")]
	MissingApiKey,

	/// 401 or 403.
	#[error("authentication failed: {0}")]
	AuthFailed(String),

	/// 429.
	#[error("rate limited")]
	RateLimited,

	/// Any other non-success status.
	#[error("request failed: {0}")]
	RequestFailed(String),

	/// No candidate, or text that is not the expected JSON.
	#[error("invalid response: {0}")]
	InvalidResponse(String),

	/// Transport failure.
	#[error("network error: {0}")]
	Network(#[from] reqwest::Error),
}

/// A rendered prompt for one flow.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptRequest {
	/// Flow name, for logs.
	pub name: &'static str,
	/// Full prompt text.
	pub prompt: String,
}

/// The opaque remote model. Runs on the browser event loop, hence `?Send`.
#[async_trait::async_trait(?Send)]
pub trait PromptModel {
	/// Sends the prompt and returns the model's JSON payload.
	async fn generate(&self, request: &PromptRequest) -> ModelResult<Value>;
}
