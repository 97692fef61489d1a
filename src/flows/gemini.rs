//! Gemini `generateContent` client

use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::model::{ModelError, ModelResult, PromptModel, PromptRequest};
use crate::config::ModelConfig;

#[derive(Clone, Debug)]
pub struct GeminiModel {
	client: Client,
	config: ModelConfig,
}

impl GeminiModel {
	pub fn new(config: ModelConfig) -> Self {
		Self {
			client: Client::new(),
			config,
		}
	}

	fn url(&self) -> String {
		format!(
			"{}/models/{}:generateContent",
			self.config.endpoint.trim_end_matches('/'),
			self.config.model
		)
	}
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
	contents: Vec<Content<'a>>,
	generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
	role: &'static str,
	parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
	text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
	response_mime_type: &'static str,
	temperature: f32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateResponse {
	#[serde(default)]
	candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
	content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
	#[serde(default)]
	parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
	text: Option<String>,
}

#[async_trait::async_trait(?Send)]
impl PromptModel for GeminiModel {
	async fn generate(&self, request: &PromptRequest) -> ModelResult<Value> {
		let api_key = self
			.config
			.api_key
			.as_deref()
			.filter(|k| !k.is_empty())
			.ok_or(ModelError::MissingApiKey)?;

		let body = GenerateRequest {
			contents: vec![Content {
				role: "user",
				parts: vec![RequestPart {
					text: &request.prompt,
				}],
			}],
			generation_config: GenerationConfig {
				response_mime_type: "application/json",
				temperature: self.config.temperature,
			},
		};

		debug!("Gemini request: flow={} model={}", request.name, self.config.model);

		let response = self
			.client
			.post(self.url())
			.header("x-goog-api-key", api_key)
			.json(&body)
			.send()
			.await?;

		let status = response.status();
		if !status.is_success() {
			let error_text = response.text().await.unwrap_or_default();
			error!("Gemini error {}: {}", status, error_text);
			return Err(match status.as_u16() {
				401 | 403 => ModelError::AuthFailed(error_text),
				429 => ModelError::RateLimited,
				_ => ModelError::RequestFailed(format!("{status}: {error_text}")),
			});
		}

		let parsed: GenerateResponse = response.json().await?;
		extract_payload(parsed)
	}
}

/// Pulls the JSON document out of the first candidate's text.
pub(crate) fn extract_payload(response: GenerateResponse) -> ModelResult<Value> {
	let text: String = response
		.candidates
		.into_iter()
		.next()
		.and_then(|c| c.content)
		.map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
		.ok_or_else(|| ModelError::InvalidResponse("no candidates".into()))?;

	serde_json::from_str(strip_code_fence(&text))
		.map_err(|e| ModelError::InvalidResponse(format!("payload is not JSON: {e}")))
}

fn strip_code_fence(text: &str) -> &str {
	let trimmed = text.trim();
	let Some(rest) = trimmed.strip_prefix("```") else {
		return trimmed;
	};
	let body = rest.strip_prefix("json").unwrap_or(rest);
	body.strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn response(raw: Value) -> GenerateResponse {
		serde_json::from_value(raw).unwrap()
	}

	#[test]
	fn payload_comes_from_first_candidate() {
		let resp = response(json!({
			"candidates": [
				{ "content": { "parts": [{ "text": "{\"hypothesis\": \"h\"," }, { "text": "\"rationale\": \"r\"}" }] } },
				{ "content": { "parts": [{ "text": "{}" }] } }
			]
		}));
		assert_eq!(
			extract_payload(resp).unwrap(),
			json!({ "hypothesis": "h", "rationale": "r" })
		);
	}

	#[test]
	fn fenced_payload_is_accepted() {
		let resp = response(json!({
			"candidates": [{ "content": { "parts": [{ "text": "```json\n{\"equation\": \"F = m a\"}\n```" }] } }]
		}));
		assert_eq!(extract_payload(resp).unwrap(), json!({ "equation": "F = m a" }));
	}

	#[test]
	fn missing_candidates_or_prose_is_invalid() {
		assert!(matches!(
			extract_payload(response(json!({}))),
			Err(ModelError::InvalidResponse(_))
		));
		assert!(matches!(
			extract_payload(response(json!({ "candidates": [{}] }))),
			Err(ModelError::InvalidResponse(_))
		));
		assert!(matches!(
			extract_payload(response(json!({
				"candidates": [{ "content": { "parts": [{ "text": "Sure! Here is an equation." }] } }]
			}))),
			Err(ModelError::InvalidResponse(_))
		));
	}

	#[test]
	fn url_joins_endpoint_and_model() {
		let model = GeminiModel::new(ModelConfig {
			endpoint: "https://example.test/v1beta/".into(),
			model: "gemini-2.0-flash".into(),
			api_key: None,
			temperature: 0.2,
		});
		assert_eq!(
			model.url(),
			"https://example.test/v1beta/models/gemini-2.0-flash:generateContent"
		);
	}

	#[tokio::test]
	async fn missing_key_fails_before_any_request() {
		let model = GeminiModel::new(ModelConfig {
			api_key: None,
			..ModelConfig::default()
		});
		let request = PromptRequest {
			name: "test",
			prompt: "hello".into(),
		};
		assert!(matches!(
			model.generate(&request).await,
			Err(ModelError::MissingApiKey)
		));
	}
}
