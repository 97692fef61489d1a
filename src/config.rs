//! Application configuration.
//!
//! The client has no filesystem, so configuration arrives as JSON in a
//! `<meta name="lawfinder-config" content="...">` tag of the host page.
//! Every section falls back to defaults when absent.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::components::knowledge_graph::ForceConfig;
use crate::error::ConfigError;

const CONFIG_META: &str = "meta[name=\"lawfinder-config\"]";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
	/// Prompt model used by the workflow page.
	pub model: ModelConfig,
	/// Knowledge graph layout constants.
	pub layout: ForceConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
	/// Base URL of the Generative Language API.
	pub endpoint: String,
	/// Model id, e.g. "gemini-2.0-flash".
	pub model: String,
	/// API key. Defaults to `LAWFINDER_API_KEY` at build time.
	pub api_key: Option<String>,
	pub temperature: f32,
}

impl Default for ModelConfig {
	fn default() -> Self {
		Self {
			endpoint: "https://generativelanguage.googleapis.com/v1beta".into(),
			model: "gemini-2.0-flash".into(),
			api_key: option_env!("LAWFINDER_API_KEY").map(String::from),
			temperature: 0.7,
		}
	}
}

impl AppConfig {
	pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
		let config: Self = serde_json::from_str(raw)?;
		config.layout.validate()?;
		Ok(config)
	}

	/// Reads the host page's config tag, falling back to defaults.
	pub fn load() -> Self {
		let Some(raw) = read_meta_config() else {
			debug!("No config tag found, using defaults");
			return Self::default();
		};
		Self::from_json(&raw).unwrap_or_else(|e| {
			warn!("Ignoring config tag: {e}");
			Self::default()
		})
	}
}

fn read_meta_config() -> Option<String> {
	let document = web_sys::window()?.document()?;
	let meta = document.query_selector(CONFIG_META).ok()??;
	meta.get_attribute("content").filter(|c| !c.trim().is_empty())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_config_keeps_other_defaults() {
		let cfg = AppConfig::from_json(
			r#"{ "model": { "model": "gemini-1.5-pro", "api_key": "k" }, "layout": { "link_distance": 80.0 } }"#,
		)
		.unwrap();

		assert_eq!(cfg.model.model, "gemini-1.5-pro");
		assert_eq!(cfg.model.api_key.as_deref(), Some("k"));
		assert_eq!(cfg.model.endpoint, ModelConfig::default().endpoint);
		assert_eq!(cfg.layout.link_distance, 80.0);
		assert_eq!(cfg.layout.cooling_rate, ForceConfig::default().cooling_rate);
	}

	#[test]
	fn empty_object_is_all_defaults() {
		let cfg = AppConfig::from_json("{}").unwrap();
		assert_eq!(cfg.model, ModelConfig::default());
		assert_eq!(cfg.layout, ForceConfig::default());
	}

	#[test]
	fn layout_that_never_settles_is_rejected() {
		let err = AppConfig::from_json(r#"{ "layout": { "cooling_rate": 1.0 } }"#).unwrap_err();
		assert!(matches!(
			err,
			ConfigError::OutOfRange {
				field: "cooling_rate",
				..
			}
		));
		assert_eq!(err.to_string(), "layout.cooling_rate must be in (0, 1), got 1");

		assert!(AppConfig::from_json(r#"{ "layout": { "cooling_rate": 1.3 } }"#).is_err());
		assert!(AppConfig::from_json(r#"{ "layout": { "alpha_min": -0.1 } }"#).is_err());
		assert!(AppConfig::from_json(r#"{ "layout": { "velocity_decay": 2.0 } }"#).is_err());
	}

	#[test]
	fn malformed_config_is_an_error() {
		assert!(matches!(
			AppConfig::from_json(r#"{ "model": 3 }"#),
			Err(ConfigError::Parse(_))
		));
	}
}
