use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::validate::{Validate, Validator};
use crate::error::FlowError;

/// A hypothesis plus the data its equation must fit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquationInput {
	/// Hypothesis the equation should express.
	pub hypothesis: String,
	/// Data the equation should fit.
	pub experimental_data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquationOutput {
	pub equation: String,
	/// Fit against the experimental data, in [0, 1].
	pub accuracy: f64,
	/// Free-form extras such as `r_squared` or `p_value`.
	#[serde(default)]
	pub metrics: BTreeMap<String, Value>,
}

impl Validate for EquationInput {
	fn validate(&self) -> Result<(), FlowError> {
		Validator::new()
			.min_chars("hypothesis", &self.hypothesis, 1, "Hypothesis cannot be empty.")
			.min_chars(
				"experimentalData",
				&self.experimental_data,
				10,
				"Please provide some experimental data to derive the equation.",
			)
			.finish()
	}
}

impl EquationInput {
	pub(crate) fn prompt(&self) -> String {
		format!(
			"You are a mathematical physicist. Derive a candidate equation that expresses \
			 the hypothesis below and fits the experimental data.\n\
			 \n\
			 Hypothesis: {}\n\
			 Experimental data: {}\n\
			 \n\
			 Write the equation in a form suitable for symbolic manipulation. Score how well \
			 it fits the data as an accuracy between 0 and 1, and report supporting metrics \
			 such as r_squared or p_value.\n\
			 Reply with a JSON object: {{\"equation\": string, \"accuracy\": number, \
			 \"metrics\": object}}.",
			self.hypothesis, self.experimental_data,
		)
	}
}

impl EquationOutput {
	/// Rejects payloads that parsed but break the output contract.
	pub(crate) fn check(&self) -> Result<(), String> {
		if !(0.0..=1.0).contains(&self.accuracy) {
			return Err(format!("accuracy {} outside [0, 1]", self.accuracy));
		}
		if self.equation.trim().is_empty() {
			return Err("empty equation".into());
		}
		Ok(())
	}

	/// Accuracy as a percentage with two decimals.
	pub fn accuracy_percent(&self) -> String {
		format!("{:.2}%", self.accuracy * 100.0)
	}

	/// Metrics ready for display: underscores become spaces and strings
	/// lose their quotes.
	pub fn metric_rows(&self) -> Vec<(String, String)> {
		self.metrics
			.iter()
			.map(|(key, value)| {
				let value = match value {
					Value::String(s) => s.clone(),
					other => other.to_string(),
				};
				(key.replace('_', " "), value)
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn output(accuracy: f64) -> EquationOutput {
		serde_json::from_value(json!({
			"equation": "F = m * a",
			"accuracy": accuracy,
			"metrics": { "r_squared": 0.98, "p_value": "< 0.001", "samples": 120 }
		}))
		.unwrap()
	}

	#[test]
	fn accuracy_must_be_a_fraction() {
		assert!(output(0.0).check().is_ok());
		assert!(output(1.0).check().is_ok());
		assert!(output(1.2).check().is_err());
		assert!(output(-0.1).check().is_err());
	}

	#[test]
	fn display_helpers_format_metrics() {
		let out = output(0.9731);
		assert_eq!(out.accuracy_percent(), "97.31%");
		assert_eq!(
			out.metric_rows(),
			vec![
				("p value".to_string(), "< 0.001".to_string()),
				("r squared".to_string(), "0.98".to_string()),
				("samples".to_string(), "120".to_string()),
			]
		);
	}

	#[test]
	fn metrics_are_optional_on_the_wire() {
		let out: EquationOutput =
			serde_json::from_value(json!({ "equation": "E = m c^2", "accuracy": 0.5 })).unwrap();
		assert!(out.metrics.is_empty());
	}
}
