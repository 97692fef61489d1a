use serde::{Deserialize, Serialize};

use super::validate::{Validate, Validator};
use crate::error::FlowError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperimentsInput {
	pub hypothesis: String,
	pub equation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
	pub name: String,
	/// Setup, procedure and expected outcome.
	pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentsOutput {
	pub suggested_experiments: Vec<Experiment>,
}

impl Validate for ExperimentsInput {
	fn validate(&self) -> Result<(), FlowError> {
		Validator::new()
			.min_chars("hypothesis", &self.hypothesis, 1, "Hypothesis cannot be empty.")
			.min_chars("equation", &self.equation, 1, "Equation cannot be empty.")
			.finish()
	}
}

impl ExperimentsInput {
	pub(crate) fn prompt(&self) -> String {
		format!(
			"You help physicists plan experiments. Propose the next experiments that would \
			 confirm or refute the hypothesis and equation below.\n\
			 \n\
			 Hypothesis: {}\n\
			 Equation: {}\n\
			 \n\
			 Give each experiment a short name and a description of its setup, procedure \
			 and expected outcome.\n\
			 Reply with a JSON object: {{\"suggestedExperiments\": [{{\"name\": string, \
			 \"description\": string}}]}}.",
			self.hypothesis, self.equation,
		)
	}
}
