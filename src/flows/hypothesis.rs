use serde::{Deserialize, Serialize};

use super::validate::{Validate, Validator};
use crate::error::FlowError;

/// Context for the hypothesis step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HypothesisInput {
	/// Area of physics, e.g. "Quantum Mechanics".
	pub physics_domain: String,
	/// Summary of theories already established in the domain.
	pub existing_theories: String,
	/// Description of the data available.
	pub experimental_data: String,
	/// Entities and relationships pulled from the literature graph.
	pub knowledge_graph_facts: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HypothesisOutput {
	pub hypothesis: String,
	pub rationale: String,
}

impl Validate for HypothesisInput {
	fn validate(&self) -> Result<(), FlowError> {
		Validator::new()
			.min_chars(
				"physicsDomain",
				&self.physics_domain,
				3,
				"Physics domain must be at least 3 characters.",
			)
			.min_chars(
				"existingTheories",
				&self.existing_theories,
				10,
				"Please provide some existing theories.",
			)
			.min_chars(
				"experimentalData",
				&self.experimental_data,
				10,
				"Please provide some experimental data.",
			)
			.min_chars(
				"knowledgeGraphFacts",
				&self.knowledge_graph_facts,
				10,
				"Please provide some knowledge graph facts.",
			)
			.finish()
	}
}

impl HypothesisInput {
	pub(crate) fn prompt(&self) -> String {
		format!(
			"You are a research assistant proposing new hypotheses in physics.\n\
			 \n\
			 Using the context below, propose one novel, testable hypothesis and explain \
			 the reasoning that leads to it. Aim at gaps the existing theories leave open.\n\
			 \n\
			 Physics domain: {}\n\
			 Existing theories: {}\n\
			 Experimental data: {}\n\
			 Knowledge graph facts: {}\n\
			 \n\
			 Reply with a JSON object: {{\"hypothesis\": string, \"rationale\": string}}.",
			self.physics_domain,
			self.existing_theories,
			self.experimental_data,
			self.knowledge_graph_facts,
		)
	}
}
