//! The three prompt flows behind the workflow page.
//!
//! Each flow validates its input, renders a prompt, makes exactly one model
//! call and maps whatever goes wrong to a [`FlowError`] the page can show.

use log::{error, info};
use serde::de::DeserializeOwned;

mod equation;
mod experiments;
mod gemini;
mod hypothesis;
mod model;
mod validate;

pub use equation::{EquationInput, EquationOutput};
pub use experiments::{Experiment, ExperimentsInput, ExperimentsOutput};
pub use gemini::GeminiModel;
pub use hypothesis::{HypothesisInput, HypothesisOutput};
pub use model::{ModelError, ModelResult, PromptModel, PromptRequest};
pub use validate::{Validate, Validator};

use crate::error::FlowError;

const GENERATE_HYPOTHESIS: &str = "generate hypothesis";
const DERIVE_EQUATION: &str = "derive equation";
const SUGGEST_EXPERIMENTS: &str = "suggest experiment";

/// Proposes a hypothesis from the user's domain context.
pub async fn generate_hypothesis<M: PromptModel + ?Sized>(
	model: &M,
	input: &HypothesisInput,
) -> Result<HypothesisOutput, FlowError> {
	input.validate()?;
	let request = PromptRequest {
		name: "generateHypothesis",
		prompt: input.prompt(),
	};
	call(model, &request, GENERATE_HYPOTHESIS, |_: &HypothesisOutput| Ok(())).await
}

/// Derives an equation for a hypothesis and scores it against the data.
pub async fn derive_equation<M: PromptModel + ?Sized>(
	model: &M,
	input: &EquationInput,
) -> Result<EquationOutput, FlowError> {
	input.validate()?;
	let request = PromptRequest {
		name: "deriveEquation",
		prompt: input.prompt(),
	};
	call(model, &request, DERIVE_EQUATION, EquationOutput::check).await
}

pub async fn suggest_experiments<M: PromptModel + ?Sized>(
	model: &M,
	input: &ExperimentsInput,
) -> Result<ExperimentsOutput, FlowError> {
	input.validate()?;
	let request = PromptRequest {
		name: "suggestExperiments",
		prompt: input.prompt(),
	};
	call(model, &request, SUGGEST_EXPERIMENTS, |_: &ExperimentsOutput| Ok(())).await
}

async fn call<M, T>(
	model: &M,
	request: &PromptRequest,
	action: &'static str,
	check: impl Fn(&T) -> Result<(), String>,
) -> Result<T, FlowError>
where
	M: PromptModel + ?Sized,
	T: DeserializeOwned,
{
	let failed = FlowError::Failed { action };

	let payload = model.generate(request).await.map_err(|e| {
		error!("Error trying to {action}: {e}");
		failed.clone()
	})?;

	let output: T = serde_json::from_value(payload).map_err(|e| {
		error!("Error trying to {action}: unexpected payload: {e}");
		failed.clone()
	})?;

	check(&output).map_err(|e| {
		error!("Error trying to {action}: {e}");
		failed
	})?;

	info!("{} finished", request.name);
	Ok(output)
}
