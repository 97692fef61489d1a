use leptos::prelude::*;
use leptos::task::spawn_local;
use log::debug;

use crate::flows::{ExperimentsInput, ExperimentsOutput, GeminiModel, suggest_experiments};
use crate::workflow::{Step, Workflow};

#[component]
pub fn SuggestedExperiments(output: ExperimentsOutput) -> impl IntoView {
	view! {
		<div class="experiments">
			{output
				.suggested_experiments
				.into_iter()
				.enumerate()
				.map(|(i, experiment)| {
					view! {
						<details class="experiment">
							<summary>{format!("{}. {}", i + 1, experiment.name)}</summary>
							<p class="pre-wrap">{experiment.description}</p>
						</details>
					}
				})
				.collect_view()}
		</div>
	}
}

/// Kicks off the experiments step for the current hypothesis and equation.
pub fn spawn_suggest_experiments(model: GeminiModel, workflow: RwSignal<Workflow>) {
	let input = workflow.with_untracked(|w| {
		Some(ExperimentsInput {
			hypothesis: w.hypothesis()?.hypothesis.clone(),
			equation: w.equation()?.equation.clone(),
		})
	});
	let Some(input) = input else {
		return;
	};

	let mut ticket = None;
	workflow.update(|w| ticket = w.begin(Step::Experiments).ok());
	let Some(ticket) = ticket else {
		debug!("Experiments step not ready");
		return;
	};

	spawn_local(async move {
		let outcome = suggest_experiments(&model, &input).await;
		workflow.update(|w| {
			w.complete_experiments(ticket, outcome);
		});
	});
}
