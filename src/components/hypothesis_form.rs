use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::debug;

use super::field_message::FieldMessage;
use crate::error::{FieldError, FlowError};
use crate::flows::{GeminiModel, HypothesisInput, Validate, generate_hypothesis};
use crate::workflow::{Completion, Step, Workflow};

/// Step 1. Submitting clears every downstream result.
#[component]
pub fn HypothesisForm(model: GeminiModel, workflow: RwSignal<Workflow>) -> impl IntoView {
	let physics_domain = RwSignal::new(String::new());
	let existing_theories = RwSignal::new(String::new());
	let experimental_data = RwSignal::new(String::new());
	let knowledge_graph_facts = RwSignal::new(String::new());
	let errors = RwSignal::new(Vec::<FieldError>::new());
	let busy = move || workflow.with(|w| w.is_busy(Step::Hypothesis));

	let on_submit = move |ev: SubmitEvent| {
		ev.prevent_default();
		let input = HypothesisInput {
			physics_domain: physics_domain.get_untracked(),
			existing_theories: existing_theories.get_untracked(),
			experimental_data: experimental_data.get_untracked(),
			knowledge_graph_facts: knowledge_graph_facts.get_untracked(),
		};
		if let Err(FlowError::Invalid(list)) = input.validate() {
			errors.set(list);
			return;
		}
		errors.set(Vec::new());

		let mut ticket = None;
		workflow.update(|w| ticket = w.begin(Step::Hypothesis).ok());
		let Some(ticket) = ticket else {
			debug!("Hypothesis step busy");
			return;
		};

		let model = model.clone();
		spawn_local(async move {
			let outcome = generate_hypothesis(&model, &input).await;
			let succeeded = outcome.is_ok();
			let mut applied = false;
			workflow.update(|w| applied = w.complete_hypothesis(ticket, outcome) == Completion::Applied);
			if applied && succeeded {
				for field in [physics_domain, existing_theories, experimental_data, knowledge_graph_facts] {
					field.set(String::new());
				}
			}
		});
	};

	view! {
		<form class="step-form" on:submit=on_submit>
			<label>
				"Physics Domain"
				<input
					type="text"
					placeholder="e.g., Quantum Mechanics, Astrophysics"
					prop:value=move || physics_domain.get()
					on:input=move |ev| physics_domain.set(event_target_value(&ev))
				/>
			</label>
			<FieldMessage errors=errors field="physicsDomain" />
			<label>
				"Existing Theories"
				<textarea
					placeholder="Summarize relevant existing theories..."
					prop:value=move || existing_theories.get()
					on:input=move |ev| existing_theories.set(event_target_value(&ev))
				/>
			</label>
			<FieldMessage errors=errors field="existingTheories" />
			<label>
				"Experimental Data"
				<textarea
					placeholder="Describe available experimental data..."
					prop:value=move || experimental_data.get()
					on:input=move |ev| experimental_data.set(event_target_value(&ev))
				/>
			</label>
			<FieldMessage errors=errors field="experimentalData" />
			<label>
				"Knowledge Graph Facts"
				<textarea
					placeholder="Provide facts from knowledge graphs..."
					prop:value=move || knowledge_graph_facts.get()
					on:input=move |ev| knowledge_graph_facts.set(event_target_value(&ev))
				/>
			</label>
			<FieldMessage errors=errors field="knowledgeGraphFacts" />
			<button type="submit" disabled=busy>
				{move || if busy() { "Generating..." } else { "Generate Hypothesis" }}
			</button>
		</form>
	}
}
