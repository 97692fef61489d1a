use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::debug;

use super::field_message::FieldMessage;
use super::suggested_experiments::spawn_suggest_experiments;
use crate::error::{FieldError, FlowError};
use crate::flows::{EquationInput, GeminiModel, Validate, derive_equation};
use crate::workflow::{Completion, Step, Workflow};

/// Step 2. A derived equation immediately triggers the experiments step.
#[component]
pub fn EquationForm(model: GeminiModel, workflow: RwSignal<Workflow>) -> impl IntoView {
	let experimental_data = RwSignal::new(String::new());
	let errors = RwSignal::new(Vec::<FieldError>::new());
	let busy = move || workflow.with(|w| w.is_busy(Step::Equation));

	let on_submit = move |ev: SubmitEvent| {
		ev.prevent_default();
		let hypothesis = workflow
			.with_untracked(|w| w.hypothesis().map(|h| h.hypothesis.clone()))
			.unwrap_or_default();
		let input = EquationInput {
			hypothesis,
			experimental_data: experimental_data.get_untracked(),
		};
		if let Err(FlowError::Invalid(list)) = input.validate() {
			errors.set(list);
			return;
		}
		errors.set(Vec::new());

		let mut ticket = None;
		workflow.update(|w| ticket = w.begin(Step::Equation).ok());
		let Some(ticket) = ticket else {
			debug!("Equation step not ready");
			return;
		};

		let model = model.clone();
		spawn_local(async move {
			let outcome = derive_equation(&model, &input).await;
			let succeeded = outcome.is_ok();
			let mut applied = false;
			workflow.update(|w| applied = w.complete_equation(ticket, outcome) == Completion::Applied);
			if applied && succeeded {
				spawn_suggest_experiments(model, workflow);
			}
		});
	};

	view! {
		<form class="step-form" on:submit=on_submit>
			<label>
				"Experimental Data"
				<textarea
					class="tall"
					placeholder="Paste or describe available experimental data..."
					prop:value=move || experimental_data.get()
					on:input=move |ev| experimental_data.set(event_target_value(&ev))
				/>
			</label>
			<FieldMessage errors=errors field="experimentalData" />
			<FieldMessage errors=errors field="hypothesis" />
			<button type="submit" disabled=busy>
				{move || if busy() { "Deriving..." } else { "Derive Equation" }}
			</button>
		</form>
	}
}
