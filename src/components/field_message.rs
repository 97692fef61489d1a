use leptos::prelude::*;

use crate::error::FieldError;

/// Validation message for one form control, if it has one.
#[component]
pub fn FieldMessage(errors: RwSignal<Vec<FieldError>>, field: &'static str) -> impl IntoView {
	move || {
		errors.with(|list| {
			list.iter()
				.find(|e| e.field == field)
				.map(|e| view! { <p class="field-error">{e.message}</p> })
		})
	}
}
