use std::time::Duration;

use leptos::prelude::*;

use crate::discovery::reveal;

/// Shows `text` a character at a time, starting over whenever it changes.
#[component]
pub fn Typewriter(
	#[prop(into)] text: Signal<String>,
	#[prop(default = 18)] step_ms: u64,
) -> impl IntoView {
	let shown = RwSignal::new(0usize);

	Effect::new(move |_| {
		text.track();
		shown.set(0);
	});

	let handle = set_interval_with_handle(
		move || {
			let len = text.with_untracked(|t| t.chars().count());
			if shown.get_untracked() < len {
				shown.update(|n| *n += 1);
			}
		},
		Duration::from_millis(step_ms),
	)
	.ok();
	on_cleanup(move || {
		if let Some(handle) = handle {
			handle.clear();
		}
	});

	view! {
		<span class="typewriter">
			{move || text.with(|t| reveal(t, shown.get()).to_string())}
		</span>
	}
}
