use leptos::prelude::*;
use leptos_router::components::A;

#[component]
pub fn AppHeader() -> impl IntoView {
	view! {
		<header class="app-header">
			<A href="/" attr:class="brand">
				"LawFinder AI"
			</A>
			<nav>
				<A href="/">"Workflow"</A>
				<A href="/simulation">"Simulation"</A>
			</nav>
		</header>
	}
}
