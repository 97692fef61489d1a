//! Leptos client-side app wiring and routes.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Modules
mod components;
mod config;
mod discovery;
mod error;
mod flows;
mod pages;
mod workflow;

pub use components::knowledge_graph::{ForceConfig, KnowledgeGraphState, Point};
pub use discovery::seed_store;
pub use error::{FlowError, GraphError};
pub use flows::{
	EquationInput, HypothesisInput, ModelError, ModelResult, PromptModel, PromptRequest,
	derive_equation, generate_hypothesis,
};
pub use workflow::{Completion, NoticeKind, Step, Workflow};

// Top-Level pages
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;
use crate::pages::simulation::Simulation;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// An app router for the workflow page, the simulation and 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />

		// sets the document title
		<Title text="LawFinder AI" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
				<Route path=path!("/simulation") view=Simulation />
			</Routes>
		</Router>
	}
}
