use leptos::prelude::*;

use crate::components::app_header::AppHeader;
use crate::components::equation_form::EquationForm;
use crate::components::hypothesis_form::HypothesisForm;
use crate::components::results_display::ResultsDisplay;
use crate::components::suggested_experiments::SuggestedExperiments;
use crate::config::AppConfig;
use crate::flows::GeminiModel;
use crate::workflow::{NoticeKind, Step, Workflow};

/// The three-step workflow page.
#[component]
pub fn Home() -> impl IntoView {
	let config = AppConfig::load();
	let model = GeminiModel::new(config.model);
	let workflow = RwSignal::new(Workflow::new());

	// memos, so the step cards are only rebuilt when they appear or disappear
	let has_hypothesis = Memo::new(move |_| workflow.with(|w| w.has_result(Step::Hypothesis)));
	let equation_model = model.clone();

	let notice = move || {
		workflow.with(|w| w.notice().cloned()).map(|n| {
			let class = match n.kind {
				NoticeKind::Success => "notice success",
				NoticeKind::Error => "notice error",
			};
			view! {
				<div class=class role="status">
					<strong>{n.title}</strong>
					<span>{n.message}</span>
					<button on:click=move |_| workflow.update(|w| w.dismiss_notice())>"×"</button>
				</div>
			}
		})
	};

	let hypothesis_result = move || {
		workflow.with(|w| {
			if w.is_busy(Step::Hypothesis) {
				view! { <p class="loading">"Generating hypothesis..."</p> }.into_any()
			} else if let Some(h) = w.hypothesis() {
				view! {
					<div>
						<p class="headline">{h.hypothesis.clone()}</p>
						<p class="muted">{h.rationale.clone()}</p>
					</div>
				}
				.into_any()
			} else {
				view! { <p class="muted">"Your generated hypothesis will appear here."</p> }
					.into_any()
			}
		})
	};

	let equation_result = move || {
		workflow.with(|w| {
			if w.is_busy(Step::Equation) {
				view! { <p class="loading">"Deriving equation..."</p> }.into_any()
			} else if let Some(eq) = w.equation() {
				view! { <ResultsDisplay output=eq.clone() /> }.into_any()
			} else {
				view! {
					<p class="muted">"Your derived equation and its metrics will appear here."</p>
				}
				.into_any()
			}
		})
	};

	let experiments_result = move || {
		workflow.with(|w| {
			if w.is_busy(Step::Experiments) {
				view! { <p class="loading">"Designing experiments..."</p> }.into_any()
			} else if let Some(exp) = w.experiments() {
				view! { <SuggestedExperiments output=exp.clone() /> }.into_any()
			} else {
				view! {
					<p class="muted">
						"Suggested experiments to validate your findings will appear here."
					</p>
				}
				.into_any()
			}
		})
	};

	let show_experiments = Memo::new(move |_| {
		workflow.with(|w| w.has_result(Step::Equation) || w.is_busy(Step::Experiments))
	});

	view! {
		<AppHeader />
		<main class="container">
			<div class="intro">
				<h1>"LawFinder AI"</h1>
				<p class="muted">
					"Generate novel scientific hypotheses and derive mathematical equations from complex data."
				</p>
			</div>
			{notice}
			<div class="grid two">
				<div class="column">
					<section class="card">
						<h2>"Step 1: Generate a Hypothesis"</h2>
						<p class="muted">
							"Provide context from physics literature, theories, and data."
						</p>
						<HypothesisForm model=model workflow=workflow />
					</section>
					{move || {
						has_hypothesis
							.get()
							.then(|| {
								view! {
									<section class="card">
										<h2>"Step 2: Derive an Equation"</h2>
										<p class="muted">
											"Use the hypothesis and experimental data to derive a candidate equation."
										</p>
										<EquationForm model=equation_model.clone() workflow=workflow />
									</section>
								}
							})
					}}
				</div>
				<div class="column">
					<section class="card">
						<h2>"Result: Your Hypothesis"</h2>
						{hypothesis_result}
					</section>
					{move || {
						has_hypothesis
							.get()
							.then(|| {
								view! {
									<section class="card">
										<h2>"Result: Derived Equation"</h2>
										{equation_result}
									</section>
								}
							})
					}}
					{move || {
						show_experiments
							.get()
							.then(|| {
								view! {
									<section class="card">
										<h2>"Step 3: Suggested Next Experiments"</h2>
										{experiments_result}
									</section>
								}
							})
					}}
				</div>
			</div>
		</main>
		<footer class="footer">
			<p class="muted">"Built for the modern researcher. LawFinder AI."</p>
		</footer>
	}
}
