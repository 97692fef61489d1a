use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use leptos::prelude::*;
use log::{error, warn};

use crate::components::app_header::AppHeader;
use crate::components::knowledge_graph::{
	GraphHandle, GraphStore, KnowledgeGraphCanvas, KnowledgeGraphState, Point,
};
use crate::components::typewriter::Typewriter;
use crate::config::AppConfig;
use crate::discovery::{
	DiscoveryError, DiscoveryRun, Integration, KeywordClassifier, SeededClassifier, Stage,
	seed_store,
};

const STAGE_DELAY: Duration = Duration::from_millis(2200);
const DEFAULT_OBSERVATION: &str =
	"Carts of different mass on an air track: doubling the pull doubled the acceleration, doubling the mass halved it.";

const STAGES: [Stage; 4] = [
	Stage::Hypothesis,
	Stage::Equation,
	Stage::Experiments,
	Stage::GraphUpdated,
];

fn initial_graph(config: &AppConfig) -> KnowledgeGraphState {
	let (width, height) = (800.0, 480.0);
	let store = seed_store(Point::new(width / 2.0, height / 2.0)).unwrap_or_else(|e| {
		error!("Seed graph rejected: {e}");
		GraphStore::new()
	});
	KnowledgeGraphState::new(store, config.layout.clone(), width, height)
}

/// One timer step: advances the run if it is still the one the timer was
/// armed for. `None` once a newer run started or the page has been torn
/// down and the signal disposed.
fn advance_current(
	run: RwSignal<DiscoveryRun>,
	graph: &GraphHandle,
	generation: u64,
) -> Option<Result<Stage, DiscoveryError>> {
	if run.try_with_untracked(|r| r.generation())? != generation {
		return None;
	}
	run.try_update(|r| r.advance(&mut graph.borrow_mut()))
}

/// Advances the run one stage after a pause, and keeps going until the
/// graph is updated.
fn schedule_advance(run: RwSignal<DiscoveryRun>, graph: GraphHandle, generation: u64) {
	set_timeout(
		move || match advance_current(run, &graph, generation) {
			Some(Ok(Stage::GraphUpdated)) | None => {}
			Some(Ok(_)) => schedule_advance(run, graph, generation),
			Some(Err(e)) => warn!("Discovery run stopped: {e}"),
		},
		STAGE_DELAY,
	);
}

fn text_of<F>(run: RwSignal<DiscoveryRun>, pick: F) -> Signal<String>
where
	F: Fn(&DiscoveryRun) -> Option<String> + Send + Sync + 'static,
{
	Signal::derive(move || run.with(|r| pick(r).unwrap_or_default()))
}

/// Scripted discovery loop over a live knowledge graph.
#[component]
pub fn Simulation() -> impl IntoView {
	let config = AppConfig::load();
	let graph: GraphHandle = Rc::new(RefCell::new(initial_graph(&config)));
	let classifier = Rc::new(RefCell::new(KeywordClassifier::new(SeededClassifier::new(
		js_sys::Date::now() as usize,
	))));
	let run = RwSignal::new(DiscoveryRun::new());
	let observation = RwSignal::new(DEFAULT_OBSERVATION.to_string());

	let graph_start = graph.clone();
	let on_start = move |_| {
		let text = observation.get_untracked();
		run.update(|r| {
			r.start(&text, &mut *classifier.borrow_mut());
		});
		let generation = run.with_untracked(|r| r.generation());
		schedule_advance(run, graph_start.clone(), generation);
	};

	let running = move || {
		run.with(|r| !matches!(r.stage(), Stage::Idle | Stage::GraphUpdated))
	};

	let stage_list = move || {
		let current = run.with(|r| r.stage());
		STAGES
			.into_iter()
			.map(|stage| {
				let class = if stage == current {
					"stage active"
				} else if stage < current {
					"stage done"
				} else {
					"stage"
				};
				view! { <li class=class>{stage.label()}</li> }
			})
			.collect_view()
	};

	let domain = move || {
		run.with(|r| r.domain().map(|d| view! { <p class="muted">"Domain: " {d.name}</p> }))
	};

	let hypothesis = text_of(run, |r| r.hypothesis().map(|(h, _)| h.to_string()));
	let rationale = text_of(run, |r| r.hypothesis().map(|(_, why)| why.to_string()));
	let equation = text_of(run, |r| r.equation().map(|(eq, _)| eq.to_string()));
	let accuracy = move || {
		run.with(|r| r.equation().map(|(_, acc)| format!("Accuracy {:.2}%", acc * 100.0)))
	};

	let experiments = move || {
		run.with(|r| r.experiments()).map(|list| {
			list.iter()
				.enumerate()
				.map(|(i, (name, description))| {
					view! {
						<details class="experiment">
							<summary>{format!("{}. {}", i + 1, name)}</summary>
							<p>{*description}</p>
						</details>
					}
				})
				.collect_view()
		})
	};

	let integration = move || {
		run.with(|r| r.integration().cloned()).map(|i| match i {
			Integration::Added { law } => {
				format!("Validated and added \"{law}\" to the knowledge graph.")
			}
			Integration::AlreadyKnown { law } => {
				format!("\"{law}\" is already part of the knowledge graph.")
			}
		})
	};

	view! {
		<AppHeader />
		<main class="container">
			<div class="intro">
				<h1>"AI Scientist Simulation"</h1>
				<p class="muted">
					"Watch a scripted discovery loop turn an observation into a law. Drag nodes to rearrange the graph."
				</p>
			</div>
			<div class="grid two">
				<div class="column">
					<section class="card">
						<h2>"Observation"</h2>
						<textarea
							class="tall"
							prop:value=move || observation.get()
							on:input=move |ev| observation.set(event_target_value(&ev))
						/>
						<button on:click=on_start disabled=running>
							{move || if running() { "Discovering..." } else { "Run Discovery" }}
						</button>
						{domain}
						<ol class="stages">{stage_list}</ol>
					</section>
					<section class="card">
						<h2>"Hypothesis"</h2>
						<p class="headline">
							<Typewriter text=hypothesis />
						</p>
						<p class="muted">
							<Typewriter text=rationale />
						</p>
					</section>
					<section class="card">
						<h2>"Equation"</h2>
						<p class="equation">
							<Typewriter text=equation />
						</p>
						<p class="muted">{accuracy}</p>
					</section>
					<section class="card">
						<h2>"Validation Experiments"</h2>
						{experiments}
					</section>
				</div>
				<div class="column">
					<section class="card graph-card">
						<h2>"Knowledge Graph"</h2>
						<KnowledgeGraphCanvas graph=graph height=Some(480.0) />
						<p class="muted">{integration}</p>
					</section>
				</div>
			</div>
		</main>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn started(seed: usize) -> (RwSignal<DiscoveryRun>, GraphHandle, u64) {
		let graph: GraphHandle = Rc::new(RefCell::new(initial_graph(&AppConfig::default())));
		let run = RwSignal::new(DiscoveryRun::new());
		run.update(|r| {
			r.start("an unclassifiable note", &mut SeededClassifier::new(seed));
		});
		let generation = run.with_untracked(|r| r.generation());
		(run, graph, generation)
	}

	#[test]
	fn timer_step_advances_the_current_run() {
		let (run, graph, generation) = started(3);
		assert_eq!(advance_current(run, &graph, generation), Some(Ok(Stage::Equation)));
		assert_eq!(run.with_untracked(|r| r.stage()), Stage::Equation);
	}

	#[test]
	fn timer_step_from_an_older_run_is_ignored() {
		let (run, graph, generation) = started(3);
		run.update(|r| {
			r.start("another note", &mut SeededClassifier::new(4));
		});
		assert_eq!(advance_current(run, &graph, generation), None);
		assert_eq!(run.with_untracked(|r| r.stage()), Stage::Hypothesis);
	}

	#[test]
	fn timer_step_after_teardown_does_nothing() {
		let (run, graph, generation) = started(3);
		run.dispose();
		assert_eq!(advance_current(run, &graph, generation), None);
		assert_eq!(graph.borrow().store.len(), 7);
	}
}
