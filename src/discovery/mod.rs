//! Scripted stand-in for the AI scientist: classify an observation, then
//! walk through hypothesis, equation, experiments and finally fold the new
//! law into the knowledge graph.
//!
//! All text is final when a stage is entered; progressive reveal is purely a
//! view concern (see [`reveal`]).

use log::info;
use thiserror::Error;

pub mod catalog;
pub mod classifier;

pub use catalog::{DOMAINS, DomainProfile, LAW_GROUP, LAW_SIZE, seed_store};
pub use classifier::{DomainClassifier, KeywordClassifier, SeededClassifier};

use crate::components::knowledge_graph::KnowledgeGraphState;
use crate::error::GraphError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
	#[default]
	Idle,
	Hypothesis,
	Equation,
	Experiments,
	GraphUpdated,
}

impl Stage {
	fn next(self) -> Option<Stage> {
		match self {
			Stage::Idle | Stage::GraphUpdated => None,
			Stage::Hypothesis => Some(Stage::Equation),
			Stage::Equation => Some(Stage::Experiments),
			Stage::Experiments => Some(Stage::GraphUpdated),
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			Stage::Idle => "Waiting for an observation",
			Stage::Hypothesis => "Generating hypothesis",
			Stage::Equation => "Deriving equation",
			Stage::Experiments => "Designing validation experiments",
			Stage::GraphUpdated => "Knowledge graph updated",
		}
	}
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiscoveryError {
	#[error("no discovery run has been started")]
	NotStarted,

	#[error("discovery run already finished")]
	Finished,

	#[error(transparent)]
	Graph(#[from] GraphError),
}

/// What the final stage did to the graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Integration {
	/// The law node and its domain edge were added.
	Added { law: &'static str },
	/// The law was already in the graph from an earlier run.
	AlreadyKnown { law: &'static str },
}

#[derive(Clone, Debug, Default)]
pub struct DiscoveryRun {
	generation: u64,
	domain: Option<usize>,
	stage: Stage,
	integration: Option<Integration>,
}

impl DiscoveryRun {
	pub fn new() -> Self {
		Self::default()
	}

	/// Bumped on every start; timers from an older run compare against it.
	pub fn generation(&self) -> u64 {
		self.generation
	}

	pub fn stage(&self) -> Stage {
		self.stage
	}

	pub fn domain(&self) -> Option<&'static DomainProfile> {
		self.domain.and_then(|idx| DOMAINS.get(idx))
	}

	pub fn integration(&self) -> Option<&Integration> {
		self.integration.as_ref()
	}

	/// Classifies the observation and enters the hypothesis stage,
	/// discarding everything the previous run produced.
	pub fn start(
		&mut self,
		observation: &str,
		classifier: &mut dyn DomainClassifier,
	) -> &'static DomainProfile {
		let idx = classifier.classify(observation, DOMAINS).min(DOMAINS.len() - 1);
		self.generation += 1;
		self.domain = Some(idx);
		self.stage = Stage::Hypothesis;
		self.integration = None;
		info!("Discovery run {} classified as {}", self.generation, DOMAINS[idx].name);
		&DOMAINS[idx]
	}

	/// Moves one stage forward. Entering the last stage integrates the law.
	pub fn advance(&mut self, graph: &mut KnowledgeGraphState) -> Result<Stage, DiscoveryError> {
		let profile = self.domain().ok_or(DiscoveryError::NotStarted)?;
		let next = self.stage.next().ok_or(match self.stage {
			Stage::Idle => DiscoveryError::NotStarted,
			_ => DiscoveryError::Finished,
		})?;

		if next == Stage::GraphUpdated {
			self.integration = Some(integrate(profile, graph)?);
		}
		self.stage = next;
		Ok(next)
	}

	pub fn hypothesis(&self) -> Option<(&'static str, &'static str)> {
		self.shown(Stage::Hypothesis)
			.map(|d| (d.hypothesis, d.rationale))
	}

	pub fn equation(&self) -> Option<(&'static str, f64)> {
		self.shown(Stage::Equation).map(|d| (d.equation, d.accuracy))
	}

	pub fn experiments(&self) -> Option<&'static [(&'static str, &'static str)]> {
		self.shown(Stage::Experiments).map(|d| d.experiments)
	}

	fn shown(&self, from: Stage) -> Option<&'static DomainProfile> {
		if self.stage >= from {
			self.domain()
		} else {
			None
		}
	}
}

fn integrate(
	profile: &'static DomainProfile,
	graph: &mut KnowledgeGraphState,
) -> Result<Integration, GraphError> {
	match graph.add_node(profile.law, LAW_GROUP, LAW_SIZE) {
		Ok(_) => {
			graph.add_edge(profile.name, profile.law)?;
			info!("Integrated {} under {}", profile.law, profile.name);
			Ok(Integration::Added { law: profile.law })
		}
		Err(GraphError::DuplicateNode(_)) => Ok(Integration::AlreadyKnown { law: profile.law }),
		Err(e) => Err(e),
	}
}

/// The first `chars` characters of `text`, cut on a char boundary.
pub fn reveal(text: &str, chars: usize) -> &str {
	match text.char_indices().nth(chars) {
		Some((end, _)) => &text[..end],
		None => text,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::knowledge_graph::{ForceConfig, Point};

	struct Pick(&'static str);

	impl DomainClassifier for Pick {
		fn classify(&mut self, _: &str, domains: &[DomainProfile]) -> usize {
			domains.iter().position(|d| d.name == self.0).unwrap()
		}
	}

	fn graph() -> KnowledgeGraphState {
		let store = seed_store(Point::new(400.0, 300.0)).unwrap();
		KnowledgeGraphState::new(store, ForceConfig::default(), 800.0, 600.0)
	}

	fn run_to_end(run: &mut DiscoveryRun, graph: &mut KnowledgeGraphState) {
		while run.stage() != Stage::GraphUpdated {
			run.advance(graph).unwrap();
		}
	}

	#[test]
	fn stages_reveal_results_in_order() {
		let mut graph = graph();
		let mut run = DiscoveryRun::new();
		assert_eq!(run.advance(&mut graph), Err(DiscoveryError::NotStarted));

		run.start("a cart on a track", &mut Pick("Classical Mechanics"));
		assert!(run.hypothesis().is_some());
		assert!(run.equation().is_none());

		assert_eq!(run.advance(&mut graph), Ok(Stage::Equation));
		assert_eq!(run.equation(), Some(("F = m · a", 0.991)));
		assert!(run.experiments().is_none());

		assert_eq!(run.advance(&mut graph), Ok(Stage::Experiments));
		assert_eq!(run.experiments().unwrap().len(), 2);
		assert_eq!(graph.store.len(), 7);

		assert_eq!(run.advance(&mut graph), Ok(Stage::GraphUpdated));
		assert_eq!(run.advance(&mut graph), Err(DiscoveryError::Finished));
	}

	#[test]
	fn final_stage_adds_law_under_its_domain() {
		let mut graph = graph();
		while graph.tick() {}
		let mut run = DiscoveryRun::new();
		run.start("", &mut Pick("Classical Mechanics"));
		run_to_end(&mut run, &mut graph);

		assert_eq!(
			run.integration(),
			Some(&Integration::Added {
				law: "Newton's Second Law"
			})
		);
		let snapshot = graph.snapshot();
		assert_eq!(snapshot.nodes.len(), 8);
		assert_eq!(snapshot.edges.len(), 7);
		let law = snapshot.node("Newton's Second Law").unwrap();
		assert_eq!((law.group, law.size), (4, 12.0));
		assert_eq!(snapshot.edges[6].source, "Classical Mechanics");
		assert_eq!(graph.simulation.alpha(), 1.0);
	}

	#[test]
	fn rediscovering_a_law_adds_nothing() {
		let mut graph = graph();
		let mut run = DiscoveryRun::new();
		run.start("", &mut Pick("Relativity"));
		run_to_end(&mut run, &mut graph);
		run.start("", &mut Pick("Relativity"));
		run_to_end(&mut run, &mut graph);

		assert_eq!(
			run.integration(),
			Some(&Integration::AlreadyKnown {
				law: "Mass-Energy Equivalence"
			})
		);
		assert_eq!(graph.store.len(), 8);
		assert_eq!(graph.store.edges().len(), 7);
	}

	#[test]
	fn restart_discards_previous_run() {
		let mut graph = graph();
		let mut run = DiscoveryRun::new();
		run.start("", &mut Pick("Astrophysics"));
		run.advance(&mut graph).unwrap();
		let first = run.generation();

		run.start("photon spectrum", &mut Pick("Quantum Mechanics"));
		assert!(run.generation() > first);
		assert_eq!(run.stage(), Stage::Hypothesis);
		assert!(run.equation().is_none());
		assert_eq!(run.domain().unwrap().name, "Quantum Mechanics");
	}

	#[test]
	fn every_domain_integrates_cleanly() {
		let mut graph = graph();
		for (i, d) in DOMAINS.iter().enumerate() {
			let mut run = DiscoveryRun::new();
			run.start("", &mut Pick(d.name));
			run_to_end(&mut run, &mut graph);
			assert_eq!(graph.store.len(), 8 + i);
		}
	}

	#[test]
	fn reveal_cuts_on_char_boundaries() {
		assert_eq!(reveal("E = m · c²", 0), "");
		assert_eq!(reveal("E = m · c²", 7), "E = m ·");
		assert_eq!(reveal("E = m · c²", 10), "E = m · c²");
		assert_eq!(reveal("E = m · c²", 99), "E = m · c²");
	}
}
