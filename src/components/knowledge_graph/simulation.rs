use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::store::GraphStore;
use super::types::Point;
use crate::error::ConfigError;

/// Tunable constants of the layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceConfig {
	/// Pairwise charge; negative values repel.
	pub charge_strength: f64,
	/// Rest length of every edge spring.
	pub link_distance: f64,
	/// Fraction of the centroid offset corrected per tick.
	pub center_strength: f64,
	/// Fraction of velocity lost per tick.
	pub velocity_decay: f64,
	/// Multiplier applied to the distance between alpha and its target
	/// every tick. Must lie in (0, 1).
	pub cooling_rate: f64,
	/// Below this the layout counts as settled and ticking stops.
	pub alpha_min: f64,
	/// Alpha target held while a node is dragged.
	pub drag_alpha_target: f64,
	/// Charge is not allowed to grow past this separation.
	pub distance_min: f64,
}

impl Default for ForceConfig {
	fn default() -> Self {
		Self {
			charge_strength: -250.0,
			link_distance: 100.0,
			center_strength: 0.1,
			velocity_decay: 0.4,
			// 0.001^(1/300): settles in roughly 300 ticks
			cooling_rate: 0.977_237_220_955_810_7,
			alpha_min: 0.001,
			drag_alpha_target: 0.3,
			distance_min: 1.0,
		}
	}
}

impl ForceConfig {
	/// Rejects constants under which the layout would never settle or
	/// would blow up.
	pub fn validate(&self) -> Result<(), ConfigError> {
		check("cooling_rate", self.cooling_rate, "in (0, 1)", |v| v > 0.0 && v < 1.0)?;
		check("alpha_min", self.alpha_min, "in (0, 1)", |v| v > 0.0 && v < 1.0)?;
		check("drag_alpha_target", self.drag_alpha_target, "in [0, 1]", |v| {
			(0.0..=1.0).contains(&v)
		})?;
		check("velocity_decay", self.velocity_decay, "in [0, 1]", |v| {
			(0.0..=1.0).contains(&v)
		})?;
		check("center_strength", self.center_strength, "in [0, 1]", |v| {
			(0.0..=1.0).contains(&v)
		})?;
		check("link_distance", self.link_distance, "positive", |v| v > 0.0)?;
		check("distance_min", self.distance_min, "positive", |v| v > 0.0)?;
		check("charge_strength", self.charge_strength, "finite", f64::is_finite)
	}
}

fn check(
	field: &'static str,
	value: f64,
	expected: &'static str,
	ok: impl Fn(f64) -> bool,
) -> Result<(), ConfigError> {
	if value.is_finite() && ok(value) {
		Ok(())
	} else {
		Err(ConfigError::OutOfRange {
			field,
			value,
			expected,
		})
	}
}

/// Velocity-Verlet style integrator over the nodes of a [`GraphStore`].
///
/// The simulation never owns the nodes; it borrows the store for the
/// duration of a tick and writes positions and velocities in place.
#[derive(Clone, Debug)]
pub struct ForceSimulation {
	config: ForceConfig,
	width: f64,
	height: f64,
	alpha: f64,
	alpha_target: f64,
	pins: BTreeMap<usize, Point>,
}

impl ForceSimulation {
	pub fn new(config: ForceConfig, width: f64, height: f64) -> Self {
		Self {
			config,
			width,
			height,
			alpha: 1.0,
			alpha_target: 0.0,
			pins: BTreeMap::new(),
		}
	}

	pub fn config(&self) -> &ForceConfig {
		&self.config
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	pub fn set_alpha(&mut self, alpha: f64) {
		self.alpha = alpha.clamp(0.0, 1.0);
	}

	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target.clamp(0.0, 1.0);
	}

	pub fn center(&self) -> Point {
		Point::new(self.width / 2.0, self.height / 2.0)
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Back to full energy after a topology change.
	pub fn restart(&mut self) {
		self.alpha = 1.0;
	}

	pub fn is_settled(&self) -> bool {
		self.alpha < self.config.alpha_min
	}

	pub fn pin(&mut self, idx: usize, at: Point) {
		self.pins.insert(idx, at);
	}

	pub fn unpin(&mut self, idx: usize) -> Option<Point> {
		self.pins.remove(&idx)
	}

	pub fn pinned(&self, idx: usize) -> Option<Point> {
		self.pins.get(&idx).copied()
	}

	/// Advances one step. Returns `false` without touching the store once
	/// the layout has settled.
	pub fn tick(&mut self, store: &mut GraphStore) -> bool {
		if self.is_settled() {
			return false;
		}

		self.apply_charge(store);
		self.apply_links(store);
		self.integrate(store);
		self.apply_centering(store);
		self.pin_nodes(store);

		self.alpha = self.alpha_target + (self.alpha - self.alpha_target) * self.config.cooling_rate;
		true
	}

	/// O(n²) pairwise repulsion, fine for the handful of nodes shown here.
	fn apply_charge(&self, store: &mut GraphStore) {
		let strength = self.config.charge_strength * self.alpha;
		let min_sq = self.config.distance_min * self.config.distance_min;
		let nodes = store.nodes_mut();
		let n = nodes.len();

		for i in 0..n {
			for j in (i + 1)..n {
				let (mut dx, mut dy) = (nodes[j].x - nodes[i].x, nodes[j].y - nodes[i].y);
				if dx == 0.0 && dy == 0.0 {
					// deterministic nudge for coincident nodes
					dx = (j - i) as f64 * 1e-6;
					dy = -dx;
				}
				let dist_sq = (dx * dx + dy * dy).max(min_sq);
				let w = strength / dist_sq;
				nodes[i].vx += dx * w;
				nodes[i].vy += dy * w;
				nodes[j].vx -= dx * w;
				nodes[j].vy -= dy * w;
			}
		}
	}

	/// Springs toward `link_distance`, weighted like d3: strength is the
	/// inverse of the smaller endpoint degree and the lighter end moves more.
	fn apply_links(&self, store: &mut GraphStore) {
		if store.links().is_empty() {
			return;
		}
		let mut degree = vec![0usize; store.len()];
		for &(src, tgt) in store.links() {
			degree[src] += 1;
			degree[tgt] += 1;
		}

		let links = store.links().to_vec();
		let nodes = store.nodes_mut();
		for (src, tgt) in links {
			if src == tgt {
				continue;
			}
			let strength = 1.0 / degree[src].min(degree[tgt]) as f64;
			let bias = degree[src] as f64 / (degree[src] + degree[tgt]) as f64;

			let mut dx = (nodes[tgt].x + nodes[tgt].vx) - (nodes[src].x + nodes[src].vx);
			let mut dy = (nodes[tgt].y + nodes[tgt].vy) - (nodes[src].y + nodes[src].vy);
			if dx == 0.0 && dy == 0.0 {
				dx = 1e-6;
			}
			let dist = (dx * dx + dy * dy).sqrt();
			let l = (dist - self.config.link_distance) / dist * self.alpha * strength;
			dx *= l;
			dy *= l;

			nodes[tgt].vx -= dx * bias;
			nodes[tgt].vy -= dy * bias;
			nodes[src].vx += dx * (1.0 - bias);
			nodes[src].vy += dy * (1.0 - bias);
		}
	}

	fn integrate(&self, store: &mut GraphStore) {
		let keep = 1.0 - self.config.velocity_decay;
		for node in store.nodes_mut() {
			node.vx *= keep;
			node.vy *= keep;
			node.x += node.vx;
			node.y += node.vy;
		}
	}

	/// Shifts free nodes so the centroid drifts toward the canvas center.
	fn apply_centering(&self, store: &mut GraphStore) {
		let n = store.len();
		if n == 0 {
			return;
		}
		let (sum_x, sum_y) = store
			.nodes()
			.iter()
			.fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
		let center = self.center();
		let shift_x = (center.x - sum_x / n as f64) * self.config.center_strength;
		let shift_y = (center.y - sum_y / n as f64) * self.config.center_strength;

		for node in store.nodes_mut() {
			node.x += shift_x;
			node.y += shift_y;
		}
	}

	/// Pins win over everything computed above.
	fn pin_nodes(&self, store: &mut GraphStore) {
		let nodes = store.nodes_mut();
		for (&idx, at) in &self.pins {
			if let Some(node) = nodes.get_mut(idx) {
				node.x = at.x;
				node.y = at.y;
				node.vx = 0.0;
				node.vy = 0.0;
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn chain(n: usize) -> (GraphStore, ForceSimulation) {
		let sim = ForceSimulation::new(ForceConfig::default(), 800.0, 600.0);
		let mut store = GraphStore::new();
		for i in 0..n {
			store.add_node(format!("n{i}"), 0, 8.0, sim.center()).unwrap();
		}
		for i in 1..n {
			store.add_edge(&format!("n{}", i - 1), &format!("n{i}")).unwrap();
		}
		(store, sim)
	}

	fn run_to_rest(store: &mut GraphStore, sim: &mut ForceSimulation) -> usize {
		let mut ticks = 0;
		while sim.tick(store) {
			ticks += 1;
			assert!(ticks < 10_000, "simulation never settled");
		}
		ticks
	}

	#[test]
	fn default_cooling_reaches_alpha_min_after_300_ticks() {
		let config = ForceConfig::default();
		assert!((config.cooling_rate.powi(300) - config.alpha_min).abs() < 1e-12);
		assert!(config.cooling_rate.powi(299) > config.alpha_min);
	}

	#[test]
	fn alpha_decays_geometrically() {
		let (mut store, mut sim) = chain(3);
		let rate = sim.config().cooling_rate;
		sim.set_alpha(0.8);

		for _ in 0..5 {
			let before = sim.alpha();
			assert!(sim.tick(&mut store));
			assert_eq!(sim.alpha(), before * rate);
		}
	}

	#[test]
	fn settles_in_bounded_ticks_from_any_alpha() {
		for start in [1.0, 0.5, 0.01] {
			let (mut store, mut sim) = chain(4);
			sim.set_alpha(start);
			let ticks = run_to_rest(&mut store, &mut sim);
			assert!(ticks <= 301, "took {ticks} ticks from alpha {start}");
			assert!(sim.is_settled());
			assert!(!sim.tick(&mut store));
		}
	}

	#[test]
	fn settled_simulation_leaves_nodes_alone() {
		let (mut store, mut sim) = chain(3);
		run_to_rest(&mut store, &mut sim);
		let before = store.snapshot();
		sim.tick(&mut store);
		assert_eq!(store.snapshot(), before);
	}

	#[test]
	fn restart_restores_full_energy() {
		let (mut store, mut sim) = chain(2);
		run_to_rest(&mut store, &mut sim);
		sim.restart();
		assert_eq!(sim.alpha(), 1.0);
		assert!(sim.tick(&mut store));
	}

	#[test]
	fn pinned_node_reports_pin_after_tick() {
		let (mut store, mut sim) = chain(5);
		let at = Point::new(12.5, -40.0);
		sim.pin(2, at);

		for _ in 0..20 {
			sim.tick(&mut store);
			assert_eq!(store.node(2).unwrap().position(), at);
		}

		assert_eq!(sim.unpin(2), Some(at));
		sim.tick(&mut store);
		assert_ne!(store.node(2).unwrap().position(), at);
	}

	#[test]
	fn linked_pair_relaxes_toward_rest_length() {
		let (mut store, mut sim) = chain(2);
		run_to_rest(&mut store, &mut sim);
		let d = store.node(0).unwrap().position().distance(store.node(1).unwrap().position());
		// charge pushes a little past the spring rest length
		assert!(d > 60.0 && d < 200.0, "distance {d}");
	}

	#[test]
	fn unlinked_nodes_spread_apart_and_stay_centered() {
		let sim_cfg = ForceConfig::default();
		let mut sim = ForceSimulation::new(sim_cfg, 800.0, 600.0);
		let mut store = GraphStore::new();
		for i in 0..6 {
			store.add_node(format!("n{i}"), 0, 8.0, sim.center()).unwrap();
		}
		run_to_rest(&mut store, &mut sim);

		let nodes = store.nodes();
		for (i, a) in nodes.iter().enumerate() {
			for b in &nodes[i + 1..] {
				assert!(a.position().distance(b.position()) > 20.0);
			}
		}
		let cx = nodes.iter().map(|n| n.x).sum::<f64>() / nodes.len() as f64;
		let cy = nodes.iter().map(|n| n.y).sum::<f64>() / nodes.len() as f64;
		assert!((cx - 400.0).abs() < 5.0 && (cy - 300.0).abs() < 5.0);
	}

	#[test]
	fn drag_target_keeps_simulation_running() {
		let (mut store, mut sim) = chain(3);
		sim.set_alpha_target(sim.config().drag_alpha_target);
		for _ in 0..2_000 {
			assert!(sim.tick(&mut store));
		}
		assert!((sim.alpha() - 0.3).abs() < 1e-6);

		sim.set_alpha_target(0.0);
		run_to_rest(&mut store, &mut sim);
	}

	#[test]
	fn out_of_range_constants_are_rejected() {
		assert!(ForceConfig::default().validate().is_ok());

		for (cooling_rate, ok) in [(1.0, false), (1.5, false), (0.0, false), (f64::NAN, false), (0.5, true)] {
			let cfg = ForceConfig {
				cooling_rate,
				..ForceConfig::default()
			};
			assert_eq!(cfg.validate().is_ok(), ok, "cooling_rate {cooling_rate}");
		}

		let cfg = ForceConfig {
			alpha_min: 0.0,
			..ForceConfig::default()
		};
		assert!(matches!(
			cfg.validate(),
			Err(ConfigError::OutOfRange {
				field: "alpha_min",
				..
			})
		));

		let cfg = ForceConfig {
			velocity_decay: 1.2,
			..ForceConfig::default()
		};
		assert!(cfg.validate().is_err());
	}

	#[test]
	fn config_fills_missing_fields_with_defaults() {
		let cfg: ForceConfig = serde_json::from_str(r#"{ "link_distance": 60.0 }"#).unwrap();
		assert_eq!(cfg.link_distance, 60.0);
		assert_eq!(cfg.alpha_min, ForceConfig::default().alpha_min);
	}
}
