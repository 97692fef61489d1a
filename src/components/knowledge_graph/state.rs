use std::collections::HashSet;

use log::debug;

use super::simulation::{ForceConfig, ForceSimulation};
use super::store::GraphStore;
use super::types::{GraphSnapshot, Point};
use crate::error::GraphError;

/// Extra slack around a node's radius that still counts as a hit.
pub const HIT_SLOP: f64 = 4.0;

#[derive(Clone, Debug)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

/// Single-pointer drag machine.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragState {
	#[default]
	Idle,
	Dragging {
		node: usize,
	},
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<usize>,
	pub neighbors: HashSet<usize>,
}

/// One long-lived graph per page: the store, the simulation driving it and
/// the view/pointer state of the canvas showing it.
pub struct KnowledgeGraphState {
	/// Nodes and edges.
	pub store: GraphStore,
	/// Layout driving `store`.
	pub simulation: ForceSimulation,
	/// Screen offset and scale.
	pub transform: ViewTransform,
	/// Node currently held by the pointer.
	pub drag: DragState,
	/// Background drag in progress.
	pub pan: PanState,
	/// Hovered node and its neighbors.
	pub hover: HoverState,
	/// Canvas width in CSS pixels.
	pub width: f64,
	/// Canvas height in CSS pixels.
	pub height: f64,
}

impl KnowledgeGraphState {
	/// Wraps `store` in a fresh, fully heated layout for a `width` by
	/// `height` canvas.
	pub fn new(store: GraphStore, config: ForceConfig, width: f64, height: f64) -> Self {
		Self {
			store,
			simulation: ForceSimulation::new(config, width, height),
			transform: ViewTransform::default(),
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
		}
	}

	/// Adds a node near the layout center and reheats the layout.
	pub fn add_node(
		&mut self,
		id: impl Into<String>,
		group: u32,
		size: f64,
	) -> Result<usize, GraphError> {
		let idx = self.store.add_node(id, group, size, self.simulation.center())?;
		self.simulation.restart();
		Ok(idx)
	}

	/// Adds an edge between existing nodes and reheats the layout.
	pub fn add_edge(&mut self, source: &str, target: &str) -> Result<(), GraphError> {
		self.store.add_edge(source, target)?;
		self.simulation.restart();
		Ok(())
	}

	/// Copy of the current nodes and edges.
	pub fn snapshot(&self) -> GraphSnapshot {
		self.store.snapshot()
	}

	/// One layout step. `false` once settled.
	pub fn tick(&mut self) -> bool {
		self.simulation.tick(&mut self.store)
	}

	/// Whether ticking still moves anything.
	pub fn is_running(&self) -> bool {
		!self.simulation.is_settled()
	}

	/// New canvas size moves the layout center, so the layout is reheated.
	pub fn resize(&mut self, width: f64, height: f64) {
		if self.width == width && self.height == height {
			return;
		}
		self.width = width;
		self.height = height;
		self.simulation.resize(width, height);
		self.simulation.restart();
	}

	/// Undoes pan and zoom.
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> Point {
		Point::new(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Topmost node under the screen position; later nodes draw on top.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let at = self.screen_to_graph(sx, sy);
		self.store
			.nodes()
			.iter()
			.enumerate()
			.rev()
			.find(|(_, node)| node.position().distance(at) < node.size + HIT_SLOP)
			.map(|(idx, _)| idx)
	}

	/// Grabs the node under the pointer, or starts panning the background.
	/// Returns whether a node was grabbed.
	pub fn pointer_down(&mut self, sx: f64, sy: f64) -> bool {
		if self.drag != DragState::Idle {
			return false;
		}
		match self.node_at_position(sx, sy) {
			Some(idx) => {
				let at = self.screen_to_graph(sx, sy);
				debug!("Dragging node {idx}");
				self.drag = DragState::Dragging { node: idx };
				self.pin(idx, at);
				let sim = &mut self.simulation;
				let target = sim.config().drag_alpha_target;
				sim.set_alpha_target(target);
				sim.set_alpha(sim.alpha().max(target));
				true
			}
			None => {
				self.pan = PanState {
					active: true,
					start_x: sx,
					start_y: sy,
					transform_start_x: self.transform.x,
					transform_start_y: self.transform.y,
				};
				false
			}
		}
	}

	/// Moves the held node, pans, or updates hover, depending on what the
	/// pointer is doing.
	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		match self.drag {
			DragState::Dragging { node } => {
				let at = self.screen_to_graph(sx, sy);
				self.pin(node, at);
			}
			DragState::Idle if self.pan.active => {
				self.transform.x = self.pan.transform_start_x + (sx - self.pan.start_x);
				self.transform.y = self.pan.transform_start_y + (sy - self.pan.start_y);
			}
			DragState::Idle => {
				let hovered = self.node_at_position(sx, sy);
				self.set_hover(hovered);
			}
		}
	}

	/// Releases any pin and lets the layout cool down again.
	pub fn pointer_up(&mut self) {
		if let DragState::Dragging { node } = self.drag {
			self.simulation.unpin(node);
			self.simulation.set_alpha_target(0.0);
		}
		self.drag = DragState::Idle;
		self.pan.active = false;
	}

	/// Same as release, and clears hover.
	pub fn pointer_leave(&mut self) {
		self.pointer_up();
		self.set_hover(None);
	}

	/// Zooms around the cursor; scrolling down zooms out.
	pub fn zoom(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let new_k = (self.transform.k * factor).clamp(0.1, 10.0);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	/// Highlights `node` and its neighbors, or nothing.
	pub fn set_hover(&mut self, node: Option<usize>) {
		if self.hover.node == node {
			return;
		}
		self.hover.node = node;
		self.hover.neighbors = node.map(|idx| self.store.neighbors(idx)).unwrap_or_default();
	}

	/// Hovered or adjacent to the hovered node.
	pub fn is_highlighted(&self, idx: usize) -> bool {
		self.hover.node == Some(idx) || self.hover.neighbors.contains(&idx)
	}

	/// Whether anything is hovered, in which case the rest is dimmed.
	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some()
	}

	/// Pins the node and moves it there immediately, so the canvas follows
	/// the pointer even between ticks.
	fn pin(&mut self, idx: usize, at: Point) {
		self.simulation.pin(idx, at);
		if let Some(node) = self.store.nodes_mut().get_mut(idx) {
			node.x = at.x;
			node.y = at.y;
			node.vx = 0.0;
			node.vy = 0.0;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn state() -> KnowledgeGraphState {
		let mut state =
			KnowledgeGraphState::new(GraphStore::new(), ForceConfig::default(), 800.0, 600.0);
		state.add_node("Physics", 1, 20.0).unwrap();
		state.add_node("Optics", 2, 14.0).unwrap();
		state.add_node("Acoustics", 2, 14.0).unwrap();
		state.add_edge("Physics", "Optics").unwrap();
		state.add_edge("Physics", "Acoustics").unwrap();
		state
	}

	fn settle(state: &mut KnowledgeGraphState) {
		while state.tick() {}
	}

	fn screen_pos(state: &KnowledgeGraphState, idx: usize) -> (f64, f64) {
		let node = state.store.node(idx).unwrap();
		(
			node.x * state.transform.k + state.transform.x,
			node.y * state.transform.k + state.transform.y,
		)
	}

	#[test]
	fn mutations_reheat_the_layout() {
		let mut state = state();
		settle(&mut state);
		assert!(!state.is_running());

		state.add_node("Thermodynamics", 2, 14.0).unwrap();
		assert_eq!(state.simulation.alpha(), 1.0);

		settle(&mut state);
		state.add_edge("Physics", "Thermodynamics").unwrap();
		assert_eq!(state.simulation.alpha(), 1.0);
	}

	#[test]
	fn rejected_mutations_do_not_reheat() {
		let mut state = state();
		settle(&mut state);
		let alpha = state.simulation.alpha();

		assert!(state.add_node("Optics", 2, 14.0).is_err());
		assert!(state.add_edge("Physics", "Relativity").is_err());
		assert_eq!(state.simulation.alpha(), alpha);
		assert_eq!(state.store.len(), 3);
		assert_eq!(state.store.edges().len(), 2);
	}

	#[test]
	fn drag_pins_node_to_pointer_until_release() {
		let mut state = state();
		settle(&mut state);
		let (sx, sy) = screen_pos(&state, 1);

		assert!(state.pointer_down(sx, sy));
		assert_eq!(state.drag, DragState::Dragging { node: 1 });
		assert!(state.is_running());

		state.pointer_move(40.0, 50.0);
		for _ in 0..10 {
			state.tick();
			assert_eq!(state.store.node(1).unwrap().position(), Point::new(40.0, 50.0));
		}

		state.pointer_up();
		assert_eq!(state.drag, DragState::Idle);
		assert_eq!(state.simulation.pinned(1), None);
		assert_eq!(state.simulation.alpha_target(), 0.0);
		settle(&mut state);
	}

	#[test]
	fn second_pointer_down_does_not_steal_the_drag() {
		let mut state = state();
		settle(&mut state);
		let (ax, ay) = screen_pos(&state, 1);
		let (bx, by) = screen_pos(&state, 2);

		assert!(state.pointer_down(ax, ay));
		assert!(!state.pointer_down(bx, by));
		assert_eq!(state.drag, DragState::Dragging { node: 1 });
		assert_eq!(state.simulation.pinned(2), None);
	}

	#[test]
	fn background_drag_pans_the_view() {
		let mut state = state();
		settle(&mut state);

		assert!(!state.pointer_down(5.0, 5.0));
		state.pointer_move(25.0, -5.0);
		assert_eq!((state.transform.x, state.transform.y), (20.0, -10.0));

		state.pointer_up();
		state.pointer_move(100.0, 100.0);
		assert_eq!((state.transform.x, state.transform.y), (20.0, -10.0));
	}

	#[test]
	fn zoom_keeps_cursor_point_fixed() {
		let mut state = state();
		let before = state.screen_to_graph(300.0, 200.0);
		state.zoom(300.0, 200.0, -1.0);
		let after = state.screen_to_graph(300.0, 200.0);

		assert!((state.transform.k - 1.1).abs() < 1e-12);
		assert!(before.distance(after) < 1e-9);

		for _ in 0..100 {
			state.zoom(0.0, 0.0, 1.0);
		}
		assert_eq!(state.transform.k, 0.1);
	}

	#[test]
	fn hover_highlights_neighbors() {
		let mut state = state();
		settle(&mut state);
		let (sx, sy) = screen_pos(&state, 0);

		state.pointer_move(sx, sy);
		assert_eq!(state.hover.node, Some(0));
		assert!(state.is_highlighted(1) && state.is_highlighted(2));

		let (sx, sy) = screen_pos(&state, 1);
		state.pointer_move(sx, sy);
		assert!(state.is_highlighted(0));
		assert!(!state.is_highlighted(2));

		state.pointer_leave();
		assert!(!state.has_active_highlight());
	}

	#[test]
	fn resize_moves_center_and_reheats() {
		let mut state = state();
		settle(&mut state);
		state.resize(1200.0, 900.0);

		assert_eq!(state.simulation.center(), Point::new(600.0, 450.0));
		assert!(state.is_running());
	}
}
