use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::KnowledgeGraphState;
use super::types::Point;

const COLORS: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];

/// Group of nodes added by the discovery workflow; edges into them are dashed.
pub const DISCOVERED_GROUP: u32 = 4;

const LABEL_GAP: f64 = 3.0;

pub fn group_color(group: u32) -> &'static str {
	COLORS[group as usize % COLORS.len()]
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeSegment {
	pub from: Point,
	pub to: Point,
	pub highlighted: bool,
	pub dashed: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeGlyph {
	pub center: Point,
	pub radius: f64,
	pub color: &'static str,
	pub label: String,
	pub label_at: Point,
	pub highlighted: bool,
}

/// Everything one frame needs, in graph coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
	pub width: f64,
	pub height: f64,
	pub offset: Point,
	pub scale: f64,
	pub dimmed: bool,
	pub edges: Vec<EdgeSegment>,
	pub nodes: Vec<NodeGlyph>,
}

/// Projects the current graph state. Reads only, so it can run every tick.
pub fn project(state: &KnowledgeGraphState) -> Scene {
	let nodes = state.store.nodes();

	let edges = state
		.store
		.links()
		.iter()
		.map(|&(src, tgt)| EdgeSegment {
			from: nodes[src].position(),
			to: nodes[tgt].position(),
			highlighted: state.is_highlighted(src) && state.is_highlighted(tgt),
			dashed: nodes[src].group == DISCOVERED_GROUP || nodes[tgt].group == DISCOVERED_GROUP,
		})
		.collect();

	let nodes = nodes
		.iter()
		.enumerate()
		.map(|(idx, node)| NodeGlyph {
			center: node.position(),
			radius: node.size,
			color: group_color(node.group),
			label: node.id.clone(),
			label_at: Point::new(node.x + node.size + LABEL_GAP, node.y + LABEL_GAP),
			highlighted: state.is_highlighted(idx),
		})
		.collect();

	Scene {
		width: state.width,
		height: state.height,
		offset: Point::new(state.transform.x, state.transform.y),
		scale: state.transform.k,
		dimmed: state.has_active_highlight(),
		edges,
		nodes,
	}
}

pub fn draw(scene: &Scene, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#1a1a2e");
	ctx.fill_rect(0.0, 0.0, scene.width, scene.height);
	ctx.save();
	let _ = ctx.translate(scene.offset.x, scene.offset.y);
	let _ = ctx.scale(scene.scale, scene.scale);
	draw_edges(scene, ctx);
	draw_nodes(scene, ctx);
	ctx.restore();
}

fn draw_edges(scene: &Scene, ctx: &CanvasRenderingContext2d) {
	let k = scene.scale;
	let dash = js_sys::Array::of2(&JsValue::from_f64(6.0 / k), &JsValue::from_f64(4.0 / k));

	for edge in &scene.edges {
		let alpha = match (scene.dimmed, edge.highlighted) {
			(false, _) => 0.6,
			(true, true) => 0.9,
			(true, false) => 0.15,
		};
		ctx.set_stroke_style_str(&format!("rgba(100, 180, 255, {alpha})"));
		ctx.set_line_width(if edge.highlighted { 2.0 / k } else { 1.5 / k });
		if edge.dashed {
			let _ = ctx.set_line_dash(&dash);
		}
		ctx.begin_path();
		ctx.move_to(edge.from.x, edge.from.y);
		ctx.line_to(edge.to.x, edge.to.y);
		ctx.stroke();
		if edge.dashed {
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}
	}
}

fn draw_nodes(scene: &Scene, ctx: &CanvasRenderingContext2d) {
	let font = format!("{}px sans-serif", 11.0 / scene.scale.max(0.5));

	for node in &scene.nodes {
		let alpha = if scene.dimmed && !node.highlighted {
			0.3
		} else {
			1.0
		};

		ctx.set_global_alpha(alpha);
		ctx.begin_path();
		let _ = ctx.arc(node.center.x, node.center.y, node.radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(node.color);
		ctx.fill();

		if scene.dimmed && node.highlighted {
			ctx.set_stroke_style_str("rgba(255, 255, 255, 0.7)");
			ctx.set_line_width(1.5 / scene.scale);
			ctx.stroke();
		}
		ctx.set_global_alpha(1.0);

		ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {})", alpha * 0.85));
		ctx.set_font(&font);
		let _ = ctx.fill_text(&node.label, node.label_at.x, node.label_at.y);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::knowledge_graph::simulation::ForceConfig;
	use crate::components::knowledge_graph::store::GraphStore;

	fn state() -> KnowledgeGraphState {
		let mut state =
			KnowledgeGraphState::new(GraphStore::new(), ForceConfig::default(), 640.0, 480.0);
		state.add_node("Classical Mechanics", 2, 14.0).unwrap();
		state.add_node("Newton's Second Law", DISCOVERED_GROUP, 12.0).unwrap();
		state.add_node("Thermodynamics", 2, 14.0).unwrap();
		state.add_edge("Classical Mechanics", "Newton's Second Law").unwrap();
		for _ in 0..30 {
			state.tick();
		}
		state
	}

	#[test]
	fn scene_mirrors_node_and_edge_positions() {
		let state = state();
		let scene = project(&state);

		assert_eq!(scene.nodes.len(), 3);
		assert_eq!(scene.edges.len(), 1);

		let law = state.store.node(1).unwrap();
		let glyph = &scene.nodes[1];
		assert_eq!(glyph.center, law.position());
		assert_eq!(glyph.radius, 12.0);
		assert_eq!(glyph.label, "Newton's Second Law");
		assert_eq!(glyph.label_at, Point::new(law.x + 15.0, law.y + 3.0));
		assert_eq!(glyph.color, group_color(DISCOVERED_GROUP));

		let edge = &scene.edges[0];
		assert_eq!(edge.from, state.store.node(0).unwrap().position());
		assert_eq!(edge.to, law.position());
		assert!(edge.dashed);
	}

	#[test]
	fn projection_is_idempotent_and_read_only() {
		let state = state();
		let before = state.snapshot();
		let alpha = state.simulation.alpha();

		assert_eq!(project(&state), project(&state));
		assert_eq!(state.snapshot(), before);
		assert_eq!(state.simulation.alpha(), alpha);
	}

	#[test]
	fn hover_marks_highlighted_glyphs() {
		let mut state = state();
		state.set_hover(Some(0));
		let scene = project(&state);

		assert!(scene.dimmed);
		assert!(scene.nodes[0].highlighted && scene.nodes[1].highlighted);
		assert!(!scene.nodes[2].highlighted);
		assert!(scene.edges[0].highlighted);
	}

	#[test]
	fn colors_cycle_through_palette() {
		assert_eq!(group_color(0), group_color(10));
		assert_ne!(group_color(1), group_color(2));
	}
}
