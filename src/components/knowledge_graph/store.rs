use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use log::{debug, warn};

use super::types::{GraphEdge, GraphNode, GraphSnapshot, Point};
use crate::error::GraphError;

const INITIAL_RADIUS: f64 = 10.0;

/// Append-only owner of the node and edge collections.
///
/// Nodes are addressed by insertion index everywhere else in the graph
/// module; the index never changes because nothing is ever removed.
#[derive(Clone, Debug, Default)]
pub struct GraphStore {
	nodes: Vec<GraphNode>,
	edges: Vec<GraphEdge>,
	links: Vec<(usize, usize)>,
	index: HashMap<String, usize>,
}

impl GraphStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a node placed on a small spiral around `origin`, so that
	/// successive insertions never land on the same spot.
	pub fn add_node(
		&mut self,
		id: impl Into<String>,
		group: u32,
		size: f64,
		origin: Point,
	) -> Result<usize, GraphError> {
		let id = id.into();
		if self.index.contains_key(&id) {
			warn!("Ignoring duplicate node {id}");
			return Err(GraphError::DuplicateNode(id));
		}
		if !(size.is_finite() && size > 0.0) {
			warn!("Rejecting node {id} with size {size}");
			return Err(GraphError::InvalidSize { id, size });
		}

		let idx = self.nodes.len();
		let (x, y) = spiral_offset(idx);
		self.index.insert(id.clone(), idx);
		debug!("Added node {id} (group {group}) at index {idx}");
		self.nodes.push(GraphNode {
			id,
			group,
			size,
			x: origin.x + x,
			y: origin.y + y,
			vx: 0.0,
			vy: 0.0,
		});
		Ok(idx)
	}

	/// Both endpoints must already be present. Duplicate edges are kept.
	pub fn add_edge(&mut self, source: &str, target: &str) -> Result<(), GraphError> {
		let (Some(src), Some(tgt)) = (self.index_of(source), self.index_of(target)) else {
			let missing = if self.contains(source) { target } else { source };
			warn!("Rejecting edge {source} -> {target}: {missing} is not in the graph");
			return Err(GraphError::dangling(source, target, missing));
		};

		debug!("Added edge {source} -> {target}");
		self.edges.push(GraphEdge {
			source: source.to_string(),
			target: target.to_string(),
		});
		self.links.push((src, tgt));
		Ok(())
	}

	pub fn snapshot(&self) -> GraphSnapshot {
		GraphSnapshot {
			nodes: self.nodes.clone(),
			edges: self.edges.clone(),
		}
	}

	pub fn index_of(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	pub fn contains(&self, id: &str) -> bool {
		self.index.contains_key(id)
	}

	pub fn node(&self, idx: usize) -> Option<&GraphNode> {
		self.nodes.get(idx)
	}

	pub fn nodes(&self) -> &[GraphNode] {
		&self.nodes
	}

	pub fn nodes_mut(&mut self) -> &mut [GraphNode] {
		&mut self.nodes
	}

	pub fn edges(&self) -> &[GraphEdge] {
		&self.edges
	}

	/// Edges resolved to node indices, in insertion order.
	pub fn links(&self) -> &[(usize, usize)] {
		&self.links
	}

	pub fn neighbors(&self, idx: usize) -> HashSet<usize> {
		self.links
			.iter()
			.filter_map(|&(src, tgt)| {
				if src == idx {
					Some(tgt)
				} else if tgt == idx {
					Some(src)
				} else {
					None
				}
			})
			.collect()
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

/// Phyllotaxis placement: radius grows with the square root of the index.
fn spiral_offset(idx: usize) -> (f64, f64) {
	let angle = idx as f64 * PI * (3.0 - 5f64.sqrt());
	let radius = INITIAL_RADIUS * (0.5 + idx as f64).sqrt();
	(radius * angle.cos(), radius * angle.sin())
}
