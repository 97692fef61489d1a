/// A position in graph space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	/// Grows to the right.
	pub x: f64,
	/// Grows downward, as on the canvas.
	pub y: f64,
}

impl Point {
	/// Point at `(x, y)`.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Euclidean distance.
	pub fn distance(self, other: Point) -> f64 {
		(self.x - other.x).hypot(self.y - other.y)
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	pub id: String,
	pub group: u32,
	pub size: f64,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
}

impl GraphNode {
	pub fn position(&self) -> Point {
		Point::new(self.x, self.y)
	}
}

/// An unordered relationship between two node ids.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphEdge {
	pub source: String,
	pub target: String,
}

/// Immutable copy of the store, handed to anything that only reads.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphSnapshot {
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<GraphEdge>,
}

impl GraphSnapshot {
	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.nodes.iter().find(|n| n.id == id)
	}
}
