//! Force-directed knowledge graph: store, layout, projection and canvas.

use std::cell::RefCell;
use std::rc::Rc;

mod component;
pub mod render;
pub mod simulation;
pub mod state;
pub mod store;
pub mod types;

pub use component::KnowledgeGraphCanvas;
pub use simulation::{ForceConfig, ForceSimulation};
pub use state::{DragState, KnowledgeGraphState};
pub use store::GraphStore;
pub use types::{GraphEdge, GraphNode, GraphSnapshot, Point};

/// Shared handle to the one graph a page owns. Event handlers, the frame
/// loop and page logic all run on the UI thread, so a `RefCell` suffices.
pub type GraphHandle = Rc<RefCell<KnowledgeGraphState>>;
