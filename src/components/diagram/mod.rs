//! Interactive architecture diagram component.
//!
//! Renders a node-link diagram laid out by a force simulation:
//! - Physics-based positioning with named, composable force slots
//! - Node dragging that pins the grabbed node and reheats the layout
//! - Curved SVG link paths anchored to node box edges
//! - Traveling dot markers bound to each link's path by stable id
//!
//! Appearance is delegated to external CSS through the `Node`, `Link`,
//! and `Dot` role classes plus each element's type tag.
//!
//! # Example
//!
//! ```ignore
//! use archflow::{Diagram, GraphData, GraphLink, GraphNode, LinkKind, NodeKind};
//!
//! let data = GraphData {
//!     nodes: vec![
//!         GraphNode { id: "Registry".into(), kind: NodeKind::Service },
//!         GraphNode { id: "Queue1".into(), kind: NodeKind::Queue },
//!     ],
//!     links: vec![
//!         GraphLink { source: "Registry".into(), target: "Queue1".into(), kind: LinkKind::Dashed },
//!     ],
//! };
//!
//! view! { <Diagram data=data.into() /> }
//! ```

mod component;
pub mod geometry;
mod render;
pub mod simulation;
mod state;
mod types;

pub use component::Diagram;
pub use state::{DiagramState, LayoutConfig};
pub use types::{GraphData, GraphError, GraphLink, GraphNode, LinkKind, NodeKind};
