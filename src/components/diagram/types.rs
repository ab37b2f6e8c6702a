//! Graph data structures for input to the diagram component.

use serde::Deserialize;
use thiserror::Error;

/// Classification of a node, written onto its rendered box as a type tag
/// for external styling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
	Service,
	Queue,
}

impl NodeKind {
	/// CSS class fragment for this kind.
	pub fn css_class(self) -> &'static str {
		match self {
			NodeKind::Service => "service",
			NodeKind::Queue => "queue",
		}
	}
}

/// Line style of a link, written onto its rendered path and dot as a type
/// tag for external styling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
	Solid,
	Dashed,
}

impl LinkKind {
	/// CSS class fragment for this style.
	pub fn css_class(self) -> &'static str {
		match self {
			LinkKind::Solid => "solid",
			LinkKind::Dashed => "dashed",
		}
	}
}

/// A node in the diagram.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphNode {
	/// Unique identifier, also the rendered label. Links reference nodes by id.
	pub id: String,
	/// Node classification.
	#[serde(rename = "type")]
	pub kind: NodeKind,
}

/// A directed edge between two nodes.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphLink {
	/// Source node id.
	pub source: String,
	/// Target node id.
	pub target: String,
	/// Line style.
	#[serde(rename = "type")]
	pub kind: LinkKind,
}

/// Complete graph data: nodes and links.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}

/// Configuration errors detected while building a diagram from [`GraphData`].
///
/// Raised once at setup; a diagram that fails here renders nothing instead
/// of breaking mid-tick.
#[derive(Debug, Error)]
pub enum GraphError {
	#[error("duplicate node id `{0}`")]
	DuplicateNodeId(String),
	#[error("link {link} references unknown node id `{id}`")]
	UnknownLinkEndpoint { link: usize, id: String },
}
