//! Diagram instance state: model setup, force schedule, drag sessions.
//!
//! Builds the simulation from input data exactly once, resolving link
//! endpoints to node indices up front. Malformed input (duplicate ids,
//! links to unknown ids) is rejected here so the tick loop never sees a
//! broken edge.

use std::collections::HashMap;
use std::f64::consts::TAU;

use log::debug;

use super::simulation::{Force, SimNode, Simulation};
use super::types::{GraphData, GraphError, LinkKind, NodeKind};

/// Tunables for the configured force layout.
#[derive(Clone, Debug)]
pub struct LayoutConfig {
	/// Target separation of linked nodes.
	pub link_distance: f64,
	/// Spring strength multiplier for links.
	pub link_strength: f64,
	/// Circle radius nodes are kept apart by.
	pub collide_radius: f64,
	/// Overlap-resolution strength multiplier.
	pub collide_strength: f64,
	/// Alpha target applied while a drag is in progress.
	pub drag_alpha_target: f64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			link_distance: 200.0,
			link_strength: 2.0,
			collide_radius: 30.0,
			collide_strength: 10.0,
			drag_alpha_target: 0.3,
		}
	}
}

/// Metadata carried by each simulated node.
#[derive(Clone, Debug)]
pub struct NodeMeta {
	pub id: String,
	pub kind: NodeKind,
}

/// A link with both endpoints resolved to node indices.
#[derive(Clone, Copy, Debug)]
pub struct ResolvedLink {
	pub source: usize,
	pub target: usize,
	pub kind: LinkKind,
}

/// Tracks in-progress node drags as a session count, so overlapping
/// gesture starts and ends reheat on the 0 to 1 transition and cool on the
/// 1 to 0 transition only.
#[derive(Clone, Debug, Default)]
pub struct DragSession {
	sessions: usize,
	/// Node grabbed by the current gesture, if any.
	pub node: Option<usize>,
	pointer_start: (f64, f64),
	node_start: (f64, f64),
}

/// Per-diagram state: the simulation, resolved links, and interaction
/// bookkeeping. Created once when the component mounts, then mutated each
/// frame by the animation loop and between frames by mouse events.
pub struct DiagramState {
	pub sim: Simulation<NodeMeta>,
	pub links: Vec<ResolvedLink>,
	pub drag: DragSession,
	pub config: LayoutConfig,
	pub width: f64,
	pub height: f64,
}

impl DiagramState {
	/// Builds the model from input data and registers the force schedule.
	/// Fails on duplicate node ids or links referencing unknown ids.
	pub fn new(
		data: &GraphData,
		width: f64,
		height: f64,
		config: LayoutConfig,
	) -> Result<Self, GraphError> {
		let mut id_to_index = HashMap::new();
		let mut nodes = Vec::with_capacity(data.nodes.len());
		for (i, node) in data.nodes.iter().enumerate() {
			if id_to_index.insert(node.id.clone(), i).is_some() {
				return Err(GraphError::DuplicateNodeId(node.id.clone()));
			}
			// Seed positions on a circle around the center so symmetric
			// input still relaxes into a stable shape.
			let angle = (i as f64) * TAU / data.nodes.len() as f64;
			nodes.push(SimNode::new(
				width / 2.0 + 100.0 * angle.cos(),
				height / 2.0 + 100.0 * angle.sin(),
				NodeMeta {
					id: node.id.clone(),
					kind: node.kind,
				},
			));
		}

		let mut links = Vec::with_capacity(data.links.len());
		for (i, link) in data.links.iter().enumerate() {
			let resolve = |id: &String| {
				id_to_index
					.get(id)
					.copied()
					.ok_or_else(|| GraphError::UnknownLinkEndpoint {
						link: i,
						id: id.clone(),
					})
			};
			links.push(ResolvedLink {
				source: resolve(&link.source)?,
				target: resolve(&link.target)?,
				kind: link.kind,
			});
		}

		let mut sim = Simulation::new(nodes);
		sim.force("link", Force::Link {
			links: links.iter().map(|l| (l.source, l.target)).collect(),
			distance: config.link_distance,
			strength: config.link_strength,
		});
		sim.force("charge", Force::ManyBody {
			strength: Force::MANY_BODY_STRENGTH,
		});
		sim.force("collide", Force::Collide {
			radius: config.collide_radius,
			strength: config.collide_strength,
		});
		sim.force("center", Force::Center {
			x: width / 2.0,
			y: height / 2.0,
		});
		// Same slot: last write wins, so the axis bias replaces the
		// centering force registered above.
		sim.force("center", Force::AxisY {
			y: 0.0,
			strength: Force::AXIS_STRENGTH,
		});

		debug!(
			"archflow: diagram model ready, {} nodes, {} links",
			data.nodes.len(),
			links.len()
		);

		Ok(Self {
			sim,
			links,
			drag: DragSession::default(),
			config,
			width,
			height,
		})
	}

	/// Advances the simulation one frame. Returns whether anything moved.
	pub fn tick(&mut self) -> bool {
		self.sim.step()
	}

	/// Begins a drag on `node` at the given local pointer position. The
	/// first active session reheats the simulation so neighbors react
	/// while the node is pinned.
	pub fn drag_start(&mut self, node: usize, pointer: (f64, f64)) {
		if node >= self.sim.nodes().len() {
			return;
		}
		self.drag.sessions += 1;
		if self.drag.sessions == 1 {
			self.sim.set_alpha_target(self.config.drag_alpha_target);
			self.sim.restart();
		}
		let grabbed = &mut self.sim.nodes_mut()[node];
		grabbed.fx = Some(grabbed.x);
		grabbed.fy = Some(grabbed.y);
		self.drag.node = Some(node);
		self.drag.pointer_start = pointer;
		self.drag.node_start = (grabbed.x, grabbed.y);
	}

	/// Moves the dragged node's pin to follow the pointer, preserving the
	/// grab offset.
	pub fn drag_move(&mut self, pointer: (f64, f64)) {
		let Some(node) = self.drag.node else { return };
		let (dx, dy) = (
			pointer.0 - self.drag.pointer_start.0,
			pointer.1 - self.drag.pointer_start.1,
		);
		let grabbed = &mut self.sim.nodes_mut()[node];
		grabbed.fx = Some(self.drag.node_start.0 + dx);
		grabbed.fy = Some(self.drag.node_start.1 + dy);
	}

	/// Ends the active drag. The grabbed node resumes free movement; the
	/// last session out lets the simulation cool back down.
	pub fn drag_end(&mut self) {
		if let Some(node) = self.drag.node.take() {
			let released = &mut self.sim.nodes_mut()[node];
			released.fx = None;
			released.fy = None;
		}
		if self.drag.sessions > 0 {
			self.drag.sessions -= 1;
			if self.drag.sessions == 0 {
				self.sim.set_alpha_target(0.0);
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::diagram::types::{GraphLink, GraphNode};

	fn sample_data() -> GraphData {
		GraphData {
			nodes: vec![
				GraphNode {
					id: "Registry".to_string(),
					kind: NodeKind::Service,
				},
				GraphNode {
					id: "Initializer".to_string(),
					kind: NodeKind::Service,
				},
				GraphNode {
					id: "Finaliser".to_string(),
					kind: NodeKind::Service,
				},
				GraphNode {
					id: "Queue1".to_string(),
					kind: NodeKind::Queue,
				},
			],
			links: vec![
				GraphLink {
					source: "Registry".to_string(),
					target: "Initializer".to_string(),
					kind: LinkKind::Solid,
				},
				GraphLink {
					source: "Initializer".to_string(),
					target: "Finaliser".to_string(),
					kind: LinkKind::Solid,
				},
				GraphLink {
					source: "Finaliser".to_string(),
					target: "Queue1".to_string(),
					kind: LinkKind::Dashed,
				},
			],
		}
	}

	fn sample_state() -> DiagramState {
		DiagramState::new(&sample_data(), 600.0, 600.0, LayoutConfig::default()).unwrap()
	}

	#[test]
	fn setup_resolves_every_link_endpoint() {
		let state = sample_state();
		assert_eq!(state.sim.nodes().len(), 4);
		assert_eq!(state.links.len(), 3);
		assert_eq!((state.links[0].source, state.links[0].target), (0, 1));
		assert_eq!((state.links[1].source, state.links[1].target), (1, 2));
		assert_eq!((state.links[2].source, state.links[2].target), (2, 3));
		assert_eq!(state.links[2].kind, LinkKind::Dashed);
	}

	#[test]
	fn duplicate_node_id_is_rejected() {
		let mut data = sample_data();
		data.nodes.push(GraphNode {
			id: "Registry".to_string(),
			kind: NodeKind::Queue,
		});
		let err = DiagramState::new(&data, 600.0, 600.0, LayoutConfig::default()).unwrap_err();
		assert!(matches!(err, GraphError::DuplicateNodeId(id) if id == "Registry"));
	}

	#[test]
	fn link_to_unknown_id_is_rejected() {
		let mut data = sample_data();
		data.links.push(GraphLink {
			source: "Queue1".to_string(),
			target: "Ghost".to_string(),
			kind: LinkKind::Solid,
		});
		let err = DiagramState::new(&data, 600.0, 600.0, LayoutConfig::default()).unwrap_err();
		assert!(matches!(
			err,
			GraphError::UnknownLinkEndpoint { link: 3, ref id } if id == "Ghost"
		));
	}

	#[test]
	fn axis_bias_wins_the_center_slot() {
		let state = sample_state();
		assert_eq!(state.sim.forces().len(), 4);
		assert!(matches!(
			state.sim.get_force("center"),
			Some(Force::AxisY { .. })
		));
	}

	#[test]
	fn layout_settles_with_finite_positions() {
		let mut state = sample_state();
		let mut steps = 0;
		while state.tick() {
			steps += 1;
			assert!(steps <= 1000, "simulation failed to settle");
		}
		for node in state.sim.nodes() {
			assert!(node.x.is_finite());
			assert!(node.y.is_finite());
		}
	}

	#[test]
	fn drag_pins_the_node_and_reheats_once() {
		let mut state = sample_state();
		while state.tick() {}
		assert!(state.sim.settled());

		state.drag_start(0, (100.0, 100.0));
		assert_eq!(state.sim.alpha_target(), 0.3);
		assert!(state.sim.nodes()[0].fx.is_some());
		assert!(!state.sim.settled());

		state.drag_move((140.0, 90.0));
		let pinned = (
			state.sim.nodes()[0].fx.unwrap(),
			state.sim.nodes()[0].fy.unwrap(),
		);
		for _ in 0..30 {
			state.tick();
		}
		assert_eq!(state.sim.nodes()[0].x, pinned.0);
		assert_eq!(state.sim.nodes()[0].y, pinned.1);

		state.drag_end();
		assert_eq!(state.sim.alpha_target(), 0.0);
		assert!(state.sim.nodes()[0].fx.is_none());
	}

	#[test]
	fn drag_follows_the_pointer_with_grab_offset() {
		let mut state = sample_state();
		let start = (state.sim.nodes()[1].x, state.sim.nodes()[1].y);
		state.drag_start(1, (10.0, 20.0));
		state.drag_move((35.0, 15.0));
		assert_eq!(state.sim.nodes()[1].fx, Some(start.0 + 25.0));
		assert_eq!(state.sim.nodes()[1].fy, Some(start.1 - 5.0));
	}

	#[test]
	fn overlapping_drag_sessions_cool_only_at_the_last_end() {
		let mut state = sample_state();
		state.drag_start(0, (0.0, 0.0));
		state.drag_start(1, (0.0, 0.0));
		assert_eq!(state.sim.alpha_target(), 0.3);

		state.drag_end();
		assert_eq!(state.sim.alpha_target(), 0.3);
		state.drag_end();
		assert_eq!(state.sim.alpha_target(), 0.0);
	}

	#[test]
	fn released_node_resumes_moving() {
		let mut state = sample_state();
		state.drag_start(0, (0.0, 0.0));
		state.drag_move((50.0, 50.0));
		for _ in 0..10 {
			state.tick();
		}
		let held = state.sim.nodes()[0].x;
		state.drag_end();
		// Cooling is gradual, so forces still act on the freed node.
		for _ in 0..10 {
			state.tick();
		}
		assert_ne!(state.sim.nodes()[0].x, held);
	}
}
