//! Force-directed layout simulation.
//!
//! A discrete-time relaxation over a node set: each step decays the global
//! alpha toward its target, applies the registered forces in order, and
//! integrates velocities into positions. Forces occupy named slots;
//! re-registering a name replaces the force already in that slot.
//!
//! The caller drives time by invoking [`Simulation::step`] once per frame.
//! The return value reports whether the step moved anything, so an
//! animation loop can skip render work while settled yet keep polling at
//! negligible cost until the simulation is reheated or stopped.

/// Alpha below this value counts as settled.
pub const ALPHA_MIN: f64 = 0.001;

/// Fraction of velocity carried over between steps.
const VELOCITY_DECAY: f64 = 0.6;

/// Steps for alpha to decay from 1.0 to [`ALPHA_MIN`] with a zero target.
const DECAY_STEPS: f64 = 300.0;

/// Repulsion saturates below this squared separation.
const MIN_DISTANCE_SQ: f64 = 1.0;

/// A simulated node: position, velocity, optional pin, and caller payload.
#[derive(Clone, Debug)]
pub struct SimNode<D> {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	/// Pinned x position. While set, forces cannot move the node.
	pub fx: Option<f64>,
	/// Pinned y position.
	pub fy: Option<f64>,
	/// Caller-attached metadata.
	pub data: D,
}

impl<D> SimNode<D> {
	pub fn new(x: f64, y: f64, data: D) -> Self {
		Self {
			x,
			y,
			vx: 0.0,
			vy: 0.0,
			fx: None,
			fy: None,
			data,
		}
	}
}

/// Unit vector and length of a displacement, with a deterministic fallback
/// direction for coincident points derived from the index pair.
fn unit_or_fallback(dx: f64, dy: f64, a: usize, b: usize) -> (f64, f64, f64) {
	let len = (dx * dx + dy * dy).sqrt();
	if len > f64::EPSILON {
		(dx / len, dy / len, len)
	} else {
		let angle = ((a as f64) * 0.618_034 + (b as f64) * 0.414_214) * std::f64::consts::TAU;
		(angle.cos(), angle.sin(), 0.0)
	}
}

/// A force definition occupying one named slot of a [`Simulation`].
#[derive(Clone, Debug)]
pub enum Force {
	/// Spring pulling each link's endpoints toward a separation distance.
	Link {
		/// Resolved (source, target) node index pairs.
		links: Vec<(usize, usize)>,
		distance: f64,
		strength: f64,
	},
	/// Pairwise inverse-distance repulsion. Negative strength pushes apart.
	ManyBody { strength: f64 },
	/// Overlap resolution between nodes treated as equal-radius circles.
	Collide { radius: f64, strength: f64 },
	/// Translates the whole layout so its centroid sits on a point.
	Center { x: f64, y: f64 },
	/// Biases node y toward a horizontal axis.
	AxisY { y: f64, strength: f64 },
}

impl Force {
	/// Default many-body repulsion strength.
	pub const MANY_BODY_STRENGTH: f64 = -30.0;

	/// Default axis bias strength.
	pub const AXIS_STRENGTH: f64 = 0.1;

	fn apply<D>(&self, nodes: &mut [SimNode<D>], alpha: f64) {
		match self {
			Force::Link {
				links,
				distance,
				strength,
			} => {
				for &(source, target) in links {
					if source == target || source >= nodes.len() || target >= nodes.len() {
						continue;
					}
					// Spring on projected positions, like an implicit
					// integration of the next step.
					let dx = (nodes[target].x + nodes[target].vx)
						- (nodes[source].x + nodes[source].vx);
					let dy = (nodes[target].y + nodes[target].vy)
						- (nodes[source].y + nodes[source].vy);
					let (ux, uy, len) = unit_or_fallback(dx, dy, source, target);
					let correction = (len - distance) * strength * alpha * 0.5;
					nodes[target].vx -= ux * correction;
					nodes[target].vy -= uy * correction;
					nodes[source].vx += ux * correction;
					nodes[source].vy += uy * correction;
				}
			}
			Force::ManyBody { strength } => {
				for i in 0..nodes.len() {
					for j in (i + 1)..nodes.len() {
						let (ux, uy, len) =
							unit_or_fallback(nodes[j].x - nodes[i].x, nodes[j].y - nodes[i].y, i, j);
						let dist_sq = (len * len).max(MIN_DISTANCE_SQ);
						let w = strength * alpha / dist_sq;
						let (dx, dy) = (ux * len.max(1.0), uy * len.max(1.0));
						nodes[i].vx += dx * w;
						nodes[i].vy += dy * w;
						nodes[j].vx -= dx * w;
						nodes[j].vy -= dy * w;
					}
				}
			}
			Force::Collide { radius, strength } => {
				let min_dist = radius * 2.0;
				for i in 0..nodes.len() {
					for j in (i + 1)..nodes.len() {
						let (ux, uy, len) =
							unit_or_fallback(nodes[j].x - nodes[i].x, nodes[j].y - nodes[i].y, i, j);
						if len < min_dist {
							let push = (min_dist - len) * strength * 0.5;
							nodes[i].vx -= ux * push;
							nodes[i].vy -= uy * push;
							nodes[j].vx += ux * push;
							nodes[j].vy += uy * push;
						}
					}
				}
			}
			Force::Center { x, y } => {
				if nodes.is_empty() {
					return;
				}
				let n = nodes.len() as f64;
				let (mut sx, mut sy) = (0.0, 0.0);
				for node in nodes.iter() {
					sx += node.x;
					sy += node.y;
				}
				let (shift_x, shift_y) = (sx / n - x, sy / n - y);
				for node in nodes.iter_mut() {
					node.x -= shift_x;
					node.y -= shift_y;
				}
			}
			Force::AxisY { y, strength } => {
				for node in nodes.iter_mut() {
					node.vy += (y - node.y) * strength * alpha;
				}
			}
		}
	}
}

/// Iterative force-directed relaxation over a node set.
///
/// Owns the nodes and an ordered list of named force slots. Alpha decays
/// toward `alpha_target` each step; raising the target above [`ALPHA_MIN`]
/// reheats a settled simulation, resetting it to zero lets it cool again.
pub struct Simulation<D> {
	nodes: Vec<SimNode<D>>,
	forces: Vec<(String, Force)>,
	alpha: f64,
	alpha_target: f64,
	alpha_decay: f64,
	stopped: bool,
}

impl<D> Simulation<D> {
	pub fn new(nodes: Vec<SimNode<D>>) -> Self {
		Self {
			nodes,
			forces: Vec::new(),
			alpha: 1.0,
			alpha_target: 0.0,
			alpha_decay: 1.0 - ALPHA_MIN.powf(1.0 / DECAY_STEPS),
			stopped: false,
		}
	}

	/// Registers `force` under `name`. A name already in use keeps its slot
	/// position but the new force replaces the old one: last write wins.
	pub fn force(&mut self, name: &str, force: Force) -> &mut Self {
		match self.forces.iter_mut().find(|(slot, _)| slot == name) {
			Some(slot) => slot.1 = force,
			None => self.forces.push((name.to_string(), force)),
		}
		self
	}

	/// The registered force slots, in application order.
	pub fn forces(&self) -> &[(String, Force)] {
		&self.forces
	}

	/// The force currently occupying `name`, if any.
	pub fn get_force(&self, name: &str) -> Option<&Force> {
		self.forces
			.iter()
			.find(|(slot, _)| slot == name)
			.map(|(_, force)| force)
	}

	pub fn nodes(&self) -> &[SimNode<D>] {
		&self.nodes
	}

	pub fn nodes_mut(&mut self) -> &mut [SimNode<D>] {
		&mut self.nodes
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	/// Sets the value alpha decays toward. A target above [`ALPHA_MIN`]
	/// keeps the simulation hot until it is reset to zero.
	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target;
	}

	/// Clears a [`stop`](Self::stop) so stepping resumes.
	pub fn restart(&mut self) {
		self.stopped = false;
	}

	/// Halts stepping until [`restart`](Self::restart). Used at teardown so
	/// an animation loop holding this simulation goes permanently idle.
	pub fn stop(&mut self) {
		self.stopped = true;
	}

	/// Whether alpha has decayed below the settle threshold with no reheat
	/// target holding it up.
	pub fn settled(&self) -> bool {
		self.alpha < ALPHA_MIN && self.alpha_target < ALPHA_MIN
	}

	/// Advances one tick: decay alpha, apply each force slot in order, then
	/// integrate. Pinned nodes snap to their pin with zeroed velocity.
	/// Returns `false` without touching any node when stopped or settled.
	pub fn step(&mut self) -> bool {
		if self.stopped || self.settled() {
			return false;
		}

		self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;

		for (_, force) in &self.forces {
			force.apply(&mut self.nodes, self.alpha);
		}

		for node in &mut self.nodes {
			match node.fx {
				Some(fx) => {
					node.x = fx;
					node.vx = 0.0;
				}
				None => {
					node.vx *= VELOCITY_DECAY;
					node.x += node.vx;
				}
			}
			match node.fy {
				Some(fy) => {
					node.y = fy;
					node.vy = 0.0;
				}
				None => {
					node.vy *= VELOCITY_DECAY;
					node.y += node.vy;
				}
			}
		}

		true
	}
}
