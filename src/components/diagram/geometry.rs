//! Link path geometry.
//!
//! Computes the cubic curve an edge follows between two rendered node
//! boxes: anchored at the visible edge of each box rather than its
//! geometric center, curving toward the side the path departs from.

/// Gap between a path endpoint and the node box edge, in px.
pub const EDGE_MARGIN: f64 = 5.0;

/// Curvature as a fraction of the distance between the path endpoints.
pub const CURVE_TENSION: f64 = 0.7;

/// Horizontal measurement of a rendered node box. Elements that have not
/// been laid out yet measure as zero-sized, which still yields a usable
/// (if center-anchored) path.
#[derive(Clone, Copy, Debug, Default)]
pub struct NodeBox {
	/// Left edge in the shared coordinate space. Only the ordering of the
	/// two boxes' left edges matters, so any consistent space works.
	pub left: f64,
	pub width: f64,
}

/// Builds the SVG `d` attribute for the curve from `source` to `target`
/// node centers, given each node's current box measurement.
///
/// Deterministic: identical inputs produce an identical path string, and
/// coincident centers fall back to a fixed rightward direction instead of
/// dividing by zero.
pub fn link_path(
	source: (f64, f64),
	target: (f64, f64),
	source_box: NodeBox,
	target_box: NodeBox,
) -> String {
	let (sx, sy) = source;
	let (tx, ty) = target;

	let (dx, dy) = (tx - sx, ty - sy);
	let magnitude = (dx * dx + dy * dy).sqrt();
	let ux = if magnitude > f64::EPSILON {
		dx / magnitude
	} else {
		1.0
	};

	let to_right = target_box.left > source_box.left;

	// Anchor each endpoint at the box edge facing the other node, pulled
	// in by the margin so the curve visually touches the box.
	let (x0, y0, x1, y1) = if to_right {
		(
			sx + source_box.width / 2.0 - EDGE_MARGIN,
			sy,
			tx - target_box.width / 2.0 + EDGE_MARGIN,
			ty,
		)
	} else {
		(
			sx - source_box.width / 2.0 + EDGE_MARGIN,
			sy,
			tx + target_box.width / 2.0 - EDGE_MARGIN,
			ty,
		)
	};

	let span = ((x1 - x0) * (x1 - x0) + (y1 - y0) * (y1 - y0)).sqrt();
	let curvature = span * CURVE_TENSION;

	// The curve leaves the source horizontally. Rightward curves arrive
	// straight at the target; leftward curves swing back past the target's
	// facing edge so they enter it horizontally as well.
	let (cx0, cy0) = (x0 + ux * curvature, y0);
	let (cx1, cy1) = if to_right {
		(x1, y1)
	} else {
		(x1 - ux * curvature, y1)
	};

	format!("M{},{} C{},{} {},{} {},{}", x0, y0, cx0, cy0, cx1, cy1, x1, y1)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn boxed(center_x: f64, width: f64) -> NodeBox {
		NodeBox {
			left: center_x - width / 2.0,
			width,
		}
	}

	#[test]
	fn rightward_path_anchors_at_box_edges() {
		let path = link_path((0.0, 0.0), (300.0, 0.0), boxed(0.0, 100.0), boxed(300.0, 100.0));
		// Start: 0 + 100/2 - 5 = 45. End: 300 - 100/2 + 5 = 255.
		// Span 210, curvature 147, first control point 45 + 147 = 192.
		assert_eq!(path, "M45,0 C192,0 255,0 255,0");
	}

	#[test]
	fn leftward_path_swings_past_the_target_edge() {
		let path = link_path((300.0, 0.0), (0.0, 0.0), boxed(300.0, 100.0), boxed(0.0, 100.0));
		// Start: 300 - 50 + 5 = 255. End: 0 + 50 - 5 = 45. Span 210,
		// curvature 147 along ux = -1: control points 108 and 192.
		assert_eq!(path, "M255,0 C108,0 192,0 45,0");
	}

	#[test]
	fn identical_inputs_produce_identical_paths() {
		let a = link_path((10.0, 20.0), (200.0, -40.0), boxed(10.0, 80.0), boxed(200.0, 120.0));
		let b = link_path((10.0, 20.0), (200.0, -40.0), boxed(10.0, 80.0), boxed(200.0, 120.0));
		assert_eq!(a, b);
	}

	#[test]
	fn coincident_centers_yield_a_finite_fallback() {
		let path = link_path((50.0, 50.0), (50.0, 50.0), boxed(50.0, 100.0), boxed(50.0, 100.0));
		assert!(path.starts_with('M'));
		assert!(!path.contains("NaN"));
		assert!(!path.contains("inf"));
	}

	#[test]
	fn unmeasured_boxes_anchor_at_node_centers() {
		let path = link_path((0.0, 0.0), (300.0, 0.0), NodeBox::default(), NodeBox::default());
		// Zero widths leave only the margin offset; travel reads as
		// leftward because both left edges coincide. Span 290, curvature
		// 203 along ux = 1.
		assert_eq!(path, "M5,0 C208,0 92,0 295,0");
	}

	#[test]
	fn vertical_travel_keeps_horizontal_tangents() {
		let path = link_path((0.0, 0.0), (0.0, 300.0), boxed(0.0, 100.0), boxed(0.0, 100.0));
		// Coincident left edges read as leftward; ux is 0 so both control
		// points sit directly on the endpoints' x.
		assert_eq!(path, "M-45,0 C-45,0 45,300 45,300");
	}
}
