//! Bowyer-Watson Delaunay triangulation of scattered 2D samples
//!
//! The outside of the hull is covered by ghost triangles sharing a vertex at
//! infinity, so hull edges come out exactly however flat the boundary
//! triangles are. Works in normalised coordinates (see [`Normalizer`]).

use crate::error::{OplotError, Result};

/// Samples closer than this (normalised units) are treated as one point
const COINCIDENT_EPS: f64 = 1e-12;
/// Minimal |cross product| for three samples to span a triangle
const COLLINEAR_EPS: f64 = 1e-10;
/// Barycentric slack so grid nodes on a hull edge still hit a triangle
const BARY_EPS: f64 = 1e-9;
/// Vertex at infinity closing the ghost triangles
const GHOST: usize = usize::MAX;

/// Affine map from sample coordinates to the unit square (or a square of the
/// largest span when axes keep their relative scale)
#[derive(Debug, Clone, Copy)]
pub(crate) struct Normalizer {
	x0: f64,
	y0: f64,
	sx: f64,
	sy: f64,
}

impl Normalizer {
	pub(crate) fn new(x: &[f64], y: &[f64], rescale: bool) -> Self {
		let (x0, x1) = bounds(x);
		let (y0, y1) = bounds(y);
		let span = |s: f64| if s > 0.0 { s } else { 1.0 };
		let (sx, sy) = if rescale {
			(span(x1 - x0), span(y1 - y0))
		} else {
			let s = span((x1 - x0).max(y1 - y0));
			(s, s)
		};
		Self { x0, y0, sx, sy }
	}

	pub(crate) fn apply(&self, x: f64, y: f64) -> [f64; 2] {
		[(x - self.x0) / self.sx, (y - self.y0) / self.sy]
	}
}

/// (min, max) of a non-empty slice
pub(crate) fn bounds(v: &[f64]) -> (f64, f64) {
	v.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| (lo.min(x), hi.max(x)))
}

fn cross(o: [f64; 2], a: [f64; 2], b: [f64; 2]) -> f64 {
	(a[0] - o[0]) * (b[1] - o[1]) - (a[1] - o[1]) * (b[0] - o[0])
}

fn dist2(a: [f64; 2], b: [f64; 2]) -> f64 {
	(a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)
}

#[derive(Debug, Clone)]
struct Circle {
	center: [f64; 2],
	r2: f64,
}

impl Circle {
	fn through(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> Self {
		let d = 2.0 * (a[0] * (b[1] - c[1]) + b[0] * (c[1] - a[1]) + c[0] * (a[1] - b[1]));
		if d == 0.0 {
			// flat triangle: let the next insertion sweep it away
			return Self { center: a, r2: f64::INFINITY };
		}
		let a2 = a[0] * a[0] + a[1] * a[1];
		let b2 = b[0] * b[0] + b[1] * b[1];
		let c2 = c[0] * c[0] + c[1] * c[1];
		let ux = (a2 * (b[1] - c[1]) + b2 * (c[1] - a[1]) + c2 * (a[1] - b[1])) / d;
		let uy = (a2 * (c[0] - b[0]) + b2 * (a[0] - c[0]) + c2 * (b[0] - a[0])) / d;
		let center = [ux, uy];
		Self { center, r2: dist2(center, a) }
	}

	fn contains(&self, p: [f64; 2]) -> bool {
		dist2(self.center, p) < self.r2
	}
}

/// Region a new vertex must fall in to destroy a triangle
#[derive(Debug, Clone)]
enum Conflict {
	Circle(Circle),
	/// Ghost triangle `[a, b, GHOST]`: the open half-plane left of `a -> b`,
	/// plus the open segment `ab` itself
	Outside([f64; 2], [f64; 2]),
}

impl Conflict {
	fn of(verts: &[[f64; 2]], t: [usize; 3]) -> Self {
		if t[2] == GHOST {
			Conflict::Outside(verts[t[0]], verts[t[1]])
		} else {
			Conflict::Circle(Circle::through(verts[t[0]], verts[t[1]], verts[t[2]]))
		}
	}

	fn contains(&self, p: [f64; 2]) -> bool {
		match self {
			Conflict::Circle(c) => c.contains(p),
			Conflict::Outside(a, b) => {
				let side = cross(*a, *b, p);
				if side != 0.0 {
					return side > 0.0;
				}
				let along = (p[0] - a[0]) * (b[0] - a[0]) + (p[1] - a[1]) * (b[1] - a[1]);
				along > 0.0 && along < dist2(*a, *b)
			}
		}
	}
}

/// Rotate a triangle so that a ghost vertex, if any, comes last
fn ghost_last(t: [usize; 3]) -> [usize; 3] {
	match t.iter().position(|&v| v == GHOST) {
		Some(0) => [t[1], t[2], t[0]],
		Some(1) => [t[2], t[0], t[1]],
		_ => t,
	}
}

/// Triangulated samples, ready for point location
#[derive(Debug, Clone)]
pub(crate) struct Triangulation {
	/// Normalised vertex positions
	pub(crate) points: Vec<[f64; 2]>,
	/// Sample value at each vertex
	pub(crate) values: Vec<f64>,
	/// Counter-clockwise vertex triples
	pub(crate) triangles: Vec<[usize; 3]>,
}

impl Triangulation {
	/// Triangulate already normalised samples.
	///
	/// Coincident samples keep the first occurrence. Fails when fewer than
	/// three distinct samples remain or when they are all collinear.
	pub(crate) fn build(points: &[[f64; 2]], values: &[f64]) -> Result<Self> {
		let mut kept: Vec<[f64; 2]> = Vec::with_capacity(points.len());
		let mut kept_values = Vec::with_capacity(points.len());
		for (p, &v) in points.iter().zip(values) {
			if kept.iter().all(|q| dist2(*p, *q) > COINCIDENT_EPS * COINCIDENT_EPS) {
				kept.push(*p);
				kept_values.push(v);
			}
		}
		if kept.len() < 3 {
			return Err(OplotError::DegenerateSamples(format!(
				"{} distinct sample(s), at least 3 are needed",
				kept.len()
			)));
		}
		if !spans_plane(&kept) {
			return Err(OplotError::DegenerateSamples("all samples are collinear".to_string()));
		}

		let n = kept.len();
		let [i0, i1, i2] = seed_triangle(&kept);
		// the outside of each hull edge a -> b is the ghost [b, a, GHOST]
		let mut tris: Vec<([usize; 3], Conflict)> = [[i0, i1, i2], [i1, i0, GHOST], [i2, i1, GHOST], [i0, i2, GHOST]]
			.into_iter()
			.map(|t| (t, Conflict::of(&kept, t)))
			.collect();

		for i in (0..n).filter(|&i| i != i0 && i != i1 && i != i2) {
			let p = kept[i];
			let (bad, good): (Vec<_>, Vec<_>) = tris.into_iter().partition(|(_, c)| c.contains(p));
			tris = good;
			if bad.is_empty() {
				log::debug!("sample {} not inserted into the triangulation", i);
				continue;
			}

			// cavity boundary: edges of bad triangles not shared with another bad one
			let mut edges: Vec<(usize, usize)> = Vec::with_capacity(bad.len() * 3);
			for (t, _) in &bad {
				for k in 0..3 {
					edges.push((t[k], t[(k + 1) % 3]));
				}
			}
			for &(a, b) in &edges {
				if edges.iter().any(|&(c, d)| c == b && d == a) {
					continue;
				}
				let tri = ghost_last([a, b, i]);
				tris.push((tri, Conflict::of(&kept, tri)));
			}
		}

		let triangles: Vec<[usize; 3]> = tris
			.into_iter()
			.map(|(t, _)| t)
			.filter(|t| t[2] != GHOST)
			.filter(|t| cross(kept[t[0]], kept[t[1]], kept[t[2]]) > 0.0)
			.collect();

		log::debug!("triangulated {} vertices into {} triangles", n, triangles.len());
		Ok(Self { points: kept, values: kept_values, triangles })
	}

	/// Triangle containing `p` and the barycentric weights of its vertices
	pub(crate) fn locate(&self, p: [f64; 2]) -> Option<(usize, [f64; 3])> {
		self.triangles.iter().enumerate().find_map(|(idx, t)| {
			let bary = self.barycentric(t, p)?;
			bary.iter().all(|&l| l >= -BARY_EPS).then_some((idx, bary))
		})
	}

	fn barycentric(&self, t: &[usize; 3], p: [f64; 2]) -> Option<[f64; 3]> {
		let [a, b, c] = [self.points[t[0]], self.points[t[1]], self.points[t[2]]];
		let area = cross(a, b, c);
		if area <= 0.0 {
			return None;
		}
		let l1 = cross(p, b, c) / area;
		let l2 = cross(a, p, c) / area;
		Some([l1, l2, 1.0 - l1 - l2])
	}

	/// Vertex neighbours along triangle edges
	pub(crate) fn neighbours(&self) -> Vec<Vec<usize>> {
		let mut adj: Vec<Vec<usize>> = vec![Vec::new(); self.points.len()];
		for t in &self.triangles {
			for k in 0..3 {
				let (a, b) = (t[k], t[(k + 1) % 3]);
				if !adj[a].contains(&b) {
					adj[a].push(b);
				}
				if !adj[b].contains(&a) {
					adj[b].push(a);
				}
			}
		}
		adj
	}
}

fn spans_plane(points: &[[f64; 2]]) -> bool {
	let origin = points[0];
	let Some(far) = points
		.iter()
		.copied()
		.max_by(|a, b| dist2(origin, *a).total_cmp(&dist2(origin, *b)))
	else {
		return false;
	};
	let len = dist2(origin, far).sqrt();
	if len <= COINCIDENT_EPS {
		return false;
	}
	points.iter().any(|&p| (cross(origin, far, p) / len).abs() > COLLINEAR_EPS)
}

/// Counter-clockwise starting triangle: the first sample, the sample farthest
/// from it and the sample farthest from that line
fn seed_triangle(points: &[[f64; 2]]) -> [usize; 3] {
	let origin = points[0];
	let far = farthest(points, |p| dist2(origin, p));
	let apex = farthest(points, |p| cross(origin, points[far], p).abs());
	if cross(origin, points[far], points[apex]) > 0.0 { [0, far, apex] } else { [0, apex, far] }
}

fn farthest<F: Fn([f64; 2]) -> f64>(points: &[[f64; 2]], key: F) -> usize {
	let mut best = 0;
	for (i, &p) in points.iter().enumerate() {
		if key(p) > key(points[best]) {
			best = i;
		}
	}
	best
}
