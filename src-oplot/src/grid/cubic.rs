use super::delaunay::Triangulation;

/// Cubic Bernstein-Bezier control net per triangle.
///
/// Edge control points come from vertex gradients, the centre point is
/// chosen so that quadratic data is reproduced exactly.
pub(crate) struct CubicPatches {
	/// b300, b030, b003, b210, b201, b120, b021, b102, b012, b111
	nets: Vec<[f64; 10]>,
}

impl CubicPatches {
	pub(crate) fn new(tri: &Triangulation) -> Self {
		let grads = estimate_gradients(tri);
		let nets = tri
			.triangles
			.iter()
			.map(|t| {
				let [i, j, k] = *t;
				let (p1, p2, p3) = (tri.points[i], tri.points[j], tri.points[k]);
				let (f1, f2, f3) = (tri.values[i], tri.values[j], tri.values[k]);
				let (g1, g2, g3) = (grads[i], grads[j], grads[k]);
				let step = |f: f64, g: [f64; 2], from: [f64; 2], to: [f64; 2]| {
					f + (g[0] * (to[0] - from[0]) + g[1] * (to[1] - from[1])) / 3.0
				};
				let b210 = step(f1, g1, p1, p2);
				let b201 = step(f1, g1, p1, p3);
				let b120 = step(f2, g2, p2, p1);
				let b021 = step(f2, g2, p2, p3);
				let b102 = step(f3, g3, p3, p1);
				let b012 = step(f3, g3, p3, p2);
				let e = (b210 + b201 + b120 + b021 + b102 + b012) / 6.0;
				let v = (f1 + f2 + f3) / 3.0;
				let b111 = e + (e - v) / 2.0;
				[f1, f2, f3, b210, b201, b120, b021, b102, b012, b111]
			})
			.collect();
		Self { nets }
	}

	/// Evaluate triangle `t` at barycentric coordinates `(u, v, w)`
	pub(crate) fn eval(&self, t: usize, bary: [f64; 3]) -> f64 {
		let b = &self.nets[t];
		let [u, v, w] = bary;
		b[0] * u * u * u
			+ b[1] * v * v * v
			+ b[2] * w * w * w
			+ 3.0 * (b[3] * u * u * v + b[4] * u * u * w + b[5] * u * v * v)
			+ 3.0 * (b[6] * v * v * w + b[7] * u * w * w + b[8] * v * w * w)
			+ 6.0 * b[9] * u * v * w
	}
}

/// Inverse-distance weighted least-squares plane through each vertex and its
/// triangulation neighbours; zero where the neighbourhood is degenerate
fn estimate_gradients(tri: &Triangulation) -> Vec<[f64; 2]> {
	tri.neighbours()
		.iter()
		.enumerate()
		.map(|(i, adj)| {
			let p = tri.points[i];
			let (mut a11, mut a12, mut a22, mut r1, mut r2) = (0.0, 0.0, 0.0, 0.0, 0.0);
			for &j in adj {
				let dx = tri.points[j][0] - p[0];
				let dy = tri.points[j][1] - p[1];
				let dz = tri.values[j] - tri.values[i];
				let w = 1.0 / (dx * dx + dy * dy);
				a11 += w * dx * dx;
				a12 += w * dx * dy;
				a22 += w * dy * dy;
				r1 += w * dx * dz;
				r2 += w * dy * dz;
			}
			let det = a11 * a22 - a12 * a12;
			if det.abs() < 1e-14 {
				return [0.0, 0.0];
			}
			[(a22 * r1 - a12 * r2) / det, (a11 * r2 - a12 * r1) / det]
		})
		.collect()
}
