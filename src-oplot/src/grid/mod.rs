//! Regular grids interpolated from scattered (x, y, z) trial samples
//!
//! Supported methods:
//! - `nearest`: value of the closest sample, defined on the whole grid
//! - `linear`: barycentric interpolation over a Delaunay triangulation
//! - `cubic`: cubic Bernstein-Bezier patch per Delaunay triangle, driven by
//!   least-squares gradient estimates at each vertex. Patches share values and
//!   gradients at the vertices and are continuous across edges, but the
//!   surface is only C1 at the vertices, not along the edges (unlike a
//!   Clough-Tocher split).
//!
//! Grid nodes outside the convex hull of the samples are `NaN` for linear
//! and cubic interpolation.

use std::fmt;
use std::str::FromStr;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::{OplotError, Result};

mod cubic;
mod delaunay;

use cubic::CubicPatches;
use delaunay::{Normalizer, Triangulation, bounds};

/// Default number of samples along each grid axis
pub const DEFAULT_RESOLUTION: usize = 100;

/// Scattered-data interpolation method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationMethod {
	Nearest,
	#[default]
	Linear,
	Cubic,
}

impl FromStr for InterpolationMethod {
	type Err = OplotError;
	fn from_str(s: &str) -> Result<Self> {
		match s.trim().to_lowercase().as_str() {
			"nearest" => Ok(InterpolationMethod::Nearest),
			"linear" => Ok(InterpolationMethod::Linear),
			"cubic" => Ok(InterpolationMethod::Cubic),
			_ => Err(OplotError::UnknownMethod(s.to_string())),
		}
	}
}

impl fmt::Display for InterpolationMethod {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			InterpolationMethod::Nearest => "nearest",
			InterpolationMethod::Linear => "linear",
			InterpolationMethod::Cubic => "cubic",
		};
		f.write_str(name)
	}
}

/// Interpolated grid in meshgrid layout: `z[[j, i]]` is the value at
/// `(x_axis[i], y_axis[j])`, `NaN` where undefined
#[derive(Debug, Clone, PartialEq)]
pub struct ContourGrid {
	pub x_axis: Array1<f64>,
	pub y_axis: Array1<f64>,
	pub z: Array2<f64>,
}

impl ContourGrid {
	/// Rows of the grid with undefined cells as `None`
	pub fn z_rows(&self) -> Vec<Vec<Option<f64>>> {
		self.z
			.rows()
			.into_iter()
			.map(|row| row.iter().map(|&v| (!v.is_nan()).then_some(v)).collect())
			.collect()
	}

	/// Number of defined cells
	pub fn defined_cells(&self) -> usize {
		self.z.iter().filter(|v| !v.is_nan()).count()
	}
}

/// Interpolation settings
#[derive(Debug, Clone, PartialEq)]
pub struct GridInterpolator {
	/// Samples per axis
	pub resolution: usize,
	pub method: InterpolationMethod,
	/// Clamp defined cells into `[lo, hi]`
	pub clip: Option<(f64, f64)>,
	/// Scale both axes to unit length before measuring distances. Off by
	/// default: distances are measured in the sample units.
	pub rescale: bool,
}

impl Default for GridInterpolator {
	fn default() -> Self {
		Self { resolution: DEFAULT_RESOLUTION, method: InterpolationMethod::default(), clip: None, rescale: false }
	}
}

impl GridInterpolator {
	pub fn new() -> Self {
		Self::default()
	}
	pub fn resolution(mut self, v: usize) -> Self {
		self.resolution = v;
		self
	}
	pub fn method(mut self, v: InterpolationMethod) -> Self {
		self.method = v;
		self
	}
	pub fn clip(mut self, v: Option<(f64, f64)>) -> Self {
		self.clip = v;
		self
	}
	pub fn rescale(mut self, v: bool) -> Self {
		self.rescale = v;
		self
	}

	/// Interpolate `(x, y) -> z` samples onto a `resolution x resolution` grid
	/// spanning `[min(x), max(x)] x [min(y), max(y)]`.
	///
	/// Empty or unequal inputs, non-finite coordinates, a zero resolution and
	/// an inverted clip range are rejected. Linear and cubic interpolation also
	/// fail when the samples do not span a triangle; nearest accepts a single
	/// sample.
	pub fn interpolate(&self, x: &[f64], y: &[f64], z: &[f64]) -> Result<ContourGrid> {
		self.validate(x, y, z)?;

		let (x_min, x_max) = bounds(x);
		let (y_min, y_max) = bounds(y);
		let x_axis = Array1::linspace(x_min, x_max, self.resolution);
		let y_axis = Array1::linspace(y_min, y_max, self.resolution);

		log::debug!(
			"interpolating {} sample(s) on a {}x{} grid ({})",
			x.len(),
			self.resolution,
			self.resolution,
			self.method
		);

		let norm = Normalizer::new(x, y, self.rescale);
		let samples: Vec<[f64; 2]> = x.iter().zip(y).map(|(&a, &b)| norm.apply(a, b)).collect();

		let mut grid = match self.method {
			InterpolationMethod::Nearest => {
				fill(&x_axis, &y_axis, &norm, |p| nearest(&samples, z, p))
			}
			InterpolationMethod::Linear => {
				let tri = Triangulation::build(&samples, z)?;
				fill(&x_axis, &y_axis, &norm, |p| match tri.locate(p) {
					Some((t, bary)) => {
						let v = tri.triangles[t];
						bary[0] * tri.values[v[0]] + bary[1] * tri.values[v[1]] + bary[2] * tri.values[v[2]]
					}
					None => f64::NAN,
				})
			}
			InterpolationMethod::Cubic => {
				let tri = Triangulation::build(&samples, z)?;
				let patches = CubicPatches::new(&tri);
				fill(&x_axis, &y_axis, &norm, |p| match tri.locate(p) {
					Some((t, bary)) => patches.eval(t, bary),
					None => f64::NAN,
				})
			}
		};

		if let Some((lo, hi)) = self.clip {
			clip_grid(&mut grid, lo, hi);
		}

		let grid = ContourGrid { x_axis, y_axis, z: grid };
		if grid.defined_cells() == 0 {
			log::warn!("interpolated grid has no defined cell");
		}
		Ok(grid)
	}

	fn validate(&self, x: &[f64], y: &[f64], z: &[f64]) -> Result<()> {
		if x.is_empty() {
			return Err(OplotError::InvalidGridInput("no samples".to_string()));
		}
		if x.len() != y.len() || x.len() != z.len() {
			return Err(OplotError::InvalidGridInput(format!(
				"sample lengths differ: x={}, y={}, z={}",
				x.len(),
				y.len(),
				z.len()
			)));
		}
		if x.iter().chain(y).any(|v| !v.is_finite()) {
			return Err(OplotError::InvalidGridInput("non-finite sample coordinate".to_string()));
		}
		if self.resolution == 0 {
			return Err(OplotError::InvalidGridInput("resolution must be positive".to_string()));
		}
		if let Some((lo, hi)) = self.clip {
			if lo.is_nan() || hi.is_nan() || lo > hi {
				return Err(OplotError::InvalidGridInput(format!("invalid clip range ({}, {})", lo, hi)));
			}
		}
		Ok(())
	}
}

/// Interpolate with an explicit argument list, see [`GridInterpolator::interpolate`]
pub fn interpolate_grid(
	x: &[f64],
	y: &[f64],
	z: &[f64],
	resolution: usize,
	method: InterpolationMethod,
	clip: Option<(f64, f64)>,
) -> Result<ContourGrid> {
	GridInterpolator::new().resolution(resolution).method(method).clip(clip).interpolate(x, y, z)
}

/// Clamp every defined cell into `[lo, hi]`, leaving `NaN` cells untouched
pub fn clip_grid(grid: &mut Array2<f64>, lo: f64, hi: f64) {
	grid.mapv_inplace(|v| if v.is_nan() { v } else { v.clamp(lo, hi) });
}

fn fill<F: Fn([f64; 2]) -> f64>(
	x_axis: &Array1<f64>,
	y_axis: &Array1<f64>,
	norm: &Normalizer,
	f: F,
) -> Array2<f64> {
	Array2::from_shape_fn((y_axis.len(), x_axis.len()), |(j, i)| f(norm.apply(x_axis[i], y_axis[j])))
}

/// Value of the closest sample; ties go to the first one
fn nearest(samples: &[[f64; 2]], z: &[f64], p: [f64; 2]) -> f64 {
	let mut best = 0usize;
	let mut best_d = f64::INFINITY;
	for (i, s) in samples.iter().enumerate() {
		let d = (s[0] - p[0]).powi(2) + (s[1] - p[1]).powi(2);
		if d < best_d {
			best_d = d;
			best = i;
		}
	}
	z[best]
}
