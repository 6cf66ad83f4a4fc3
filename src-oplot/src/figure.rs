//! Renderer-agnostic figure description
//!
//! A [`FigureSpec`] carries everything a plotting backend needs: layers,
//! axis configuration, title and hover text. It serializes to JSON so other
//! collaborators can consume it without linking plotly.

use serde::{Deserialize, Serialize};

use crate::grid::ContourGrid;

/// Closest-point hover, the only mode the assembler emits
pub const HOVER_CLOSEST: &str = "closest";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerStyle {
	/// Blue markers, used when markers are the only layer
	Plain,
	/// White markers with a black outline, drawn over a contour
	Outlined,
}

/// One marker per trial with its hover label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerLayer {
	pub x: Vec<f64>,
	pub y: Vec<f64>,
	pub hover_text: Vec<String>,
	pub style: MarkerStyle,
}

/// Filled contour over an interpolated grid; `None` cells are undefined
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContourLayer {
	pub x: Vec<f64>,
	pub y: Vec<f64>,
	pub z: Vec<Vec<Option<f64>>>,
	/// Label shown beside the colour bar
	pub color_bar_title: String,
}

impl ContourLayer {
	pub fn from_grid(grid: &ContourGrid, color_bar_title: impl Into<String>) -> Self {
		Self {
			x: grid.x_axis.to_vec(),
			y: grid.y_axis.to_vec(),
			z: grid.z_rows(),
			color_bar_title: color_bar_title.into(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Layer {
	Markers(MarkerLayer),
	Contour(ContourLayer),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisConfig {
	pub title: String,
	/// Explicit (min, max); `None` lets the renderer auto-scale
	pub range: Option<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureSpec {
	pub title: String,
	/// Drawn in order, later layers on top
	pub layers: Vec<Layer>,
	pub x_axis: AxisConfig,
	pub y_axis: AxisConfig,
	pub hover_mode: String,
}

impl FigureSpec {
	pub fn marker_layers(&self) -> impl Iterator<Item = &MarkerLayer> {
		self.layers.iter().filter_map(|l| match l {
			Layer::Markers(m) => Some(m),
			_ => None,
		})
	}

	pub fn contour_layer(&self) -> Option<&ContourLayer> {
		self.layers.iter().find_map(|l| match l {
			Layer::Contour(c) => Some(c),
			_ => None,
		})
	}

	pub fn to_json(&self) -> serde_json::Result<String> {
		serde_json::to_string(self)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_layer_json_is_tagged() {
		let spec = FigureSpec {
			title: "a vs b".to_string(),
			layers: vec![Layer::Markers(MarkerLayer {
				x: vec![1.0],
				y: vec![2.0],
				hover_text: vec!["Trial: 0".to_string()],
				style: MarkerStyle::Plain,
			})],
			x_axis: AxisConfig { title: "a".to_string(), range: Some((0.0, 10.0)) },
			y_axis: AxisConfig { title: "b".to_string(), range: None },
			hover_mode: HOVER_CLOSEST.to_string(),
		};
		let json: serde_json::Value = serde_json::from_str(&spec.to_json().unwrap()).unwrap();
		assert_eq!(json["layers"][0]["kind"], "markers");
		assert_eq!(json["layers"][0]["style"], "plain");
		assert_eq!(json["x_axis"]["range"], serde_json::json!([0.0, 10.0]));
		assert!(json["y_axis"]["range"].is_null());
		assert!(spec.contour_layer().is_none());
		assert_eq!(spec.marker_layers().count(), 1);
	}
}
