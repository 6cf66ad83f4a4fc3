//! Assemble figures from a study

use std::path::PathBuf;

use log::info;

use crate::describe::describe_trials;
use crate::error::Result;
use crate::figure::{AxisConfig, ContourLayer, FigureSpec, HOVER_CLOSEST, Layer, MarkerLayer, MarkerStyle};
use crate::grid::{DEFAULT_RESOLUTION, GridInterpolator, InterpolationMethod};
use crate::render::{DisplayMode, PlotlyRenderer, Rendered, Renderer};
use crate::series::SeriesResolver;
use crate::trial::{ParamValue, TrialRecord, TrialSource};

/// Immutable plotting configuration
#[derive(Debug, Clone, PartialEq)]
pub struct OPlotConfig {
	/// Names of the objective values, by position. Empty means objectives
	/// cannot be referenced by name.
	pub objective_names: Vec<String>,
	pub display_mode: DisplayMode,
	/// Contour grid samples per axis
	pub resolution: usize,
	/// Popup output directory, see [`PlotlyRenderer::output_dir`]
	pub output_dir: Option<PathBuf>,
	/// Open popup figures in the browser
	pub open_browser: bool,
}

impl Default for OPlotConfig {
	fn default() -> Self {
		Self {
			objective_names: Vec::new(),
			display_mode: DisplayMode::default(),
			resolution: DEFAULT_RESOLUTION,
			output_dir: None,
			open_browser: true,
		}
	}
}

impl OPlotConfig {
	pub fn with_objective_names<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
		Self { objective_names: names.into_iter().map(Into::into).collect(), ..Self::default() }
	}
}

/// What to plot: two axes and an optional contour series
#[derive(Debug, Clone, PartialEq)]
pub struct PlotRequest {
	pub x_name: String,
	pub y_name: String,
	pub z_name: Option<String>,
	pub x_range: Option<(f64, f64)>,
	pub y_range: Option<(f64, f64)>,
	pub z_clip: Option<(f64, f64)>,
	pub interpolation: InterpolationMethod,
}

impl PlotRequest {
	pub fn new(x_name: impl Into<String>, y_name: impl Into<String>) -> Self {
		Self {
			x_name: x_name.into(),
			y_name: y_name.into(),
			z_name: None,
			x_range: None,
			y_range: None,
			z_clip: None,
			interpolation: InterpolationMethod::default(),
		}
	}
	pub fn z(mut self, name: impl Into<String>) -> Self {
		self.z_name = Some(name.into());
		self
	}
	pub fn x_range(mut self, lo: f64, hi: f64) -> Self {
		self.x_range = Some((lo, hi));
		self
	}
	pub fn y_range(mut self, lo: f64, hi: f64) -> Self {
		self.y_range = Some((lo, hi));
		self
	}
	pub fn z_clip(mut self, lo: f64, hi: f64) -> Self {
		self.z_clip = Some((lo, hi));
		self
	}
	pub fn interpolation(mut self, method: InterpolationMethod) -> Self {
		self.interpolation = method;
		self
	}

	pub fn title(&self) -> String {
		match &self.z_name {
			Some(z) => format!("{} vs {} with {}", self.x_name, self.y_name, z),
			None => format!("{} vs {}", self.x_name, self.y_name),
		}
	}
}

/// Exploratory plots over the trials of a study
#[derive(Debug, Clone)]
pub struct OPlot<'a, S: TrialSource> {
	study: &'a S,
	config: OPlotConfig,
}

impl<'a, S: TrialSource> OPlot<'a, S> {
	pub fn new(study: &'a S, config: OPlotConfig) -> Self {
		Self { study, config }
	}

	pub fn config(&self) -> &OPlotConfig {
		&self.config
	}

	pub fn resolver(&self) -> SeriesResolver<'_> {
		SeriesResolver::new(&self.config.objective_names)
	}

	/// COMPLETE trials, in study order
	pub fn completed_trials(&self) -> Vec<&'a S::Trial> {
		self.study.trials().iter().filter(|t| t.state().is_complete()).collect()
	}

	/// Series names usable on every complete trial
	pub fn keys(&self) -> Vec<String> {
		self.resolver().available_names(self.study.trials())
	}

	/// See [`SeriesResolver::resolve`]
	pub fn get_values<T: TrialRecord>(&self, trials: &[T], name: &str) -> Result<Vec<ParamValue>> {
		self.resolver().resolve(trials, name)
	}

	/// See [`describe_trials`]
	pub fn describe_trials<T: TrialRecord>(&self, trials: &[T]) -> Result<Vec<String>> {
		describe_trials(trials, &self.config.objective_names)
	}

	/// Build the figure for `request` without displaying it.
	///
	/// With a z series the figure holds an interpolated contour with the
	/// trial markers on top, otherwise just the markers.
	pub fn build_figure(&self, request: &PlotRequest) -> Result<FigureSpec> {
		let trials = self.completed_trials();
		let resolver = self.resolver();
		info!("building '{}' from {} complete trial(s)", request.title(), trials.len());

		let x = resolver.resolve_numeric(&trials, &request.x_name)?;
		let y = resolver.resolve_numeric(&trials, &request.y_name)?;
		let hover_text = self.describe_trials(&trials)?;

		let layers = match &request.z_name {
			Some(z_name) => {
				let z = resolver.resolve_numeric(&trials, z_name)?;
				let grid = GridInterpolator::new()
					.resolution(self.config.resolution)
					.method(request.interpolation)
					.clip(request.z_clip)
					.interpolate(&x, &y, &z)?;
				vec![
					Layer::Contour(ContourLayer::from_grid(&grid, z_name.as_str())),
					Layer::Markers(MarkerLayer { x, y, hover_text, style: MarkerStyle::Outlined }),
				]
			}
			None => vec![Layer::Markers(MarkerLayer { x, y, hover_text, style: MarkerStyle::Plain })],
		};

		Ok(FigureSpec {
			title: request.title(),
			layers,
			x_axis: AxisConfig { title: request.x_name.clone(), range: request.x_range },
			y_axis: AxisConfig { title: request.y_name.clone(), range: request.y_range },
			hover_mode: HOVER_CLOSEST.to_string(),
		})
	}

	/// Renderer matching the configured display mode
	pub fn renderer(&self) -> PlotlyRenderer {
		let renderer = PlotlyRenderer::new(self.config.display_mode).open_browser(
			self.config.display_mode == DisplayMode::Popup && self.config.open_browser,
		);
		match &self.config.output_dir {
			Some(dir) => renderer.output_dir(dir.clone()),
			None => renderer,
		}
	}

	/// Build and display the figure for `request`
	pub fn plot(&self, request: &PlotRequest) -> Result<Rendered> {
		let figure = self.build_figure(request)?;
		self.renderer().render(&figure)
	}
}
