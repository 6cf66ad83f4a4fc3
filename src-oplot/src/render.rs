//! plotly backend for [`FigureSpec`]

use std::path::{Path, PathBuf};

use build_html::*;
use plotly::common::{ColorScale, ColorScalePalette, Line, Marker, Mode, Title};
use plotly::contour::Contour;
use plotly::layout::{Annotation, Axis, HoverMode};
use plotly::{Layout, Plot, Scatter};
use serde::{Deserialize, Serialize};

use crate::error::{OplotError, Result};
use crate::figure::{AxisConfig, FigureSpec, Layer, MarkerLayer, MarkerStyle};

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-latest.min.js";
/// Marker position and trial label, without the trace name box.
/// Scatter traces carry no z, the contour reports its own value on hover.
const MARKER_HOVER: &str = "(%{x}, %{y})<br>%{text}<extra></extra>";

/// Where a rendered figure goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
	/// Inline HTML fragment for notebooks and reports
	Embedded,
	/// Standalone HTML file, optionally opened in the browser
	#[default]
	Popup,
}

/// Outcome of a render call
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
	Html(String),
	File(PathBuf),
}

/// Anything able to display a [`FigureSpec`]
pub trait Renderer {
	fn render(&self, figure: &FigureSpec) -> Result<Rendered>;
}

/// Renders figures through plotly
#[derive(Debug, Clone, Default)]
pub struct PlotlyRenderer {
	pub mode: DisplayMode,
	/// Popup output directory; falls back to the project plots directory
	pub output_dir: Option<PathBuf>,
	pub open_browser: bool,
}

impl PlotlyRenderer {
	pub fn new(mode: DisplayMode) -> Self {
		Self { mode, output_dir: None, open_browser: mode == DisplayMode::Popup }
	}

	pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
		self.output_dir = Some(dir.into());
		self
	}

	pub fn open_browser(mut self, v: bool) -> Self {
		self.open_browser = v;
		self
	}

	fn popup_dir(&self) -> Result<PathBuf> {
		match &self.output_dir {
			Some(dir) => Ok(dir.clone()),
			None => Ok(optunacy_env::get_plots_dir()?),
		}
	}
}

impl Renderer for PlotlyRenderer {
	fn render(&self, figure: &FigureSpec) -> Result<Rendered> {
		let plot = to_plotly(figure);
		match self.mode {
			DisplayMode::Embedded => Ok(Rendered::Html(plot.to_inline_html(Some(&file_stem(&figure.title))))),
			DisplayMode::Popup => {
				let dir = self.popup_dir()?;
				let path = dir.join(format!("{}.html", file_stem(&figure.title)));
				write_file(&path, &plot.to_html())?;
				log::info!("wrote {}", path.display());
				if self.open_browser {
					plot.show();
				}
				Ok(Rendered::File(path))
			}
		}
	}
}

/// Title turned into something usable as a file name or div id
pub fn file_stem(title: &str) -> String {
	title.chars().map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' }).collect()
}

fn write_file(path: &Path, content: &str) -> Result<()> {
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).map_err(|source| OplotError::Io { path: parent.to_path_buf(), source })?;
	}
	std::fs::write(path, content).map_err(|source| OplotError::Io { path: path.to_path_buf(), source })
}

fn axis(config: &AxisConfig) -> Axis {
	let axis = Axis::new().title(Title::with_text(config.title.as_str()));
	match config.range {
		Some((lo, hi)) => axis.range(vec![lo, hi]),
		None => axis,
	}
}

fn markers(layer: &MarkerLayer) -> Box<Scatter<f64, f64>> {
	let marker = match layer.style {
		MarkerStyle::Plain => Marker::new().color("blue"),
		MarkerStyle::Outlined => Marker::new().color("white").size(5).line(Line::new().color("black").width(3.0)),
	};
	Scatter::new(layer.x.clone(), layer.y.clone())
		.mode(Mode::Markers)
		.marker(marker)
		.text_array(layer.hover_text.clone())
		.hover_template(MARKER_HOVER)
		.show_legend(false)
}

/// Translate a figure description into a plotly plot
pub fn to_plotly(figure: &FigureSpec) -> Plot {
	let mut plot = Plot::new();
	let mut annotations = Vec::new();

	for layer in &figure.layers {
		match layer {
			Layer::Contour(c) => {
				let contour = Contour::new(c.x.clone(), c.y.clone(), c.z.clone())
					.color_scale(ColorScale::Palette(ColorScalePalette::Viridis))
					.name(c.color_bar_title.as_str());
				plot.add_trace(contour);

				// vertical label just right of the colour bar
				annotations.push(
					Annotation::new()
						.text(c.color_bar_title.as_str())
						.show_arrow(false)
						.x_ref("paper")
						.y_ref("paper")
						.x(1.03)
						.y(0.5)
						.text_angle(-90.0),
				);
			}
			Layer::Markers(m) => plot.add_trace(markers(m)),
		}
	}

	let mut layout = Layout::new()
		.title(Title::with_text(figure.title.as_str()))
		.x_axis(axis(&figure.x_axis))
		.y_axis(axis(&figure.y_axis))
		.hover_mode(HoverMode::Closest);
	if !annotations.is_empty() {
		layout = layout.annotations(annotations);
	}
	plot.set_layout(layout);
	plot
}

/// Standalone HTML page holding several figures
pub fn html_page(title: &str, figures: &[FigureSpec]) -> String {
	let page = figures.iter().fold(
		HtmlPage::new().with_title(title).with_script_link(PLOTLY_CDN),
		|page, figure| page.with_raw(to_plotly(figure).to_inline_html(Some(&file_stem(&figure.title)))),
	);
	page.to_html_string()
}

/// Write [`html_page`] to `path`, creating parent directories
pub fn write_html_page(path: &Path, title: &str, figures: &[FigureSpec]) -> Result<()> {
	write_file(path, &html_page(title, figures))
}
