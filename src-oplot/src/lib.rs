//! optunacy - exploratory plots over optimization trials
//!
//! Extracts named series from a study's completed trials (parameters, user
//! attributes or objectives), builds hover labels, interpolates contour grids
//! from scattered samples and assembles renderer-agnostic figures that plotly
//! displays.
//!
//! # Example
//!
//! ```rust
//! use optunacy::*;
//!
//! let study = Study::new(vec![
//!     Trial::new(0).with_param("lr", 0.01).with_param("depth", 3).with_values(vec![0.40]),
//!     Trial::new(1).with_param("lr", 0.10).with_param("depth", 5).with_values(vec![0.25]),
//!     Trial::new(2).with_param("lr", 0.05).with_param("depth", 8).with_values(vec![0.30]),
//! ]);
//! let oplot = OPlot::new(&study, OPlotConfig::with_objective_names(["loss"]));
//!
//! let figure = oplot.build_figure(&PlotRequest::new("lr", "depth").z("loss"))?;
//! assert_eq!(figure.title, "lr vs depth with loss");
//! # Ok::<(), OplotError>(())
//! ```

/// Hover labels for trial markers
pub mod describe;
/// Error type shared by the crate
pub mod error;
/// Renderer-agnostic figure description
pub mod figure;
/// Display formatting of trial values
pub mod format;
/// Scattered-data interpolation onto regular grids
pub mod grid;
/// Figure assembly from a study
pub mod oplot;
/// plotly rendering
pub mod render;
/// Series resolution across trials
pub mod series;
/// Trial records and studies
pub mod trial;

pub use describe::{describe_trial, describe_trials};
pub use error::OplotError;
pub use figure::{AxisConfig, ContourLayer, FigureSpec, Layer, MarkerLayer, MarkerStyle};
pub use format::format_value;
pub use grid::{ContourGrid, GridInterpolator, InterpolationMethod, clip_grid, interpolate_grid};
pub use oplot::{OPlot, OPlotConfig, PlotRequest};
pub use render::{DisplayMode, PlotlyRenderer, Rendered, Renderer, html_page, to_plotly, write_html_page};
pub use series::SeriesResolver;
pub use trial::{ParamValue, Params, Study, Trial, TrialRecord, TrialSource, TrialState};
