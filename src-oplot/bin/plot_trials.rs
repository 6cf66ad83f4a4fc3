use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::Parser;
use log::{info, warn};

use optunacy::{InterpolationMethod, OPlot, OPlotConfig, PlotRequest, Study, write_html_page};
use optunacy_env::get_plots_dir;

/// CLI arguments for plotting trials of a study
#[derive(Parser, Debug)]
#[command(name = "plot_trials")]
#[command(about = "Scatter and contour plots of optimization trials with Plotly")]
struct Args {
	/// Study snapshot in JSON: {"trials": [{"number", "state", "params", "user_attrs", "values"}]}
	study: PathBuf,

	/// Objective names, by position in each trial's values (comma-separated)
	#[arg(long, default_value = "")]
	objectives: String,

	/// Plot spec "x,y" or "x,y,z"; repeat for several figures
	#[arg(short, long = "plot")]
	plots: Vec<String>,

	/// X-axis range, "min,max" or "min max"
	#[arg(long, value_parser = parse_bounds, allow_hyphen_values = true)]
	x_range: Option<(f64, f64)>,

	/// Y-axis range, "min,max" or "min max"
	#[arg(long, value_parser = parse_bounds, allow_hyphen_values = true)]
	y_range: Option<(f64, f64)>,

	/// Clip contour values to "min,max" or "min max"
	#[arg(long, value_parser = parse_bounds, allow_hyphen_values = true)]
	z_clip: Option<(f64, f64)>,

	/// Contour interpolation: nearest, linear or cubic
	#[arg(short, long, default_value = "linear")]
	interpolation: String,

	/// Number of grid points along each axis
	#[arg(short, long, default_value = "100")]
	resolution: usize,

	/// Output HTML file (defaults to $OPTUNACY_DIR/data_generated/plots/<study>.html)
	#[arg(short, long)]
	output: Option<PathBuf>,

	/// Print the series names available for plotting and exit
	#[arg(long)]
	list: bool,
}

/// Two numbers separated by a comma or whitespace, optionally quoted
fn parse_bounds(arg: &str) -> Result<(f64, f64), String> {
	let inner = arg.trim().trim_matches(['\'', '"']);
	let (lo, hi) = inner
		.split_once(',')
		.or_else(|| inner.trim().split_once(char::is_whitespace))
		.ok_or_else(|| format!("expected 'min,max', got '{}'", arg))?;
	let number = |s: &str| s.trim().parse::<f64>().map_err(|e| format!("'{}': {}", s.trim(), e));
	Ok((number(lo)?, number(hi)?))
}

fn parse_plot_spec(spec: &str) -> Result<PlotRequest, Box<dyn Error>> {
	let names: Vec<&str> = spec.split(',').map(str::trim).filter(|s| !s.is_empty()).collect();
	match names.as_slice() {
		[x, y] => Ok(PlotRequest::new(*x, *y)),
		[x, y, z] => Ok(PlotRequest::new(*x, *y).z(*z)),
		_ => Err(format!("plot spec '{}' must be 'x,y' or 'x,y,z'", spec).into()),
	}
}

fn split_names(list: &str) -> Vec<String> {
	list.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect()
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
	let study = Study::from_json_reader(BufReader::new(File::open(&args.study)?))?;
	let config = OPlotConfig {
		resolution: args.resolution,
		..OPlotConfig::with_objective_names(split_names(&args.objectives))
	};
	let oplot = OPlot::new(&study, config);
	info!(
		"loaded {} trial(s), {} complete, from {}",
		study.trials.len(),
		oplot.completed_trials().len(),
		args.study.display()
	);

	if args.list {
		for name in oplot.keys() {
			println!("{}", name);
		}
		return Ok(());
	}

	if args.plots.is_empty() {
		return Err("nothing to plot: pass at least one --plot x,y[,z]".into());
	}

	let interpolation: InterpolationMethod = args.interpolation.parse()?;

	let mut figures = Vec::with_capacity(args.plots.len());
	for spec in &args.plots {
		let mut request = parse_plot_spec(spec)?.interpolation(interpolation);
		request.x_range = args.x_range;
		request.y_range = args.y_range;
		if request.z_name.is_some() {
			request.z_clip = args.z_clip;
		} else if args.z_clip.is_some() {
			warn!("--z-clip ignored for '{}' (no z series)", spec);
		}
		figures.push(oplot.build_figure(&request)?);
	}

	let stem = args.study.file_stem().and_then(|s| s.to_str()).unwrap_or("study").to_string();
	let output = match args.output {
		Some(path) => path,
		None => get_plots_dir()?.join(format!("{}.html", stem)),
	};
	write_html_page(&output, &stem, &figures)?;
	println!("Plots saved to: {}", output.display());
	Ok(())
}

fn main() {
	env_logger::init();
	let args = Args::parse();
	if let Err(e) = run(args) {
		eprintln!("Error: {}", e);
		std::process::exit(1);
	}
}
