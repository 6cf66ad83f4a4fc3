use optunacy::{
	DisplayMode, InterpolationMethod, Layer, OPlot, OPlotConfig, OplotError, ParamValue, PlotRequest, Rendered,
	Study, Trial, TrialState,
};

/// Study with parameters a, b, c, user attributes p, q, r and three
/// objectives, plus one pruned trial
fn dummy_study() -> Study {
	Study::new(vec![
		Trial::new(0)
			.with_param("a", 1)
			.with_param("b", 2)
			.with_param("c", 3)
			.with_user_attr("p", 1)
			.with_user_attr("q", 2)
			.with_user_attr("r", 3)
			.with_values(vec![1, 2, 3]),
		Trial::new(1)
			.with_param("a", 4)
			.with_param("b", 5)
			.with_param("c", 6)
			.with_user_attr("p", 4)
			.with_user_attr("q", 5)
			.with_user_attr("r", 6)
			.with_values(vec![4, 5, 6]),
		Trial::new(2).with_state(TrialState::Pruned).with_param("a", 100),
		Trial::new(3)
			.with_param("a", 7)
			.with_param("b", 8)
			.with_param("c", 9)
			.with_user_attr("p", 7)
			.with_user_attr("q", 8)
			.with_user_attr("r", 9)
			.with_values(vec![7, 8, 9]),
	])
}

/// Same shape but with scattered (non-collinear) samples for contours
fn scattered_study() -> Study {
	let points = [(0.1, 3.0, 0.9), (0.5, 1.0, 0.4), (0.9, 4.0, 0.2), (0.3, 5.0, 0.7), (0.7, 2.5, 0.3)];
	Study::new(
		points
			.iter()
			.enumerate()
			.map(|(i, &(lr, depth, loss))| {
				Trial::new(i as u64)
					.with_param("lr", lr)
					.with_param("depth", depth)
					.with_user_attr("flops", depth * 1000.0)
					.with_values(vec![loss, loss * 2.0])
			})
			.collect(),
	)
}

fn ints(v: &[i64]) -> Vec<ParamValue> {
	v.iter().map(|&i| ParamValue::Int(i)).collect()
}

#[test]
fn test_get_keys() {
	let study = dummy_study();
	let oplot = OPlot::new(&study, OPlotConfig::with_objective_names(["x", "y", "z"]));
	assert_eq!(oplot.keys(), vec!["a", "b", "c", "p", "q", "r", "x", "y", "z"]);
}

#[test]
fn test_get_values() {
	let study = dummy_study();
	let oplot = OPlot::new(&study, OPlotConfig::with_objective_names(["x", "y", "z"]));
	for (name, expected) in [
		("a", [1, 4, 7]),
		("b", [2, 5, 8]),
		("c", [3, 6, 9]),
		("p", [1, 4, 7]),
		("q", [2, 5, 8]),
		("r", [3, 6, 9]),
		("x", [1, 4, 7]),
		("y", [2, 5, 8]),
		("z", [3, 6, 9]),
	] {
		assert_eq!(oplot.get_values(&study.trials, name).unwrap(), ints(&expected), "series {}", name);
	}
}

#[test]
fn test_get_values_without_objective_names() {
	let study = dummy_study();
	let oplot = OPlot::new(&study, OPlotConfig::default());
	assert!(matches!(oplot.get_values(&study.trials, "x"), Err(OplotError::NotFound { .. })));
}

#[test]
fn test_describe_trials() {
	let study = dummy_study();
	let oplot = OPlot::new(&study, OPlotConfig::with_objective_names(["x", "y", "z"]));
	assert_eq!(
		oplot.describe_trials(&oplot.completed_trials()).unwrap(),
		vec![
			"Trial: 0<br>a: 1<br>b: 2<br>c: 3<br><i>x: 1</i><br><i>y: 2</i><br><i>z: 3</i>",
			"Trial: 1<br>a: 4<br>b: 5<br>c: 6<br><i>x: 4</i><br><i>y: 5</i><br><i>z: 6</i>",
			"Trial: 3<br>a: 7<br>b: 8<br>c: 9<br><i>x: 7</i><br><i>y: 8</i><br><i>z: 9</i>",
		]
	);
}

#[test]
fn test_plot_figures() {
	let study = scattered_study();
	let oplot = OPlot::new(&study, OPlotConfig::with_objective_names(["loss", "cost"]));

	let scatter = oplot.build_figure(&PlotRequest::new("lr", "loss")).unwrap();
	assert_eq!(scatter.title, "lr vs loss");
	assert_eq!(scatter.layers.len(), 1);

	let contour = oplot
		.build_figure(&PlotRequest::new("flops", "lr").z("loss").x_range(0.0, 10000.0).y_range(0.0, 1.0))
		.unwrap();
	assert_eq!(contour.title, "flops vs lr with loss");
	assert_eq!(contour.x_axis.range, Some((0.0, 10000.0)));
	assert_eq!(contour.y_axis.range, Some((0.0, 1.0)));

	for method in [InterpolationMethod::Nearest, InterpolationMethod::Linear, InterpolationMethod::Cubic] {
		let figure = oplot
			.build_figure(&PlotRequest::new("lr", "depth").z("cost").z_clip(0.5, 1.5).interpolation(method))
			.unwrap();
		let grid = figure.contour_layer().unwrap();
		assert_eq!(grid.z.len(), 100);
		assert!(grid.z.iter().flatten().flatten().all(|v| (0.5..=1.5).contains(v)), "{}", method);
		match &figure.layers[1] {
			Layer::Markers(m) => assert_eq!(m.hover_text.len(), 5),
			other => panic!("expected markers on top, got {:?}", other),
		}
	}
}

#[test]
fn test_plot_collinear_contour_needs_nearest() {
	let study = dummy_study();
	let oplot = OPlot::new(&study, OPlotConfig::with_objective_names(["x", "y", "z"]));
	let linear = oplot.build_figure(&PlotRequest::new("a", "y").z("z"));
	assert!(matches!(linear, Err(OplotError::DegenerateSamples(_))));

	let nearest = oplot
		.build_figure(&PlotRequest::new("a", "y").z("z").interpolation(InterpolationMethod::Nearest))
		.unwrap();
	let grid = nearest.contour_layer().unwrap();
	assert!(grid.z.iter().flatten().all(|v| matches!(v, Some(z) if [3.0, 6.0, 9.0].contains(z))));
}

#[test]
fn test_plot_display_modes() {
	let study = scattered_study();

	let embedded = OPlot::new(
		&study,
		OPlotConfig { display_mode: DisplayMode::Embedded, ..OPlotConfig::with_objective_names(["loss", "cost"]) },
	);
	assert!(matches!(embedded.plot(&PlotRequest::new("lr", "depth").z("loss")), Ok(Rendered::Html(_))));

	let dir = tempfile::tempdir().unwrap();
	let popup = OPlot::new(
		&study,
		OPlotConfig {
			display_mode: DisplayMode::Popup,
			output_dir: Some(dir.path().to_path_buf()),
			open_browser: false,
			..OPlotConfig::with_objective_names(["loss", "cost"])
		},
	);
	match popup.plot(&PlotRequest::new("lr", "depth")).unwrap() {
		Rendered::File(path) => {
			assert_eq!(path, dir.path().join("lr_vs_depth.html"));
			assert!(path.exists());
		}
		other => panic!("expected a file, got {:?}", other),
	}
}

#[test]
fn test_figure_spec_serializes() {
	let study = scattered_study();
	let oplot = OPlot::new(&study, OPlotConfig::with_objective_names(["loss", "cost"]));
	let figure = oplot.build_figure(&PlotRequest::new("lr", "depth").z("loss")).unwrap();
	let json: serde_json::Value = serde_json::from_str(&figure.to_json().unwrap()).unwrap();
	assert_eq!(json["layers"][0]["kind"], "contour");
	assert_eq!(json["layers"][1]["kind"], "markers");
	assert_eq!(json["layers"][1]["style"], "outlined");
}
