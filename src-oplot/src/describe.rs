//! Hover labels for trial markers

use crate::error::{OplotError, Result};
use crate::format::format_value;
use crate::trial::TrialRecord;

/// Line break in plotly hover markup
pub const LINE_BREAK: &str = "<br>";

/// Build one label per trial, in the order given.
///
/// No state filtering happens here; callers pass the trials they plot.
/// A label reads `Trial: 3<br>lr: 0.0100<br><i>loss: 0.2500</i>`: the
/// trial number, each parameter in insertion order, then each objective
/// in italics.
pub fn describe_trials<T: TrialRecord>(trials: &[T], objective_names: &[String]) -> Result<Vec<String>> {
	trials.iter().map(|trial| describe_trial(trial, objective_names)).collect()
}

/// Label for a single trial, see [`describe_trials`]
pub fn describe_trial<T: TrialRecord>(trial: &T, objective_names: &[String]) -> Result<String> {
	let mut desc = format!("Trial: {}", trial.number());
	for (key, value) in trial.params().iter() {
		desc.push_str(LINE_BREAK);
		desc.push_str(&format!("{}: {}", key, format_value(value)));
	}
	let values = trial.values();
	for (index, name) in objective_names.iter().enumerate() {
		let value = values.get(index).ok_or_else(|| OplotError::ObjectiveIndex {
			trial: trial.number(),
			name: name.clone(),
			index,
			len: values.len(),
		})?;
		desc.push_str(LINE_BREAK);
		desc.push_str(&format!("<i>{}: {}</i>", name, format_value(value)));
	}
	Ok(desc)
}
