//! Resolve a named series across the completed trials of a study

use log::debug;

use crate::error::{OplotError, Result};
use crate::trial::{ParamValue, TrialRecord};

/// Looks names up in parameters, then user attributes, then objectives.
///
/// Later sources win on collision: a user attribute shadows a parameter of
/// the same name and an objective shadows both.
#[derive(Debug, Clone, Copy)]
pub struct SeriesResolver<'a> {
	objective_names: &'a [String],
}

impl<'a> SeriesResolver<'a> {
	pub fn new(objective_names: &'a [String]) -> Self {
		Self { objective_names }
	}

	pub fn objective_names(&self) -> &'a [String] {
		self.objective_names
	}

	/// Value of `name` in one trial, `Ok(None)` when the trial does not carry it.
	///
	/// Fails when `name` is an objective whose position lies past the end of
	/// the trial's values.
	pub fn lookup<'t, T: TrialRecord>(&self, trial: &'t T, name: &str) -> Result<Option<&'t ParamValue>> {
		// duplicated objective names: the last position wins
		if let Some(index) = self.objective_names.iter().rposition(|n| n == name) {
			let values = trial.values();
			return match values.get(index) {
				Some(v) => Ok(Some(v)),
				None => Err(OplotError::ObjectiveIndex {
					trial: trial.number(),
					name: name.to_string(),
					index,
					len: values.len(),
				}),
			};
		}
		Ok(trial.user_attrs().get(name).or_else(|| trial.params().get(name)))
	}

	/// Values of `name` across all COMPLETE trials, in trial order.
	///
	/// Non-complete trials are skipped. The first complete trial lacking the
	/// name aborts the whole call with [`OplotError::NotFound`].
	pub fn resolve<T: TrialRecord>(&self, trials: &[T], name: &str) -> Result<Vec<ParamValue>> {
		let mut values = Vec::with_capacity(trials.len());
		for trial in trials.iter().filter(|t| t.state().is_complete()) {
			match self.lookup(trial, name)? {
				Some(v) => values.push(v.clone()),
				None => {
					debug!("trial {} has no value for '{}'", trial.number(), name);
					return Err(OplotError::NotFound { name: name.to_string() });
				}
			}
		}
		debug!("resolved '{}' over {} complete trial(s)", name, values.len());
		Ok(values)
	}

	/// Like [`resolve`](Self::resolve) but converted for a numeric axis.
	pub fn resolve_numeric<T: TrialRecord>(&self, trials: &[T], name: &str) -> Result<Vec<f64>> {
		let completed = trials.iter().filter(|t| t.state().is_complete());
		let values = self.resolve(trials, name)?;
		values
			.iter()
			.zip(completed)
			.map(|(v, trial)| {
				v.as_f64().ok_or_else(|| OplotError::NonNumeric {
					name: name.to_string(),
					trial: trial.number(),
				})
			})
			.collect()
	}

	/// Names that resolve in every COMPLETE trial.
	///
	/// Candidates come from the first complete trial: its parameters, then
	/// its user attributes, then the objective names, without duplicates.
	pub fn available_names<T: TrialRecord>(&self, trials: &[T]) -> Vec<String> {
		let mut completed = trials.iter().filter(|t| t.state().is_complete()).peekable();
		let Some(first) = completed.peek() else {
			return Vec::new();
		};

		let mut candidates: Vec<String> = Vec::new();
		let keys = first
			.params()
			.keys()
			.chain(first.user_attrs().keys())
			.chain(self.objective_names.iter().map(String::as_str));
		for key in keys {
			if !candidates.iter().any(|c| c == key) {
				candidates.push(key.to_string());
			}
		}

		let completed: Vec<&T> = completed.collect();
		candidates
			.into_iter()
			.filter(|name| {
				completed.iter().all(|t| matches!(self.lookup(*t, name), Ok(Some(_))))
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::trial::{Trial, TrialState};

	fn names(v: &[&str]) -> Vec<String> {
		v.iter().map(|s| s.to_string()).collect()
	}

	fn study() -> Vec<Trial> {
		vec![
			Trial::new(0).with_param("a", 1).with_param("b", 2).with_user_attr("p", 10).with_values(vec![1, 2]),
			Trial::new(1).with_param("a", 4).with_param("b", 5).with_user_attr("p", 40).with_values(vec![4, 5]),
			Trial::new(2).with_state(TrialState::Failed).with_param("a", 99),
			Trial::new(3).with_param("a", 7).with_param("b", 8).with_user_attr("p", 70).with_values(vec![7, 8]),
		]
	}

	#[test]
	fn test_resolve_each_source() {
		let objectives = names(&["x", "y"]);
		let resolver = SeriesResolver::new(&objectives);
		let trials = study();

		let ints = |v: &[i64]| v.iter().map(|&i| ParamValue::Int(i)).collect::<Vec<_>>();
		assert_eq!(resolver.resolve(&trials, "a").unwrap(), ints(&[1, 4, 7]));
		assert_eq!(resolver.resolve(&trials, "p").unwrap(), ints(&[10, 40, 70]));
		assert_eq!(resolver.resolve(&trials, "y").unwrap(), ints(&[2, 5, 8]));
	}

	#[test]
	fn test_resolve_skips_non_complete_trials() {
		let objectives = names(&["x", "y"]);
		let resolver = SeriesResolver::new(&objectives);
		let values = resolver.resolve(&study(), "a").unwrap();
		assert_eq!(values.len(), 3);
		assert!(!values.contains(&ParamValue::Int(99)));
	}

	#[test]
	fn test_resolve_precedence_objectives_win() {
		let objectives = names(&["k"]);
		let resolver = SeriesResolver::new(&objectives);
		let trials = vec![Trial::new(0).with_param("k", 1).with_user_attr("k", 2).with_values(vec![3])];
		assert_eq!(resolver.resolve(&trials, "k").unwrap(), vec![ParamValue::Int(3)]);

		let no_objectives: Vec<String> = Vec::new();
		let resolver = SeriesResolver::new(&no_objectives);
		assert_eq!(resolver.resolve(&trials, "k").unwrap(), vec![ParamValue::Int(2)]);
	}

	#[test]
	fn test_resolve_fails_fast_on_partial_name() {
		let objectives: Vec<String> = Vec::new();
		let resolver = SeriesResolver::new(&objectives);
		let trials = vec![
			Trial::new(0).with_param("lr", 0.1),
			Trial::new(1).with_param("momentum", 0.9),
			Trial::new(2).with_param("lr", 0.3),
		];
		match resolver.resolve(&trials, "lr") {
			Err(OplotError::NotFound { name }) => assert_eq!(name, "lr"),
			other => panic!("expected NotFound, got {:?}", other),
		}
		let err = resolver.resolve(&trials, "lr").unwrap_err();
		assert!(err.to_string().contains("'lr'"));
	}

	#[test]
	fn test_resolve_ignores_missing_name_on_pruned_trials() {
		let objectives: Vec<String> = Vec::new();
		let resolver = SeriesResolver::new(&objectives);
		let trials = vec![
			Trial::new(0).with_param("lr", 0.1),
			Trial::new(1).with_state(TrialState::Pruned),
		];
		assert_eq!(resolver.resolve(&trials, "lr").unwrap(), vec![ParamValue::Float(0.1)]);
	}

	#[test]
	fn test_objective_names_empty_never_resolve_values() {
		let objectives: Vec<String> = Vec::new();
		let resolver = SeriesResolver::new(&objectives);
		let trials = vec![Trial::new(0).with_values(vec![1.5])];
		assert!(matches!(resolver.resolve(&trials, "x"), Err(OplotError::NotFound { .. })));
	}

	#[test]
	fn test_short_values_is_an_index_error() {
		let objectives = names(&["loss", "latency"]);
		let resolver = SeriesResolver::new(&objectives);
		let trials = vec![Trial::new(5).with_param("lr", 0.1).with_values(vec![0.3])];

		match resolver.resolve(&trials, "latency") {
			Err(OplotError::ObjectiveIndex { trial, index, len, .. }) => {
				assert_eq!((trial, index, len), (5, 1, 1));
			}
			other => panic!("expected ObjectiveIndex, got {:?}", other),
		}
		// names that do not overlay a missing position still resolve
		assert!(resolver.resolve(&trials, "loss").is_ok());
		assert!(resolver.resolve(&trials, "lr").is_ok());
	}

	#[test]
	fn test_duplicate_objective_name_last_position_wins() {
		let objectives = names(&["v", "v"]);
		let resolver = SeriesResolver::new(&objectives);
		let trials = vec![Trial::new(0).with_values(vec![1, 2])];
		assert_eq!(resolver.resolve(&trials, "v").unwrap(), vec![ParamValue::Int(2)]);
	}

	#[test]
	fn test_resolve_numeric_rejects_strings() {
		let objectives: Vec<String> = Vec::new();
		let resolver = SeriesResolver::new(&objectives);
		let trials = vec![
			Trial::new(0).with_param("opt", "adam").with_param("lr", 0.1),
			Trial::new(1).with_param("opt", "sgd").with_param("lr", 0.2),
		];
		assert_eq!(resolver.resolve_numeric(&trials, "lr").unwrap(), vec![0.1, 0.2]);
		match resolver.resolve_numeric(&trials, "opt") {
			Err(OplotError::NonNumeric { name, trial }) => {
				assert_eq!(name, "opt");
				assert_eq!(trial, 0);
			}
			other => panic!("expected NonNumeric, got {:?}", other),
		}
	}

	#[test]
	fn test_available_names() {
		let objectives = names(&["x", "y"]);
		let resolver = SeriesResolver::new(&objectives);
		let mut trials = study();
		trials.push(Trial::new(4).with_param("a", 0).with_user_attr("p", 0).with_values(vec![0, 0]));
		assert_eq!(resolver.available_names(&trials), names(&["a", "p", "x", "y"]));
		assert_eq!(resolver.available_names(&trials[..2]), names(&["a", "b", "p", "x", "y"]));
		assert!(resolver.available_names::<Trial>(&[]).is_empty());
	}
}
