use std::path::PathBuf;

/// Errors raised while extracting series and preparing figures
#[derive(Debug, thiserror::Error)]
pub enum OplotError {
	#[error("'{name}' not found in trial parameters, user attributes or objective names")]
	NotFound { name: String },

	#[error(
		"trial {trial} has {len} objective value(s) but objective '{name}' is at position {index}"
	)]
	ObjectiveIndex { trial: u64, name: String, index: usize, len: usize },

	#[error("value of '{name}' in trial {trial} is not numeric")]
	NonNumeric { name: String, trial: u64 },

	#[error("invalid interpolation input: {0}")]
	InvalidGridInput(String),

	#[error("cannot triangulate samples: {0}")]
	DegenerateSamples(String),

	#[error("unknown interpolation method '{0}' (expected nearest, linear or cubic)")]
	UnknownMethod(String),

	#[error("failed to write {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error(transparent)]
	Env(#[from] optunacy_env::EnvError),

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, OplotError>;
