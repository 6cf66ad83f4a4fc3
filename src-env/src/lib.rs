//! Environment utilities and constants for optunacy
//!
//! Binaries locate their output directories through the `OPTUNACY_DIR`
//! environment variable, which points to the project root.

pub mod constants;
pub mod env_utils;

pub use constants::*;
pub use env_utils::{EnvError, get_optunacy_dir, get_plots_dir, plots_dir_under};
