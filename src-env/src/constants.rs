/// Environment variable pointing to the project root
pub const OPTUNACY_DIR_VAR: &str = "OPTUNACY_DIR";

/// Directory (relative to the project root) receiving generated files
pub const DATA_GENERATED: &str = "data_generated";

/// Sub-directory of [`DATA_GENERATED`] receiving rendered plots
pub const PLOTS: &str = "plots";
