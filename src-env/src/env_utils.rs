//! Environment variable utilities for optunacy
//!
//! This module provides utilities for handling environment variables,
//! particularly the OPTUNACY_DIR variable that points to the project root.

use crate::constants::{DATA_GENERATED, OPTUNACY_DIR_VAR, PLOTS};
use std::env;
use std::path::{Path, PathBuf};

/// Error type for environment variable issues
#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    #[error(
        "OPTUNACY_DIR environment variable is not set. Please set it to the project root directory (e.g., export OPTUNACY_DIR=/path/to/project)"
    )]
    OptunacyDirNotSet,

    #[error("OPTUNACY_DIR points to a non-existent directory: {0}")]
    OptunacyDirNotFound(PathBuf),

    #[error("Failed to create directory {0}: {1}")]
    DirectoryCreationFailed(PathBuf, std::io::Error),
}

/// Get the OPTUNACY_DIR environment variable and validate it exists
///
/// # Errors
///
/// Returns an error if:
/// - OPTUNACY_DIR is not set
/// - OPTUNACY_DIR points to a non-existent directory
///
/// # Example
///
/// ```no_run
/// use optunacy_env::env_utils::get_optunacy_dir;
///
/// let root = get_optunacy_dir()?;
/// println!("Project directory: {}", root.display());
/// # Ok::<(), optunacy_env::env_utils::EnvError>(())
/// ```
pub fn get_optunacy_dir() -> Result<PathBuf, EnvError> {
    let root = env::var(OPTUNACY_DIR_VAR).map_err(|_| EnvError::OptunacyDirNotSet)?;

    let path = PathBuf::from(root);

    if !path.exists() {
        return Err(EnvError::OptunacyDirNotFound(path));
    }

    Ok(path)
}

fn ensure_dir(path: PathBuf) -> Result<PathBuf, EnvError> {
    if !path.exists() {
        std::fs::create_dir_all(&path)
            .map_err(|e| EnvError::DirectoryCreationFailed(path.clone(), e))?;
    }
    Ok(path)
}

/// Get the path to the plots subdirectory within data_generated
///
/// This is where rendered HTML figures land when no explicit output
/// path is given.
///
/// ```no_run
/// use optunacy_env::env_utils::get_plots_dir;
///
/// let plots = get_plots_dir()?;
/// println!("Plots directory: {}", plots.display());
/// # Ok::<(), optunacy_env::env_utils::EnvError>(())
/// ```
pub fn get_plots_dir() -> Result<PathBuf, EnvError> {
    plots_dir_under(&get_optunacy_dir()?)
}

/// Plots directory below an explicit project root, creating it if necessary
pub fn plots_dir_under(root: &Path) -> Result<PathBuf, EnvError> {
    ensure_dir(root.join(DATA_GENERATED).join(PLOTS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Tests below mutate the process environment
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn with_var<F: FnOnce()>(value: Option<&str>, f: F) {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let original = env::var(OPTUNACY_DIR_VAR).ok();
        unsafe {
            match value {
                Some(v) => env::set_var(OPTUNACY_DIR_VAR, v),
                None => env::remove_var(OPTUNACY_DIR_VAR),
            }
        }
        f();
        unsafe {
            match original {
                Some(v) => env::set_var(OPTUNACY_DIR_VAR, v),
                None => env::remove_var(OPTUNACY_DIR_VAR),
            }
        }
    }

    #[test]
    fn test_optunacy_dir_not_set() {
        with_var(None, || {
            let result = get_optunacy_dir();
            assert!(matches!(result, Err(EnvError::OptunacyDirNotSet)));
        });
    }

    #[test]
    fn test_optunacy_dir_nonexistent() {
        with_var(Some("/this/path/should/not/exist"), || {
            let result = get_optunacy_dir();
            assert!(matches!(result, Err(EnvError::OptunacyDirNotFound(_))));
        });
    }

    #[test]
    fn test_plots_dir_is_created() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().to_string_lossy().to_string();
        with_var(Some(&root), || {
            let plots = get_plots_dir().unwrap();
            assert!(plots.is_dir());
            assert!(plots.ends_with("data_generated/plots"));
        });
    }

    #[test]
    fn test_plots_dir_under_explicit_root() {
        let tmp = tempfile::tempdir().unwrap();
        let plots = plots_dir_under(tmp.path()).unwrap();
        assert_eq!(plots, tmp.path().join(DATA_GENERATED).join(PLOTS));
        assert!(plots.is_dir());
    }
}
