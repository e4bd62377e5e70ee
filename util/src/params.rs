//! Generic parameters functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::de::DeserializeOwned;
use std::fs::read_to_string;
use std::path::PathBuf;
use thiserror::Error;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// An error that occurs during loading of a parameter file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("The software root environment variable ({}) is not set", crate::host::SW_ROOT_ENV_VAR)]
    SwRootNotSet,

    #[error("Cannot load the parameter file {0:?}: {1}")]
    FileLoadError(PathBuf, std::io::Error),

    #[error("Cannot read the parameter file: {0}")]
    DeserialiseError(toml::de::Error),
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the full path to a parameter file.
///
/// The file path is relative to the "params" directory under the software root.
pub fn path_of(param_file_path: &str) -> Result<PathBuf, LoadError> {
    let mut path = crate::host::get_sw_root().map_err(|_| LoadError::SwRootNotSet)?;
    path.push("params");
    path.push(param_file_path);

    Ok(path)
}

/// Load a parameter file
///
/// The file path is relative to the "params" directory under the software root.
pub fn load<P>(param_file_path: &str) -> Result<P, LoadError>
where
    P: DeserializeOwned,
{
    load_path(path_of(param_file_path)?)
}

/// Load a parameter file from an explicit path on disk.
pub fn load_path<P>(path: PathBuf) -> Result<P, LoadError>
where
    P: DeserializeOwned,
{
    let params_str = match read_to_string(&path) {
        Ok(s) => s,
        Err(e) => return Err(LoadError::FileLoadError(path, e)),
    };

    load_str(&params_str)
}

/// Parse parameters from a TOML string.
pub fn load_str<P>(params_str: &str) -> Result<P, LoadError>
where
    P: DeserializeOwned,
{
    toml::from_str(params_str).map_err(LoadError::DeserialiseError)
}

#[cfg(test)]
mod test {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Limits {
        max_speed_ms: f64,
        #[serde(default)]
        name: Option<String>,
    }

    #[test]
    fn test_load_str() {
        let limits: Limits = load_str("max_speed_ms = 1.5").unwrap();
        assert_eq!(
            limits,
            Limits {
                max_speed_ms: 1.5,
                name: None
            }
        );
    }

    #[test]
    fn test_load_str_bad_type() {
        let res: Result<Limits, _> = load_str("max_speed_ms = \"fast\"");
        assert!(matches!(res, Err(LoadError::DeserialiseError(_))));
    }

    #[test]
    fn test_load_path_missing_file() {
        let res: Result<Limits, _> = load_path(PathBuf::from("/nonexistent/limits.toml"));
        assert!(matches!(res, Err(LoadError::FileLoadError(_, _))));
    }
}
