// packer-template/src/config.rs

use std::{fs, path::Path};

use crate::{
    error::{GeneratorError, Result},
    params::BuildParameters,
};

/// Read build parameters from a `.yaml`/`.yml`, `.json` or `.toml` file.
pub fn load_parameters(path: impl AsRef<Path>) -> Result<BuildParameters> {
    let path = path.as_ref();
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();
    // reject before touching the file system
    if !matches!(ext.as_str(), "yaml" | "yml" | "json" | "toml") {
        return Err(GeneratorError::UnsupportedFormat { path: path.to_path_buf() });
    }
    let text = fs::read_to_string(path).map_err(|e| GeneratorError::io(path, e))?;
    let parse_err = |message: String| GeneratorError::Parse { path: path.to_path_buf(), message };
    let params: BuildParameters = match ext.as_str() {
        "yaml" | "yml" => serde_yml::from_str(&text).map_err(|e| parse_err(e.to_string()))?,
        "json" => serde_json::from_str(&text).map_err(|e| parse_err(e.to_string()))?,
        _ => toml::from_str(&text).map_err(|e| parse_err(e.to_string()))?,
    };
    tracing::debug!(path = %path.display(), "loaded build parameters");
    Ok(params)
}
