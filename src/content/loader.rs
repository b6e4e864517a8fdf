//! Loader for the RON tuning file at startup.

use ron::Options;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use super::TuningFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadErrorKind {
    Missing,
    Io,
    Parse,
}

/// Error type for tuning loading failures.
#[derive(Debug)]
pub struct TuningLoadError {
    pub file: String,
    pub kind: LoadErrorKind,
    pub message: String,
}

impl std::fmt::Display for TuningLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to load {}: {}", self.file, self.message)
    }
}

impl std::error::Error for TuningLoadError {}

/// Create RON options with extensions enabled for more flexible parsing.
fn ron_options() -> Options {
    Options::default().with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
}

/// Parse tuning from RON text. Missing fields keep their defaults.
pub fn parse_tuning(file_name: &str, contents: &str) -> Result<TuningFile, TuningLoadError> {
    ron_options()
        .from_str(contents)
        .map_err(|e| TuningLoadError {
            file: file_name.to_string(),
            kind: LoadErrorKind::Parse,
            message: format!("Parse error: {}", e),
        })
}

/// Load the tuning file at `path`.
pub fn load_tuning_file(path: &Path) -> Result<TuningFile, TuningLoadError> {
    let file_name = path.display().to_string();
    let contents = fs::read_to_string(path).map_err(|e| TuningLoadError {
        file: file_name.clone(),
        kind: if e.kind() == ErrorKind::NotFound {
            LoadErrorKind::Missing
        } else {
            LoadErrorKind::Io
        },
        message: format!("IO error: {}", e),
    })?;

    parse_tuning(&file_name, &contents)
}
