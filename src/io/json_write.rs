use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::{Result, ToolError};

/// Pretty-printed JSON written next to its target but not yet visible under
/// the target name. Dropping it without [`StagedJson::commit`] removes the
/// staged file.
#[derive(Debug)]
pub struct StagedJson {
    file: NamedTempFile,
    target: PathBuf,
}

impl StagedJson {
    /// Moves the staged file onto its target path.
    pub fn commit(self) -> Result<()> {
        let target = self.target;
        self.file
            .persist(&target)
            .map(|_| ())
            .map_err(|error| ToolError::WriteFailure {
                path: target,
                source: error.error,
            })
    }
}

/// Serializes `value` into a temporary file in the directory of `path`.
pub fn stage_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<StagedJson> {
    let write_failure = |source: std::io::Error| ToolError::WriteFailure {
        path: path.to_path_buf(),
        source,
    };

    let json_string = serde_json::to_string_pretty(value)?;
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(directory).map_err(write_failure)?;
    file.write_all(json_string.as_bytes())
        .and_then(|()| file.flush())
        .map_err(write_failure)?;

    Ok(StagedJson {
        file,
        target: path.to_path_buf(),
    })
}

