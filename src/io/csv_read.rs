use std::path::Path;

use csv::{ReaderBuilder, Trim};

use crate::error::{Result, ToolError};
use crate::model::RewardRow;

/// Reads every row of a reward export into memory.
///
/// The file must carry `user`, `tvl_tier` and `prize` headers; other columns
/// are ignored. A missing file, a missing header, or a malformed row is
/// reported as [`ToolError::UnreadableInput`] for `path`.
pub fn read_rows(path: &Path) -> Result<Vec<RewardRow>> {
    let unreadable = |source: csv::Error| ToolError::UnreadableInput {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_path(path)
        .map_err(unreadable)?;

    reader
        .deserialize::<RewardRow>()
        .map(|row| row.map_err(unreadable))
        .collect()
}
