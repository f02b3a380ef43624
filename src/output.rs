use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::CardError;

/// Writes `contents` to `path`, creating parent directories as needed.
///
/// The document goes to a sibling temp file first and is renamed into place,
/// so a failed write never leaves a truncated card behind.
pub fn write_card(path: &Path, contents: &str) -> Result<(), CardError> {
    let output_err = |source: std::io::Error| CardError::Output {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(output_err)?;
    }

    let temp_path = path.with_extension("svg.tmp");
    let staged = fs::write(&temp_path, contents).and_then(|()| fs::rename(&temp_path, path));
    if let Err(e) = staged {
        // Clean up a partial or orphaned temp file whichever step failed.
        let _ = fs::remove_file(&temp_path);
        return Err(output_err(e));
    }

    info!(path = %path.display(), bytes = contents.len(), "card written");
    Ok(())
}
