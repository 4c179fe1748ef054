//! Dry-run unified diff support for `pagegen diff`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use similar::TextDiff;

use crate::error::{io_err, PipelineError};
use crate::store::BuildStore;

/// A single rendered file diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub path: PathBuf,
    pub unified_diff: String,
}

/// Compare every document in `builds` with the file of the same name under
/// `output_dir`. Files that would not change are left out.
///
/// No files are written. A missing file diffs against empty content.
pub fn diff_builds(builds: &BuildStore, output_dir: &Path) -> Result<Vec<FileDiff>, PipelineError> {
    let mut diffs = Vec::new();
    for filename in builds.filenames() {
        let Some(rendered) = builds.snapshot(&filename) else {
            continue;
        };
        let path = output_dir.join(&filename);
        let existing = read_existing_or_empty(&path)?;
        if existing == rendered {
            continue;
        }

        let old_header = format!("a/{filename}");
        let new_header = format!("b/{filename}");
        let unified = TextDiff::from_lines(&existing, &rendered)
            .unified_diff()
            .header(&old_header, &new_header)
            .context_radius(3)
            .to_string();

        diffs.push(FileDiff {
            path,
            unified_diff: unified,
        });
    }
    Ok(diffs)
}

fn read_existing_or_empty(path: &Path) -> Result<String, PipelineError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(err) => Err(io_err(path, err)),
    }
}
