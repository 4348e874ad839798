//! CSV file persister.
//!
//! Implements [`Persister`] by rewriting the whole table on every call:
//!
//! ```text
//! Timestamp,System State
//! 2024-01-15 09:00:01,On
//! 2024-01-15 09:01:01,Off
//! ```
//!
//! Neither column can contain a comma, quote or newline, so no quoting is
//! needed.
//!
//! Each write goes to a temporary file next to the destination, which is then
//! renamed over it.  A failed write leaves the previous table in place.

use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::debug;
use tempfile::NamedTempFile;

use crate::app::ports::{PersistError, Persister};
use crate::transition_log::{COLUMNS, Snapshot, Transition};

pub struct CsvFilePersister {
    path: PathBuf,
}

impl CsvFilePersister {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Serialise rows, header first, one line per row.
pub fn render_csv(rows: &[Transition]) -> String {
    let mut out = String::with_capacity(24 * (rows.len() + 1));
    out.push_str(&COLUMNS.join(","));
    out.push('\n');
    for row in rows {
        out.push_str(&row.timestamp_text());
        out.push(',');
        out.push_str(row.state.label());
        out.push('\n');
    }
    out
}

/// Replace `path` with whatever `fill` writes, or leave it untouched.
///
/// The temporary file lives in the destination directory so the final rename
/// never crosses a filesystem.  It is removed if anything fails.
pub fn replace_atomically(
    path: &Path,
    fill: impl FnOnce(&mut dyn Write) -> io::Result<()>,
) -> Result<(), PersistError> {
    let shown = path.display().to_string();
    let write_err = |reason: String| PersistError::Write {
        path: shown.clone(),
        reason,
    };

    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let temp = NamedTempFile::new_in(parent).map_err(|e| PersistError::Open {
        path: shown.clone(),
        reason: e.to_string(),
    })?;

    let mut w = BufWriter::new(temp);
    fill(&mut w)
        .and_then(|()| w.flush())
        .map_err(|e| write_err(e.to_string()))?;
    let temp = w.into_inner().map_err(|e| write_err(e.error().to_string()))?;
    temp.as_file().sync_all().map_err(|e| write_err(e.to_string()))?;
    temp.persist(path).map_err(|e| write_err(e.error.to_string()))?;
    Ok(())
}

impl Persister for CsvFilePersister {
    fn write_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), PersistError> {
        let body = render_csv(snapshot.rows());
        replace_atomically(&self.path, |w| w.write_all(body.as_bytes()))?;
        debug!("CSV: wrote {} rows to {}", snapshot.len(), self.path.display());
        Ok(())
    }
}
