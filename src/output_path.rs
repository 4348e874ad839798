//! Log file naming.
//!
//! One file per experiment day: `<write_dir>/<YYYYMMDD>_log.csv`, optionally
//! narrowed with an operator-supplied suffix to `<YYYYMMDD>_log_<suffix>.csv`.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

const STEM_TAIL: &str = "_log";
const EXTENSION: &str = "csv";

/// Zero-padded `YYYYMMDD`.
pub fn date_string(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Default destination for a run started on `date`.
pub fn default_log_path(write_dir: &Path, date: NaiveDate) -> PathBuf {
    write_dir.join(format!("{}{}.{}", date_string(date), STEM_TAIL, EXTENSION))
}

/// Insert `_<suffix>` before the extension.  A blank suffix leaves the path
/// unchanged.
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let suffix = suffix.trim();
    if suffix.is_empty() {
        return path.to_path_buf();
    }
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{stem}_{suffix}.{EXTENSION}"))
}
