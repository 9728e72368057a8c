use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{ReportError, ReportSnapshot};

/// Fixed key under which the latest snapshot is stored.
pub const REPORT_KEY: &str = "reportData";

/// Hands a snapshot from the exporter to the renderer through a file in the
/// data directory. Publishing replaces any previous snapshot.
#[derive(Debug, Clone)]
pub struct ReportChannel {
    dir: PathBuf,
}

impl ReportChannel {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", REPORT_KEY))
    }

    /// Writes the snapshot atomically: readers never see a partial file.
    pub fn publish(&self, snapshot: &ReportSnapshot) -> Result<PathBuf, ReportError> {
        let path = self.path();
        let json = serde_json::to_vec_pretty(snapshot)?;

        fs::create_dir_all(&self.dir).map_err(|e| io_error(&self.dir, e))?;

        let tmp = self.dir.join(format!(".{}.json.tmp", REPORT_KEY));
        let mut file = fs::File::create(&tmp).map_err(|e| io_error(&tmp, e))?;
        file.write_all(&json).map_err(|e| io_error(&tmp, e))?;
        file.sync_all().map_err(|e| io_error(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| io_error(&path, e))?;

        tracing::debug!(
            "Published report with {} row(s) to {}",
            snapshot.rows.len(),
            path.display()
        );
        Ok(path)
    }

    pub fn load(&self) -> Result<ReportSnapshot, ReportError> {
        let path = self.path();
        let contents = match fs::read(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ReportError::Missing(path));
            }
            Err(e) => return Err(io_error(&path, e)),
        };
        Ok(serde_json::from_slice(&contents)?)
    }
}

fn io_error(path: &Path, source: std::io::Error) -> ReportError {
    ReportError::Io {
        path: path.to_path_buf(),
        source,
    }
}
