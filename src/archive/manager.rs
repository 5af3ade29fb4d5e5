//! Export archive on disk
//!
//! Export files are named `UserData.YYYY_MM_DD.json` after the local date
//! they were written, with a `-N` suffix when that name is taken.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::Serialize;

use crate::config::paths::WalletPaths;
use crate::error::{BackupError, BackupResult};

const FILE_PREFIX: &str = "UserData.";
const FILE_EXTENSION: &str = "json";

/// Metadata about an export file
#[derive(Debug, Clone, Serialize)]
pub struct ExportInfo {
    pub filename: String,
    pub path: PathBuf,
    /// Last modification time
    pub modified: DateTime<Utc>,
    pub size_bytes: u64,
    /// Date encoded in the filename, if it follows the naming scheme
    pub export_date: Option<NaiveDate>,
}

/// Manages export files in the export directory
pub struct ExportArchive {
    export_dir: PathBuf,
}

impl ExportArchive {
    pub fn new(paths: &WalletPaths) -> Self {
        Self::with_dir(paths.export_dir())
    }

    pub fn with_dir(export_dir: PathBuf) -> Self {
        Self { export_dir }
    }

    pub fn export_dir(&self) -> &PathBuf {
        &self.export_dir
    }

    /// Write export text under today's filename
    ///
    /// Returns the path to the created file.
    pub fn export_to_archive(&self, text: &str) -> BackupResult<PathBuf> {
        self.export_on(text, Local::now().date_naive())
    }

    /// Write export text under the filename for `date`
    pub fn export_on(&self, text: &str, date: NaiveDate) -> BackupResult<PathBuf> {
        fs::create_dir_all(&self.export_dir)
            .map_err(|e| BackupError::Io(format!("Failed to create export directory: {}", e)))?;

        let path = self.available_path(date);
        fs::write(&path, text)
            .map_err(|e| BackupError::Io(format!("Failed to write export file: {}", e)))?;

        tracing::info!(path = %path.display(), bytes = text.len(), "Wrote export file");
        Ok(path)
    }

    /// List all export files, newest first
    pub fn list_exports(&self) -> BackupResult<Vec<ExportInfo>> {
        if !self.export_dir.exists() {
            return Ok(Vec::new());
        }

        let mut exports = Vec::new();
        for entry in fs::read_dir(&self.export_dir)
            .map_err(|e| BackupError::Io(format!("Failed to read export directory: {}", e)))?
        {
            let entry = entry
                .map_err(|e| BackupError::Io(format!("Failed to read directory entry: {}", e)))?;

            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == FILE_EXTENSION) {
                if let Some(info) = export_info(&path) {
                    exports.push(info);
                }
            }
        }

        exports.sort_by(|a, b| {
            b.modified
                .cmp(&a.modified)
                .then_with(|| b.filename.cmp(&a.filename))
        });

        Ok(exports)
    }

    /// The most recent export, if any
    pub fn latest_export(&self) -> BackupResult<Option<ExportInfo>> {
        Ok(self.list_exports()?.into_iter().next())
    }

    /// Resolve `latest` or a file path to an existing export file
    pub fn resolve(&self, name: &str) -> BackupResult<PathBuf> {
        if name == "latest" {
            return self
                .latest_export()?
                .map(|info| info.path)
                .ok_or_else(|| BackupError::export_not_found("latest"));
        }

        let path = PathBuf::from(name);
        if path.is_file() {
            return Ok(path);
        }

        let in_archive = self.export_dir.join(name);
        if in_archive.is_file() {
            return Ok(in_archive);
        }

        Err(BackupError::export_not_found(name))
    }

    fn available_path(&self, date: NaiveDate) -> PathBuf {
        let stem = export_stem(date);
        let mut path = self.export_dir.join(format!("{}.{}", stem, FILE_EXTENSION));
        let mut n = 1;
        while path.exists() {
            path = self
                .export_dir
                .join(format!("{}-{}.{}", stem, n, FILE_EXTENSION));
            n += 1;
        }
        path
    }
}

/// File name for an export written on `date`
pub fn export_filename(date: NaiveDate) -> String {
    format!("{}.{}", export_stem(date), FILE_EXTENSION)
}

fn export_stem(date: NaiveDate) -> String {
    format!("{}{}", FILE_PREFIX, date.format("%Y_%m_%d"))
}

fn export_info(path: &Path) -> Option<ExportInfo> {
    let filename = path.file_name()?.to_string_lossy().to_string();
    let metadata = fs::metadata(path).ok()?;
    let modified = metadata.modified().ok()?;

    Some(ExportInfo {
        export_date: parse_export_date(&filename),
        filename,
        path: path.to_path_buf(),
        modified: DateTime::<Utc>::from(modified),
        size_bytes: metadata.len(),
    })
}

/// Parse the date from `UserData.YYYY_MM_DD[-N].json`
fn parse_export_date(filename: &str) -> Option<NaiveDate> {
    let stem = filename
        .strip_prefix(FILE_PREFIX)?
        .strip_suffix(&format!(".{}", FILE_EXTENSION))?;
    let date_part = stem.split('-').next()?;
    NaiveDate::parse_from_str(date_part, "%Y_%m_%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_archive() -> (ExportArchive, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let paths = WalletPaths::with_base_dir(temp_dir.path().to_path_buf());
        (ExportArchive::new(&paths), temp_dir)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_export_filename() {
        assert_eq!(export_filename(date(2024, 3, 7)), "UserData.2024_03_07.json");
    }

    #[test]
    fn test_export_on_adds_suffix_on_collision() {
        let (archive, _temp) = create_test_archive();

        let first = archive.export_on("{}", date(2024, 3, 7)).unwrap();
        let second = archive.export_on("{}", date(2024, 3, 7)).unwrap();
        let third = archive.export_on("{}", date(2024, 3, 7)).unwrap();

        assert!(first.ends_with("UserData.2024_03_07.json"));
        assert!(second.ends_with("UserData.2024_03_07-1.json"));
        assert!(third.ends_with("UserData.2024_03_07-2.json"));
    }

    #[test]
    fn test_list_exports_newest_first() {
        let (archive, _temp) = create_test_archive();

        archive.export_on("{}", date(2024, 1, 1)).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(50));
        archive.export_on("{}", date(2023, 1, 1)).unwrap();

        let exports = archive.list_exports().unwrap();
        assert_eq!(exports.len(), 2);
        assert!(exports[0].modified >= exports[1].modified);
        assert_eq!(exports[0].export_date, Some(date(2023, 1, 1)));
    }

    #[test]
    fn test_latest_export() {
        let (archive, _temp) = create_test_archive();
        assert!(archive.latest_export().unwrap().is_none());

        let path = archive.export_to_archive("{}").unwrap();
        assert_eq!(archive.latest_export().unwrap().unwrap().path, path);
    }

    #[test]
    fn test_resolve() {
        let (archive, _temp) = create_test_archive();
        assert!(archive.resolve("latest").unwrap_err().is_not_found());

        let path = archive.export_on("{}", date(2024, 3, 7)).unwrap();
        assert_eq!(archive.resolve("latest").unwrap(), path);
        assert_eq!(archive.resolve("UserData.2024_03_07.json").unwrap(), path);
        assert_eq!(archive.resolve(path.to_str().unwrap()).unwrap(), path);
        assert!(archive.resolve("nope.json").unwrap_err().is_not_found());
    }

    #[test]
    fn test_parse_export_date() {
        assert_eq!(parse_export_date("UserData.2024_03_07.json"), Some(date(2024, 3, 7)));
        assert_eq!(parse_export_date("UserData.2024_03_07-2.json"), Some(date(2024, 3, 7)));
        assert_eq!(parse_export_date("notes.json"), None);
    }

    #[test]
    fn test_ignores_other_files() {
        let (archive, _temp) = create_test_archive();
        fs::create_dir_all(archive.export_dir()).unwrap();
        fs::write(archive.export_dir().join("readme.txt"), "x").unwrap();

        assert!(archive.list_exports().unwrap().is_empty());
    }
}
