//! Snapshot discovery
//!
//! Lists the entries of an output directory that follow the naming
//! convention `<prefix> - <label>` and orders them oldest first. Anything
//! else in the directory is left alone: it is never counted, ordered or
//! pruned.

use std::fs;
use std::path::{Component, Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::{info, warn};
use walkdir::WalkDir;

use super::lock::LOCK_FILE_NAME;
use super::timestamp::{self, NAME_SEPARATOR};
use crate::error::BackupResult;

/// How an output directory is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// Immediate children, named by their own name (folder snapshots)
    Directory,
    /// Every file in the tree, named by relative path without extension
    File,
}

impl ScanMode {
    /// Token used for this kind of entry in the action log
    pub fn filetype(&self) -> &'static str {
        match self {
            ScanMode::Directory => "Folder",
            ScanMode::File => "File",
        }
    }
}

/// A snapshot found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampedEntry {
    /// Full path to the entry
    pub path: PathBuf,
    /// Name the entry is matched by
    pub name: String,
    /// Moment decoded from the name's label
    pub timestamp: NaiveDateTime,
}

/// Which extension file mode removes from a name
#[derive(Debug, Clone, PartialEq, Eq)]
enum ExtensionRule {
    /// Whatever follows the last dot of the file name
    Any,
    /// Only this extension; `None` keeps every name whole
    Exact(Option<String>),
}

impl ExtensionRule {
    fn strip(&self, relative: &Path) -> PathBuf {
        match self {
            ExtensionRule::Any => relative.with_extension(""),
            ExtensionRule::Exact(Some(ext))
                if relative.extension().is_some_and(|e| e == ext.as_str()) =>
            {
                relative.with_extension("")
            }
            ExtensionRule::Exact(_) => relative.to_path_buf(),
        }
    }
}

/// Finds the snapshots of one prefix
#[derive(Debug, Clone)]
pub struct EntryScanner {
    prefix: String,
    mode: ScanMode,
    extension: ExtensionRule,
}

impl EntryScanner {
    /// Create a scanner for a prefix
    pub fn new(prefix: impl Into<String>, mode: ScanMode) -> Self {
        Self {
            prefix: prefix.into(),
            mode,
            extension: ExtensionRule::Any,
        }
    }

    /// Only strip `extension` from file names in file mode
    ///
    /// With `None` names are matched whole, so a dot in the prefix or label
    /// is never mistaken for an extension.
    pub fn with_extension(mut self, extension: Option<&str>) -> Self {
        self.extension = ExtensionRule::Exact(extension.map(str::to_string));
        self
    }

    /// Get the scan mode
    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    /// Scan a directory and return its snapshots, oldest first
    ///
    /// Entries sharing a timestamp keep the order they were discovered in.
    pub fn scan(&self, root: &Path) -> BackupResult<Vec<TimestampedEntry>> {
        let candidates = match self.mode {
            ScanMode::Directory => list_children(root)?,
            ScanMode::File => list_files(root, &self.extension)?,
        };

        let mut entries: Vec<TimestampedEntry> = candidates
            .into_iter()
            .filter_map(|(path, name)| self.classify(root, path, name))
            .collect();

        entries.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(entries)
    }

    /// Decide whether a candidate belongs to the snapshot set
    fn classify(&self, root: &Path, path: PathBuf, name: String) -> Option<TimestampedEntry> {
        if !name.starts_with(&self.prefix) {
            info!(
                prefix = %self.prefix,
                entry = %name,
                dir = %root.display(),
                "entry did not start with prefix and was skipped"
            );
            return None;
        }

        let label = name.split_once(NAME_SEPARATOR).map(|(_, label)| label);
        match label.map(timestamp::decode) {
            Some(Ok(timestamp)) => Some(TimestampedEntry {
                path,
                name,
                timestamp,
            }),
            _ => {
                warn!(
                    prefix = %self.prefix,
                    entry = %name,
                    dir = %root.display(),
                    "entry did not match date time format and was skipped"
                );
                None
            }
        }
    }
}

/// Immediate children of a directory with their names
fn list_children(root: &Path) -> BackupResult<Vec<(PathBuf, String)>> {
    let mut children = Vec::new();

    for entry in fs::read_dir(root)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name == LOCK_FILE_NAME {
            continue;
        }
        children.push((entry.path(), name));
    }

    Ok(children)
}

/// Files anywhere under a directory, named by relative path minus extension
///
/// Symlinks are listed as entries of their own and never walked into.
fn list_files(root: &Path, extension: &ExtensionRule) -> BackupResult<Vec<(PathBuf, String)>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root) {
        let entry = entry?;
        if entry.file_type().is_dir() {
            continue;
        }

        let path = entry.path().to_path_buf();
        let relative = path.strip_prefix(root).unwrap_or(&path);
        if relative.as_os_str() == LOCK_FILE_NAME {
            continue;
        }

        let name = relative_name(&extension.strip(relative));
        files.push((path, name));
    }

    Ok(files)
}

/// Join the normal components of a relative path with `/`
fn relative_name(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_directory_mode_orders_by_timestamp() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir(root.join("db - 2024-01-02 09-00 AM")).unwrap();
        fs::create_dir(root.join("db - 2024-01-01 11-30 PM")).unwrap();
        fs::create_dir(root.join("db - 2024-01-02 01-15 PM")).unwrap();

        let scanner = EntryScanner::new("db", ScanMode::Directory);
        let names: Vec<String> = scanner
            .scan(root)
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();

        assert_eq!(
            names,
            vec![
                "db - 2024-01-01 11-30 PM",
                "db - 2024-01-02 09-00 AM",
                "db - 2024-01-02 01-15 PM",
            ]
        );
    }

    #[test]
    fn test_directory_mode_excludes_non_matching_entries() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir(root.join("db - 2024-01-02 09-00 AM")).unwrap();
        fs::create_dir(root.join("other - 2024-01-02 09-00 AM")).unwrap();
        fs::create_dir(root.join("db - yesterday")).unwrap();
        fs::create_dir(root.join("db")).unwrap();
        touch(&root.join(LOCK_FILE_NAME));

        let scanner = EntryScanner::new("db", ScanMode::Directory);
        let entries = scanner.scan(root).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "db - 2024-01-02 09-00 AM");
        assert_eq!(entries[0].path, root.join("db - 2024-01-02 09-00 AM"));
    }

    #[test]
    fn test_directory_mode_is_not_recursive() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("nested").join("db - 2024-01-02 09-00 AM")).unwrap();

        let scanner = EntryScanner::new("db", ScanMode::Directory);
        assert!(scanner.scan(root).unwrap().is_empty());
    }

    #[test]
    fn test_file_mode_strips_extension() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(&root.join("db - 2024-01-02 09-00 AM.sqlite"));
        touch(&root.join("db - 2024-01-01 09-00 AM.sqlite"));
        touch(&root.join("notes.txt"));

        let scanner = EntryScanner::new("db", ScanMode::File);
        let entries = scanner.scan(root).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "db - 2024-01-01 09-00 AM");
        assert_eq!(entries[1].name, "db - 2024-01-02 09-00 AM");
        assert_eq!(entries[1].path, root.join("db - 2024-01-02 09-00 AM.sqlite"));
    }

    #[test]
    fn test_file_mode_names_nested_files_by_relative_path() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(&root.join("sub").join("db - 2024-01-02 09-00 AM.txt"));

        // The relative name starts with "sub", so the entry is not a candidate
        let scanner = EntryScanner::new("db", ScanMode::File);
        assert!(scanner.scan(root).unwrap().is_empty());

        let scanner = EntryScanner::new("sub", ScanMode::File);
        let entries = scanner.scan(root).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "sub/db - 2024-01-02 09-00 AM");
    }

    #[test]
    fn test_same_minute_entries_are_all_candidates() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(&root.join("db - 2024-01-02 09-00 AM.a"));
        touch(&root.join("db - 2024-01-02 09-00 AM.b"));

        let scanner = EntryScanner::new("db", ScanMode::File);
        let entries = scanner.scan(root).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].timestamp, entries[1].timestamp);
    }

    #[test]
    fn test_exact_extension_keeps_dotted_names_whole() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(&root.join("v1.2 - 2024-01-02 09-00 AM"));

        let scanner = EntryScanner::new("v1.2", ScanMode::File);
        assert!(scanner.scan(root).unwrap().is_empty());

        let scanner = EntryScanner::new("v1.2", ScanMode::File).with_extension(None);
        let entries = scanner.scan(root).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "v1.2 - 2024-01-02 09-00 AM");
    }

    #[test]
    fn test_exact_extension_only_strips_matching_files() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(&root.join("v1.2 - 2024-01-02 09-00 AM.sqlite"));
        touch(&root.join("v1.2 - 2024-01-03 09-00 AM.bak"));

        let scanner = EntryScanner::new("v1.2", ScanMode::File).with_extension(Some("sqlite"));
        let entries = scanner.scan(root).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "v1.2 - 2024-01-02 09-00 AM");
    }

    #[cfg(unix)]
    #[test]
    fn test_file_mode_does_not_walk_into_symlinks() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("out");
        let external = temp.path().join("external");
        touch(&external.join("a - 2024-01-02 09-00 AM.txt"));
        fs::create_dir_all(&root).unwrap();
        std::os::unix::fs::symlink(&external, root.join("dbx")).unwrap();

        let scanner = EntryScanner::new("db", ScanMode::File);
        assert!(scanner.scan(&root).unwrap().is_empty());
    }

    #[test]
    fn test_missing_directory_is_an_io_error() {
        let temp = TempDir::new().unwrap();
        let scanner = EntryScanner::new("db", ScanMode::Directory);
        let err = scanner.scan(&temp.path().join("missing")).unwrap_err();
        assert!(matches!(err, crate::error::BackupError::Io(_)));
    }

    #[test]
    fn test_relative_name_uses_forward_slashes() {
        let relative = Path::new("a").join("b").join("c");
        assert_eq!(relative_name(&relative), "a/b/c");
    }
}
