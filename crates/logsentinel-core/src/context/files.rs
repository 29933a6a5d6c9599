use crate::constants::files::CONFIG_SUFFIXES;
use crate::error::{Result, SentinelError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// How an attachment is labelled in the prompt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Log,
    Config,
}

impl FileKind {
    /// Classify by file name: `.json`, `.yaml` and `.xml` are configuration,
    /// everything else is treated as a log.
    pub fn classify(name: &str) -> Self {
        if CONFIG_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)) {
            FileKind::Config
        } else {
            FileKind::Log
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Log => "log",
            FileKind::Config => "config",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An uploaded artifact held in memory. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    name: String,
    content: String,
    kind: FileKind,
}

impl LogFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        let name = name.into();
        let kind = FileKind::classify(&name);
        Self {
            name,
            content: content.into(),
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    /// Size of the content in characters.
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}

/// Read one file from disk as text.
///
/// Bytes that are not valid UTF-8 are replaced, not rejected.
pub async fn read_log_file(path: impl AsRef<Path>) -> Result<LogFile> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| SentinelError::file_read(path, e))?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let content = String::from_utf8_lossy(&bytes).into_owned();
    tracing::debug!(file = %name, bytes = bytes.len(), "read attachment");
    Ok(LogFile::new(name, content))
}

/// Attached files in upload order.
#[derive(Debug, Clone, Default)]
pub struct FileSet {
    files: Vec<LogFile>,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, file: LogFile) {
        self.files.push(file);
    }

    /// Remove the file at `index`. Later files shift down by one, so callers
    /// must re-read the list before removing again.
    pub fn remove(&mut self, index: usize) -> Result<LogFile> {
        if index >= self.files.len() {
            return Err(SentinelError::FileIndex {
                index,
                len: self.files.len(),
            });
        }
        Ok(self.files.remove(index))
    }

    pub fn as_slice(&self) -> &[LogFile] {
        &self.files
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogFile> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn classify_by_suffix() {
        assert_eq!(FileKind::classify("settings.json"), FileKind::Config);
        assert_eq!(FileKind::classify("deploy.yaml"), FileKind::Config);
        assert_eq!(FileKind::classify("pom.xml"), FileKind::Config);
        assert_eq!(FileKind::classify("app.log"), FileKind::Log);
        assert_eq!(FileKind::classify("notes.txt"), FileKind::Log);
        // `.yml` is not in the config list
        assert_eq!(FileKind::classify("compose.yml"), FileKind::Log);
        assert_eq!(FileKind::classify("json"), FileKind::Log);
    }

    #[test]
    fn remove_shifts_later_files() {
        let mut set = FileSet::new();
        set.add(LogFile::new("a.log", "a"));
        set.add(LogFile::new("b.log", "b"));
        set.add(LogFile::new("c.log", "c"));

        let removed = set.remove(1).unwrap();
        assert_eq!(removed.name(), "b.log");

        let names: Vec<_> = set.iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["a.log", "c.log"]);
    }

    #[test]
    fn remove_out_of_range_leaves_set_intact() {
        let mut set = FileSet::new();
        set.add(LogFile::new("a.log", "a"));

        let err = set.remove(3).unwrap_err();
        assert!(matches!(err, SentinelError::FileIndex { index: 3, len: 1 }));
        assert_eq!(set.len(), 1);
    }

    #[tokio::test]
    async fn read_uses_file_name_and_classifies() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("service.yaml");
        std::fs::write(&path, "port: 8080\n").unwrap();

        let file = read_log_file(&path).await.unwrap();
        assert_eq!(file.name(), "service.yaml");
        assert_eq!(file.kind(), FileKind::Config);
        assert_eq!(file.content(), "port: 8080\n");
    }

    #[tokio::test]
    async fn read_replaces_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("binary.log");
        std::fs::write(&path, [b'o', b'k', 0xff, b'!']).unwrap();

        let file = read_log_file(&path).await.unwrap();
        assert_eq!(file.content(), "ok\u{fffd}!");
    }

    #[tokio::test]
    async fn read_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.log");

        let err = read_log_file(&missing).await.unwrap_err();
        match err {
            SentinelError::FileRead { path, .. } => assert_eq!(path, missing),
            other => panic!("unexpected error: {other}"),
        }
    }
}
