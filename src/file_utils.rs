use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::document::DocumentKind;
use crate::errors::ParseError;

// @module: File and directory utilities

/// A file on disk with the classification the parsing layer needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Base name, for display only
    pub file_name: String,
    /// Lower-cased extension without the dot, empty when absent
    pub extension: String,
    /// `None` when the extension is not a known meeting artifact type
    pub kind: Option<DocumentKind>,
}

impl SourceFile {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let extension = FileManager::extension_of(path);
        Self {
            path: path.to_path_buf(),
            file_name: FileManager::file_name_of(path),
            kind: DocumentKind::from_extension(&extension),
            extension,
        }
    }
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    /// Lower-cased extension without the leading dot
    pub fn extension_of<P: AsRef<Path>>(path: P) -> String {
        path.as_ref()
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    }

    /// Base name of the path, or the whole path when it has none
    pub fn file_name_of<P: AsRef<Path>>(path: P) -> String {
        let path = path.as_ref();
        path.file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string())
    }

    /// Read a whole file into memory.
    ///
    /// The handle is closed before returning on every path. Files above
    /// `max_bytes` are refused without reading their content.
    pub fn read_bytes<P: AsRef<Path>>(path: P, max_bytes: u64) -> Result<Vec<u8>, ParseError> {
        let path = path.as_ref();

        let metadata = fs::metadata(path)
            .map_err(|e| ParseError::UnreadableFile(format!("{}: {}", path.display(), e)))?;
        if !metadata.is_file() {
            return Err(ParseError::UnreadableFile(format!("{} is not a regular file", path.display())));
        }
        if metadata.len() > max_bytes {
            return Err(ParseError::UnreadableFile(format!(
                "{} is {} bytes, above the {} byte limit",
                path.display(),
                metadata.len(),
                max_bytes
            )));
        }

        fs::read(path).map_err(|e| ParseError::UnreadableFile(format!("{}: {}", path.display(), e)))
    }

    /// Find files with one of the given extensions under a directory (recursive)
    pub fn find_files<P: AsRef<Path>>(dir: P, extensions: &[&str], follow_links: bool) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(follow_links).sort_by_file_name() {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                let ext = Self::extension_of(path);
                if extensions.iter().any(|wanted| wanted.eq_ignore_ascii_case(&ext)) {
                    result.push(path.to_path_buf());
                }
            }
        }

        Ok(result)
    }

    /// Expand a mix of files and directories into the files to ingest.
    ///
    /// Explicit files are kept whatever their extension; directories contribute
    /// only files with a known document kind.
    pub fn collect_inputs<P: AsRef<Path>>(inputs: &[P], follow_links: bool) -> Result<Vec<SourceFile>> {
        let mut files = Vec::new();

        for input in inputs {
            let input = input.as_ref();
            if Self::dir_exists(input) {
                let found = Self::find_files(input, DocumentKind::known_extensions(), follow_links)
                    .with_context(|| format!("Failed to scan directory: {:?}", input))?;
                files.extend(found.into_iter().map(SourceFile::from_path));
            } else {
                files.push(SourceFile::from_path(input));
            }
        }

        Ok(files)
    }
}
