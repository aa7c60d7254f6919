//! Source file cache for diagnostic rendering.

use crate::span::{FileId, Location, Span};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A cached source file with line information.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Unique identifier
    pub id: FileId,
    /// File path
    pub path: PathBuf,
    /// Source code content
    pub source: String,
    /// Byte offsets where each line starts
    line_starts: Vec<usize>,
    /// False for files registered by path only
    has_text: bool,
}

impl SourceFile {
    fn new(id: FileId, path: PathBuf, source: String) -> Self {
        let line_starts = compute_line_starts(&source);
        Self {
            id,
            path,
            source,
            line_starts,
            has_text: true,
        }
    }

    /// Get the text of a specific line (1-indexed).
    pub fn line_text(&self, line: u32) -> Option<&str> {
        if line == 0 || !self.has_text {
            return None;
        }

        let idx = (line - 1) as usize;
        let start = *self.line_starts.get(idx)?;
        let end = self
            .line_starts
            .get(idx + 1)
            .copied()
            .unwrap_or(self.source.len());

        let text = &self.source[start..end];
        Some(text.trim_end_matches('\n').trim_end_matches('\r'))
    }

    /// Get the number of lines in this file.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

/// Compute the byte offset where each line starts.
fn compute_line_starts(source: &str) -> Vec<usize> {
    let mut starts = vec![0];
    for (i, c) in source.char_indices() {
        if c == '\n' {
            starts.push(i + 1);
        }
    }
    starts
}

/// Cache of source files for diagnostic rendering.
#[derive(Debug, Default)]
pub struct SourceCache {
    files: HashMap<FileId, SourceFile>,
    path_to_id: HashMap<PathBuf, FileId>,
    next_id: u32,
}

impl SourceCache {
    /// Create a new empty source cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file to the cache, returning its FileId.
    /// If the file was already added, returns the existing FileId.
    pub fn add_file(&mut self, path: impl AsRef<Path>, source: String) -> FileId {
        let path = path.as_ref().to_path_buf();

        if let Some(&id) = self.path_to_id.get(&path) {
            return id;
        }

        let id = FileId(self.next_id);
        self.next_id += 1;

        self.files.insert(id, SourceFile::new(id, path.clone(), source));
        self.path_to_id.insert(path, id);

        id
    }

    /// Register a file whose text is not at hand, e.g. a serialized tree
    /// whose positions point into the source it was parsed from.
    /// Diagnostics then carry its path but no snippet.
    pub fn add_path(&mut self, path: impl AsRef<Path>) -> FileId {
        let id = self.add_file(path, String::new());
        if let Some(file) = self.files.get_mut(&id) {
            if file.source.is_empty() {
                file.has_text = false;
            }
        }
        id
    }

    /// Get a source file by ID.
    pub fn get_file(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(&id)
    }

    /// Get the FileId for a path, if it exists.
    pub fn get_id(&self, path: impl AsRef<Path>) -> Option<FileId> {
        self.path_to_id.get(path.as_ref()).copied()
    }

    /// Resolve a span to a Location with file path, line, and column.
    ///
    /// Spans without a registered file still resolve when their position is
    /// known; the file is then reported as `<input>`.
    pub fn location(&self, span: Span) -> Option<Location> {
        if span.is_dummy() {
            return None;
        }

        let file = self
            .files
            .get(&span.file_id)
            .map(|f| f.path.to_string_lossy().into_owned())
            .unwrap_or_else(|| "<input>".to_string());

        Some(Location {
            file,
            line: span.start.line,
            column: span.start.column,
        })
    }

    /// Get the line text containing a span.
    pub fn line_text(&self, span: Span) -> Option<&str> {
        if span.is_dummy() {
            return None;
        }
        self.files.get(&span.file_id)?.line_text(span.start.line)
    }

    /// Get the number of files in the cache.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
