use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::model::document::Document;

/// Extension given to newly created lists
pub const TODO_EXTENSION: &str = ".todo.txt";

/// Error type for todo.txt file I/O
#[derive(Debug, thiserror::Error)]
pub enum TodoError {
    #[error("no todo.txt file given (use --file or set `file` in the config)")]
    NoFile,
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{0} already exists")]
    AlreadyExists(PathBuf),
}

/// Read the whole list
pub fn read_document(path: &Path) -> Result<Document, TodoError> {
    let text = fs::read_to_string(path).map_err(|e| TodoError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    debug!(path = %path.display(), bytes = text.len(), "read todo list");
    Ok(Document::from_text(&text))
}

/// Write the whole list, replacing the file atomically
pub fn write_document(path: &Path, doc: &Document) -> Result<(), TodoError> {
    let content = doc.to_text();
    atomic_write(path, content.as_bytes()).map_err(|e| TodoError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })?;
    debug!(path = %path.display(), bytes = content.len(), "wrote todo list");
    Ok(())
}

/// Write to a temp file in the same directory, then rename over the target
fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// `notes` → `notes.todo.txt`, `notes.txt` → `notes.todo.txt`;
/// names already ending in `.todo.txt` are kept.
pub fn normalize_todo_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("todo");
    if name.ends_with(TODO_EXTENSION) {
        return path.to_path_buf();
    }
    let stem = name.strip_suffix(".txt").unwrap_or(name);
    path.with_file_name(format!("{}{}", stem, TODO_EXTENSION))
}

/// Create a new empty list. Refuses to overwrite an existing file.
pub fn create_todo_file(path: &Path) -> Result<PathBuf, TodoError> {
    let path = normalize_todo_path(path);
    if path.exists() {
        return Err(TodoError::AlreadyExists(path));
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| TodoError::WriteError {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    write_document(&path, &Document::default())?;
    Ok(path)
}
