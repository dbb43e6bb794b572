use chrono::NaiveDate;

use crate::model::board::Board;
use crate::model::document::Document;
use crate::model::task::{Priority, Stage};
use crate::ops::board_ops;
use crate::parse::{cycle_priority_down, insert_date_token, move_to_stage, render_priority_change};

/// Error type for line-addressed document commands
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("line {index} is out of range (document has {len} lines)")]
    LineOutOfRange { index: usize, len: usize },
    #[error("a task must fit on one line")]
    MultiLineText,
}

fn check_index(doc: &Document, index: usize) -> Result<usize, DocumentError> {
    if index == 0 || index > doc.len() {
        return Err(DocumentError::LineOutOfRange {
            index,
            len: doc.len(),
        });
    }
    Ok(index - 1)
}

/// Replace line `index` with `edit(line)` and return the new text
fn edit_line(
    doc: &mut Document,
    index: usize,
    edit: impl FnOnce(&str) -> String,
) -> Result<&str, DocumentError> {
    let i = check_index(doc, index)?;
    let edited = edit(&doc.lines[i]);
    doc.lines[i] = edited;
    Ok(&doc.lines[i])
}

// ---------------------------------------------------------------------------
// Stage and priority
// ---------------------------------------------------------------------------

pub fn move_stage(doc: &mut Document, index: usize, stage: Stage) -> Result<&str, DocumentError> {
    edit_line(doc, index, |line| move_to_stage(line, stage))
}

/// Set (or with `None` clear) the priority of a line
pub fn set_priority(
    doc: &mut Document,
    index: usize,
    priority: Option<Priority>,
) -> Result<&str, DocumentError> {
    edit_line(doc, index, |line| render_priority_change(line, priority))
}

pub fn cycle_priority(doc: &mut Document, index: usize) -> Result<&str, DocumentError> {
    edit_line(doc, index, cycle_priority_down)
}

pub fn insert_date(
    doc: &mut Document,
    index: usize,
    date: NaiveDate,
) -> Result<&str, DocumentError> {
    edit_line(doc, index, |line| insert_date_token(line, date))
}

// ---------------------------------------------------------------------------
// Line ordering
// ---------------------------------------------------------------------------

/// Swap a line with the one above. Returns the line's new index.
pub fn move_line_up(doc: &mut Document, index: usize) -> Result<usize, DocumentError> {
    let i = check_index(doc, index)?;
    if i == 0 {
        return Ok(index);
    }
    doc.lines.swap(i, i - 1);
    Ok(index - 1)
}

/// Swap a line with the one below. Returns the line's new index.
pub fn move_line_down(doc: &mut Document, index: usize) -> Result<usize, DocumentError> {
    let i = check_index(doc, index)?;
    if i + 1 >= doc.len() {
        return Ok(index);
    }
    doc.lines.swap(i, i + 1);
    Ok(index + 1)
}

/// Remove a line and return its text
pub fn remove_line(doc: &mut Document, index: usize) -> Result<String, DocumentError> {
    let i = check_index(doc, index)?;
    Ok(doc.lines.remove(i))
}

/// Append a task line, reusing a trailing empty line so the file keeps its
/// final newline. Returns the new line's index.
pub fn append_line(doc: &mut Document, text: &str) -> Result<usize, DocumentError> {
    if text.contains(['\n', '\r']) {
        return Err(DocumentError::MultiLineText);
    }
    let index = match doc.lines.last() {
        Some(last) if last.is_empty() => {
            let i = doc.lines.len() - 1;
            doc.lines.insert(i, text.to_string());
            i + 1
        }
        _ => {
            doc.lines.push(text.to_string());
            doc.lines.len()
        }
    };
    Ok(index)
}

/// Re-project the current document
pub fn reparse(doc: &Document, today: NaiveDate) -> Board {
    board_ops::project(doc, today)
}
