use std::ops::Range;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::model::document::Document;
use crate::model::task::{KeyValue, Priority, TaskRecord};

/// Whitespace dropped between the header and the subject
pub(crate) const SUBJECT_PADDING: [char; 2] = [' ', '\t'];

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+").unwrap());
static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4}-\d{2}-\d{2})(?: |$)").unwrap());

/// Byte layout of the fixed-position fields at the start of a line:
/// `["x "]["(A) "][DATE [DATE] ]subject...`
///
/// The header is anchored at column 0, so a line that starts with
/// whitespace has no header at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineHeader {
    pub done: bool,
    /// Where a priority annotation sits (or would be inserted)
    pub priority_at: usize,
    /// Priority letter and the span of `(X) ` including its separator
    pub priority: Option<(Priority, Range<usize>)>,
    /// Where date tokens sit (or would be inserted)
    pub dates_at: usize,
    /// Up to two dates, each with its span including the separator
    pub dates: Vec<(NaiveDate, Range<usize>)>,
    /// Start of the provisional subject
    pub subject_start: usize,
}

/// Scan the header of a line. Never fails; anything that doesn't fit the
/// header grammar is left for the subject.
pub fn scan_header(line: &str) -> LineHeader {
    let done = line.starts_with("x ");
    let mut pos = if done { 2 } else { 0 };

    let priority_at = pos;
    let priority = priority_token(&line[pos..]).map(|(p, len)| (p, pos..pos + len));
    if let Some((_, span)) = &priority {
        pos = span.end;
    }

    let dates_at = pos;
    let mut dates = Vec::new();
    while dates.len() < 2 {
        match date_token(&line[pos..]) {
            Some((date, len)) => {
                dates.push((date, pos..pos + len));
                pos += len;
            }
            None => break,
        }
    }

    LineHeader {
        done,
        priority_at,
        priority,
        dates_at,
        dates,
        subject_start: pos,
    }
}

/// `(X)` followed by a space or end of line. Returns the letter and span length.
fn priority_token(s: &str) -> Option<(Priority, usize)> {
    let bytes = s.as_bytes();
    if bytes.len() < 3 || bytes[0] != b'(' || bytes[2] != b')' {
        return None;
    }
    let priority = Priority::new(bytes[1] as char)?;
    match bytes.get(3) {
        None => Some((priority, 3)),
        Some(b' ') => Some((priority, 4)),
        Some(_) => None,
    }
}

/// A valid ISO date followed by a space or end of line
fn date_token(s: &str) -> Option<(NaiveDate, usize)> {
    let caps = DATE_RE.captures(s)?;
    let date = NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d").ok()?;
    Some((date, caps[0].len()))
}

/// What a whitespace-delimited token means as a tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagKind {
    Project,
    Context,
    KeyValue(KeyValue),
}

/// A tag token and its byte span in the line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub kind: TagKind,
    pub text: String,
    pub span: Range<usize>,
}

/// Every `+project`, `@context` and `key:value` token in the line, left to right.
pub fn scan_tags(line: &str) -> Vec<Tag> {
    TOKEN_RE
        .find_iter(line)
        .filter_map(|m| {
            classify_token(m.as_str()).map(|kind| Tag {
                kind,
                text: m.as_str().to_string(),
                span: m.range(),
            })
        })
        .collect()
}

fn classify_token(token: &str) -> Option<TagKind> {
    if token.len() > 1 && token.starts_with('+') {
        return Some(TagKind::Project);
    }
    if token.len() > 1 && token.starts_with('@') {
        return Some(TagKind::Context);
    }
    let (key, value) = token.split_once(':')?;
    if key.is_empty() || value.is_empty() || value.contains(':') {
        return None;
    }
    Some(TagKind::KeyValue(KeyValue::new(key, value)))
}

/// Byte ranges that remove each span together with one separating whitespace
/// character: the preceding one, or the following one when nothing before it
/// (at or after `floor`) is still available.
pub(crate) fn removal_ranges<'a>(
    line: &str,
    spans: impl IntoIterator<Item = &'a Range<usize>>,
    floor: usize,
) -> Vec<Range<usize>> {
    let mut cuts = Vec::new();
    let mut consumed = floor;
    for span in spans {
        if span.start < consumed {
            continue;
        }
        let before = line[..span.start].chars().next_back();
        let cut = match before {
            Some(c) if span.start > consumed && c.is_whitespace() => {
                span.start - c.len_utf8()..span.end
            }
            _ => match line[span.end..].chars().next() {
                Some(c) if c.is_whitespace() => span.start..span.end + c.len_utf8(),
                _ => span.clone(),
            },
        };
        consumed = cut.end;
        cuts.push(cut);
    }
    cuts
}

/// Copy `line[from..]` skipping the given sorted, non-overlapping ranges
pub(crate) fn cut_ranges(line: &str, from: usize, cuts: &[Range<usize>]) -> String {
    let mut out = String::with_capacity(line.len().saturating_sub(from));
    let mut pos = from;
    for cut in cuts {
        if cut.start > pos {
            out.push_str(&line[pos..cut.start]);
        }
        pos = pos.max(cut.end);
    }
    if pos < line.len() {
        out.push_str(&line[pos..]);
    }
    out
}

/// Parse one todo.txt line. Never fails: fields that don't match are simply
/// absent and the rest of the line becomes the subject.
///
/// The returned record has `raw_index` 0; `parse_document` numbers records
/// by their line position.
pub fn parse_line(line: &str) -> TaskRecord {
    let header = scan_header(line);
    let tags = scan_tags(line);

    let mut projects = Vec::new();
    let mut contexts = Vec::new();
    let mut special_key_values = Vec::new();
    for tag in &tags {
        match &tag.kind {
            TagKind::Project => projects.push(tag.text.clone()),
            TagKind::Context => contexts.push(tag.text.clone()),
            TagKind::KeyValue(kv) => special_key_values.push(kv.clone()),
        }
    }

    let subject_tags = tags
        .iter()
        .map(|t| &t.span)
        .filter(|span| span.start >= header.subject_start);
    let cuts = removal_ranges(line, subject_tags, header.subject_start);
    let subject = cut_ranges(line, header.subject_start, &cuts)
        .trim_start_matches(SUBJECT_PADDING)
        .to_string();

    // One date is the start date; two read as `end start`
    let (start_date, end_date) = match header.dates.as_slice() {
        [] => (None, None),
        [(start, _)] => (Some(*start), None),
        [(end, _), (start, _), ..] => (Some(*start), Some(*end)),
    };

    TaskRecord {
        raw_index: 0,
        done: header.done,
        priority: header.priority.map(|(p, _)| p),
        start_date,
        end_date,
        subject,
        projects,
        contexts,
        special_key_values,
    }
}

/// Parse every non-blank line, numbering records by 1-based line position.
pub fn parse_document(doc: &Document) -> Vec<TaskRecord> {
    doc.task_lines()
        .map(|(raw_index, line)| TaskRecord {
            raw_index,
            ..parse_line(line)
        })
        .collect()
}
