use chrono::NaiveDate;

use crate::model::task::{Priority, Stage, StageMarker};
use crate::parse::line_parser::{
    LineHeader, SUBJECT_PADDING, TagKind, cut_ranges, removal_ranges, scan_header, scan_tags,
};

/// Rewrite a line so it lands in the stage described by `marker`.
///
/// Any `knbn:` tag and the done marker are removed first, then the done
/// marker is prepended or the suffix appended. Priority, dates, tags and
/// subject parse the same before and after, and applying the same marker
/// twice gives the same line as applying it once.
pub fn render_stage_change(line: &str, marker: &StageMarker) -> String {
    let (head, rest) = strip_stage(line);
    match marker {
        StageMarker::Done => join_header(&format!("x {}", head), &rest),
        StageMarker::Suffix(suffix) => format!("{}{}", join_header(head, &rest), suffix),
    }
}

/// Convenience wrapper over `render_stage_change` for a target stage
pub fn move_to_stage(line: &str, stage: Stage) -> String {
    render_stage_change(line, &stage.marker())
}

/// Split a line into its header without the done marker (priority and dates)
/// and its subject text with every kanban tag cut out.
fn strip_stage(line: &str) -> (&str, String) {
    let header = scan_header(line);
    let head = &line[header.priority_at..header.subject_start];

    let tags = scan_tags(line);
    let kanban_spans = tags.iter().filter_map(|t| match &t.kind {
        TagKind::KeyValue(kv) if kv.is_kanban() && t.span.start >= header.subject_start => {
            Some(&t.span)
        }
        _ => None,
    });
    let cuts = removal_ranges(line, kanban_spans, header.subject_start);
    let rest = cut_ranges(line, header.subject_start, &cuts);
    (head, rest.trim_start_matches(SUBJECT_PADDING).to_string())
}

/// Fields the header scan reads, for comparing two scans
fn header_fields(header: &LineHeader) -> (bool, Option<Priority>, Vec<NaiveDate>) {
    (
        header.done,
        header.priority.as_ref().map(|(p, _)| *p),
        header.dates.iter().map(|(d, _)| *d).collect(),
    )
}

/// `head` (header tokens only) followed by `rest`. When the start of `rest`
/// would scan as another header token, one space is kept between them so it
/// stays subject text.
fn join_header(head: &str, rest: &str) -> String {
    let joined = format!("{}{}", head, rest);
    if rest.is_empty() || header_fields(&scan_header(&joined)) == header_fields(&scan_header(head)) {
        joined
    } else {
        format!("{} {}", head, rest)
    }
}

/// Replace, insert or (with `None`) remove the priority annotation.
/// The done marker, dates and the rest of the line are left untouched.
pub fn render_priority_change(line: &str, priority: Option<Priority>) -> String {
    let header = scan_header(line);
    let annotation = priority.map(Priority::annotation).unwrap_or_default();
    let range = match &header.priority {
        Some((_, span)) => span.clone(),
        None => header.priority_at..header.priority_at,
    };
    let head = format!(
        "{}{}{}",
        &line[..range.start],
        annotation,
        &line[range.end..header.subject_start]
    );
    join_header(&head, &line[header.subject_start..])
}

/// Step the priority down the A–E cycle: none → E → D → C → B → A → none.
pub fn cycle_priority_down(line: &str) -> String {
    let current = scan_header(line).priority.map(|(p, _)| p);
    render_priority_change(line, Priority::cycle_down(current))
}

/// Insert `date` as a header date after the done marker and priority.
///
/// With no date the new one becomes the start date; with one date the line
/// reads `new old` (end, start); with two dates the end date is replaced.
pub fn insert_date_token(line: &str, date: NaiveDate) -> String {
    let header = scan_header(line);
    let token = format!("{} ", date.format("%Y-%m-%d"));
    let range = match header.dates.as_slice() {
        [(_, end), _] => end.clone(),
        _ => header.dates_at..header.dates_at,
    };
    let mut out = String::with_capacity(line.len() + token.len());
    out.push_str(&line[..range.start]);
    out.push_str(&token);
    out.push_str(&line[range.end..]);
    out
}
