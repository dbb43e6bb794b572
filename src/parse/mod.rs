pub mod line_editor;
pub mod line_parser;

pub use line_editor::{
    cycle_priority_down, insert_date_token, move_to_stage, render_priority_change,
    render_stage_change,
};
pub use line_parser::{LineHeader, Tag, TagKind, parse_document, parse_line, scan_header, scan_tags};
