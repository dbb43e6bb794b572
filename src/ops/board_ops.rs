use chrono::NaiveDate;

use crate::model::board::{Board, Card};
use crate::model::document::Document;
use crate::model::task::{Stage, TaskRecord};
use crate::parse::parse_document;

/// Stage of a record: done wins, then the first recognized `knbn:` value,
/// otherwise TODO.
pub fn classify(record: &TaskRecord) -> Stage {
    if record.done {
        return Stage::Done;
    }
    record
        .kanban_values()
        .find_map(Stage::from_kanban_value)
        .unwrap_or(Stage::Todo)
}

/// Sort key: priority letter, with no priority after every letter
fn priority_rank(record: &TaskRecord) -> u32 {
    match record.priority {
        Some(p) => p.letter() as u32,
        None => u32::MAX,
    }
}

/// Project a document onto the board.
///
/// Records are sorted once across the whole board by priority (stable, so
/// equal priorities keep line order), then bucketed by stage. `today` closes
/// the duration of tasks that have no end date.
pub fn project(doc: &Document, today: NaiveDate) -> Board {
    let mut records = parse_document(doc);
    records.sort_by_key(priority_rank);

    let mut board = Board::default();
    for record in records {
        let stage = classify(&record);
        let card = Card::from_record(record, stage, today);
        board.stages.entry(stage).or_default().push(card);
    }
    board
}
