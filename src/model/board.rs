use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;

use crate::model::task::{KeyValue, Priority, Stage, TaskRecord};

/// Render-ready projection of one task
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub raw_index: usize,
    pub stage: Stage,
    pub done: bool,
    pub priority: Option<Priority>,
    pub subject: String,
    pub projects: Vec<String>,
    pub contexts: Vec<String>,
    pub special_key_values: Vec<KeyValue>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Days from the start date to the end date (or to today when open)
    pub duration_days: Option<i64>,
}

impl Card {
    pub fn from_record(record: TaskRecord, stage: Stage, today: NaiveDate) -> Self {
        let duration_days = record.start_date.map(|start| {
            let end = record.end_date.unwrap_or(today);
            (end - start).num_days()
        });
        Card {
            raw_index: record.raw_index,
            stage,
            done: record.done,
            priority: record.priority,
            subject: record.subject,
            projects: record.projects,
            contexts: record.contexts,
            special_key_values: record.special_key_values,
            start_date: record.start_date,
            end_date: record.end_date,
            duration_days,
        }
    }
}

/// Cards grouped by stage, every stage present in board order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    pub stages: IndexMap<Stage, Vec<Card>>,
}

impl Default for Board {
    fn default() -> Self {
        Board {
            stages: Stage::ALL.iter().map(|s| (*s, Vec::new())).collect(),
        }
    }
}

impl Board {
    pub fn cards(&self, stage: Stage) -> &[Card] {
        self.stages.get(&stage).map(|c| c.as_slice()).unwrap_or(&[])
    }

    pub fn counts(&self) -> StageCounts {
        StageCounts {
            todo: self.cards(Stage::Todo).len(),
            in_progress: self.cards(Stage::InProgress).len(),
            validation: self.cards(Stage::Validation).len(),
            done: self.cards(Stage::Done).len(),
        }
    }

    /// Card for a given source line, if that line produced one
    pub fn find(&self, raw_index: usize) -> Option<&Card> {
        self.stages
            .values()
            .flat_map(|cards| cards.iter())
            .find(|c| c.raw_index == raw_index)
    }
}

/// Number of cards per stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StageCounts {
    pub todo: usize,
    pub in_progress: usize,
    pub validation: usize,
    pub done: usize,
}

impl StageCounts {
    pub fn get(&self, stage: Stage) -> usize {
        match stage {
            Stage::Todo => self.todo,
            Stage::InProgress => self.in_progress,
            Stage::Validation => self.validation,
            Stage::Done => self.done,
        }
    }

    pub fn total(&self) -> usize {
        self.todo + self.in_progress + self.validation + self.done
    }

    /// Share of each stage in board order; `None` for an empty board
    pub fn percentages(&self) -> Option<[f64; 4]> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        Some(Stage::ALL.map(|s| self.get(s) as f64 / total as f64))
    }
}
