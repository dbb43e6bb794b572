use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Reserved tag key that selects a non-default stage
pub const KANBAN_KEY: &str = "knbn";
/// Reserved `knbn` value for the in-progress column
pub const KANBAN_VAL_IN_PROGRESS: &str = "in_progress";
/// Reserved `knbn` value for the validation column
pub const KANBAN_VAL_VALIDATION: &str = "validation";

/// Kanban column a task belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Todo,
    InProgress,
    Validation,
    Done,
}

impl Stage {
    /// All stages in board order
    pub const ALL: [Stage; 4] = [
        Stage::Todo,
        Stage::InProgress,
        Stage::Validation,
        Stage::Done,
    ];

    /// Default column heading
    pub fn label(self) -> &'static str {
        match self {
            Stage::Todo => "To Do",
            Stage::InProgress => "In progress",
            Stage::Validation => "Validation",
            Stage::Done => "Done",
        }
    }

    /// The `knbn` value that selects this stage, if it is tag-driven
    pub fn kanban_value(self) -> Option<&'static str> {
        match self {
            Stage::InProgress => Some(KANBAN_VAL_IN_PROGRESS),
            Stage::Validation => Some(KANBAN_VAL_VALIDATION),
            Stage::Todo | Stage::Done => None,
        }
    }

    /// Inverse of `kanban_value`
    pub fn from_kanban_value(value: &str) -> Option<Stage> {
        match value {
            KANBAN_VAL_IN_PROGRESS => Some(Stage::InProgress),
            KANBAN_VAL_VALIDATION => Some(Stage::Validation),
            _ => None,
        }
    }

    /// The text edit that moves a line into this stage
    pub fn marker(self) -> StageMarker {
        match self {
            Stage::Todo => StageMarker::Suffix(String::new()),
            Stage::Done => StageMarker::Done,
            Stage::InProgress | Stage::Validation => {
                let value = self.kanban_value().unwrap_or_default();
                StageMarker::Suffix(format!(" {}:{}", KANBAN_KEY, value))
            }
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Todo => "todo",
            Stage::InProgress => "in-progress",
            Stage::Validation => "validation",
            Stage::Done => "done",
        };
        f.write_str(s)
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "todo" | "to-do" => Ok(Stage::Todo),
            "in-progress" | "in_progress" | "progress" | "doing" => Ok(Stage::InProgress),
            "validation" | "review" => Ok(Stage::Validation),
            "done" | "x" => Ok(Stage::Done),
            other => Err(format!(
                "unknown stage '{}' (expected todo, in-progress, validation or done)",
                other
            )),
        }
    }
}

/// Target marker for a stage change.
///
/// `Done` prepends the done marker; `Suffix` appends its text verbatim
/// (empty for TODO, a space-prefixed `knbn:` tag otherwise).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageMarker {
    Done,
    Suffix(String),
}

/// A todo.txt priority letter (A is highest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
pub struct Priority(char);

impl Priority {
    /// Highest cycle target
    pub const HIGHEST: Priority = Priority('A');
    /// Lowest cycle target; cycling from "none" lands here
    pub const LOWEST: Priority = Priority('E');

    /// Build a priority from an uppercase ASCII letter
    pub fn new(letter: char) -> Option<Priority> {
        letter.is_ascii_uppercase().then_some(Priority(letter))
    }

    pub fn letter(self) -> char {
        self.0
    }

    /// The `(X) ` annotation written into a line
    pub fn annotation(self) -> String {
        format!("({}) ", self.0)
    }

    /// Next step of the A–E cycle: E → D → … → A → none.
    /// Letters outside the cycle wrap to none.
    pub fn cycle_down(current: Option<Priority>) -> Option<Priority> {
        match current {
            None => Some(Priority::LOWEST),
            Some(p) if p > Priority::HIGHEST && p <= Priority::LOWEST => {
                Some(Priority((p.0 as u8 - 1) as char))
            }
            Some(_) => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<char> for Priority {
    type Error = String;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Priority::new(c).ok_or_else(|| format!("invalid priority '{}' (expected A-Z)", c))
    }
}

impl From<Priority> for char {
    fn from(p: Priority) -> char {
        p.0
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Priority::try_from(c.to_ascii_uppercase()),
            _ => Err(format!("invalid priority '{}' (expected a single letter)", s)),
        }
    }
}

/// A generic `key:value` tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        KeyValue {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Whether this is the reserved stage tag
    pub fn is_kanban(&self) -> bool {
        self.key == KANBAN_KEY
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.key, self.value)
    }
}

/// Structured view of one todo.txt line.
///
/// Derived from the line text on every parse and never edited in place:
/// changes go through the line editor and a re-parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// 1-based line number in the source document
    pub raw_index: usize,
    pub done: bool,
    pub priority: Option<Priority>,
    pub start_date: Option<NaiveDate>,
    /// Completion date; only present when the line carries two dates
    pub end_date: Option<NaiveDate>,
    /// Free text with the header and every tag removed
    pub subject: String,
    /// `+project` tokens, in line order
    pub projects: Vec<String>,
    /// `@context` tokens, in line order
    pub contexts: Vec<String>,
    /// `key:value` tags, in line order (the `knbn` tag included)
    pub special_key_values: Vec<KeyValue>,
}

impl TaskRecord {
    /// Values of every `knbn:` tag, first one first
    pub fn kanban_values(&self) -> impl Iterator<Item = &str> {
        self.special_key_values
            .iter()
            .filter(|kv| kv.is_kanban())
            .map(|kv| kv.value.as_str())
    }
}
