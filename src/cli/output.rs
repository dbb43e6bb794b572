use chrono::NaiveDate;
use serde::Serialize;

use crate::model::board::{Board, Card, StageCounts};
use crate::model::config::BoardConfig;
use crate::model::task::Stage;
use crate::util::unicode::{display_width, fit_to_width, truncate_to_width, wrap_to_width};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct BoardJson<'a> {
    pub file: String,
    pub counts: StageCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentages: Option<PercentagesJson>,
    pub columns: Vec<ColumnJson<'a>>,
}

#[derive(Serialize)]
pub struct ColumnJson<'a> {
    pub stage: Stage,
    pub label: String,
    pub cards: &'a [Card],
}

#[derive(Serialize)]
pub struct PercentagesJson {
    pub todo: f64,
    pub in_progress: f64,
    pub validation: f64,
    pub done: f64,
}

#[derive(Serialize)]
pub struct LineJson<'a> {
    pub line: usize,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<&'a Card>,
}

#[derive(Serialize)]
pub struct StatsJson {
    pub counts: StageCounts,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentages: Option<PercentagesJson>,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn percentages_to_json(counts: &StageCounts) -> Option<PercentagesJson> {
    counts
        .percentages()
        .map(|[todo, in_progress, validation, done]| PercentagesJson {
            todo,
            in_progress,
            validation,
            done,
        })
}

pub fn board_to_json<'a>(board: &'a Board, file: &str, config: &BoardConfig) -> BoardJson<'a> {
    let counts = board.counts();
    BoardJson {
        file: file.to_string(),
        counts,
        percentages: percentages_to_json(&counts),
        columns: board
            .stages
            .iter()
            .map(|(stage, cards)| ColumnJson {
                stage: *stage,
                label: config.labels.label(*stage).to_string(),
                cards,
            })
            .collect(),
    }
}

pub fn stats_to_json(counts: &StageCounts) -> StatsJson {
    StatsJson {
        counts: *counts,
        total: counts.total(),
        percentages: percentages_to_json(counts),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// `#3 (A) Write report`
pub fn format_card_title(card: &Card) -> String {
    let prio = card
        .priority
        .map(|p| format!("({}) ", p))
        .unwrap_or_default();
    format!("#{} {}{}", card.raw_index, prio, card.subject.trim())
}

/// Projects, contexts and key/values on one line
pub fn format_card_tags(card: &Card) -> String {
    card.projects
        .iter()
        .cloned()
        .chain(card.contexts.iter().cloned())
        .chain(card.special_key_values.iter().map(|kv| kv.to_string()))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn format_duration(days: i64) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", days)
    }
}

/// A card as lines at most `width` cells wide
pub fn format_card(card: &Card, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let title = format_card_title(card);
    let mut wrapped = wrap_to_width(&title, width.saturating_sub(2).max(1)).into_iter();
    lines.push(wrapped.next().unwrap_or_default());
    for rest in wrapped {
        lines.push(format!("  {}", rest));
    }
    let tags = format_card_tags(card);
    if !tags.is_empty() {
        lines.push(format!("  {}", tags));
    }
    if let Some(days) = card.duration_days {
        lines.push(format!("  {}", format_duration(days)));
    }
    lines
        .into_iter()
        .map(|l| truncate_to_width(&l, width))
        .collect()
}

/// `To Do (3, 75%)`
pub fn format_column_header(
    label: &str,
    stage: Stage,
    counts: &StageCounts,
    show_percentages: bool,
) -> String {
    let count = counts.get(stage);
    match counts.percentages() {
        Some(pcts) if show_percentages => {
            let i = Stage::ALL.iter().position(|s| *s == stage).unwrap_or(0);
            format!("{} ({}, {:.0}%)", label, count, pcts[i] * 100.0)
        }
        _ => format!("{} ({})", label, count),
    }
}

/// Render the board as side-by-side columns
pub fn format_board(board: &Board, config: &BoardConfig) -> Vec<String> {
    let width = config.column_width.max(8);
    let counts = board.counts();

    let columns: Vec<Vec<String>> = board
        .stages
        .iter()
        .map(|(stage, cards)| {
            let label = config.labels.label(*stage);
            let mut col = vec![
                format_column_header(label, *stage, &counts, config.show_percentages),
                "\u{2500}".repeat(width),
            ];
            for (i, card) in cards.iter().enumerate() {
                if i > 0 {
                    col.push(String::new());
                }
                col.extend(format_card(card, width));
            }
            col
        })
        .collect();

    let rows = columns.iter().map(|c| c.len()).max().unwrap_or(0);
    (0..rows)
        .map(|r| {
            columns
                .iter()
                .map(|col| fit_to_width(col.get(r).map(|s| s.as_str()).unwrap_or(""), width))
                .collect::<Vec<_>>()
                .join(" \u{2502} ")
                .trim_end()
                .to_string()
        })
        .collect()
}

/// Per-stage counts and shares, one stage per line
pub fn format_stats(counts: &StageCounts, config: &BoardConfig) -> Vec<String> {
    let label_w = Stage::ALL
        .iter()
        .map(|s| display_width(config.labels.label(*s)))
        .chain(std::iter::once(display_width("Total")))
        .max()
        .unwrap_or(0);
    let pcts = counts.percentages().filter(|_| config.show_percentages);

    let mut lines: Vec<String> = Stage::ALL
        .iter()
        .enumerate()
        .map(|(i, stage)| {
            let label = fit_to_width(config.labels.label(*stage), label_w);
            let count = counts.get(*stage);
            match pcts {
                Some(p) => format!("{}  {:>3}  {:>3.0}%", label, count, p[i] * 100.0),
                None => format!("{}  {:>3}", label, count),
            }
        })
        .collect();
    lines.push(format!(
        "{}  {:>3}",
        fit_to_width("Total", label_w),
        counts.total()
    ));
    lines
}

/// Detailed view of one line and its card
pub fn format_line_detail(index: usize, text: &str, card: Option<&Card>) -> Vec<String> {
    let mut lines = vec![format!("line {}: {}", index, text)];
    let Some(card) = card else {
        lines.push("(blank line)".to_string());
        return lines;
    };
    lines.push(format!("stage: {}", card.stage.label()));
    if let Some(p) = card.priority {
        lines.push(format!("priority: {}", p));
    }
    lines.push(format!("subject: {}", card.subject));
    if let Some(start) = card.start_date {
        lines.push(format!("start: {}", format_date(start)));
    }
    if let Some(end) = card.end_date {
        lines.push(format!("end: {}", format_date(end)));
    }
    if let Some(days) = card.duration_days {
        lines.push(format!("duration: {}", format_duration(days)));
    }
    if !card.projects.is_empty() {
        lines.push(format!("projects: {}", card.projects.join(", ")));
    }
    if !card.contexts.is_empty() {
        lines.push(format!("contexts: {}", card.contexts.join(", ")));
    }
    if !card.special_key_values.is_empty() {
        let kvs: Vec<String> = card
            .special_key_values
            .iter()
            .map(|kv| kv.to_string())
            .collect();
        lines.push(format!("tags: {}", kvs.join(", ")));
    }
    lines
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
