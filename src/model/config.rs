use serde::{Deserialize, Serialize};

use crate::model::task::Stage;

/// Host configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Default todo.txt path when `--file` is not given
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub board: BoardConfig,
    #[serde(default)]
    pub watch: WatchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default = "default_column_width")]
    pub column_width: usize,
    #[serde(default = "default_true")]
    pub show_percentages: bool,
    #[serde(default)]
    pub labels: StageLabels,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            column_width: default_column_width(),
            show_percentages: true,
            labels: StageLabels::default(),
        }
    }
}

/// Optional per-stage column headings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StageLabels {
    #[serde(default)]
    pub todo: Option<String>,
    #[serde(default)]
    pub in_progress: Option<String>,
    #[serde(default)]
    pub validation: Option<String>,
    #[serde(default)]
    pub done: Option<String>,
}

impl StageLabels {
    pub fn label(&self, stage: Stage) -> &str {
        let custom = match stage {
            Stage::Todo => &self.todo,
            Stage::InProgress => &self.in_progress,
            Stage::Validation => &self.validation,
            Stage::Done => &self.done,
        };
        custom.as_deref().unwrap_or(stage.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Quiet period before a change is re-projected
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        WatchConfig {
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_column_width() -> usize {
    28
}

fn default_debounce_ms() -> u64 {
    100
}
