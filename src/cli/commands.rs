use clap::{Args, Parser, Subcommand};

use crate::model::task::{Priority, Stage};

#[derive(Parser)]
#[command(name = "knbn", about = concat!("kanbantxt v", env!("CARGO_PKG_VERSION"), " - a todo.txt list as a kanban board"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// todo.txt file to work on (default: `file` from the config)
    #[arg(short = 'f', long = "file", global = true)]
    pub file: Option<String>,

    /// Config file (default: $XDG_CONFIG_HOME/kanbantxt/config.toml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Log debug output to stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new empty todo list (named *.todo.txt)
    Init(InitArgs),
    /// Show the board (default when no subcommand is given)
    Board,
    /// Show task counts per stage
    Stats,
    /// Show one line and its parsed fields
    Show(LineArgs),
    /// Move a task to a stage
    Move(MoveArgs),
    /// Move a task to In progress (shortcut for move <LINE> in-progress)
    Start(LineArgs),
    /// Move a task to Validation (shortcut for move <LINE> validation)
    Validate(LineArgs),
    /// Mark a task done (shortcut for move <LINE> done)
    Done(LineArgs),
    /// Move a task back to To Do (shortcut for move <LINE> todo)
    Reset(LineArgs),
    /// Set a task's priority, or clear it when no letter is given
    Priority(PriorityArgs),
    /// Step a task's priority down the E..A cycle (A wraps to none)
    Cycle(LineArgs),
    /// Insert a date after the done marker and priority (default: today)
    Date(DateArgs),
    /// Swap a line with the one above
    Up(LineArgs),
    /// Swap a line with the one below
    Down(LineArgs),
    /// Remove a line
    Rm(LineArgs),
    /// Append a task line
    Add(AddArgs),
    /// Redraw the board whenever the file changes
    Watch,
}

#[derive(Args)]
pub struct InitArgs {
    /// Path of the new list; `.todo.txt` is appended when missing
    pub path: String,
}

#[derive(Args)]
pub struct LineArgs {
    /// 1-based line number
    pub line: usize,
}

#[derive(Args)]
pub struct MoveArgs {
    /// 1-based line number
    pub line: usize,
    /// Target stage: todo, in-progress, validation or done
    pub stage: Stage,
}

#[derive(Args)]
pub struct PriorityArgs {
    /// 1-based line number
    pub line: usize,
    /// Priority letter A-Z (omit to clear)
    pub priority: Option<Priority>,
}

#[derive(Args)]
pub struct DateArgs {
    /// 1-based line number
    pub line: usize,
    /// Date to insert as YYYY-MM-DD (default: today)
    #[arg(long)]
    pub date: Option<chrono::NaiveDate>,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task text (joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
    /// Prefix with today's date as the start date
    #[arg(long)]
    pub dated: bool,
}
