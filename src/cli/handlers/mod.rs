mod init;
pub use init::cmd_init;

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{Local, NaiveDate};
use tracing::{debug, warn};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io::{self, expand_home};
use crate::io::todo_io::{self, TodoError};
use crate::io::watcher::TodoWatcher;
use crate::model::config::Config;
use crate::model::document::Document;
use crate::model::task::Stage;
use crate::ops::document_ops::{self, DocumentError};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let config = config_io::read_config(cli.config.as_deref().map(Path::new))?;

    match cli.command.unwrap_or(Commands::Board) {
        // Init runs before a list is resolved
        Commands::Init(args) => cmd_init(args, json),
        command => {
            let session = Session {
                path: resolve_file(cli.file.as_deref(), &config)?,
                config,
                json,
            };
            debug!(path = %session.path.display(), "using todo list");
            run(&session, command)
        }
    }
}

fn run(session: &Session, command: Commands) -> CmdResult {
    match command {
        Commands::Init(args) => cmd_init(args, session.json),

        // Read commands
        Commands::Board => cmd_board(session),
        Commands::Stats => cmd_stats(session),
        Commands::Show(args) => cmd_show(session, args.line),
        Commands::Watch => cmd_watch(session),

        // Stage commands
        Commands::Move(args) => cmd_move(session, args.line, args.stage),
        Commands::Start(args) => cmd_move(session, args.line, Stage::InProgress),
        Commands::Validate(args) => cmd_move(session, args.line, Stage::Validation),
        Commands::Done(args) => cmd_move(session, args.line, Stage::Done),
        Commands::Reset(args) => cmd_move(session, args.line, Stage::Todo),

        // Priority and date commands
        Commands::Priority(args) => session.edit(args.line, |doc| {
            document_ops::set_priority(doc, args.line, args.priority).map(|_| args.line)
        }),
        Commands::Cycle(args) => session.edit(args.line, |doc| {
            document_ops::cycle_priority(doc, args.line).map(|_| args.line)
        }),
        Commands::Date(args) => {
            let date = args.date.unwrap_or_else(today);
            session.edit(args.line, |doc| {
                document_ops::insert_date(doc, args.line, date).map(|_| args.line)
            })
        }

        // Line commands
        Commands::Up(args) => session.edit(args.line, |doc| {
            document_ops::move_line_up(doc, args.line)
        }),
        Commands::Down(args) => session.edit(args.line, |doc| {
            document_ops::move_line_down(doc, args.line)
        }),
        Commands::Rm(args) => cmd_rm(session, args.line),
        Commands::Add(args) => cmd_add(session, args),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// `--file` wins over the config's `file`
fn resolve_file(flag: Option<&str>, config: &Config) -> Result<PathBuf, TodoError> {
    flag.or(config.file.as_deref())
        .map(expand_home)
        .ok_or(TodoError::NoFile)
}

struct Session {
    path: PathBuf,
    config: Config,
    json: bool,
}

impl Session {
    fn load(&self) -> Result<Document, TodoError> {
        todo_io::read_document(&self.path)
    }

    /// Apply a line command, save, and print the affected line as re-parsed.
    /// `apply` returns the line's index after the edit.
    fn edit(
        &self,
        line: usize,
        apply: impl FnOnce(&mut Document) -> Result<usize, DocumentError>,
    ) -> CmdResult {
        let mut doc = self.load()?;
        let new_index = apply(&mut doc)?;
        todo_io::write_document(&self.path, &doc)?;
        debug!(line, new_index, "line edited");
        self.print_line(&doc, new_index)
    }

    fn print_line(&self, doc: &Document, index: usize) -> CmdResult {
        let board = document_ops::reparse(doc, today());
        let text = doc.line(index).unwrap_or("");
        let card = board.find(index);
        if self.json {
            let out = LineJson {
                line: index,
                text,
                card,
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        } else {
            for l in format_line_detail(index, text, card) {
                println!("{}", l);
            }
        }
        Ok(())
    }

    fn print_board(&self, doc: &Document, pretty: bool) -> CmdResult {
        let board = document_ops::reparse(doc, today());
        if self.json {
            let out = board_to_json(&board, &self.path.display().to_string(), &self.config.board);
            if pretty {
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("{}", serde_json::to_string(&out)?);
            }
        } else {
            for l in format_board(&board, &self.config.board) {
                println!("{}", l);
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_board(session: &Session) -> CmdResult {
    let doc = session.load()?;
    session.print_board(&doc, true)
}

fn cmd_stats(session: &Session) -> CmdResult {
    let doc = session.load()?;
    let counts = document_ops::reparse(&doc, today()).counts();
    if session.json {
        println!("{}", serde_json::to_string_pretty(&stats_to_json(&counts))?);
    } else {
        for l in format_stats(&counts, &session.config.board) {
            println!("{}", l);
        }
    }
    Ok(())
}

fn cmd_show(session: &Session, line: usize) -> CmdResult {
    let doc = session.load()?;
    if doc.line(line).is_none() {
        return Err(DocumentError::LineOutOfRange {
            index: line,
            len: doc.len(),
        }
        .into());
    }
    session.print_line(&doc, line)
}

fn cmd_move(session: &Session, line: usize, stage: Stage) -> CmdResult {
    session.edit(line, |doc| {
        document_ops::move_stage(doc, line, stage).map(|_| line)
    })
}

fn cmd_rm(session: &Session, line: usize) -> CmdResult {
    let mut doc = session.load()?;
    let removed = document_ops::remove_line(&mut doc, line)?;
    todo_io::write_document(&session.path, &doc)?;
    if session.json {
        println!(
            "{}",
            serde_json::json!({ "removed": line, "text": removed })
        );
    } else {
        println!("removed line {}: {}", line, removed);
    }
    Ok(())
}

fn cmd_add(session: &Session, args: AddArgs) -> CmdResult {
    let mut text = args.text.join(" ");
    if args.dated {
        text = crate::parse::insert_date_token(&text, today());
    }
    let mut doc = session.load()?;
    let index = document_ops::append_line(&mut doc, &text)?;
    todo_io::write_document(&session.path, &doc)?;
    session.print_line(&doc, index)
}

fn cmd_watch(session: &Session) -> CmdResult {
    let watcher = TodoWatcher::start(&session.path)?;
    let debounce = Duration::from_millis(session.config.watch.debounce_ms);

    let doc = session.load()?;
    session.print_board(&doc, false)?;

    while watcher.wait_settled(debounce) {
        match session.load() {
            Ok(doc) => {
                if !session.json {
                    println!();
                }
                session.print_board(&doc, false)?;
            }
            // The file may be mid-replace; the next event will bring it back
            Err(e) => warn!(error = %e, "could not reload todo list"),
        }
    }
    Ok(())
}
