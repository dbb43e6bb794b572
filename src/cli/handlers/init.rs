use tracing::info;

use crate::cli::commands::InitArgs;
use crate::io::config_io::expand_home;
use crate::io::todo_io;

/// Create a new empty list, normalizing its name to `*.todo.txt`
pub fn cmd_init(args: InitArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let requested = expand_home(&args.path);
    let created = todo_io::create_todo_file(&requested)?;
    info!(path = %created.display(), "created todo list");

    if json {
        println!(
            "{}",
            serde_json::json!({ "created": created.display().to_string() })
        );
    } else {
        println!("created {}", created.display());
    }
    Ok(())
}
