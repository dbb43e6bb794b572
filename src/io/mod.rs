pub mod config_io;
pub mod todo_io;
pub mod watcher;
