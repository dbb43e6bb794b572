pub mod task;
pub mod document;
pub mod board;
pub mod config;

pub use task::*;
pub use document::*;
pub use board::*;
pub use config::*;
