pub mod board_ops;
pub mod document_ops;
