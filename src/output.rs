//! Message rendering and JSONL output

pub mod jsonl;
pub mod messages;

pub use jsonl::JsonlFormatter;
pub use messages::render;
