//! Token and tree view over one parsed source snapshot
//!
//! - `token`: spans, positions and the token stream
//! - `tree`: the node arena and navigation handles
//! - `parser`: the parser collaborator contract and its tree-sitter backend

pub mod parser;
pub mod token;
pub mod tree;

pub use parser::{SourceParser, TreeSitterParser};
pub use token::{LineIndex, Location, Position, Span, Token, TokenKind};
pub use tree::{Node, NodeId, NodeKind, SourceTree, TreeBuilder};
