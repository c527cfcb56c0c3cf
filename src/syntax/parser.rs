#![forbid(unsafe_code)]

//! Parser collaborator backed by tree-sitter
//!
//! The engine never parses on its own: it asks a [`SourceParser`] for a
//! [`SourceTree`] of each snapshot. [`TreeSitterParser`] is the shipped
//! implementation over the JavaScript and TypeScript grammars.

use crate::error::ParseError;
use crate::syntax::token::{LineIndex, Span, TokenKind};
use crate::syntax::tree::{SourceTree, TreeBuilder};
use crate::types::Dialect;
use tree_sitter::{Language, Node as TsNode, Parser, TreeCursor};

/// Turns source text into a syntax tree
///
/// Implementations must be pure: the same text and dialect always yield
/// the same tree. A tree containing syntax errors is an error.
pub trait SourceParser: Send + Sync {
    fn parse(&self, text: &str) -> Result<SourceTree, ParseError>;

    fn dialect(&self) -> Dialect;
}

/// Grammar kinds kept as a single token instead of being descended into
///
/// Template literals are descended into so substitutions carry real tokens;
/// their literal text arrives as `string_fragment` leaves.
const ATOMIC_KINDS: &[&str] = &[
    "string",
    "regex",
    "number",
    "comment",
    "html_comment",
    "jsx_text",
    "hash_bang_line",
];

const KEYWORD_LITERALS: &[&str] = &["this", "super", "true", "false", "null", "undefined"];

pub struct TreeSitterParser {
    dialect: Dialect,
    language: Language,
}

impl std::fmt::Debug for TreeSitterParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeSitterParser")
            .field("dialect", &self.dialect)
            .finish()
    }
}

impl TreeSitterParser {
    /// Selects the grammar for `dialect`
    ///
    /// The JavaScript grammar always accepts JSX, so `jsx` only changes the
    /// grammar choice for TypeScript.
    pub fn new(dialect: Dialect) -> Result<Self, ParseError> {
        let language = if dialect.typescript {
            typescript_grammar(dialect.jsx)
        } else {
            javascript_grammar()
        }
        .ok_or_else(|| ParseError::UnsupportedDialect(dialect.to_string()))?;

        Ok(TreeSitterParser { dialect, language })
    }
}

#[cfg(feature = "lang-javascript")]
fn javascript_grammar() -> Option<Language> {
    Some(tree_sitter_javascript::language())
}

#[cfg(not(feature = "lang-javascript"))]
fn javascript_grammar() -> Option<Language> {
    None
}

#[cfg(feature = "lang-typescript")]
fn typescript_grammar(jsx: bool) -> Option<Language> {
    if jsx {
        Some(tree_sitter_typescript::language_tsx())
    } else {
        Some(tree_sitter_typescript::language_typescript())
    }
}

#[cfg(not(feature = "lang-typescript"))]
fn typescript_grammar(_jsx: bool) -> Option<Language> {
    None
}

impl SourceParser for TreeSitterParser {
    fn parse(&self, text: &str) -> Result<SourceTree, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| ParseError::Language(e.to_string()))?;

        let tree = parser.parse(text, None).ok_or(ParseError::NoTree)?;
        let root = tree.root_node();

        if root.has_error() {
            let offset = first_error(root).map_or(0, |node| node.start_byte());
            let pos = LineIndex::new(text).position(text, offset);
            return Err(ParseError::Syntax {
                line: pos.line,
                column: pos.column,
            });
        }

        Ok(build_tree(text, self.dialect, &mut root.walk()))
    }

    fn dialect(&self) -> Dialect {
        self.dialect
    }
}

/// First error or missing node in document order
fn first_error(root: TsNode<'_>) -> Option<TsNode<'_>> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if node.has_error() {
            let mut cursor = node.walk();
            let children: Vec<_> = node.children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }
    }
    None
}

/// Copies the tree-sitter tree into an owned arena, pre-order
fn build_tree(text: &str, dialect: Dialect, cursor: &mut TreeCursor<'_>) -> SourceTree {
    let mut builder = TreeBuilder::new(text, dialect);
    builder.open_node(cursor.node().kind(), None, true, Span::new(0, text.len()));
    if !cursor.goto_first_child() {
        return builder.finish();
    }

    loop {
        let node = cursor.node();
        let span = Span::new(node.start_byte(), node.end_byte());

        if node.child_count() == 0 || ATOMIC_KINDS.contains(&node.kind()) {
            // zero-width leaves carry no text
            if !span.is_empty() {
                builder.open_node(node.kind(), cursor.field_name(), node.is_named(), span);
                builder.push_token(token_kind(&node, text), span);
                builder.close_node();
            }
        } else {
            builder.open_node(node.kind(), cursor.field_name(), node.is_named(), span);
            if cursor.goto_first_child() {
                continue;
            }
            builder.close_node();
        }

        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return builder.finish();
            }
            builder.close_node();
        }
    }
}

fn token_kind(node: &TsNode<'_>, text: &str) -> TokenKind {
    let kind = node.kind();
    match kind {
        "comment" | "html_comment" | "hash_bang_line" => TokenKind::Comment,
        "string" => TokenKind::String,
        "string_fragment" | "escape_sequence" | "`" => TokenKind::Template,
        "regex" => TokenKind::RegularExpression,
        "number" => TokenKind::Numeric,
        "jsx_text" => TokenKind::JsxText,
        _ if !node.is_named() => {
            if kind.chars().all(|c| c.is_ascii_alphabetic()) {
                TokenKind::Keyword
            } else {
                TokenKind::Punctuator
            }
        }
        _ if KEYWORD_LITERALS.contains(&kind) => TokenKind::Keyword,
        _ if kind.ends_with("identifier") => TokenKind::Identifier,
        _ => {
            let first = text
                .get(node.start_byte()..node.end_byte())
                .and_then(|s| s.chars().next());
            match first {
                Some(c) if c.is_alphabetic() || c == '_' || c == '$' => TokenKind::Identifier,
                _ => TokenKind::Punctuator,
            }
        }
    }
}
