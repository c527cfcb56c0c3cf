#![forbid(unsafe_code)]

//! Immutable syntax tree over one source snapshot
//!
//! Nodes live in an arena owned by [`SourceTree`] and are stored in
//! pre-order, so iterating the arena is a pre-order traversal. Parent links
//! are plain ids used for navigation only.

use crate::syntax::token::{LineIndex, Location, Position, Span, Token, TokenKind};
use crate::types::Dialect;
use std::ops::Range;

/// Index of a node in its tree's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Closed set of node kinds the rule catalog dispatches on
///
/// Grammar kinds without a dedicated variant map to [`NodeKind::Other`];
/// the grammar's own kind stays available through [`Node::raw_kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Program,
    EmptyStatement,
    BlockStatement,
    ClassBody,
    SwitchBody,
    SwitchCase,
    EnumBody,
    InterfaceBody,
    ObjectType,
    Array,
    ArrayPattern,
    Object,
    ObjectPattern,
    Arguments,
    FormalParameters,
    NamedImports,
    ExportClause,
    TypeParameters,
    TypeParameter,
    TupleType,
    SpreadElement,
    RestPattern,
    VariableDeclaration,
    VariableDeclarator,
    ForStatement,
    ForInStatement,
    WhileStatement,
    DoStatement,
    IfStatement,
    ElseClause,
    LabeledStatement,
    WithStatement,
    Function,
    ArrowFunction,
    Class,
    Module,
    JsxOpeningElement,
    JsxSelfClosingElement,
    JsxAttribute,
    JsxExpression,
    Comment,
    Other,
}

impl NodeKind {
    /// Maps a tree-sitter grammar kind onto the closed variant set
    pub fn from_grammar(kind: &str) -> NodeKind {
        match kind {
            "program" => NodeKind::Program,
            "empty_statement" => NodeKind::EmptyStatement,
            "statement_block" => NodeKind::BlockStatement,
            "class_body" => NodeKind::ClassBody,
            "switch_body" => NodeKind::SwitchBody,
            "switch_case" | "switch_default" => NodeKind::SwitchCase,
            "enum_body" => NodeKind::EnumBody,
            "interface_body" => NodeKind::InterfaceBody,
            "object_type" => NodeKind::ObjectType,
            "array" => NodeKind::Array,
            "array_pattern" => NodeKind::ArrayPattern,
            "object" => NodeKind::Object,
            "object_pattern" => NodeKind::ObjectPattern,
            "arguments" => NodeKind::Arguments,
            "formal_parameters" => NodeKind::FormalParameters,
            "named_imports" => NodeKind::NamedImports,
            "export_clause" => NodeKind::ExportClause,
            "type_parameters" => NodeKind::TypeParameters,
            "type_parameter" => NodeKind::TypeParameter,
            "tuple_type" => NodeKind::TupleType,
            "spread_element" => NodeKind::SpreadElement,
            "rest_pattern" => NodeKind::RestPattern,
            "variable_declaration" | "lexical_declaration" => NodeKind::VariableDeclaration,
            "variable_declarator" => NodeKind::VariableDeclarator,
            "for_statement" => NodeKind::ForStatement,
            "for_in_statement" => NodeKind::ForInStatement,
            "while_statement" => NodeKind::WhileStatement,
            "do_statement" => NodeKind::DoStatement,
            "if_statement" => NodeKind::IfStatement,
            "else_clause" => NodeKind::ElseClause,
            "labeled_statement" => NodeKind::LabeledStatement,
            "with_statement" => NodeKind::WithStatement,
            "function_declaration"
            | "function_expression"
            | "function"
            | "generator_function"
            | "generator_function_declaration"
            | "method_definition" => NodeKind::Function,
            "arrow_function" => NodeKind::ArrowFunction,
            "class" | "class_declaration" | "abstract_class_declaration" => NodeKind::Class,
            "internal_module" | "module" => NodeKind::Module,
            "jsx_opening_element" => NodeKind::JsxOpeningElement,
            "jsx_self_closing_element" => NodeKind::JsxSelfClosingElement,
            "jsx_attribute" => NodeKind::JsxAttribute,
            "jsx_expression" => NodeKind::JsxExpression,
            "comment" => NodeKind::Comment,
            _ => NodeKind::Other,
        }
    }

    /// True for function-like nodes that own a body block
    pub fn is_function(self) -> bool {
        matches!(self, NodeKind::Function | NodeKind::ArrowFunction)
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    raw_kind: &'static str,
    field: Option<&'static str>,
    named: bool,
    span: Span,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    tokens: Range<usize>,
}

/// Token stream plus syntax tree for one parse of one source snapshot
#[derive(Debug, Clone)]
pub struct SourceTree {
    text: String,
    dialect: Dialect,
    lines: LineIndex,
    tokens: Vec<Token>,
    nodes: Vec<NodeData>,
}

impl SourceTree {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Text covered by `span`; empty when the span is out of range
    pub fn slice(&self, span: Span) -> &str {
        self.text.get(span.range()).unwrap_or("")
    }

    pub fn position(&self, offset: usize) -> Position {
        self.lines.position(&self.text, offset)
    }

    pub fn location(&self, span: Span) -> Location {
        Location {
            start: self.position(span.start),
            end: self.position(span.end),
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.line_count()
    }

    /// All tokens, comments included, in source order
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn token(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn token_text(&self, token: &Token) -> &str {
        self.slice(token.span)
    }

    /// The token starting exactly at `offset`
    pub fn token_at(&self, offset: usize) -> Option<&Token> {
        self.tokens
            .binary_search_by(|t| t.span.start.cmp(&offset))
            .ok()
            .map(|idx| &self.tokens[idx])
    }

    /// Previous non-comment token
    pub fn token_before(&self, token: &Token) -> Option<&Token> {
        self.tokens[..token.index].iter().rev().find(|t| !t.is_comment())
    }

    /// Previous token, comments included
    pub fn token_or_comment_before(&self, token: &Token) -> Option<&Token> {
        token.index.checked_sub(1).and_then(|idx| self.tokens.get(idx))
    }

    /// Next non-comment token
    pub fn token_after(&self, token: &Token) -> Option<&Token> {
        self.tokens[token.index + 1..].iter().find(|t| !t.is_comment())
    }

    /// Next token, comments included
    pub fn token_or_comment_after(&self, token: &Token) -> Option<&Token> {
        self.tokens.get(token.index + 1)
    }

    /// Whether any whitespace separates consecutive tokens from `first` to `second`
    pub fn has_space_between(&self, first: &Token, second: &Token) -> bool {
        let (lo, hi) = if first.index <= second.index {
            (first, second)
        } else {
            (second, first)
        };
        self.tokens[lo.index..=hi.index].windows(2).any(|pair| {
            self.slice(Span::new(pair[0].span.end, pair[1].span.start))
                .chars()
                .any(char::is_whitespace)
        })
    }

    /// Text strictly between two tokens
    pub fn text_between(&self, first: &Token, second: &Token) -> &str {
        self.slice(Span::new(first.span.end, second.span.start))
    }

    pub fn root(&self) -> Node<'_> {
        Node {
            tree: self,
            id: NodeId(0),
        }
    }

    pub fn node(&self, id: NodeId) -> Option<Node<'_>> {
        (id.0 < self.nodes.len()).then_some(Node { tree: self, id })
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Every node in pre-order
    pub fn preorder(&self) -> impl Iterator<Item = Node<'_>> {
        (0..self.nodes.len()).map(move |idx| Node {
            tree: self,
            id: NodeId(idx),
        })
    }
}

/// Borrowed handle to one node of a [`SourceTree`]
#[derive(Clone, Copy)]
pub struct Node<'t> {
    tree: &'t SourceTree,
    id: NodeId,
}

impl std::fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("kind", &self.data().raw_kind)
            .field("span", &self.data().span)
            .finish()
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl<'t> Node<'t> {
    fn data(&self) -> &'t NodeData {
        &self.tree.nodes[self.id.0]
    }

    fn wrap(&self, id: NodeId) -> Node<'t> {
        Node {
            tree: self.tree,
            id,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tree(&self) -> &'t SourceTree {
        self.tree
    }

    pub fn kind(&self) -> NodeKind {
        self.data().kind
    }

    /// The grammar's own name for this node
    pub fn raw_kind(&self) -> &'static str {
        self.data().raw_kind
    }

    /// Field name this node occupies in its parent, if any
    pub fn field(&self) -> Option<&'static str> {
        self.data().field
    }

    pub fn is_named(&self) -> bool {
        self.data().named
    }

    pub fn span(&self) -> Span {
        self.data().span
    }

    pub fn text(&self) -> &'t str {
        self.tree.slice(self.data().span)
    }

    pub fn location(&self) -> Location {
        self.tree.location(self.data().span)
    }

    pub fn parent(&self) -> Option<Node<'t>> {
        self.data().parent.map(|id| self.wrap(id))
    }

    pub fn children(&self) -> impl DoubleEndedIterator<Item = Node<'t>> + 't {
        let tree = self.tree;
        self.data()
            .children
            .iter()
            .map(move |&id| Node { tree, id })
    }

    /// Named children excluding comments
    pub fn elements(&self) -> impl DoubleEndedIterator<Item = Node<'t>> + 't {
        self.children()
            .filter(|child| child.is_named() && child.kind() != NodeKind::Comment)
    }

    pub fn child_by_field(&self, field: &str) -> Option<Node<'t>> {
        self.children().find(|child| child.field() == Some(field))
    }

    pub fn next_sibling(&self) -> Option<Node<'t>> {
        let parent = self.parent()?;
        let siblings = &parent.data().children;
        let pos = siblings.iter().position(|&id| id == self.id)?;
        siblings.get(pos + 1).map(|&id| self.wrap(id))
    }

    pub fn prev_sibling(&self) -> Option<Node<'t>> {
        let parent = self.parent()?;
        let siblings = &parent.data().children;
        let pos = siblings.iter().position(|&id| id == self.id)?;
        pos.checked_sub(1).map(|idx| self.wrap(siblings[idx]))
    }

    /// Tokens covered by this node, comments included
    pub fn tokens(&self) -> &'t [Token] {
        &self.tree.tokens[self.data().tokens.clone()]
    }

    pub fn first_token(&self) -> Option<&'t Token> {
        self.tokens().iter().find(|t| !t.is_comment())
    }

    pub fn last_token(&self) -> Option<&'t Token> {
        self.tokens().iter().rev().find(|t| !t.is_comment())
    }

    /// The non-comment token immediately before this node
    pub fn token_before(&self) -> Option<&'t Token> {
        let first = self.data().tokens.start;
        self.tree.tokens[..first].iter().rev().find(|t| !t.is_comment())
    }

    /// The non-comment token immediately after this node
    pub fn token_after(&self) -> Option<&'t Token> {
        let end = self.data().tokens.end;
        self.tree.tokens[end..].iter().find(|t| !t.is_comment())
    }

    /// First token of this node whose text is `text`
    pub fn find_token(&self, text: &str) -> Option<&'t Token> {
        self.tokens()
            .iter()
            .find(|t| !t.is_comment() && self.tree.token_text(t) == text)
    }

    pub fn is_multiline(&self) -> bool {
        let loc = self.location();
        loc.start.line != loc.end.line
    }
}

/// Incremental builder used by parser collaborators
///
/// Nodes must be opened in pre-order and closed in reverse order; tokens
/// must be pushed in source order.
#[derive(Debug)]
pub struct TreeBuilder {
    text: String,
    dialect: Dialect,
    lines: LineIndex,
    tokens: Vec<Token>,
    nodes: Vec<NodeData>,
    open: Vec<NodeId>,
}

impl TreeBuilder {
    pub fn new(text: impl Into<String>, dialect: Dialect) -> Self {
        let text = text.into();
        let lines = LineIndex::new(&text);
        TreeBuilder {
            text,
            dialect,
            lines,
            tokens: Vec::new(),
            nodes: Vec::new(),
            open: Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Opens a node as a child of the innermost open node
    pub fn open_node(
        &mut self,
        raw_kind: &'static str,
        field: Option<&'static str>,
        named: bool,
        span: Span,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        let parent = self.open.last().copied();
        self.nodes.push(NodeData {
            kind: NodeKind::from_grammar(raw_kind),
            raw_kind,
            field,
            named,
            span,
            parent,
            children: Vec::new(),
            tokens: self.tokens.len()..self.tokens.len(),
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        self.open.push(id);
        id
    }

    /// Appends a token to the stream
    pub fn push_token(&mut self, kind: TokenKind, span: Span) {
        let index = self.tokens.len();
        let start = self.lines.position(&self.text, span.start);
        let end = self.lines.position(&self.text, span.end);
        self.tokens.push(Token {
            index,
            kind,
            span,
            start,
            end,
        });
    }

    /// Closes the innermost open node
    pub fn close_node(&mut self) {
        if let Some(id) = self.open.pop() {
            self.nodes[id.0].tokens.end = self.tokens.len();
        }
    }

    pub fn finish(mut self) -> SourceTree {
        while !self.open.is_empty() {
            self.close_node();
        }
        if self.nodes.is_empty() {
            let span = Span::new(0, self.text.len());
            self.open_node("program", None, true, span);
            self.close_node();
        }
        SourceTree {
            text: self.text,
            dialect: self.dialect,
            lines: self.lines,
            tokens: self.tokens,
            nodes: self.nodes,
        }
    }
}
