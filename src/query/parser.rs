//! Query Parser - Boolean Expression Trees
//!
//! Recursive descent over the token stream:
//!
//! ```text
//! Expression := AndExpr (OR AndExpr)*
//! AndExpr    := Primary ((AND)? Primary)*    juxtaposition is implicit AND
//! Primary    := '(' Expression ')' | Filter | Text
//! ```
//!
//! The parser is deliberately forgiving: any failure - nesting deeper than
//! the depth limit, loop iteration caps, an unexpected or missing token,
//! trailing unconsumed input - collapses to "no expression", which the
//! evaluator treats as match-everything. Malformed queries never error out
//! to the caller and never loop forever.

use serde::{Deserialize, Serialize};

use super::token::{tokenize, FilterKind, QueryToken};

// =============================================================================
// Limits
// =============================================================================

/// Maximum grammar-rule nesting before parsing is abandoned
pub const MAX_DEPTH: usize = 50;

/// Maximum iterations of the OR / implicit-AND loops (defensive bound)
pub const MAX_ITERATIONS: usize = 100;

// =============================================================================
// AST
// =============================================================================

/// Boolean operator joining two subtrees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BoolOp {
    And,
    Or,
}

/// A node in the parsed query tree. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QueryNode {
    Filter {
        kind: FilterKind,
        value: String,
        exclude: bool,
    },
    Text {
        value: String,
    },
    Op {
        op: BoolOp,
        left: Box<QueryNode>,
        right: Box<QueryNode>,
    },
}

/// A flattened query leaf, in depth-first left-to-right order.
/// Used by callers for chip-style display; the order is contractual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatToken {
    pub kind: FlatKind,
    pub value: String,
    pub exclude: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlatKind {
    Tag,
    Collection,
    Text,
}

// =============================================================================
// Parsing
// =============================================================================

/// Parse a query string into an expression tree.
///
/// Empty/whitespace-only input and every parse failure yield `None`, which
/// downstream means "no filtering applied".
pub fn parse_query(input: &str) -> Option<QueryNode> {
    if input.trim().is_empty() {
        return None;
    }

    let tokens = tokenize(input);
    if tokens.is_empty() {
        return None;
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    match parser.expression() {
        // Trailing unconsumed tokens are a parse failure too
        Ok(node) if parser.pos == parser.tokens.len() => Some(node),
        _ => None,
    }
}

/// Flatten a tree into its filter/text leaves, depth-first left-to-right
pub fn flatten(ast: Option<&QueryNode>) -> Vec<FlatToken> {
    let mut out = Vec::new();
    if let Some(node) = ast {
        collect_leaves(node, &mut out);
    }
    out
}

fn collect_leaves(node: &QueryNode, out: &mut Vec<FlatToken>) {
    match node {
        QueryNode::Filter {
            kind,
            value,
            exclude,
        } => out.push(FlatToken {
            kind: match kind {
                FilterKind::Tag => FlatKind::Tag,
                FilterKind::Collection => FlatKind::Collection,
            },
            value: value.clone(),
            exclude: *exclude,
        }),
        QueryNode::Text { value } => out.push(FlatToken {
            kind: FlatKind::Text,
            value: value.clone(),
            exclude: false,
        }),
        QueryNode::Op { left, right, .. } => {
            collect_leaves(left, out);
            collect_leaves(right, out);
        }
    }
}

// =============================================================================
// Parser internals
// =============================================================================

/// Internal parse failure; every variant collapses to `None` at the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseFail {
    DepthExceeded,
    IterationLimit,
    UnexpectedToken,
    UnexpectedEnd,
}

struct Parser {
    tokens: Vec<QueryToken>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn enter(&mut self) -> Result<(), ParseFail> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ParseFail::DepthExceeded);
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn peek(&self) -> Option<&QueryToken> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<QueryToken> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expression(&mut self) -> Result<QueryNode, ParseFail> {
        self.enter()?;
        let result = self.expression_inner();
        self.leave();
        result
    }

    fn expression_inner(&mut self) -> Result<QueryNode, ParseFail> {
        let mut left = self.and_expr()?;
        let mut iterations = 0;
        while matches!(self.peek(), Some(QueryToken::Or)) {
            iterations += 1;
            if iterations > MAX_ITERATIONS {
                return Err(ParseFail::IterationLimit);
            }
            self.advance();
            let right = self.and_expr()?;
            left = QueryNode::Op {
                op: BoolOp::Or,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn and_expr(&mut self) -> Result<QueryNode, ParseFail> {
        self.enter()?;
        let result = self.and_expr_inner();
        self.leave();
        result
    }

    fn and_expr_inner(&mut self) -> Result<QueryNode, ParseFail> {
        let mut left = self.primary()?;
        let mut iterations = 0;
        loop {
            match self.peek() {
                // Explicit AND keyword
                Some(QueryToken::And) => {
                    self.advance();
                }
                // Juxtaposition: a following primary is an implicit AND
                Some(QueryToken::OpenParen)
                | Some(QueryToken::Filter { .. })
                | Some(QueryToken::Text(_)) => {}
                _ => break,
            }

            iterations += 1;
            if iterations > MAX_ITERATIONS {
                return Err(ParseFail::IterationLimit);
            }

            let right = self.primary()?;
            left = QueryNode::Op {
                op: BoolOp::And,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn primary(&mut self) -> Result<QueryNode, ParseFail> {
        self.enter()?;
        let result = self.primary_inner();
        self.leave();
        result
    }

    fn primary_inner(&mut self) -> Result<QueryNode, ParseFail> {
        match self.advance() {
            Some(QueryToken::OpenParen) => {
                let node = self.expression()?;
                match self.advance() {
                    Some(QueryToken::CloseParen) => Ok(node),
                    Some(_) => Err(ParseFail::UnexpectedToken),
                    None => Err(ParseFail::UnexpectedEnd),
                }
            }
            Some(QueryToken::Filter {
                kind,
                value,
                exclude,
            }) => Ok(QueryNode::Filter {
                kind,
                value,
                exclude,
            }),
            Some(QueryToken::Text(value)) => Ok(QueryNode::Text { value }),
            Some(_) => Err(ParseFail::UnexpectedToken),
            None => Err(ParseFail::UnexpectedEnd),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
