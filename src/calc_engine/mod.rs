//! Parser and evaluator for `+` / `*` integer expressions.
//!
//! There is no tokenizer: `scanner` classifies a byte span in one pass,
//! `builder` works through the pieces with an explicit stack, and `eval` /
//! `render` walk the result the same way.

mod builder;
pub mod error;
mod eval;
mod node;
mod render;
pub mod scanner;

pub use builder::parse;
pub use error::{ParseError, ParseResult, Violation};
pub use eval::{evaluate, evaluate_traced, EvaluationTrace, Step};
pub use node::{Ancestors, ExprNode, ExprTree, NodeId, Operator};
pub use render::render;

/// Parse and evaluate human-typed input in one go.
///
/// Leading and trailing whitespace is trimmed; whitespace between tokens is
/// an error.
pub fn calculate(input: &str) -> ParseResult<i64> {
    parse(input.trim().as_bytes()).map(|tree| evaluate(&tree))
}
