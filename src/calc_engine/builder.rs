use std::ops::Range;

use super::error::ParseResult;
use super::node::{ExprTree, NodeId};
use super::scanner::{Scanner, SpanShape};

/// Parse the whole of `input` into an expression tree.
///
/// Any grammar violation anywhere aborts the parse; no partial tree is
/// returned. Nesting depth is bounded only by memory.
pub fn parse(input: &[u8]) -> ParseResult<ExprTree> {
    let scanner = Scanner::new(input)?;
    let mut tree = ExprTree::new();

    // Spans still to build, with the node they hang under. Siblings are
    // pushed in reverse so they pop, and attach, in source order.
    let mut pending: Vec<(Range<usize>, Option<NodeId>)> = vec![(0..input.len(), None)];
    while let Some((mut span, parent)) = pending.pop() {
        let id = loop {
            match scanner.classify(span)? {
                SpanShape::Redispatch(inner) => span = inner,
                SpanShape::Literal(value) => break tree.push_leaf(value, parent),
                SpanShape::Split { operator, parts } => {
                    let id = tree.push_branch(operator, parent);
                    pending.extend(parts.into_iter().rev().map(|part| (part, Some(id))));
                    break id;
                }
            }
        };
        match parent {
            Some(parent) => tree.attach(parent, id),
            None => tree.set_root(id),
        }
    }

    log::debug!(
        "parsed {} bytes into {} nodes (depth {})",
        input.len(),
        tree.len(),
        tree.depth()
    );
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc_engine::error::Violation;
    use crate::calc_engine::node::Operator;

    #[test]
    fn literal_is_a_single_leaf() {
        let tree = parse(b"17").unwrap();
        assert_eq!(tree.len(), 1);
        let root = tree.node(tree.root());
        assert!(root.is_leaf());
        assert_eq!(root.value, 17);
        assert_eq!(root.parent, None);
    }

    #[test]
    fn flat_sum_is_n_ary() {
        let tree = parse(b"1+2+3+4").unwrap();
        let root = tree.node(tree.root());
        assert_eq!(root.operator, Operator::Add);
        let values: Vec<i64> = root
            .operands
            .iter()
            .map(|&id| tree.node(id).value)
            .collect();
        assert_eq!(values, vec![1, 2, 3, 4]);
    }

    #[test]
    fn redundant_brackets_add_no_depth() {
        assert_eq!(parse(b"(((5)))").unwrap().depth(), 1);
        assert_eq!(parse(b"((1+2))").unwrap().depth(), 2);
    }

    #[test]
    fn children_point_back_to_parent() {
        let tree = parse(b"2*(3+4)").unwrap();
        let root = tree.root();
        for &child in tree.children(root) {
            assert_eq!(tree.parent(child), Some(root));
        }
        let sum = tree.children(root)[1];
        assert_eq!(tree.node(sum).operator, Operator::Add);
        let four = tree.children(sum)[1];
        assert_eq!(tree.ancestors(four).collect::<Vec<_>>(), vec![sum, root]);
    }

    #[test]
    fn nested_failure_aborts_everything() {
        let err = parse(b"1+(2*)").unwrap_err();
        assert_eq!(err.offset(), 4);
    }

    #[test]
    fn siblings_keep_source_order() {
        let tree = parse(b"(1*2)+3+(4+5)").unwrap();
        let root = tree.root();
        let kinds: Vec<(Operator, i64)> = tree
            .children(root)
            .iter()
            .map(|&id| (tree.node(id).operator, tree.node(id).value))
            .collect();
        assert_eq!(
            kinds,
            vec![(Operator::Multiply, 0), (Operator::None, 3), (Operator::Add, 0)]
        );
        let last = tree.children(root)[2];
        let values: Vec<i64> = tree
            .children(last)
            .iter()
            .map(|&id| tree.node(id).value)
            .collect();
        assert_eq!(values, vec![4, 5]);
    }

    #[test]
    fn whitespace_fails_the_parse() {
        let err = parse(b"1 + 2").unwrap_err();
        assert_eq!(err.offset(), 1);
        assert_eq!(err.violation(), Violation::UnexpectedWhitespace);
        assert_eq!(parse(b"(3*\n4)").unwrap_err().offset(), 3);
    }

    #[test]
    fn empty_input_is_zero_leaf() {
        let tree = parse(b"").unwrap();
        assert_eq!(tree.node(tree.root()).value, 0);
    }
}
