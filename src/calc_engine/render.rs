use std::fmt;

use super::node::{ExprTree, NodeId};

/// Bracketed prefix form, e.g. ` (+ 1 (* 2 3))`.
pub fn render(tree: &ExprTree) -> String {
    tree.to_string()
}

enum Visit {
    Enter(NodeId),
    Close,
}

impl fmt::Display for ExprTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        let mut stack = vec![Visit::Enter(self.root())];
        while let Some(visit) = stack.pop() {
            let id = match visit {
                Visit::Close => {
                    f.write_str(")")?;
                    continue;
                }
                Visit::Enter(id) => id,
            };
            let node = self.node(id);
            match node.operator.symbol() {
                None => write!(f, " {}", node.value)?,
                Some(symbol) => {
                    write!(f, " ({symbol}")?;
                    stack.push(Visit::Close);
                    stack.extend(node.operands.iter().rev().map(|&child| Visit::Enter(child)));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc_engine::builder::parse;

    fn rendered(src: &str) -> String {
        render(&parse(src.as_bytes()).unwrap())
    }

    #[test]
    fn leaf() {
        assert_eq!(rendered("42"), " 42");
        assert_eq!(rendered(""), " 0");
    }

    #[test]
    fn nested() {
        assert_eq!(rendered("(1+(2*3))"), " (+ 1 (* 2 3))");
        assert_eq!(rendered("2*3+4"), " (+ (* 2 3) 4)");
        assert_eq!(rendered("1+2+3"), " (+ 1 2 3)");
        assert_eq!(rendered("(1*2)+(3*4)"), " (+ (* 1 2) (* 3 4))");
    }

    #[test]
    fn render_is_repeatable() {
        let tree = parse(b"(1+2)*3").unwrap();
        assert_eq!(render(&tree), render(&tree));
    }
}
