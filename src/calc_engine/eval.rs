use super::node::{ExprTree, NodeId, Operator};

pub struct Step {
    pub operation: String,
    pub result: i64,
}

pub struct EvaluationTrace {
    pub steps: Vec<Step>,
    pub detailed_mode: bool,
}

impl EvaluationTrace {
    pub fn new(detailed_mode: bool) -> Self {
        EvaluationTrace {
            steps: Vec::new(),
            detailed_mode,
        }
    }

    pub fn add_step(&mut self, operation: String, result: i64) {
        if self.detailed_mode {
            self.steps.push(Step { operation, result });
        }
    }
}

/// Fold the tree into a value. Overflow wraps.
pub fn evaluate(tree: &ExprTree) -> i64 {
    fold(tree, &mut EvaluationTrace::new(false))
}

/// Same as [`evaluate`], recording one step per combining node.
pub fn evaluate_traced(tree: &ExprTree, trace: &mut EvaluationTrace) -> i64 {
    let value = fold(tree, trace);
    log::debug!("evaluated to {value} in {} steps", trace.steps.len());
    value
}

fn fold(tree: &ExprTree, trace: &mut EvaluationTrace) -> i64 {
    if tree.is_empty() {
        return 0;
    }
    let mut values = vec![0i64; tree.len()];
    for id in tree.post_order() {
        let node = tree.node(id);
        let value = match (node.operator, node.operands.as_slice()) {
            (Operator::None, _) => node.value,
            (_, [only]) => values[only.index()],
            (Operator::Add, operands) => {
                combine(trace, '+', operands, &values, 0, i64::wrapping_add)
            }
            (Operator::Multiply, operands) => {
                combine(trace, '*', operands, &values, 1, i64::wrapping_mul)
            }
        };
        values[id.index()] = value;
    }
    values[tree.root().index()]
}

fn combine(
    trace: &mut EvaluationTrace,
    symbol: char,
    operands: &[NodeId],
    values: &[i64],
    identity: i64,
    op: fn(i64, i64) -> i64,
) -> i64 {
    let inputs: Vec<i64> = operands.iter().map(|id| values[id.index()]).collect();
    let result = inputs.iter().fold(identity, |acc, &v| op(acc, v));
    if trace.detailed_mode {
        let operation = inputs
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(&format!(" {symbol} "));
        trace.add_step(operation, result);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc_engine::builder::parse;

    fn eval(src: &str) -> i64 {
        evaluate(&parse(src.as_bytes()).unwrap())
    }

    #[test]
    fn precedence_and_grouping() {
        assert_eq!(eval("1+2+3"), 6);
        assert_eq!(eval("2*3+4"), 10);
        assert_eq!(eval("4+2*3"), 10);
        assert_eq!(eval("2*(3+4)"), 14);
        assert_eq!(eval("(1+2)"), 3);
        assert_eq!(eval("(2+3)*(4+5)+1"), 46);
        assert_eq!(eval("2*3*4+1*5"), 29);
    }

    #[test]
    fn n_ary_folds_every_operand() {
        assert_eq!(eval("1+2+3+4"), 10);
        assert_eq!(eval("1*2*3*4*5"), 120);
    }

    #[test]
    fn overflow_wraps() {
        assert_eq!(eval("9223372036854775807+1"), i64::MIN);
        assert_eq!(eval("9223372036854775807*2"), -2);
    }

    #[test]
    fn evaluation_is_repeatable() {
        let tree = parse(b"3*(2+5)+1").unwrap();
        assert_eq!(evaluate(&tree), evaluate(&tree));
    }

    #[test]
    fn trace_records_post_order_steps() {
        let tree = parse(b"2*(3+4)+1").unwrap();
        let mut trace = EvaluationTrace::new(true);
        assert_eq!(evaluate_traced(&tree, &mut trace), 15);
        let ops: Vec<(&str, i64)> = trace
            .steps
            .iter()
            .map(|s| (s.operation.as_str(), s.result))
            .collect();
        assert_eq!(ops, vec![("3 + 4", 7), ("2 * 7", 14), ("14 + 1", 15)]);
    }

    #[test]
    fn trace_follows_source_order_across_siblings() {
        let tree = parse(b"2*3+4*5").unwrap();
        let mut trace = EvaluationTrace::new(true);
        assert_eq!(evaluate_traced(&tree, &mut trace), 26);
        let ops: Vec<&str> = trace.steps.iter().map(|s| s.operation.as_str()).collect();
        assert_eq!(ops, vec!["2 * 3", "4 * 5", "6 + 20"]);
    }

    #[test]
    fn quiet_trace_stays_empty() {
        let tree = parse(b"1+1").unwrap();
        let mut trace = EvaluationTrace::new(false);
        assert_eq!(evaluate_traced(&tree, &mut trace), 2);
        assert!(trace.steps.is_empty());
    }
}
