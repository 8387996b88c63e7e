/// How a node combines its operands. `None` marks a literal leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    None,
    Add,
    Multiply,
}

impl Operator {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'+' => Some(Operator::Add),
            b'*' => Some(Operator::Multiply),
            _ => None,
        }
    }

    pub fn symbol(self) -> Option<char> {
        match self {
            Operator::None => None,
            Operator::Add => Some('+'),
            Operator::Multiply => Some('*'),
        }
    }
}

/// Index of a node inside its [`ExprTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Position in the arena; dense from 0 to `len() - 1`.
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExprNode {
    pub operator: Operator,
    pub value: i64,
    pub operands: Vec<NodeId>,
    pub parent: Option<NodeId>,
}

impl ExprNode {
    pub fn is_leaf(&self) -> bool {
        self.operator == Operator::None
    }
}

/// Arena holding every node of one parsed expression.
///
/// The tree owns all of its nodes; `NodeId`s and parent links are plain
/// indices, so there is no shared ownership between parents and children.
/// A node is always pushed after its parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExprTree {
    nodes: Vec<ExprNode>,
    root: NodeId,
}

impl ExprTree {
    pub(crate) fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: NodeId(0),
        }
    }

    pub(crate) fn push_leaf(&mut self, value: i64, parent: Option<NodeId>) -> NodeId {
        self.push(ExprNode {
            operator: Operator::None,
            value,
            operands: Vec::new(),
            parent,
        })
    }

    pub(crate) fn push_branch(&mut self, operator: Operator, parent: Option<NodeId>) -> NodeId {
        debug_assert_ne!(operator, Operator::None, "a branch needs a combining operator");
        self.push(ExprNode {
            operator,
            value: 0,
            operands: Vec::new(),
            parent,
        })
    }

    pub(crate) fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].operands.push(child);
    }

    pub(crate) fn set_root(&mut self, root: NodeId) {
        self.root = root;
    }

    fn push(&mut self, node: ExprNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &ExprNode {
        &self.nodes[id.0]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).operands
    }

    /// Walk from `id` up to the root, excluding `id` itself.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            current: self.parent(id),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Longest root-to-leaf path, counting the root as depth 1.
    pub fn depth(&self) -> usize {
        let mut depths = vec![0; self.nodes.len()];
        for (i, node) in self.nodes.iter().enumerate() {
            let depth = node.parent.map_or(1, |parent| depths[parent.0] + 1);
            depths[i] = depth;
        }
        depths.into_iter().max().unwrap_or(0)
    }

    /// Every node below and including the root, children before their
    /// parent and siblings left to right.
    pub fn post_order(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        if self.is_empty() {
            return order;
        }
        let mut stack = vec![(self.root, false)];
        while let Some((id, expanded)) = stack.pop() {
            let children = self.children(id);
            if expanded || children.is_empty() {
                order.push(id);
            } else {
                stack.push((id, true));
                stack.extend(children.iter().rev().map(|&child| (child, false)));
            }
        }
        order
    }
}

pub struct Ancestors<'a> {
    tree: &'a ExprTree,
    current: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (ExprTree, NodeId, NodeId) {
        // (+ 1 (* 2 3))
        let mut tree = ExprTree::new();
        let add = tree.push_branch(Operator::Add, None);
        let one = tree.push_leaf(1, Some(add));
        tree.attach(add, one);
        let mul = tree.push_branch(Operator::Multiply, Some(add));
        tree.attach(add, mul);
        let three = {
            let two = tree.push_leaf(2, Some(mul));
            tree.attach(mul, two);
            let three = tree.push_leaf(3, Some(mul));
            tree.attach(mul, three);
            three
        };
        tree.set_root(add);
        (tree, add, three)
    }

    #[test]
    fn ancestors_walk_to_root() {
        let (tree, add, three) = sample();
        let mul = tree.parent(three).unwrap();
        assert_eq!(tree.ancestors(three).collect::<Vec<_>>(), vec![mul, add]);
        assert_eq!(tree.ancestors(add).count(), 0);
    }

    #[test]
    fn depth_counts_levels() {
        let (tree, ..) = sample();
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn post_order_visits_children_first() {
        let (tree, add, three) = sample();
        let values: Vec<(Operator, i64)> = tree
            .post_order()
            .into_iter()
            .map(|id| (tree.node(id).operator, tree.node(id).value))
            .collect();
        assert_eq!(
            values,
            vec![
                (Operator::None, 1),
                (Operator::None, 2),
                (Operator::None, 3),
                (Operator::Multiply, 0),
                (Operator::Add, 0),
            ]
        );
        assert_eq!(tree.post_order().last(), Some(&add));
        assert_eq!(three.index(), 4);
    }

    #[test]
    fn operator_bytes() {
        assert_eq!(Operator::from_byte(b'+'), Some(Operator::Add));
        assert_eq!(Operator::from_byte(b'*'), Some(Operator::Multiply));
        assert_eq!(Operator::from_byte(b'-'), None);
        assert_eq!(Operator::None.symbol(), None);
    }
}
