//! Arena construction.
//!
//! `AstBuilder` is the allocation API for parsers and for tests that build
//! programs by hand. Children are allocated before the node that refers to
//! them, so ids are always handed out bottom-up.

use crate::{Ast, BinaryOp, Node, NodeId, NodeKind, Slot};

/// Incrementally allocates nodes into a fresh arena.
#[derive(Debug, Default)]
pub struct AstBuilder {
    nodes: Vec<Node>,
}

impl AstBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node and return its id.
    ///
    /// # Panics
    /// Panics if the arena already holds `u32::MAX` nodes.
    pub fn alloc(&mut self, node: Node) -> NodeId {
        let index = u32::try_from(self.nodes.len())
            .ok()
            .filter(|&index| index != u32::MAX)
            .unwrap_or_else(|| panic!("AST arena exceeded {} nodes", u32::MAX));
        self.nodes.push(node);
        NodeId::new(index)
    }

    /// Allocate a node from its kind and slots.
    pub fn node(
        &mut self,
        kind: NodeKind,
        second: impl Into<Slot>,
        third: impl Into<Slot>,
        fourth: impl Into<Slot>,
    ) -> NodeId {
        self.alloc(Node::new(kind, second.into(), third.into(), fourth.into()))
    }

    /// Finish building with `root` as the program entry.
    pub fn finish(self, root: NodeId) -> Ast {
        Ast::new(self.nodes, root)
    }

    // Literals

    pub fn string(&mut self, text: &str) -> NodeId {
        self.node(NodeKind::Str, text, Slot::Empty, Slot::Empty)
    }

    pub fn number(&mut self, n: f64) -> NodeId {
        self.node(NodeKind::Number, n, Slot::Empty, Slot::Empty)
    }

    pub fn boolean(&mut self, b: bool) -> NodeId {
        self.node(NodeKind::Bool, b, Slot::Empty, Slot::Empty)
    }

    pub fn null(&mut self) -> NodeId {
        self.alloc(Node::bare(NodeKind::Null))
    }

    // Expressions

    pub fn ident(&mut self, name: &str) -> NodeId {
        self.node(NodeKind::Ident, name, Slot::Empty, Slot::Empty)
    }

    pub fn binary(&mut self, op: BinaryOp, left: NodeId, right: NodeId) -> NodeId {
        self.node(NodeKind::Binary(op), left, right, Slot::Empty)
    }

    pub fn not(&mut self, operand: NodeId) -> NodeId {
        self.node(NodeKind::Not, operand, Slot::Empty, Slot::Empty)
    }

    /// `target.field`. The field name is carried by an identifier node.
    pub fn member(&mut self, target: NodeId, field: &str) -> NodeId {
        let field = self.ident(field);
        self.node(NodeKind::Member, target, field, Slot::Empty)
    }

    /// Build a right-recursive list and return its head slot.
    ///
    /// An empty list is `Slot::Empty`.
    pub fn list<I>(&mut self, items: I) -> Slot
    where
        I: IntoIterator,
        I::IntoIter: DoubleEndedIterator,
        I::Item: Into<Slot>,
    {
        items.into_iter().rev().fold(Slot::Empty, |next, item| {
            Slot::Node(self.node(NodeKind::List, item, next, Slot::Empty))
        })
    }

    pub fn array(&mut self, elements: &[NodeId]) -> NodeId {
        let list = self.list(elements.iter().copied());
        self.node(NodeKind::Array, list, Slot::Empty, Slot::Empty)
    }

    /// Map literal from `(key, value)` expression pairs.
    pub fn map(&mut self, entries: &[(NodeId, NodeId)]) -> NodeId {
        let pairs: Vec<NodeId> = entries
            .iter()
            .map(|&(key, value)| self.node(NodeKind::Pair, key, value, Slot::Empty))
            .collect();
        let list = self.list(pairs);
        self.node(NodeKind::Map, list, Slot::Empty, Slot::Empty)
    }

    /// `target[index]`
    pub fn index(&mut self, target: &str, index: NodeId) -> NodeId {
        self.node(NodeKind::ArrayGet, target, index, Slot::Empty)
    }

    // Bindings

    /// `let name;`
    pub fn declare(&mut self, name: &str) -> NodeId {
        self.node(NodeKind::DeclareVar, name, Slot::Empty, Slot::Empty)
    }

    /// `let name = init;`
    pub fn declare_init(&mut self, name: &str, init: NodeId) -> NodeId {
        self.node(NodeKind::DeclareVarInitial, name, init, Slot::Empty)
    }

    /// `name = value;`
    pub fn assign(&mut self, name: &str, value: NodeId) -> NodeId {
        self.node(NodeKind::SetValue, name, value, Slot::Empty)
    }

    /// `name op= value;`
    pub fn compound(&mut self, op: BinaryOp, name: &str, value: NodeId) -> NodeId {
        self.node(NodeKind::CompoundAssign(op), name, value, Slot::Empty)
    }

    /// `target[index] = value;`
    pub fn set_index(&mut self, target: &str, index: NodeId, value: NodeId) -> NodeId {
        self.node(NodeKind::SetArrayValue, target, index, value)
    }

    // Control flow

    pub fn if_else(
        &mut self,
        condition: NodeId,
        then_body: Option<NodeId>,
        else_body: Option<NodeId>,
    ) -> NodeId {
        self.node(NodeKind::If, condition, then_body, else_body)
    }

    pub fn while_loop(&mut self, condition: NodeId, body: Option<NodeId>) -> NodeId {
        self.node(NodeKind::While, condition, body, Slot::Empty)
    }

    pub fn ret(&mut self, value: Option<NodeId>) -> NodeId {
        self.node(NodeKind::Return, value, Slot::Empty, Slot::Empty)
    }

    pub fn brk(&mut self, value: Option<NodeId>) -> NodeId {
        self.node(NodeKind::Break, value, Slot::Empty, Slot::Empty)
    }

    pub fn cont(&mut self, value: Option<NodeId>) -> NodeId {
        self.node(NodeKind::Continue, value, Slot::Empty, Slot::Empty)
    }

    // Functions

    pub fn function(&mut self, name: &str, params: &[&str], body: Option<NodeId>) -> NodeId {
        let params = self.list(params.iter().copied());
        self.node(NodeKind::FunctionDeclare, name, params, body)
    }

    pub fn call(&mut self, name: &str, args: &[NodeId]) -> NodeId {
        let args = self.list(args.iter().copied());
        self.node(NodeKind::FunctionCall, name, args, Slot::Empty)
    }

    // Structure

    pub fn seq(&mut self, first: NodeId, second: NodeId) -> NodeId {
        self.node(NodeKind::Seq, first, second, Slot::Empty)
    }

    /// Chain statements into nested sequences, `s1; (s2; (s3; ...))`.
    ///
    /// A single statement is returned as is; an empty block becomes a `NULL`
    /// literal.
    pub fn block(&mut self, statements: &[NodeId]) -> NodeId {
        match statements.split_last() {
            None => self.null(),
            Some((&last, init)) => init
                .iter()
                .rev()
                .fold(last, |rest, &statement| self.seq(statement, rest)),
        }
    }
}
