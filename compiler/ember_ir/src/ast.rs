//! The flat node arena.

use std::sync::Arc;

use crate::{Node, NodeId};

/// A parsed program: every node in one vector, plus the root.
///
/// Built with [`AstBuilder`](crate::AstBuilder) (or `lower`
/// from the parser's JSON with the `serde` feature) and immutable afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct Ast {
    nodes: Vec<Node>,
    root: NodeId,
}

/// Closures keep the arena their body lives in alive through this handle.
pub type SharedAst = Arc<Ast>;

impl Ast {
    pub(crate) fn new(nodes: Vec<Node>, root: NodeId) -> Self {
        Ast { nodes, root }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Look up a node. Returns `None` for `NodeId::INVALID` and for ids from
    /// another arena that fall out of range.
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Wrap in an `Arc` for handing to the interpreter.
    pub fn into_shared(self) -> SharedAst {
        Arc::new(self)
    }
}
