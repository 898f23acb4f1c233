//! Nodes and their payload slots.

use crate::{NodeId, NodeKind};

/// One polymorphic payload slot.
///
/// What a slot holds depends on the node kind: a child node, an identifier
/// or string literal, a numeric or boolean literal, or nothing.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Slot {
    #[default]
    Empty,
    Node(NodeId),
    Text(String),
    Number(f64),
    Bool(bool),
}

static EMPTY_SLOT: Slot = Slot::Empty;

impl Slot {
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }

    #[inline]
    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            Slot::Node(id) => Some(*id),
            _ => None,
        }
    }

    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Slot::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Slot::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Slot::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<NodeId> for Slot {
    fn from(id: NodeId) -> Self {
        Slot::Node(id)
    }
}

impl From<Option<NodeId>> for Slot {
    fn from(id: Option<NodeId>) -> Self {
        id.map_or(Slot::Empty, Slot::Node)
    }
}

impl From<&str> for Slot {
    fn from(text: &str) -> Self {
        Slot::Text(text.to_owned())
    }
}

impl From<String> for Slot {
    fn from(text: String) -> Self {
        Slot::Text(text)
    }
}

impl From<f64> for Slot {
    fn from(n: f64) -> Self {
        Slot::Number(n)
    }
}

impl From<bool> for Slot {
    fn from(b: bool) -> Self {
        Slot::Bool(b)
    }
}

/// A node in the arena: its kind plus parser slots 2, 3 and 4.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub slots: [Slot; 3],
}

impl Node {
    pub fn new(kind: NodeKind, second: Slot, third: Slot, fourth: Slot) -> Self {
        Node {
            kind,
            slots: [second, third, fourth],
        }
    }

    /// Node with every slot empty.
    pub fn bare(kind: NodeKind) -> Self {
        Node::new(kind, Slot::Empty, Slot::Empty, Slot::Empty)
    }

    /// Slot by parser position (2, 3 or 4). Any other position reads as empty.
    #[inline]
    pub fn slot(&self, position: u8) -> &Slot {
        match position {
            2 => &self.slots[0],
            3 => &self.slots[1],
            4 => &self.slots[2],
            _ => &EMPTY_SLOT,
        }
    }
}
