//! The parser's JSON node shape and its lowering into the arena.
//!
//! The parser emits nested objects:
//!
//! ```text
//! {"param1": "+", "param2": {"param1": "NUMBER", "param2": 1}, "param3": ...}
//! ```
//!
//! `param1` is the kind tag (`kind` is accepted as an alias); `param2`
//! through `param4` are either nested nodes, literals, or absent/null.

use serde::Deserialize;

use crate::{Ast, AstBuilder, Node, NodeId, NodeKind, Slot};

/// A node exactly as the parser serializes it.
#[derive(Clone, Debug, Deserialize)]
pub struct RawNode {
    #[serde(rename = "param1", alias = "kind")]
    pub kind: String,
    #[serde(default)]
    pub param2: Option<RawSlot>,
    #[serde(default)]
    pub param3: Option<RawSlot>,
    #[serde(default)]
    pub param4: Option<RawSlot>,
}

/// One serialized slot. JSON `null` and a missing field both mean empty.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum RawSlot {
    Node(Box<RawNode>),
    Bool(bool),
    Number(f64),
    Text(String),
}

/// Flatten a serialized tree into an arena rooted at `root`.
pub fn lower(root: &RawNode) -> Ast {
    let mut builder = AstBuilder::new();
    let id = lower_node(&mut builder, root);
    builder.finish(id)
}

fn lower_node(builder: &mut AstBuilder, raw: &RawNode) -> NodeId {
    let node = Node::new(
        NodeKind::from_tag(&raw.kind),
        lower_slot(builder, raw.param2.as_ref()),
        lower_slot(builder, raw.param3.as_ref()),
        lower_slot(builder, raw.param4.as_ref()),
    );
    builder.alloc(node)
}

fn lower_slot(builder: &mut AstBuilder, raw: Option<&RawSlot>) -> Slot {
    match raw {
        None => Slot::Empty,
        Some(RawSlot::Node(node)) => Slot::Node(lower_node(builder, node)),
        Some(RawSlot::Bool(b)) => Slot::Bool(*b),
        Some(RawSlot::Number(n)) => Slot::Number(*n),
        Some(RawSlot::Text(text)) => Slot::Text(text.clone()),
    }
}
