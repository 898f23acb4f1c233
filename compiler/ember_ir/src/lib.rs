//! Ember IR - the node contract shared by the parser and the interpreter.
//!
//! The parser produces a tree of tagged nodes. Each node carries a kind tag
//! (parser slot 1) and up to three payload slots (parser slots 2, 3 and 4)
//! that hold either a child node or an inline literal. This crate flattens
//! that tree into an arena (`Ast`) addressed by `NodeId`, and names the kinds
//! the dispatcher understands (`NodeKind`).
//!
//! # Lists
//!
//! Argument lists, parameter lists and literal element lists are
//! right-recursive cells: slot 2 holds the element, slot 3 the next cell.
//! An empty list is an empty slot.

mod ast;
mod builder;
mod kind;
mod node;
mod node_id;
#[cfg(feature = "serde")]
mod raw;

pub use ast::{Ast, SharedAst};
pub use builder::AstBuilder;
pub use kind::{BinaryOp, NodeKind};
pub use node::{Node, Slot};
pub use node_id::NodeId;
#[cfg(feature = "serde")]
pub use raw::{lower, RawNode, RawSlot};
