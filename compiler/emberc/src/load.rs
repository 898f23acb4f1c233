//! Loading the parser's JSON node tree.

use ember_ir::{lower, Ast, RawNode};
use serde::Deserialize;

/// Stack reserved for deserializing and lowering one program.
///
/// Statement sequences nest one level per statement, so long programs are
/// deep trees. Both passes are recursive.
const LOAD_STACK_SIZE: usize = 256 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("invalid AST JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse a JSON node tree and flatten it into an arena.
pub fn load_ast(text: &str) -> Result<Ast, LoadError> {
    stacker::grow(LOAD_STACK_SIZE, || {
        let mut deserializer = serde_json::Deserializer::from_str(text);
        deserializer.disable_recursion_limit();
        let raw = RawNode::deserialize(&mut deserializer)?;
        deserializer.end()?;
        let ast = lower(&raw);
        tracing::debug!(nodes = ast.len(), "loaded AST");
        Ok(ast)
    })
}
