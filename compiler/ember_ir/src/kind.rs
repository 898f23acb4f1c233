//! Node kinds and operators.
//!
//! The parser labels every node with a string tag. `NodeKind::from_tag` maps
//! those labels onto the closed set the dispatcher understands; anything else
//! becomes `NodeKind::Unknown` so newer parsers can emit kinds this engine
//! does not know about.

/// Binary operators shared by the arithmetic/comparison nodes and the
/// compound assignments.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl BinaryOp {
    /// Returns the source-level symbol for this operator.
    ///
    /// Used in error messages to show the exact operator that failed.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
        }
    }

    /// Returns true for operators that produce a boolean.
    pub const fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Eq | Self::NotEq | Self::Lt | Self::LtEq | Self::Gt | Self::GtEq
        )
    }

    fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "+" => Self::Add,
            "-" => Self::Sub,
            "*" => Self::Mul,
            "/" => Self::Div,
            "==" => Self::Eq,
            "!=" => Self::NotEq,
            "<" => Self::Lt,
            "<=" => Self::LtEq,
            ">" => Self::Gt,
            ">=" => Self::GtEq,
            _ => return None,
        })
    }

    /// Tag of the compound assignment built on this operator, if any.
    const fn compound_tag(self) -> Option<&'static str> {
        match self {
            Self::Add => Some("+="),
            Self::Sub => Some("-="),
            Self::Mul => Some("*="),
            Self::Div => Some("/="),
            _ => None,
        }
    }
}

/// The kind of an AST node, decoded from the parser's tag.
///
/// Slot usage per kind (parser positions 2, 3 and 4):
///
/// | kind | slot 2 | slot 3 | slot 4 |
/// |------|--------|--------|--------|
/// | `Str`/`Number`/`Bool` | literal | | |
/// | `Binary` | left node | right node | |
/// | `Not` | operand node | | |
/// | `Member` | target node | identifier node (name in its slot 2) | |
/// | `Array` | element list | | |
/// | `Map` | list of `Pair` nodes | | |
/// | `Pair` | key node | value node | |
/// | `ArrayGet` | target name | index node | |
/// | `Ident` | name | | |
/// | `DeclareVar` | name | | |
/// | `DeclareVarInitial`/`SetValue`/`CompoundAssign` | name | value node | |
/// | `SetArrayValue` | target name | index node | value node |
/// | `If` | condition node | then body | else body |
/// | `While` | condition node | body | |
/// | `Return`/`Break`/`Continue` | optional operand node | | |
/// | `FunctionDeclare` | name | parameter-name list | body |
/// | `FunctionCall` | name | argument list | |
/// | `Seq` | first statement | second statement | |
/// | `List` | element | next cell | |
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    // Literals
    Str,
    Number,
    Bool,
    Null,

    // Expressions
    Binary(BinaryOp),
    Not,
    Member,
    Array,
    Map,
    Pair,
    ArrayGet,
    Ident,

    // Bindings
    DeclareVar,
    DeclareVarInitial,
    SetValue,
    SetArrayValue,
    CompoundAssign(BinaryOp),

    // Control flow
    If,
    While,
    Return,
    Break,
    Continue,

    // Functions
    FunctionDeclare,
    FunctionCall,

    // Structure
    Seq,
    /// Cell of a right-recursive list. Only read by the node that owns the
    /// list; dispatching one directly yields null.
    List,

    /// A tag this engine does not recognize.
    Unknown(String),
}

impl NodeKind {
    /// Decode a parser tag. Never fails: unrecognized tags become `Unknown`.
    pub fn from_tag(tag: &str) -> Self {
        if let Some(op) = BinaryOp::from_symbol(tag) {
            return Self::Binary(op);
        }
        if let Some(symbol) = tag.strip_suffix('=') {
            if let Some(op) = BinaryOp::from_symbol(symbol) {
                if op.compound_tag().is_some() {
                    return Self::CompoundAssign(op);
                }
            }
        }
        match tag {
            "STRING" => Self::Str,
            "NUMBER" => Self::Number,
            "BOOL" => Self::Bool,
            "NULL" => Self::Null,
            "!" => Self::Not,
            "." => Self::Member,
            "ARRAY" => Self::Array,
            "MAP" => Self::Map,
            "PAIR" => Self::Pair,
            "ARRAY_GET" => Self::ArrayGet,
            "IDENTIFY" => Self::Ident,
            "DECLARE_VAR" => Self::DeclareVar,
            "DECLARE_VAR_INITIAL" => Self::DeclareVarInitial,
            "SET_VALUE" => Self::SetValue,
            "SET_ARRAY_VALUE" => Self::SetArrayValue,
            "IF" => Self::If,
            "WHILE" => Self::While,
            "RETURN" => Self::Return,
            "BREAK" => Self::Break,
            "CONTINUE" => Self::Continue,
            "FUNCTION_DECLARE" => Self::FunctionDeclare,
            "FUNCTION_CALL" => Self::FunctionCall,
            "EXPRESSION_SEQ" => Self::Seq,
            "LIST" => Self::List,
            other => Self::Unknown(other.to_owned()),
        }
    }

    /// The parser tag for this kind.
    pub fn as_tag(&self) -> &str {
        match self {
            Self::Str => "STRING",
            Self::Number => "NUMBER",
            Self::Bool => "BOOL",
            Self::Null => "NULL",
            Self::Binary(op) => op.as_symbol(),
            Self::Not => "!",
            Self::Member => ".",
            Self::Array => "ARRAY",
            Self::Map => "MAP",
            Self::Pair => "PAIR",
            Self::ArrayGet => "ARRAY_GET",
            Self::Ident => "IDENTIFY",
            Self::DeclareVar => "DECLARE_VAR",
            Self::DeclareVarInitial => "DECLARE_VAR_INITIAL",
            Self::SetValue => "SET_VALUE",
            Self::SetArrayValue => "SET_ARRAY_VALUE",
            // Only the four arithmetic operators have compound forms.
            Self::CompoundAssign(op) => op.compound_tag().unwrap_or("="),
            Self::If => "IF",
            Self::While => "WHILE",
            Self::Return => "RETURN",
            Self::Break => "BREAK",
            Self::Continue => "CONTINUE",
            Self::FunctionDeclare => "FUNCTION_DECLARE",
            Self::FunctionCall => "FUNCTION_CALL",
            Self::Seq => "EXPRESSION_SEQ",
            Self::List => "LIST",
            Self::Unknown(tag) => tag.as_str(),
        }
    }
}
