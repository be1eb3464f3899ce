//! Expression tree nodes.

use std::sync::Arc;

use smol_str::SmolStr;
use text_size::TextRange;

use crate::types::{EnumType, TypeDesc};

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `+` - identity for integral/float operands.
    Plus,
    /// `-` - negation, re-truncating per kind.
    Minus,
    /// `~` - bitwise complement, integral only.
    Complement,
    /// `!` - boolean negation, bool only.
    Not,
}

impl UnaryOp {
    /// Returns the operator's surface syntax.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Complement => "~",
            Self::Not => "!",
        }
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
    /// `&`
    BitAnd,
    /// `|`
    BitOr,
    /// `^`
    BitXor,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `&&`
    LogicalAnd,
    /// `||`
    LogicalOr,
}

impl BinaryOp {
    /// Returns the operator's surface syntax.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::LogicalAnd => "&&",
            Self::LogicalOr => "||",
        }
    }
}

/// One element of a collection initializer.
///
/// `field` is present for designated initializers (`.name = expr`).
#[derive(Debug, Clone)]
pub struct CollectionElement {
    /// Designated field name, if any.
    pub field: Option<SmolStr>,
    /// The element's value expression.
    pub value: Expr,
}

/// A named constant declaration, as handed over by the resolver.
#[derive(Debug)]
pub struct ConstantDecl {
    /// Constant name.
    pub name: SmolStr,
    /// Declared type.
    pub ty: TypeDesc,
    /// Initializer expression.
    pub value: Expr,
}

/// An expression node with its source range.
#[derive(Debug, Clone)]
pub struct Expr {
    /// The node payload.
    pub kind: ExprKind,
    /// Location in the catalogue source.
    pub span: TextRange,
}

impl Expr {
    /// Creates a new expression node.
    #[must_use]
    pub fn new(kind: ExprKind, span: TextRange) -> Self {
        Self { kind, span }
    }
}

/// Expression node kinds.
///
/// Literal nodes carry the raw token text (integer/float) or the decoded
/// content (string/char); the evaluator owns suffix and overflow handling.
#[derive(Debug, Clone)]
pub enum ExprKind {
    /// `true` / `false`.
    BoolLiteral(bool),
    /// Integer literal token, separators and suffix included.
    IntLiteral(SmolStr),
    /// Floating-point literal token, separators and suffix included.
    FloatLiteral(SmolStr),
    /// String literal, escapes already decoded.
    StringLiteral(SmolStr),
    /// Character literal, escapes already decoded.
    CharLiteral(SmolStr),
    /// Unary operator application.
    Unary {
        /// The operator.
        op: UnaryOp,
        /// The operand.
        operand: Box<Expr>,
    },
    /// Binary operator application.
    Binary {
        /// The operator.
        op: BinaryOp,
        /// Left operand.
        left: Box<Expr>,
        /// Right operand.
        right: Box<Expr>,
    },
    /// Parenthesized expression.
    Paren(Box<Expr>),
    /// Built-in math constant (`PI`, `E`).
    BuiltinConstant(SmolStr),
    /// Built-in math function call (`sqrt`, `sin`, `pow`, ...).
    BuiltinCall {
        /// Function name.
        name: SmolStr,
        /// Argument expressions.
        args: Vec<Expr>,
    },
    /// Collection initializer `{ a, b, .c = d }`.
    Collection(Vec<CollectionElement>),
    /// Resolved reference to a named constant.
    ConstantRef(Arc<ConstantDecl>),
    /// Resolved reference to an enumeration literal.
    EnumLiteralRef {
        /// The owning enumeration.
        enumeration: Arc<EnumType>,
        /// Index into the enumeration's literal list.
        literal: usize,
    },
}
