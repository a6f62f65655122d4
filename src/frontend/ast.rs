//! Abstract Syntax Tree definitions for the Bhagwad language
#![allow(dead_code)]

use crate::utils::Span;
use serde::Serialize;

/// A complete program (translation unit)
#[derive(Debug, Clone, Serialize)]
pub struct Program {
    pub items: Vec<Item>,
}

/// Top-level items
#[derive(Debug, Clone, Serialize)]
pub enum Item {
    Namespace(NamespaceDef),
    Function(Function),
    Entry(EntryBlock),
}

/// Namespace (`yuga`) definition: a named group of functions
#[derive(Debug, Clone, Serialize)]
pub struct NamespaceDef {
    pub name: Ident,
    pub members: Vec<Function>,
    pub span: Span,
}

/// Function (`shloka`) definition
#[derive(Debug, Clone, Serialize)]
pub struct Function {
    pub name: Ident,
    pub params: Vec<Param>,
    pub ret_type: Option<Type>,
    pub body: Block,
    pub span: Span,
}

/// Function parameter
#[derive(Debug, Clone, Serialize)]
pub struct Param {
    pub name: Ident,
    pub ty: Type,
    pub span: Span,
}

/// The program's entry block (`arjuna`)
#[derive(Debug, Clone, Serialize)]
pub struct EntryBlock {
    pub body: Block,
    pub span: Span,
}

/// Code block
#[derive(Debug, Clone, Serialize)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

/// Statement
#[derive(Debug, Clone, Serialize)]
pub enum Stmt {
    /// (maya | sankalpa) [type] name = expr
    Var {
        name: Ident,
        ty: Option<Type>,
        value: Expr,
        constant: bool,
        span: Span,
    },
    /// target = expr
    Assign {
        target: LValue,
        value: Expr,
        span: Span,
    },
    /// dharma (cond) { ... } [adharma { ... }]
    If {
        cond: Expr,
        then_block: Block,
        else_block: Option<Block>,
        span: Span,
    },
    /// karma i from a to b { ... } — both bounds inclusive
    RangeLoop {
        var: Ident,
        from: Expr,
        to: Expr,
        body: Block,
        span: Span,
    },
    /// karma while (cond) { ... }
    WhileLoop {
        cond: Expr,
        body: Block,
        span: Span,
    },
    /// karma x in iterable { ... }
    ForIn {
        var: Ident,
        iter: Expr,
        body: Block,
        span: Span,
    },
    /// manifest expr
    Print { expr: Expr, span: Span },
    /// moksha [expr]
    Return { value: Option<Expr>, span: Span },
    /// meditation { ... } disturbance (err) { ... }
    TryCatch {
        try_block: Block,
        err_name: Ident,
        catch_block: Block,
        span: Span,
    },
    /// Expression statement
    Expr(Expr),
}

/// Assignment target
#[derive(Debug, Clone, Serialize)]
pub enum LValue {
    Ident(Ident),
    Index {
        base: Box<LValue>,
        index: Expr,
        span: Span,
    },
    Field {
        base: Box<LValue>,
        field: Ident,
        span: Span,
    },
}

impl LValue {
    /// The root identifier of the target chain (`a` in `a[0].x`)
    pub fn root(&self) -> &Ident {
        match self {
            LValue::Ident(id) => id,
            LValue::Index { base, .. } => base.root(),
            LValue::Field { base, .. } => base.root(),
        }
    }

    pub fn span(&self) -> Span {
        match self {
            LValue::Ident(id) => id.span,
            LValue::Index { span, .. } => *span,
            LValue::Field { span, .. } => *span,
        }
    }
}

/// Expression
#[derive(Debug, Clone, Serialize)]
pub enum Expr {
    /// Literal value
    Literal(Literal),
    /// Identifier
    Ident(Ident),
    /// Binary operation
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },
    /// Unary operation
    Unary {
        op: UnOp,
        expr: Box<Expr>,
        span: Span,
    },
    /// Function call (callee is an identifier or a field chain)
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        span: Span,
    },
    /// Index access (expr[index])
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
        span: Span,
    },
    /// Field access (expr.field)
    Field {
        base: Box<Expr>,
        field: Ident,
        span: Span,
    },
    /// Array literal
    Array { elements: Vec<Expr>, span: Span },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Literal(lit) => lit.span(),
            Expr::Ident(id) => id.span,
            Expr::Binary { span, .. } => *span,
            Expr::Unary { span, .. } => *span,
            Expr::Call { span, .. } => *span,
            Expr::Index { span, .. } => *span,
            Expr::Field { span, .. } => *span,
            Expr::Array { span, .. } => *span,
        }
    }
}

/// Literal value
#[derive(Debug, Clone, Serialize)]
pub enum Literal {
    Int(i64, Span),
    Str(String, Span),
    Bool(bool, Span),
}

impl Literal {
    pub fn span(&self) -> Span {
        match self {
            Literal::Int(_, s) => *s,
            Literal::Str(_, s) => *s,
            Literal::Bool(_, s) => *s,
        }
    }
}

/// Identifier
#[derive(Debug, Clone, Serialize)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

/// Binary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// Unary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnOp {
    /// Negation (-)
    Neg,
    /// Logical not (!)
    Not,
}

/// The three gunas: scalar types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScalarType {
    /// sattva (int)
    Sattva,
    /// rajas (string)
    Rajas,
    /// tamas (bool)
    Tamas,
}

/// Type annotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Type {
    /// sattva | rajas | tamas
    Scalar(ScalarType, Span),
    /// cosmic T[] (dims counts the bracket pairs)
    Array {
        elem: Box<Type>,
        dims: usize,
        span: Span,
    },
    /// Opaque user-named type, carried for display only, never checked
    Named(String, Span),
}

impl Type {
    pub fn span(&self) -> Span {
        match self {
            Type::Scalar(_, s) => *s,
            Type::Array { span, .. } => *span,
            Type::Named(_, s) => *s,
        }
    }
}
