use super::ty::{CppTy, CtorKind};
use super::VarDecl;
use crate::move_c::utils::Span;

#[derive(Debug, Clone)]
pub enum CppExpr<'ast> {
    DeclRef(DeclRefExpr<'ast>),
    Call(CallExpr<'ast>),
    Construct(ConstructExpr<'ast>),
    ImplicitCast(ImplicitCastExpr<'ast>),
    FieldAccess(FieldAccessExpr<'ast>),
    Binary(BinaryExpr<'ast>),
    IntegerLiteral(IntegerLiteralExpr<'ast>),
    BooleanLiteral(BooleanLiteralExpr<'ast>),
    StringLiteral(StringLiteralExpr<'ast>),
}

impl<'ast> CppExpr<'ast> {
    pub fn span(&self) -> Span {
        match self {
            CppExpr::DeclRef(expr) => expr.span,
            CppExpr::Call(expr) => expr.span,
            CppExpr::Construct(expr) => expr.span,
            CppExpr::ImplicitCast(expr) => expr.span,
            CppExpr::FieldAccess(expr) => expr.span,
            CppExpr::Binary(expr) => expr.span,
            CppExpr::IntegerLiteral(expr) => expr.span,
            CppExpr::BooleanLiteral(expr) => expr.span,
            CppExpr::StringLiteral(expr) => expr.span,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CppExpr::DeclRef(_) => "Declaration Reference",
            CppExpr::Call(_) => "Call Expression",
            CppExpr::Construct(_) => "Construct Expression",
            CppExpr::ImplicitCast(_) => "Implicit Cast",
            CppExpr::FieldAccess(_) => "Field Access",
            CppExpr::Binary(_) => "Binary Operation",
            CppExpr::IntegerLiteral(_) => "Integer Literal",
            CppExpr::BooleanLiteral(_) => "Boolean Literal",
            CppExpr::StringLiteral(_) => "String Literal",
        }
    }

    pub fn ty(&self) -> &'ast CppTy<'ast> {
        match self {
            CppExpr::DeclRef(expr) => expr.ty,
            CppExpr::Call(expr) => expr.ty,
            CppExpr::Construct(expr) => expr.ty,
            CppExpr::ImplicitCast(expr) => expr.ty,
            CppExpr::FieldAccess(expr) => expr.ty,
            CppExpr::Binary(expr) => expr.ty,
            CppExpr::IntegerLiteral(expr) => expr.ty,
            CppExpr::BooleanLiteral(expr) => expr.ty,
            CppExpr::StringLiteral(expr) => expr.ty,
        }
    }

    /// Peels the wrappers the frontend inserts without any source text:
    /// implicit casts and implicit copy/move constructions. The result is
    /// the expression the programmer actually wrote.
    pub fn strip_implicit(&'ast self) -> &'ast CppExpr<'ast> {
        let mut expr = self;
        loop {
            match expr {
                CppExpr::ImplicitCast(cast) => expr = cast.inner,
                CppExpr::Construct(construct) if construct.implicit => match construct.arg {
                    Some(arg) => expr = arg,
                    None => return expr,
                },
                _ => return expr,
            }
        }
    }

    /// Whether the expression designates storage rather than a value.
    pub fn is_lvalue(&self) -> bool {
        match self {
            CppExpr::DeclRef(_) => true,
            CppExpr::FieldAccess(expr) => expr.target.is_lvalue(),
            CppExpr::ImplicitCast(cast) => match cast.kind {
                CastKind::LvalueToRvalue => false,
                CastKind::NoOp => cast.inner.is_lvalue(),
            },
            // A call is an lvalue exactly when it returns an lvalue reference.
            CppExpr::Call(expr) => matches!(expr.ty, CppTy::LvalueRef(_)),
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DeclRefExpr<'ast> {
    pub span: Span,
    pub ty: &'ast CppTy<'ast>,
    pub decl: &'ast VarDecl<'ast>,
}

#[derive(Debug, Clone)]
pub struct CallExpr<'ast> {
    pub span: Span,
    pub ty: &'ast CppTy<'ast>,
    pub callee: &'ast str,
    pub callee_span: Span,
    pub args: Vec<&'ast CppExpr<'ast>>,
}

/// A constructor invocation. `implicit` marks nodes the frontend
/// synthesized for by-value argument and return conversions; those carry no
/// source text of their own and are peeled by [`CppExpr::strip_implicit`].
#[derive(Debug, Clone)]
pub struct ConstructExpr<'ast> {
    pub span: Span,
    pub ty: &'ast CppTy<'ast>,
    pub ctor: CtorKind,
    pub implicit: bool,
    pub arg: Option<&'ast CppExpr<'ast>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastKind {
    LvalueToRvalue,
    NoOp,
}

#[derive(Debug, Clone)]
pub struct ImplicitCastExpr<'ast> {
    pub span: Span,
    pub ty: &'ast CppTy<'ast>,
    pub kind: CastKind,
    pub inner: &'ast CppExpr<'ast>,
}

#[derive(Debug, Clone)]
pub struct FieldAccessExpr<'ast> {
    pub span: Span,
    pub ty: &'ast CppTy<'ast>,
    pub target: &'ast CppExpr<'ast>,
    pub field: &'ast str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Lt,
    Le,
    Gt,
    Eq,
    Ne,
}

#[derive(Debug, Clone)]
pub struct BinaryExpr<'ast> {
    pub span: Span,
    pub ty: &'ast CppTy<'ast>,
    pub op: BinOp,
    pub lhs: &'ast CppExpr<'ast>,
    pub rhs: &'ast CppExpr<'ast>,
}

#[derive(Debug, Clone)]
pub struct IntegerLiteralExpr<'ast> {
    pub span: Span,
    pub ty: &'ast CppTy<'ast>,
    pub value: i64,
}

#[derive(Debug, Clone)]
pub struct BooleanLiteralExpr<'ast> {
    pub span: Span,
    pub ty: &'ast CppTy<'ast>,
    pub value: bool,
}

#[derive(Debug, Clone)]
pub struct StringLiteralExpr<'ast> {
    pub span: Span,
    pub ty: &'ast CppTy<'ast>,
    pub value: &'ast str,
}
