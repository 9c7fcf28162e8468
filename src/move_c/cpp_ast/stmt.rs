use super::expr::CppExpr;
use super::VarDecl;
use crate::move_c::utils::Span;

#[derive(Debug, Clone)]
pub enum CppStatement<'ast> {
    Block(BlockStmt<'ast>),
    Decl(DeclStmt<'ast>),
    Expr(ExprStmt<'ast>),
    Return(ReturnStmt<'ast>),
    IfElse(IfElseStmt<'ast>),
    While(WhileStmt<'ast>),
    Break(Span),
    Continue(Span),
}

impl CppStatement<'_> {
    pub fn span(&self) -> Span {
        match self {
            CppStatement::Block(block) => block.span,
            CppStatement::Decl(decl) => decl.span,
            CppStatement::Expr(expr) => expr.span,
            CppStatement::Return(ret) => ret.span,
            CppStatement::IfElse(if_else) => if_else.span,
            CppStatement::While(while_stmt) => while_stmt.span,
            CppStatement::Break(span) => *span,
            CppStatement::Continue(span) => *span,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BlockStmt<'ast> {
    pub span: Span,
    pub statements: Vec<&'ast CppStatement<'ast>>,
}

#[derive(Debug, Clone)]
pub struct DeclStmt<'ast> {
    pub span: Span,
    pub var: &'ast VarDecl<'ast>,
    pub init: Option<&'ast CppExpr<'ast>>,
}

#[derive(Debug, Clone)]
pub struct ExprStmt<'ast> {
    pub span: Span,
    pub expr: &'ast CppExpr<'ast>,
}

/// `span.start` is the location of the `return` keyword, which the
/// collector uses as the record's anchor.
#[derive(Debug, Clone)]
pub struct ReturnStmt<'ast> {
    pub span: Span,
    pub value: Option<&'ast CppExpr<'ast>>,
}

#[derive(Debug, Clone)]
pub struct IfElseStmt<'ast> {
    pub span: Span,
    pub condition: &'ast CppExpr<'ast>,
    pub then_branch: &'ast BlockStmt<'ast>,
    pub else_branch: Option<&'ast BlockStmt<'ast>>,
}

#[derive(Debug, Clone)]
pub struct WhileStmt<'ast> {
    pub span: Span,
    pub condition: &'ast CppExpr<'ast>,
    pub body: &'ast BlockStmt<'ast>,
}
