//! The frontend data contract: everything a C++ frontend must hand the
//! analyzer for one translation unit. The analyzer only reads these
//! structures; it never mutates them and never outlives the arena that owns
//! them.

pub mod arena;
pub mod cfg;
pub mod expr;
pub mod source_map;
pub mod stmt;
pub mod ty;

use expr::{CallExpr, CppExpr};
use serde::Serialize;
use stmt::{BlockStmt, CppStatement, ReturnStmt};
use ty::CppTy;

use crate::move_c::utils::Span;

/// Stable identity of a declaration within one translation unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DeclId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageClass {
    Param,
    Local,
    Static,
    Global,
    ThreadLocal,
}

#[derive(Debug, Clone)]
pub struct VarDecl<'ast> {
    pub id: DeclId,
    pub name: &'ast str,
    pub ty: &'ast CppTy<'ast>,
    pub storage: StorageClass,
    pub span: Span,
}

impl VarDecl<'_> {
    pub fn is_param(&self) -> bool {
        matches!(self.storage, StorageClass::Param)
    }

    /// Parameters and block-scoped locals have local storage; statics,
    /// globals and thread-locals do not.
    pub fn has_local_storage(&self) -> bool {
        matches!(self.storage, StorageClass::Param | StorageClass::Local)
    }
}

#[derive(Debug, Clone)]
pub struct FunctionDef<'ast> {
    pub span: Span,
    pub name: &'ast str,
    pub params: Vec<&'ast VarDecl<'ast>>,
    pub ret_ty: &'ast CppTy<'ast>,
    /// `None` when the frontend saw only a declaration, or could not parse
    /// the body. The analyzer then has nothing to index.
    pub body: Option<&'ast BlockStmt<'ast>>,
}

impl FunctionDef<'_> {
    /// Whether `decl` is one of this function's parameters taken by value.
    pub fn is_by_value_param(&self, decl: &VarDecl) -> bool {
        self.params
            .iter()
            .any(|p| p.id == decl.id && !p.ty.is_reference())
    }
}

#[derive(Debug, Clone, Default)]
pub struct TranslationUnit<'ast> {
    /// Function definitions in declaration order.
    pub functions: Vec<&'ast FunctionDef<'ast>>,
}

/// The traversal capability set the collector needs: function definitions,
/// call expressions and return statements. Dispatch is by node tag; there is
/// no inheritance and no other callback.
pub trait UnitVisitor<'ast> {
    fn visit_function_def(&mut self, _func: &'ast FunctionDef<'ast>) {}
    fn visit_call_expr(&mut self, _call: &'ast CallExpr<'ast>) {}
    fn visit_return_stmt(&mut self, _ret: &'ast ReturnStmt<'ast>) {}
}

pub fn walk_unit<'ast, V: UnitVisitor<'ast>>(visitor: &mut V, unit: &'ast TranslationUnit<'ast>) {
    for func in &unit.functions {
        visitor.visit_function_def(func);
        if let Some(body) = func.body {
            walk_block(visitor, body);
        }
    }
}

pub fn walk_block<'ast, V: UnitVisitor<'ast>>(visitor: &mut V, block: &'ast BlockStmt<'ast>) {
    for stmt in &block.statements {
        walk_stmt(visitor, stmt);
    }
}

pub fn walk_stmt<'ast, V: UnitVisitor<'ast>>(visitor: &mut V, stmt: &'ast CppStatement<'ast>) {
    match stmt {
        CppStatement::Block(block) => walk_block(visitor, block),
        CppStatement::Decl(decl) => {
            if let Some(init) = decl.init {
                walk_expr(visitor, init);
            }
        }
        CppStatement::Expr(expr_stmt) => walk_expr(visitor, expr_stmt.expr),
        CppStatement::Return(ret) => {
            visitor.visit_return_stmt(ret);
            if let Some(value) = ret.value {
                walk_expr(visitor, value);
            }
        }
        CppStatement::IfElse(if_else) => {
            walk_expr(visitor, if_else.condition);
            walk_block(visitor, if_else.then_branch);
            if let Some(else_branch) = if_else.else_branch {
                walk_block(visitor, else_branch);
            }
        }
        CppStatement::While(while_stmt) => {
            walk_expr(visitor, while_stmt.condition);
            walk_block(visitor, while_stmt.body);
        }
        CppStatement::Break(_) | CppStatement::Continue(_) => {}
    }
}

pub fn walk_expr<'ast, V: UnitVisitor<'ast>>(visitor: &mut V, expr: &'ast CppExpr<'ast>) {
    match expr {
        CppExpr::Call(call) => {
            visitor.visit_call_expr(call);
            for arg in &call.args {
                walk_expr(visitor, arg);
            }
        }
        CppExpr::Construct(construct) => {
            if let Some(arg) = construct.arg {
                walk_expr(visitor, arg);
            }
        }
        CppExpr::ImplicitCast(cast) => walk_expr(visitor, cast.inner),
        CppExpr::FieldAccess(access) => walk_expr(visitor, access.target),
        CppExpr::Binary(binary) => {
            walk_expr(visitor, binary.lhs);
            walk_expr(visitor, binary.rhs);
        }
        CppExpr::DeclRef(_)
        | CppExpr::IntegerLiteral(_)
        | CppExpr::BooleanLiteral(_)
        | CppExpr::StringLiteral(_) => {}
    }
}
