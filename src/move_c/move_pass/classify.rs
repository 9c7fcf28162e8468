//! Syntactic candidate recognition.
//!
//! Exactly two shapes qualify: a call argument that copies a named record
//! variable, and a return of a by-value parameter. Local-variable returns
//! are left alone so the compiler's named return-value elision still
//! applies, and initializations, assignments, container inserts and
//! member-initializer lists are never classified.

use super::TransformationKind;
use crate::move_c::cpp_ast::expr::CppExpr;
use crate::move_c::cpp_ast::stmt::ReturnStmt;
use crate::move_c::cpp_ast::{FunctionDef, VarDecl};
use crate::move_c::utils::Span;

/// A classified candidate, not yet proven safe.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'ast> {
    pub kind: TransformationKind,
    /// The implicit-stripped expression; always a declaration reference.
    pub expr: &'ast CppExpr<'ast>,
    pub decl: &'ast VarDecl<'ast>,
    /// The textual span the planner would wrap.
    pub range: Span,
}

/// A call argument qualifies when its effective expression names a variable
/// whose value type is a record with a move constructor.
pub fn classify_call_arg<'ast>(arg: &'ast CppExpr<'ast>) -> Option<Candidate<'ast>> {
    let stripped = arg.strip_implicit();
    let CppExpr::DeclRef(decl_ref) = stripped else {
        return None;
    };

    let value_ty = decl_ref.decl.ty.non_reference();
    if !value_ty.is_record() || !value_ty.has_move_constructor() {
        return None;
    }

    Some(Candidate {
        kind: TransformationKind::FunctionArgMove,
        expr: stripped,
        decl: decl_ref.decl,
        range: stripped.span(),
    })
}

/// A return qualifies only for by-value parameters of the enclosing
/// function. Reference parameters and locals never classify.
pub fn classify_return<'ast>(
    ret: &'ast ReturnStmt<'ast>,
    func: &FunctionDef<'ast>,
) -> Option<Candidate<'ast>> {
    let value = ret.value?;
    let stripped = value.strip_implicit();
    let CppExpr::DeclRef(decl_ref) = stripped else {
        return None;
    };

    if !func.is_by_value_param(decl_ref.decl) {
        return None;
    }
    if !decl_ref.decl.ty.non_reference().is_record() {
        return None;
    }

    Some(Candidate {
        kind: TransformationKind::ReturnValueMove,
        expr: stripped,
        decl: decl_ref.decl,
        range: stripped.span(),
    })
}
