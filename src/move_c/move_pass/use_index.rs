//! Per-function catalog of variable references, positioned in the CFG.

use rustc_hash::FxHashMap;

use crate::move_c::cpp_ast::cfg::{BlockId, Cfg, CfgElement};
use crate::move_c::cpp_ast::expr::CppExpr;
use crate::move_c::cpp_ast::source_map::SourceMap;
use crate::move_c::cpp_ast::stmt::CppStatement;
use crate::move_c::cpp_ast::DeclId;
use crate::move_c::utils::{Position, Span};

/// A single textual reference to a variable: which block, which element
/// within it, and the expansion-normalized source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsePosition {
    pub block: BlockId,
    pub element: usize,
    pub position: Position,
}

/// Maps every variable of one function to the ordered list of its textual
/// references. Order within a block is total; across blocks it is the
/// partial order the CFG gives.
#[derive(Debug, Default)]
pub struct UseIndex {
    uses: FxHashMap<DeclId, Vec<UsePosition>>,
}

impl UseIndex {
    /// The index used when no CFG exists: it answers nothing, which makes
    /// every safety query fail.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn build(cfg: &Cfg, map: &SourceMap) -> Self {
        let mut uses: FxHashMap<DeclId, Vec<UsePosition>> = FxHashMap::default();
        let mut refs: Vec<(DeclId, Span)> = Vec::new();

        for block in cfg.blocks() {
            for (element, elem) in block.elements.iter().enumerate() {
                refs.clear();
                match elem {
                    CfgElement::Stmt(stmt) => collect_stmt_refs(stmt, &mut refs),
                    CfgElement::Condition(expr) => collect_expr_refs(expr, &mut refs),
                    // Destructor elements are program points, not textual uses.
                    CfgElement::ImplicitDtor(_) | CfgElement::TemporaryDtor(_) => {}
                }
                for (decl, span) in refs.drain(..) {
                    let position = map.expansion_position(span.begin());
                    uses.entry(decl).or_default().push(UsePosition {
                        block: block.id,
                        element,
                        position,
                    });
                }
            }
        }

        Self { uses }
    }

    /// The unique recorded use at the given source position, or `None` when
    /// nothing was indexed there. When several uses normalize to the same
    /// expansion site the first one is returned; all of them share that
    /// single textual anchor.
    pub fn lookup(&self, decl: DeclId, pos: Position, map: &SourceMap) -> Option<&UsePosition> {
        let pos = map.expansion_position(pos);
        self.uses.get(&decl)?.iter().find(|use_| use_.position == pos)
    }

    pub fn uses_of(&self, decl: DeclId) -> &[UsePosition] {
        self.uses.get(&decl).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.uses.is_empty()
    }
}

/// References inside a leaf statement. Compound statements never appear as
/// CFG elements; their pieces do.
fn collect_stmt_refs<'ast>(stmt: &'ast CppStatement<'ast>, out: &mut Vec<(DeclId, Span)>) {
    match stmt {
        CppStatement::Decl(decl) => {
            if let Some(init) = decl.init {
                collect_expr_refs(init, out);
            }
        }
        CppStatement::Expr(expr_stmt) => collect_expr_refs(expr_stmt.expr, out),
        CppStatement::Return(ret) => {
            if let Some(value) = ret.value {
                collect_expr_refs(value, out);
            }
        }
        CppStatement::Block(_)
        | CppStatement::IfElse(_)
        | CppStatement::While(_)
        | CppStatement::Break(_)
        | CppStatement::Continue(_) => {}
    }
}

fn collect_expr_refs<'ast>(expr: &'ast CppExpr<'ast>, out: &mut Vec<(DeclId, Span)>) {
    match expr {
        CppExpr::DeclRef(decl_ref) => out.push((decl_ref.decl.id, decl_ref.span)),
        CppExpr::Call(call) => {
            for arg in &call.args {
                collect_expr_refs(arg, out);
            }
        }
        CppExpr::Construct(construct) => {
            if let Some(arg) = construct.arg {
                collect_expr_refs(arg, out);
            }
        }
        CppExpr::ImplicitCast(cast) => collect_expr_refs(cast.inner, out),
        CppExpr::FieldAccess(access) => collect_expr_refs(access.target, out),
        CppExpr::Binary(binary) => {
            collect_expr_refs(binary.lhs, out);
            collect_expr_refs(binary.rhs, out);
        }
        CppExpr::IntegerLiteral(_) | CppExpr::BooleanLiteral(_) | CppExpr::StringLiteral(_) => {}
    }
}
