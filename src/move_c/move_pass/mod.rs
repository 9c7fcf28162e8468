//! Move Analysis Pass
//!
//! Decides, for each copy expression in a translation unit, whether it can
//! be rewritten into an explicit move without changing observable behavior,
//! and collects the approved rewrites as transformation records.
//!
//! A candidate is *safe* when the variable is not observed again on any
//! execution path that can follow the use, and *beneficial* when the type
//! actually supports move construction and the context is not one where the
//! compiler would already elide the copy (returns of locals are left to
//! named return-value elision).
//!
//! ## Phases, per function definition
//!
//! 1. **CFG construction** — basic blocks over the body, with implicit and
//!    temporary destructor elements so scope exits are visible program
//!    points.
//! 2. **Use indexing** — every textual reference of every variable is
//!    recorded with its block, element index and expansion-normalized
//!    source position.
//! 3. **Collection** — call expressions and return statements are visited
//!    in traversal order; the classifier recognizes the two rewritable
//!    shapes and the safety predicate accepts or rejects each candidate
//!    against the use index and the reachability oracle.
//!
//! Per-function state is rebuilt on every function boundary and dropped
//! afterwards; nothing is shared across functions or translation units.
//! Rejections are silent: candidates are a best-effort opportunity set.

pub mod classify;
mod context;
pub mod reachability;
pub mod safety;
pub mod use_index;

pub use context::FunctionAnalysis;

use serde::Serialize;

use crate::move_c::cpp_ast::expr::CallExpr;
use crate::move_c::cpp_ast::source_map::SourceMap;
use crate::move_c::cpp_ast::stmt::ReturnStmt;
use crate::move_c::cpp_ast::{walk_unit, FunctionDef, TranslationUnit, UnitVisitor};
use crate::move_c::utils::{Position, Span};

/// Spelling of the move primitive as a callee. Its arguments bind by
/// rvalue reference; no copy happens there, so they are never candidates.
const MOVE_CALLEE: &str = "std::move";

/// What kind of rewrite a record requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransformationKind {
    /// Wrap the returned parameter in the move primitive.
    ReturnValueMove,
    /// Wrap a call argument in the move primitive.
    FunctionArgMove,
}

/// One approved rewrite: the span to wrap and the location of the enclosing
/// call or return keyword it belongs to.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Transformation {
    pub kind: TransformationKind,
    pub range: Span,
    pub anchor: Position,
}

/// The candidate collector. Owns the per-function analysis state and the
/// records accumulated during one pass over a unit.
pub struct MovePass<'ast> {
    source_map: &'ast SourceMap,
    current: Option<FunctionAnalysis<'ast>>,
    transformations: Vec<Transformation>,
}

impl<'ast> MovePass<'ast> {
    pub fn new(source_map: &'ast SourceMap) -> Self {
        Self {
            source_map,
            current: None,
            transformations: Vec::new(),
        }
    }

    /// Visits every function definition in declaration order and returns
    /// the approved records in traversal order. The pass never mutates the
    /// unit or the source.
    pub fn run(&mut self, unit: &'ast TranslationUnit<'ast>) -> Vec<Transformation> {
        walk_unit(self, unit);
        self.current = None;
        std::mem::take(&mut self.transformations)
    }
}

impl<'ast> UnitVisitor<'ast> for MovePass<'ast> {
    fn visit_function_def(&mut self, func: &'ast FunctionDef<'ast>) {
        tracing::debug!(function = func.name, "analyzing function");
        self.current = Some(FunctionAnalysis::analyze(func, self.source_map));
    }

    fn visit_call_expr(&mut self, call: &'ast CallExpr<'ast>) {
        let Some(analysis) = self.current.as_ref() else {
            return;
        };
        if call.callee == MOVE_CALLEE {
            return;
        }
        for arg in &call.args {
            let Some(candidate) = classify::classify_call_arg(arg) else {
                continue;
            };
            if safety::is_safe_to_move(&candidate, analysis, self.source_map) {
                self.transformations.push(Transformation {
                    kind: candidate.kind,
                    range: candidate.range,
                    anchor: call.span.begin(),
                });
            }
        }
    }

    fn visit_return_stmt(&mut self, ret: &'ast ReturnStmt<'ast>) {
        let Some(analysis) = self.current.as_ref() else {
            return;
        };
        let Some(candidate) = classify::classify_return(ret, analysis.function) else {
            return;
        };
        if safety::is_safe_to_move(&candidate, analysis, self.source_map) {
            self.transformations.push(Transformation {
                kind: candidate.kind,
                range: candidate.range,
                anchor: ret.span.begin(),
            });
        }
    }
}
