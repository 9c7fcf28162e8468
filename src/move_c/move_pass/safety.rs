//! The safety predicate: decides whether a classified candidate may be
//! rewritten. It never errors; any internal inability to answer rejects.

use super::classify::Candidate;
use super::context::FunctionAnalysis;
use super::reachability::ReachabilityOracle;
use super::TransformationKind;
use crate::move_c::cpp_ast::source_map::SourceMap;
use crate::move_c::cpp_ast::VarDecl;
use crate::move_c::utils::Span;

/// All conditions must hold:
///
/// - the effective expression is an lvalue naming a parameter or a local
///   with automatic storage;
/// - the value type is a non-const record with a move constructor;
/// - in a return context the candidate is accepted as classified; in a call
///   context the reference must be the last use of the variable on every
///   path forward.
pub fn is_safe_to_move(
    candidate: &Candidate,
    analysis: &FunctionAnalysis,
    map: &SourceMap,
) -> bool {
    if !candidate.expr.is_lvalue() {
        return false;
    }
    // Globals, statics and thread-locals are not modelable.
    if !candidate.decl.has_local_storage() {
        return false;
    }

    let value_ty = candidate.expr.ty().non_reference();
    if !value_ty.is_record() || value_ty.is_const_qualified() {
        return false;
    }
    if !value_ty.has_move_constructor() {
        return false;
    }

    match candidate.kind {
        // The classifier already restricted returns to by-value parameters.
        TransformationKind::ReturnValueMove => true,
        TransformationKind::FunctionArgMove => {
            is_last_use(candidate.decl, candidate.range, analysis, map)
        }
    }
}

/// The reference must be the last use of the variable on every path
/// forward, and must stay the last use across iterations: a reference that
/// can re-execute through a cycle observes the moved-from value itself.
/// References ordered *before* the candidate on the same path reject too,
/// so a variable consumed repeatedly in sequence is left untouched on every
/// site; only references on mutually exclusive branches stay independent.
///
/// A use that is not indexed (a macro-body position with no recorded
/// reference) rejects outright.
fn is_last_use(decl: &VarDecl, range: Span, analysis: &FunctionAnalysis, map: &SourceMap) -> bool {
    let Some(cfg) = analysis.cfg.as_ref() else {
        return false;
    };
    let Some(current) = analysis.use_index.lookup(decl.id, range.begin(), map) else {
        return false;
    };

    let oracle = ReachabilityOracle::new(cfg);
    for other in analysis.use_index.uses_of(decl.id) {
        let same_entry = other.block == current.block
            && other.element == current.element
            && other.position == current.position;
        // For the candidate's own entry this degenerates to the cycle
        // test: equal element indices answer via self-reachability.
        if oracle.can_occur_after(current, other) {
            return false;
        }
        if !same_entry && oracle.can_occur_after(other, current) {
            return false;
        }
    }

    true
}
