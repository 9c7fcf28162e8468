//! movelift rewrites copy expressions in C++ translation units into
//! explicit `std::move` calls where a static analysis proves the variable
//! is never observed afterwards.
//!
//! The crate is the analyzer and edit planner only. Parsing and semantic
//! analysis belong to a frontend that populates the
//! [`move_c::cpp_ast`] data contract; driving files through the tool
//! belongs to a driver embedding [`MoveOptimizer`]. The output buffer is
//! byte-identical to the input outside the approved ranges, plus an
//! `#include <utility>` inserted when at least one rewrite landed.

pub mod move_c;

use move_c::cpp_ast::source_map::SourceMap;
use move_c::cpp_ast::TranslationUnit;
use move_c::move_pass::{MovePass, Transformation};
use move_c::rewrite::warning::MoveWarning;
use move_c::rewrite::{ApplySummary, RewritePlanner, Rewriter};

/// Result of one full pass over a translation unit.
#[derive(Debug)]
pub struct RewriteOutcome {
    pub summary: ApplySummary,
    pub warnings: Vec<MoveWarning>,
    /// The rewritten primary file, or `None` when nothing changed.
    pub buffer: Option<String>,
}

/// Two-phase façade over the pass and the planner: collect transformation
/// records for a unit, then apply them through a rewriter.
pub struct MoveOptimizer<'map> {
    source_map: &'map SourceMap,
    transformations: Vec<Transformation>,
}

impl<'map> MoveOptimizer<'map> {
    pub fn new(source_map: &'map SourceMap) -> Self {
        Self {
            source_map,
            transformations: Vec::new(),
        }
    }

    /// Phase 1: analyze every function definition and collect the approved
    /// records. Replaces any records from a previous run.
    pub fn process_unit<'ast>(&mut self, unit: &'ast TranslationUnit<'ast>)
    where
        'map: 'ast,
    {
        let mut pass = MovePass::new(self.source_map);
        self.transformations = pass.run(unit);
    }

    pub fn transformations(&self) -> &[Transformation] {
        &self.transformations
    }

    /// Phase 2: stage the collected records as edits.
    pub fn apply_transformations(
        &self,
        rewriter: &mut Rewriter<'_>,
    ) -> (ApplySummary, Vec<MoveWarning>) {
        let mut planner = RewritePlanner::new(self.source_map);
        let summary = planner.apply(&self.transformations, rewriter);
        (summary, planner.take_warnings())
    }
}

/// Runs both phases and materializes the rewritten primary file when any
/// edit was committed.
pub fn optimize_unit<'ast>(
    unit: &'ast TranslationUnit<'ast>,
    source_map: &'ast SourceMap,
) -> miette::Result<RewriteOutcome> {
    let mut optimizer = MoveOptimizer::new(source_map);
    optimizer.process_unit(unit);

    let mut rewriter = Rewriter::new(source_map);
    let (summary, warnings) = optimizer.apply_transformations(&mut rewriter);

    let buffer = match source_map.primary_file() {
        Some(primary) if rewriter.has_edits(primary) => Some(rewriter.rewritten_buffer(primary)?),
        _ => None,
    };

    Ok(RewriteOutcome {
        summary,
        warnings,
        buffer,
    })
}
