//! Per-function analysis state.
//!
//! Rebuilt when the collector enters a function definition, dropped when it
//! leaves. Nothing here survives a function boundary.

use super::use_index::UseIndex;
use crate::move_c::cpp_ast::cfg::{BuildOptions, Cfg};
use crate::move_c::cpp_ast::source_map::SourceMap;
use crate::move_c::cpp_ast::FunctionDef;

/// The CFG and use index of the function currently under analysis.
///
/// When the frontend could not produce a body, `cfg` is `None` and the use
/// index is empty; every safety query then answers "not safe". Absence of
/// evidence is treated as evidence of absence of safety.
pub struct FunctionAnalysis<'ast> {
    pub function: &'ast FunctionDef<'ast>,
    pub cfg: Option<Cfg<'ast>>,
    pub use_index: UseIndex,
}

impl<'ast> FunctionAnalysis<'ast> {
    pub fn analyze(function: &'ast FunctionDef<'ast>, map: &SourceMap) -> Self {
        match function.body {
            Some(body) => {
                let cfg = Cfg::build(body, BuildOptions::for_analysis());
                let use_index = UseIndex::build(&cfg, map);
                Self {
                    function,
                    cfg: Some(cfg),
                    use_index,
                }
            }
            None => Self {
                function,
                cfg: None,
                use_index: UseIndex::empty(),
            },
        }
    }
}
