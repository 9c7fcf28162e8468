use crate::declare_warning_type;
use crate::move_c::utils::Span;
use miette::{Diagnostic, NamedSource};
use thiserror::Error;

declare_warning_type! {
    #[warning("rewrite warning: {0}")]
    pub enum MoveWarning {
        RangeOutsidePrimaryFile(RangeOutsidePrimaryFileWarning),
        InvalidRange(InvalidRangeWarning),
        OverlappingRewrite(OverlappingRewriteWarning),
    }
}

#[derive(Error, Diagnostic, Debug)]
#[diagnostic(code(rewrite::range_outside_primary_file), severity(warning))]
#[error("rewrite skipped: range lies in `{file_name}`, not in the primary input file")]
pub struct RangeOutsidePrimaryFileWarning {
    pub file_name: String,
}

#[derive(Error, Diagnostic, Debug)]
#[diagnostic(code(rewrite::invalid_range), severity(warning))]
#[error("rewrite skipped: byte range {start}..{end} does not denote source text")]
pub struct InvalidRangeWarning {
    pub start: usize,
    pub end: usize,
}

#[derive(Error, Diagnostic, Debug)]
#[diagnostic(code(rewrite::overlapping_rewrite), severity(warning))]
#[error("rewrite skipped: range overlaps an already planned edit")]
pub struct OverlappingRewriteWarning {
    #[source_code]
    pub src: NamedSource<String>,
    #[label = "skipped rewrite"]
    pub span: Span,
}
