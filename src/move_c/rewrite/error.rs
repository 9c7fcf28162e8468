use crate::declare_error_type;
use crate::move_c::utils::Span;
use miette::{Diagnostic, NamedSource};
use thiserror::Error;

pub type RewriteResult<T> = Result<T, RewriteError>;

declare_error_type! {
    #[error("rewrite error: {0}")]
    pub enum RewriteError {
        UnknownFile(UnknownFileError),
        OffsetOutOfBounds(OffsetOutOfBoundsError),
    }
}

#[derive(Error, Diagnostic, Debug)]
#[diagnostic(code(rewrite::unknown_file))]
#[error("no source file registered under id {file_id}")]
pub struct UnknownFileError {
    pub file_id: u32,
}

#[derive(Error, Diagnostic, Debug)]
#[diagnostic(
    code(rewrite::offset_out_of_bounds),
    help("insertion offsets must lie within the file, end-of-file inclusive")
)]
#[error("insertion offset {offset} is past the end of `{file_name}` ({len} bytes)")]
pub struct OffsetOutOfBoundsError {
    #[source_code]
    pub src: NamedSource<String>,
    #[label = "file ends here"]
    pub span: Span,
    pub offset: usize,
    pub len: usize,
    pub file_name: String,
}
