//! Byte-range edit buffers over the source map.
//!
//! Edits are recorded in original-file coordinates and materialized on
//! demand. Several insertions may target the same offset: insert-before
//! prepends to whatever is already planned there, insert-after-token
//! appends, matching the semantics of a classic rewrite buffer.

use std::collections::BTreeMap;
use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use super::error::{OffsetOutOfBoundsError, RewriteResult, UnknownFileError};
use crate::move_c::cpp_ast::source_map::SourceMap;
use crate::move_c::utils::{FileId, Position, Span};

#[derive(Debug)]
struct Edit {
    offset: usize,
    after: bool,
    text: String,
}

pub struct Rewriter<'map> {
    source_map: &'map SourceMap,
    edits: FxHashMap<FileId, Vec<Edit>>,
}

impl<'map> Rewriter<'map> {
    pub fn new(source_map: &'map SourceMap) -> Self {
        Self {
            source_map,
            edits: FxHashMap::default(),
        }
    }

    /// Inserts `text` so that it ends up before the byte at `pos` and
    /// before any text previously inserted there.
    pub fn insert_before(&mut self, pos: Position, text: &str) -> RewriteResult<()> {
        self.check_offset(pos)?;
        self.edits.entry(pos.file).or_default().push(Edit {
            offset: pos.offset,
            after: false,
            text: text.to_owned(),
        });
        Ok(())
    }

    /// Inserts `text` right after a token range ending at `pos` (exclusive
    /// end offset) and after any text previously inserted there.
    pub fn insert_after_token(&mut self, pos: Position, text: &str) -> RewriteResult<()> {
        self.check_offset(pos)?;
        self.edits.entry(pos.file).or_default().push(Edit {
            offset: pos.offset,
            after: true,
            text: text.to_owned(),
        });
        Ok(())
    }

    /// Whether any edit has been recorded against the file.
    pub fn has_edits(&self, file: FileId) -> bool {
        self.edits.get(&file).is_some_and(|edits| !edits.is_empty())
    }

    /// The file contents with all recorded edits applied. Equals the
    /// original text when nothing was inserted.
    pub fn rewritten_buffer(&self, file: FileId) -> RewriteResult<String> {
        let source = self
            .source_map
            .file(file)
            .ok_or(UnknownFileError { file_id: file.0 })?;
        let src = &source.src;

        let mut chunks: BTreeMap<usize, VecDeque<&str>> = BTreeMap::new();
        if let Some(edits) = self.edits.get(&file) {
            for edit in edits {
                let chunk = chunks.entry(edit.offset).or_default();
                if edit.after {
                    chunk.push_back(&edit.text);
                } else {
                    chunk.push_front(&edit.text);
                }
            }
        }

        let mut out = String::with_capacity(src.len());
        let mut consumed = 0;
        for (offset, chunk) in chunks {
            out.push_str(&src[consumed..offset]);
            for piece in chunk {
                out.push_str(piece);
            }
            consumed = offset;
        }
        out.push_str(&src[consumed..]);
        Ok(out)
    }

    fn check_offset(&self, pos: Position) -> RewriteResult<()> {
        let file = self
            .source_map
            .file(pos.file)
            .ok_or(UnknownFileError { file_id: pos.file.0 })?;
        let len = file.src.len();
        if pos.offset > len {
            return Err(OffsetOutOfBoundsError {
                src: self
                    .source_map
                    .named_source(pos.file)
                    .unwrap_or_else(|| miette::NamedSource::new(&file.name, String::new())),
                span: Span::new(pos.file, len, len),
                offset: pos.offset,
                len,
                file_name: file.name.clone(),
            }
            .into());
        }
        Ok(())
    }
}
