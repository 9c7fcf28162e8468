//! File registry and macro-expansion mapping.
//!
//! Positions inside macro bodies live in synthetic expansion files; the map
//! collapses them to the invocation site in user code so that the analyzer
//! and the planner always reason in expansion-resolved coordinates.

use miette::NamedSource;

use crate::move_c::utils::{FileId, Position, Span};

#[derive(Debug, Clone)]
pub enum FileOrigin {
    Real,
    /// A macro expansion buffer. Every position in it resolves to the
    /// invocation site recorded here.
    MacroExpansion { call_site: Position },
}

#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub src: String,
    pub origin: FileOrigin,
}

#[derive(Debug, Default)]
pub struct SourceMap {
    files: Vec<SourceFile>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a real file. The first registered file is the primary
    /// input; everything else is headers or expansion buffers.
    pub fn add_file(&mut self, name: impl Into<String>, src: impl Into<String>) -> FileId {
        self.files.push(SourceFile {
            name: name.into(),
            src: src.into(),
            origin: FileOrigin::Real,
        });
        FileId(self.files.len() as u32 - 1)
    }

    /// Registers a macro-expansion buffer whose contents were spelled by a
    /// macro invoked at `call_site`.
    pub fn add_expansion(
        &mut self,
        name: impl Into<String>,
        src: impl Into<String>,
        call_site: Position,
    ) -> FileId {
        self.files.push(SourceFile {
            name: name.into(),
            src: src.into(),
            origin: FileOrigin::MacroExpansion { call_site },
        });
        FileId(self.files.len() as u32 - 1)
    }

    pub fn file(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.0 as usize)
    }

    pub fn primary_file(&self) -> Option<FileId> {
        if self.files.is_empty() {
            None
        } else {
            Some(FileId(0))
        }
    }

    pub fn is_primary(&self, id: FileId) -> bool {
        self.primary_file() == Some(id)
    }

    /// Collapses a position inside a macro expansion to the invocation site
    /// in user code, through nested expansions if needed. Positions in real
    /// files come back unchanged.
    pub fn expansion_position(&self, mut pos: Position) -> Position {
        loop {
            match self.file(pos.file).map(|f| &f.origin) {
                Some(FileOrigin::MacroExpansion { call_site }) => pos = *call_site,
                _ => return pos,
            }
        }
    }

    /// The source text covered by `span`, or `None` when the span does not
    /// denote a valid range of a registered file.
    pub fn text(&self, span: Span) -> Option<&str> {
        let file = self.file(span.file)?;
        if span.start > span.end {
            return None;
        }
        file.src.get(span.start..span.end)
    }

    /// Whether `span` denotes a well-formed range of a registered file.
    pub fn contains(&self, span: Span) -> bool {
        self.text(span).is_some()
    }

    /// Diagnostic attachment for the given file.
    pub fn named_source(&self, id: FileId) -> Option<NamedSource<String>> {
        let file = self.file(id)?;
        Some(NamedSource::new(&file.name, file.src.clone()))
    }
}
