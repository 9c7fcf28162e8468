//! Rewrite planning.
//!
//! Converts approved transformation records into an ordered edit script:
//! records outside the primary file, with invalid ranges, or overlapping an
//! already planned edit are skipped with a warning; ranges that already
//! begin with the move primitive count as successes so re-running the tool
//! on its own output changes nothing. Surviving edits are applied in
//! strictly descending source order, so earlier edits never invalidate
//! later ranges, and the utility header is inserted once any edit landed.

pub mod error;
pub mod rewriter;
pub mod warning;

pub use rewriter::Rewriter;

use error::RewriteResult;
use warning::{
    InvalidRangeWarning, MoveWarning, OverlappingRewriteWarning, RangeOutsidePrimaryFileWarning,
};

use crate::move_c::cpp_ast::source_map::SourceMap;
use crate::move_c::move_pass::Transformation;
use crate::move_c::utils::{Position, Span};

/// The move primitive every approved range is wrapped in.
pub const MOVE_PRIMITIVE: &str = "std::move(";

/// The include directive that declares the move primitive.
pub const UTILITY_HEADER_INCLUDE: &str = "#include <utility>";

/// What happened to the records of one apply run. The pass succeeded iff
/// nothing was skipped; already-moved ranges are harmless successes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplySummary {
    pub applied: usize,
    pub already_moved: usize,
    pub skipped: usize,
    pub header_inserted: bool,
}

impl ApplySummary {
    pub fn succeeded(&self) -> bool {
        self.skipped == 0
    }
}

enum Staged {
    Applied,
    AlreadyMoved,
    Skipped(MoveWarning),
}

pub struct RewritePlanner<'map> {
    source_map: &'map SourceMap,
    warnings: Vec<MoveWarning>,
}

impl<'map> RewritePlanner<'map> {
    pub fn new(source_map: &'map SourceMap) -> Self {
        Self {
            source_map,
            warnings: Vec::new(),
        }
    }

    /// Stages every record against the rewriter and reports what happened.
    /// A failed record is logged and skipped; the run continues.
    pub fn apply(&mut self, records: &[Transformation], rewriter: &mut Rewriter) -> ApplySummary {
        let mut summary = ApplySummary::default();

        let mut ordered: Vec<&Transformation> = records.iter().collect();
        ordered.sort_by(|a, b| {
            (b.range.file, b.range.start, b.range.end).cmp(&(a.range.file, a.range.start, a.range.end))
        });

        let mut accepted: Vec<Span> = Vec::new();
        for record in ordered {
            match self.stage(record, &accepted, rewriter) {
                Staged::Applied => {
                    accepted.push(record.range);
                    summary.applied += 1;
                }
                Staged::AlreadyMoved => summary.already_moved += 1,
                Staged::Skipped(warning) => {
                    tracing::warn!(%warning, "skipping rewrite record");
                    self.warnings.push(warning);
                    summary.skipped += 1;
                }
            }
        }

        if summary.applied > 0 {
            match self.ensure_utility_header(rewriter) {
                Ok(inserted) => summary.header_inserted = inserted,
                Err(error) => {
                    tracing::warn!(%error, "failed to insert the utility header");
                    summary.skipped += 1;
                }
            }
        }

        summary
    }

    pub fn warnings(&self) -> &[MoveWarning] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<MoveWarning> {
        std::mem::take(&mut self.warnings)
    }

    fn stage(
        &self,
        record: &Transformation,
        accepted: &[Span],
        rewriter: &mut Rewriter,
    ) -> Staged {
        let range = record.range;

        if !self.source_map.is_primary(range.file) {
            let file_name = self
                .source_map
                .file(range.file)
                .map(|f| f.name.clone())
                .unwrap_or_else(|| format!("<file {}>", range.file.0));
            return Staged::Skipped(RangeOutsidePrimaryFileWarning { file_name }.into());
        }

        let Some(text) = self.source_map.text(range) else {
            return Staged::Skipped(
                InvalidRangeWarning {
                    start: range.start,
                    end: range.end,
                }
                .into(),
            );
        };
        if range.is_empty() {
            return Staged::Skipped(
                InvalidRangeWarning {
                    start: range.start,
                    end: range.end,
                }
                .into(),
            );
        }

        if text.trim_start().starts_with(MOVE_PRIMITIVE) {
            return Staged::AlreadyMoved;
        }

        if accepted.iter().any(|span| span.overlaps(&range)) {
            let src = self
                .source_map
                .named_source(range.file)
                .unwrap_or_else(|| miette::NamedSource::new("<unknown>", String::new()));
            return Staged::Skipped(OverlappingRewriteWarning { src, span: range }.into());
        }

        let staged = rewriter
            .insert_before(range.begin(), MOVE_PRIMITIVE)
            .and_then(|()| rewriter.insert_after_token(range.end_pos(), ")"));
        match staged {
            Ok(()) => Staged::Applied,
            Err(_) => Staged::Skipped(
                InvalidRangeWarning {
                    start: range.start,
                    end: range.end,
                }
                .into(),
            ),
        }
    }

    /// Makes sure the primary file includes the utility header. The
    /// insertion point is after the last include of the leading include
    /// block, else after a `#pragma once` or `#ifndef`/`#define` guard
    /// preamble, else the top of the file. The file's own line-ending
    /// convention is preserved.
    fn ensure_utility_header(&self, rewriter: &mut Rewriter) -> RewriteResult<bool> {
        let Some(primary) = self.source_map.primary_file() else {
            return Ok(false);
        };
        let Some(file) = self.source_map.file(primary) else {
            return Ok(false);
        };
        let src = &file.src;

        if src.contains(UTILITY_HEADER_INCLUDE) || src.contains("#include \"utility\"") {
            return Ok(false);
        }

        let (insert_offset, has_includes) = header_insert_point(src);
        let newline = if src.contains("\r\n") { "\r\n" } else { "\n" };
        let text = if has_includes {
            format!("{UTILITY_HEADER_INCLUDE}{newline}")
        } else {
            format!("{UTILITY_HEADER_INCLUDE}{newline}{newline}")
        };

        rewriter.insert_before(Position::new(primary, insert_offset), &text)?;
        Ok(true)
    }
}

/// Scans the leading preamble: comments and blank lines are skipped, the
/// include block and guard directives advance the insertion point, the
/// first substantive line stops the scan.
fn header_insert_point(src: &str) -> (usize, bool) {
    let mut offset = 0;
    let mut insert_offset = 0;
    let mut has_includes = false;
    let mut pending_guard = false;

    while offset < src.len() {
        let line_end = src[offset..]
            .find('\n')
            .map(|i| offset + i + 1)
            .unwrap_or(src.len());
        let line = src[offset..line_end].trim();

        if line.starts_with("#include") {
            has_includes = true;
            insert_offset = line_end;
            pending_guard = false;
        } else if line.is_empty() || line.starts_with("//") || line.starts_with("/*") || line.starts_with('*') {
            // Preamble noise, keep scanning.
        } else if line == "#pragma once" {
            insert_offset = line_end;
        } else if !has_includes && line.starts_with("#ifndef") {
            pending_guard = true;
        } else if pending_guard && line.starts_with("#define") {
            insert_offset = line_end;
            pending_guard = false;
        } else {
            break;
        }

        offset = line_end;
    }

    (insert_offset, has_includes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::move_c::move_pass::TransformationKind;
    use crate::move_c::utils::FileId;

    fn map_with(src: &str) -> (SourceMap, FileId) {
        let mut map = SourceMap::new();
        let file = map.add_file("input.cpp", src);
        (map, file)
    }

    fn record_at(file: FileId, start: usize, end: usize) -> Transformation {
        Transformation {
            kind: TransformationKind::FunctionArgMove,
            range: Span::new(file, start, end),
            anchor: Position::new(file, start),
        }
    }

    fn span_of(src: &str, file: FileId, needle: &str) -> Span {
        let start = src.find(needle).expect("needle in source");
        Span::new(file, start, start + needle.len())
    }

    #[test]
    fn wraps_ranges_and_inserts_the_header_once() {
        let src = "#include \"widget.h\"\n\nvoid f() { consume(s); consume(u); }\n";
        let (map, file) = map_with(src);
        let mut rewriter = Rewriter::new(&map);
        let mut planner = RewritePlanner::new(&map);

        let s = span_of(src, file, "(s)");
        let u = span_of(src, file, "(u)");
        let records = vec![
            record_at(file, s.start + 1, s.end - 1),
            record_at(file, u.start + 1, u.end - 1),
        ];

        let summary = planner.apply(&records, &mut rewriter);
        assert_eq!(summary.applied, 2);
        assert!(summary.succeeded());
        assert!(summary.header_inserted);

        let out = rewriter.rewritten_buffer(file).unwrap();
        assert_eq!(
            out,
            "#include \"widget.h\"\n#include <utility>\n\nvoid f() { consume(std::move(s)); consume(std::move(u)); }\n"
        );
    }

    #[test]
    fn overlapping_records_are_skipped_with_a_warning() {
        let src = "consume(stringy);\n";
        let (map, file) = map_with(src);
        let mut rewriter = Rewriter::new(&map);
        let mut planner = RewritePlanner::new(&map);

        // Two records over intersecting byte ranges; descending order makes
        // the later one win.
        let records = vec![record_at(file, 8, 15), record_at(file, 10, 15)];
        let summary = planner.apply(&records, &mut rewriter);

        assert_eq!(summary.applied, 1);
        assert_eq!(summary.skipped, 1);
        assert!(!summary.succeeded());
        assert_eq!(planner.warnings().len(), 1);
        assert!(matches!(
            planner.warnings()[0],
            MoveWarning::OverlappingRewrite(_)
        ));
    }

    #[test]
    fn ranges_outside_the_primary_file_are_skipped() {
        let mut map = SourceMap::new();
        let main = map.add_file("input.cpp", "consume(s);\n");
        let header = map.add_file("widget.h", "consume(t);\n");

        let mut rewriter = Rewriter::new(&map);
        let mut planner = RewritePlanner::new(&map);
        let records = vec![record_at(header, 8, 9)];
        let summary = planner.apply(&records, &mut rewriter);

        assert_eq!(summary.applied, 0);
        assert_eq!(summary.skipped, 1);
        assert!(!rewriter.has_edits(main));
        assert!(matches!(
            planner.warnings()[0],
            MoveWarning::RangeOutsidePrimaryFile(_)
        ));
    }

    #[test]
    fn invalid_ranges_are_skipped() {
        let src = "consume(s);\n";
        let (map, file) = map_with(src);
        let mut rewriter = Rewriter::new(&map);
        let mut planner = RewritePlanner::new(&map);

        let records = vec![record_at(file, 40, 44), record_at(file, 9, 9)];
        let summary = planner.apply(&records, &mut rewriter);
        assert_eq!(summary.applied, 0);
        assert_eq!(summary.skipped, 2);
        assert!(!rewriter.has_edits(file));
    }

    #[test]
    fn already_moved_ranges_are_successes_without_edits() {
        let src = "consume(std::move(s));\n";
        let (map, file) = map_with(src);
        let mut rewriter = Rewriter::new(&map);
        let mut planner = RewritePlanner::new(&map);

        let range = span_of(src, file, "std::move(s)");
        let records = vec![record_at(file, range.start, range.end)];
        let summary = planner.apply(&records, &mut rewriter);

        assert_eq!(summary.applied, 0);
        assert_eq!(summary.already_moved, 1);
        assert!(summary.succeeded());
        // No edit staged, so no header either.
        assert!(!rewriter.has_edits(file));
        assert!(!summary.header_inserted);
    }

    #[test]
    fn header_is_not_duplicated_when_present() {
        let src = "#include <utility>\n\nvoid f() { consume(s); }\n";
        let (map, file) = map_with(src);
        let mut rewriter = Rewriter::new(&map);
        let mut planner = RewritePlanner::new(&map);

        let s = span_of(src, file, "(s)");
        let records = vec![record_at(file, s.start + 1, s.end - 1)];
        let summary = planner.apply(&records, &mut rewriter);

        assert_eq!(summary.applied, 1);
        assert!(!summary.header_inserted);
        let out = rewriter.rewritten_buffer(file).unwrap();
        assert_eq!(out.matches("#include <utility>").count(), 1);
    }

    #[test]
    fn header_lands_after_the_guard_preamble_without_includes() {
        let src = "// tool output\n#pragma once\n\nvoid f() { consume(s); }\n";
        let (map, file) = map_with(src);
        let mut rewriter = Rewriter::new(&map);
        let mut planner = RewritePlanner::new(&map);

        let s = span_of(src, file, "(s)");
        let records = vec![record_at(file, s.start + 1, s.end - 1)];
        planner.apply(&records, &mut rewriter);

        let out = rewriter.rewritten_buffer(file).unwrap();
        assert!(out.starts_with(
            "// tool output\n#pragma once\n#include <utility>\n\n"
        ));
    }

    #[test]
    fn header_respects_crlf_line_endings() {
        let src = "#include \"widget.h\"\r\n\r\nvoid f() { consume(s); }\r\n";
        let (map, file) = map_with(src);
        let mut rewriter = Rewriter::new(&map);
        let mut planner = RewritePlanner::new(&map);

        let s = span_of(src, file, "(s)");
        let records = vec![record_at(file, s.start + 1, s.end - 1)];
        planner.apply(&records, &mut rewriter);

        let out = rewriter.rewritten_buffer(file).unwrap();
        assert!(out.starts_with("#include \"widget.h\"\r\n#include <utility>\r\n\r\n"));
    }

    #[test]
    fn ifndef_guard_counts_as_preamble() {
        let src = "#ifndef WIDGET_H\n#define WIDGET_H\n\nvoid f() { consume(s); }\n#endif\n";
        let (map, file) = map_with(src);
        let mut rewriter = Rewriter::new(&map);
        let mut planner = RewritePlanner::new(&map);

        let s = span_of(src, file, "(s)");
        let records = vec![record_at(file, s.start + 1, s.end - 1)];
        planner.apply(&records, &mut rewriter);

        let out = rewriter.rewritten_buffer(file).unwrap();
        assert!(out.starts_with(
            "#ifndef WIDGET_H\n#define WIDGET_H\n#include <utility>\n\n"
        ));
    }
}
