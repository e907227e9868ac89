//! Run summary

use std::collections::BTreeMap;
use std::fmt;

use sheetlayer_core::{Diagnostic, DiagnosticKind};
use sheetlayer_render::EmittedFiles;

/// What a run produced and what it had to leave out
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    /// Worksheets visited
    pub sheets: usize,
    /// Images written out (SVG and/or preview)
    pub images_emitted: usize,
    /// Images dropped for a malformed anchor or for media that could not be read or written
    pub images_excluded: usize,
    /// Shapes written into overlay groups (a shape over two images counts twice)
    pub shapes_bound: usize,
    /// Drawing objects of unsupported kinds plus shapes with malformed anchors
    pub shapes_skipped: usize,
    /// Files written, per emitted image
    pub outputs: Vec<EmittedFiles>,
    /// Every non-fatal problem, in the order encountered
    pub diagnostics: Vec<Diagnostic>,
}

impl RunReport {
    /// Number of diagnostics per category
    pub fn counts_by_kind(&self) -> BTreeMap<DiagnosticKind, usize> {
        let mut counts = BTreeMap::new();
        for diagnostic in &self.diagnostics {
            *counts.entry(diagnostic.kind).or_insert(0) += 1;
        }
        counts
    }

    /// Whether anything was skipped, excluded or degraded
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Fold another report into this one
    pub fn merge(&mut self, other: RunReport) {
        self.sheets += other.sheets;
        self.images_emitted += other.images_emitted;
        self.images_excluded += other.images_excluded;
        self.shapes_bound += other.shapes_bound;
        self.shapes_skipped += other.shapes_skipped;
        self.outputs.extend(other.outputs);
        self.diagnostics.extend(other.diagnostics);
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Sheets: {}", self.sheets)?;
        writeln!(f, "Images emitted: {}", self.images_emitted)?;
        writeln!(f, "Images excluded: {}", self.images_excluded)?;
        writeln!(f, "Shapes bound: {}", self.shapes_bound)?;
        write!(f, "Shapes skipped: {}", self.shapes_skipped)?;
        if self.has_diagnostics() {
            let counts: Vec<String> = self
                .counts_by_kind()
                .iter()
                .map(|(kind, n)| format!("{} {}", n, kind))
                .collect();
            write!(f, "\nDiagnostics ({}):", counts.join(", "))?;
            for diagnostic in &self.diagnostics {
                write!(f, "\n  {}", diagnostic)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sheetlayer_core::OverlayError;

    #[test]
    fn test_summary_lists_reasons() {
        let report = RunReport {
            sheets: 1,
            images_emitted: 2,
            images_excluded: 1,
            shapes_bound: 3,
            shapes_skipped: 1,
            outputs: Vec::new(),
            diagnostics: vec![
                Diagnostic::new("drawing1-image-4", &OverlayError::decode("truncated")),
                Diagnostic::new("drawing1-shape-7", &OverlayError::parse("no anchor")),
                Diagnostic::new("drawing1-shape-9", &OverlayError::parse("no anchor")),
            ],
        };

        let text = report.to_string();
        assert!(text.starts_with("Sheets: 1\nImages emitted: 2\nImages excluded: 1\n"));
        assert!(text.contains("Diagnostics (2 parse, 1 decode):"));
        assert!(text.contains("\n  [decode] drawing1-image-4: Decode error: truncated"));
    }

    #[test]
    fn test_clean_summary_has_no_diagnostics_section() {
        let report = RunReport::default();
        assert_eq!(
            report.to_string(),
            "Sheets: 0\nImages emitted: 0\nImages excluded: 0\nShapes bound: 0\nShapes skipped: 0"
        );
    }

    #[test]
    fn test_merge() {
        let mut total = RunReport {
            sheets: 1,
            images_emitted: 1,
            ..Default::default()
        };
        total.merge(RunReport {
            sheets: 2,
            images_excluded: 1,
            diagnostics: vec![Diagnostic::emit("drawing2-image-2", "disk full")],
            ..Default::default()
        });
        assert_eq!(total.sheets, 3);
        assert_eq!(total.images_emitted, 1);
        assert_eq!(total.images_excluded, 1);
        assert_eq!(total.counts_by_kind().get(&DiagnosticKind::Emit), Some(&1));
    }
}
