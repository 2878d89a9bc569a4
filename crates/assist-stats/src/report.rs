//! Rendering of a [`DatasetSummary`] for humans and for tooling.

use std::fmt;

use anyhow::Result;
use serde::Serialize;

use crate::summary::DatasetSummary;

/// Number of warnings printed before the rest are folded into a count.
pub const DEFAULT_MAX_WARNINGS: usize = 50;

/// Plain-text report: files, the four counts, then at most `max_warnings`
/// warnings followed by the number suppressed.
pub struct TextReport<'a> {
    summary: &'a DatasetSummary,
    max_warnings: usize,
}

impl<'a> TextReport<'a> {
    pub fn new(summary: &'a DatasetSummary, max_warnings: usize) -> Self {
        Self {
            summary,
            max_warnings,
        }
    }

    /// Warnings that did not fit under the display cap.
    pub fn suppressed(&self) -> usize {
        self.summary.warnings.len().saturating_sub(self.max_warnings)
    }
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.summary;
        writeln!(f, "Files processed:")?;
        for path in &s.files {
            writeln!(f, "  {}", path.display())?;
        }
        writeln!(f, "Unique students (blocks): {}", s.records)?;
        writeln!(f, "Unique problems (question ids): {}", s.question_count())?;
        writeln!(f, "Unique skills (skill ids): {}", s.skill_count())?;
        writeln!(f, "Total interactions (sum lengths): {}", s.interactions)?;

        if s.warnings.is_empty() {
            return Ok(());
        }
        writeln!(f)?;
        writeln!(f, "Warnings:")?;
        for warning in s.warnings.iter().take(self.max_warnings) {
            writeln!(f, "- {warning}")?;
        }
        let suppressed = self.suppressed();
        if suppressed > 0 {
            writeln!(f, "... and {suppressed} more warnings")?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct JsonReport {
    files: Vec<String>,
    students: usize,
    problems: usize,
    skills: usize,
    interactions: usize,
    warnings: Vec<String>,
}

/// Pretty-printed JSON with every collected warning, uncapped.
pub fn to_json(summary: &DatasetSummary) -> Result<String> {
    let report = JsonReport {
        files: summary
            .files
            .iter()
            .map(|p| p.display().to_string())
            .collect(),
        students: summary.records,
        problems: summary.question_count(),
        skills: summary.skill_count(),
        interactions: summary.interactions,
        warnings: summary.warnings.iter().map(ToString::to_string).collect(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
