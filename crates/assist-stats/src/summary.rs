//! Aggregate statistics over one or more dataset files.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use log::{debug, info};

use crate::record::{
    DecimalInt, IdField, LINES_PER_RECORD, RecordError, load_line_stream, parse_record,
};

/// Knobs for a single [`summarize`] run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SummaryOptions {
    /// Treat a missing input file as fatal instead of recording a warning.
    pub required: bool,
}

/// A structural problem found while scanning. None of these abort the run.
///
/// `line` is always the 1-based position of the block's first line within the
/// file's non-blank line stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetWarning {
    MissingFile {
        path: PathBuf,
    },
    MalformedBlockCount {
        path: PathBuf,
        lines: usize,
    },
    TruncatedBlock {
        path: PathBuf,
        line: usize,
    },
    InvalidSeqLen {
        path: PathBuf,
        line: usize,
        text: String,
    },
    InvalidId {
        path: PathBuf,
        line: usize,
        field: IdField,
        token: String,
    },
    LengthMismatch {
        path: PathBuf,
        line: usize,
        seq_len: DecimalInt,
        questions: usize,
        skills: usize,
        responses: usize,
    },
}

impl fmt::Display for DatasetWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetWarning::MissingFile { path } => {
                write!(f, "Missing file: {}", path.display())
            }
            DatasetWarning::MalformedBlockCount { path, lines } => write!(
                f,
                "File {} line count {lines} not multiple of {LINES_PER_RECORD}",
                path.display()
            ),
            DatasetWarning::TruncatedBlock { path, line } => write!(
                f,
                "Truncated block starting at line {line} in {}",
                path.display()
            ),
            DatasetWarning::InvalidSeqLen { path, line, text } => write!(
                f,
                "Non-integer seq_len '{text}' at block starting line {line} in {}",
                path.display()
            ),
            DatasetWarning::InvalidId {
                path,
                line,
                field,
                token,
            } => write!(
                f,
                "Non-integer {} '{token}' at block starting line {line} in {}",
                field.label(),
                path.display()
            ),
            DatasetWarning::LengthMismatch {
                path,
                line,
                seq_len,
                questions,
                skills,
                responses,
            } => write!(
                f,
                "Length mismatch in block starting line {line} in {}: seq_len={seq_len}, qids={questions}, skills={skills}, resps={responses}",
                path.display()
            ),
        }
    }
}

/// Statistics accumulated across every file of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetSummary {
    /// Every requested path, in order, including missing ones.
    pub files: Vec<PathBuf>,
    /// Blocks that contributed to the counts (one per student sequence).
    pub records: usize,
    pub question_ids: BTreeSet<DecimalInt>,
    pub skill_ids: BTreeSet<DecimalInt>,
    /// Sum of question-id list lengths over counted blocks.
    pub interactions: usize,
    pub warnings: Vec<DatasetWarning>,
}

impl DatasetSummary {
    pub fn question_count(&self) -> usize {
        self.question_ids.len()
    }

    pub fn skill_count(&self) -> usize {
        self.skill_ids.len()
    }

    fn warn(&mut self, warning: DatasetWarning) {
        debug!("{warning}");
        self.warnings.push(warning);
    }

    /// Fold the line stream of `source` into the running totals.
    ///
    /// Returns the number of blocks counted from this stream.
    pub fn scan_lines<S: AsRef<str>>(&mut self, source: &Path, lines: &[S]) -> usize {
        if lines.len() % LINES_PER_RECORD != 0 {
            self.warn(DatasetWarning::MalformedBlockCount {
                path: source.to_path_buf(),
                lines: lines.len(),
            });
        }

        let mut counted = 0usize;
        for (block_idx, block) in lines.chunks(LINES_PER_RECORD).enumerate() {
            let line = block_idx * LINES_PER_RECORD + 1;
            let Ok(block) = <&[S; LINES_PER_RECORD]>::try_from(block) else {
                self.warn(DatasetWarning::TruncatedBlock {
                    path: source.to_path_buf(),
                    line,
                });
                break;
            };

            let record = match parse_record(block) {
                Ok(record) => record,
                Err(RecordError::SeqLen(text)) => {
                    self.warn(DatasetWarning::InvalidSeqLen {
                        path: source.to_path_buf(),
                        line,
                        text,
                    });
                    continue;
                }
                Err(RecordError::Id { field, token }) => {
                    self.warn(DatasetWarning::InvalidId {
                        path: source.to_path_buf(),
                        line,
                        field,
                        token,
                    });
                    continue;
                }
            };

            if !record.is_consistent() {
                self.warn(DatasetWarning::LengthMismatch {
                    path: source.to_path_buf(),
                    line,
                    seq_len: record.seq_len.clone(),
                    questions: record.question_ids.len(),
                    skills: record.skill_ids.len(),
                    responses: record.responses.len(),
                });
            }

            self.records += 1;
            self.interactions += record.question_ids.len();
            self.question_ids.extend(record.question_ids);
            self.skill_ids.extend(record.skill_ids);
            counted += 1;
        }
        counted
    }
}

/// Scan every path in order and return the combined statistics.
///
/// Malformed data only produces warnings. A missing file is fatal when
/// `options.required` is set, and a read failure on an existing file is always
/// fatal.
pub fn summarize<P: AsRef<Path>>(
    paths: &[P],
    options: &SummaryOptions,
) -> Result<DatasetSummary> {
    let mut summary = DatasetSummary::default();
    for path in paths {
        let path = path.as_ref();
        summary.files.push(path.to_path_buf());
        if !path.exists() {
            if options.required {
                bail!("Missing file: {}", path.display());
            }
            summary.warn(DatasetWarning::MissingFile {
                path: path.to_path_buf(),
            });
            continue;
        }

        let lines = load_line_stream(path)?;
        let warnings_before = summary.warnings.len();
        let counted = summary.scan_lines(path, &lines);
        info!(
            "Scanned {}: {} lines, {} records, {} warnings",
            path.display(),
            lines.len(),
            counted,
            summary.warnings.len() - warnings_before
        );
    }
    Ok(summary)
}
