//! Loading of dataset files into line streams and parsing of single records.
//!
//! A dataset file is a sequence of non-blank lines grouped into 4-line
//! records: the declared sequence length, the question ids, the skill ids and
//! the response tokens. Blank lines never count toward record boundaries.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;

/// Number of non-blank lines making up one record.
pub const LINES_PER_RECORD: usize = 4;

/// A decimal integer of any magnitude.
///
/// Values outside `i64` keep their digits, normalized to no `+` and no
/// leading zeros, so equal numbers always compare equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DecimalInt {
    Small(i64),
    Wide(String),
}

impl DecimalInt {
    /// Parse an optionally signed run of ASCII digits.
    pub fn parse(text: &str) -> Option<Self> {
        if let Ok(n) = text.parse::<i64>() {
            return Some(DecimalInt::Small(n));
        }
        let (negative, digits) = match text.as_bytes().first() {
            Some(b'-') => (true, &text[1..]),
            Some(b'+') => (false, &text[1..]),
            _ => (false, text),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        // i64 parsing accepts leading zeros, so anything left here is nonzero.
        let digits = digits.trim_start_matches('0');
        let wide = if negative {
            format!("-{digits}")
        } else {
            digits.to_string()
        };
        Some(DecimalInt::Wide(wide))
    }

    /// True when this value equals the count `n`.
    pub fn equals_count(&self, n: usize) -> bool {
        match self {
            DecimalInt::Small(v) => i64::try_from(n).is_ok_and(|n| n == *v),
            DecimalInt::Wide(_) => false,
        }
    }
}

impl From<i64> for DecimalInt {
    fn from(n: i64) -> Self {
        DecimalInt::Small(n)
    }
}

impl fmt::Display for DecimalInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecimalInt::Small(n) => write!(f, "{n}"),
            DecimalInt::Wide(digits) => f.write_str(digits),
        }
    }
}

/// One student's interaction sequence, borrowed from the line stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<'a> {
    pub seq_len: DecimalInt,
    pub question_ids: Vec<DecimalInt>,
    pub skill_ids: Vec<DecimalInt>,
    pub responses: Vec<&'a str>,
}

impl Record<'_> {
    /// True when all three lists have exactly `seq_len` entries.
    pub fn is_consistent(&self) -> bool {
        let n = self.question_ids.len();
        self.skill_ids.len() == n && self.responses.len() == n && self.seq_len.equals_count(n)
    }
}

/// Which id list a token came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdField {
    Question,
    Skill,
}

impl IdField {
    pub fn label(self) -> &'static str {
        match self {
            IdField::Question => "question id",
            IdField::Skill => "skill id",
        }
    }
}

/// Reason a block could not be turned into a [`Record`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    SeqLen(String),
    Id { field: IdField, token: String },
}

/// Read `path` into its line stream: trimmed, with blank lines dropped.
///
/// Files ending in `.gz` are decompressed on the fly.
pub fn load_line_stream(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let lines = if is_gzip(path) {
        read_line_stream(BufReader::new(GzDecoder::new(file)))
    } else {
        read_line_stream(BufReader::new(file))
    };
    lines.with_context(|| format!("failed to read {}", path.display()))
}

fn is_gzip(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

/// Collect the non-blank, trimmed lines of `reader`.
pub fn read_line_stream<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for (line_idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", line_idx + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        lines.push(trimmed.to_string());
    }
    Ok(lines)
}

/// Parse one complete 4-line block.
pub fn parse_record<S: AsRef<str>>(
    block: &[S; LINES_PER_RECORD],
) -> Result<Record<'_>, RecordError> {
    let [seq_line, question_line, skill_line, response_line] = block;
    let seq_text = seq_line.as_ref();
    let seq_len =
        DecimalInt::parse(seq_text).ok_or_else(|| RecordError::SeqLen(seq_text.to_string()))?;
    let question_ids = parse_ids(question_line.as_ref(), IdField::Question)?;
    let skill_ids = parse_ids(skill_line.as_ref(), IdField::Skill)?;
    let responses = split_tokens(response_line.as_ref()).collect();
    Ok(Record {
        seq_len,
        question_ids,
        skill_ids,
        responses,
    })
}

fn split_tokens(line: &str) -> impl Iterator<Item = &str> {
    line.split(',').map(str::trim).filter(|tok| !tok.is_empty())
}

fn parse_ids(line: &str, field: IdField) -> Result<Vec<DecimalInt>, RecordError> {
    split_tokens(line)
        .map(|tok| {
            DecimalInt::parse(tok).ok_or_else(|| RecordError::Id {
                field,
                token: tok.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    use flate2::Compression;
    use flate2::write::GzEncoder;
    use tempfile::tempdir;

    fn ids(values: &[i64]) -> Vec<DecimalInt> {
        values.iter().copied().map(DecimalInt::from).collect()
    }

    #[test]
    fn line_stream_drops_blank_lines_and_trims() {
        let input = "  3 \n\n1,2,3\r\n   \n10,10,20\n1,0,1\n\n";
        let lines = read_line_stream(Cursor::new(input)).unwrap();
        assert_eq!(lines, vec!["3", "1,2,3", "10,10,20", "1,0,1"]);
    }

    #[test]
    fn gz_files_are_decompressed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("train.txt.gz");
        let mut enc = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        enc.write_all(b"2\n5,6\n\n7,7\n1,0\n").unwrap();
        enc.finish().unwrap();

        let lines = load_line_stream(&path).unwrap();
        assert_eq!(lines, vec!["2", "5,6", "7,7", "1,0"]);
    }

    #[test]
    fn parses_consistent_record() {
        let block = ["3", "1,2,3", "10,10,20", "1,0,1"];
        let record = parse_record(&block).unwrap();
        assert_eq!(record.seq_len, DecimalInt::Small(3));
        assert_eq!(record.question_ids, ids(&[1, 2, 3]));
        assert_eq!(record.skill_ids, ids(&[10, 10, 20]));
        assert_eq!(record.responses, vec!["1", "0", "1"]);
        assert!(record.is_consistent());
    }

    #[test]
    fn empty_tokens_are_discarded() {
        let block = ["2", "1,,2,", ",10,20", "1,0,"];
        let record = parse_record(&block).unwrap();
        assert_eq!(record.question_ids, ids(&[1, 2]));
        assert_eq!(record.skill_ids, ids(&[10, 20]));
        assert_eq!(record.responses, vec!["1", "0"]);
        assert!(record.is_consistent());
    }

    #[test]
    fn responses_are_not_type_checked() {
        let block = ["2", "1,2", "3,4", "yes,0.5"];
        let record = parse_record(&block).unwrap();
        assert_eq!(record.responses, vec!["yes", "0.5"]);
    }

    #[test]
    fn mismatched_lengths_are_inconsistent() {
        let block = ["2", "1,2,3", "10,20", "1,0"];
        assert!(!parse_record(&block).unwrap().is_consistent());
        let block = ["-1", "", "", ""];
        let negative = parse_record(&block).unwrap();
        assert!(!negative.is_consistent());
    }

    #[test]
    fn integers_beyond_i64_still_parse() {
        assert_eq!(DecimalInt::parse("+42"), Some(DecimalInt::Small(42)));
        assert_eq!(
            DecimalInt::parse("0099999999999999999999"),
            Some(DecimalInt::Wide("99999999999999999999".into()))
        );
        assert_eq!(
            DecimalInt::parse("+99999999999999999999"),
            DecimalInt::parse("99999999999999999999")
        );
        assert_eq!(
            DecimalInt::parse("-99999999999999999999").unwrap().to_string(),
            "-99999999999999999999"
        );
        assert_eq!(DecimalInt::parse("1e30"), None);
        assert_eq!(DecimalInt::parse("-"), None);

        let block = ["99999999999999999999", "1", "99999999999999999999", "0"];
        let record = parse_record(&block).unwrap();
        assert_eq!(record.question_ids, ids(&[1]));
        assert!(!record.is_consistent());
    }

    #[test]
    fn bad_seq_len_and_ids_are_reported() {
        assert_eq!(
            parse_record(&["abc", "1,2", "10,20", "1,0"]),
            Err(RecordError::SeqLen("abc".into()))
        );
        assert_eq!(
            parse_record(&["2", "1,x", "10,20", "1,0"]),
            Err(RecordError::Id {
                field: IdField::Question,
                token: "x".into()
            })
        );
        assert_eq!(
            parse_record(&["2", "1,2", "10,2.5", "1,0"]),
            Err(RecordError::Id {
                field: IdField::Skill,
                token: "2.5".into()
            })
        );
    }
}
