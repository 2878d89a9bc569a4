use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::summary::SummaryOptions;

/// Run configuration, optionally loaded from TOML. Every key may be omitted.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Directory holding the conventional `train.txt` / `test.txt` pair.
    #[serde(default = "defaults::data_root")]
    pub data_root: PathBuf,

    /// Explicit input files. When non-empty, `data_root` is ignored.
    #[serde(default)]
    pub files: Vec<PathBuf>,

    /// Summarize only the training file, which then must exist.
    #[serde(default)]
    pub train_only: bool,

    /// Fail the run on any missing file instead of warning.
    #[serde(default)]
    pub required: bool,

    #[serde(default = "defaults::max_warnings")]
    pub max_warnings: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            data_root: defaults::data_root(),
            files: Vec::new(),
            train_only: false,
            required: false,
            max_warnings: defaults::max_warnings(),
        }
    }
}

/// Command-line values layered over a [`RunConfig`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Overrides {
    pub files: Vec<PathBuf>,
    pub data_root: Option<PathBuf>,
    pub max_warnings: Option<usize>,
    pub train_only: bool,
    pub required: bool,
}

impl RunConfig {
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let cfg: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        Ok(cfg)
    }

    /// Apply command-line values. Set values replace the file's; flags can
    /// only switch `train_only` / `required` on.
    pub fn apply_overrides(&mut self, overrides: Overrides) {
        if !overrides.files.is_empty() {
            self.files = overrides.files;
        }
        if let Some(root) = overrides.data_root {
            self.data_root = root;
        }
        if let Some(n) = overrides.max_warnings {
            self.max_warnings = n;
        }
        self.train_only |= overrides.train_only;
        self.required |= overrides.required;
    }

    /// Input paths in scan order.
    pub fn resolve_paths(&self) -> Vec<PathBuf> {
        if !self.files.is_empty() {
            return self.files.clone();
        }
        let train = self.data_root.join(defaults::TRAIN_FILE);
        if self.train_only {
            vec![train]
        } else {
            vec![train, self.data_root.join(defaults::TEST_FILE)]
        }
    }

    pub fn summary_options(&self) -> SummaryOptions {
        SummaryOptions {
            required: self.required || self.train_only,
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    pub const TRAIN_FILE: &str = "train.txt";
    pub const TEST_FILE: &str = "test.txt";

    pub fn data_root() -> PathBuf { PathBuf::from("data/assist09") }
    pub fn max_warnings() -> usize { crate::report::DEFAULT_MAX_WARNINGS }
}
