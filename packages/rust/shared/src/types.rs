//! Core domain types for mdparts runs.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SortOrder
// ---------------------------------------------------------------------------

/// How directory and file names are ordered before processing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ordinal byte-wise comparison (`10.md` sorts before `2.md`).
    #[default]
    Lexical,
    /// Digit runs compare by numeric value (`2.md` sorts before `10.md`).
    Natural,
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lexical => write!(f, "lexical"),
            Self::Natural => write!(f, "natural"),
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lexical" => Ok(Self::Lexical),
            "natural" => Ok(Self::Natural),
            other => Err(format!(
                "unknown sort order '{other}': expected 'lexical' or 'natural'"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// What happened to a single qualifying directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The merged document was written.
    Created {
        dir: PathBuf,
        output: PathBuf,
        /// Number of markdown sections written.
        sections: usize,
    },
    /// The directory had no merge candidates; nothing was touched.
    Skipped { dir: PathBuf },
    /// Dry run: the document that would have been written.
    Planned {
        dir: PathBuf,
        output: PathBuf,
        inputs: Vec<PathBuf>,
    },
}

impl MergeOutcome {
    /// The source directory this outcome belongs to.
    pub fn dir(&self) -> &std::path::Path {
        match self {
            Self::Created { dir, .. } | Self::Skipped { dir } | Self::Planned { dir, .. } => dir,
        }
    }
}

/// A directory that failed while the run kept going.
#[derive(Debug)]
pub struct DirFailure {
    pub dir: PathBuf,
    pub error: crate::MdPartsError,
}

/// Aggregate result of one run over a scan root.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Outcomes in processing order.
    pub outcomes: Vec<MergeOutcome>,
    /// Failures recorded in keep-going mode.
    pub failures: Vec<DirFailure>,
}

impl RunSummary {
    /// Number of merged documents written.
    pub fn created(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, MergeOutcome::Created { .. }))
            .count()
    }

    /// Number of directories skipped for lack of markdown files.
    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, MergeOutcome::Skipped { .. }))
            .count()
    }

    /// True when no directory failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_order_parses_case_insensitively() {
        assert_eq!("Natural".parse::<SortOrder>().unwrap(), SortOrder::Natural);
        assert_eq!("lexical".parse::<SortOrder>().unwrap(), SortOrder::Lexical);
        assert!("numeric".parse::<SortOrder>().is_err());
    }

    #[test]
    fn sort_order_serde_is_lowercase() {
        let json = serde_json::to_string(&SortOrder::Natural).unwrap();
        assert_eq!(json, "\"natural\"");
        let back: SortOrder = serde_json::from_str("\"lexical\"").unwrap();
        assert_eq!(back, SortOrder::Lexical);
    }

    #[test]
    fn summary_counts() {
        let summary = RunSummary {
            outcomes: vec![
                MergeOutcome::Created {
                    dir: "01-a".into(),
                    output: "01-a/part_01.md".into(),
                    sections: 2,
                },
                MergeOutcome::Skipped { dir: "02-b".into() },
                MergeOutcome::Skipped { dir: "03-c".into() },
            ],
            failures: vec![],
        };
        assert_eq!(summary.created(), 1);
        assert_eq!(summary.skipped(), 2);
        assert!(summary.is_clean());
        assert_eq!(summary.outcomes[1].dir(), std::path::Path::new("02-b"));
    }
}
