//! Per-directory merger.
//!
//! Collects the `*.md` files directly inside one numbered directory and
//! writes them, in order, into a single `part_<prefix>.md` document:
//!
//! ```text
//!
//! # <stem of first file>
//!
//! <first file, verbatim>
//!
//! ---
//!
//!
//! # <stem of second file>
//!
//! <second file, verbatim>
//! ```
//!
//! There is no separator after the last section.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, trace};

use mdparts_shared::{MdPartsError, MergeOptions, MergeOutcome, Result, SortOrder};

use crate::ordering::compare_names;

/// Extension (with dot) that marks a merge candidate.
const MARKDOWN_SUFFIX: &str = ".md";

/// Written between consecutive sections.
const SECTION_SEPARATOR: &str = "\n\n---\n\n";

/// The part of a directory name before the first `-` (the whole name if
/// there is none).
pub fn dir_prefix(name: &str) -> &str {
    name.split('-').next().unwrap_or(name)
}

/// Merged file name for a directory: `<output_prefix><dir prefix>.md`.
pub fn output_file_name(dir_name: &str, output_prefix: &str) -> String {
    format!("{output_prefix}{}{MARKDOWN_SUFFIX}", dir_prefix(dir_name))
}

/// One input file ready to be written as a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// File name without its extension; becomes the `# ` header.
    pub stem: String,
    /// File content, copied verbatim.
    pub body: String,
}

impl Section {
    /// Read a markdown file in full. Content must be valid UTF-8.
    pub fn read(path: &Path) -> Result<Self> {
        let body = std::fs::read_to_string(path).map_err(|e| MdPartsError::io(path, e))?;
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { stem, body })
    }
}

/// List merge candidates in `dir`: regular files whose name ends in `.md`,
/// sorted by file name. `exclude` drops one file name from the result.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn collect_candidates(
    dir: &Path,
    order: SortOrder,
    exclude: Option<&str>,
) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| MdPartsError::io(dir, e))?;

    let mut files: Vec<(String, PathBuf)> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| MdPartsError::io(dir, e))?;
        let path = entry.path();

        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            debug!(path = %path.display(), "skipping non-UTF-8 file name");
            continue;
        };

        if !name.ends_with(MARKDOWN_SUFFIX) || !path.is_file() {
            continue;
        }

        if exclude == Some(name.as_str()) {
            debug!(%name, "excluding merged output from its own inputs");
            continue;
        }

        files.push((name, path));
    }

    files.sort_by(|a, b| compare_names(&a.0, &b.0, order));
    Ok(files.into_iter().map(|(_, path)| path).collect())
}

/// Write one section. `last` suppresses the trailing separator.
pub fn write_section<W: Write>(out: &mut W, section: &Section, last: bool) -> std::io::Result<()> {
    write!(out, "\n# {}\n\n", section.stem)?;
    out.write_all(section.body.as_bytes())?;
    if !last {
        out.write_all(SECTION_SEPARATOR.as_bytes())?;
    }
    Ok(())
}

/// Write all sections in order.
pub fn render_sections<W: Write>(out: &mut W, sections: &[Section]) -> std::io::Result<()> {
    for (i, section) in sections.iter().enumerate() {
        write_section(out, section, i + 1 == sections.len())?;
    }
    Ok(())
}

/// Merge one directory according to `options`.
///
/// Returns `Skipped` without touching the filesystem when the directory
/// has no candidates. Otherwise truncates (or creates) the merged file and
/// streams each input into it. A failure part-way leaves whatever was
/// already written.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn merge_directory(dir: &Path, options: &MergeOptions) -> Result<MergeOutcome> {
    let dir_name = dir
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            MdPartsError::validation(format!(
                "cannot derive a prefix from directory '{}'",
                dir.display()
            ))
        })?;

    let output_name = output_file_name(dir_name, &options.output_prefix);
    let output_path = dir.join(&output_name);

    let exclude = options.exclude_output.then_some(output_name.as_str());
    let inputs = collect_candidates(dir, options.sort, exclude)?;

    if inputs.is_empty() {
        debug!("no markdown files");
        return Ok(MergeOutcome::Skipped {
            dir: dir.to_path_buf(),
        });
    }

    if options.dry_run {
        return Ok(MergeOutcome::Planned {
            dir: dir.to_path_buf(),
            output: output_path,
            inputs,
        });
    }

    let file = File::create(&output_path).map_err(|e| MdPartsError::io(&output_path, e))?;
    let mut out = BufWriter::new(file);

    for (i, input) in inputs.iter().enumerate() {
        let section = Section::read(input)?;
        trace!(file = %input.display(), bytes = section.body.len(), "appending section");
        write_section(&mut out, &section, i + 1 == inputs.len())
            .map_err(|e| MdPartsError::io(&output_path, e))?;
    }

    out.flush().map_err(|e| MdPartsError::io(&output_path, e))?;

    info!(
        output = %output_path.display(),
        sections = inputs.len(),
        "merged document written"
    );

    Ok(MergeOutcome::Created {
        dir: dir.to_path_buf(),
        output: output_path,
        sections: inputs.len(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
