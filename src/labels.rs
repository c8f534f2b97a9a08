//! Label records and the append-only label file.
//!
//! One record per line, `image_name<TAB>label<NEWLINE>`, no header. The file
//! is opened in append mode for every commit and never truncated, so a
//! restarted session keeps adding to the same file. Labels are trimmed and
//! an empty entry becomes the `N/A` sentinel; any stray tab or newline left
//! inside the text is collapsed to a space so a record can never span lines
//! or columns.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::ToolError;

/// Sentinel written when the user submits an empty label
pub const EMPTY_LABEL: &str = "N/A";

/// Trim and clean raw label text, substituting the sentinel when empty.
pub fn normalize_label(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();

    if cleaned.is_empty() {
        EMPTY_LABEL.to_string()
    } else {
        cleaned
    }
}

/// One committed (image, label) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelRecord {
    pub image_name: String,
    pub label: String,
}

impl LabelRecord {
    /// Build a record from raw text-entry input.
    pub fn new(image_name: impl Into<String>, raw_text: &str) -> Self {
        LabelRecord {
            image_name: image_name.into(),
            label: normalize_label(raw_text),
        }
    }

    /// The exact line appended to the label file.
    pub fn to_line(&self) -> String {
        format!("{}\t{}\n", self.image_name, self.label)
    }
}

/// Append-only writer for the label file
#[derive(Debug, Clone)]
pub struct LabelWriter {
    path: PathBuf,
}

impl LabelWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        LabelWriter { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record, creating the file on first use.
    ///
    /// Open-append-close per commit: cheap at human pace, and the file stays
    /// intact if the process dies between commits.
    pub fn append(&self, record: &LabelRecord) -> Result<(), ToolError> {
        let io_err = |e| ToolError::LabelAppend {
            path: self.path.clone(),
            source: e,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io_err)?;

        file.write_all(record.to_line().as_bytes()).map_err(io_err)?;

        log::debug!("labeled {} as {:?}", record.image_name, record.label);
        Ok(())
    }
}
