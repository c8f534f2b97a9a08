//! Sequential session over an image folder.
//!
//! A session is built once at startup by listing a single directory,
//! filtering by image extension and sorting lexicographically. The cursor
//! only ever moves forward; when it reaches the end the session is
//! exhausted and the interactive loop must terminate.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::ToolError;

/// Image extensions accepted by the session scan (matched case-insensitively)
pub const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// The item the session currently points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentImage {
    /// Zero-based position in the session
    pub index: usize,
    /// Filename only (e.g., "img001.jpg")
    pub name: String,
    /// Full path to the image file
    pub path: PathBuf,
}

/// Ordered traversal state over one image folder
#[derive(Debug, Clone)]
pub struct Session {
    folder: PathBuf,
    entries: Vec<String>,
    cursor: usize,
}

impl Session {
    /// List the folder and build a session over its image files.
    ///
    /// Only direct children are considered (no recursion), matching the
    /// flat-folder layout the tools expect. Entries are sorted so the
    /// traversal order is stable across runs.
    pub fn scan(folder: impl Into<PathBuf>) -> Result<Self, ToolError> {
        let folder = folder.into();

        if !folder.is_dir() {
            return Err(ToolError::FolderNotFound(folder));
        }

        let mut entries = Vec::new();

        for entry in WalkDir::new(&folder)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let Some(extension) = path.extension() else {
                continue;
            };
            let ext = extension.to_string_lossy().to_lowercase();
            if !IMAGE_EXTENSIONS.contains(&ext.as_str()) {
                continue;
            }

            if let Some(name) = path.file_name() {
                entries.push(name.to_string_lossy().to_string());
            }
        }

        entries.sort();

        log::info!(
            "session scan: {} image(s) in {}",
            entries.len(),
            folder.display()
        );

        Ok(Session {
            folder,
            entries,
            cursor: 0,
        })
    }

    /// The folder this session traverses
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Total number of images in the session
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Zero-based cursor position
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// True once the cursor has moved past the last entry
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.entries.len()
    }

    /// The item the cursor points at, or `None` when exhausted
    pub fn current(&self) -> Option<CurrentImage> {
        self.entries.get(self.cursor).map(|name| CurrentImage {
            index: self.cursor,
            name: name.clone(),
            path: self.folder.join(name),
        })
    }

    /// Move the cursor forward by one.
    ///
    /// Advancing past the end is a no-op; the session just stays exhausted.
    pub fn advance(&mut self) {
        if self.cursor < self.entries.len() {
            self.cursor += 1;
        }
    }

    /// Status line for the UI: "Image i/N: name", or a completion notice
    pub fn status_line(&self) -> String {
        match self.current() {
            Some(current) => format!(
                "Image {}/{}: {}",
                current.index + 1,
                self.entries.len(),
                current.name
            ),
            None => "All images have been processed.".to_string(),
        }
    }
}

/// `next()` returns the current item and advances, per the session contract.
impl Iterator for Session {
    type Item = CurrentImage;

    fn next(&mut self) -> Option<CurrentImage> {
        let current = self.current();
        if current.is_some() {
            self.advance();
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_folder(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "imgprep-session-{}-{}",
            tag,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"stub").unwrap();
    }

    #[test]
    fn test_scan_filters_and_sorts() {
        let dir = temp_folder("scan");
        touch(&dir, "b.jpg");
        touch(&dir, "a.PNG");
        touch(&dir, "c.jpeg");
        touch(&dir, "notes.txt");
        touch(&dir, "noext");
        fs::create_dir(dir.join("sub.png")).unwrap();

        let session = Session::scan(&dir).unwrap();

        let names: Vec<String> = session.clone().map(|c| c.name).collect();
        assert_eq!(names, vec!["a.PNG", "b.jpg", "c.jpeg"]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_folder_is_an_error() {
        let result = Session::scan("/nonexistent/imgprep-folder");
        assert!(matches!(result, Err(ToolError::FolderNotFound(_))));
    }

    #[test]
    fn test_cursor_monotonic_until_exhausted() {
        let dir = temp_folder("cursor");
        touch(&dir, "one.bmp");
        touch(&dir, "two.bmp");

        let mut session = Session::scan(&dir).unwrap();
        assert_eq!(session.len(), 2);
        assert!(!session.is_exhausted());

        let first = session.current().unwrap();
        assert_eq!(first.index, 0);
        assert_eq!(first.name, "one.bmp");
        assert_eq!(first.path, dir.join("one.bmp"));

        session.advance();
        assert_eq!(session.position(), 1);
        session.advance();
        assert!(session.is_exhausted());
        assert!(session.current().is_none());

        // Advancing past the end stays exhausted
        session.advance();
        assert_eq!(session.position(), 2);
        assert!(session.is_exhausted());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_skip_advances_by_exactly_one_with_no_side_effects() {
        let dir = temp_folder("skip");
        touch(&dir, "img001.jpg");
        touch(&dir, "img002.jpg");

        let files_before = fs::read_dir(&dir).unwrap().count();

        let mut session = Session::scan(&dir).unwrap();
        let before = session.position();
        session.advance();
        assert_eq!(session.position(), before + 1);

        // A skip writes nothing: the folder is untouched
        let files_after = fs::read_dir(&dir).unwrap().count();
        assert_eq!(files_before, files_after);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_status_line() {
        let dir = temp_folder("status");
        touch(&dir, "img001.jpg");

        let mut session = Session::scan(&dir).unwrap();
        assert_eq!(session.status_line(), "Image 1/1: img001.jpg");

        session.advance();
        assert_eq!(session.status_line(), "All images have been processed.");

        fs::remove_dir_all(&dir).unwrap();
    }
}
