//! Line-delimited image list files
//!
//! One image reference per line. Blank lines are skipped, there is no
//! comment syntax, and duplicates are kept in file order.

use std::io::Write;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::ImageListError;
use crate::image::ImageRef;

/// One non-blank line of an image list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEntry {
    Image(ImageRef),
    /// A line that is not a usable reference. It is still processed and
    /// counts as a failed fetch.
    Invalid {
        line: usize,
        raw: String,
        reason: String,
    },
}

impl ListEntry {
    pub fn image(&self) -> Option<&ImageRef> {
        match self {
            ListEntry::Image(image) => Some(image),
            ListEntry::Invalid { .. } => None,
        }
    }
}

impl From<ImageRef> for ListEntry {
    fn from(image: ImageRef) -> Self {
        ListEntry::Image(image)
    }
}

/// Read an image list from disk.
///
/// A missing file is reported as [`ImageListError::NotFound`] so callers can
/// abort before doing any work.
pub fn read_image_list(path: &Path) -> Result<Vec<ListEntry>, ImageListError> {
    if !path.is_file() {
        return Err(ImageListError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let entries = parse_image_list(&content);
    debug!("Read {} image references from {:?}", entries.len(), path);
    Ok(entries)
}

/// Parse image list content, one entry per non-blank line
pub fn parse_image_list(content: &str) -> Vec<ListEntry> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| match ImageRef::parse(line) {
            Ok(image) => ListEntry::Image(image),
            Err(reason) => {
                warn!("Line {}: {}", idx + 1, reason);
                ListEntry::Invalid {
                    line: idx + 1,
                    raw: line.trim().to_string(),
                    reason,
                }
            }
        })
        .collect()
}

/// Write one reference per line, creating parent directories as needed
pub fn write_image_list(path: &Path, images: &[ImageRef]) -> Result<(), ImageListError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
    for image in images {
        writeln!(file, "{}", image)?;
    }
    file.flush()?;

    debug!("Wrote {} image references to {:?}", images.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn names(entries: &[ListEntry]) -> Vec<&str> {
        entries
            .iter()
            .filter_map(ListEntry::image)
            .map(|i| i.as_str())
            .collect()
    }

    #[test]
    fn test_skips_blank_lines() {
        let entries = parse_image_list("a:1\n\n   \nb:2\r\n\nc\n");
        assert_eq!(names(&entries), vec!["a:1", "b:2", "c"]);
    }

    #[test]
    fn test_keeps_duplicates_in_order() {
        let entries = parse_image_list("x:1\ny:1\nx:1\n");
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0], entries[2]);
    }

    #[test]
    fn test_invalid_line_is_kept_as_entry() {
        let entries = parse_image_list("ok:1\n\n bad ref \nrepo:\n");

        assert_eq!(entries.len(), 3);
        assert_eq!(names(&entries), vec!["ok:1"]);
        match &entries[1] {
            ListEntry::Invalid { line, raw, .. } => {
                assert_eq!(*line, 3);
                assert_eq!(raw, "bad ref");
            }
            other => panic!("unexpected entry: {:?}", other),
        }
        assert!(matches!(entries[2], ListEntry::Invalid { line: 4, .. }));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let err = read_image_list(&dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, ImageListError::NotFound(_)));
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("images.txt");
        let images = vec![
            ImageRef::parse("swecompass/eval:a").unwrap(),
            ImageRef::parse("swebench/sweb.eval.x86_64.b:latest").unwrap(),
        ];

        write_image_list(&path, &images).unwrap();

        let entries = read_image_list(&path).unwrap();
        let expected: Vec<ListEntry> = images.into_iter().map(ListEntry::from).collect();
        assert_eq!(entries, expected);
    }
}
