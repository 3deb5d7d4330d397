//! Classify a static font by its file name

use std::path::Path;

/// The style of a static font within a regular/bold/italic family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Style {
    Regular,
    Bold,
    Italic,
}

impl Style {
    /// Classify a font from the file name component of `path`.
    ///
    /// Matching is a case-sensitive substring search. "Italic" is checked
    /// before "Bold", so a bold italic file is classified as [`Style::Italic`].
    pub fn from_path(path: &Path) -> Style {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();
        Style::from_file_name(&file_name)
    }

    /// Classify a font from a bare file name.
    pub fn from_file_name(file_name: &str) -> Style {
        if file_name.contains("Italic") {
            Style::Italic
        } else if file_name.contains("Bold") {
            Style::Bold
        } else {
            Style::Regular
        }
    }
}

impl std::fmt::Display for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Style::Regular => "Regular",
            Style::Bold => "Bold",
            Style::Italic => "Italic",
        };
        f.write_str(name)
    }
}
