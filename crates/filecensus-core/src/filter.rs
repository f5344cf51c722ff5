//! Filter policy: type categories, name filtering and scope rules.
//!
//! Everything here is a pure function of its inputs and can be called from
//! any number of worker threads at once.

use std::path::Path;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::config::ScanConfig;

const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "avi", "mkv", "mov", "wmv", "flv", "webm", "m4v", "mpg", "mpeg", "ts",
];

const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "tiff", "webp", "svg", "raw", "heic", "ico",
];

const ARCHIVE_EXTENSIONS: &[&str] = &[
    "zip", "rar", "7z", "tar", "gz", "bz2", "xz", "iso", "tgz", "tbz2",
];

const DOCUMENT_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "odt", "ods", "odp", "txt", "rtf",
    "md", "csv",
];

/// File type category used to filter counted files.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    /// Every file matches.
    #[default]
    Any,
    /// Video containers.
    #[strum(to_string = "video", serialize = "videos")]
    Video,
    /// Still images.
    #[strum(to_string = "image", serialize = "images", serialize = "photo")]
    Image,
    /// Archives and disk images.
    #[strum(to_string = "archive", serialize = "archives")]
    Archive,
    /// Office documents and plain text.
    #[strum(to_string = "documents", serialize = "document", serialize = "docs")]
    Documents,
}

impl FileCategory {
    /// Recognized lower-cased extensions for this category.
    ///
    /// Empty for [`FileCategory::Any`], which matches every file.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Any => &[],
            Self::Video => VIDEO_EXTENSIONS,
            Self::Image => IMAGE_EXTENSIONS,
            Self::Archive => ARCHIVE_EXTENSIONS,
            Self::Documents => DOCUMENT_EXTENSIONS,
        }
    }

    /// Check whether a path's extension belongs to this category.
    pub fn matches(self, path: &Path) -> bool {
        if self == Self::Any {
            return true;
        }
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        self.extensions()
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext))
    }
}

/// Check whether the full path contains the name filter, ignoring case.
///
/// An absent or empty filter lets every path through.
pub fn matches_name(path: &Path, name_filter: Option<&str>) -> bool {
    match name_filter {
        Some(filter) if !filter.is_empty() => path
            .to_string_lossy()
            .to_lowercase()
            .contains(&filter.to_lowercase()),
        _ => true,
    }
}

/// Decide whether a file contributes to the census.
pub fn should_count(path: &Path, category: FileCategory, name_filter: Option<&str>) -> bool {
    matches_name(path, name_filter) && category.matches(path)
}

/// Scope flag for a directory, given its name and the parent's flag.
///
/// Without a scope anchor everything is in scope. With one, a directory
/// enters scope when its name equals the anchor and stays in scope for
/// every descendant.
pub fn enters_scope(dir_name: &str, parent_in_scope: bool, config: &ScanConfig) -> bool {
    match config.scope_anchor.as_deref() {
        None => true,
        Some(anchor) => parent_in_scope || dir_name == anchor,
    }
}

/// Scope flag for the scan root itself.
///
/// A root that is itself named like the anchor starts in scope.
pub fn root_in_scope(config: &ScanConfig) -> bool {
    let name = config
        .root
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    enters_scope(&name, false, config)
}

/// Decide whether to recurse into a subdirectory.
///
/// Scope never prunes: directories outside the anchor are still walked so
/// that anchors nested further down are found. Only hidden directories are
/// skipped, and only when hidden entries are excluded.
pub fn should_descend(dir_name: &str, _in_scope: bool, config: &ScanConfig) -> bool {
    !config.should_skip_hidden(dir_name)
}

/// Decide whether a file in a directory with the given scope flag is
/// considered at all (before type and name filtering).
pub fn file_in_scope(file_name: &str, in_scope: bool, config: &ScanConfig) -> bool {
    in_scope && !config.should_skip_hidden(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_category_parse_aliases() {
        assert_eq!(FileCategory::from_str("VIDEO").unwrap(), FileCategory::Video);
        assert_eq!(FileCategory::from_str("photo").unwrap(), FileCategory::Image);
        assert_eq!(FileCategory::from_str("Documents").unwrap(), FileCategory::Documents);
        assert!(FileCategory::from_str("music").is_err());
        assert_eq!(FileCategory::Archive.to_string(), "archive");
    }

    #[test]
    fn test_extension_match_is_case_insensitive() {
        assert!(FileCategory::Video.matches(Path::new("/a/clip.MP4")));
        assert!(FileCategory::Image.matches(Path::new("/a/pic.Jpeg")));
        assert!(!FileCategory::Video.matches(Path::new("/a/pic.jpeg")));
        assert!(!FileCategory::Archive.matches(Path::new("/a/noext")));
        assert!(FileCategory::Any.matches(Path::new("/a/noext")));
    }

    #[test]
    fn test_extension_only_not_stem() {
        // "mp4" in the stem is not an extension
        assert!(!FileCategory::Video.matches(Path::new("/a/mp4.txt")));
    }

    #[test]
    fn test_name_filter_ignores_case() {
        let path = Path::new("/media/MyVIDEOS/clip.mp4");
        assert!(matches_name(path, Some("vid")));
        assert!(matches_name(path, None));
        assert!(matches_name(path, Some("")));
        assert!(!matches_name(path, Some("music")));
    }

    #[test]
    fn test_should_count_requires_both() {
        let path = Path::new("/media/MyVIDEOS/clip.mp4");
        assert!(should_count(path, FileCategory::Video, Some("vid")));
        assert!(!should_count(path, FileCategory::Image, Some("vid")));
        assert!(!should_count(path, FileCategory::Video, Some("holiday")));
    }

    #[test]
    fn test_scope_rules() {
        let plain = ScanConfig::new("/root");
        assert!(enters_scope("Other", false, &plain));

        let scoped = ScanConfig::builder()
            .root("/root")
            .scope_anchor("Videos")
            .build()
            .unwrap();
        assert!(!enters_scope("Other", false, &scoped));
        assert!(enters_scope("Videos", false, &scoped));
        assert!(enters_scope("Sub", true, &scoped));
        // anchors are matched exactly
        assert!(!enters_scope("videos", false, &scoped));
        // out-of-scope directories are still walked
        assert!(should_descend("Other", false, &scoped));

        assert!(!root_in_scope(&scoped));
        let mut anchored_root = scoped.clone();
        anchored_root.root = "/home/me/Videos".into();
        assert!(root_in_scope(&anchored_root));
        assert!(root_in_scope(&plain));
    }

    #[test]
    fn test_hidden_entries() {
        let mut config = ScanConfig::new("/root");
        assert!(should_descend(".cache", true, &config));
        assert!(file_in_scope(".profile", true, &config));

        config.include_hidden = false;
        assert!(!should_descend(".cache", true, &config));
        assert!(!file_in_scope(".profile", true, &config));
        assert!(!file_in_scope("visible", false, &config));
    }
}
