use serde::Serialize;
use std::path::{Component, Path};

/// Image file extensions eligible for organizing (lowercase).
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tiff"];

/// Whether a path has one of the eligible image extensions, ignoring case.
pub fn is_eligible_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Year text taken from a capture timestamp, used as a bucket directory name.
///
/// Only the shape of a path component is checked: `"2023"` and `"abcd"` are
/// both accepted, while empty text, `.`/`..` and anything containing a path
/// separator are not.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CaptureYear(String);

impl CaptureYear {
    pub fn new(year: &str) -> Option<Self> {
        if year.is_empty() || year.contains(['/', '\\']) {
            return None;
        }
        let mut components = Path::new(year).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Some(CaptureYear(year.to_string())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CaptureYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why no year could be derived for a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum NoYearReason {
    /// The file carries no embedded metadata block.
    NoMetadata,
    /// Metadata is present but neither timestamp field is set.
    NoCaptureDate,
    /// The file could not be opened or its metadata could not be decoded.
    Unreadable(String),
    /// The timestamp produced text that cannot name a directory.
    UnusableYear(String),
}

impl std::fmt::Display for NoYearReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoYearReason::NoMetadata => write!(f, "no embedded metadata"),
            NoYearReason::NoCaptureDate => write!(f, "no capture date in metadata"),
            NoYearReason::Unreadable(reason) => write!(f, "unreadable: {}", reason),
            NoYearReason::UnusableYear(year) => write!(f, "unusable year {:?}", year),
        }
    }
}

/// Outcome of looking up the capture year of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YearLookup {
    Year(CaptureYear),
    NoYear(NoYearReason),
}

impl YearLookup {
    pub fn year(&self) -> Option<&CaptureYear> {
        match self {
            YearLookup::Year(year) => Some(year),
            YearLookup::NoYear(_) => None,
        }
    }
}
