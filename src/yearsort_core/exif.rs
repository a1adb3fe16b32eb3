use crate::yearsort_core::error::{Result, YearsortError};
use crate::yearsort_core::media::{CaptureYear, NoYearReason, YearLookup};
use clap::ValueEnum;
use exif::{In, Tag, Value as ExifValue};
use exiftool::ExifTool;
use serde::Deserialize;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// The two timestamp fields a capture year can come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureDates {
    /// When the photo was taken (`DateTimeOriginal`).
    pub date_time_original: Option<String>,
    /// When the file was last changed (`DateTime`, exiftool's `ModifyDate`).
    pub date_time: Option<String>,
}

impl CaptureDates {
    /// Text before the first ':' of the preferred non-empty timestamp.
    ///
    /// A timestamp without a colon is returned whole.
    pub fn year_text(&self) -> Option<&str> {
        let taken = [&self.date_time_original, &self.date_time]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())?;
        taken.split(':').next()
    }
}

/// Source of embedded capture timestamps.
pub trait MetadataReader {
    /// Read the timestamp fields of a file.
    ///
    /// Returns `Ok(None)` when the file has no metadata block at all.
    fn read_capture_dates(&mut self, path: &Path) -> Result<Option<CaptureDates>>;
}

/// Metadata backend selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MetadataBackend {
    /// Built-in EXIF decoder
    Exif,
    /// External exiftool program
    Exiftool,
}

impl MetadataBackend {
    pub fn open(self) -> Result<Box<dyn MetadataReader>> {
        match self {
            MetadataBackend::Exif => Ok(Box::new(ExifReader)),
            MetadataBackend::Exiftool => Ok(Box::new(ExifToolReader::new()?)),
        }
    }
}

/// Reads EXIF blocks from JPEG, PNG and TIFF containers in-process.
#[derive(Debug)]
pub struct ExifReader;

impl MetadataReader for ExifReader {
    fn read_capture_dates(&mut self, path: &Path) -> Result<Option<CaptureDates>> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);

        let exif = match exif::Reader::new().read_from_container(&mut reader) {
            Ok(exif) => exif,
            Err(exif::Error::NotFound(_)) => return Ok(None),
            Err(e) => {
                return Err(YearsortError::MetadataExtraction {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        };

        Ok(Some(CaptureDates {
            date_time_original: ascii_field(&exif, Tag::DateTimeOriginal),
            date_time: ascii_field(&exif, Tag::DateTime),
        }))
    }
}

/// Raw ASCII text of a field, without the display formatting the exif crate applies to dates.
fn ascii_field(exif: &exif::Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match field.value {
        ExifValue::Ascii(ref parts) => parts
            .first()
            .map(|p| String::from_utf8_lossy(p).into_owned()),
        _ => None,
    }
}

/// Timestamp fields as exiftool names them in its JSON output.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct RawCaptureDates {
    #[serde(default)]
    date_time_original: Option<Value>,
    #[serde(default)]
    modify_date: Option<Value>,
}

impl From<RawCaptureDates> for CaptureDates {
    fn from(raw: RawCaptureDates) -> Self {
        CaptureDates {
            date_time_original: raw.date_time_original.as_ref().and_then(value_to_string),
            date_time: raw.modify_date.as_ref().and_then(value_to_string),
        }
    }
}

/// Helper to extract a String from a JSON value.
fn value_to_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Reads capture timestamps through a long-running exiftool process.
pub struct ExifToolReader {
    exiftool: ExifTool,
}

impl ExifToolReader {
    pub fn new() -> Result<Self> {
        if !exiftool_available() {
            return Err(YearsortError::Exiftool(
                "exiftool was not found on PATH".to_string(),
            ));
        }
        let exiftool = ExifTool::new().map_err(|e| YearsortError::Exiftool(e.to_string()))?;
        Ok(ExifToolReader { exiftool })
    }
}

impl MetadataReader for ExifToolReader {
    fn read_capture_dates(&mut self, path: &Path) -> Result<Option<CaptureDates>> {
        let raw: RawCaptureDates = self.exiftool.read_metadata(path, &[]).map_err(|e| {
            YearsortError::MetadataExtraction {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;

        Ok(Some(raw.into()))
    }
}

/// Check if exiftool is available on the system.
pub fn exiftool_available() -> bool {
    std::process::Command::new("exiftool")
        .arg("-ver")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Determine the capture year of a file.
///
/// Read and decode failures are logged and reported as `NoYear` so that one
/// bad file never stops a run.
pub fn extract_year(reader: &mut dyn MetadataReader, path: &Path) -> YearLookup {
    let dates = match reader.read_capture_dates(path) {
        Ok(Some(dates)) => dates,
        Ok(None) => return YearLookup::NoYear(NoYearReason::NoMetadata),
        Err(e) => {
            log::warn!("Error reading EXIF data from {}: {}", path.display(), e);
            return YearLookup::NoYear(NoYearReason::Unreadable(e.to_string()));
        }
    };

    let Some(text) = dates.year_text() else {
        return YearLookup::NoYear(NoYearReason::NoCaptureDate);
    };

    match CaptureYear::new(text) {
        Some(year) => YearLookup::Year(year),
        None => {
            log::warn!(
                "Capture date of {} gives unusable year {:?}",
                path.display(),
                text
            );
            YearLookup::NoYear(NoYearReason::UnusableYear(text.to_string()))
        }
    }
}
