use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::fixture::ChildPath;
use assert_fs::prelude::*;

// Same fixture builders the unit tests use.
#[allow(dead_code)]
#[path = "../../src/yearsort_core/testutil.rs"]
mod testutil;

pub use testutil::{png_with_exif, tiff_with_dates};

pub fn yearsort() -> Command {
    Command::cargo_bin("yearsort").unwrap()
}

/// A JPEG whose only content is an Exif segment with the given timestamps.
pub fn exif_jpeg(original: Option<&str>, modified: Option<&str>) -> Vec<u8> {
    testutil::jpeg_with_exif(&testutil::tiff_with_dates(original, modified))
}

/// Lay out a source directory with a dated photo, an undated one and a text file.
pub fn setup_source(temp_dir: &TempDir) -> ChildPath {
    let source = temp_dir.child("photos");
    source
        .child("a.jpg")
        .write_binary(&exif_jpeg(Some("2023:05:01 10:00:00"), None))
        .unwrap();
    source
        .child("b.png")
        .write_binary(&png_with_exif(None))
        .unwrap();
    source.child("notes.txt").write_str("not a photo").unwrap();
    source
}
