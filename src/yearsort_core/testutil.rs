//! Image fixtures generated on the fly for tests.

use exif::experimental::Writer;
use exif::{Field, In, Tag, Value};
use std::io::Cursor;

/// A bare little-endian TIFF carrying the given timestamp fields.
pub fn tiff_with_dates(original: Option<&str>, modified: Option<&str>) -> Vec<u8> {
    let fields: Vec<Field> = [(Tag::DateTimeOriginal, original), (Tag::DateTime, modified)]
        .into_iter()
        .filter_map(|(tag, text)| {
            text.map(|t| Field {
                tag,
                ifd_num: In::PRIMARY,
                value: Value::Ascii(vec![t.as_bytes().to_vec()]),
            })
        })
        .collect();

    let mut writer = Writer::new();
    for field in &fields {
        writer.push_field(field);
    }
    let mut buf = Cursor::new(Vec::new());
    writer.write(&mut buf, true).unwrap();
    buf.into_inner()
}

/// A JPEG stream holding only an APP1 Exif segment.
pub fn jpeg_with_exif(tiff: &[u8]) -> Vec<u8> {
    let mut out = vec![0xFF, 0xD8, 0xFF, 0xE1];
    let len = (tiff.len() + 8) as u16;
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(tiff);
    out.extend_from_slice(&[0xFF, 0xD9]);
    out
}

/// A JPEG stream with no metadata segments.
pub fn plain_jpeg() -> Vec<u8> {
    vec![0xFF, 0xD8, 0xFF, 0xD9]
}

/// A JPEG dated with `DateTimeOriginal`.
pub fn dated_jpeg(timestamp: &str) -> Vec<u8> {
    jpeg_with_exif(&tiff_with_dates(Some(timestamp), None))
}

/// A 1x1 grayscale PNG, with an `eXIf` chunk when `tiff` is given.
pub fn png_with_exif(tiff: Option<&[u8]>) -> Vec<u8> {
    let mut out = b"\x89PNG\r\n\x1a\n".to_vec();
    // width 1, height 1, depth 8, grayscale, default methods
    png_chunk(&mut out, b"IHDR", &[0, 0, 0, 1, 0, 0, 0, 1, 8, 0, 0, 0, 0]);
    if let Some(tiff) = tiff {
        png_chunk(&mut out, b"eXIf", tiff);
    }
    // zlib stream of one scanline: filter byte 0, pixel 0
    png_chunk(
        &mut out,
        b"IDAT",
        &[0x78, 0x01, 0x01, 0x02, 0x00, 0xFD, 0xFF, 0x00, 0x00, 0x00, 0x02, 0x00, 0x01],
    );
    png_chunk(&mut out, b"IEND", &[]);
    out
}

fn png_chunk(out: &mut Vec<u8>, kind: &[u8; 4], data: &[u8]) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    let start = out.len();
    out.extend_from_slice(kind);
    out.extend_from_slice(data);
    let crc = crc32(&out[start..]);
    out.extend_from_slice(&crc.to_be_bytes());
}

fn crc32(bytes: &[u8]) -> u32 {
    let mut crc = 0xFFFF_FFFFu32;
    for &b in bytes {
        crc ^= b as u32;
        for _ in 0..8 {
            crc = if crc & 1 != 0 { (crc >> 1) ^ 0xEDB8_8320 } else { crc >> 1 };
        }
    }
    !crc
}

#[test]
fn test_crc32_check_value() {
    assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
    assert_eq!(crc32(b"IEND"), 0xAE42_6082);
}
