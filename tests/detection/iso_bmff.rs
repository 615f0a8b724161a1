//! ISO base media `ftyp` brand classification.

use crate::common::{classify_bytes, pair};
use mimeprobe::detectors::media::{classify_brand, iso_brand};
use mimeprobe::ByteWindow;

fn ftyp(brand: &[u8]) -> Vec<u8> {
    let mut data = vec![0x00, 0x00, 0x00, 0x20];
    data.extend_from_slice(b"ftyp");
    data.extend_from_slice(brand);
    data.extend_from_slice(&[0x00, 0x00, 0x02, 0x00]);
    data.extend_from_slice(b"isomiso2mp41");
    data
}

#[test]
fn test_audio_brands() {
    assert_eq!(classify_bytes(&ftyp(b"M4A\x00")), pair("m4a", "audio/x-m4a"));
    assert_eq!(classify_bytes(&ftyp(b"M4A ")), pair("m4a", "audio/x-m4a"));
    assert_eq!(classify_bytes(&ftyp(b"M4B ")), pair("m4b", "audio/mp4"));
    assert_eq!(classify_bytes(&ftyp(b"F4A ")), pair("f4a", "audio/mp4"));
}

#[test]
fn test_mobile_brands() {
    assert_eq!(classify_bytes(&ftyp(b"3g2a")), pair("3g2", "video/3gpp2"));
    assert_eq!(classify_bytes(&ftyp(b"3gp5")), pair("3gp", "video/3gpp"));
}

#[test]
fn test_quicktime_brand() {
    assert_eq!(classify_bytes(&ftyp(b"qt  ")), pair("mov", "video/quicktime"));
}

#[test]
fn test_brand_is_normalized() {
    let window = ByteWindow::from_bytes(ftyp(b"m4v\x00"), 64).unwrap();
    assert_eq!(iso_brand(&window).as_deref(), Some("M4V"));
    assert_eq!(classify_brand("M4V").unwrap().extension(), "m4v");
}

#[test]
fn test_blank_brand_leaves_no_match() {
    let window = ByteWindow::from_bytes(ftyp(b"\x00\x00\x00\x00"), 64).unwrap();
    assert!(iso_brand(&window)
        .and_then(|brand| classify_brand(&brand))
        .is_none());
}

#[test]
fn test_truncated_brand_is_absorbed() {
    let window = ByteWindow::from_bytes(b"\x00\x00\x00\x20ftypM4".to_vec(), 64).unwrap();
    assert!(iso_brand(&window).is_none());
}

#[test]
fn test_generic_mp4_falls_through_to_box_scan() {
    assert_eq!(classify_bytes(&ftyp(b"isom")), pair("mp4", "video/mp4"));
}
