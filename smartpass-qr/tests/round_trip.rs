// smartpass-qr/tests/round_trip.rs
// Scan the rendered PNG with an independent decoder

use percent_encoding::percent_decode_str;
use smartpass_qr::{HexColor, QrError, QrImage, QrOptions, VerificationUrl, encode, regenerate};

const ORIGIN: &str = "https://smartpass.example";

fn scan(image: &QrImage) -> String {
    let decoded = image::load_from_memory(image.png_bytes()).unwrap().to_luma8();
    let (w, h) = decoded.dimensions();
    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(w as usize, h as usize, |x, y| {
        decoded.get_pixel(x as u32, y as u32).0[0]
    });
    let grids = prepared.detect_grids();
    assert_eq!(grids.len(), 1, "expected exactly one symbol");
    let (_meta, content) = grids[0].decode().unwrap();
    content
}

#[test]
fn test_creation_scenario() {
    let image = encode("SP000123", ORIGIN, &QrOptions::default()).unwrap();
    assert_eq!(scan(&image), "https://smartpass.example/p/SP000123");
}

#[test]
fn test_special_characters_scenario() {
    let image = encode("SP 123/X", ORIGIN, &QrOptions::default()).unwrap();
    let scanned = scan(&image);
    assert_eq!(scanned, "https://smartpass.example/p/SP%20123%2FX");

    let segment = scanned.rsplit('/').next().unwrap();
    let recovered = percent_decode_str(segment).decode_utf8().unwrap();
    assert_eq!(recovered, "SP 123/X");

    let url = VerificationUrl::new(ORIGIN).unwrap();
    assert_eq!(url.identifier_from_url(&scanned).unwrap(), "SP 123/X");
}

#[test]
fn test_distinct_identifiers_scan_differently() {
    let opts = QrOptions::default();
    let ids = ["SP 1", "SP%201", "SP/1", "SP?1", "SP#1", "SP+1", "SP1"];
    let scanned: Vec<String> = ids
        .iter()
        .map(|id| scan(&encode(id, ORIGIN, &opts).unwrap()))
        .collect();

    for (i, a) in scanned.iter().enumerate() {
        for b in &scanned[i + 1..] {
            assert_ne!(a, b);
        }
    }

    let url = VerificationUrl::new(ORIGIN).unwrap();
    for (id, s) in ids.iter().zip(&scanned) {
        assert_eq!(&url.identifier_from_url(s).unwrap(), id);
    }
}

#[test]
fn test_empty_identifier_rejected() {
    let err = encode("", ORIGIN, &QrOptions::default()).unwrap_err();
    assert!(matches!(err, QrError::InvalidIdentifier(_)));
}

#[test]
fn test_oversized_options_rejected_without_rendering() {
    for opts in [
        QrOptions::default().with_pixel_width(u32::MAX),
        QrOptions::default().with_margin(u32::MAX),
    ] {
        let err = encode("SP1", ORIGIN, &opts).unwrap_err();
        assert!(matches!(err, QrError::InvalidOptions(_)), "{err}");
    }
}

#[test]
fn test_regeneration_is_idempotent() {
    let opts = QrOptions::default();
    let first = regenerate("SP000123", ORIGIN, &opts).unwrap();
    let second = regenerate("SP000123", ORIGIN, &opts).unwrap();
    assert_eq!(scan(&first), scan(&second));
    assert_eq!(first.png_bytes(), second.png_bytes());
}

#[test]
fn test_custom_look_still_scans() {
    let opts = QrOptions::default()
        .with_pixel_width(300)
        .with_margin(4)
        .with_colors(HexColor::rgb(0, 0, 0), HexColor::rgb(0xff, 0xff, 0xff));
    let image = encode("employee-42", "http://localhost:3000", &opts).unwrap();
    assert_eq!(image.width(), 300);
    assert_eq!(scan(&image), "http://localhost:3000/p/employee-42");
}

#[test]
fn test_origin_change_keeps_identifier() {
    let opts = QrOptions::default();
    let staging = scan(&encode("SP000123", "https://staging.smartpass.example", &opts).unwrap());
    let prod = scan(&encode("SP000123", ORIGIN, &opts).unwrap());
    assert_ne!(staging, prod);
    assert!(staging.ends_with("/p/SP000123"));
    assert!(prod.ends_with("/p/SP000123"));
}
