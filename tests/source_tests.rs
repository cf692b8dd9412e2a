use std::io::Write;
use std::path::Path;

use produce_analyzer::source::{
    error::SelectionError,
    selector::{
        data_uri, detect_media_type, is_image_media_type, is_image_url, load_image_file,
        select_file, select_url,
    },
    source_model::{AnalysisRequest, ImageFile, Preview, SourceKind},
};

use crate::common::fixtures::{APPLE_URL, PNG_BYTES, png_file};

mod common;

// ============================================================================
// URL validation
// ============================================================================

#[test]
fn accepts_direct_image_links() {
    for url in [
        "https://example.com/apple.jpg",
        "http://example.com/a/b/banana.JPEG",
        "https://cdn.example.org/img.png",
        "HTTPS://EXAMPLE.COM/PEAR.WEBP",
        "http://x.io/carrot.bmp",
        "https://x.io/anim.gif",
    ] {
        assert!(is_image_url(url), "{} should be accepted", url);
    }
}

#[test]
fn rejects_non_image_links() {
    for url in [
        "ftp://example.com/apple.jpg",
        "https://example.com/apple.jpg?size=large",
        "https://example.com/apple.svg",
        "example.com/apple.jpg",
        "https://.jpg",
        "not a url",
        "https://example.com/page.html",
    ] {
        assert!(!is_image_url(url), "{} should be rejected", url);
    }
}

#[test]
fn select_url_uses_url_as_preview() {
    let selection = select_url(APPLE_URL).unwrap();
    assert_eq!(selection.request, AnalysisRequest::Url(APPLE_URL.into()));
    assert_eq!(selection.preview, Preview::RemoteUrl(APPLE_URL.into()));
    assert_eq!(selection.request.kind(), SourceKind::Url);
}

#[test]
fn select_url_trims_whitespace() {
    let selection = select_url(&format!("  {}\n", APPLE_URL)).unwrap();
    assert_eq!(selection.preview.as_str(), APPLE_URL);
}

#[test]
fn blank_url_is_nothing_selected() {
    assert!(matches!(select_url(""), Err(SelectionError::NothingSelected)));
    assert!(matches!(select_url("   "), Err(SelectionError::NothingSelected)));
}

#[test]
fn malformed_url_is_invalid_url() {
    match select_url("https://example.com/apple") {
        Err(SelectionError::InvalidUrl { url }) => assert_eq!(url, "https://example.com/apple"),
        other => panic!("expected InvalidUrl, got {:?}", other),
    }
}

// ============================================================================
// File validation
// ============================================================================

#[test]
fn media_type_must_be_image() {
    assert!(is_image_media_type("image/png"));
    assert!(is_image_media_type("IMAGE/JPEG"));
    assert!(!is_image_media_type("image/"));
    assert!(!is_image_media_type("application/pdf"));
    assert!(!is_image_media_type("text/plain"));
    assert!(!is_image_media_type(""));
}

#[test]
fn select_file_builds_data_uri_preview() {
    let selection = select_file(png_file()).unwrap();

    match &selection.preview {
        Preview::DataUri(uri) => {
            assert!(uri.starts_with("data:image/png;base64,"));
            assert!(uri.len() > "data:image/png;base64,".len());
        }
        other => panic!("expected data URI preview, got {:?}", other),
    }
    assert!(!selection.preview.is_empty());
    assert_eq!(selection.request.kind(), SourceKind::File);
}

#[test]
fn select_file_rejects_non_images() {
    let pdf = ImageFile::new("report.pdf", "application/pdf", b"%PDF-1.7".to_vec());
    match select_file(pdf) {
        Err(SelectionError::InvalidFileType { media_type }) => {
            assert_eq!(media_type, "application/pdf")
        }
        other => panic!("expected InvalidFileType, got {:?}", other),
    }
}

#[test]
fn empty_file_is_nothing_selected() {
    let empty = ImageFile::new("empty.png", "image/png", Vec::new());
    assert!(matches!(select_file(empty), Err(SelectionError::NothingSelected)));
}

#[test]
fn data_uri_encodes_base64() {
    assert_eq!(data_uri("image/gif", b"GIF"), "data:image/gif;base64,R0lG");
}

#[test]
fn error_titles_match_notifications() {
    assert_eq!(SelectionError::NothingSelected.title(), "No image selected");
    assert_eq!(
        SelectionError::InvalidFileType { media_type: "text/plain".into() }.title(),
        "Invalid file type"
    );
    assert_eq!(SelectionError::InvalidUrl { url: "x".into() }.title(), "Invalid URL");
}

// ============================================================================
// Fingerprints
// ============================================================================

#[test]
fn fingerprint_is_stable_and_source_specific() {
    let a = AnalysisRequest::Url(APPLE_URL.into());
    let b = AnalysisRequest::Url(APPLE_URL.into());
    let c = AnalysisRequest::File(png_file());

    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_ne!(a.fingerprint(), c.fingerprint());
    assert_eq!(a.fingerprint().len(), 40);
}

// ============================================================================
// Loading from disk
// ============================================================================

#[test]
fn detects_media_type_from_content_before_extension() {
    assert_eq!(detect_media_type(Path::new("photo.jpg"), PNG_BYTES), "image/png");
    assert_eq!(detect_media_type(Path::new("photo.webp"), b"????"), "image/webp");
    assert_eq!(
        detect_media_type(Path::new("mystery"), b"????"),
        "application/octet-stream"
    );
}

#[tokio::test]
async fn load_image_file_reads_bytes_and_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("apple.png");
    std::fs::File::create(&path).unwrap().write_all(PNG_BYTES).unwrap();

    let file = load_image_file(&path).await.unwrap();
    assert_eq!(file.name, "apple.png");
    assert_eq!(file.media_type, "image/png");
    assert_eq!(file.bytes, PNG_BYTES);
    assert!(select_file(file).is_ok());
}

#[tokio::test]
async fn load_image_file_reports_missing_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.png");

    match load_image_file(&path).await {
        Err(SelectionError::Read { path: p, .. }) => assert!(p.ends_with("missing.png")),
        other => panic!("expected Read error, got {:?}", other),
    }
}
