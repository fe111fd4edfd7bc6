//! File-scheme loading tests for ong-net

use std::fs;

use ong_net::{fetch, NetError, ResourceLoader, Url};

fn site_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("templates")).unwrap();
    fs::write(
        dir.path().join("templates/eventos.html"),
        "<section><h1>Eventos</h1></section>",
    )
    .unwrap();
    dir
}

// ============================================================================
// FILE LOADING
// ============================================================================

#[test]
fn test_fetch_existing_file() {
    let dir = site_dir();
    let loader = ResourceLoader::from_dir(dir.path()).unwrap();

    let response = smol::block_on(loader.fetch("templates/eventos.html")).unwrap();
    assert!(response.ok());
    assert_eq!(response.status, 200);
    assert_eq!(response.content_type, "text/html");
    assert_eq!(response.text().unwrap(), "<section><h1>Eventos</h1></section>");
}

#[test]
fn test_missing_file_is_404_response() {
    let dir = site_dir();
    let loader = ResourceLoader::from_dir(dir.path()).unwrap();

    let response = smol::block_on(loader.fetch("templates/missing.html")).unwrap();
    assert!(!response.ok());
    assert_eq!(response.status, 404);
}

#[test]
fn test_fetch_text_fails_on_404() {
    let dir = site_dir();
    let loader = ResourceLoader::from_dir(dir.path()).unwrap();

    let err = smol::block_on(loader.fetch_text("templates/missing.html")).unwrap_err();
    assert!(matches!(err, NetError::HttpError { status: 404 }));
}

#[test]
fn test_invalid_utf8_body() {
    let dir = site_dir();
    fs::write(dir.path().join("templates/binary.html"), [0xff, 0xfe, 0x00]).unwrap();
    let loader = ResourceLoader::from_dir(dir.path()).unwrap();

    let err = smol::block_on(loader.fetch_text("templates/binary.html")).unwrap_err();
    assert!(matches!(err, NetError::InvalidEncoding(_)));
}

#[test]
fn test_fetch_absolute_file_url() {
    let dir = site_dir();
    let url = Url::from_file_path(dir.path().join("templates/eventos.html")).unwrap();

    let response = smol::block_on(fetch(url.as_str())).unwrap();
    assert!(response.ok());
}

#[test]
fn test_fetch_rejects_garbage_url() {
    let err = smol::block_on(fetch("::nope")).unwrap_err();
    assert!(matches!(err, NetError::InvalidUrl(_)));
}
