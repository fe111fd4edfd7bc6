//! Stylesheet minification tests

use ong_css::{minify, CssError, CssMinifier};

const SITE_CSS: &str = r#"
/* Navigation */
.nav-menu {
    display: flex;
    gap: 1rem;
}

@media (max-width: 768px) {
    .nav-menu {
        display: none;
    }
}

@keyframes ripple-animation {
    to {
        transform: scale(4);
        opacity: 0;
    }
}

.contrast-enhanced body {
    background: #000000;
    color: #ffffff;
}
"#;

// ============================================================================
// MINIFICATION
// ============================================================================

#[test]
fn test_minify_site_stylesheet() {
    let out = minify(SITE_CSS).unwrap();
    assert!(out.len() < SITE_CSS.len());
    assert!(!out.contains("Navigation"));
    assert!(!out.contains('\n'));
    assert!(out.contains(".nav-menu{display:flex;gap:1rem}"));
    assert!(out.contains(".nav-menu{display:none}"));
    assert!(out.contains("@keyframes ripple-animation"));
    assert!(out.contains(".contrast-enhanced body{"));
}

#[test]
fn test_minify_empty() {
    assert_eq!(minify("").unwrap(), "");
    assert_eq!(minify("/* only a comment */").unwrap(), "");
}

#[test]
fn test_minify_is_stable() {
    let once = minify(SITE_CSS).unwrap();
    let twice = minify(&once).unwrap();
    assert_eq!(once, twice);
}

// ============================================================================
// ERRORS
// ============================================================================

#[test]
fn test_error_names_file() {
    let err = CssMinifier::new()
        .with_filename("css/broken.css")
        .minify(".ok { color: red }\n..broken { color: blue }")
        .unwrap_err();
    assert!(matches!(err, CssError::ParseError { line: 2, .. }));
    assert!(err.to_string().contains("css/broken.css"));
}
