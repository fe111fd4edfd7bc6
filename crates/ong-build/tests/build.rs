//! Builder tests against a site on disk

use std::fs;
use std::path::Path;

use ong_build::{BuildError, Builder};
use tempfile::TempDir;

const INDEX: &str = r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
    <meta charset="UTF-8">
    <title>ONG Connect</title>
    <!-- estilos -->
    <style>
        body {
            margin: 0px;
        }
    </style>
</head>
<body>
    <main   id="app">
        <p class="lead">  Transformando   vidas  </p>
    </main>
    <script>
        var totalCount = 1 + 2;
        window.total = totalCount;
    </script>
</body>
</html>
"#;

fn write(root: &Path, path: &str, contents: &[u8]) {
    let full = root.join(path);
    fs::create_dir_all(full.parent().unwrap()).unwrap();
    fs::write(full, contents).unwrap();
}

fn site() -> TempDir {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("src");
    write(&src, "index.html", INDEX.as_bytes());
    write(&src, "css/style.css", b"body {\n  color: #ff0000;\n}\n");
    write(
        &src,
        "js/app.js",
        b"// entrada\nfunction start(appName) {\n  return 'ONG ' + appName;\n}\nwindow.start = start;\n",
    );
    write(&src, "img/logo.png", b"not really a png");
    write(&src, "img/projetos/horta.jpg", b"jpeg bytes");
    write(&src, "favicon.ico", b"ico");
    dir
}

// ============================================================================
// FULL BUILD
// ============================================================================

#[test]
fn test_build_minifies_site() {
    let dir = site();
    let dist = dir.path().join("dist");
    let report = Builder::new(dir.path().join("src"), &dist).run().unwrap();

    assert_eq!(report.html.len(), 1);
    assert_eq!(report.css.len(), 1);
    assert_eq!(report.js.len(), 1);
    assert_eq!(report.images, 2);
    assert!(report.favicon);

    let html = fs::read_to_string(dist.join("index.html")).unwrap();
    assert!(html.starts_with("<!doctype html>"));
    assert!(!html.contains("estilos"));
    assert!(html.contains("<main id=app>"));
    assert!(html.contains("class=lead"));
    assert!(html.contains("body{margin:0}"));
    assert!(!html.contains("1 + 2"));
    assert!(html.len() < INDEX.len());

    let css = fs::read_to_string(dist.join("css/style.css")).unwrap();
    assert_eq!(css, "body{color:red}");

    let js = fs::read_to_string(dist.join("js/app.js")).unwrap();
    assert!(!js.contains("entrada"));
    assert!(!js.contains("appName"));

    assert_eq!(fs::read(dist.join("img/projetos/horta.jpg")).unwrap(), b"jpeg bytes");
    assert_eq!(fs::read(dist.join("favicon.ico")).unwrap(), b"ico");
}

#[test]
fn test_build_cleans_previous_output() {
    let dir = site();
    let dist = dir.path().join("dist");
    write(&dist, "stale.txt", b"old");

    Builder::new(dir.path().join("src"), &dist).run().unwrap();
    assert!(!dist.join("stale.txt").exists());
}

#[test]
fn test_missing_optional_dirs_are_skipped() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("src");
    write(&src, "index.html", b"<p>oi</p>");

    let report = Builder::new(&src, dir.path().join("dist")).run().unwrap();
    assert_eq!(report.html.len(), 1);
    assert!(report.css.is_empty());
    assert!(report.js.is_empty());
    assert_eq!(report.images, 0);
    assert!(!report.favicon);
}

// ============================================================================
// FAILURES
// ============================================================================

#[test]
fn test_invalid_css_fails_build() {
    let dir = site();
    write(&dir.path().join("src"), "css/broken.css", b"..broken { color: red }");

    let err = Builder::new(dir.path().join("src"), dir.path().join("dist"))
        .run()
        .unwrap_err();
    assert!(matches!(err, BuildError::Css(_)));
}

#[test]
fn test_invalid_js_fails_build() {
    let dir = site();
    write(&dir.path().join("src"), "js/broken.js", b"function (");

    let err = Builder::new(dir.path().join("src"), dir.path().join("dist"))
        .run()
        .unwrap_err();
    assert!(matches!(err, BuildError::JsParse { ref file, .. } if file == "broken.js"));
}

#[test]
fn test_missing_source_dir_fails() {
    let dir = TempDir::new().unwrap();
    let err = Builder::new(dir.path().join("nope"), dir.path().join("dist"))
        .run()
        .unwrap_err();
    assert!(matches!(err, BuildError::Io { .. }));
}
