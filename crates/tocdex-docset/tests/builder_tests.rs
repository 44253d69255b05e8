//! End-to-end tests for the docset pipeline against a local HTTP server.

use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;
use std::thread;

use tiny_http::{Header, Method, Request, Response, Server};
use tocdex_docset::{
    BuildError, DocsetBuilder, DocsetConfig, PageDescriptor, PageError, PageRole, PageSource,
};
use tocdex_index::{EntryKind, IndexRecord, LockRetryPolicy, ScanError, SqliteIndex};

const PAGE: &str = r##"<html><head>
<link rel="stylesheet" href="/css/styles.css">
<link rel="stylesheet" href="/css/styles.css">
<link rel="stylesheet" href="missing.css">
</head><body>
<div class="toc"><ul>
  <li><a href="#intro">Introduction</a>
    <ul><li><a href="#api">API</a></li></ul>
  </li>
</ul></div>
<p>Body text with <a href="#elsewhere">a link</a>.</p>
</body></html>"##;

const NORMALIZED_MARK: &str = "<!-- normalized -->";

/// Serve a small Kafka-like site until the test process exits.
fn serve_site() -> String {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let _handle = thread::spawn(move || {
        for mut request in server.incoming_requests() {
            let response = route(&mut request);
            let _ = request.respond(response);
        }
    });
    format!("http://{addr}")
}

fn route(request: &mut Request) -> Response<Cursor<Vec<u8>>> {
    let method = request.method().clone();
    let url = request.url().to_string();
    match (method, url.as_str()) {
        (Method::Get, "/082/documentation.html") => Response::from_string(PAGE),
        (Method::Get, "/css/styles.css") => Response::from_string("body { color: black }"),
        (Method::Get, "/082/moved.html") => Response::from_string("moved")
            .with_status_code(302)
            .with_header(Header::from_bytes(&b"Location"[..], &b"/new.html"[..]).unwrap()),
        (Method::Post, "/normalize") => {
            let mut body = String::new();
            let _ = request.as_reader().read_to_string(&mut body).unwrap();
            Response::from_string(format!("{NORMALIZED_MARK}{body}"))
        }
        _ => Response::from_string("not found").with_status_code(404),
    }
}

fn config(base: &str, output: &Path) -> DocsetConfig {
    DocsetConfig {
        base_url: base.to_string(),
        normalizer_url: Some(format!("{base}/normalize")),
        output: output.join("kafka.docset"),
        timeout_secs: 5,
        ..DocsetConfig::default()
    }
}

fn stored_records(builder: &DocsetBuilder) -> Vec<IndexRecord> {
    SqliteIndex::open(builder.layout().index_path(), LockRetryPolicy::default())
        .unwrap()
        .records()
        .unwrap()
}

fn expected_records(page: &str) -> Vec<IndexRecord> {
    vec![
        IndexRecord::new("Introduction", EntryKind::Guide, page, "#intro"),
        IndexRecord::new("API", EntryKind::Section, page, "#api"),
    ]
}

#[test]
fn test_build_fetches_normalizes_and_indexes() {
    let base = serve_site();
    let dir = tempfile::tempdir().unwrap();
    let builder = DocsetBuilder::new(config(&base, dir.path())).unwrap();

    let report = builder.build(PageSource::Remote).unwrap();
    assert!(report.is_clean());
    assert_eq!(report.records_emitted(), 2);
    assert_eq!(report.records_dropped(), 0);
    assert_eq!(stored_records(&builder), expected_records("documentation.html"));

    let layout = builder.layout();
    let local = fs::read_to_string(layout.document_path("documentation.html")).unwrap();
    assert!(local.starts_with(NORMALIZED_MARK));

    let css = layout.documents_dir().join("styles.css");
    assert_eq!(fs::read_to_string(css).unwrap(), "body { color: black }");
    assert!(!layout.documents_dir().join("missing.css").exists());

    let plist = fs::read_to_string(layout.info_plist_path()).unwrap();
    assert!(plist.contains("<string>documentation.html</string>"));
}

#[test]
fn test_building_twice_replaces_records() {
    let base = serve_site();
    let dir = tempfile::tempdir().unwrap();
    let builder = DocsetBuilder::new(config(&base, dir.path())).unwrap();

    let _ = builder.build(PageSource::Remote).unwrap();
    let _ = builder.build(PageSource::Remote).unwrap();
    assert_eq!(stored_records(&builder), expected_records("documentation.html"));
}

#[test]
fn test_redirected_page_is_skipped() {
    let base = serve_site();
    let dir = tempfile::tempdir().unwrap();
    let config = DocsetConfig {
        normalizer_url: None,
        pages: vec![
            PageDescriptor::new("moved.html", PageRole::Guide),
            PageDescriptor::new("documentation.html", PageRole::Root),
        ],
        ..config(&base, dir.path())
    };
    let builder = DocsetBuilder::new(config).unwrap();

    let report = builder.build(PageSource::Remote).unwrap();
    assert!(!report.is_clean());
    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0.path, "moved.html");
    assert!(failures[0].1.is_redirect());
    assert!(!builder.layout().document_path("moved.html").exists());

    // Without a normalizer the raw page is stored.
    let local =
        fs::read_to_string(builder.layout().document_path("documentation.html")).unwrap();
    assert_eq!(local, PAGE);
    assert_eq!(stored_records(&builder), expected_records("documentation.html"));
}

#[test]
fn test_failed_normalization_skips_page() {
    let base = serve_site();
    let dir = tempfile::tempdir().unwrap();
    let config = DocsetConfig {
        normalizer_url: Some(format!("{base}/no-such-service")),
        ..config(&base, dir.path())
    };
    let builder = DocsetBuilder::new(config).unwrap();

    let report = builder.build(PageSource::Remote).unwrap();
    assert!(matches!(
        report.pages[0].result,
        Err(PageError::Normalize(_))
    ));
    assert!(stored_records(&builder).is_empty());
}

#[test]
fn test_rescan_uses_local_copy_only() {
    let dir = tempfile::tempdir().unwrap();
    // Nothing listens here; a rescan must not connect.
    let builder = DocsetBuilder::new(config("http://127.0.0.1:9", dir.path())).unwrap();
    let local = builder.layout().document_path("documentation.html");
    fs::create_dir_all(local.parent().unwrap()).unwrap();
    fs::write(&local, PAGE).unwrap();

    let report = builder.build(PageSource::LocalCopy).unwrap();
    assert!(report.is_clean());
    assert_eq!(stored_records(&builder), expected_records("documentation.html"));
    assert!(!builder.layout().documents_dir().join("styles.css").exists());

    fs::write(
        &local,
        r##"<ul class="toc"><li><a href="#only">Only</a></li></ul>"##,
    )
    .unwrap();
    let _ = builder.build(PageSource::LocalCopy).unwrap();
    assert_eq!(
        stored_records(&builder),
        vec![IndexRecord::new(
            "Only",
            EntryKind::Guide,
            "documentation.html",
            "#only"
        )]
    );
}

#[test]
fn test_rescan_without_local_copy_reports_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let builder = DocsetBuilder::new(config("http://127.0.0.1:9", dir.path())).unwrap();

    let report = builder.build(PageSource::LocalCopy).unwrap();
    assert!(matches!(
        report.pages[0].result,
        Err(PageError::Scan(ScanError::Read { .. }))
    ));
}

#[test]
fn test_dry_run_writes_nothing() {
    let base = serve_site();
    let dir = tempfile::tempdir().unwrap();
    let builder = DocsetBuilder::new(config(&base, dir.path())).unwrap();

    let (report, index) = builder.dry_run(PageSource::Remote).unwrap();
    assert!(report.is_clean());
    assert_eq!(index.records(), expected_records("documentation.html"));
    assert_eq!(report.scans().next().unwrap().stylesheets, 3);
    assert!(!builder.layout().root().exists());
}

#[test]
fn test_unwritable_output_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("kafka.docset");
    fs::write(&blocker, "not a directory").unwrap();

    let builder = DocsetBuilder::new(config("http://127.0.0.1:9", dir.path())).unwrap();
    let err = builder.build(PageSource::LocalCopy).unwrap_err();
    assert!(matches!(err, BuildError::Layout { .. }));
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = DocsetConfig {
        pages: Vec::new(),
        ..DocsetConfig::default()
    };
    assert!(matches!(
        DocsetBuilder::new(config),
        Err(BuildError::Config(_))
    ));
}
