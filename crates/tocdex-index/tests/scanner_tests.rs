//! Integration tests for the page scanner.

use std::fs;

use tocdex_html::{HtmlTokenizer, Token};
use tocdex_index::{
    EntryKind, IndexRecord, IndexSink, MemoryIndex, PageScanner, ScanError, ScanReport,
    Termination, TocMarker,
};

const PAGE: &str = "documentation.html";

/// Scan `html` as [`PAGE`] into a fresh in-memory index.
fn scan(html: &str) -> (ScanReport, Vec<IndexRecord>) {
    let mut index = MemoryIndex::new();
    let report = scan_into(&mut index, html);
    (report, index.into_records())
}

fn scan_into(index: &mut MemoryIndex, html: &str) -> ScanReport {
    PageScanner::default()
        .scan(PAGE, HtmlTokenizer::new(html.to_string()), index, &mut ())
        .expect("memory index never fails")
}

fn record(name: &str, kind: EntryKind, href: &str) -> IndexRecord {
    IndexRecord::new(name, kind, PAGE, href)
}

#[test]
fn test_nested_list_inside_marked_div() {
    let (report, records) = scan(
        r#"<div class="toc"><ul><li><a href="a.html">Intro</a></li><ul><li><a href="b.html">Sub</a></li></ul></ul></div>"#,
    );
    assert_eq!(
        records,
        vec![
            record("Intro", EntryKind::Guide, "a.html"),
            record("Sub", EntryKind::Section, "b.html"),
        ]
    );
    assert_eq!(records[0].path, "documentation.html a.html");
    assert_eq!(report.termination, Termination::TocClosed);
    assert!(report.toc_found);
    assert_eq!(report.records_emitted, 2);
    assert_eq!(report.records_dropped, 0);
}

#[test]
fn test_top_level_links_are_guides_regardless_of_surroundings() {
    let html = r##"<html><head><title>Docs</title></head><body>
        <p>See <a href="#elsewhere">elsewhere</a>.</p>
        <div class="toc"><ul>
          <li><a href="#gettingStarted">Getting Started</a></li>
          <li><a href="#api">API</a></li>
          <li><a href="#configuration">Configuration</a></li>
        </ul></div>
        <a href="#after">After</a>
        </body></html>"##;
    let (report, records) = scan(html);
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.kind == EntryKind::Guide));
    assert_eq!(records[0].name, "Getting Started");
    assert_eq!(records[2].path, "documentation.html #configuration");
    assert_eq!(report.termination, Termination::TocClosed);
}

#[test]
fn test_deeper_levels_are_modules() {
    let html = r##"<ul class="toc">
        <li><a href="#1">One</a>
          <ul>
            <li><a href="#1.1">One.One</a>
              <ul>
                <li><a href="#1.1.1">Deep</a>
                  <ul><li><a href="#1.1.1.1">Deeper</a></li></ul>
                </li>
              </ul>
            </li>
            <li><a href="#1.2">One.Two</a></li>
          </ul>
        </li>
        <li><a href="#2">Two</a></li>
      </ul>"##;
    let (_, records) = scan(html);
    let kinds: Vec<(&str, EntryKind)> = records.iter().map(|r| (r.name.as_str(), r.kind)).collect();
    assert_eq!(
        kinds,
        vec![
            ("One", EntryKind::Guide),
            ("One.One", EntryKind::Section),
            ("Deep", EntryKind::Module),
            ("Deeper", EntryKind::Module),
            ("One.Two", EntryKind::Section),
            ("Two", EntryKind::Guide),
        ]
    );
}

#[test]
fn test_rescanning_replaces_previous_records() {
    let mut index = MemoryIndex::new();
    index
        .insert(&IndexRecord::new("Other", EntryKind::Guide, "other.html", "#x"))
        .unwrap();

    let first = r##"<div class="toc"><ul><li><a href="#a">A</a></li><li><a href="#b">B</a></li></ul></div>"##;
    let second = r##"<div class="toc"><ul><li><a href="#c">C</a></li></ul></div>"##;
    let _ = scan_into(&mut index, first);
    let _ = scan_into(&mut index, second);

    assert_eq!(
        index.records(),
        [
            IndexRecord::new("Other", EntryKind::Guide, "other.html", "#x"),
            record("C", EntryKind::Guide, "#c"),
        ]
    );
}

#[test]
fn test_link_without_href_is_ignored() {
    let (report, records) = scan(
        r##"<div class="toc"><ul><li><a name="anchor">Anchor</a></li><li><a href="#real">Real</a></li></ul></div>"##,
    );
    assert_eq!(records, vec![record("Real", EntryKind::Guide, "#real")]);
    assert_eq!(report.records_dropped, 0);
}

#[test]
fn test_no_marker_yields_nothing() {
    let (report, records) = scan(r##"<ul><li><a href="#a">A</a></li></ul>"##);
    assert!(records.is_empty());
    assert!(!report.toc_found);
    assert_eq!(report.termination, Termination::EndOfStream);
    assert!(!report.is_malformed());
}

#[test]
fn test_error_before_marker_aborts_without_records() {
    let (report, records) = scan(r#"<p>intro</p><div class="toc"#);
    assert!(records.is_empty());
    assert!(report.is_malformed());
    assert!(matches!(
        report.termination,
        Termination::Malformed { depth: 0, .. }
    ));
}

#[test]
fn test_error_inside_toc_keeps_emitted_records() {
    let (report, records) = scan(
        r##"<div class="toc"><ul><li><a href="#a">A</a></li><li><a href="#b"##,
    );
    assert_eq!(records, vec![record("A", EntryKind::Guide, "#a")]);
    assert!(matches!(
        report.termination,
        Termination::Malformed { depth: 3, .. }
    ));
}

#[test]
fn test_stray_end_tag_is_malformed() {
    let (report, records) =
        scan(r##"</div><div class="toc"><ul><li><a href="#a">A</a></li></ul></div>"##);
    assert!(records.is_empty());
    assert!(report.is_malformed());
}

#[test]
fn test_explicit_void_end_tags_are_ignored() {
    let (report, records) = scan(
        r#"<div class="toc"><img src="logo.png"></img><ul><li><a href="a.html">A</a><br></br></li></ul></div>"#,
    );
    assert_eq!(records, vec![record("A", EntryKind::Guide, "a.html")]);
    assert_eq!(report.termination, Termination::TocClosed);

    let (report, records) = scan(
        r##"<head><link rel="stylesheet" href="s.css"></link></head>
        <p><br></br><img src="x.png"></img></p>
        <div class="toc"><ul><li><a href="#b">B</a></li></ul></div>
        <a href="#out">Out</a>"##,
    );
    assert_eq!(records, vec![record("B", EntryKind::Guide, "#b")]);
    assert_eq!(report.termination, Termination::TocClosed);
    assert!(!report.is_malformed());
}

#[test]
fn test_link_followed_by_markup_is_dropped() {
    let (report, records) = scan(
        r##"<div class="toc"><ul>
          <li><a href="#code"><code>Producer</code></a></li>
          <li><a href="#plain">Plain</a></li>
        </ul></div><a href="#after">After</a>"##,
    );
    assert_eq!(records, vec![record("Plain", EntryKind::Guide, "#plain")]);
    assert_eq!(report.records_dropped, 1);
    // The <code> tag after the dropped link still counts toward depth.
    assert_eq!(report.termination, Termination::TocClosed);
}

#[test]
fn test_blank_link_text_is_dropped() {
    let (report, records) = scan(r##"<div class="toc"><a href="#x">   </a></div>"##);
    assert!(records.is_empty());
    assert_eq!(report.records_dropped, 1);
}

#[test]
fn test_names_are_normalized_and_decoded() {
    let (_, records) = scan(
        "<div class=\"toc\"><a href=\"#qa\">\n   Questions &amp;\n   Answers\n</a></div>",
    );
    assert_eq!(records[0].name, "Questions & Answers");
}

#[test]
fn test_links_directly_in_non_list_container_are_guides() {
    let (_, records) = scan(r##"<div class="toc"><p><a href="#a">A</a></p></div>"##);
    assert_eq!(records, vec![record("A", EntryKind::Guide, "#a")]);
}

#[test]
fn test_void_and_self_closing_elements_keep_depth_balanced() {
    let (report, records) = scan(
        r##"<div class="toc"><ul><li><img src="i.png"><br/><a href="#a">A</a><br></li></ul></div><a href="#out">Out</a>"##,
    );
    assert_eq!(records, vec![record("A", EntryKind::Guide, "#a")]);
    assert_eq!(report.termination, Termination::TocClosed);
}

#[test]
fn test_stylesheet_links_are_reported() {
    let html = r##"<html><head>
        <link rel="stylesheet" type="text/css" href="styles.css">
        <link rel="icon" href="favicon.ico"/>
        <link rel="alternate stylesheet" href="/css/alt.css"/>
        <link rel="stylesheet">
        </head><body><div class="toc"><a href="#a">A</a></div></body></html>"##;
    let mut index = MemoryIndex::new();
    let mut stylesheets: Vec<String> = Vec::new();
    let report = PageScanner::default()
        .scan(
            PAGE,
            HtmlTokenizer::new(html.to_string()),
            &mut index,
            &mut stylesheets,
        )
        .unwrap();
    assert_eq!(stylesheets, vec!["styles.css", "/css/alt.css"]);
    assert_eq!(report.stylesheets, 2);
    assert_eq!(index.len(), 1);
}

#[test]
fn test_custom_marker() {
    let scanner = PageScanner::new(TocMarker::new("id", "contents"));
    let mut index = MemoryIndex::new();
    let html = r##"<div class="toc"><a href="#no">No</a></div><ol id="contents"><li><a href="#yes">Yes</a></li></ol>"##;
    let _ = scanner
        .scan(PAGE, HtmlTokenizer::new(html.to_string()), &mut index, &mut ())
        .unwrap();
    assert_eq!(index.records(), [record("Yes", EntryKind::Guide, "#yes")]);
}

#[test]
fn test_stream_without_eof_token_ends_cleanly() {
    let tokens = vec![
        Token::StartTag {
            name: "div".to_string(),
            self_closing: false,
            attributes: vec![tocdex_html::Attribute::new(
                "class".to_string(),
                "toc".to_string(),
            )],
        },
        Token::StartTag {
            name: "a".to_string(),
            self_closing: false,
            attributes: vec![tocdex_html::Attribute::new(
                "href".to_string(),
                "#a".to_string(),
            )],
        },
    ];
    let mut index = MemoryIndex::new();
    let report = PageScanner::default()
        .scan(PAGE, tokens, &mut index, &mut ())
        .unwrap();
    assert_eq!(report.termination, Termination::EndOfStream);
    assert_eq!(report.records_dropped, 1);
    assert!(index.is_empty());
}

#[test]
fn test_scan_file_reads_local_copy() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join(PAGE);
    fs::write(
        &file,
        r##"<div class="toc"><ul><li><a href="#a">A</a></li></ul></div>"##,
    )
    .unwrap();

    let mut index = MemoryIndex::new();
    let report = PageScanner::default()
        .scan_file(PAGE, &file, &mut index, &mut ())
        .unwrap();
    assert_eq!(report.records_emitted, 1);

    let missing = dir.path().join("missing.html");
    let err = PageScanner::default()
        .scan_file(PAGE, &missing, &mut index, &mut ())
        .unwrap_err();
    assert!(matches!(err, ScanError::Read { .. }));
}

#[test]
fn test_records_serialize_for_json_output() {
    let json = serde_json::to_string(&record("Intro", EntryKind::Guide, "a.html")).unwrap();
    assert_eq!(
        json,
        r#"{"name":"Intro","kind":"Guide","path":"documentation.html a.html"}"#
    );
}
