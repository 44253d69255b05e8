//! Integration tests for the blocking HTTP client against a local server.

use std::io::Read;
use std::thread;

use tiny_http::{Header, Method, Response, Server};
use tocdex_common::{FetchError, HttpClient};

/// Serve `count` requests on a background thread, answering each with `handler`.
fn serve<F>(count: usize, handler: F) -> String
where
    F: Fn(&mut tiny_http::Request) -> Response<std::io::Cursor<Vec<u8>>> + Send + 'static,
{
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let _handle = thread::spawn(move || {
        for _ in 0..count {
            let Ok(mut request) = server.recv() else {
                return;
            };
            let response = handler(&mut request);
            request.respond(response).unwrap();
        }
    });
    format!("http://{addr}")
}

#[test]
fn get_returns_body_bytes() {
    let base = serve(1, |_| Response::from_string("<html></html>"));
    let client = HttpClient::new().unwrap();
    let body = client.get_bytes(&format!("{base}/page.html")).unwrap();
    assert_eq!(body, b"<html></html>");
}

#[test]
fn redirects_are_not_followed() {
    let base = serve(1, |_| {
        Response::from_string("moved")
            .with_status_code(301)
            .with_header(Header::from_bytes(&b"Location"[..], &b"/elsewhere.html"[..]).unwrap())
    });
    let client = HttpClient::new().unwrap();
    let err = client.get_bytes(&format!("{base}/old.html")).unwrap_err();
    assert!(err.is_redirect());
    match err {
        FetchError::Redirected { location, .. } => {
            assert_eq!(location.as_deref(), Some("/elsewhere.html"));
        }
        other => panic!("expected redirect, got {other}"),
    }
}

#[test]
fn error_status_is_reported() {
    let base = serve(1, |_| Response::from_string("nope").with_status_code(404));
    let client = HttpClient::new().unwrap();
    let err = client.get_bytes(&format!("{base}/missing.html")).unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 404, .. }));
}

#[test]
fn post_sends_html_content_type_and_body() {
    let base = serve(1, |request| {
        assert_eq!(*request.method(), Method::Post);
        let content_type = request
            .headers()
            .iter()
            .find(|h| h.field.equiv("Content-Type"))
            .map(|h| h.value.as_str().to_string());
        assert_eq!(content_type.as_deref(), Some("text/html"));

        let mut body = String::new();
        let _ = request.as_reader().read_to_string(&mut body).unwrap();
        Response::from_string(body.to_uppercase())
    });
    let client = HttpClient::new().unwrap();
    let body = client
        .post_html(&format!("{base}/normalize"), b"<p>hi</p>".to_vec())
        .unwrap();
    assert_eq!(body, b"<P>HI</P>");
}

#[test]
fn connection_failure_is_a_request_error() {
    // Bind then drop a server so the port is (almost certainly) closed.
    let addr = {
        let server = Server::http("127.0.0.1:0").unwrap();
        server.server_addr().to_ip().unwrap()
    };
    let client = HttpClient::new().unwrap();
    let err = client.get_bytes(&format!("http://{addr}/")).unwrap_err();
    assert!(matches!(err, FetchError::Request { .. }));
}
