//! `test functional` against local canned servers.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;

use crate::support::*;

/// Serve one canned HTTP response on a local port, returning `host:port`.
fn serve_once(status_line: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf);
            let body = r#"{"status":"up"}"#;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });
    addr.to_string()
}

#[test]
fn test_functional_all_hosts_ok() {
    let t = Test::with_app("web", &[], "1.0.0", "");
    let a = serve_once("200 OK");
    let b = serve_once("200 OK");

    let output = t
        .cmd()
        .args(["test", "functional", "-d"])
        .arg(t.app_dir())
        .args(["-u", &a, "-u", &b, "-e", "health"])
        .output()
        .unwrap();

    assert_success(&output);
    assert_stdout_contains(&output, "2 host(s) answered health");
}

#[test]
fn test_functional_reports_failed_host() {
    let t = Test::with_app("web", &[], "1.0.0", "");
    let good = serve_once("200 OK");
    let bad = serve_once("500 Internal Server Error");

    let output = t
        .cmd()
        .args(["test", "functional", "-d"])
        .arg(t.app_dir())
        .args(["-u", &good, "-u", &bad, "-e", "health"])
        .output()
        .unwrap();

    assert_failure(&output);
    assert_stderr_contains(&output, &format!("failed to test the following hosts: {}", bad));
}
