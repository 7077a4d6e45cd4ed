//! Integration tests for the `ask` binary. Uses assert_cmd to run the binary,
//! a real temp config, and in-process servers. No mocks.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::io::{Read as _, Write as _};
use std::net::TcpListener as StdTcpListener;

/// Pick a free port by binding to :0 and extracting the assigned port.
fn free_port() -> u16 {
    let listener = StdTcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

fn write_config(dir: &tempfile::TempDir, transport: &str, url: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.yaml");
    let mut f = std::fs::File::create(&path).unwrap();
    writeln!(f, "endpoint:\n  transport: {}\n  url: {}", transport, url).unwrap();
    path
}

/// Spawn a WebSocket server that waits for one query then replies with
/// STREAM_START, two chunks, and STREAM_END.
fn spawn_ws_server(port: u16) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port))
                .await
                .unwrap();
            let (tcp, _) = listener.accept().await.unwrap();
            let ws = tokio_tungstenite::accept_async(tcp).await.unwrap();

            use futures_util::{SinkExt, StreamExt};
            use tokio_tungstenite::tungstenite::Message;
            let (mut write, mut read) = ws.split();
            let _ = read.next().await;

            for frame in [
                r#"{"type":"stream_start"}"#,
                r#"{"type":"stream_chunk","chunk":"Test "}"#,
                r#"{"type":"stream_chunk","chunk":"answer."}"#,
                r#"{"type":"stream_end","sources":["/docs/a.md"]}"#,
            ] {
                write.send(Message::Text(frame.into())).await.unwrap();
            }

            tokio::time::sleep(std::time::Duration::from_millis(200)).await;
        });
    })
}

/// Spawn a blocking HTTP server answering one request with `body`.
fn spawn_http_server(listener: StdTcpListener, body: &'static str) -> std::thread::JoinHandle<String> {
    std::thread::spawn(move || {
        let (mut tcp, _) = listener.accept().unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = tcp.read(&mut chunk).unwrap();
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf);
            if let Some((head, rest)) = text.split_once("\r\n\r\n") {
                let wanted = head
                    .lines()
                    .filter_map(|l| l.split_once(':'))
                    .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, v)| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if rest.len() >= wanted || n == 0 {
                    break;
                }
            } else if n == 0 {
                break;
            }
        }
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        tcp.write_all(response.as_bytes()).unwrap();
        String::from_utf8_lossy(&buf).to_string()
    })
}

#[test]
fn ask_prints_streamed_answer() {
    let port = free_port();
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_config(&dir, "websocket", &format!("ws://127.0.0.1:{}", port));

    let _server = spawn_ws_server(port);
    std::thread::sleep(std::time::Duration::from_millis(100));

    let mut cmd = Command::from(cargo_bin_cmd!("ask"));
    cmd.arg("--config")
        .arg(&config_path)
        .write_stdin("What is the answer?\n");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Test answer."));
}

#[test]
fn ask_with_config_env_var() {
    let port = free_port();
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_config(&dir, "websocket", &format!("ws://127.0.0.1:{}", port));

    let _server = spawn_ws_server(port);
    std::thread::sleep(std::time::Duration::from_millis(100));

    let mut cmd = Command::from(cargo_bin_cmd!("ask"));
    cmd.env("ASK_CONFIG", &config_path)
        .write_stdin("What is the answer?\n");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Test answer."));
}

#[test]
fn ask_over_http_with_positional_question() {
    let listener = StdTcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_config(
        &dir,
        "http",
        &format!("http://127.0.0.1:{}/api/question", port),
    );

    let server = spawn_http_server(listener, r#"{"data":"Over HTTP."}"#);

    let mut cmd = Command::from(cargo_bin_cmd!("ask"));
    cmd.arg("--config")
        .arg(&config_path)
        .arg("What is the answer?");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Over HTTP."));

    let request = server.join().unwrap();
    assert!(request.starts_with("POST /api/question"), "got: {request}");
    assert!(request.contains(r#"{"question":"What is the answer?"}"#), "got: {request}");
}

#[test]
fn ask_server_down_shows_error() {
    let port = free_port();
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_config(&dir, "websocket", &format!("ws://127.0.0.1:{}", port));

    let mut cmd = Command::from(cargo_bin_cmd!("ask"));
    cmd.arg("--config")
        .arg(&config_path)
        .write_stdin("hello\n");

    cmd.assert()
        .failure()
        .stderr(predicate::str::is_match("(?i)(connect|error|refused)").unwrap());
}
