//! Helpers shared by the end-to-end tests: a one-shot HTTP stub and a
//! runner for the built binary.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::Path;
use std::process::{Command, Output, Stdio};
use std::thread::{self, JoinHandle};

pub const BINARY: &str = env!("CARGO_BIN_EXE_http-resource");

/// A server that answers exactly one request and hands back what it received.
pub struct StubServer {
    pub base_url: String,
    handle: JoinHandle<String>,
}

impl StubServer {
    pub fn respond(status_line: &'static str, body: &'static str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_request(&mut stream);
            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
            request
        });
        Self { base_url, handle }
    }

    /// The raw request, head and body.
    pub fn received(self) -> String {
        self.handle.join().unwrap()
    }
}

fn read_request(stream: &mut TcpStream) -> String {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let read = stream.read(&mut chunk).unwrap();
        if read == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..read]);
        let Some(header_end) = buffer.windows(4).position(|window| window == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&buffer[..header_end]).to_ascii_lowercase();
        let content_length = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if buffer.len() >= header_end + 4 + content_length {
            break;
        }
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Run `program` with `args`, feeding `payload` on stdin.
///
/// The environment is inherited minus the variables that change the
/// binary's behavior; `envs` adds them back per test. Logs go to `log_dir`.
pub fn run_program(program: &Path, args: &[&str], payload: &str, log_dir: &Path, envs: &[(&str, &str)]) -> Output {
    let mut command = Command::new(program);
    command
        .args(args)
        .env_remove("RESOURCE_DEBUG")
        .env_remove("TEST")
        .env_remove("RUST_LOG")
        .env_remove("BUILD_ID")
        .env("RESOURCE_LOG_DIR", log_dir)
        .envs(envs.iter().copied())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = command.spawn().unwrap();
    child.stdin.take().unwrap().write_all(payload.as_bytes()).unwrap();
    child.wait_with_output().unwrap()
}

pub fn run(args: &[&str], payload: &str, log_dir: &Path, envs: &[(&str, &str)]) -> Output {
    run_program(Path::new(BINARY), args, payload, log_dir, envs)
}

/// Names of the files in `directory` that start with `prefix`.
pub fn files_with_prefix(directory: &Path, prefix: &str) -> Vec<String> {
    std::fs::read_dir(directory)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with(prefix))
        .collect()
}
