/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::broadcast;

use swan_vici::ViciError;
use swanweb::backend::{ChildSaControl, CommandError, ControlError, StatusSource};
use swanweb::config::ServerConfig;
use swanweb::serve::{ApiHandler, HttpServer};

const LIST_SAS: &str = "\
gw-gw: #1, ESTABLISHED, IKEv2, 0a8c9e7f6b5d4c3b_i* 1f2e3d4c5b6a7980_r
  office: #2, reqid 2, INSTALLED, TUNNEL, ESP:AES_GCM_16-256
    in  cb1d2e3f,  52,000 bytes,   400 packets
    out c0a0b0c0,   9,100 bytes,    70 packets
";

struct FixedSource;

impl StatusSource for FixedSource {
    async fn list_conns(&self) -> Result<String, CommandError> {
        Ok("gw-gw: IKEv2\n  office: TUNNEL, rekeying every 3600s\n".to_string())
    }

    async fn list_sas(&self) -> Result<String, CommandError> {
        Ok(LIST_SAS.to_string())
    }
}

struct OnlyOffice;

impl ChildSaControl for OnlyOffice {
    async fn initiate(&self, name: &str) -> Result<(), ControlError> {
        if name == "office" {
            Ok(())
        } else {
            Err(ControlError::Vici(ViciError::CommandFailed(format!(
                "CHILD_SA config '{name}' not found"
            ))))
        }
    }

    async fn terminate(&self, _name: &str) -> Result<(), ControlError> {
        Ok(())
    }
}

struct TestServer {
    addr: SocketAddr,
    quit: broadcast::Sender<()>,
    static_dir: PathBuf,
}

impl TestServer {
    async fn start(tag: &str) -> Self {
        let static_dir = std::env::temp_dir().join(format!(
            "swanweb-http-{tag}-{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&static_dir).unwrap();
        std::fs::write(static_dir.join("index.html"), "<h1>swanweb</h1>").unwrap();

        let config = ServerConfig {
            listen: "127.0.0.1:0".parse().unwrap(),
            static_dir: static_dir.clone(),
            header_max_size: 1024,
            recv_timeout: Duration::from_millis(500),
        };
        let server = Arc::new(HttpServer::new(
            config,
            ApiHandler::new(FixedSource, OnlyOffice),
        ));
        let listener = server.bind().await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (quit, quit_receiver) = broadcast::channel(1);
        tokio::spawn(server.run(listener, quit_receiver));
        TestServer {
            addr,
            quit,
            static_dir,
        }
    }

    async fn send(&self, request: &[u8]) -> String {
        let mut stream = TcpStream::connect(self.addr).await.unwrap();
        stream.write_all(request).await.unwrap();
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).await.unwrap();
        String::from_utf8(buf).unwrap()
    }

    async fn get(&self, target: &str) -> String {
        self.send(format!("GET {target} HTTP/1.1\r\nHost: localhost\r\n\r\n").as_bytes())
            .await
    }

    fn stop(self) {
        let _ = self.quit.send(());
        let _ = std::fs::remove_dir_all(&self.static_dir);
    }
}

fn split_response(rsp: &str) -> (&str, &str) {
    rsp.split_once("\r\n\r\n").unwrap()
}

#[tokio::test]
async fn status_json() {
    let server = TestServer::start("status").await;
    let rsp = server.get("/status_json").await;
    let (head, body) = split_response(&rsp);
    assert!(head.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(head.contains("Content-Type: application/json\r\n"));
    assert!(head.contains("Connection: close"));
    let v: serde_json::Value = serde_json::from_str(body).unwrap();
    assert_eq!(
        v,
        serde_json::json!({
            "office": {
                "active": true,
                "in_bytes": 52000,
                "out_bytes": 9100,
                "in_pkts": 400,
                "out_pkts": 70,
            }
        })
    );
    server.stop();
}

#[tokio::test]
async fn listings() {
    let server = TestServer::start("listings").await;

    let rsp = server.get("/children_json").await;
    assert_eq!(split_response(&rsp).1, "[\"office\"]\n");

    let rsp = server.get("/active_children_json").await;
    assert_eq!(split_response(&rsp).1, "[\"office\"]\n");

    let rsp = server.get("/status_txt").await;
    let (head, body) = split_response(&rsp);
    assert!(head.contains("Content-Type: text/plain; charset=utf-8\r\n"));
    assert_eq!(body, LIST_SAS);

    server.stop();
}

#[tokio::test]
async fn control() {
    let server = TestServer::start("control").await;

    let rsp = server.get("/initiate?name=office").await;
    assert!(rsp.starts_with("HTTP/1.1 200 OK\r\n"));
    assert_eq!(split_response(&rsp).1, "ok\n");

    let rsp = server
        .send(b"POST /terminate?name=office HTTP/1.1\r\nContent-Length: 0\r\n\r\n")
        .await;
    assert_eq!(split_response(&rsp).1, "ok\n");

    let rsp = server.get("/initiate?name=lab").await;
    assert!(rsp.starts_with("HTTP/1.1 500 Internal Server Error\r\n"));
    assert_eq!(
        split_response(&rsp).1,
        "initiate failed: CHILD_SA config 'lab' not found\n"
    );

    let rsp = server.get("/terminate").await;
    assert!(rsp.starts_with("HTTP/1.1 400 Bad Request\r\n"));
    assert_eq!(split_response(&rsp).1, "missing query parameter: name\n");

    server.stop();
}

#[tokio::test]
async fn static_files() {
    let server = TestServer::start("static").await;

    let rsp = server.get("/").await;
    let (head, body) = split_response(&rsp);
    assert!(head.contains("Content-Type: text/html; charset=utf-8\r\n"));
    assert_eq!(body, "<h1>swanweb</h1>");

    let rsp = server
        .send(b"HEAD /index.html HTTP/1.1\r\nHost: localhost\r\n\r\n")
        .await;
    let (head, body) = split_response(&rsp);
    assert!(head.contains("Content-Length: 16\r\n"));
    assert!(body.is_empty());

    let rsp = server.get("/../../etc/passwd").await;
    assert!(rsp.starts_with("HTTP/1.1 404 Not Found\r\n"));

    let rsp = server.send(b"DELETE / HTTP/1.1\r\n\r\n").await;
    assert!(rsp.starts_with("HTTP/1.1 405 Method Not Allowed\r\n"));

    server.stop();
}

#[tokio::test]
async fn bad_requests() {
    let server = TestServer::start("bad").await;

    let rsp = server.send(b"GARBAGE\r\n\r\n").await;
    assert!(rsp.starts_with("HTTP/1.1 400 Bad Request\r\n"));

    // exactly the size limit, without a line end
    let long = format!("GET /{}", "a".repeat(1019));
    assert_eq!(long.len(), 1024);
    let rsp = server.send(long.as_bytes()).await;
    assert!(rsp.starts_with("HTTP/1.1 431 "));

    server.stop();
}
