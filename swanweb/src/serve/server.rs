/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::anyhow;
use http::{Method, StatusCode};
use log::{debug, info, warn};
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;

use super::{ApiHandler, HttpRequest, HttpResponse, StaticFiles};
use crate::backend::{ChildSaControl, StatusSource};
use crate::config::ServerConfig;

pub struct HttpServer<S, C> {
    config: ServerConfig,
    api: ApiHandler<S, C>,
    files: StaticFiles,
}

impl<S, C> HttpServer<S, C>
where
    S: StatusSource + 'static,
    C: ChildSaControl + 'static,
{
    pub fn new(config: ServerConfig, api: ApiHandler<S, C>) -> Self {
        let files = StaticFiles::new(config.static_dir.clone());
        HttpServer { config, api, files }
    }

    pub async fn bind(&self) -> anyhow::Result<TcpListener> {
        TcpListener::bind(self.config.listen)
            .await
            .map_err(|e| anyhow!("failed to listen on {}: {e}", self.config.listen))
    }

    async fn respond(&self, req: &HttpRequest) -> HttpResponse {
        if let Some(rsp) = self.api.handle(req).await {
            return rsp;
        }
        self.files.serve(req).await
    }

    async fn run_task(&self, mut stream: TcpStream, peer_addr: SocketAddr) {
        let (r, mut w) = stream.split();
        let mut reader = BufReader::new(r);

        let parse = HttpRequest::parse(&mut reader, self.config.header_max_size);
        let req = match tokio::time::timeout(self.config.recv_timeout, parse).await {
            Ok(Ok(req)) => req,
            Ok(Err(e)) => {
                debug!("invalid request from {peer_addr}: {e}");
                if let Some(status) = e.status_code() {
                    let rsp = HttpResponse::status_only(status);
                    if rsp.write_to(&mut w, false).await.is_ok() {
                        info!("- - {} {peer_addr}", status.as_u16());
                    }
                }
                return;
            }
            Err(_) => {
                debug!("timed out receiving request from {peer_addr}");
                let _ = HttpResponse::status_only(StatusCode::REQUEST_TIMEOUT)
                    .write_to(&mut w, false)
                    .await;
                return;
            }
        };

        let rsp = self.respond(&req).await;
        info!(
            "{} {} {} {peer_addr}",
            req.method,
            req.path(),
            rsp.status().as_u16()
        );
        if let Err(e) = rsp.write_to(&mut w, req.method == Method::HEAD).await {
            debug!("failed to send response to {peer_addr}: {e}");
            return;
        }
        let _ = w.shutdown().await;
    }

    /// Accept connections until a quit notification arrives.
    pub async fn run(self: Arc<Self>, listener: TcpListener, mut quit: broadcast::Receiver<()>) {
        use broadcast::error::RecvError;

        match listener.local_addr() {
            Ok(addr) => info!("http server listening on {addr}"),
            Err(e) => warn!("http server listening on unknown address: {e}"),
        }

        loop {
            tokio::select! {
                biased;

                ev = quit.recv() => {
                    match ev {
                        Ok(()) | Err(RecvError::Closed) => break,
                        Err(RecvError::Lagged(_)) => continue,
                    }
                }
                result = listener.accept() => {
                    match result {
                        Ok((stream, peer_addr)) => {
                            let server = Arc::clone(&self);
                            tokio::spawn(async move {
                                server.run_task(stream, peer_addr).await;
                            });
                        }
                        Err(e) => warn!("http server accept: {e:?}"),
                    }
                }
            }
        }
        info!("http server stopped");
    }
}
