/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::io;
use std::path::{Component, Path, PathBuf};

use http::{Method, StatusCode};
use log::debug;
use mime::Mime;

use super::{HttpRequest, HttpResponse};

const INDEX_FILE: &str = "index.html";

fn content_type(path: &Path) -> Mime {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "html" | "htm" => mime::TEXT_HTML_UTF_8,
        "css" => mime::TEXT_CSS_UTF_8,
        "js" | "mjs" => mime::APPLICATION_JAVASCRIPT_UTF_8,
        "json" => mime::APPLICATION_JSON,
        "txt" => mime::TEXT_PLAIN_UTF_8,
        "svg" => mime::IMAGE_SVG,
        "png" => mime::IMAGE_PNG,
        "jpg" | "jpeg" => mime::IMAGE_JPEG,
        "gif" => mime::IMAGE_GIF,
        "woff" => mime::FONT_WOFF,
        "woff2" => mime::FONT_WOFF2,
        "ico" => "image/x-icon"
            .parse()
            .unwrap_or(mime::APPLICATION_OCTET_STREAM),
        _ => mime::APPLICATION_OCTET_STREAM,
    }
}

/// Serves files below a root directory.
pub struct StaticFiles {
    root: PathBuf,
}

impl StaticFiles {
    pub fn new(root: PathBuf) -> Self {
        StaticFiles { root }
    }

    /// Map a request path to a file path, `None` if it may escape the root.
    fn resolve(&self, url_path: &str) -> Option<PathBuf> {
        let decoded = percent_encoding::percent_decode_str(url_path)
            .decode_utf8()
            .ok()?;

        let mut path = self.root.clone();
        for component in Path::new(decoded.as_ref()).components() {
            match component {
                Component::Normal(s) => path.push(s),
                Component::RootDir | Component::CurDir => {}
                Component::ParentDir | Component::Prefix(_) => return None,
            }
        }
        Some(path)
    }

    async fn read(path: &Path) -> io::Result<(PathBuf, Vec<u8>)> {
        let metadata = tokio::fs::metadata(path).await?;
        let path = if metadata.is_dir() {
            path.join(INDEX_FILE)
        } else {
            path.to_path_buf()
        };
        let data = tokio::fs::read(&path).await?;
        Ok((path, data))
    }

    pub async fn serve(&self, req: &HttpRequest) -> HttpResponse {
        if req.method != Method::GET && req.method != Method::HEAD {
            return HttpResponse::status_only(StatusCode::METHOD_NOT_ALLOWED);
        }

        let Some(path) = self.resolve(req.path()) else {
            return HttpResponse::status_only(StatusCode::NOT_FOUND);
        };
        match StaticFiles::read(&path).await {
            Ok((path, data)) => HttpResponse::new(StatusCode::OK, content_type(&path), data),
            Err(e) => {
                debug!("failed to read static file {}: {e}", path.display());
                let status = match e.kind() {
                    io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => {
                        StatusCode::NOT_FOUND
                    }
                    io::ErrorKind::PermissionDenied => StatusCode::FORBIDDEN,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                HttpResponse::status_only(status)
            }
        }
    }
}
