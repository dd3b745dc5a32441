/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::io::{self, Write};

use bytes::Bytes;
use http::StatusCode;
use mime::Mime;
use tokio::io::{AsyncWrite, AsyncWriteExt};

pub struct HttpResponse {
    status: StatusCode,
    content_type: Mime,
    body: Bytes,
}

impl HttpResponse {
    pub fn new(status: StatusCode, content_type: Mime, body: impl Into<Bytes>) -> Self {
        HttpResponse {
            status,
            content_type,
            body: body.into(),
        }
    }

    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        HttpResponse::new(status, mime::TEXT_PLAIN_UTF_8, body.into())
    }

    /// One JSON document followed by a newline.
    pub fn json(value: &serde_json::Value) -> Self {
        let mut body = value.to_string();
        body.push('\n');
        HttpResponse::new(StatusCode::OK, mime::APPLICATION_JSON, body)
    }

    pub fn status_only(status: StatusCode) -> Self {
        let reason = status.canonical_reason().unwrap_or_default();
        HttpResponse::text(status, format!("{} {reason}\n", status.as_u16()))
    }

    #[inline]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[inline]
    pub fn content_type(&self) -> &Mime {
        &self.content_type
    }

    #[inline]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    fn serialize_head(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(128);
        let reason = self.status.canonical_reason().unwrap_or_default();
        // writing to a Vec never fails
        let _ = write!(
            buf,
            "HTTP/1.1 {} {reason}\r\n\
             Content-Type: {}\r\n\
             Content-Length: {}\r\n\
             Connection: close\r\n\
             \r\n",
            self.status.as_u16(),
            self.content_type,
            self.body.len(),
        );
        buf
    }

    /// Send the response, the body is skipped for HEAD requests.
    pub async fn write_to<W>(&self, writer: &mut W, head_only: bool) -> io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        writer.write_all(&self.serialize_head()).await?;
        if !head_only && !self.body.is_empty() {
            writer.write_all(&self.body).await?;
        }
        writer.flush().await
    }
}
