/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::io;
use std::str::FromStr;

use http::{HeaderMap, HeaderName, HeaderValue, Method, Uri, Version};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use super::HttpRequestParseError;

/// Read until `\n` but no more than `max_len` bytes.
///
/// Returns whether the delimiter was found and how many bytes were read.
async fn limited_read_until<R>(
    reader: &mut R,
    delimiter: u8,
    max_len: usize,
    buf: &mut Vec<u8>,
) -> io::Result<(bool, usize)>
where
    R: AsyncBufRead + Unpin,
{
    let mut nr = 0usize;
    while nr < max_len {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            return Ok((false, nr));
        }

        let to_check = &available[..available.len().min(max_len - nr)];
        if let Some(p) = memchr::memchr(delimiter, to_check) {
            buf.extend_from_slice(&to_check[..=p]);
            reader.consume(p + 1);
            return Ok((true, nr + p + 1));
        }
        let len = to_check.len();
        buf.extend_from_slice(to_check);
        reader.consume(len);
        nr += len;
    }
    Ok((false, nr))
}

fn trim_line_end(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

pub struct HttpRequest {
    pub method: Method,
    pub uri: Uri,
    pub version: Version,
    pub headers: HeaderMap,
}

impl HttpRequest {
    #[inline]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// The first value of a query parameter, percent decoded.
    pub fn query_param(&self, name: &str) -> Option<String> {
        let query = self.uri.query()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }

    fn parse_method_line(buf: &[u8]) -> Result<Self, HttpRequestParseError> {
        let line = std::str::from_utf8(trim_line_end(buf))
            .map_err(|_| HttpRequestParseError::InvalidMethodLine)?;

        let mut parts = line.split(' ').filter(|s| !s.is_empty());
        let (Some(method), Some(target), Some(version), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(HttpRequestParseError::InvalidMethodLine);
        };

        let method = Method::from_bytes(method.as_bytes())
            .map_err(|_| HttpRequestParseError::InvalidMethod)?;
        let version = match version {
            "HTTP/1.0" => Version::HTTP_10,
            "HTTP/1.1" => Version::HTTP_11,
            v => return Err(HttpRequestParseError::UnsupportedVersion(v.to_string())),
        };
        let uri =
            Uri::from_str(target).map_err(|_| HttpRequestParseError::InvalidRequestTarget)?;
        if uri.scheme().is_none() && !target.starts_with('/') {
            return Err(HttpRequestParseError::InvalidRequestTarget);
        }

        Ok(HttpRequest {
            method,
            uri,
            version,
            headers: HeaderMap::new(),
        })
    }

    fn parse_header_line(&mut self, buf: &[u8]) -> Result<(), HttpRequestParseError> {
        let line = trim_line_end(buf);
        let Some(p) = memchr::memchr(b':', line) else {
            return Err(HttpRequestParseError::InvalidHeaderLine);
        };
        let name = HeaderName::from_bytes(line[..p].trim_ascii())
            .map_err(|_| HttpRequestParseError::InvalidHeaderLine)?;
        let value = HeaderValue::from_bytes(line[p + 1..].trim_ascii())
            .map_err(|_| HttpRequestParseError::InvalidHeaderLine)?;
        self.headers.append(name, value);
        Ok(())
    }

    /// Parse the request head, the body if any is left in `reader`.
    pub async fn parse<R>(
        reader: &mut R,
        max_header_size: usize,
    ) -> Result<Self, HttpRequestParseError>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut line_buf = Vec::<u8>::with_capacity(1024);
        let mut header_size: usize = 0;

        let (found, nr) = limited_read_until(reader, b'\n', max_header_size, &mut line_buf).await?;
        if nr == 0 {
            return Err(HttpRequestParseError::ClientClosed);
        }
        if !found {
            return if nr < max_header_size {
                Err(HttpRequestParseError::ClientClosed)
            } else {
                Err(HttpRequestParseError::TooLargeHeader(max_header_size))
            };
        }
        header_size += nr;

        let mut req = HttpRequest::parse_method_line(&line_buf)?;

        loop {
            if header_size >= max_header_size {
                return Err(HttpRequestParseError::TooLargeHeader(max_header_size));
            }
            line_buf.clear();
            let max_len = max_header_size - header_size;
            let (found, nr) = limited_read_until(reader, b'\n', max_len, &mut line_buf).await?;
            if nr == 0 {
                return Err(HttpRequestParseError::ClientClosed);
            }
            if !found {
                return if nr < max_len {
                    Err(HttpRequestParseError::ClientClosed)
                } else {
                    Err(HttpRequestParseError::TooLargeHeader(max_header_size))
                };
            }
            header_size += nr;

            if trim_line_end(&line_buf).is_empty() {
                break;
            }
            req.parse_header_line(&line_buf)?;
        }

        Ok(req)
    }
}
