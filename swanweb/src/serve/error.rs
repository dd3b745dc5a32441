/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::io;

use http::StatusCode;
use thiserror::Error;

use super::HttpResponse;
use crate::backend::{CommandError, ControlError};

#[derive(Debug, Error)]
pub enum HttpRequestParseError {
    #[error("client closed")]
    ClientClosed,
    #[error("too large header, should be less than {0}")]
    TooLargeHeader(usize),
    #[error("invalid method line")]
    InvalidMethodLine,
    #[error("invalid method")]
    InvalidMethod,
    #[error("unsupported version: {0}")]
    UnsupportedVersion(String),
    #[error("invalid request target")]
    InvalidRequestTarget,
    #[error("invalid header line")]
    InvalidHeaderLine,
    #[error("io failed: {0:?}")]
    IoFailed(#[from] io::Error),
}

impl HttpRequestParseError {
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            HttpRequestParseError::IoFailed(_) | HttpRequestParseError::ClientClosed => None,
            HttpRequestParseError::TooLargeHeader(_) => {
                Some(StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE)
            }
            HttpRequestParseError::UnsupportedVersion(_) => {
                Some(StatusCode::HTTP_VERSION_NOT_SUPPORTED)
            }
            _ => Some(StatusCode::BAD_REQUEST),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("missing query parameter: {0}")]
    MissingParameter(&'static str),
    #[error("{0}")]
    ExternalProcess(CommandError),
    #[error("{0}")]
    CommandTimeout(CommandError),
    #[error("{action} failed: {source}")]
    ControlChannel {
        action: &'static str,
        source: ControlError,
    },
}

impl From<CommandError> for ApiError {
    fn from(e: CommandError) -> Self {
        match e {
            CommandError::Timeout(..) => ApiError::CommandTimeout(e),
            _ => ApiError::ExternalProcess(e),
        }
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingParameter(_) => StatusCode::BAD_REQUEST,
            ApiError::ExternalProcess(_) | ApiError::ControlChannel { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::CommandTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    pub fn into_response(self) -> HttpResponse {
        let body = match &self {
            // the output of the failed process is forwarded as is
            ApiError::ExternalProcess(e) => match e.output() {
                Some(output) if !output.is_empty() => output.to_string(),
                _ => format!("{self}\n"),
            },
            _ => format!("{self}\n"),
        };
        HttpResponse::text(self.status_code(), body)
    }
}
