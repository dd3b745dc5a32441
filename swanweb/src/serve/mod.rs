/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

mod error;
pub use error::{ApiError, HttpRequestParseError};

mod request;
pub use request::HttpRequest;

mod response;
pub use response::HttpResponse;

mod api;
pub use api::{ApiHandler, ApiRoute};

mod files;
pub use files::StaticFiles;

mod server;
pub use server::HttpServer;
