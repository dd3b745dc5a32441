/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use http::StatusCode;
use log::{debug, warn};
use serde_json::{Map, Value};

use swan_status::{ActiveTrace, StatusMap};

use super::{ApiError, HttpRequest, HttpResponse};
use crate::backend::{ChildSaControl, CommandError, StatusSource};

const PARAM_NAME: &str = "name";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiRoute {
    Initiate,
    Terminate,
    StatusText,
    ConnectionsText,
    ChildrenJson,
    ActiveChildrenJson,
    StatusJson,
    DebugActiveLines,
}

impl ApiRoute {
    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            "/initiate" => Some(ApiRoute::Initiate),
            "/terminate" => Some(ApiRoute::Terminate),
            "/status_txt" => Some(ApiRoute::StatusText),
            "/connections_txt" => Some(ApiRoute::ConnectionsText),
            "/children_json" => Some(ApiRoute::ChildrenJson),
            "/active_children_json" => Some(ApiRoute::ActiveChildrenJson),
            "/status_json" => Some(ApiRoute::StatusJson),
            "/debug_active_lines" => Some(ApiRoute::DebugActiveLines),
            _ => None,
        }
    }
}

/// Text of a listing where failures are tolerated, a failed command gives
/// empty text.
fn lenient_output(r: Result<String, CommandError>) -> String {
    match r {
        Ok(text) => text,
        Err(e) => {
            warn!("{e}");
            String::new()
        }
    }
}

fn names_json(names: Vec<String>) -> HttpResponse {
    HttpResponse::json(&Value::Array(names.into_iter().map(Value::String).collect()))
}

fn status_json(stats: StatusMap) -> HttpResponse {
    let map = stats
        .into_iter()
        .map(|(name, status)| {
            let mut entry = Map::new();
            entry.insert("active".to_string(), Value::Bool(status.active));
            entry.insert("in_bytes".to_string(), Value::from(status.inbound.bytes));
            entry.insert("out_bytes".to_string(), Value::from(status.outbound.bytes));
            entry.insert("in_pkts".to_string(), Value::from(status.inbound.packets));
            entry.insert("out_pkts".to_string(), Value::from(status.outbound.packets));
            (name, Value::Object(entry))
        })
        .collect::<Map<String, Value>>();
    HttpResponse::json(&Value::Object(map))
}

pub struct ApiHandler<S, C> {
    source: S,
    control: C,
}

impl<S, C> ApiHandler<S, C>
where
    S: StatusSource,
    C: ChildSaControl,
{
    pub fn new(source: S, control: C) -> Self {
        ApiHandler { source, control }
    }

    /// Returns `None` if the path is not an API route.
    pub async fn handle(&self, req: &HttpRequest) -> Option<HttpResponse> {
        let route = ApiRoute::from_path(req.path())?;
        let rsp = match self.dispatch(route, req).await {
            Ok(rsp) => rsp,
            Err(e) => {
                if !matches!(e, ApiError::MissingParameter(_)) {
                    warn!("{} failed: {e}", req.path());
                }
                e.into_response()
            }
        };
        Some(rsp)
    }

    async fn dispatch(&self, route: ApiRoute, req: &HttpRequest) -> Result<HttpResponse, ApiError> {
        match route {
            ApiRoute::Initiate => {
                let name = child_name(req)?;
                self.control
                    .initiate(&name)
                    .await
                    .map_err(|source| ApiError::ControlChannel {
                        action: "initiate",
                        source,
                    })?;
                Ok(HttpResponse::text(StatusCode::OK, "ok\n"))
            }
            ApiRoute::Terminate => {
                let name = child_name(req)?;
                self.control
                    .terminate(&name)
                    .await
                    .map_err(|source| ApiError::ControlChannel {
                        action: "terminate",
                        source,
                    })?;
                Ok(HttpResponse::text(StatusCode::OK, "ok\n"))
            }
            ApiRoute::StatusText => {
                let text = self.source.list_sas().await?;
                Ok(HttpResponse::text(StatusCode::OK, text))
            }
            ApiRoute::ConnectionsText => {
                let text = self.source.list_conns().await?;
                Ok(HttpResponse::text(StatusCode::OK, text))
            }
            ApiRoute::ChildrenJson => {
                let conns = lenient_output(self.source.list_conns().await);
                let names = swan_status::configured_connections(&conns, || async move {
                    lenient_output(self.source.list_sas().await)
                })
                .await;
                Ok(names_json(names))
            }
            ApiRoute::ActiveChildrenJson => {
                let text = self.source.list_sas().await?;
                Ok(names_json(swan_status::active_connections(&text)))
            }
            ApiRoute::StatusJson => {
                let text = self.source.list_sas().await?;
                Ok(status_json(swan_status::aggregate_status(&text)))
            }
            ApiRoute::DebugActiveLines => {
                let text = lenient_output(self.source.list_sas().await);
                let trace = swan_status::trace_active_lines(&text);
                if let ActiveTrace::Matched(lines) = &trace {
                    for l in lines {
                        debug!("active rule {} matched: {}", l.rule, l.line.trim());
                    }
                }
                Ok(HttpResponse::text(StatusCode::OK, trace.to_string()))
            }
        }
    }
}

fn child_name(req: &HttpRequest) -> Result<String, ApiError> {
    match req.query_param(PARAM_NAME) {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(ApiError::MissingParameter(PARAM_NAME)),
    }
}
