// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! HTTP front for the snapcomps endpoints.
//!
//! Mounts `/api/vision` and `/api/comps` on an axum router. Every method is
//! routed to the handler; the handler decides what it accepts.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::rejection::BytesRejection;
use axum::extract::{DefaultBodyLimit, RawQuery, State};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{Json, Router};
use bytes::Bytes;
use http::Method;
use log::debug;
use snapcomps_comps::CompsHandler;
use snapcomps_core::{ApiRequest, ApiResponse, Context, Error, Handle, OsEnv, Result};
use snapcomps_http_send_reqwest::ReqwestHttpSend;
use snapcomps_vision::VisionHandler;

/// Env holding the listen address.
pub const SNAPCOMPS_LISTEN: &str = "SNAPCOMPS_LISTEN";
/// Listen address used when [`SNAPCOMPS_LISTEN`] is not set.
pub const DEFAULT_LISTEN: &str = "127.0.0.1:3000";
/// Largest request body accepted, large enough for a base64 photo.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Config for the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind.
    ///
    /// - env value: [`SNAPCOMPS_LISTEN`]
    /// - default to `127.0.0.1:3000`
    pub listen: SocketAddr,
}

impl ServerConfig {
    /// Load config from env.
    pub fn from_env(ctx: &Context) -> Result<Self> {
        let listen = ctx
            .env_var_non_empty(SNAPCOMPS_LISTEN)
            .unwrap_or_else(|| DEFAULT_LISTEN.to_string());
        let listen = listen.parse().map_err(|e| {
            Error::config_invalid(format!("invalid {SNAPCOMPS_LISTEN}: {listen}")).with_source(e)
        })?;

        Ok(Self { listen })
    }
}

/// State shared by all routes.
#[derive(Debug, Clone)]
pub struct AppState {
    ctx: Context,
    vision: Arc<dyn Handle>,
    comps: Arc<dyn Handle>,
    body_limit: usize,
}

impl AppState {
    /// Create state with the default handlers.
    pub fn new(ctx: Context) -> Self {
        Self {
            ctx,
            vision: Arc::new(VisionHandler::new()),
            comps: Arc::new(CompsHandler::new()),
            body_limit: MAX_BODY_BYTES,
        }
    }

    /// Replace the vision handler.
    pub fn with_vision(mut self, handler: impl Handle) -> Self {
        self.vision = Arc::new(handler);
        self
    }

    /// Replace the comps handler.
    pub fn with_comps(mut self, handler: impl Handle) -> Self {
        self.comps = Arc::new(handler);
        self
    }

    /// Set the largest request body accepted.
    ///
    /// Default to [`MAX_BODY_BYTES`].
    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }
}

/// Context for production: process env, reqwest and the system clock.
pub fn default_context() -> Context {
    Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv)
}

/// Build the router.
pub fn app(state: AppState) -> Router {
    let limit = state.body_limit;
    Router::new()
        .route("/api/vision", any(vision))
        .route("/api/comps", any(comps))
        .layer(DefaultBodyLimit::max(limit))
        .with_state(Arc::new(state))
}

/// Turn the raw parts of an inbound call into an [`ApiRequest`].
pub fn to_api_request(method: Method, query: Option<&str>, body: &[u8]) -> ApiRequest {
    ApiRequest::new(method)
        .with_query_string(query.unwrap_or_default())
        .with_body_bytes(body)
}

/// Write an [`ApiResponse`] back as a JSON response.
pub fn to_response(resp: ApiResponse) -> Response {
    (resp.status, Json(resp.body)).into_response()
}

async fn dispatch(
    handler: &dyn Handle,
    ctx: &Context,
    method: Method,
    query: Option<String>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            debug!("request body rejected: {rejection}");
            return to_response(ApiResponse::error(
                rejection.status(),
                &rejection.body_text(),
            ));
        }
    };
    let req = to_api_request(method, query.as_deref(), &body);
    let resp = handler.handle(ctx, req).await;
    debug!("{handler:?} responded with {}", resp.status);
    to_response(resp)
}

async fn vision(
    State(state): State<Arc<AppState>>,
    method: Method,
    RawQuery(query): RawQuery,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Response {
    dispatch(state.vision.as_ref(), &state.ctx, method, query, body).await
}

async fn comps(
    State(state): State<Arc<AppState>>,
    method: Method,
    RawQuery(query): RawQuery,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Response {
    dispatch(state.comps.as_ref(), &state.ctx, method, query, body).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use pretty_assertions::assert_eq;
    use snapcomps_core::StaticEnv;
    use std::collections::HashMap;

    #[test]
    fn test_to_api_request() {
        let req = to_api_request(
            Method::POST,
            Some("q=lego+falcon&condition=used"),
            br#"{"imageBase64":"data:image/png;base64,aGVsbG8="}"#,
        );

        assert_eq!(req.method, Method::POST);
        assert_eq!(req.query_get("q"), Some("lego falcon"));
        assert_eq!(req.query_get("condition"), Some("used"));
        assert_eq!(
            req.body_str("imageBase64"),
            Some("data:image/png;base64,aGVsbG8=")
        );

        let req = to_api_request(Method::GET, None, b"");
        assert!(req.query.is_empty());
        assert!(req.body.is_none());
    }

    #[test]
    fn test_to_response() {
        let resp = to_response(ApiResponse::error(StatusCode::BAD_REQUEST, "Missing q (query)"));

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(resp.headers()[http::header::CONTENT_TYPE], "application/json");
    }

    #[test]
    fn test_server_config() -> anyhow::Result<()> {
        let ctx = Context::new().with_env(StaticEnv::default());
        assert_eq!(ServerConfig::from_env(&ctx)?.listen.to_string(), DEFAULT_LISTEN);

        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::from([(SNAPCOMPS_LISTEN.to_string(), "0.0.0.0:8080".to_string())]),
        });
        assert_eq!(ServerConfig::from_env(&ctx)?.listen.to_string(), "0.0.0.0:8080");

        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::from([(SNAPCOMPS_LISTEN.to_string(), "localhost".to_string())]),
        });
        let err = ServerConfig::from_env(&ctx).expect_err("must be invalid");
        assert_eq!(err.kind(), snapcomps_core::ErrorKind::ConfigInvalid);
        Ok(())
    }
}
