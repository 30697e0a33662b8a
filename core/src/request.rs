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

use http::Method;
use http::StatusCode;
use log::{debug, warn};
use serde::Serialize;
use serde_json::json;
use serde_json::Value;

use crate::{Error, Result};

/// ApiRequest is the parsed inbound request handed over by the dispatcher.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Query pairs in the order they appeared.
    pub query: Vec<(String, String)>,
    /// Parsed JSON body, `None` when the request had no (valid) JSON body.
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Create a request with no query and no body.
    pub fn new(method: Method) -> Self {
        Self {
            method,
            query: Vec::new(),
            body: None,
        }
    }

    /// Push a query pair.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Parse and append a raw query string like `q=lego&condition=used`.
    pub fn with_query_string(mut self, query: &str) -> Self {
        self.query.extend(
            form_urlencoded::parse(query.as_bytes()).map(|(k, v)| (k.into_owned(), v.into_owned())),
        );
        self
    }

    /// Set the JSON body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Set the body from raw bytes.
    ///
    /// Bytes that are not valid JSON leave the body empty, the same as a
    /// request that carried no body at all.
    pub fn with_body_bytes(mut self, bs: &[u8]) -> Self {
        if bs.is_empty() {
            return self;
        }
        match serde_json::from_slice(bs) {
            Ok(v) => self.body = Some(v),
            Err(err) => debug!("ignore request body that is not valid json: {err}"),
        }
        self
    }

    /// Get the first query value for key.
    pub fn query_get(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Get a string field of the JSON body object.
    ///
    /// Returns `None` if the body is absent, not an object, or the field is
    /// not a string.
    pub fn body_str(&self, field: &str) -> Option<&str> {
        self.body.as_ref()?.get(field)?.as_str()
    }
}

/// ApiResponse is a status code plus JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// JSON body.
    pub body: Value,
}

impl ApiResponse {
    /// Build a `200 OK` response from any serializable payload.
    pub fn ok(payload: &impl Serialize) -> Result<Self> {
        Ok(Self {
            status: StatusCode::OK,
            body: serde_json::to_value(payload)?,
        })
    }

    /// Build an error response `{ "error": message }`.
    pub fn error(status: StatusCode, message: &str) -> Self {
        Self {
            status,
            body: json!({ "error": message }),
        }
    }

    /// Render an error with the status its kind maps to.
    pub fn from_error(err: &Error) -> Self {
        if err.is_validation_error() {
            debug!("request rejected: {err}");
        } else {
            warn!("request failed: {err:?}");
        }
        Self::error(err.status(), err.message())
    }

    /// Collapse a handler result into a response.
    pub fn from_result(res: Result<Self>) -> Self {
        res.unwrap_or_else(|err| Self::from_error(&err))
    }
}
