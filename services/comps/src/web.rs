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

use bytes::Bytes;
use http::{Method, Request};
use serde::{Deserialize, Serialize};
use snapcomps_core::{Context, Result};

use crate::constants::CSE_URL;
use crate::fetch::{encode_query, fetch_json};

/// One web search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebResult {
    /// Page title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Page URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Text around the match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Option<Vec<WebResult>>,
}

/// WebSearch queries Google Programmable Search.
#[derive(Debug, Clone)]
pub struct WebSearch {
    endpoint: String,
    key: String,
    cx: String,
}

impl WebSearch {
    /// Create a new WebSearch with api key and engine id.
    pub fn new(key: &str, cx: &str) -> Self {
        Self {
            endpoint: CSE_URL.to_string(),
            key: key.to_string(),
            cx: cx.to_string(),
        }
    }

    /// Set the endpoint, mostly for tests.
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    /// Run the search and return hits in engine order.
    pub async fn search(&self, ctx: &Context, q: &str) -> Result<Vec<WebResult>> {
        let query = encode_query([
            ("key", self.key.as_str()),
            ("cx", self.cx.as_str()),
            ("q", q),
        ]);
        let req = Request::builder()
            .method(Method::GET)
            .uri(format!("{}?{query}", self.endpoint))
            .body(Bytes::new())?;

        let resp: SearchResponse = fetch_json(ctx, "web search", req).await?;
        Ok(resp.items.unwrap_or_default())
    }
}
