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

use async_trait::async_trait;
use log::debug;
use serde::Serialize;
use snapcomps_core::{ApiRequest, ApiResponse, Context, Error, Handle, Result};

use crate::config::CompsConfig;
use crate::market::{MarketItem, MarketSearch};
use crate::stats::PriceStats;
use crate::web::{WebResult, WebSearch};

/// What the comps endpoint returns on success.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompsOutput {
    /// The query as received.
    pub query: String,
    /// Price stats over `items`.
    pub stats: PriceStats,
    /// Priced marketplace listings.
    pub items: Vec<MarketItem>,
    /// Web search hits.
    pub web: Vec<WebResult>,
}

/// CompsHandler gathers comparable listings and web hits for a query.
///
/// Endpoints default to the public provider URLs; tests point them
/// elsewhere through [`CompsHandler::with_web_endpoint`] and
/// [`CompsHandler::with_market_endpoint`].
#[derive(Debug, Clone, Default)]
pub struct CompsHandler {
    web_endpoint: Option<String>,
    market_endpoint: Option<String>,
}

impl CompsHandler {
    /// Create a handler against the public provider endpoints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the web search endpoint.
    pub fn with_web_endpoint(mut self, endpoint: &str) -> Self {
        self.web_endpoint = Some(endpoint.to_string());
        self
    }

    /// Override the marketplace endpoint.
    pub fn with_market_endpoint(mut self, endpoint: &str) -> Self {
        self.market_endpoint = Some(endpoint.to_string());
        self
    }

    fn web_search(&self, cfg: &CompsConfig) -> Option<WebSearch> {
        let (key, cx) = cfg.web_search()?;
        let search = WebSearch::new(key, cx);
        Some(match &self.web_endpoint {
            Some(ep) => search.with_endpoint(ep),
            None => search,
        })
    }

    fn market_search(&self, cfg: &CompsConfig) -> Option<MarketSearch> {
        let search = MarketSearch::new(cfg.marketplace()?);
        Some(match &self.market_endpoint {
            Some(ep) => search.with_endpoint(ep),
            None => search,
        })
    }

    /// Run both providers in turn and compute the stats.
    pub async fn aggregate(&self, ctx: &Context, req: &ApiRequest) -> Result<CompsOutput> {
        let q = req.query_get("q").unwrap_or_default();
        if q.trim().is_empty() {
            return Err(Error::request_invalid("Missing q (query)"));
        }
        // Accepted for forward compatibility, not applied yet.
        debug!(
            "comps query {q:?} category={:?} condition={:?}",
            req.query_get("category").unwrap_or_default(),
            req.query_get("condition").unwrap_or_default(),
        );

        let cfg = CompsConfig::from_env(ctx);

        let web = match self.web_search(&cfg) {
            Some(search) => search.search(ctx, q).await?,
            None => {
                debug!("web search is not configured, skipped");
                Vec::new()
            }
        };

        let items = match self.market_search(&cfg) {
            Some(search) => search.search(ctx, q).await?,
            None => {
                debug!("marketplace is not configured, skipped");
                Vec::new()
            }
        };

        Ok(CompsOutput {
            query: q.to_string(),
            stats: PriceStats::from_prices(items.iter().map(|i| i.price)),
            items,
            web,
        })
    }
}

#[async_trait]
impl Handle for CompsHandler {
    async fn handle(&self, ctx: &Context, req: ApiRequest) -> ApiResponse {
        ApiResponse::from_result(
            self.aggregate(ctx, &req)
                .await
                .and_then(|output| ApiResponse::ok(&output)),
        )
    }
}
