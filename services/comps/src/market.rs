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
use http::header::{ACCEPT, AUTHORIZATION};
use http::{HeaderValue, Method, Request};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use snapcomps_core::{Context, Error, Result};

use crate::constants::{DEFAULT_CURRENCY, EBAY_BROWSE_TOKEN, EBAY_BROWSE_URL};
use crate::fetch::{encode_query, fetch_json};

/// Status of every listing returned by the browse search.
pub const ACTIVE: &str = "active";

/// One priced marketplace listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketItem {
    /// Listing title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Asking price.
    pub price: f64,
    /// Currency code of the price.
    pub currency: String,
    /// Item condition as reported by the marketplace.
    pub condition: Option<String>,
    /// Listing URL.
    pub url: Option<String>,
    /// Always [`ACTIVE`].
    pub status: &'static str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BrowseResponse {
    #[serde(default)]
    item_summaries: Option<Vec<ItemSummary>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemSummary {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    price: Option<Amount>,
    #[serde(default)]
    condition: Option<String>,
    #[serde(default)]
    item_web_url: Option<String>,
    #[serde(default)]
    item_affiliate_web_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Amount {
    #[serde(default)]
    value: Option<Value>,
    #[serde(default)]
    currency: Option<String>,
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.is_empty())
}

/// Read a price that may come as a decimal string or a number.
fn parse_price(value: &Value) -> Option<f64> {
    let price = match value {
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Number(n) => n.as_f64()?,
        _ => return None,
    };
    price.is_finite().then_some(price)
}

impl ItemSummary {
    /// Map into a listing, `None` if it carries no usable price.
    fn into_item(self) -> Option<MarketItem> {
        let amount = self.price?;
        let price = parse_price(amount.value.as_ref()?)?;

        Some(MarketItem {
            title: self.title,
            price,
            currency: non_empty(amount.currency).unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            condition: non_empty(self.condition),
            url: non_empty(self.item_web_url).or_else(|| non_empty(self.item_affiliate_web_url)),
            status: ACTIVE,
        })
    }
}

/// MarketSearch lists active listings through the eBay Browse API.
#[derive(Debug, Clone)]
pub struct MarketSearch {
    endpoint: String,
    token: String,
}

impl MarketSearch {
    /// Create a new MarketSearch with an OAuth application token.
    pub fn new(token: &str) -> Self {
        Self {
            endpoint: EBAY_BROWSE_URL.to_string(),
            token: token.to_string(),
        }
    }

    /// Set the endpoint, mostly for tests.
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    /// Search listings, dropping those without a usable price.
    pub async fn search(&self, ctx: &Context, q: &str) -> Result<Vec<MarketItem>> {
        let mut authorization =
            HeaderValue::from_str(&format!("Bearer {}", self.token)).map_err(|e| {
                Error::config_invalid(format!("{EBAY_BROWSE_TOKEN} is not a valid header value"))
                    .with_source(e)
            })?;
        authorization.set_sensitive(true);

        let req = Request::builder()
            .method(Method::GET)
            .uri(format!("{}?{}", self.endpoint, encode_query([("q", q)])))
            .header(AUTHORIZATION, authorization)
            .header(ACCEPT, "application/json")
            .body(Bytes::new())?;

        let resp: BrowseResponse = fetch_json(ctx, "marketplace", req).await?;
        let summaries = resp.item_summaries.unwrap_or_default();
        let total = summaries.len();
        let items: Vec<_> = summaries
            .into_iter()
            .filter_map(ItemSummary::into_item)
            .collect();
        debug!("marketplace: kept {} of {total} listings", items.len());

        Ok(items)
    }
}
