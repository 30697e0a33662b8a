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

//! Price comps for a search query.
//!
//! [`CompsHandler`] reads `q` (plus the accepted `category` and `condition`)
//! from the query, asks Google Programmable Search for web hits and the eBay
//! Browse API for active listings, and answers with
//! `{query, stats: {p25, p50, p75, sample, source}, items, web}`.
//!
//! Each provider runs only when its keys are present in env:
//!
//! - web search: `GCSE_KEY` and `GCSE_CX`
//! - marketplace: `EBAY_BROWSE_TOKEN`
//!
//! A provider without keys contributes an empty list.

#![warn(missing_docs)]

mod constants;
pub use constants::{CSE_URL, EBAY_BROWSE_TOKEN, EBAY_BROWSE_URL, GCSE_CX, GCSE_KEY};

mod config;
pub use config::CompsConfig;

mod fetch;

mod stats;
pub use stats::{percentile, PriceStats};

mod web;
pub use web::{WebResult, WebSearch};

mod market;
pub use market::{MarketItem, MarketSearch};

mod handler;
pub use handler::{CompsHandler, CompsOutput};
