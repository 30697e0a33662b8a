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

/// Env holding the Google Programmable Search api key.
pub const GCSE_KEY: &str = "GCSE_KEY";
/// Env holding the Google Programmable Search engine id.
pub const GCSE_CX: &str = "GCSE_CX";
/// Env holding the eBay OAuth application token.
pub const EBAY_BROWSE_TOKEN: &str = "EBAY_BROWSE_TOKEN";

/// Google Programmable Search endpoint.
pub const CSE_URL: &str = "https://www.googleapis.com/customsearch/v1";
/// eBay Browse item summary search endpoint.
pub const EBAY_BROWSE_URL: &str = "https://api.ebay.com/buy/browse/v1/item_summary/search";

/// Currency assumed when a listing doesn't carry one.
pub const DEFAULT_CURRENCY: &str = "USD";
/// Source tag reported with the stats.
pub const STATS_SOURCE: &str = "active-ebay";
