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

use snapcomps_core::utils::Redact;
use snapcomps_core::Context;
use std::fmt::{Debug, Formatter};

use crate::constants::*;

/// Config for the comps endpoint.
///
/// Every provider is optional. A provider without its keys is skipped and
/// contributes an empty list.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct CompsConfig {
    /// API key of Google Programmable Search.
    ///
    /// - env value: [`GCSE_KEY`]
    pub gcse_key: Option<String>,
    /// Search engine id of Google Programmable Search.
    ///
    /// - env value: [`GCSE_CX`]
    pub gcse_cx: Option<String>,
    /// OAuth application token for the eBay Browse API.
    ///
    /// - env value: [`EBAY_BROWSE_TOKEN`]
    pub ebay_browse_token: Option<String>,
}

impl Debug for CompsConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompsConfig")
            .field("gcse_key", &self.gcse_key.as_deref().map(Redact::from))
            .field("gcse_cx", &self.gcse_cx)
            .field(
                "ebay_browse_token",
                &self.ebay_browse_token.as_deref().map(Redact::from),
            )
            .finish()
    }
}

impl CompsConfig {
    /// Load config from env.
    pub fn from_env(ctx: &Context) -> Self {
        Self {
            gcse_key: ctx.env_var_non_empty(GCSE_KEY),
            gcse_cx: ctx.env_var_non_empty(GCSE_CX),
            ebay_browse_token: ctx.env_var_non_empty(EBAY_BROWSE_TOKEN),
        }
    }

    /// Key and engine id, only when both are set.
    pub fn web_search(&self) -> Option<(&str, &str)> {
        Some((self.gcse_key.as_deref()?, self.gcse_cx.as_deref()?))
    }

    /// Marketplace token, if set.
    pub fn marketplace(&self) -> Option<&str> {
        self.ebay_browse_token.as_deref()
    }
}
