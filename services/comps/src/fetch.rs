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
use http::Request;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use snapcomps_core::{Context, Error, Result};

/// Build a query string like `a=1&b=x+y`.
pub fn encode_query<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

/// Send the request and decode the JSON body.
///
/// The body is decoded whatever the status is; providers answer errors with
/// JSON too, and the fields we look for are simply absent then. A body that
/// is not JSON fails the whole call.
pub async fn fetch_json<T: DeserializeOwned>(
    ctx: &Context,
    provider: &str,
    req: Request<Bytes>,
) -> Result<T> {
    debug!("{provider}: GET {}", req.uri().path());
    let resp = ctx.http_send(req).await?;

    let status = resp.status();
    if !status.is_success() {
        warn!(
            "{provider} responded with {status}: {}",
            String::from_utf8_lossy(resp.body())
        );
    }

    serde_json::from_slice(resp.body()).map_err(|e| {
        Error::upstream(format!("{provider} returned invalid json: {e}")).with_source(e)
    })
}
