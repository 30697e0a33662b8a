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

use std::fmt::Write;

use http::Method;
use snapcomps_core::hash::hex_sha256;
use snapcomps_core::{Error, Result};

use crate::constants::ALGORITHM;

/// CanonicalHeaders is the ordered header block that gets signed.
///
/// Entries are kept sorted by lower-cased name, so iteration order is always
/// the canonical order and [`CanonicalHeaders::signed_header_names`] lists
/// names in exactly the order their lines are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalHeaders(Vec<(String, String)>);

impl CanonicalHeaders {
    /// Create an empty header block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a header.
    ///
    /// The name is lower-cased; the value is trimmed and inner runs of
    /// whitespace collapse to a single space. A repeated name appends its
    /// value to the earlier ones, comma separated, in insertion order.
    pub fn insert(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        let value = value.split_whitespace().collect::<Vec<_>>().join(" ");

        match self.0.binary_search_by(|(k, _)| k.as_str().cmp(&name)) {
            Ok(idx) => {
                let existing = &mut self.0[idx].1;
                existing.push(',');
                existing.push_str(&value);
            }
            Err(idx) => self.0.insert(idx, (name, value)),
        }
    }

    /// Get header value by lower-cased name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .binary_search_by(|(k, _)| k.as_str().cmp(name))
            .ok()
            .map(|idx| self.0[idx].1.as_str())
    }

    /// Header names in canonical order.
    pub fn signed_header_names(&self) -> Vec<&str> {
        self.0.iter().map(|(k, _)| k.as_str()).collect()
    }

    /// Iterate over `(name, value)` in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of headers.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no header has been inserted.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Build the canonical request string.
///
/// ```text
/// POST
/// /
///
/// content-type:application/x-amz-json-1.1
/// host:rekognition.us-east-1.amazonaws.com
/// x-amz-date:20150830T123600Z
/// x-amz-target:RekognitionService.DetectLabels
///
/// content-type;host;x-amz-date;x-amz-target
/// <hex sha256 of payload>
/// ```
///
/// The query string is always empty and the path is written unescaped.
pub fn canonicalize(
    method: &Method,
    path: &str,
    headers: &CanonicalHeaders,
    signed_headers: &[&str],
    payload_hash: &str,
) -> Result<String> {
    if !path.starts_with('/') {
        return Err(Error::request_invalid(format!(
            "path must be absolute, got: {path}"
        )));
    }
    if let Some((name, _)) = headers.iter().find(|(k, _)| !signed_headers.contains(k)) {
        return Err(Error::request_invalid(format!(
            "header {name} is present but not signed"
        )));
    }

    // 256 is specially chosen to avoid reallocation for most requests.
    let mut f = String::with_capacity(256);

    writeln!(f, "{method}")?;
    writeln!(f, "{path}")?;
    // Empty canonical query string.
    writeln!(f)?;
    for name in signed_headers {
        let value = headers.get(name).ok_or_else(|| Error::header_missing(name))?;
        writeln!(f, "{name}:{value}")?;
    }
    writeln!(f)?;
    writeln!(f, "{}", signed_headers.join(";"))?;
    write!(f, "{payload_hash}")?;

    Ok(f)
}

/// Build the string to sign.
///
/// ```text
/// AWS4-HMAC-SHA256
/// 20150830T123600Z
/// 20150830/us-east-1/rekognition/aws4_request
/// <hex sha256 of canonical request>
/// ```
pub fn string_to_sign(amz_date: &str, scope: &str, canonical_request: &str) -> String {
    format!(
        "{ALGORITHM}\n{amz_date}\n{scope}\n{}",
        hex_sha256(canonical_request.as_bytes())
    )
}
