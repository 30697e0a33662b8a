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

//! Image labeling through Amazon Rekognition `DetectLabels`.
//!
//! [`VisionHandler`] accepts `{"imageBase64": "<data url>"}`, signs a
//! `DetectLabels` call with [`snapcomps_aws_v4::RequestSigner`] and answers
//! with `{"keywords": [..], "rawCount": n}`.
//!
//! ## Example
//!
//! ```no_run
//! use snapcomps_core::{ApiRequest, Context, Handle, OsEnv};
//! use snapcomps_vision::VisionHandler;
//! use serde_json::json;
//!
//! # async fn example(ctx: Context) {
//! let req = ApiRequest::new(http::Method::POST)
//!     .with_body(json!({ "imageBase64": "data:image/jpeg;base64,/9j/4AAQ" }));
//! let resp = VisionHandler::new().handle(&ctx, req).await;
//! println!("{}: {}", resp.status, resp.body);
//! # }
//! ```

#![warn(missing_docs)]

mod config;
pub use config::{VisionConfig, SERVICE};

mod labels;
pub use labels::{
    DetectLabelsRequest, DetectLabelsResponse, VisionOutput, MAX_KEYWORDS, MAX_LABELS,
    MIN_CONFIDENCE,
};

mod handler;
pub use handler::{extract_payload, VisionHandler, AMZ_JSON_CONTENT_TYPE, DETECT_LABELS_TARGET};
