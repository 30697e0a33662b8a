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

//! Core components for the snapcomps endpoints.
//!
//! This crate provides the foundational types and traits shared by the
//! endpoint services. It defines the seams that keep handlers free of direct
//! I/O, so they can be driven with fixed inputs in tests.
//!
//! ## Overview
//!
//! - **Context**: A container that holds implementations for HTTP sending,
//!   environment access and the clock
//! - **Traits**: Abstract interfaces for credential loading (`ProvideCredential`)
//!   and endpoint handling (`Handle`)
//! - **ApiRequest / ApiResponse**: The parsed request a dispatcher delivers and
//!   the status + JSON body it expects back
//!
//! ## Example
//!
//! ```no_run
//! use snapcomps_core::{ApiRequest, ApiResponse, Context, Handle, OsEnv};
//! use async_trait::async_trait;
//! use serde_json::json;
//!
//! #[derive(Debug)]
//! struct Ping;
//!
//! #[async_trait]
//! impl Handle for Ping {
//!     async fn handle(&self, _: &Context, _: ApiRequest) -> ApiResponse {
//!         ApiResponse::from_result(ApiResponse::ok(&json!({ "pong": true })))
//!     }
//! }
//!
//! # async fn example() {
//! let ctx = Context::new().with_env(OsEnv);
//! let resp = Ping.handle(&ctx, ApiRequest::new(http::Method::GET)).await;
//! assert_eq!(resp.status, http::StatusCode::OK);
//! # }
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: Cryptographic hashing utilities
//! - [`time`]: Time formatting utilities
//! - [`utils`]: General utilities including data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod context;
pub use context::Clock;
pub use context::Context;
pub use context::Env;
pub use context::FixedClock;
pub use context::HttpSend;
pub use context::NoopEnv;
pub use context::NoopHttpSend;
pub use context::OsEnv;
pub use context::StaticEnv;
pub use context::SystemClock;

mod error;
pub use error::{Error, ErrorKind, Result};

mod api;
pub use api::{Handle, ProvideCredential, SigningCredential};
mod request;
pub use request::{ApiRequest, ApiResponse};
