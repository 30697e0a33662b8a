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

//! AWS SigV4 signing for a single JSON POST request.
//!
//! The pieces are exposed separately so each can be checked on its own:
//!
//! - [`canonicalize`] builds the canonical request from an ordered
//!   [`CanonicalHeaders`] block.
//! - [`string_to_sign`] wraps its hash with the algorithm, time and scope.
//! - [`DateKey`] → [`RegionKey`] → [`ServiceKey`] → [`SigningKey`] derive the
//!   signing key; [`sign`] runs the whole chain.
//! - [`authorization_header`] formats the final header value.
//!
//! [`RequestSigner`] ties them together over an `http::Request<Bytes>`.

mod constants;
pub use constants::{
    ALGORITHM, AWS_ACCESS_KEY_ID, AWS_REGION, AWS_SECRET_ACCESS_KEY, DEFAULT_REGION, X_AMZ_DATE,
    X_AMZ_TARGET,
};

mod credential;
pub use credential::Credential;

mod provide_credential;
pub use provide_credential::{EnvCredentialProvider, StaticCredentialProvider};

mod canonical_request;
pub use canonical_request::{canonicalize, string_to_sign, CanonicalHeaders};

mod signing_key;
pub use signing_key::{sign, DateKey, RegionKey, ServiceKey, SigningKey};

mod sign_request;
pub use sign_request::{authorization_header, RequestSigner, SigningContext};
