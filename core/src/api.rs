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

use crate::{ApiRequest, ApiResponse, Context, Result};
use std::fmt::Debug;

/// SigningCredential is the trait used by signers as the signing credential.
pub trait SigningCredential: Clone + Debug + Send + Sync + Unpin + 'static {
    /// Check if the credential is usable for signing.
    fn is_valid(&self) -> bool;
}

impl<T: SigningCredential> SigningCredential for Option<T> {
    fn is_valid(&self) -> bool {
        let Some(cred) = self else {
            return false;
        };

        cred.is_valid()
    }
}

/// ProvideCredential loads a credential from the context.
///
/// Returns `Ok(None)` when the source simply doesn't carry a credential; the
/// caller decides whether that is a configuration fault.
#[async_trait::async_trait]
pub trait ProvideCredential: Debug + Send + Sync + Unpin + 'static {
    /// Credential returned by this provider.
    type Credential: Send + Sync + Unpin + 'static;

    /// Load credential from current context.
    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>>;
}

/// Handle serves one endpoint.
///
/// The dispatcher delivers a parsed request and writes back whatever status
/// and JSON body the handler returns. Handlers never fail: every error is
/// already folded into the response.
#[async_trait::async_trait]
pub trait Handle: Debug + Send + Sync + 'static {
    /// Serve a single request.
    async fn handle(&self, ctx: &Context, req: ApiRequest) -> ApiResponse;
}
