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

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{Method, Request, Response};
use log::{debug, warn};
use serde_json::Value;
use snapcomps_aws_v4::{Credential, EnvCredentialProvider, RequestSigner, X_AMZ_TARGET};
use snapcomps_core::{
    ApiRequest, ApiResponse, Context, Error, Handle, ProvideCredential, Result, SigningCredential,
};

use crate::config::{VisionConfig, SERVICE};
use crate::labels::{DetectLabelsRequest, DetectLabelsResponse, VisionOutput};

/// Content type of Rekognition's JSON protocol.
pub const AMZ_JSON_CONTENT_TYPE: &str = "application/x-amz-json-1.1";
/// Target operation of the call.
pub const DETECT_LABELS_TARGET: &str = "RekognitionService.DetectLabels";

/// Body field carrying the image.
const IMAGE_FIELD: &str = "imageBase64";

/// VisionHandler labels an uploaded image through a signed DetectLabels call.
#[derive(Debug, Clone)]
pub struct VisionHandler {
    credential_provider: Arc<dyn ProvideCredential<Credential = Credential>>,
}

impl Default for VisionHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl VisionHandler {
    /// Create a handler loading credentials from env.
    pub fn new() -> Self {
        Self {
            credential_provider: Arc::new(EnvCredentialProvider::new()),
        }
    }

    /// Replace the credential provider.
    pub fn with_credential_provider(
        mut self,
        provider: impl ProvideCredential<Credential = Credential>,
    ) -> Self {
        self.credential_provider = Arc::new(provider);
        self
    }

    /// Run the request and return the extracted labels.
    pub async fn detect(&self, ctx: &Context, req: &ApiRequest) -> Result<VisionOutput> {
        if req.method != Method::POST {
            return Err(Error::method_not_allowed("POST only"));
        }

        let image = req
            .body_str(IMAGE_FIELD)
            .and_then(extract_payload)
            .ok_or_else(|| Error::request_invalid("Missing imageBase64"))?;

        let cfg = VisionConfig::from_env(ctx);
        let cred = self
            .credential_provider
            .provide_credential(ctx)
            .await?
            .filter(|cred| cred.is_valid())
            .ok_or_else(|| Error::config_invalid("Missing AWS credentials"))?;

        let mut signed = build_request(&cfg, image)?;
        RequestSigner::new(SERVICE, &cfg.region).sign_request(ctx, &mut signed, &cred)?;

        debug!("sending DetectLabels to {}", cfg.host());
        let resp = ctx.http_send(signed).await?;
        parse_response(resp)
    }
}

#[async_trait]
impl Handle for VisionHandler {
    async fn handle(&self, ctx: &Context, req: ApiRequest) -> ApiResponse {
        ApiResponse::from_result(
            self.detect(ctx, &req)
                .await
                .and_then(|output| ApiResponse::ok(&output)),
        )
    }
}

/// Take the text after the last comma of a data URL.
///
/// Input without a comma has no payload.
pub fn extract_payload(image: &str) -> Option<&str> {
    image.rsplit_once(',').map(|(_, payload)| payload)
}

fn build_request(cfg: &VisionConfig, image: &str) -> Result<Request<Bytes>> {
    let body = serde_json::to_vec(&DetectLabelsRequest::new(image))?;

    let req = Request::builder()
        .method(Method::POST)
        .uri(cfg.endpoint())
        .header(CONTENT_TYPE, AMZ_JSON_CONTENT_TYPE)
        .header(X_AMZ_TARGET, DETECT_LABELS_TARGET)
        .body(Bytes::from(body))
        .map_err(|e| {
            Error::config_invalid(format!("invalid region {}", cfg.region)).with_source(e)
        })?;
    Ok(req)
}

fn parse_response(resp: Response<Bytes>) -> Result<VisionOutput> {
    let status = resp.status();
    let body = resp.into_body();

    if !status.is_success() {
        let message = upstream_message(&body);
        warn!("DetectLabels failed with {status}: {message}");
        return Err(Error::upstream(message));
    }

    let parsed: DetectLabelsResponse = serde_json::from_slice(&body).map_err(|e| {
        Error::upstream("Rekognition returned an invalid response").with_source(e)
    })?;
    Ok(parsed.into_output())
}

/// Pick the error message out of a failed response.
///
/// Rekognition answers with `{"__type": "..", "Message": ".."}`; the raw body
/// is used when no message field is there.
fn upstream_message(body: &[u8]) -> String {
    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("Message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned())
}
