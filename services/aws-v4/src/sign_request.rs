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
use http::{header, HeaderValue, Request};
use log::debug;
use snapcomps_core::hash::hex_sha256;
use snapcomps_core::time::{format_date, format_iso8601, DateTime};
use snapcomps_core::{Context, Error, Result};

use crate::canonical_request::{canonicalize, string_to_sign, CanonicalHeaders};
use crate::constants::{ALGORITHM, AWS4_REQUEST, X_AMZ_DATE};
use crate::signing_key::sign;
use crate::Credential;

/// SigningContext carries every input of one signature.
///
/// It is built once per outbound call. The date stamp and the credential
/// scope are derived from the timestamp, never sampled separately.
#[derive(Debug)]
pub struct SigningContext<'a> {
    /// Region, for example `us-east-1`.
    pub region: &'a str,
    /// Service name, for example `rekognition`.
    pub service: &'a str,
    /// Credential used to sign.
    pub credential: &'a Credential,
    /// Signing time.
    pub time: DateTime,
}

impl<'a> SigningContext<'a> {
    /// Create a new signing context.
    pub fn new(
        service: &'a str,
        region: &'a str,
        credential: &'a Credential,
        time: DateTime,
    ) -> Self {
        Self {
            region,
            service,
            credential,
            time,
        }
    }

    /// Timestamp as `YYYYMMDDThhmmssZ`.
    pub fn amz_date(&self) -> String {
        format_iso8601(self.time)
    }

    /// Date stamp as `YYYYMMDD`, the first 8 characters of [`Self::amz_date`].
    pub fn date_stamp(&self) -> String {
        format_date(self.time)
    }

    /// Scope: `20150830/<region>/<service>/aws4_request`
    pub fn credential_scope(&self) -> String {
        format!(
            "{}/{}/{}/{AWS4_REQUEST}",
            self.date_stamp(),
            self.region,
            self.service
        )
    }
}

/// Format the `Authorization` header value.
///
/// `<algorithm> Credential=<access key>/<scope>, SignedHeaders=<a;b;c>, Signature=<hex>`
pub fn authorization_header(
    algorithm: &str,
    access_key_id: &str,
    credential_scope: &str,
    signed_headers: &[&str],
    signature: &str,
) -> String {
    format!(
        "{algorithm} Credential={access_key_id}/{credential_scope}, SignedHeaders={}, Signature={signature}",
        signed_headers.join(";")
    )
}

/// RequestSigner that implement AWS SigV4 for a single JSON POST.
///
/// Only header signing is supported. The request must not carry a query
/// string; every header on the request gets signed.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
#[derive(Debug, Clone)]
pub struct RequestSigner {
    service: String,
    region: String,
}

impl RequestSigner {
    /// Create a new signer for AWS V4.
    pub fn new(service: &str, region: &str) -> Self {
        Self {
            service: service.into(),
            region: region.into(),
        }
    }

    /// Sign the request with the time taken from the context clock.
    pub fn sign_request(
        &self,
        ctx: &Context,
        req: &mut Request<Bytes>,
        cred: &Credential,
    ) -> Result<()> {
        self.sign_request_at(req, cred, ctx.now())
    }

    /// Sign the request at the given time.
    ///
    /// Inserts `host` (when absent), `x-amz-date` and `authorization`.
    pub fn sign_request_at(
        &self,
        req: &mut Request<Bytes>,
        cred: &Credential,
        now: DateTime,
    ) -> Result<()> {
        if req.uri().query().is_some() {
            return Err(Error::request_invalid(
                "signing requests with query string is not supported",
            ));
        }

        let sctx = SigningContext::new(&self.service, &self.region, cred, now);
        let amz_date = sctx.amz_date();

        // Insert HOST header if not present.
        if req.headers().get(header::HOST).is_none() {
            let authority = req
                .uri()
                .authority()
                .ok_or_else(|| Error::request_invalid("request without authority can't be signed"))?
                .as_str()
                .to_string();
            req.headers_mut()
                .insert(header::HOST, HeaderValue::from_str(&authority)?);
        }
        req.headers_mut()
            .insert(X_AMZ_DATE, HeaderValue::from_str(&amz_date)?);
        // Never sign a stale authorization from a previous attempt.
        req.headers_mut().remove(header::AUTHORIZATION);

        let mut headers = CanonicalHeaders::new();
        for (name, value) in req.headers() {
            headers.insert(name.as_str(), value.to_str()?);
        }
        let signed_headers = headers.signed_header_names();

        // Hash exactly the bytes that will be transmitted.
        let payload_hash = hex_sha256(req.body());
        let creq = canonicalize(
            req.method(),
            req.uri().path(),
            &headers,
            &signed_headers,
            &payload_hash,
        )?;
        debug!("calculated canonical request: {creq}");

        let scope = sctx.credential_scope();
        debug!("calculated scope: {scope}");

        let string_to_sign = string_to_sign(&amz_date, &scope, &creq);
        debug!("calculated string to sign: {string_to_sign}");

        let signature = sign(
            &cred.secret_access_key,
            &sctx.date_stamp(),
            sctx.region,
            sctx.service,
            &string_to_sign,
        )?;

        let mut authorization = HeaderValue::from_str(&authorization_header(
            ALGORITHM,
            &cred.access_key_id,
            &scope,
            &signed_headers,
            &signature,
        ))
        .map_err(|e| {
            Error::credential_invalid("access key id is not a valid header value").with_source(e)
        })?;
        authorization.set_sensitive(true);

        req.headers_mut()
            .insert(header::AUTHORIZATION, authorization);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::X_AMZ_TARGET;
    use aws_credential_types::Credentials;
    use aws_sigv4::http_request::SignableBody;
    use aws_sigv4::http_request::SignableRequest;
    use aws_sigv4::http_request::SigningSettings;
    use aws_sigv4::sign::v4;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use snapcomps_core::time::parse_iso8601;
    use snapcomps_core::{ErrorKind, FixedClock};
    use std::time::SystemTime;

    const BODY: &str = r#"{"Image":{"Bytes":"aGVsbG8="},"MaxLabels":15,"MinConfidence":70}"#;

    fn test_time() -> DateTime {
        chrono::Utc
            .with_ymd_and_hms(2015, 8, 30, 12, 36, 0)
            .single()
            .expect("time must be valid")
    }

    fn test_credential() -> Credential {
        Credential::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY")
    }

    fn test_request(body: &str) -> Request<Bytes> {
        Request::builder()
            .method(http::Method::POST)
            .uri("https://rekognition.us-east-1.amazonaws.com/")
            .header(header::CONTENT_TYPE, "application/x-amz-json-1.1")
            .header(X_AMZ_TARGET, "RekognitionService.DetectLabels")
            .body(Bytes::from(body.to_string()))
            .expect("request must be valid")
    }

    fn authorization_of(req: &Request<Bytes>) -> &str {
        req.headers()[header::AUTHORIZATION]
            .to_str()
            .expect("authorization must be valid")
    }

    #[test]
    fn test_signing_context() {
        let cred = test_credential();
        let sctx = SigningContext::new("rekognition", "us-east-1", &cred, test_time());

        assert_eq!(sctx.amz_date(), "20150830T123600Z");
        assert_eq!(sctx.date_stamp(), "20150830");
        assert!(sctx.amz_date().starts_with(&sctx.date_stamp()));
        assert_eq!(
            sctx.credential_scope(),
            "20150830/us-east-1/rekognition/aws4_request"
        );
    }

    #[test]
    fn test_authorization_header() {
        let value = authorization_header(
            "AWS4-HMAC-SHA256",
            "AKIDEXAMPLE",
            "20150830/us-east-1/rekognition/aws4_request",
            &["content-type", "host", "x-amz-date", "x-amz-target"],
            "abc",
        );

        assert_eq!(
            value,
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/rekognition/aws4_request, SignedHeaders=content-type;host;x-amz-date;x-amz-target, Signature=abc"
        );
    }

    #[test]
    fn test_sign_request_known_vector() -> anyhow::Result<()> {
        let _ = env_logger::builder().is_test(true).try_init();

        let mut req = test_request(BODY);
        RequestSigner::new("rekognition", "us-east-1").sign_request_at(
            &mut req,
            &test_credential(),
            test_time(),
        )?;

        assert_eq!(req.headers()[X_AMZ_DATE], "20150830T123600Z");
        assert_eq!(
            req.headers()[header::HOST],
            "rekognition.us-east-1.amazonaws.com"
        );
        assert_eq!(
            authorization_of(&req),
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/rekognition/aws4_request, SignedHeaders=content-type;host;x-amz-date;x-amz-target, Signature=295ff2ded135e64cc8694a81609d27971a6f80be9279eb2e192365a9f6f3c385"
        );
        assert!(req.headers()[header::AUTHORIZATION].is_sensitive());
        Ok(())
    }

    #[test]
    fn test_sign_request_uses_context_clock() -> anyhow::Result<()> {
        let ctx = Context::new().with_clock(FixedClock(parse_iso8601("20150830T123600Z")?));
        let signer = RequestSigner::new("rekognition", "us-east-1");

        let mut a = test_request(BODY);
        signer.sign_request(&ctx, &mut a, &test_credential())?;
        let mut b = test_request(BODY);
        signer.sign_request_at(&mut b, &test_credential(), test_time())?;

        assert_eq!(authorization_of(&a), authorization_of(&b));
        Ok(())
    }

    #[test]
    fn test_sign_request_resign_is_stable() -> anyhow::Result<()> {
        let signer = RequestSigner::new("rekognition", "us-east-1");

        let mut req = test_request(BODY);
        signer.sign_request_at(&mut req, &test_credential(), test_time())?;
        let first = authorization_of(&req).to_string();
        signer.sign_request_at(&mut req, &test_credential(), test_time())?;

        assert_eq!(authorization_of(&req), first);
        Ok(())
    }

    #[test]
    fn test_sign_request_header_mutation_changes_signature() -> anyhow::Result<()> {
        let signer = RequestSigner::new("rekognition", "us-east-1");

        let mut a = test_request(BODY);
        signer.sign_request_at(&mut a, &test_credential(), test_time())?;

        let mut b = test_request(BODY);
        b.headers_mut().insert(
            X_AMZ_TARGET,
            HeaderValue::from_static("RekognitionService.DetectLabelz"),
        );
        signer.sign_request_at(&mut b, &test_credential(), test_time())?;

        let mut c = test_request(&BODY.replace("15", "16"));
        signer.sign_request_at(&mut c, &test_credential(), test_time())?;

        assert_ne!(authorization_of(&a), authorization_of(&b));
        assert_ne!(authorization_of(&a), authorization_of(&c));
        Ok(())
    }

    #[test]
    fn test_sign_request_rejects_query() {
        let mut req = test_request(BODY);
        *req.uri_mut() = "https://rekognition.us-east-1.amazonaws.com/?a=b"
            .parse()
            .expect("uri must be valid");

        let err = RequestSigner::new("rekognition", "us-east-1")
            .sign_request_at(&mut req, &test_credential(), test_time())
            .expect_err("query must be rejected");
        assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    }

    #[test]
    fn test_sign_request_repeated_header_is_joined() -> anyhow::Result<()> {
        let signer = RequestSigner::new("rekognition", "us-east-1");

        let mut a = test_request(BODY);
        a.headers_mut()
            .append("x-amz-meta", HeaderValue::from_static("first"));
        a.headers_mut()
            .append("x-amz-meta", HeaderValue::from_static("second"));
        signer.sign_request_at(&mut a, &test_credential(), test_time())?;

        let mut b = test_request(BODY);
        b.headers_mut()
            .insert("x-amz-meta", HeaderValue::from_static("first,second"));
        signer.sign_request_at(&mut b, &test_credential(), test_time())?;

        assert_eq!(authorization_of(&a), authorization_of(&b));
        assert!(authorization_of(&a).contains("x-amz-date;x-amz-meta;x-amz-target"));
        Ok(())
    }

    #[test]
    fn test_sign_request_access_key_with_control_char() {
        let mut req = test_request(BODY);

        let err = RequestSigner::new("rekognition", "us-east-1")
            .sign_request_at(
                &mut req,
                &Credential::new("AKIDEXAMPLE\r", "wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY"),
                test_time(),
            )
            .expect_err("control char must be rejected");
        assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
        assert_eq!(err.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_sign_request_empty_secret() {
        let mut req = test_request(BODY);

        let err = RequestSigner::new("rekognition", "us-east-1")
            .sign_request_at(&mut req, &Credential::new("AKIDEXAMPLE", ""), test_time())
            .expect_err("empty secret must be rejected");
        assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
        assert!(req.headers().get(header::AUTHORIZATION).is_none());
    }

    /// Cross check against the official aws-sigv4 implementation.
    #[test]
    fn test_sign_request_matches_aws_sigv4() -> anyhow::Result<()> {
        let now = test_time();
        let cred = test_credential();

        let mut expected_req = test_request(BODY);
        let id = Credentials::new(
            &cred.access_key_id,
            &cred.secret_access_key,
            None,
            None,
            "hardcoded-credentials",
        )
        .into();
        let sp = v4::SigningParams::builder()
            .identity(&id)
            .region("us-east-1")
            .name("rekognition")
            .time(SystemTime::from(now))
            .settings(SigningSettings::default())
            .build()
            .expect("signing params must be valid");

        let output = aws_sigv4::http_request::sign(
            SignableRequest::new(
                expected_req.method().as_str(),
                expected_req.uri().to_string(),
                expected_req
                    .headers()
                    .iter()
                    .map(|(k, v)| (k.as_str(), std::str::from_utf8(v.as_bytes()).unwrap())),
                SignableBody::Bytes(BODY.as_bytes()),
            )
            .unwrap(),
            &sp.into(),
        )?;
        let (aws_sig, _) = output.into_parts();
        aws_sig.apply_to_request_http1x(&mut expected_req);

        let mut actual_req = test_request(BODY);
        RequestSigner::new("rekognition", "us-east-1").sign_request_at(
            &mut actual_req,
            &cred,
            now,
        )?;

        assert_eq!(
            authorization_of(&expected_req),
            authorization_of(&actual_req)
        );
        assert_eq!(
            expected_req.headers()[X_AMZ_DATE],
            actual_req.headers()[X_AMZ_DATE]
        );
        Ok(())
    }
}
