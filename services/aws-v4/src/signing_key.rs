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

//! Derived signing key chain.
//!
//! `secret → DateKey → RegionKey → ServiceKey → SigningKey`, where every step
//! is an HMAC-SHA256 keyed with the raw bytes of the previous step.

use std::fmt::{Debug, Formatter};

use snapcomps_core::hash::{hex_hmac_sha256, hmac_sha256};
use snapcomps_core::{Error, Result};

use crate::constants::AWS4_REQUEST;

macro_rules! derived_key {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq)]
        pub struct $name(Vec<u8>);

        impl $name {
            /// Raw key bytes.
            pub fn as_bytes(&self) -> &[u8] {
                &self.0
            }
        }

        // Key material must never reach logs.
        impl Debug for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(concat!(stringify!($name), "(***)"))
            }
        }
    };
}

derived_key!(
    /// `HMAC("AWS4" + secret, date_stamp)`
    DateKey
);
derived_key!(
    /// `HMAC(DateKey, region)`
    RegionKey
);
derived_key!(
    /// `HMAC(RegionKey, service)`
    ServiceKey
);
derived_key!(
    /// `HMAC(ServiceKey, "aws4_request")`, the key that signs the string to sign.
    SigningKey
);

impl DateKey {
    /// Derive the date key from the secret access key.
    ///
    /// An empty secret is rejected before any HMAC is computed.
    pub fn derive(secret: &str, date_stamp: &str) -> Result<Self> {
        if secret.is_empty() {
            return Err(Error::credential_invalid(
                "secret access key is empty, can't derive signing key",
            ));
        }

        let secret = format!("AWS4{secret}");
        Ok(Self(hmac_sha256(secret.as_bytes(), date_stamp.as_bytes())))
    }

    /// Scope the key to a region.
    pub fn region_key(&self, region: &str) -> RegionKey {
        RegionKey(hmac_sha256(&self.0, region.as_bytes()))
    }
}

impl RegionKey {
    /// Scope the key to a service.
    pub fn service_key(&self, service: &str) -> ServiceKey {
        ServiceKey(hmac_sha256(&self.0, service.as_bytes()))
    }
}

impl ServiceKey {
    /// Terminate the scope with `aws4_request`.
    pub fn signing_key(&self) -> SigningKey {
        SigningKey(hmac_sha256(&self.0, AWS4_REQUEST.as_bytes()))
    }
}

impl SigningKey {
    /// Run the full derivation chain.
    pub fn derive(secret: &str, date_stamp: &str, region: &str, service: &str) -> Result<Self> {
        Ok(DateKey::derive(secret, date_stamp)?
            .region_key(region)
            .service_key(service)
            .signing_key())
    }

    /// Hex encoded signature over the string to sign.
    pub fn sign(&self, string_to_sign: &str) -> String {
        hex_hmac_sha256(&self.0, string_to_sign.as_bytes())
    }
}

/// Compute the hex signature for a string to sign.
pub fn sign(
    secret: &str,
    date_stamp: &str,
    region: &str,
    service: &str,
    string_to_sign: &str,
) -> Result<String> {
    Ok(SigningKey::derive(secret, date_stamp, region, service)?.sign(string_to_sign))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use snapcomps_core::ErrorKind;
    use test_case::test_case;

    const SECRET: &str = "wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY";
    const DATE: &str = "20150830";
    const REGION: &str = "us-east-1";
    const SERVICE: &str = "rekognition";

    const REKOGNITION_STRING_TO_SIGN: &str = "AWS4-HMAC-SHA256\n20150830T123600Z\n20150830/us-east-1/rekognition/aws4_request\n424df8c00ff00c0dfefa3e7d5080f6b895190d0d47e35b49a2afb98a47cee437";

    #[test]
    fn test_key_chain_steps() -> anyhow::Result<()> {
        let date_key = DateKey::derive(SECRET, DATE)?;
        assert_eq!(
            hex::encode(date_key.as_bytes()),
            "68a9e4535ffbb09dcb6d25807a9ba5e3aef7cd00b3c57ed4b0c4a04988649f51"
        );

        let region_key = date_key.region_key(REGION);
        assert_eq!(
            hex::encode(region_key.as_bytes()),
            "85d1ad12f2880a35521589f2cd554a44a774ab293c4d7f25b532dde6c083059b"
        );

        let service_key = region_key.service_key(SERVICE);
        assert_eq!(
            hex::encode(service_key.as_bytes()),
            "ae9d3069d083da78a603c8507a867d132adbbe80de5208a512b2135d14b69b20"
        );

        let signing_key = service_key.signing_key();
        assert_eq!(
            hex::encode(signing_key.as_bytes()),
            "4925ba76256309e283c66033a980a10794b3eafc4e5d1b4e41d2371dcd0e4b53"
        );
        assert_eq!(
            signing_key,
            SigningKey::derive(SECRET, DATE, REGION, SERVICE)?
        );
        Ok(())
    }

    #[test]
    fn test_sign_known_vector() -> anyhow::Result<()> {
        let signature = sign(SECRET, DATE, REGION, SERVICE, REKOGNITION_STRING_TO_SIGN)?;
        assert_eq!(
            signature,
            "295ff2ded135e64cc8694a81609d27971a6f80be9279eb2e192365a9f6f3c385"
        );
        Ok(())
    }

    /// Published example from the AWS general reference (IAM ListUsers).
    #[test]
    fn test_sign_aws_documented_vector() -> anyhow::Result<()> {
        let secret = "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY";
        let key = SigningKey::derive(secret, DATE, REGION, "iam")?;
        assert_eq!(
            hex::encode(key.as_bytes()),
            "c4afb1cc5771d871763a393e44b703571b55cc28424d1a5e86da6ed3c154a4b9"
        );

        let string_to_sign = "AWS4-HMAC-SHA256\n20150830T123600Z\n20150830/us-east-1/iam/aws4_request\nf536975d06c0309214f805bb90ccff089219ecd68b2577efef23edd43b7e1a59";
        assert_eq!(
            key.sign(string_to_sign),
            "5d672d79c15b13162d9279b0855cfba6789a8edb4c82c400e06b5924a6f2b5d7"
        );
        Ok(())
    }

    #[test_case("" ; "empty")]
    #[test_case("x" ; "short")]
    #[test_case(REKOGNITION_STRING_TO_SIGN ; "rekognition")]
    fn test_sign_is_deterministic_hex(string_to_sign: &str) {
        let a = sign(SECRET, DATE, REGION, SERVICE, string_to_sign).unwrap();
        let b = sign(SECRET, DATE, REGION, SERVICE, string_to_sign).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.bytes().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_sign_each_scope_component_matters() {
        let base = sign(SECRET, DATE, REGION, SERVICE, "sts").unwrap();

        assert_ne!(base, sign(SECRET, "20150831", REGION, SERVICE, "sts").unwrap());
        assert_ne!(base, sign(SECRET, DATE, "us-west-2", SERVICE, "sts").unwrap());
        assert_ne!(base, sign(SECRET, DATE, REGION, "s3", "sts").unwrap());
        assert_ne!(base, sign("other", DATE, REGION, SERVICE, "sts").unwrap());
    }

    #[test]
    fn test_sign_empty_secret() {
        let err = sign("", DATE, REGION, SERVICE, "sts").expect_err("empty secret must fail");
        assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    }

    #[test]
    fn test_keys_debug_redacted() {
        let key = SigningKey::derive(SECRET, DATE, REGION, SERVICE).unwrap();
        assert_eq!(format!("{key:?}"), "SigningKey(***)");
        assert_eq!(
            format!("{:?}", DateKey::derive(SECRET, DATE).unwrap()),
            "DateKey(***)"
        );
    }
}
