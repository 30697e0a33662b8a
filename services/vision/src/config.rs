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

use snapcomps_aws_v4::{AWS_REGION, DEFAULT_REGION};
use snapcomps_core::Context;

/// Service name used in the credential scope.
pub const SERVICE: &str = "rekognition";

/// Config for the vision endpoint.
///
/// Credentials are not part of the config; they are loaded through a
/// credential provider on every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisionConfig {
    /// Region of the Rekognition endpoint.
    ///
    /// - env value: [`AWS_REGION`]
    /// - default to `us-east-1`
    pub region: String,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
        }
    }
}

impl VisionConfig {
    /// Load config from env.
    pub fn from_env(ctx: &Context) -> Self {
        Self {
            region: ctx
                .env_var_non_empty(AWS_REGION)
                .unwrap_or_else(|| DEFAULT_REGION.to_string()),
        }
    }

    /// Host of the regional Rekognition endpoint.
    pub fn host(&self) -> String {
        format!("{SERVICE}.{}.amazonaws.com", self.region)
    }

    /// URL the signed request is sent to.
    pub fn endpoint(&self) -> String {
        format!("https://{}/", self.host())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapcomps_core::StaticEnv;
    use std::collections::HashMap;

    #[test]
    fn test_config_from_env() {
        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::from([(AWS_REGION.to_string(), "eu-west-1".to_string())]),
        });

        let cfg = VisionConfig::from_env(&ctx);
        assert_eq!(cfg.region, "eu-west-1");
        assert_eq!(cfg.endpoint(), "https://rekognition.eu-west-1.amazonaws.com/");
    }

    #[test]
    fn test_config_default_region() {
        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::from([(AWS_REGION.to_string(), "".to_string())]),
        });

        let cfg = VisionConfig::from_env(&ctx);
        assert_eq!(cfg, VisionConfig::default());
        assert_eq!(cfg.host(), "rekognition.us-east-1.amazonaws.com");
    }
}
