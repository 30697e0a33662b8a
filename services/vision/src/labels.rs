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

//! DetectLabels wire types.

use serde::{Deserialize, Serialize};

/// Labels requested from the remote service.
pub const MAX_LABELS: u32 = 15;
/// Minimum confidence, in percent, of a returned label.
pub const MIN_CONFIDENCE: u32 = 70;
/// Label names handed back to the caller.
pub const MAX_KEYWORDS: usize = 8;

/// Request body: `{"Image":{"Bytes":..},"MaxLabels":15,"MinConfidence":70}`
///
/// Field order is the serialization order, and the serialized bytes are
/// what gets hashed into the signature.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DetectLabelsRequest<'a> {
    image: Image<'a>,
    max_labels: u32,
    min_confidence: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct Image<'a> {
    bytes: &'a str,
}

impl<'a> DetectLabelsRequest<'a> {
    /// Build the request for a base64 image payload.
    pub fn new(base64_image: &'a str) -> Self {
        Self {
            image: Image {
                bytes: base64_image,
            },
            max_labels: MAX_LABELS,
            min_confidence: MIN_CONFIDENCE,
        }
    }
}

/// Response body, only the parts we read.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DetectLabelsResponse {
    #[serde(default)]
    labels: Option<Vec<Label>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Label {
    #[serde(default)]
    name: Option<String>,
}

/// What the vision endpoint returns on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisionOutput {
    /// Up to [`MAX_KEYWORDS`] label names, in remote order.
    pub keywords: Vec<String>,
    /// Number of labels the remote service returned.
    pub raw_count: usize,
}

impl DetectLabelsResponse {
    /// Keep the first labels in the order returned, plus the total count.
    ///
    /// A missing or null `Labels` field counts as no labels. A label without
    /// a name is counted but contributes no keyword.
    pub fn into_output(self) -> VisionOutput {
        let labels = self.labels.unwrap_or_default();
        let raw_count = labels.len();
        let keywords = labels
            .into_iter()
            .take(MAX_KEYWORDS)
            .filter_map(|l| l.name)
            .collect();

        VisionOutput {
            keywords,
            raw_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_request_body_layout() -> anyhow::Result<()> {
        let body = serde_json::to_string(&DetectLabelsRequest::new("aGVsbG8="))?;
        assert_eq!(
            body,
            r#"{"Image":{"Bytes":"aGVsbG8="},"MaxLabels":15,"MinConfidence":70}"#
        );
        Ok(())
    }

    #[test]
    fn test_output_truncates_keywords() -> anyhow::Result<()> {
        let names = [
            "Cat", "Dog", "Pet", "Animal", "Mammal", "Kitten", "Puppy", "Fur", "Whiskers", "Tail",
            "11th",
        ];
        let resp: DetectLabelsResponse = serde_json::from_value(json!({
            "Labels": names.iter().map(|n| json!({ "Name": n, "Confidence": 99.1 })).collect::<Vec<_>>(),
            "LabelModelVersion": "3.0",
        }))?;

        let output = resp.into_output();
        assert_eq!(output.raw_count, 11);
        assert_eq!(output.keywords.len(), 8);
        assert_eq!(output.keywords, names[..8].to_vec());
        Ok(())
    }

    #[test]
    fn test_output_without_labels() -> anyhow::Result<()> {
        for body in [json!({}), json!({ "Labels": null }), json!({ "Labels": [] })] {
            let resp: DetectLabelsResponse = serde_json::from_value(body)?;
            assert_eq!(
                resp.into_output(),
                VisionOutput {
                    keywords: vec![],
                    raw_count: 0
                }
            );
        }
        Ok(())
    }

    #[test]
    fn test_output_serialization() -> anyhow::Result<()> {
        let output = VisionOutput {
            keywords: vec!["Cat".to_string()],
            raw_count: 3,
        };
        assert_eq!(
            serde_json::to_value(&output)?,
            json!({ "keywords": ["Cat"], "rawCount": 3 })
        );
        Ok(())
    }
}
