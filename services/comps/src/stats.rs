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

//! Percentile stats over listing prices.

use serde::Serialize;

use crate::constants::STATS_SOURCE;

/// Pick the `p`th percentile of ascending-sorted values.
///
/// Index is `floor(p / 100 * n)` clamped to the last element. Returns `0`
/// for empty input.
pub fn percentile(sorted: &[f64], p: usize) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = (p * sorted.len() / 100).min(sorted.len() - 1);
    sorted[idx]
}

/// Summary of the listing prices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceStats {
    /// 25th percentile.
    pub p25: f64,
    /// Median.
    pub p50: f64,
    /// 75th percentile.
    pub p75: f64,
    /// Number of prices the stats are taken over.
    pub sample: usize,
    /// Where the prices came from.
    pub source: &'static str,
}

impl PriceStats {
    /// Compute stats over prices in any order.
    pub fn from_prices(prices: impl IntoIterator<Item = f64>) -> Self {
        let mut sorted: Vec<f64> = prices.into_iter().collect();
        sorted.sort_by(f64::total_cmp);

        Self {
            p25: percentile(&sorted, 25),
            p50: percentile(&sorted, 50),
            p75: percentile(&sorted, 75),
            sample: sorted.len(),
            source: STATS_SOURCE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test_case(&[10.0, 20.0, 30.0, 40.0], 25 => 20.0; "four p25")]
    #[test_case(&[10.0, 20.0, 30.0, 40.0], 50 => 30.0; "four p50")]
    #[test_case(&[10.0, 20.0, 30.0, 40.0], 75 => 40.0; "four p75")]
    #[test_case(&[10.0, 20.0, 30.0, 40.0], 100 => 40.0; "clamped to last")]
    #[test_case(&[10.0, 20.0, 30.0, 40.0], 0 => 10.0; "first")]
    #[test_case(&[7.5], 75 => 7.5; "single")]
    #[test_case(&[], 50 => 0.0; "empty")]
    fn test_percentile(sorted: &[f64], p: usize) -> f64 {
        percentile(sorted, p)
    }

    #[test]
    fn test_stats_unsorted() {
        let stats = PriceStats::from_prices([40.0, 10.0, 30.0, 20.0]);

        pretty_assertions::assert_eq!(
            stats,
            PriceStats {
                p25: 20.0,
                p50: 30.0,
                p75: 40.0,
                sample: 4,
                source: "active-ebay",
            }
        );
    }

    #[test]
    fn test_stats_empty() -> anyhow::Result<()> {
        let stats = PriceStats::from_prices(Vec::<f64>::new());

        pretty_assertions::assert_eq!(
            serde_json::to_value(&stats)?,
            json!({ "p25": 0.0, "p50": 0.0, "p75": 0.0, "sample": 0, "source": "active-ebay" })
        );
        Ok(())
    }
}
