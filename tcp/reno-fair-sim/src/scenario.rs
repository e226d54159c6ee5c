// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::Result;
use anyhow::{ensure, Context};
use core::time::Duration;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// A set of bulk flows sharing a single drop-tail bottleneck
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Scenario {
    /// How long the experiment runs
    #[serde(with = "humantime_duration")]
    pub duration: Duration,
    /// Capacity of the bottleneck, in bits per second
    pub bandwidth: u64,
    /// Size of the bottleneck queue, in segments
    pub buffer: u32,
    /// Maximum segment size of every flow, in bytes
    pub mss: u32,
    /// Number of segments covered by each acknowledgment
    pub ack_segments: u32,
    pub flows: Vec<FlowGroup>,
}

/// Flows with the same propagation round trip time
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlowGroup {
    pub count: u32,
    #[serde(with = "humantime_duration")]
    pub rtt: Duration,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(40),
            bandwidth: 10_000_000,
            buffer: 20,
            mss: 1460,
            ack_segments: 1,
            flows: vec![
                FlowGroup {
                    count: 3,
                    rtt: Duration::from_millis(10),
                },
                FlowGroup {
                    count: 3,
                    rtt: Duration::from_millis(200),
                },
            ],
        }
    }
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("could not read scenario {}", path.display()))?;
        let scenario = Self::parse(&contents)
            .with_context(|| format!("invalid scenario {}", path.display()))?;
        Ok(scenario)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let scenario: Self = toml::from_str(contents)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn validate(&self) -> Result {
        ensure!(
            self.duration >= Duration::from_millis(1),
            "duration must be at least 1ms"
        );
        ensure!(self.bandwidth >= 8_000, "bandwidth must be at least 8kbit/s");
        ensure!(self.mss > 0, "mss must be greater than zero");
        ensure!(self.ack_segments > 0, "ack_segments must be greater than zero");
        ensure!(!self.flows.is_empty(), "at least one flow group is required");

        for group in &self.flows {
            ensure!(group.count > 0, "flow groups must contain at least one flow");
            ensure!(
                group.rtt >= Duration::from_millis(1),
                "flow round trip times must be at least 1ms"
            );
            ensure!(
                group.rtt <= Duration::from_secs(60),
                "flow round trip times must not exceed 60s"
            );
        }

        Ok(())
    }

    /// Returns the total number of flows
    pub fn flow_count(&self) -> usize {
        self.flows.iter().map(|group| group.count as usize).sum()
    }
}

mod humantime_duration {
    use core::time::Duration;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&humantime::format_duration(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let value = String::deserialize(deserializer)?;
        let value: humantime::Duration = value.parse().map_err(de::Error::custom)?;
        Ok(*value)
    }
}
