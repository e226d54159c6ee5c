// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::{
    experiment::Experiment,
    report::{self, Report},
    scenario::Scenario,
    Result,
};
use anyhow::anyhow;
use rayon::prelude::*;
use reno_fair_core::{registry::Entry, Registry};
use std::{io, path::PathBuf, str::FromStr};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
pub struct Run {
    /// Path to a TOML scenario. Runs 3 flows at 10ms and 3 flows at 200ms when omitted
    #[structopt(long)]
    scenario: Option<PathBuf>,

    /// Name of the strategy to run, or `all`
    #[structopt(long, default_value = "all")]
    strategy: String,

    #[structopt(long)]
    duration: Option<humantime::Duration>,

    /// Bottleneck capacity, in bits per second
    #[structopt(long)]
    bandwidth: Option<u64>,

    /// Bottleneck queue size, in segments
    #[structopt(long)]
    buffer: Option<u32>,

    /// Number of segments covered by each acknowledgment
    #[structopt(long)]
    ack_segments: Option<u32>,

    #[structopt(long, default_value = "table", possible_values = &["table", "json"])]
    format: Format,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Table,
    Json,
}

impl FromStr for Format {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            _ => Err(anyhow!("unsupported format {s:?}")),
        }
    }
}

impl Run {
    pub fn run(&self) -> Result {
        let reports = self.reports()?;

        let stdout = io::stdout();
        let out = stdout.lock();
        match self.format {
            Format::Table => report::write_table(out, &reports)?,
            Format::Json => report::write_json(out, &reports)?,
        }

        Ok(())
    }

    fn reports(&self) -> Result<Vec<Report>> {
        let scenario = self.scenario()?;
        let registry = Registry::default();
        let entries = self.entries(&registry)?;

        entries
            .par_iter()
            .map(|entry| Experiment::new(&scenario, entry.name(), entry.strategy()).run())
            .collect()
    }

    fn scenario(&self) -> Result<Scenario> {
        let mut scenario = match &self.scenario {
            Some(path) => Scenario::load(path)?,
            None => Scenario::default(),
        };

        if let Some(duration) = &self.duration {
            scenario.duration = **duration;
        }
        if let Some(bandwidth) = self.bandwidth {
            scenario.bandwidth = bandwidth;
        }
        if let Some(buffer) = self.buffer {
            scenario.buffer = buffer;
        }
        if let Some(ack_segments) = self.ack_segments {
            scenario.ack_segments = ack_segments;
        }

        scenario.validate()?;
        Ok(scenario)
    }

    fn entries<'a>(&self, registry: &'a Registry) -> Result<Vec<&'a Entry>> {
        if self.strategy == "all" {
            return Ok(registry.iter().collect());
        }

        let entry = registry.get(&self.strategy).ok_or_else(|| {
            let available: Vec<_> = registry.iter().map(Entry::name).collect();
            anyhow!(
                "unknown strategy {:?}, expected one of: all, {}",
                self.strategy,
                available.join(", ")
            )
        })?;

        Ok(vec![entry])
    }
}
