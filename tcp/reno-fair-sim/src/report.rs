// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::{experiment::throughput_mbps, scenario::Scenario};
use core::time::Duration;
use serde::Serialize;
use std::io;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    pub strategy: String,
    pub duration_secs: f64,
    pub bandwidth_mbps: f64,
    /// Jain's fairness index over the throughput of every flow
    pub jain_index: f64,
    /// Share of the bottleneck capacity that was delivered, in percent
    pub utilization: f64,
    /// Bytes the bottleneck queue had to drop
    pub dropped: u64,
    pub groups: Vec<GroupReport>,
    pub flows: Vec<FlowReport>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GroupReport {
    pub rtt_ms: f64,
    pub flows: u32,
    pub throughput_mbps: f64,
    pub mean_throughput_mbps: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FlowReport {
    pub id: usize,
    pub rtt_ms: f64,
    pub delivered: u64,
    pub throughput_mbps: f64,
    pub cwnd: u32,
    pub ssthresh: u32,
    pub losses: u32,
}

impl Report {
    /// Summarizes the flows of `scenario`, listed in the order of its flow groups
    pub fn new(
        strategy: String,
        scenario: &Scenario,
        duration: Duration,
        dropped: u64,
        flows: Vec<FlowReport>,
    ) -> Self {
        let mut groups = vec![];
        let mut remaining = &flows[..];
        for group in &scenario.flows {
            let (members, rest) = remaining.split_at((group.count as usize).min(remaining.len()));
            remaining = rest;

            let throughput_mbps: f64 = members.iter().map(|flow| flow.throughput_mbps).sum();
            groups.push(GroupReport {
                rtt_ms: group.rtt.as_micros() as f64 / 1_000.0,
                flows: group.count,
                throughput_mbps,
                mean_throughput_mbps: throughput_mbps / group.count as f64,
            });
        }

        let throughputs: Vec<_> = flows.iter().map(|flow| flow.throughput_mbps).collect();
        let delivered: u64 = flows.iter().map(|flow| flow.delivered).sum();
        let bandwidth_mbps = scenario.bandwidth as f64 / 1_000_000.0;
        let utilization = if bandwidth_mbps == 0.0 {
            0.0
        } else {
            throughput_mbps(delivered, duration) / bandwidth_mbps * 100.0
        };

        Self {
            strategy,
            duration_secs: duration.as_secs_f64(),
            bandwidth_mbps,
            jain_index: jain_index(&throughputs),
            utilization,
            dropped,
            groups,
            flows,
        }
    }
}

/// Computes Jain's fairness index, `(sum x)^2 / (n * sum x^2)`.
///
/// Returns 0 when there is nothing to compare.
pub fn jain_index(values: &[f64]) -> f64 {
    let sum: f64 = values.iter().sum();
    let sum_sq: f64 = values.iter().map(|value| value * value).sum();

    if sum_sq == 0.0 {
        return 0.0;
    }

    sum * sum / (values.len() as f64 * sum_sq)
}

pub fn write_json<W: io::Write>(out: W, reports: &[Report]) -> io::Result<()> {
    serde_json::to_writer_pretty(out, reports)?;
    Ok(())
}

pub fn write_table<W: io::Write>(mut out: W, reports: &[Report]) -> io::Result<()> {
    for report in reports {
        writeln!(
            out,
            "{}\tjain: {:.4}\tutilization: {:.1}%\tdropped: {}",
            report.strategy, report.jain_index, report.utilization, report.dropped
        )?;

        for group in &report.groups {
            writeln!(
                out,
                "  rtt {:>7.1}ms\tflows: {}\ttotal: {:.3}Mbit/s\tmean: {:.3}Mbit/s",
                group.rtt_ms, group.flows, group.throughput_mbps, group.mean_throughput_mbps
            )?;
        }

        for flow in &report.flows {
            writeln!(
                out,
                "  flow {:>3}\trtt: {:.1}ms\t{:.3}Mbit/s\tcwnd: {}\tssthresh: {}\tlosses: {}",
                flow.id, flow.rtt_ms, flow.throughput_mbps, flow.cwnd, flow.ssthresh, flow.losses
            )?;
        }
    }

    Ok(())
}
