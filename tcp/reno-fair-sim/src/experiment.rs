// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! A fluid model of bulk flows sharing one drop-tail bottleneck.
//!
//! Time advances in fixed ticks. Every tick each flow offers `cwnd * mss` bytes
//! spread over its current round trip time, the bottleneck serves up to its
//! capacity and queues the rest. A queue that overflows marks a loss for every
//! flow that offered data during the tick. At the end of each of its rounds a flow
//! samples the round trip time and either takes a congestion event or has the
//! bytes delivered during the round acknowledged.

use crate::{
    report::{FlowReport, Report},
    scenario::Scenario,
};
use core::time::Duration;
use reno_fair_core::{event, Connection, Limits, Strategy};
use tracing::{debug, info};

const TICK: Duration = Duration::from_millis(1);
const TICK_US: u64 = 1_000;

struct Flow {
    id: usize,
    base_rtt_us: u64,
    connection: Connection<Strategy>,
    events: event::tracing::Subscriber,
    /// Remainder of the rate computation carried into the next tick
    carry: u64,
    /// Bytes sitting in the bottleneck queue
    queued: u64,
    /// Microseconds left in the current round
    round_remaining_us: u64,
    round_delivered: u64,
    round_lost: bool,
    srtt_us: Option<u64>,
    delivered: u64,
    losses: u32,
}

impl Flow {
    fn new(id: usize, rtt: Duration, strategy: Strategy, limits: &Limits) -> Self {
        let mut events = event::tracing::Subscriber::default();
        let mut connection = Connection::new(strategy, limits, &mut events);
        // bulk senders always have data to fill the window
        connection.set_window_limited(true);

        let base_rtt_us = rtt.as_micros() as u64;

        Self {
            id,
            base_rtt_us,
            connection,
            events,
            carry: 0,
            queued: 0,
            round_remaining_us: base_rtt_us,
            round_delivered: 0,
            round_lost: false,
            srtt_us: None,
            delivered: 0,
            losses: 0,
        }
    }

    /// Returns the bytes the flow sends during one tick at its current rate
    fn offer(&mut self, queue_delay_us: u64) -> u64 {
        let rtt_us = self.base_rtt_us + queue_delay_us;
        let scaled = self
            .connection
            .state()
            .cwnd_bytes()
            .saturating_mul(TICK_US)
            .saturating_add(self.carry);
        self.carry = scaled % rtt_us;
        scaled / rtt_us
    }

    fn end_round(&mut self, queue_delay_us: u64, ack_bytes: u32) {
        let sample_us = self.base_rtt_us + queue_delay_us;
        let srtt_us = match self.srtt_us {
            Some(srtt_us) => (srtt_us * 7 + sample_us) / 8,
            None => sample_us,
        };
        self.srtt_us = Some(srtt_us);
        self.connection.on_rtt_update(Duration::from_micros(srtt_us));

        if self.round_lost {
            self.losses += 1;
            self.connection.on_congestion_event(&mut self.events);
            debug!(
                flow = self.id,
                cwnd = self.connection.state().cwnd,
                ssthresh = self.connection.state().ssthresh,
                "loss"
            );
        } else {
            let mut remaining = self.round_delivered;
            while remaining > 0 {
                let bytes = remaining.min(ack_bytes as u64);
                remaining -= bytes;
                self.connection.on_ack(bytes as u32, &mut self.events);
            }
        }

        self.round_remaining_us = srtt_us;
        self.round_delivered = 0;
        self.round_lost = false;
    }
}

pub struct Experiment<'a> {
    scenario: &'a Scenario,
    strategy: Strategy,
    name: String,
}

impl<'a> Experiment<'a> {
    pub fn new(scenario: &'a Scenario, name: &str, strategy: Strategy) -> Self {
        Self {
            scenario,
            strategy,
            name: name.to_string(),
        }
    }

    pub fn run(&self) -> crate::Result<Report> {
        let scenario = self.scenario;
        scenario.validate()?;

        let limits = Limits::new().with_mss(scenario.mss)?;
        let mss = scenario.mss as u64;
        let ack_bytes = scenario.mss.saturating_mul(scenario.ack_segments);

        let capacity = scenario.bandwidth * TICK_US / 8 / 1_000_000;
        let buffer = scenario.buffer as u64 * mss;

        let mut flows = vec![];
        for group in &scenario.flows {
            for _ in 0..group.count {
                flows.push(Flow::new(flows.len(), group.rtt, self.strategy, &limits));
            }
        }

        info!(
            strategy = %self.name,
            flows = flows.len(),
            capacity,
            buffer,
            "experiment started"
        );

        let ticks = scenario.duration.as_micros() as u64 / TICK_US;
        let mut queue_delay_us = 0;
        let mut dropped = 0;
        let mut offered = vec![0; flows.len()];

        for _ in 0..ticks {
            let mut queued: u64 = flows.iter().map(|flow| flow.queued).sum();

            for (flow, offered) in flows.iter_mut().zip(offered.iter_mut()) {
                *offered = flow.offer(queue_delay_us);
            }
            let total_offered: u64 = offered.iter().sum();

            // anything beyond what the queue can hold after this tick's service is dropped
            let room = (buffer + capacity).saturating_sub(queued);
            let overflow = total_offered > room;
            for (flow, offered) in flows.iter_mut().zip(offered.iter()) {
                let admitted = if overflow {
                    if *offered > 0 {
                        flow.round_lost = true;
                    }
                    (*offered as u128 * room as u128 / total_offered as u128) as u64
                } else {
                    *offered
                };
                dropped += *offered - admitted;
                flow.queued += admitted;
                queued += admitted;
            }

            let served = queued.min(capacity);
            let mut remaining = 0;
            for flow in flows.iter_mut() {
                let share = if queued == 0 {
                    0
                } else {
                    served * flow.queued / queued
                };
                flow.queued -= share;
                flow.delivered += share;
                flow.round_delivered += share;
                remaining += flow.queued;
            }

            queue_delay_us = remaining * 8 * 1_000_000 / scenario.bandwidth;

            for flow in flows.iter_mut() {
                if flow.round_remaining_us > TICK_US {
                    flow.round_remaining_us -= TICK_US;
                } else {
                    flow.end_round(queue_delay_us, ack_bytes);
                }
            }
        }

        let duration = Duration::from_micros(ticks * TICK.as_micros() as u64);
        let flows: Vec<_> = flows
            .iter()
            .map(|flow| FlowReport {
                id: flow.id,
                rtt_ms: flow.base_rtt_us as f64 / 1_000.0,
                delivered: flow.delivered,
                throughput_mbps: throughput_mbps(flow.delivered, duration),
                cwnd: flow.connection.state().cwnd,
                ssthresh: flow.connection.state().ssthresh,
                losses: flow.losses,
            })
            .collect();

        let report = Report::new(self.name.clone(), scenario, duration, dropped, flows);

        info!(
            strategy = %self.name,
            jain_index = report.jain_index,
            utilization = report.utilization,
            "experiment finished"
        );

        Ok(report)
    }
}

pub fn throughput_mbps(bytes: u64, duration: Duration) -> f64 {
    let secs = duration.as_secs_f64();
    if secs == 0.0 {
        return 0.0;
    }
    bytes as f64 * 8.0 / secs / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::FlowGroup;
    use reno_fair_core::{Algorithm, Registry};

    fn short(flows: Vec<FlowGroup>) -> Scenario {
        Scenario {
            duration: Duration::from_secs(5),
            flows,
            ..Default::default()
        }
    }

    #[test]
    fn experiments_are_deterministic() {
        let scenario = short(Scenario::default().flows);
        let strategy = Strategy::new(Algorithm::RttFair);

        let a = Experiment::new(&scenario, "reno_fair", strategy).run().unwrap();
        let b = Experiment::new(&scenario, "reno_fair", strategy).run().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn bottleneck_capacity_is_respected() {
        let scenario = Scenario::default();
        let registry = Registry::default();

        for entry in registry.iter() {
            let report = Experiment::new(&scenario, entry.name(), entry.strategy())
                .run()
                .unwrap();

            let delivered: u64 = report.flows.iter().map(|flow| flow.delivered).sum();
            // 10 Mbit/s for 40 seconds
            assert!(delivered <= 50_000_000, "{}", entry.name());
            assert!(report.utilization <= 100.0, "{}", entry.name());
            assert!(report.jain_index > 0.0 && report.jain_index <= 1.0);
            assert_eq!(report.flows.len(), 6);
            assert_eq!(report.groups.len(), 2);

            for flow in &report.flows {
                assert!(flow.cwnd >= 1);
                assert!(flow.delivered > 0, "{} flow {}", entry.name(), flow.id);
            }
        }
    }

    #[test]
    fn shared_bottleneck_overflows() {
        let report = Experiment::new(&Scenario::default(), "reno_abc", Strategy::default())
            .run()
            .unwrap();

        assert!(report.dropped > 0);
        assert!(report.flows.iter().any(|flow| flow.losses > 0));
    }

    #[test]
    fn single_flow_without_buffer_pressure() {
        // a second of traffic can't fill a queue this large
        let scenario = Scenario {
            duration: Duration::from_secs(1),
            buffer: 10_000,
            ..short(vec![FlowGroup {
                count: 1,
                rtt: Duration::from_millis(100),
            }])
        };
        let strategy = Strategy::new(Algorithm::Stable);

        let report = Experiment::new(&scenario, "reno_final", strategy)
            .run()
            .unwrap();

        assert_eq!(report.dropped, 0);
        assert_eq!(report.flows[0].losses, 0);
        assert!(report.flows[0].cwnd > 1);
        assert_eq!(report.jain_index, 1.0);
    }

    #[test]
    fn throughput() {
        assert_eq!(throughput_mbps(1_250_000, Duration::from_secs(1)), 10.0);
        assert_eq!(throughput_mbps(1_250_000, Duration::ZERO), 0.0);
    }
}
