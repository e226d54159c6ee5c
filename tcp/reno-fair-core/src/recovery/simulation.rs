// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::{
    connection::{Connection, Limits},
    recovery::{Algorithm, CongestionController, Strategy},
};
use core::{fmt, ops::Range, time::Duration};
use insta::assert_debug_snapshot;
use plotters::prelude::*;
use std::{
    env,
    path::{Path, PathBuf},
};

const CHART_DIMENSIONS: (u32, u32) = (1024, 768);

// These simulations are too slow for Miri
#[test]
#[cfg_attr(miri, ignore)]
fn loss_at_100_packets_slow_path_test() {
    for algorithm in Algorithm::ALL {
        loss_at_100_packets(Strategy::new(algorithm), Duration::from_millis(200), 40).finish();
    }
}

#[test]
#[cfg_attr(miri, ignore)]
fn loss_at_100_packets_fast_path_test() {
    for algorithm in Algorithm::ALL {
        loss_at_100_packets(Strategy::new(algorithm), Duration::from_millis(10), 40).finish();
    }
}

#[test]
#[cfg_attr(miri, ignore)]
fn app_limited_30_packets_test() {
    for algorithm in Algorithm::ALL {
        app_limited_30_packets(Strategy::new(algorithm), 10).finish();
    }
}

#[derive(Debug)]
struct Simulation {
    name: String,
    description: &'static str,
    cc: &'static str,
    rounds: Vec<Round>,
}

struct Round {
    number: usize,
    cwnd: u32,
}

impl fmt::Debug for Round {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:>3}: pkts: {}", self.number, self.cwnd)
    }
}

impl Simulation {
    fn finish(&self) {
        if let Ok(dir) = env::var("RECOVERY_SIM_DIR") {
            let mut path = PathBuf::new();
            path.push(dir);
            path.push(self.filename());
            path.set_extension("svg");
            self.plot(&path);
        } else {
            self.assert_snapshot();
        }
    }

    fn plot<T: AsRef<Path> + ?Sized>(&self, path: &T) {
        let root_area = SVGBackend::new(path, CHART_DIMENSIONS).into_drawing_area();
        root_area.fill(&WHITE).expect("Could not fill chart");
        root_area
            .titled(&self.title(), ("sans-serif", 40))
            .expect("Could not add title");

        let mut ctx = ChartBuilder::on(&root_area)
            .set_label_area_size(LabelAreaPosition::Left, 120)
            .set_label_area_size(LabelAreaPosition::Bottom, 60)
            .margin(20)
            .margin_top(40)
            .caption(self.description, ("sans-serif", 20))
            .build_cartesian_2d(self.x_spec(), self.y_spec())
            .expect("Could not build chart");

        ctx.configure_mesh()
            .x_desc("Transmission Round")
            .label_style(("sans-serif", 20))
            .y_desc("Congestion window size (segments)")
            .draw()
            .expect("Could not configure mesh");

        ctx.draw_series(LineSeries::new(
            self.rounds.iter().map(|x| (x.number as i32, x.cwnd as i32)),
            GREEN,
        ))
        .expect("Could not draw series");
    }

    fn x_spec(&self) -> Range<i32> {
        0..(self.rounds.len() as i32 + 1)
    }

    fn y_spec(&self) -> Range<i32> {
        let max = self.rounds.iter().map(|r| r.cwnd as i32).max().unwrap_or(0);

        // Add a 5% buffer
        0..(max + max / 20 + 1)
    }

    fn assert_snapshot(&self) {
        assert_debug_snapshot!(self.filename(), self);
    }

    fn title(&self) -> String {
        format!("{} - {}", self.name, self.cc)
    }

    fn filename(&self) -> String {
        self.title().replace('.', "_").split_whitespace().collect()
    }
}

/// Simulates a network that drops a packet once the window reaches 100 segments
fn loss_at_100_packets(strategy: Strategy, rtt: Duration, num_rounds: usize) -> Simulation {
    Simulation {
        name: format!("Loss at 100 pkts {}ms", rtt.as_millis()),
        description: "Full congestion window utilization with loss encountered at 100 segments",
        cc: strategy.name(),
        rounds: simulate_constant_rtt(strategy, rtt, &[100], None, num_rounds),
    }
}

/// Simulates an application that never has more than 30 segments to send per round
fn app_limited_30_packets(strategy: Strategy, num_rounds: usize) -> Simulation {
    Simulation {
        name: "App Limited 30 pkts".to_string(),
        description: "App limited to 30 segments per round with no congestion experienced",
        cc: strategy.name(),
        rounds: simulate_constant_rtt(
            strategy,
            Duration::from_millis(50),
            &[],
            Some(30),
            num_rounds,
        ),
    }
}

/// Simulate the given number of rounds with drops occurring at the given window sizes, in
/// segments, and limited to the given number of segments per round
fn simulate_constant_rtt(
    strategy: Strategy,
    rtt: Duration,
    drops: &[u32],
    app_limit: Option<u32>,
    num_rounds: usize,
) -> Vec<Round> {
    let limits = Limits::default();
    let mut connection = Connection::new(strategy, &limits, &mut ());
    connection.on_rtt_update(rtt);

    let mut rounds = Vec::with_capacity(num_rounds);
    let mut drop_index = 0;

    for round in 0..num_rounds {
        let cwnd = connection.state().cwnd;
        rounds.push(Round {
            number: round,
            cwnd,
        });

        if drop_index < drops.len() && cwnd >= drops[drop_index] {
            connection.on_congestion_event(&mut ());
            drop_index += 1;
            continue;
        }

        let send_segments = cwnd.min(app_limit.unwrap_or(u32::MAX));
        connection.set_window_limited(send_segments == cwnd);

        // Each segment is acknowledged individually
        for _ in 0..send_segments {
            connection.on_ack(limits.mss(), &mut ());
        }
    }

    rounds
}
