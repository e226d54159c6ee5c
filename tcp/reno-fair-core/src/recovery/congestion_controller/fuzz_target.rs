// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::{
    connection::{Connection, Limits, State, INFINITE_SSTHRESH, MINIMUM_SSTHRESH},
    event::testing::Subscriber,
    recovery::{Algorithm, CongestionController, Strategy},
};
use bolero::{check, generator::*};
use core::time::Duration;

#[derive(Debug, TypeGenerator)]
enum Operation {
    Ack {
        #[generator(0..=100_000)]
        bytes_acked: u32,
    },
    /// A single acknowledgment covering an arbitrary amount of data
    StretchAck { bytes_acked: u32 },
    CongestionEvent,
    SpuriousCongestion,
    RttUpdated {
        #[generator(0..=2000)]
        millis: u64,
    },
    WindowLimited { is_window_limited: bool },
}

struct Model {
    /// The connection being fuzzed
    subject: Connection<Strategy>,
    subscriber: Subscriber,
    ssthresh_updates: u32,
}

impl Model {
    fn new(algorithm: Algorithm, limits: &Limits) -> Self {
        let mut subscriber = Subscriber::counting();
        let subject = Connection::new(Strategy::new(algorithm), limits, &mut subscriber);

        Self {
            subject,
            subscriber,
            ssthresh_updates: 0,
        }
    }

    fn apply(&mut self, operation: &Operation) {
        match operation {
            Operation::Ack { bytes_acked } | Operation::StretchAck { bytes_acked } => {
                self.on_ack(*bytes_acked)
            }
            Operation::CongestionEvent => self.on_congestion_event(),
            Operation::SpuriousCongestion => self.on_spurious_congestion(),
            Operation::RttUpdated { millis } => {
                self.subject.on_rtt_update(Duration::from_millis(*millis))
            }
            Operation::WindowLimited { is_window_limited } => {
                self.subject.set_window_limited(*is_window_limited)
            }
        }
    }

    fn on_ack(&mut self, bytes_acked: u32) {
        let before = *self.subject.state();

        self.subject.on_ack(bytes_acked, &mut self.subscriber);

        let after = self.subject.state();
        if !before.is_window_limited {
            assert_eq!(&before, after);
            return;
        }

        assert!(after.cwnd >= before.cwnd.min(after.cwnd_clamp));

        // slow start never credits congestion avoidance in the same call
        if before.is_slow_start() {
            assert_eq!(after.cwnd_cnt, before.cwnd_cnt);
            if self.subject.controller().algorithm() != Algorithm::ByteCounting {
                assert!(after.cwnd <= before.ssthresh.max(before.cwnd));
            }
        }
    }

    fn on_congestion_event(&mut self) {
        let before = *self.subject.state();

        self.subject.on_congestion_event(&mut self.subscriber);
        self.ssthresh_updates += 1;

        let after = self.subject.state();
        assert_eq!(after.prior_cwnd, before.cwnd);
        assert_eq!(after.ssthresh, (before.cwnd / 2).max(MINIMUM_SSTHRESH));
        assert!(after.cwnd <= before.cwnd);
        assert_eq!(after.cwnd_cnt, 0);
    }

    fn on_spurious_congestion(&mut self) {
        let before = *self.subject.state();

        self.subject.on_spurious_congestion(&mut self.subscriber);

        let after = self.subject.state();
        match self.subject.controller().algorithm() {
            Algorithm::ByteCounting => {
                let expected = before.cwnd.max(before.prior_cwnd).min(before.cwnd_clamp);
                assert_eq!(after.cwnd, expected);
            }
            _ => assert_eq!(after.cwnd, before.cwnd),
        }
    }

    fn invariants(&self) {
        let state = self.subject.state();

        assert!(state.cwnd >= 1);
        assert!(state.cwnd <= state.cwnd_clamp);
        assert!(state.ssthresh >= MINIMUM_SSTHRESH);
        assert!(state.ssthresh <= INFINITE_SSTHRESH);

        assert_eq!(self.subscriber.connection_started, 1);
        assert_eq!(
            self.subscriber.slow_start_threshold_updated,
            self.ssthresh_updates
        );
    }
}

#[test]
fn reno_fuzz() {
    check!()
        .with_generator((
            gen::<Algorithm>(),
            1u32..=9000,
            1u32..=u32::MAX,
            gen::<Vec<Operation>>(),
        ))
        .for_each(|(algorithm, mss, cwnd_clamp, operations)| {
            let limits = Limits::new()
                .with_mss(*mss)
                .unwrap()
                .with_cwnd_clamp(*cwnd_clamp)
                .unwrap();
            let mut model = Model::new(*algorithm, &limits);

            for operation in operations.iter() {
                model.apply(operation);
                model.invariants();
            }
        });
}

/// Controllers are called with whatever the stack hands them, so arbitrary
/// state must never panic and the window must come back within bounds
#[test]
fn arbitrary_state_fuzz() {
    check!()
        .with_type::<(Algorithm, State, u32)>()
        .for_each(|(algorithm, state, bytes_acked)| {
            let cc = Strategy::new(*algorithm);
            let mut after = *state;

            assert!(cc.ssthresh(state) >= MINIMUM_SSTHRESH);
            let _ = cc.undo_cwnd(state);

            cc.on_ack(&mut after, *bytes_acked);

            if !state.is_window_limited {
                assert_eq!(&after, state);
            } else {
                assert!(after.cwnd >= 1);
                assert!(after.cwnd <= state.cwnd_clamp.max(1));
            }
        });
}
