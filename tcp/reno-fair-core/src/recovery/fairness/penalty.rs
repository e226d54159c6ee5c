// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use super::Step;
use crate::{
    connection::limits::{self, setter},
    recovery::{Algorithm, Reno},
};
use core::time::Duration;

/// Slows connections faster than the base RTT down instead of speeding slow ones up.
///
/// A fast connection needs ten windows of acknowledged bytes for each segment of
/// growth. Connections at or above the base RTT grow like plain Reno. A connection
/// without an RTT sample yet counts as fast.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Penalty {
    base_rtt_us: u32,
    penalty: u32,
}

impl Penalty {
    pub const DEFAULT_BASE_RTT: Duration = Duration::from_millis(20);
    pub const DEFAULT_PENALTY: u32 = 10;

    pub const fn new() -> Self {
        Self {
            base_rtt_us: Self::DEFAULT_BASE_RTT.as_micros() as u32,
            penalty: Self::DEFAULT_PENALTY,
        }
    }

    setter!(
        /// Sets the RTT below which a connection's growth is throttled
        with_base_rtt,
        base_rtt_us,
        Duration,
        limits::rtt_micros
    );
    setter!(
        /// Sets how many windows a fast connection has to fill for each segment
        with_penalty,
        penalty,
        u32,
        limits::non_zero
    );

    pub fn base_rtt(&self) -> Duration {
        Duration::from_micros(self.base_rtt_us as u64)
    }

    #[inline]
    pub fn step(&self, current_rtt_us: u32, cwnd: u32, bytes_acked: u32) -> Step {
        if current_rtt_us < self.base_rtt_us {
            return Step::throttled(cwnd, bytes_acked, self.penalty);
        }

        Step::baseline(cwnd, bytes_acked)
    }
}

impl_growth!(Penalty, Algorithm::Penalty);

impl Reno<Penalty> {
    pub const fn penalty() -> Self {
        Self::new(Penalty::new())
    }
}
