// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use super::Step;
use crate::{
    connection::limits::{self, setter},
    recovery::{Algorithm, Reno},
};
use core::time::Duration;

/// Throttles connections faster than the base RTT and boosts every other one by
/// the same factor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Balanced {
    base_rtt_us: u32,
    factor: u32,
}

impl Balanced {
    pub const DEFAULT_BASE_RTT: Duration = Duration::from_millis(20);
    pub const DEFAULT_FACTOR: u32 = 2;

    pub const fn new() -> Self {
        Self {
            base_rtt_us: Self::DEFAULT_BASE_RTT.as_micros() as u32,
            factor: Self::DEFAULT_FACTOR,
        }
    }

    setter!(
        /// Sets the RTT separating throttled and boosted connections
        with_base_rtt,
        base_rtt_us,
        Duration,
        limits::rtt_micros
    );
    setter!(
        /// Sets the factor used both to throttle and to boost
        with_factor,
        factor,
        u32,
        limits::non_zero
    );

    pub fn base_rtt(&self) -> Duration {
        Duration::from_micros(self.base_rtt_us as u64)
    }

    #[inline]
    pub fn step(&self, current_rtt_us: u32, cwnd: u32, bytes_acked: u32) -> Step {
        if current_rtt_us < self.base_rtt_us {
            Step::throttled(cwnd, bytes_acked, self.factor)
        } else {
            Step::boosted(cwnd, bytes_acked, self.factor)
        }
    }
}

impl_growth!(Balanced, Algorithm::Balanced);

impl Reno<Balanced> {
    pub const fn balanced() -> Self {
        Self::new(Balanced::new())
    }
}
