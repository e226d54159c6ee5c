// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use super::{rtt_ratio, Step};
use crate::{
    connection::limits::{self, setter},
    recovery::{Algorithm, Reno},
};
use core::time::Duration;

/// Credits connections slower than the base RTT with the acknowledged bytes
/// multiplied by `current_rtt / base_rtt`.
///
/// The boost is proportional and has no upper bound: a connection with twenty
/// times the base RTT grows twenty times as fast.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RttFair {
    base_rtt_us: u32,
}

impl RttFair {
    pub const DEFAULT_BASE_RTT: Duration = Duration::from_millis(10);

    pub const fn new() -> Self {
        Self {
            base_rtt_us: Self::DEFAULT_BASE_RTT.as_micros() as u32,
        }
    }

    setter!(
        /// Sets the RTT above which a connection's growth is boosted
        with_base_rtt,
        base_rtt_us,
        Duration,
        limits::rtt_micros
    );

    pub fn base_rtt(&self) -> Duration {
        Duration::from_micros(self.base_rtt_us as u64)
    }

    #[inline]
    pub fn step(&self, current_rtt_us: u32, cwnd: u32, bytes_acked: u32) -> Step {
        let mut ratio = 1;

        if current_rtt_us > self.base_rtt_us {
            ratio = rtt_ratio(current_rtt_us, self.base_rtt_us);
        }

        Step::boosted(cwnd, bytes_acked, ratio)
    }
}

impl_growth!(RttFair, Algorithm::RttFair);

impl Reno<RttFair> {
    pub const fn rtt_fair() -> Self {
        Self::new(RttFair::new())
    }
}
