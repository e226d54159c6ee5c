// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use super::{rtt_ratio, Step};
use crate::{
    connection::limits::{self, setter},
    recovery::{Algorithm, Reno},
};
use core::time::Duration;

/// A heavily damped proportional boost: `1 + (current_rtt / base_rtt) / 6`,
/// capped at 4.
///
/// A connection needs at least six base RTTs of latency before it gets any boost
/// and the growth rate never more than quadruples.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Gentle {
    base_rtt_us: u32,
    max_ratio: u32,
}

/// Divides the raw RTT ratio before it is added to the baseline
const DAMPING: u32 = 6;

impl Gentle {
    pub const DEFAULT_BASE_RTT: Duration = Duration::from_millis(10);
    pub const DEFAULT_MAX_RATIO: u32 = 4;

    pub const fn new() -> Self {
        Self {
            base_rtt_us: Self::DEFAULT_BASE_RTT.as_micros() as u32,
            max_ratio: Self::DEFAULT_MAX_RATIO,
        }
    }

    setter!(
        /// Sets the RTT above which a connection's growth is boosted
        with_base_rtt,
        base_rtt_us,
        Duration,
        limits::rtt_micros
    );
    setter!(
        /// Sets the largest factor applied to the acknowledged bytes
        with_max_ratio,
        max_ratio,
        u32,
        limits::non_zero
    );

    pub fn base_rtt(&self) -> Duration {
        Duration::from_micros(self.base_rtt_us as u64)
    }

    #[inline]
    pub fn step(&self, current_rtt_us: u32, cwnd: u32, bytes_acked: u32) -> Step {
        let mut ratio = 1;

        if current_rtt_us > self.base_rtt_us {
            let raw = rtt_ratio(current_rtt_us, self.base_rtt_us);
            ratio = (1 + raw / DAMPING).min(self.max_ratio);
        }

        Step::boosted(cwnd, bytes_acked, ratio)
    }
}

impl_growth!(Gentle, Algorithm::Gentle);

impl Reno<Gentle> {
    pub const fn gentle() -> Self {
        Self::new(Gentle::new())
    }
}
