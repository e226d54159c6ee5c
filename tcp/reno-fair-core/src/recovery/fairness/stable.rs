// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use super::Step;
use crate::{
    connection::limits::{self, setter},
    recovery::{Algorithm, Reno},
};
use core::time::Duration;

/// Counts every acknowledgment of a connection slower than the base RTT twice.
///
/// The boost doesn't scale with the RTT, which doubles the growth rate of slow
/// connections without the bursts a proportional boost produces on very long paths.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stable {
    base_rtt_us: u32,
    boost: u32,
}

impl Stable {
    pub const DEFAULT_BASE_RTT: Duration = Duration::from_millis(10);
    pub const DEFAULT_BOOST: u32 = 2;

    pub const fn new() -> Self {
        Self {
            base_rtt_us: Self::DEFAULT_BASE_RTT.as_micros() as u32,
            boost: Self::DEFAULT_BOOST,
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
        /// Sets the factor applied to the acknowledged bytes of slow connections
        with_boost,
        boost,
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
            ratio = self.boost;
        }

        Step::boosted(cwnd, bytes_acked, ratio)
    }
}

impl_growth!(Stable, Algorithm::Stable);

impl Reno<Stable> {
    pub const fn stable() -> Self {
        Self::new(Stable::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boost_is_fixed() {
        let policy = Stable::new();

        assert_eq!(policy.step(10_001, 10, 1000).bytes_acked, 2_000);
        assert_eq!(policy.step(200_000, 10, 1000).bytes_acked, 2_000);
        assert_eq!(policy.step(10_000_000, 10, 1000).bytes_acked, 2_000);
    }

    #[test]
    fn boundary_is_exclusive() {
        let policy = Stable::new();
        assert_eq!(policy.step(10_000, 10, 1000), Step::baseline(10, 1000));
        assert_eq!(policy.step(5_000, 10, 1000), Step::baseline(10, 1000));
    }

    #[test]
    fn configured_boost() {
        let policy = Stable::new().with_boost(3).unwrap();
        assert_eq!(policy.step(20_000, 7, 1000), Step::boosted(7, 1000, 3));

        assert!(Stable::new().with_boost(0).is_err());
    }
}
