// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::connection::Limits;
use core::time::Duration;

/// The slow start threshold a connection starts with. A window is never
/// expected to reach it, so every fresh connection begins in slow start.
///
/// Matches `TCP_INFINITE_SSTHRESH` in the Linux kernel.
pub const INFINITE_SSTHRESH: u32 = 0x7fff_ffff;

/// The smallest slow start threshold a congestion event can produce, in segments
pub const MINIMUM_SSTHRESH: u32 = 2;

/// `srtt` is kept scaled by 8, the same fixed point representation the
/// Linux kernel uses for `srtt_us`
const SRTT_SHIFT: u32 = 3;

/// Per-connection congestion state.
///
/// The transport stack owns this record and hands the congestion controller a
/// mutable view on every call. Window sizes are counted in segments of `mss` bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(any(test, feature = "generator"), derive(bolero_generator::TypeGenerator))]
pub struct State {
    /// Congestion window, in segments
    pub cwnd: u32,
    /// Slow start threshold, in segments
    pub ssthresh: u32,
    /// Maximum segment size, in bytes
    pub mss: u32,
    /// Smoothed round trip time in microseconds, scaled by 8
    pub srtt: u32,
    /// Upper bound for `cwnd`
    pub cwnd_clamp: u32,
    /// `cwnd` as it was right before the last congestion event
    pub prior_cwnd: u32,
    /// Acknowledged bytes credited toward the next additive increase
    pub cwnd_cnt: u64,
    /// Set by the stack when there is enough data pending to use a larger window
    pub is_window_limited: bool,
}

impl State {
    /// Creates the state for a connection that has not been initialized yet
    pub const fn new(limits: &Limits) -> Self {
        Self {
            cwnd: 1,
            ssthresh: INFINITE_SSTHRESH,
            mss: limits.mss(),
            srtt: 0,
            cwnd_clamp: limits.cwnd_clamp(),
            prior_cwnd: 0,
            cwnd_cnt: 0,
            is_window_limited: false,
        }
    }

    /// Returns the smoothed round trip time in microseconds, without the fixed point scaling
    #[inline]
    pub const fn smoothed_rtt_us(&self) -> u32 {
        self.srtt >> SRTT_SHIFT
    }

    /// Stores `rtt` as the smoothed round trip time, saturating at the largest
    /// value the scaled representation can hold
    #[inline]
    pub fn set_smoothed_rtt(&mut self, rtt: Duration) {
        let micros = u32::try_from(rtt.as_micros()).unwrap_or(u32::MAX);
        self.srtt = micros.saturating_mul(1 << SRTT_SHIFT);
    }

    /// Returns the smoothed round trip time as a `Duration`
    #[inline]
    pub fn smoothed_rtt(&self) -> Duration {
        Duration::from_micros(self.smoothed_rtt_us() as u64)
    }

    /// Returns true while the window grows exponentially
    #[inline]
    pub const fn is_slow_start(&self) -> bool {
        self.cwnd <= self.ssthresh
    }

    /// Forces `cwnd` into `[1, cwnd_clamp]`
    ///
    /// The lower bound wins if the stack configured a clamp of zero.
    #[inline]
    pub fn clamp_cwnd(&mut self) {
        self.cwnd = self.cwnd.min(self.cwnd_clamp).max(1);
    }

    /// Returns the congestion window in bytes
    #[inline]
    pub const fn cwnd_bytes(&self) -> u64 {
        self.cwnd as u64 * self.mss as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoothed_rtt_scaling() {
        let mut state = State::new(&Limits::default());

        state.set_smoothed_rtt(Duration::from_millis(200));
        assert_eq!(state.srtt, 200_000 << 3);
        assert_eq!(state.smoothed_rtt_us(), 200_000);
        assert_eq!(state.smoothed_rtt(), Duration::from_millis(200));

        // values that don't fit the scaled representation saturate
        state.set_smoothed_rtt(Duration::from_secs(3600));
        assert_eq!(state.srtt, u32::MAX);
        assert_eq!(state.smoothed_rtt_us(), u32::MAX >> 3);
    }

    #[test]
    fn clamp_cwnd() {
        let mut state = State::new(&Limits::default());
        state.cwnd_clamp = 10;

        state.cwnd = 11;
        state.clamp_cwnd();
        assert_eq!(state.cwnd, 10);

        state.cwnd = 0;
        state.clamp_cwnd();
        assert_eq!(state.cwnd, 1);

        state.cwnd_clamp = 0;
        state.cwnd = 5;
        state.clamp_cwnd();
        assert_eq!(state.cwnd, 1);
    }

    #[test]
    fn new_state_starts_in_slow_start() {
        let state = State::new(&Limits::default());
        assert_eq!(state.cwnd, 1);
        assert_eq!(state.ssthresh, INFINITE_SSTHRESH);
        assert!(state.is_slow_start());
        assert_eq!(state.cwnd_bytes(), 1460);
    }
}
