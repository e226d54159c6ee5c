// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::{
    connection::{State, INFINITE_SSTHRESH, MINIMUM_SSTHRESH},
    recovery::{Algorithm, CongestionController},
};
use core::fmt;


/// How a [`Reno`] controller grows the window once an acknowledgment has
/// passed the window-limited check
pub trait Growth: 'static + Clone + Copy + fmt::Debug + PartialEq + Send + Sync {
    const ALGORITHM: Algorithm;

    /// Grows the window while `cwnd <= ssthresh`.
    ///
    /// Bytes the threshold doesn't let slow start consume are not passed on to
    /// congestion avoidance, so a window sitting at `ssthresh` stays there.
    #[inline]
    fn slow_start(&self, state: &mut State, bytes_acked: u32) {
        slow_start(state, bytes_acked);
    }

    /// Grows the window while `cwnd > ssthresh`
    fn congestion_avoidance(&self, state: &mut State, bytes_acked: u32);

    /// Returns the window to restore after a spurious congestion event
    #[inline]
    fn undo_cwnd(&self, state: &State) -> u32 {
        state.cwnd
    }
}

/// A Reno congestion controller parameterized by its window growth policy.
///
/// Initialization, the multiplicative decrease and the window-limited check are
/// shared by every policy:
///
/// * a new connection starts with a window of one segment and an infinite slow
///   start threshold
/// * a congestion event halves the window, never going below 2 segments
/// * a connection that isn't using its window doesn't grow it
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Reno<G> {
    growth: G,
}

impl<G: Growth> Reno<G> {
    pub const fn new(growth: G) -> Self {
        Self { growth }
    }

    #[inline]
    pub fn growth(&self) -> &G {
        &self.growth
    }
}

impl<G: Growth> CongestionController for Reno<G> {
    #[inline]
    fn name(&self) -> &'static str {
        G::ALGORITHM.name()
    }

    #[inline]
    fn init(&self, state: &mut State) {
        state.ssthresh = INFINITE_SSTHRESH;
        state.cwnd = 1;
    }

    #[inline]
    fn ssthresh(&self, state: &State) -> u32 {
        (state.cwnd >> 1).max(MINIMUM_SSTHRESH)
    }

    #[inline]
    fn on_ack(&self, state: &mut State, bytes_acked: u32) {
        // Growing a window the connection isn't filling would only allow
        // unvalidated bursts later on
        if !state.is_window_limited {
            return;
        }

        if state.is_slow_start() {
            self.growth.slow_start(state, bytes_acked);
        } else {
            self.growth.congestion_avoidance(state, bytes_acked);
        }

        state.clamp_cwnd();
    }

    #[inline]
    fn undo_cwnd(&self, state: &State) -> u32 {
        self.growth.undo_cwnd(state)
    }
}

/// Standard slow start: every acknowledged segment, full or partial, grows the
/// window by one segment until it reaches `ssthresh`.
///
/// Returns the acknowledged bytes left over once `ssthresh` is reached.
#[inline]
pub fn slow_start(state: &mut State, bytes_acked: u32) -> u32 {
    let segments = match bytes_acked.checked_div(state.mss) {
        Some(segments) if bytes_acked % state.mss != 0 => segments + 1,
        Some(segments) => segments,
        // without a segment size every acknowledgment counts as a single segment
        None => 1,
    };

    let cwnd = state.cwnd.saturating_add(segments).min(state.ssthresh);
    let grown = cwnd.saturating_sub(state.cwnd);
    state.cwnd = cwnd.min(state.cwnd_clamp);

    if grown >= segments {
        return 0;
    }

    bytes_acked.saturating_sub(grown.saturating_mul(state.mss))
}

/// Additive increase driven by a credit of acknowledged bytes.
///
/// Each time the credit covers `window` segments worth of bytes the window grows
/// by one segment. Credit earned while the window was larger is applied as a
/// single segment first. Policies inflate `window` to slow growth down or inflate
/// `bytes_acked` to speed it up.
#[inline]
pub fn increase_additive(state: &mut State, window: u32, bytes_acked: u64) {
    let threshold = window as u64 * state.mss as u64;

    if threshold == 0 {
        state.cwnd_cnt = 0;
        state.cwnd = state.cwnd.saturating_add(1).min(state.cwnd_clamp);
        return;
    }

    if state.cwnd_cnt >= threshold {
        state.cwnd_cnt = 0;
        state.cwnd = state.cwnd.saturating_add(1);
    }

    state.cwnd_cnt = state.cwnd_cnt.saturating_add(bytes_acked);

    if state.cwnd_cnt >= threshold {
        let delta = state.cwnd_cnt / threshold;
        state.cwnd_cnt -= delta * threshold;
        state.cwnd = state
            .cwnd
            .saturating_add(u32::try_from(delta).unwrap_or(u32::MAX));
    }

    state.cwnd = state.cwnd.min(state.cwnd_clamp);
}
