// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Reno with Appropriate Byte Counting (RFC 3465).
//!
//! The window grows with the number of bytes acknowledged rather than the number
//! of acknowledgments received, so delayed or stretched ACKs don't slow it down.

use crate::{
    connection::State,
    recovery::{reno, Algorithm, Growth, Reno},
};

/// Window growth counted in acknowledged bytes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ByteCounting;

impl ByteCounting {
    pub const fn new() -> Self {
        Self
    }
}

impl Growth for ByteCounting {
    const ALGORITHM: Algorithm = Algorithm::ByteCounting;

    /// Grows the window by the number of whole segments acknowledged.
    ///
    /// An acknowledgment smaller than a segment still counts as one so small ACKs
    /// can't stall the window. The threshold does not cap the increase.
    #[inline]
    fn slow_start(&self, state: &mut State, bytes_acked: u32) {
        let increment = match bytes_acked.checked_div(state.mss) {
            Some(0) | None => 1,
            Some(segments) => segments,
        };

        state.cwnd = state.cwnd.saturating_add(increment);
    }

    /// Grows the window by one segment per window of acknowledged bytes.
    ///
    /// An acknowledgment covering one or more full windows is applied at once and
    /// the remainder is dropped. Anything smaller goes to the credit accumulator.
    #[inline]
    fn congestion_avoidance(&self, state: &mut State, bytes_acked: u32) {
        let target = state.cwnd_bytes();
        let bytes_acked = bytes_acked as u64;

        if target == 0 {
            state.cwnd = state.cwnd.saturating_add(1);
            return;
        }

        if bytes_acked >= target {
            let increment = bytes_acked / target;
            state.cwnd = state
                .cwnd
                .saturating_add(u32::try_from(increment).unwrap_or(u32::MAX));
        } else {
            reno::increase_additive(state, state.cwnd, bytes_acked);
        }
    }

    /// Never restores less than the window before the congestion event
    #[inline]
    fn undo_cwnd(&self, state: &State) -> u32 {
        state.cwnd.max(state.prior_cwnd)
    }
}

impl Reno<ByteCounting> {
    pub const fn byte_counting() -> Self {
        Self::new(ByteCounting)
    }
}
