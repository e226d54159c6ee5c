// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Round trip time fairness policies for Reno congestion avoidance.
//!
//! Reno's additive increase adds one segment per round trip, so a connection with
//! a short RTT completes more rounds per second and takes a larger share of a
//! shared bottleneck. Each policy here compares the connection's smoothed RTT to a
//! base RTT and corrects for that bias in a different way, either by inflating the
//! acknowledged bytes credited to slow connections or by inflating the window that
//! fast connections have to fill before they can grow.
//!
//! Slow start, initialization, the slow start threshold and undo are shared with
//! plain Reno. An undo keeps the current window.

use crate::{connection::State, recovery::reno};

/// The input a fairness policy hands to the additive increase for one acknowledgment
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    /// The window, in segments, the credit has to cover for one segment of growth
    pub window: u32,
    /// The acknowledged bytes credited toward growth
    pub bytes_acked: u64,
}

impl Step {
    /// Unmodified Reno growth
    #[inline]
    pub const fn baseline(cwnd: u32, bytes_acked: u32) -> Self {
        Self {
            window: cwnd,
            bytes_acked: bytes_acked as u64,
        }
    }

    /// Credits `bytes_acked` multiplied by `ratio`
    #[inline]
    pub const fn boosted(cwnd: u32, bytes_acked: u32, ratio: u32) -> Self {
        Self {
            window: cwnd,
            bytes_acked: bytes_acked as u64 * ratio as u64,
        }
    }

    /// Requires `factor` windows of credit for each segment of growth
    #[inline]
    pub const fn throttled(cwnd: u32, bytes_acked: u32, factor: u32) -> Self {
        Self {
            window: cwnd.saturating_mul(factor),
            bytes_acked: bytes_acked as u64,
        }
    }

    #[inline]
    pub fn apply(self, state: &mut State) {
        reno::increase_additive(state, self.window, self.bytes_acked);
    }
}

/// Returns how many base RTTs fit in the current RTT
#[inline]
fn rtt_ratio(current_rtt_us: u32, base_rtt_us: u32) -> u32 {
    current_rtt_us.checked_div(base_rtt_us).unwrap_or(1)
}

/// Implements [`Growth`](crate::recovery::Growth) for a policy with a
/// `step(current_rtt_us, cwnd, bytes_acked)` method
macro_rules! impl_growth {
    ($policy:ident, $algorithm:expr) => {
        impl $crate::recovery::Growth for $policy {
            const ALGORITHM: $crate::recovery::Algorithm = $algorithm;

            #[inline]
            fn congestion_avoidance(&self, state: &mut $crate::connection::State, bytes_acked: u32) {
                self.step(state.smoothed_rtt_us(), state.cwnd, bytes_acked)
                    .apply(state);
            }
        }

        impl Default for $policy {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

mod balanced;
mod gentle;
mod penalty;
mod rtt_fair;
mod stable;
mod tuned;

pub use balanced::Balanced;
pub use gentle::Gentle;
pub use penalty::Penalty;
pub use rtt_fair::RttFair;
pub use stable::Stable;
pub use tuned::Tuned;
