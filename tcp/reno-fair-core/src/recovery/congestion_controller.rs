// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::connection::State;
use core::fmt;

#[cfg(test)]
mod fuzz_target;

/// The contract between the transport stack and a congestion window strategy.
///
/// A controller carries only fixed tuning constants. Everything that changes over
/// the life of a connection lives in the [`State`] the stack passes in, so a single
/// controller value may serve any number of connections. None of the operations
/// block or fail.
pub trait CongestionController: 'static + Clone + Copy + fmt::Debug + Send + Sync {
    /// The name the controller is registered under by default
    fn name(&self) -> &'static str;

    /// Called once when the connection is established
    fn init(&self, state: &mut State);

    /// Returns the new slow start threshold after a congestion event
    fn ssthresh(&self, state: &State) -> u32;

    /// Called for every acknowledgment that advances the window
    fn on_ack(&self, state: &mut State, bytes_acked: u32);

    /// Returns the window to restore after a congestion event turned out to be spurious
    fn undo_cwnd(&self, state: &State) -> u32;
}

#[cfg(any(test, feature = "testing"))]
pub mod testing {
    use super::*;

    /// Grows the window by one segment per acknowledgment and halves it on congestion
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct MockCC {
        pub ssthresh: Option<u32>,
    }

    impl CongestionController for MockCC {
        fn name(&self) -> &'static str {
            "mock"
        }

        fn init(&self, state: &mut State) {
            state.cwnd = 10;
        }

        fn ssthresh(&self, state: &State) -> u32 {
            self.ssthresh.unwrap_or(state.cwnd / 2)
        }

        fn on_ack(&self, state: &mut State, _bytes_acked: u32) {
            state.cwnd += 1;
        }

        fn undo_cwnd(&self, state: &State) -> u32 {
            state.prior_cwnd
        }
    }
}
