// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::{
    event::{self, Phase, Subscriber},
    recovery::{CongestionController, Strategy},
};
use core::time::Duration;

pub(crate) mod limits;
mod state;


pub use limits::{Limits, ValidationError};
pub use state::{State, INFINITE_SSTHRESH, MINIMUM_SSTHRESH};

/// Binds a congestion controller to the state of a single connection.
///
/// The controller is chosen when the connection is set up and can't be swapped
/// afterwards. The transport stack drives the binding on each lifecycle event and
/// every decision the controller makes is reported to the provided [`Subscriber`].
#[derive(Clone, Debug)]
pub struct Connection<C: CongestionController = Strategy> {
    controller: C,
    state: State,
}

impl<C: CongestionController> Connection<C> {
    /// Sets up the connection state from `limits` and initializes it with `controller`
    pub fn new<Sub: Subscriber>(controller: C, limits: &Limits, subscriber: &mut Sub) -> Self {
        let mut state = State::new(limits);
        controller.init(&mut state);

        subscriber.on_connection_started(&event::ConnectionStarted {
            algorithm: controller.name(),
            cwnd: state.cwnd,
            ssthresh: state.ssthresh,
            mss: state.mss,
            cwnd_clamp: state.cwnd_clamp,
        });

        Self { controller, state }
    }

    #[inline]
    pub fn controller(&self) -> &C {
        &self.controller
    }

    #[inline]
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Gives the transport stack access to the fields it maintains itself
    #[inline]
    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    #[inline]
    pub fn on_rtt_update(&mut self, smoothed_rtt: Duration) {
        self.state.set_smoothed_rtt(smoothed_rtt);
    }

    #[inline]
    pub fn set_window_limited(&mut self, is_window_limited: bool) {
        self.state.is_window_limited = is_window_limited;
    }

    /// Called for every acknowledgment that advances the window
    pub fn on_ack<Sub: Subscriber>(&mut self, bytes_acked: u32, subscriber: &mut Sub) {
        let phase = Phase::of(&self.state);
        let previous_cwnd = self.state.cwnd;

        self.controller.on_ack(&mut self.state, bytes_acked);

        subscriber.on_window_updated(&event::WindowUpdated {
            algorithm: self.controller.name(),
            phase,
            bytes_acked,
            previous_cwnd,
            cwnd: self.state.cwnd,
            ssthresh: self.state.ssthresh,
            smoothed_rtt_us: self.state.smoothed_rtt_us(),
        });
    }

    /// Called when the stack detects loss or an ECN congestion signal.
    ///
    /// The current window is remembered for a later undo and the window is
    /// reduced to the new slow start threshold, as Reno does on recovery entry.
    /// A window already below the threshold is left as is.
    pub fn on_congestion_event<Sub: Subscriber>(&mut self, subscriber: &mut Sub) {
        let previous_ssthresh = self.state.ssthresh;

        self.state.prior_cwnd = self.state.cwnd;
        self.state.ssthresh = self.controller.ssthresh(&self.state);
        self.state.cwnd = self.state.cwnd.min(self.state.ssthresh);
        self.state.cwnd_cnt = 0;
        self.state.clamp_cwnd();

        subscriber.on_slow_start_threshold_updated(&event::SlowStartThresholdUpdated {
            algorithm: self.controller.name(),
            previous_ssthresh,
            ssthresh: self.state.ssthresh,
            prior_cwnd: self.state.prior_cwnd,
            cwnd: self.state.cwnd,
        });
    }

    /// Called when the stack decides the last congestion event was spurious
    pub fn on_spurious_congestion<Sub: Subscriber>(&mut self, subscriber: &mut Sub) {
        let previous_cwnd = self.state.cwnd;

        self.state.cwnd = self.controller.undo_cwnd(&self.state);
        self.state.clamp_cwnd();

        subscriber.on_window_restored(&event::WindowRestored {
            algorithm: self.controller.name(),
            previous_cwnd,
            cwnd: self.state.cwnd,
            prior_cwnd: self.state.prior_cwnd,
        });
    }
}
