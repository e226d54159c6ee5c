// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use super::{ConnectionStarted, SlowStartThresholdUpdated, WindowRestored, WindowUpdated};

/// Emits every event as a `tracing` event under a `reno_fair` span
#[derive(Clone, Debug)]
pub struct Subscriber {
    root: ::tracing::Span,
}

impl Default for Subscriber {
    fn default() -> Self {
        let root = ::tracing::span!(target: "reno_fair", ::tracing::Level::DEBUG, "reno_fair");
        Self { root }
    }
}

impl super::Subscriber for Subscriber {
    #[inline]
    fn on_connection_started(&mut self, event: &ConnectionStarted) {
        let ConnectionStarted {
            algorithm,
            cwnd,
            ssthresh,
            mss,
            cwnd_clamp,
        } = event;
        ::tracing::event!(
            target: "connection_started",
            parent: self.root.id(),
            ::tracing::Level::DEBUG,
            algorithm,
            cwnd,
            ssthresh,
            mss,
            cwnd_clamp
        );
    }

    #[inline]
    fn on_window_updated(&mut self, event: &WindowUpdated) {
        let WindowUpdated {
            algorithm,
            phase,
            bytes_acked,
            previous_cwnd,
            cwnd,
            ssthresh,
            smoothed_rtt_us,
        } = event;
        ::tracing::event!(
            target: "window_updated",
            parent: self.root.id(),
            ::tracing::Level::TRACE,
            algorithm,
            phase = %phase,
            bytes_acked,
            previous_cwnd,
            cwnd,
            ssthresh,
            smoothed_rtt_us
        );
    }

    #[inline]
    fn on_slow_start_threshold_updated(&mut self, event: &SlowStartThresholdUpdated) {
        let SlowStartThresholdUpdated {
            algorithm,
            previous_ssthresh,
            ssthresh,
            prior_cwnd,
            cwnd,
        } = event;
        ::tracing::event!(
            target: "slow_start_threshold_updated",
            parent: self.root.id(),
            ::tracing::Level::DEBUG,
            algorithm,
            previous_ssthresh,
            ssthresh,
            prior_cwnd,
            cwnd
        );
    }

    #[inline]
    fn on_window_restored(&mut self, event: &WindowRestored) {
        let WindowRestored {
            algorithm,
            previous_cwnd,
            cwnd,
            prior_cwnd,
        } = event;
        ::tracing::event!(
            target: "window_restored",
            parent: self.root.id(),
            ::tracing::Level::DEBUG,
            algorithm,
            previous_cwnd,
            cwnd,
            prior_cwnd
        );
    }
}
