// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Observability hooks around the congestion controllers.
//!
//! Controllers never log on their own. The [`Connection`](crate::Connection)
//! binding reports every decision to a [`Subscriber`] after the controller
//! returns, so diagnostics stay out of the decision path.

use crate::connection::State;
use core::fmt;

#[cfg(feature = "event-tracing")]
pub mod tracing;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// The window growth phase an acknowledgment was processed in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    SlowStart,
    CongestionAvoidance,
    /// The connection wasn't sending enough to use a larger window
    Underutilized,
}

impl Phase {
    #[inline]
    pub fn of(state: &State) -> Self {
        if !state.is_window_limited {
            Self::Underutilized
        } else if state.is_slow_start() {
            Self::SlowStart
        } else {
            Self::CongestionAvoidance
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SlowStart => "slow_start",
            Self::CongestionAvoidance => "congestion_avoidance",
            Self::Underutilized => "underutilized",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A connection was bound to a controller and initialized
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct ConnectionStarted {
    pub algorithm: &'static str,
    pub cwnd: u32,
    pub ssthresh: u32,
    pub mss: u32,
    pub cwnd_clamp: u32,
}

/// An acknowledgment was handed to the controller
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct WindowUpdated {
    pub algorithm: &'static str,
    pub phase: Phase,
    pub bytes_acked: u32,
    pub previous_cwnd: u32,
    pub cwnd: u32,
    pub ssthresh: u32,
    pub smoothed_rtt_us: u32,
}

/// A congestion event moved the slow start threshold
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct SlowStartThresholdUpdated {
    pub algorithm: &'static str,
    pub previous_ssthresh: u32,
    pub ssthresh: u32,
    pub prior_cwnd: u32,
    pub cwnd: u32,
}

/// The window was restored after a spurious congestion event
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct WindowRestored {
    pub algorithm: &'static str,
    pub previous_cwnd: u32,
    pub cwnd: u32,
    pub prior_cwnd: u32,
}

/// Receives the events emitted by a [`Connection`](crate::Connection).
///
/// All callbacks default to doing nothing.
pub trait Subscriber {
    #[inline]
    fn on_connection_started(&mut self, event: &ConnectionStarted) {
        let _ = event;
    }

    #[inline]
    fn on_window_updated(&mut self, event: &WindowUpdated) {
        let _ = event;
    }

    #[inline]
    fn on_slow_start_threshold_updated(&mut self, event: &SlowStartThresholdUpdated) {
        let _ = event;
    }

    #[inline]
    fn on_window_restored(&mut self, event: &WindowRestored) {
        let _ = event;
    }
}

impl Subscriber for () {}

impl<T: Subscriber + ?Sized> Subscriber for &mut T {
    #[inline]
    fn on_connection_started(&mut self, event: &ConnectionStarted) {
        (**self).on_connection_started(event)
    }

    #[inline]
    fn on_window_updated(&mut self, event: &WindowUpdated) {
        (**self).on_window_updated(event)
    }

    #[inline]
    fn on_slow_start_threshold_updated(&mut self, event: &SlowStartThresholdUpdated) {
        (**self).on_slow_start_threshold_updated(event)
    }

    #[inline]
    fn on_window_restored(&mut self, event: &WindowRestored) {
        (**self).on_window_restored(event)
    }
}

impl<A: Subscriber, B: Subscriber> Subscriber for (A, B) {
    #[inline]
    fn on_connection_started(&mut self, event: &ConnectionStarted) {
        self.0.on_connection_started(event);
        self.1.on_connection_started(event);
    }

    #[inline]
    fn on_window_updated(&mut self, event: &WindowUpdated) {
        self.0.on_window_updated(event);
        self.1.on_window_updated(event);
    }

    #[inline]
    fn on_slow_start_threshold_updated(&mut self, event: &SlowStartThresholdUpdated) {
        self.0.on_slow_start_threshold_updated(event);
        self.1.on_slow_start_threshold_updated(event);
    }

    #[inline]
    fn on_window_restored(&mut self, event: &WindowRestored) {
        self.0.on_window_restored(event);
        self.1.on_window_restored(event);
    }
}

impl<T: Subscriber> Subscriber for Option<T> {
    #[inline]
    fn on_connection_started(&mut self, event: &ConnectionStarted) {
        if let Some(subscriber) = self {
            subscriber.on_connection_started(event);
        }
    }

    #[inline]
    fn on_window_updated(&mut self, event: &WindowUpdated) {
        if let Some(subscriber) = self {
            subscriber.on_window_updated(event);
        }
    }

    #[inline]
    fn on_slow_start_threshold_updated(&mut self, event: &SlowStartThresholdUpdated) {
        if let Some(subscriber) = self {
            subscriber.on_slow_start_threshold_updated(event);
        }
    }

    #[inline]
    fn on_window_restored(&mut self, event: &WindowRestored) {
        if let Some(subscriber) = self {
            subscriber.on_window_restored(event);
        }
    }
}
