// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use super::*;

/// Counts every event and optionally records its `Debug` output
#[derive(Clone, Debug, Default)]
pub struct Subscriber {
    record: bool,
    output: Vec<String>,
    pub connection_started: u32,
    pub window_updated: u32,
    pub slow_start_threshold_updated: u32,
    pub window_restored: u32,
}

impl Subscriber {
    /// Creates a subscriber that keeps the formatted events
    pub fn recording() -> Self {
        Self {
            record: true,
            ..Default::default()
        }
    }

    /// Creates a subscriber that only counts events
    pub fn counting() -> Self {
        Self::default()
    }

    pub fn output(&self) -> &[String] {
        &self.output
    }

    fn push<E: fmt::Debug>(&mut self, event: &E) {
        if self.record {
            self.output.push(format!("{event:?}"));
        }
    }
}

impl super::Subscriber for Subscriber {
    fn on_connection_started(&mut self, event: &ConnectionStarted) {
        self.connection_started += 1;
        self.push(event);
    }

    fn on_window_updated(&mut self, event: &WindowUpdated) {
        self.window_updated += 1;
        self.push(event);
    }

    fn on_slow_start_threshold_updated(&mut self, event: &SlowStartThresholdUpdated) {
        self.slow_start_threshold_updated += 1;
        self.push(event);
    }

    fn on_window_restored(&mut self, event: &WindowRestored) {
        self.window_restored += 1;
        self.push(event);
    }
}
