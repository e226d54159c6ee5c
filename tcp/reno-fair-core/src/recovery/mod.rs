// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

pub use byte_counting::ByteCounting;
pub use congestion_controller::CongestionController;
pub use fairness::{Balanced, Gentle, Penalty, RttFair, Stable, Step, Tuned};
pub use reno::{Growth, Reno};
pub use strategy::{Algorithm, Strategy};

pub mod byte_counting;
pub mod congestion_controller;
pub mod fairness;
pub mod reno;
mod strategy;

#[cfg(test)]
mod simulation;
