// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod connection;
pub mod event;
pub mod recovery;

pub use connection::{Connection, Limits, State, ValidationError};
pub use recovery::{Algorithm, CongestionController, Strategy};

cfg_if::cfg_if! {
    if #[cfg(feature = "alloc")] {
        extern crate alloc;

        pub mod registry;
        pub use registry::Registry;
    }
}
