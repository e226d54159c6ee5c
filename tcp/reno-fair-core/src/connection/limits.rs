// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use core::{fmt, time::Duration};

/// Returned when a configuration value is out of range
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValidationError(&'static str);

impl ValidationError {
    pub(crate) const fn new(reason: &'static str) -> Self {
        Self(reason)
    }

    pub const fn reason(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid configuration: {}", self.0)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ValidationError {}

/// Converts a configured duration into whole microseconds, rejecting
/// zero and anything that doesn't fit in a `u32`
pub(crate) fn rtt_micros(value: Duration) -> Result<u32, ValidationError> {
    let micros = u32::try_from(value.as_micros())
        .map_err(|_| ValidationError::new("round trip time exceeds u32::MAX microseconds"))?;
    non_zero(micros)
}

pub(crate) fn non_zero(value: u32) -> Result<u32, ValidationError> {
    if value == 0 {
        return Err(ValidationError::new("value must be greater than zero"));
    }
    Ok(value)
}

/// Generates a fallible `with_*` builder method that validates its input before
/// storing it in `$field`
macro_rules! setter {
    ($(#[$attr:meta])* $name:ident, $field:ident, $inner:ty, $validate:path) => {
        $(#[$attr])*
        pub fn $name(mut self, value: $inner) -> Result<Self, $crate::connection::ValidationError> {
            self.$field = $validate(value)?;
            Ok(self)
        }
    };
}

pub(crate) use setter;

/// Parameters the transport stack supplies for each new connection
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limits {
    mss: u32,
    cwnd_clamp: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self::new()
    }
}

impl Limits {
    /// An Ethernet MTU of 1500 bytes minus 40 bytes of IPv4 and TCP headers
    pub const DEFAULT_MSS: u32 = 1460;

    pub const fn new() -> Self {
        Self {
            mss: Self::DEFAULT_MSS,
            cwnd_clamp: u32::MAX,
        }
    }

    setter!(
        /// Sets the maximum segment size, in bytes
        with_mss,
        mss,
        u32,
        non_zero
    );
    setter!(
        /// Sets the upper bound for the congestion window, in segments
        with_cwnd_clamp,
        cwnd_clamp,
        u32,
        non_zero
    );

    pub const fn mss(&self) -> u32 {
        self.mss
    }

    pub const fn cwnd_clamp(&self) -> u32 {
        self.cwnd_clamp
    }
}
