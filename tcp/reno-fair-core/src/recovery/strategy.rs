// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::{
    connection::State,
    recovery::{
        Balanced, ByteCounting, CongestionController, Gentle, Penalty, Reno, RttFair, Stable,
        Tuned,
    },
};
use core::fmt;

/// The fixed identifier of each congestion window strategy
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(any(test, feature = "generator"), derive(bolero_generator::TypeGenerator))]
#[repr(u32)]
pub enum Algorithm {
    ByteCounting = 1,
    RttFair = 2,
    Stable = 3,
    Gentle = 4,
    Tuned = 5,
    Penalty = 6,
    Balanced = 7,
}

impl Algorithm {
    pub const ALL: [Self; 7] = [
        Self::ByteCounting,
        Self::RttFair,
        Self::Stable,
        Self::Gentle,
        Self::Tuned,
        Self::Penalty,
        Self::Balanced,
    ];

    /// The key the algorithm is registered under
    #[inline]
    pub const fn key(self) -> u32 {
        self as u32
    }

    /// The name the algorithm is registered under by default
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ByteCounting => "reno_abc",
            Self::RttFair => "reno_fair",
            Self::Stable => "reno_final",
            Self::Gentle => "reno_gentle",
            Self::Tuned => "reno_tuned",
            Self::Penalty => "reno_penalty",
            Self::Balanced => "reno_balanced",
        }
    }

    pub fn from_key(key: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|algorithm| algorithm.key() == key)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|algorithm| algorithm.name() == name)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Any of the Reno congestion window strategies, selected at runtime
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    ByteCounting(Reno<ByteCounting>),
    RttFair(Reno<RttFair>),
    Stable(Reno<Stable>),
    Gentle(Reno<Gentle>),
    Tuned(Reno<Tuned>),
    Penalty(Reno<Penalty>),
    Balanced(Reno<Balanced>),
}

macro_rules! dispatch {
    ($strategy:expr, $cc:ident => $call:expr) => {
        match $strategy {
            Strategy::ByteCounting($cc) => $call,
            Strategy::RttFair($cc) => $call,
            Strategy::Stable($cc) => $call,
            Strategy::Gentle($cc) => $call,
            Strategy::Tuned($cc) => $call,
            Strategy::Penalty($cc) => $call,
            Strategy::Balanced($cc) => $call,
        }
    };
}

impl Strategy {
    /// Returns the strategy for `algorithm` with its default tuning constants
    pub const fn new(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::ByteCounting => Self::ByteCounting(Reno::byte_counting()),
            Algorithm::RttFair => Self::RttFair(Reno::rtt_fair()),
            Algorithm::Stable => Self::Stable(Reno::stable()),
            Algorithm::Gentle => Self::Gentle(Reno::gentle()),
            Algorithm::Tuned => Self::Tuned(Reno::tuned()),
            Algorithm::Penalty => Self::Penalty(Reno::penalty()),
            Algorithm::Balanced => Self::Balanced(Reno::balanced()),
        }
    }

    #[inline]
    pub const fn algorithm(&self) -> Algorithm {
        match self {
            Self::ByteCounting(_) => Algorithm::ByteCounting,
            Self::RttFair(_) => Algorithm::RttFair,
            Self::Stable(_) => Algorithm::Stable,
            Self::Gentle(_) => Algorithm::Gentle,
            Self::Tuned(_) => Algorithm::Tuned,
            Self::Penalty(_) => Algorithm::Penalty,
            Self::Balanced(_) => Algorithm::Balanced,
        }
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Self::new(Algorithm::ByteCounting)
    }
}

impl From<Algorithm> for Strategy {
    fn from(algorithm: Algorithm) -> Self {
        Self::new(algorithm)
    }
}

macro_rules! impl_from_growth {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<Reno<$variant>> for Strategy {
                fn from(cc: Reno<$variant>) -> Self {
                    Self::$variant(cc)
                }
            }

            impl From<$variant> for Strategy {
                fn from(growth: $variant) -> Self {
                    Self::$variant(Reno::new(growth))
                }
            }
        )*
    };
}

impl_from_growth!(ByteCounting, RttFair, Stable, Gentle, Tuned, Penalty, Balanced);

impl CongestionController for Strategy {
    #[inline]
    fn name(&self) -> &'static str {
        dispatch!(self, cc => cc.name())
    }

    #[inline]
    fn init(&self, state: &mut State) {
        dispatch!(self, cc => cc.init(state))
    }

    #[inline]
    fn ssthresh(&self, state: &State) -> u32 {
        dispatch!(self, cc => cc.ssthresh(state))
    }

    #[inline]
    fn on_ack(&self, state: &mut State, bytes_acked: u32) {
        dispatch!(self, cc => cc.on_ack(state, bytes_acked))
    }

    #[inline]
    fn undo_cwnd(&self, state: &State) -> u32 {
        dispatch!(self, cc => cc.undo_cwnd(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::Limits;
    use core::time::Duration;

    #[test]
    fn names_and_keys_are_unique() {
        for (i, a) in Algorithm::ALL.iter().enumerate() {
            for b in &Algorithm::ALL[i + 1..] {
                assert_ne!(a.name(), b.name());
                assert_ne!(a.key(), b.key());
            }
        }
    }

    #[test]
    fn lookup() {
        for algorithm in Algorithm::ALL {
            assert_eq!(Algorithm::from_name(algorithm.name()), Some(algorithm));
            assert_eq!(Algorithm::from_key(algorithm.key()), Some(algorithm));

            let strategy = Strategy::new(algorithm);
            assert_eq!(strategy.algorithm(), algorithm);
            assert_eq!(strategy.name(), algorithm.name());
        }

        assert_eq!(Algorithm::from_name("reno"), None);
        assert_eq!(Algorithm::from_key(0), None);
        assert_eq!(Algorithm::Stable.to_string(), "reno_final");
    }

    #[test]
    fn conversions() {
        assert_eq!(Strategy::default(), Strategy::new(Algorithm::ByteCounting));
        assert_eq!(
            Strategy::from(Reno::gentle()),
            Strategy::Gentle(Reno::new(Gentle::new()))
        );

        let tuned = Tuned::new().with_max_ratio(3).unwrap();
        assert_eq!(Strategy::from(tuned), Strategy::Tuned(Reno::new(tuned)));
        assert_ne!(Strategy::from(tuned), Strategy::new(Algorithm::Tuned));
    }

    #[test]
    fn dispatch_matches_direct_calls() {
        let mut direct = State::new(&Limits::new().with_mss(1000).unwrap());
        direct.is_window_limited = true;
        direct.set_smoothed_rtt(Duration::from_millis(200));
        let mut dispatched = direct;

        let reno = Reno::rtt_fair();
        let strategy = Strategy::from(reno);

        reno.init(&mut direct);
        strategy.init(&mut dispatched);
        assert_eq!(direct, dispatched);

        for bytes in [1000, 500, 3000, 1460, 20_000] {
            reno.on_ack(&mut direct, bytes);
            strategy.on_ack(&mut dispatched, bytes);
            assert_eq!(direct, dispatched);
        }

        direct.ssthresh = 2;
        dispatched.ssthresh = 2;
        reno.on_ack(&mut direct, 1000);
        strategy.on_ack(&mut dispatched, 1000);
        assert_eq!(direct, dispatched);

        assert_eq!(reno.ssthresh(&direct), strategy.ssthresh(&dispatched));
        assert_eq!(reno.undo_cwnd(&direct), strategy.undo_cwnd(&dispatched));
    }
}
