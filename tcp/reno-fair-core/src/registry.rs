// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Lookup of congestion window strategies by name.
//!
//! A [`Registry`] is built once when the transport stack is configured and
//! connections are bound through it. Binding copies the strategy into the
//! [`Connection`], so removing a strategy later only affects new connections.

use crate::{
    connection::{Connection, Limits},
    event::Subscriber,
    recovery::{Algorithm, Strategy},
};
use alloc::{string::String, vec::Vec};
use core::fmt;


/// Matches `TCP_CA_NAME_MAX` in the Linux kernel, minus the terminating nul
pub const MAX_NAME_LEN: usize = 15;

#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The name is empty or longer than [`MAX_NAME_LEN`]
    InvalidName,
    /// Another strategy is already registered under the name
    NameInUse,
    /// Another strategy is already registered with the algorithm key
    KeyInUse { key: u32 },
    /// No strategy is registered under the name
    NotFound,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidName => write!(
                f,
                "strategy names must be between 1 and {MAX_NAME_LEN} bytes long"
            ),
            Self::NameInUse => write!(f, "a strategy with that name is already registered"),
            Self::KeyInUse { key } => {
                write!(f, "a strategy with key {key} is already registered")
            }
            Self::NotFound => write!(f, "no strategy is registered with that name"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// A strategy together with the name it is registered under
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    name: String,
    strategy: Strategy,
}

impl Entry {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn key(&self) -> u32 {
        self.strategy.algorithm().key()
    }

    #[inline]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }
}

#[derive(Clone, Debug)]
pub struct Registry {
    entries: Vec<Entry>,
}

impl Default for Registry {
    /// Registers every strategy under its default name
    fn default() -> Self {
        let entries = Algorithm::ALL
            .into_iter()
            .map(|algorithm| Entry {
                name: String::from(algorithm.name()),
                strategy: Strategy::new(algorithm),
            })
            .collect();

        Self { entries }
    }
}

impl Registry {
    /// Creates a registry without any strategies
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Makes `strategy` available under `name`.
    ///
    /// Both the name and the strategy's algorithm key must be unused.
    pub fn register<S: Into<Strategy>>(&mut self, name: &str, strategy: S) -> Result<(), Error> {
        if name.is_empty() || name.len() > MAX_NAME_LEN {
            return Err(Error::InvalidName);
        }

        let strategy = strategy.into();
        let key = strategy.algorithm().key();

        if self.get(name).is_some() {
            return Err(Error::NameInUse);
        }

        if self.get_by_key(key).is_some() {
            return Err(Error::KeyInUse { key });
        }

        self.entries.push(Entry {
            name: String::from(name),
            strategy,
        });

        Ok(())
    }

    /// Removes the strategy registered under `name`.
    ///
    /// Connections already bound to it keep their copy.
    pub fn unregister(&mut self, name: &str) -> Result<Entry, Error> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.name == name)
            .ok_or(Error::NotFound)?;

        Ok(self.entries.remove(index))
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    #[inline]
    pub fn get_by_key(&self, key: u32) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.key() == key)
    }

    /// Returns the registered strategies in registration order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Entry> + '_ {
        self.entries.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Binds a new connection to the strategy registered under `name`
    pub fn connect<Sub: Subscriber>(
        &self,
        name: &str,
        limits: &Limits,
        subscriber: &mut Sub,
    ) -> Result<Connection<Strategy>, Error> {
        let entry = self.get(name).ok_or(Error::NotFound)?;
        Ok(Connection::new(entry.strategy, limits, subscriber))
    }
}
