// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::Result;
use reno_fair_core::{registry::Entry, Registry};
use std::io::{self, Write};
use structopt::StructOpt;

/// Prints the registered strategies
#[derive(Debug, StructOpt)]
pub struct List {}

impl List {
    pub fn run(&self) -> Result {
        let stdout = io::stdout();
        write_entries(stdout.lock(), Registry::default().iter())?;
        Ok(())
    }
}

fn write_entries<'a, W: Write>(
    mut out: W,
    entries: impl Iterator<Item = &'a Entry>,
) -> io::Result<()> {
    for entry in entries {
        writeln!(out, "{:>2}\t{}", entry.key(), entry.name())?;
    }
    Ok(())
}
