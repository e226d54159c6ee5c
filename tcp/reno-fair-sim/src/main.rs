// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

pub use anyhow::Error;
use structopt::StructOpt;

pub type Result<T = (), E = Error> = core::result::Result<T, E>;

mod experiment;
mod list;
mod report;
mod run;
mod scenario;

#[derive(Debug, StructOpt)]
enum Args {
    Run(Box<run::Run>),
    List(list::List),
}

fn main() -> Result {
    let format = tracing_subscriber::fmt::format()
        .with_level(false) // don't include levels in formatted output
        .without_time() // experiments run on a simulated clock
        .with_ansi(false)
        .compact(); // Use a less verbose output format.

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .event_format(format)
        .init();

    match Args::from_args() {
        Args::Run(args) => args.run(),
        Args::List(args) => args.run(),
    }
}
