//! Concurrent smoke-test probe for the supermarket Communication API.
//!
//! # Overview
//! Executes the requests `probe-core` builds, prints raw response bodies to
//! stdout and logs everything else to stderr. The headline operation is
//! `ConcurrentRequestBatch`: the same purchase fired N times on N threads,
//! joined before the run continues.
//!
//! # Design
//! - `Transport` is the only I/O seam; `UreqTransport` is the real one.
//! - `OutputSink` serializes whole lines so parallel units never interleave
//!   inside a body.
//! - Per-unit failures travel back through join handles as values.

#[macro_use]
extern crate log;

pub mod batch;
pub mod cli;
pub mod error;
pub mod logger;
pub mod output;
pub mod runner;
pub mod transport;

pub use batch::{BatchReport, ConcurrentRequestBatch, UnitOutcome, DEFAULT_BATCH_COUNT};
pub use cli::{CartArgs, CartPreset, Cli, Command};
pub use error::{ProbeError, TransportError, UnitError};
pub use output::OutputSink;
pub use runner::{RunStatus, Runner};
pub use transport::{Transport, UreqTransport};
