//! Simulator: owns the configuration and the hierarchy it was built from.
//!
//! Requests are replayed strictly in order; each one (including any
//! propagation to L2 and any write-back it triggers) completes before the next
//! begins.

use std::io::BufRead;
use std::path::Path;

use tracing::info;

use super::loader::{self, TraceEntry, TraceReader};
use crate::common::Result;
use crate::config::Config;
use crate::core::Hierarchy;
use crate::stats::SimReport;

/// Top-level simulator.
#[derive(Debug, Clone)]
pub struct Simulator {
    config: Config,
    hierarchy: Hierarchy,
    requests: u64,
}

impl Simulator {
    /// Validates `config` and builds an empty hierarchy from it.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`](crate::common::SimError::Config) if the
    /// geometry is invalid.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            hierarchy: Hierarchy::new(&config),
            config,
            requests: 0,
        })
    }

    /// Configuration the hierarchy was built from.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The simulated hierarchy.
    pub const fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    /// Requests replayed so far.
    pub const fn requests(&self) -> u64 {
        self.requests
    }

    /// Replays a single request.
    pub fn step(&mut self, entry: TraceEntry) {
        self.hierarchy.access(entry.op, entry.addr);
        self.requests += 1;
    }

    /// Replays every entry of `entries` in order.
    pub fn run<I: IntoIterator<Item = TraceEntry>>(&mut self, entries: I) {
        for entry in entries {
            self.step(entry);
        }
    }

    /// Streams the trace file at `path` through the hierarchy.
    ///
    /// Entries before a malformed line have already been replayed when the
    /// error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Io`](crate::common::SimError::Io) if the file
    /// cannot be read, or [`SimError::Trace`](crate::common::SimError::Trace)
    /// on the first malformed line.
    pub fn run_trace(&mut self, path: &Path) -> Result<()> {
        self.replay(loader::open_trace(path)?)
    }

    /// Replays every entry of an already opened trace.
    ///
    /// Lets a caller open the trace (and fail on a missing file) before
    /// producing any output of its own.
    ///
    /// # Errors
    ///
    /// Returns the first error `trace` yields; entries before it have already
    /// been replayed.
    pub fn replay<R: BufRead>(&mut self, trace: TraceReader<R>) -> Result<()> {
        let path = trace.path().to_path_buf();
        for entry in trace {
            self.step(entry?);
        }
        info!(requests = self.requests, trace = %path.display(), "trace replay complete");
        Ok(())
    }

    /// Snapshot of counters and final contents.
    pub fn report(&self) -> SimReport {
        SimReport::new(self.config, self.hierarchy.reports())
    }
}
