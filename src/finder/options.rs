//! Options for file finding
//!
//! This module provides options for configuring the traversal and the way
//! the request chain is evaluated.

use crate::cli::Cli;

/// Longest path, in bytes, the walker will build (exclusive)
pub const MAX_PATH_LENGTH: usize = 4096;

/// How the request chain is run for each entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChainMode {
    /// Stop at the first predicate that does not match; every directory is
    /// descended.
    #[default]
    ShortCircuit,
    /// Run every item for every entry, actions unconditionally; descend only
    /// into directories that match all predicates.
    Exhaustive,
}

/// Options for configuring the file finding process
#[derive(Debug, Clone)]
pub struct FindOptions {
    /// Paths must stay strictly shorter than this many bytes
    pub max_path_length: usize,

    /// Chain evaluation strategy
    pub chain_mode: ChainMode,

    /// Show `-ls` modification times in UTC instead of local time
    pub utc_times: bool,
}

impl FindOptions {
    /// Create a new FindOptions with default values
    pub fn new() -> Self {
        Self {
            max_path_length: MAX_PATH_LENGTH,
            chain_mode: ChainMode::ShortCircuit,
            utc_times: false,
        }
    }

    /// Set the maximum path length
    pub fn with_max_path_length(mut self, max_path_length: usize) -> Self {
        self.max_path_length = max_path_length;
        self
    }

    /// Set the chain evaluation strategy
    pub fn with_chain_mode(mut self, chain_mode: ChainMode) -> Self {
        self.chain_mode = chain_mode;
        self
    }

    /// Set whether listing times are shown in UTC
    pub fn with_utc_times(mut self, utc_times: bool) -> Self {
        self.utc_times = utc_times;
        self
    }

    /// Create FindOptions from CLI arguments
    pub fn from_cli(cli: &Cli) -> Self {
        let chain_mode = if cli.eager_actions {
            ChainMode::Exhaustive
        } else {
            ChainMode::ShortCircuit
        };

        Self::new()
            .with_chain_mode(chain_mode)
            .with_utc_times(cli.utc)
    }
}

impl Default for FindOptions {
    fn default() -> Self {
        Self::new()
    }
}
