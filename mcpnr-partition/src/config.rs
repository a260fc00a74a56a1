//! Configuration for the partitioner binary (see SPEC_FULL.md
//! "Configuration"), built from clap argument matches the way
//! `mcpnr_placement::config::Config::from_args` is.

use std::path::PathBuf;

use anyhow::{Context, Result};

/// Resolved configuration for a single partitioning run.
#[derive(Clone, Debug)]
pub struct Config {
    pub input_file: PathBuf,
    pub output_file: PathBuf,
    pub partitions: usize,
    /// Overrides the default `min(32, hardware_parallelism)` trial count
    /// (`MCPNR_PARTITION_TRIALS` env var, spec §6).
    pub trial_override: Option<usize>,
}

impl Config {
    /// Construct the configuration from the clap argument matches.
    pub fn from_args(matches: &clap::ArgMatches) -> Result<Self> {
        let partitions: usize = matches
            .value_of("PARTITIONS")
            .unwrap()
            .parse()
            .context("parse PARTITIONS")?;

        let trial_override = match std::env::var("MCPNR_PARTITION_TRIALS") {
            Ok(v) => Some(v.parse().context("parse MCPNR_PARTITION_TRIALS")?),
            Err(std::env::VarError::NotPresent) => None,
            Err(e) => return Err(e).context("read MCPNR_PARTITION_TRIALS"),
        };

        Ok(Config {
            input_file: PathBuf::from(matches.value_of_os("INPUT").unwrap()),
            output_file: PathBuf::from(matches.value_of_os("OUTPUT").unwrap()),
            partitions,
            trial_override,
        })
    }
}
