use anyhow::{Context, Result};
use clap::{App, Arg};

use mcpnr_partition::config::Config;
use mcpnr_partition::error::PartitionError;
use mcpnr_partition::{io, orchestrate};

fn parse_args() -> Result<Config> {
    let matches = App::new("MCPNR Partition")
        .version(env!("CARGO_PKG_VERSION"))
        .author(clap::crate_authors!())
        .about("Fiduccia-Mattheyses multi-way hypergraph partitioner for the MCPNR flow")
        .arg(
            Arg::with_name("INPUT")
                .help("Input design, as a NumCells/NumNets cell-net description")
                .index(1)
                .required(true),
        )
        .arg(
            Arg::with_name("OUTPUT")
                .help("Output file location")
                .index(2)
                .required(true),
        )
        .arg(
            Arg::with_name("PARTITIONS")
                .help("Number of groups to partition the design into")
                .index(3)
                .required(true),
        )
        .get_matches();

    Config::from_args(&matches)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = parse_args()?;

    let text = std::fs::read_to_string(&config.input_file)
        .with_context(|| format!("reading input file {:?}", config.input_file))?;
    let design = io::parse_design(&text)?;

    let outcome = match orchestrate::partition(&design, config.partitions, config.trial_override) {
        Ok(outcome) => outcome,
        Err(PartitionError::NoSolution) => {
            log::warn!("no trial produced a usable partition; leaving {:?} untouched", config.output_file);
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    log::info!("best cutSize across all trials: {}", outcome.cut_size);

    let outf = std::fs::File::create(&config.output_file)
        .with_context(|| format!("creating output file {:?}", config.output_file))?;
    io::write_output(outf, outcome.cut_size, &outcome.groups)?;

    Ok(())
}
