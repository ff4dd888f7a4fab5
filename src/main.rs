mod args;
mod classifier;
mod errors;
mod lookup;
mod output;
mod protocol;
mod tests;

use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use log::{error, info};

use args::{Cli, ConfigFile, InputConfig, OutputConfig};
use classifier::{process_file, ParseMode};
use lookup::LookupTable;
use output::ReportWriter;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    // If a config file is provided, it replaces the individual flags.
    let (input, output) = if let Some(config_path) = cli.config_file {
        match confy::load_path::<ConfigFile>(config_path) {
            Ok(cfg_file) => (cfg_file.input, cfg_file.output),
            Err(e) => {
                error!("Error loading configuration file: {:?}", e);
                std::process::exit(1);
            }
        }
    } else {
        (cli.input, cli.output)
    };

    if let Err(e) = run(input, output) {
        error!("Error: {:?}", e);
        std::process::exit(1);
    }
}

fn run(input: InputConfig, output: OutputConfig) -> Result<(), anyhow::Error> {
    let start = Instant::now();

    let lookup = LookupTable::from_file(&input.lookup_table)
        .with_context(|| format!("loading lookup table {}", input.lookup_table))?;
    info!("Lookup table loaded: {} port/protocol keys", lookup.len());

    let mode = if input.lenient {
        ParseMode::Lenient
    } else {
        ParseMode::Strict
    };
    let stats = process_file(&input.flow_log, &lookup, mode)
        .with_context(|| format!("processing flow log {}", input.flow_log))?;
    info!(
        "Classified {} records: {} untagged, {} skipped",
        stats.records, stats.untagged, stats.skipped
    );

    let mut writer = ReportWriter::new(output.output, output.export_path)?;
    writer.write_report(&stats)?;
    writer.flush_and_close()?;

    info!("Duration: {:.4} seconds", start.elapsed().as_secs_f64());

    Ok(())
}
