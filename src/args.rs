use clap::{Args, Parser, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(Debug, Parser)]
#[clap(author, version, about)]
pub struct Cli {
    /// Load input and output settings from a TOML configuration file
    /// instead of the individual flags
    #[clap(long)]
    pub config_file: Option<String>,

    /// Input files and parsing behavior
    #[clap(flatten)]
    pub input: InputConfig,

    /// Output method
    #[clap(flatten)]
    pub output: OutputConfig,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Path to the lookup table CSV (header row, then dstport,protocol,tag;
    /// ports must be integers in 0-65535)
    #[clap(short, long, default_value = "lookup_table.csv")]
    pub lookup_table: String,

    /// Path to the flow log, whitespace-delimited with at least 8 fields
    /// per line (no escaping: field values cannot contain whitespace;
    /// destination ports must be integers in 0-65535)
    #[clap(short, long, default_value = "flow_logs.txt")]
    pub flow_log: String,

    /// Skip malformed flow-log lines with a warning instead of aborting
    #[clap(long, action = clap::ArgAction::SetTrue)]
    pub lenient: bool,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output method
    #[clap(short, long, value_enum, default_value = "file")]
    pub output: ExportMethodType,

    /// File path for the report (used if method is File)
    #[clap(long, default_value = "output.txt")]
    pub export_path: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, Serialize, Deserialize)]
pub enum ExportMethodType {
    /// The report will be printed to the console
    Print,

    /// The report will be written to a text file
    File,
}

/// On-disk configuration, loaded with confy when --config-file is given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    pub input: InputConfig,
    pub output: OutputConfig,
}

impl Default for ConfigFile {
    fn default() -> Self {
        ConfigFile {
            input: InputConfig {
                lookup_table: "lookup_table.csv".to_string(),
                flow_log: "flow_logs.txt".to_string(),
                lenient: false,
            },
            output: OutputConfig {
                output: ExportMethodType::File,
                export_path: Some("output.txt".to_string()),
            },
        }
    }
}
