use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, warn};

use crate::errors::TagError;
use crate::lookup::LookupTable;
use crate::protocol::protocol_name;

/// How malformed flow-log lines are treated.
///
/// Strict is the default: any short or non-numeric line aborts the run.
/// Lenient skips such lines with a warning and counts them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseMode {
    Strict,
    Lenient,
}

/// Aggregated counters for one run. All counters start at zero and are only
/// ever incremented.
#[derive(Debug, Default)]
pub struct FlowStats {
    /// Tag -> number of records that matched a lookup row carrying the tag.
    pub tag_counts: HashMap<String, u64>,
    /// (destination port, lowercase protocol name) -> record count.
    pub pair_counts: HashMap<(u16, String), u64>,
    /// Records whose (port, protocol) pair has no lookup entry.
    pub untagged: u64,
    /// Total well-formed records processed.
    pub records: u64,
    /// Malformed lines skipped; always zero in strict mode.
    pub skipped: u64,
}

impl FlowStats {
    /// Tallies one record. Every record bumps its port/protocol counter;
    /// a record with a lookup match bumps every tag in the entry, otherwise
    /// the untagged counter is bumped exactly once.
    fn record(&mut self, port: u16, protocol: String, lookup: &LookupTable) {
        match lookup.tags(port, &protocol) {
            Some(tags) if !tags.is_empty() => {
                for tag in tags {
                    *self.tag_counts.entry(tag.clone()).or_insert(0) += 1;
                }
            }
            _ => self.untagged += 1,
        }
        *self.pair_counts.entry((port, protocol)).or_insert(0) += 1;
        self.records += 1;
    }
}

/// Streams a flow log from a file and tallies counts against the lookup
/// table, one line resident at a time.
pub fn process_file(
    path: impl AsRef<Path>,
    lookup: &LookupTable,
    mode: ParseMode,
) -> Result<FlowStats, TagError> {
    let path = path.as_ref();
    debug!("Processing flow log {:?}", path);
    let file = File::open(path).map_err(|e| TagError::from_open(e, path))?;
    process_reader(BufReader::new(file), lookup, mode)
}

/// Classifies flow-log lines from any buffered reader.
///
/// Fields are split on runs of whitespace; field 6 is the destination port
/// and field 7 the IANA protocol number. The format carries no escaping, so
/// field values can never contain whitespace themselves.
pub fn process_reader<R: BufRead>(
    reader: R,
    lookup: &LookupTable,
    mode: ParseMode,
) -> Result<FlowStats, TagError> {
    let mut stats = FlowStats::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = index + 1;

        match parse_line(&line, line_number) {
            Ok((port, protocol_number)) => {
                let protocol = protocol_name(protocol_number);
                stats.record(port, protocol, lookup);
            }
            Err(e) if mode == ParseMode::Lenient => {
                warn!("Skipping flow-log line: {}", e);
                stats.skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    debug!(
        "Processed {} records ({} untagged, {} skipped)",
        stats.records, stats.untagged, stats.skipped
    );
    Ok(stats)
}

/// Extracts (destination port, protocol number) from one log line.
fn parse_line(line: &str, line_number: usize) -> Result<(u16, u8), TagError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 8 {
        return Err(TagError::format(
            line_number,
            format!("expected at least 8 fields, got {}", fields.len()),
        ));
    }

    let port: u16 = fields[6].parse().map_err(|_| {
        TagError::format(
            line_number,
            format!("invalid destination port {:?}", fields[6]),
        )
    })?;
    let protocol_number: u8 = fields[7].parse().map_err(|_| {
        TagError::format(
            line_number,
            format!("invalid protocol number {:?}", fields[7]),
        )
    })?;

    Ok((port, protocol_number))
}
