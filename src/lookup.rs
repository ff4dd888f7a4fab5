use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use log::debug;

use crate::errors::TagError;

/// Maps a (destination port, protocol name) pair to the tags assigned to it.
///
/// Multiple rows with the same key append: one key can carry several tags,
/// and a repeated (key, tag) row is kept twice rather than deduplicated.
/// Protocol names are lowercased on insert and on lookup.
///
/// Keyed port-first so lookups borrow the protocol name instead of
/// building a fresh key per record.
pub struct LookupTable {
    tags: HashMap<u16, HashMap<String, Vec<String>>>,
}

impl LookupTable {
    /// Loads the lookup table from a CSV file with a `dstport,protocol,tag`
    /// header row.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TagError> {
        let path = path.as_ref();
        debug!("Loading lookup table from {:?}", path);
        let file = File::open(path).map_err(|e| TagError::from_open(e, path))?;
        Self::from_reader(file)
    }

    /// Parses lookup rows from any reader. The first record is a header and
    /// is discarded without validation; every data row must have exactly
    /// three fields and an integer port. Blank lines are ignored rather
    /// than rejected.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TagError> {
        // flexible: the header is skipped unconditionally, so its field
        // count must not constrain the data rows.
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let mut tags: HashMap<u16, HashMap<String, Vec<String>>> = HashMap::new();
        for (index, record) in csv_reader.records().enumerate() {
            // Header occupies line 1.
            let line = index + 2;
            let record = record.map_err(|e| TagError::format(line, e.to_string()))?;

            if record.len() != 3 {
                return Err(TagError::format(
                    line,
                    format!("expected 3 fields (dstport,protocol,tag), got {}", record.len()),
                ));
            }

            let port: u16 = record[0].trim().parse().map_err(|_| {
                TagError::format(line, format!("invalid destination port {:?}", &record[0]))
            })?;
            let protocol = record[1].to_lowercase();
            let tag = record[2].to_string();

            tags.entry(port)
                .or_default()
                .entry(protocol)
                .or_default()
                .push(tag);
        }

        let table = LookupTable { tags };
        debug!("Lookup table loaded with {} keys", table.len());
        Ok(table)
    }

    /// Returns the tags for a (port, protocol) pair, or None if the pair has
    /// no entry. The protocol is expected in lowercase.
    pub fn tags(&self, port: u16, protocol: &str) -> Option<&[String]> {
        self.tags.get(&port)?.get(protocol).map(Vec::as_slice)
    }

    /// Number of distinct (port, protocol) keys.
    pub fn len(&self) -> usize {
        self.tags.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
