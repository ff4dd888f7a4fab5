use std::fs::File;
use std::io::{BufWriter, Write};

use log::debug;

use crate::args::ExportMethodType;
use crate::classifier::FlowStats;
use crate::errors::TagError;

/// Writes the two-section count report to stdout or a file.
///
/// Output is fully buffered and flushed once via `flush_and_close`, which
/// the run function calls explicitly after the report is rendered.
pub struct ReportWriter {
    writer: BufWriter<Box<dyn Write>>,
}

impl ReportWriter {
    pub fn new(
        export_type: ExportMethodType,
        file_path: Option<String>,
    ) -> Result<Self, TagError> {
        let writer: BufWriter<Box<dyn Write>> = match export_type {
            ExportMethodType::File => {
                let path = file_path.unwrap_or_else(|| "output.txt".to_string());
                let file = File::create(&path)?;
                BufWriter::new(Box::new(file))
            }
            ExportMethodType::Print => BufWriter::new(Box::new(std::io::stdout())),
        };

        Ok(ReportWriter { writer })
    }

    /// Renders both report sections in their contractual sort order:
    /// tags ascending by string, pairs ascending by (numeric port,
    /// protocol string).
    pub fn write_report(&mut self, stats: &FlowStats) -> Result<(), TagError> {
        debug!("Writing report");
        write_sections(&mut self.writer, stats)?;
        Ok(())
    }

    /// Flushes the writer; without this the report may be incomplete.
    pub fn flush_and_close(&mut self) -> Result<(), TagError> {
        self.writer.flush()?;
        Ok(())
    }
}

fn write_sections<W: Write>(writer: &mut W, stats: &FlowStats) -> std::io::Result<()> {
    let mut tags: Vec<(&String, &u64)> = stats.tag_counts.iter().collect();
    tags.sort_by(|a, b| a.0.cmp(b.0));

    writeln!(writer, "Tag Counts:")?;
    writeln!(writer, "Tag,Count")?;
    for (tag, count) in tags {
        writeln!(writer, "{},{}", tag, count)?;
    }
    writeln!(writer, "Untagged,{}", stats.untagged)?;

    let mut pairs: Vec<(&(u16, String), &u64)> = stats.pair_counts.iter().collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));

    writeln!(writer)?;
    writeln!(writer, "Port/Protocol Combination Counts:")?;
    writeln!(writer, "Port,Protocol,Count")?;
    for ((port, protocol), count) in pairs {
        writeln!(writer, "{},{},{}", port, protocol, count)?;
    }

    Ok(())
}

/// Renders the report to an in-memory string. Used by tests to check the
/// deterministic-output contract without touching the filesystem.
pub fn render_report(stats: &FlowStats) -> String {
    let mut buffer = Vec::new();
    write_sections(&mut buffer, stats).expect("in-memory write");
    String::from_utf8(buffer).expect("report is UTF-8")
}
