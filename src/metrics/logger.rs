use super::StateCounts;
use crate::interactions::logger::headed_writer;
use crate::network::NodeState;
use anyhow::Result;
use csv::Writer;
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub const STATE_HEADER: [&str; 5] = ["round", "healthy", "compromised", "patched", "quarantined"];

/// Per-round node counts as CSV, one row per saved snapshot. Shares the
/// interaction export's framing: header first, CRLF rows.
pub struct StateLogger<W: Write> {
    writer: Writer<W>,
}

impl StateLogger<File> {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_writer(File::create(path)?)
    }
}

impl<W: Write> StateLogger<W> {
    pub fn from_writer(inner: W) -> Result<Self> {
        let writer = headed_writer(inner, &STATE_HEADER)?;
        Ok(Self { writer })
    }

    pub fn log_batch(&mut self, snapshots: &[StateCounts]) -> Result<()> {
        for snapshot in snapshots {
            let mut row = Vec::with_capacity(STATE_HEADER.len());
            row.push(snapshot.round.to_string());
            row.extend(NodeState::ALL.iter().map(|&state| snapshot.get(state).to_string()));
            self.writer.write_record(&row)?;
        }
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush state log: {}", e.error()))
    }
}
