use super::{ActionKind, InteractionRecord};
use crate::network::NodeId;
use anyhow::Result;
use csv::{Reader, Terminator, Writer, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

pub const HEADER: [&str; 5] = ["step", "src_agent", "dst_node", "action", "success"];

/// One exported CSV row. Field order and names are the file format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionRow {
    pub step: u64,
    pub src_agent: String,
    pub dst_node: NodeId,
    pub action: ActionKind,
    pub success: u8,
}

impl From<&InteractionRecord> for InteractionRow {
    fn from(record: &InteractionRecord) -> Self {
        Self {
            step: record.round,
            src_agent: record.src_agent.to_string(),
            dst_node: record.dst_node,
            action: record.action,
            success: u8::from(record.success),
        }
    }
}

/// Writes interaction records as CSV. The header goes out immediately,
/// so an empty log still produces a valid file. Rows end in CRLF.
pub struct InteractionLogger<W: Write> {
    writer: Writer<W>,
}

impl InteractionLogger<File> {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_writer(File::create(path)?)
    }
}

/// CSV writer with CRLF rows whose header is written up front rather than
/// derived from the first serialized row. Shared by every exported table.
pub(crate) fn headed_writer<W: Write>(inner: W, header: &[&str]) -> Result<Writer<W>> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::CRLF)
        .from_writer(inner);
    writer.write_record(header)?;
    Ok(writer)
}

impl<W: Write> InteractionLogger<W> {
    pub fn from_writer(inner: W) -> Result<Self> {
        let writer = headed_writer(inner, &HEADER)?;
        Ok(Self { writer })
    }

    pub fn log_batch(&mut self, records: &[InteractionRecord]) -> Result<()> {
        for record in records {
            self.writer.serialize(InteractionRow::from(record))?;
        }
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush interaction log: {}", e.error()))
    }
}

pub fn dump_interactions(records: &[InteractionRecord], path: impl AsRef<Path>) -> Result<()> {
    let mut logger = InteractionLogger::new(path)?;
    logger.log_batch(records)?;
    Ok(())
}

pub fn read_interactions(path: impl AsRef<Path>) -> Result<Vec<InteractionRow>> {
    read_rows(File::open(path)?)
}

pub fn read_rows<R: Read>(input: R) -> Result<Vec<InteractionRow>> {
    let mut reader = Reader::from_reader(input);
    let headers = reader.headers()?;
    if headers.iter().ne(HEADER) {
        anyhow::bail!("Unexpected interaction header: {:?}", headers);
    }

    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::AgentId;
    use crate::interactions::InteractionLog;

    fn export(log: &InteractionLog) -> Vec<u8> {
        let mut logger = InteractionLogger::from_writer(Vec::new()).unwrap();
        logger.log_batch(log.records()).unwrap();
        logger.into_inner().unwrap()
    }

    #[test]
    fn header_and_rows_are_bit_exact() {
        let mut log = InteractionLog::new();
        log.record(1, &AgentId::new("A0"), 3, ActionKind::Exploit, true);
        log.record(1, &AgentId::new("D2"), 0, ActionKind::Scan, false);

        let text = String::from_utf8(export(&log)).unwrap();
        assert_eq!(
            text,
            "step,src_agent,dst_node,action,success\r\n1,A0,3,exploit,1\r\n1,D2,0,scan,0\r\n"
        );
    }

    #[test]
    fn empty_log_still_has_header() {
        let text = String::from_utf8(export(&InteractionLog::new())).unwrap();
        assert_eq!(text, "step,src_agent,dst_node,action,success\r\n");
    }

    #[test]
    fn rows_read_back_in_order() {
        let mut log = InteractionLog::new();
        let a = AgentId::new("A1");
        for round in 1..=5 {
            log.record(round, &a, round as usize, ActionKind::Phish, round % 2 == 0);
        }

        let bytes = export(&log);
        let rows = read_rows(bytes.as_slice()).unwrap();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[1], InteractionRow {
            step: 2,
            src_agent: "A1".into(),
            dst_node: 2,
            action: ActionKind::Phish,
            success: 1,
        });

        let mut raw = csv::ReaderBuilder::new().has_headers(false).from_reader(bytes.as_slice());
        let records: Vec<csv::StringRecord> = raw.records().collect::<Result<_, _>>().unwrap();
        assert_eq!(records.len(), 6);
        assert_eq!(records[0].iter().collect::<Vec<_>>(), HEADER);
    }

    #[test]
    fn rejects_foreign_header() {
        let input = "ts,from,to\r\n1,2,3\r\n";
        assert!(read_rows(input.as_bytes()).is_err());
    }
}
