use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use crate::error::Result;

#[derive(Debug, Clone)]
pub struct FastaRecord {
    pub id: String,
    pub description: Option<String>,
    pub sequence: String,
}

/// Streaming FASTA reader. Sequences are uppercased and stripped of
/// whitespace; CRLF line endings are tolerated.
pub struct FastaReader<R: BufRead> {
    reader: R,
    line: String,
    pending_header: Option<String>,
    done: bool,
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            pending_header: None,
            done: false,
        }
    }

    pub fn next_record(&mut self) -> Result<Option<FastaRecord>> {
        if self.done {
            return Ok(None);
        }

        let header = match self.pending_header.take() {
            Some(header) => header,
            None => loop {
                self.line.clear();
                if self.reader.read_line(&mut self.line)? == 0 {
                    self.done = true;
                    return Ok(None);
                }
                if let Some(rest) = self.line.trim().strip_prefix('>') {
                    break rest.trim().to_string();
                }
            },
        };

        let mut parts = header.splitn(2, char::is_whitespace);
        let id = parts.next().unwrap_or_default().to_string();
        let description = parts
            .next()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let mut sequence = String::new();
        loop {
            self.line.clear();
            if self.reader.read_line(&mut self.line)? == 0 {
                self.done = true;
                break;
            }
            if let Some(rest) = self.line.trim().strip_prefix('>') {
                self.pending_header = Some(rest.trim().to_string());
                break;
            }
            sequence.extend(
                self.line
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .map(|c| c.to_ascii_uppercase()),
            );
        }

        Ok(Some(FastaRecord {
            id,
            description,
            sequence,
        }))
    }
}

/// Reads every record in a FASTA file.
pub fn read_fasta<P: AsRef<Path>>(path: P) -> Result<Vec<FastaRecord>> {
    let file = File::open(path)?;
    let mut reader = FastaReader::new(BufReader::new(file));

    let mut records = Vec::new();
    while let Some(record) = reader.next_record()? {
        records.push(record);
    }
    Ok(records)
}

/// Writes one record, wrapping the sequence at 70 columns.
pub fn write_fasta<W: Write>(out: &mut W, header: &str, sequence: &str) -> Result<()> {
    writeln!(out, ">{}", header)?;
    for chunk in sequence.as_bytes().chunks(70) {
        out.write_all(chunk)?;
        out.write_all(b"\n")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_records_with_descriptions() {
        let data = b">seq1 beta lactamase\nATgC\n>seq2\nAAA\n";
        let mut reader = FastaReader::new(Cursor::new(&data[..]));

        let first = reader.next_record().unwrap().unwrap();
        assert_eq!(first.id, "seq1");
        assert_eq!(first.description.as_deref(), Some("beta lactamase"));
        assert_eq!(first.sequence, "ATGC");

        let second = reader.next_record().unwrap().unwrap();
        assert_eq!(second.id, "seq2");
        assert_eq!(second.description, None);
        assert_eq!(second.sequence, "AAA");

        assert!(reader.next_record().unwrap().is_none());
    }

    #[test]
    fn tolerates_crlf_and_wrapped_sequences() {
        let data = b">seq desc\r\nAC gt\r\nacgt\r\n";
        let mut reader = FastaReader::new(Cursor::new(&data[..]));

        let record = reader.next_record().unwrap().unwrap();
        assert_eq!(record.id, "seq");
        assert_eq!(record.sequence, "ACGTACGT");
    }

    #[test]
    fn skips_leading_junk_before_the_first_header() {
        let data = b"\n\n>seq\nACGT\n";
        let mut reader = FastaReader::new(Cursor::new(&data[..]));

        let record = reader.next_record().unwrap().unwrap();
        assert_eq!(record.id, "seq");
        assert_eq!(record.sequence, "ACGT");
        assert!(reader.next_record().unwrap().is_none());
    }

    #[test]
    fn writer_wraps_long_sequences() {
        let mut out = Vec::new();
        let sequence = "A".repeat(150);
        write_fasta(&mut out, "long", &sequence).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], ">long");
        assert_eq!(lines[1].len(), 70);
        assert_eq!(lines[2].len(), 70);
        assert_eq!(lines[3].len(), 10);
    }
}
