//! Line-delimited JSON persistence for chunk sequences.
//!
//! One chunk per line with exactly `id`, `text`, `restricts`. This file
//! format is what the index service imports; keep it stable.

use super::Chunk;
use crate::error::Result;
use std::io::{BufRead, Write};
use std::path::Path;

/// Write chunks as JSONL to the given writer.
///
/// Propagates the first underlying write error; there is no partial-success
/// signaling.
pub fn write_chunks<W: Write>(chunks: &[Chunk], mut writer: W) -> Result<()> {
    for chunk in chunks {
        serde_json::to_writer(&mut writer, chunk)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Write chunks as JSONL to a file path.
pub fn write_chunks_to_path(chunks: &[Chunk], path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_chunks(chunks, std::io::BufWriter::new(file))
}

/// Read a JSONL chunk file back into memory. Blank lines are skipped.
pub fn read_chunks<R: BufRead>(reader: R) -> Result<Vec<Chunk>> {
    let mut chunks = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        chunks.push(serde_json::from_str(&line)?);
    }
    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::Restrict;

    fn sample_chunks() -> Vec<Chunk> {
        vec![
            Chunk {
                id: "vid_global".to_string(),
                text: "Summary: s\nTopics: t\nMeta: m".to_string(),
                restricts: vec![
                    Restrict::single("chunk_type", "global"),
                    Restrict::single("publish_date", "2025-07-10"),
                ],
            },
            Chunk {
                id: "vid_leon".to_string(),
                text: "Brawler: Leon. \n Context: c. \n Tips: t".to_string(),
                restricts: vec![
                    Restrict::single("chunk_type", "brawler"),
                    Restrict::single("brawler", "Leon"),
                    Restrict::single("publish_date", "2025-07-10"),
                ],
            },
        ]
    }

    #[test]
    fn test_roundtrip() {
        let chunks = sample_chunks();
        let mut buf = Vec::new();
        write_chunks(&chunks, &mut buf).unwrap();
        let parsed = read_chunks(buf.as_slice()).unwrap();
        assert_eq!(parsed, chunks);
    }

    #[test]
    fn test_one_record_per_line_with_exact_fields() {
        let chunks = sample_chunks();
        let mut buf = Vec::new();
        write_chunks(&chunks, &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        for line in lines {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            let obj = value.as_object().unwrap();
            let mut keys: Vec<&str> = obj.keys().map(|k| k.as_str()).collect();
            keys.sort_unstable();
            assert_eq!(keys, vec!["id", "restricts", "text"]);
        }
    }

    #[test]
    fn test_read_skips_blank_lines() {
        let input = b"\n{\"id\":\"a\",\"text\":\"x\",\"restricts\":[]}\n\n";
        let parsed = read_chunks(&input[..]).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].id, "a");
    }

    #[test]
    fn test_read_rejects_extra_fields() {
        let input = b"{\"id\":\"a\",\"text\":\"x\",\"restricts\":[],\"embedding\":[]}\n";
        assert!(read_chunks(&input[..]).is_err());
    }

    #[test]
    fn test_write_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chunks.jsonl");
        write_chunks_to_path(&sample_chunks(), &path).unwrap();

        let file = std::fs::File::open(&path).unwrap();
        let parsed = read_chunks(std::io::BufReader::new(file)).unwrap();
        assert_eq!(parsed.len(), 2);
    }
}
