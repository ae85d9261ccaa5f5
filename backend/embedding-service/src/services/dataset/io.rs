use super::index::InteractionIndex;
use crate::error::{Result, ServiceError};
use crate::models::{ItemId, Record};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, info};

fn delimited_reader<R: Read>(reader: R, delimiter: u8) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(reader)
}

/// Read `user, item, label, ...` rows (no header) from any reader
pub fn read_records<R: Read>(reader: R, delimiter: u8) -> Result<Vec<Record>> {
    let mut csv_reader = delimited_reader(reader, delimiter);
    let mut records = Vec::new();

    for row in csv_reader.records() {
        let row = row?;
        let fields: Vec<&str> = row.iter().collect();
        records.push(Record::from_fields(&fields)?);
    }

    Ok(records)
}

/// Load a delimited ratings file
///
/// With `verbose`, label statistics and unique user/item counts are logged.
pub fn load_records<P: AsRef<Path>>(path: P, delimiter: u8, verbose: bool) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let records = read_records(File::open(path)?, delimiter)?;

    if verbose {
        InteractionIndex::build(&records)
            .stats()
            .log(&path.display().to_string());
    } else {
        debug!("Loaded {} records from {}", records.len(), path.display());
    }

    Ok(records)
}

/// Read a JSON-lines split file written by [`write_jsonl`]
pub fn read_jsonl<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    let mut records = Vec::new();

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(serde_json::from_str(&line)?);
    }

    Ok(records)
}

/// One `{"in0":[u],"in1":[i],"label":x}` object per line
pub fn write_jsonl<P: AsRef<Path>>(path: P, records: &[Record]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);

    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;

    info!("Created {} jsonline file ({} records)", path.display(), records.len());
    Ok(())
}

/// Stream a delimited ratings file straight into JSON lines
pub fn convert_delimited_to_jsonl<P: AsRef<Path>, Q: AsRef<Path>>(
    source: P,
    target: Q,
    delimiter: u8,
) -> Result<usize> {
    let mut csv_reader = delimited_reader(File::open(source.as_ref())?, delimiter);
    let mut writer = BufWriter::new(File::create(target.as_ref())?);
    let mut count = 0usize;

    for row in csv_reader.records() {
        let row = row?;
        let fields: Vec<&str> = row.iter().collect();
        let record = Record::from_fields(&fields)?;
        serde_json::to_writer(&mut writer, &record)?;
        writer.write_all(b"\n")?;
        count += 1;
    }
    writer.flush()?;

    info!(
        "Created {} jsonline file ({} records)",
        target.as_ref().display(),
        count
    );
    Ok(count)
}

/// Parse `id|name|...` item metadata
///
/// The file is ISO-8859-1; each byte maps to the code point of the same value.
pub fn read_item_names<R: Read>(mut reader: R) -> Result<HashMap<ItemId, String>> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let text: String = bytes.iter().map(|&b| b as char).collect();

    let mut names = HashMap::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut fields = line.split('|');
        let id_raw = fields.next().unwrap_or_default();
        let id = id_raw
            .trim()
            .parse::<ItemId>()
            .map_err(|_| ServiceError::format("item_id", id_raw))?;
        let name = fields
            .next()
            .ok_or_else(|| ServiceError::format("item_name", line))?;

        names.insert(id, name.to_string());
    }

    Ok(names)
}

pub fn load_item_names<P: AsRef<Path>>(path: P) -> Result<HashMap<ItemId, String>> {
    read_item_names(File::open(path.as_ref())?)
}

/// Distinct item ids in first-seen order
pub fn unique_item_ids(records: &[Record]) -> Vec<ItemId> {
    let mut seen = HashSet::new();
    records
        .iter()
        .map(|r| r.item_id)
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Persist ids as a JSON array
pub fn write_item_ids<P: AsRef<Path>>(path: P, item_ids: &[ItemId]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    serde_json::to_writer(&mut writer, item_ids)?;
    writer.flush()?;
    Ok(())
}
