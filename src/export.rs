//! Writers for the cleaned corpus and the relationship table, plus a reader for
//! relationship tables written earlier.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use log::info;

use crate::clean::CleanedCorpus;
use crate::config::ExportFormat;
use crate::error::{Error, Result};
use crate::reduce::{RelationshipRow, RelationshipTable};

pub const RELATIONSHIP_HEADER: [&str; 5] = [
    "Word",
    "Common_POS",
    "Next_Words",
    "Prev_Words",
    "Related_Words",
];

/// Format implied by a file extension; anything unknown is CSV.
pub fn format_for_path(path: &Path) -> ExportFormat {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("tsv") => ExportFormat::Tsv,
        Some("json") => ExportFormat::Json,
        _ => ExportFormat::Csv,
    }
}

fn delimiter(format: ExportFormat) -> u8 {
    match format {
        ExportFormat::Tsv => b'\t',
        _ => b',',
    }
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    Ok(BufWriter::new(file))
}

pub fn write_cleaned_to<W: Write>(writer: W, corpus: &CleanedCorpus) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    wtr.write_record(&corpus.headers)?;
    for record in &corpus.records {
        wtr.write_record(record)?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Writes the cleaned corpus as CSV with the original header.
pub fn write_cleaned(path: &Path, corpus: &CleanedCorpus) -> Result<()> {
    info!("saving cleaned data to {}", path.display());
    write_cleaned_to(create(path)?, corpus)
}

pub fn write_relationships_to<W: Write>(
    writer: W,
    table: &RelationshipTable,
    format: ExportFormat,
) -> Result<()> {
    if format == ExportFormat::Json {
        let mut writer = writer;
        serde_json::to_writer_pretty(&mut writer, &table.rows)?;
        writer.flush().map_err(serde_json::Error::io)?;
        return Ok(());
    }
    let mut wtr = WriterBuilder::new()
        .delimiter(delimiter(format))
        .from_writer(writer);
    wtr.write_record(RELATIONSHIP_HEADER)?;
    for row in table.iter() {
        wtr.write_record([
            row.word.clone(),
            row.common_pos.clone(),
            row.next_words.to_string(),
            row.prev_words.to_string(),
            row.related_words.to_string(),
        ])?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn write_relationships(
    path: &Path,
    table: &RelationshipTable,
    format: ExportFormat,
) -> Result<()> {
    info!(
        "saving {} relationships to {}",
        table.len(),
        path.display()
    );
    write_relationships_to(create(path)?, table, format)
}

/// Reads a relationship table. `source` only names the input in error messages.
pub fn read_relationships<R: Read>(
    reader: R,
    format: ExportFormat,
    source: &str,
) -> Result<RelationshipTable> {
    if format == ExportFormat::Json {
        let rows: Vec<RelationshipRow> = serde_json::from_reader(reader)?;
        return Ok(RelationshipTable { rows });
    }
    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter(format))
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    let mut index = [0usize; 5];
    for (slot, column) in index.iter_mut().zip(RELATIONSHIP_HEADER) {
        *slot = headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| Error::MissingColumn {
                column,
                path: source.to_string(),
            })?;
    }
    let field = |record: &StringRecord, i: usize| record.get(index[i]).unwrap_or("").to_string();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(RelationshipRow {
            word: field(&record, 0),
            common_pos: field(&record, 1),
            next_words: field(&record, 2).parse()?,
            prev_words: field(&record, 3).parse()?,
            related_words: field(&record, 4).parse()?,
        });
    }
    Ok(RelationshipTable { rows })
}

/// Reads a relationship table written in `format`, whatever the file is called.
pub fn read_relationships_as(path: &Path, format: ExportFormat) -> Result<RelationshipTable> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    read_relationships(BufReader::new(file), format, &path.display().to_string())
}

/// Reads a relationship table, choosing the format from the file extension.
pub fn read_relationships_path(path: &Path) -> Result<RelationshipTable> {
    read_relationships_as(path, format_for_path(path))
}
