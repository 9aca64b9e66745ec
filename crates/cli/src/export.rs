// ABOUTME: Serialization of extraction results: assignments.csv and course_content.json.
// ABOUTME: CSV has fixed columns (id,title,url,due_date,points,type); JSON is pretty-printed.

use std::fs;
use std::io;
use std::path::Path;

use coursegrab_extract::{CourseContent, ItemKind, ItemRecord};

use crate::csv;

/// Fixed column set of `assignments.csv`. Extra keys are never written.
pub const CSV_COLUMNS: [&str; 6] = ["id", "title", "url", "due_date", "points", "type"];

/// Write the listing records as `assignments.csv`.
pub fn write_items_csv(path: &Path, items: &[ItemRecord]) -> io::Result<()> {
    let mut buf: Vec<u8> = Vec::new();
    csv::write_row(&mut buf, &CSV_COLUMNS)?;
    for item in items {
        csv::write_row(
            &mut buf,
            &[
                &item.id,
                &item.title,
                &item.url,
                &item.due_date,
                &item.points,
                item.kind.as_str(),
            ],
        )?;
    }
    fs::write(path, buf)
}

/// Read `assignments.csv` back into listing records.
///
/// The header row is skipped when present; short rows are dropped.
pub fn read_items_csv(path: &Path) -> io::Result<Vec<ItemRecord>> {
    let text = fs::read_to_string(path)?;
    let mut rows = csv::parse_rows(&text);
    if matches!(rows.first(), Some(first) if first.first().map(String::as_str) == Some("id")) {
        rows.remove(0);
    }

    Ok(rows
        .into_iter()
        .filter(|row| row.len() >= CSV_COLUMNS.len())
        .map(|mut row| {
            let kind = ItemKind::parse(&row[5]);
            let points = std::mem::take(&mut row[4]);
            let due_date = std::mem::take(&mut row[3]);
            let url = std::mem::take(&mut row[2]);
            let title = std::mem::take(&mut row[1]);
            let id = std::mem::take(&mut row[0]);
            ItemRecord {
                id,
                title,
                url,
                due_date,
                points,
                kind,
            }
        })
        .collect())
}

/// Write the merged content records as pretty-printed JSON. Non-ASCII text
/// is preserved as-is.
pub fn write_course_json(path: &Path, content: &CourseContent) -> io::Result<()> {
    let json = serde_json::to_string_pretty(content)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(path, json)
}
