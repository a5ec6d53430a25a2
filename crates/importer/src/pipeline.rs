use crate::column_map::{CanonicalField, lookup_header};
use crate::error::{ImporterError, Result};
use calamine::{Data, Reader, Xlsx};
use std::collections::{BTreeMap, HashMap};
use std::io::Cursor;
use tracing::info;

/// One validated record produced by the pipeline: canonical field to raw
/// trimmed cell text. Transient; consumed by the batch-insert path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportRow {
    values: BTreeMap<CanonicalField, String>,
}

impl ImportRow {
    pub fn insert(&mut self, field: CanonicalField, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    pub fn get(&self, field: CanonicalField) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.get(CanonicalField::Name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, &str)> {
        self.values.iter().map(|(field, value)| (*field, value.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Parsed workbook plus the live header mapping. Row extraction and
/// validation re-run against the current mapping, so the operator can
/// remap headers after the automatic pass and preview again before
/// committing.
#[derive(Debug, Clone)]
pub struct ImportSession {
    headers: Vec<String>,
    grid: Vec<Vec<String>>,
    mapping: HashMap<String, CanonicalField>,
}

impl ImportSession {
    /// Decode an uploaded workbook: first sheet only, first row treated as
    /// headers. The two failure modes here are the only blocking import
    /// errors surfaced to the operator.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or(ImporterError::NoSheet)??;

        let grid: Vec<Vec<String>> = range
            .rows()
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect();

        info!(rows = grid.len(), "decoded workbook");
        Self::from_grid(grid)
    }

    /// Build a session from an already-decoded grid of cell text.
    pub fn from_grid(grid: Vec<Vec<String>>) -> Result<Self> {
        if grid.len() < 2 {
            return Err(ImporterError::NotEnoughRows);
        }

        let mut rows = grid.into_iter();
        let headers: Vec<String> = rows
            .next()
            .unwrap_or_default()
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut mapping = HashMap::new();
        for header in &headers {
            if let Some(field) = lookup_header(header) {
                mapping.insert(header.clone(), field);
            }
        }

        Ok(Self {
            headers,
            grid: rows.collect(),
            mapping,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn mapped_field(&self, header: &str) -> Option<CanonicalField> {
        self.mapping.get(header).copied()
    }

    /// Reassign a header to a different canonical field, or to `None` to
    /// ignore it. Subsequent `rows()` calls see the updated mapping.
    pub fn remap(&mut self, header: &str, field: Option<CanonicalField>) {
        match field {
            Some(field) => {
                self.mapping.insert(header.to_string(), field);
            }
            None => {
                self.mapping.remove(header);
            }
        }
    }

    /// Extract and validate records against the current mapping. Fully
    /// blank rows are skipped; rows whose mapped name is empty or absent
    /// are discarded (name is the only mandatory field). Output order
    /// follows the source rows.
    pub fn rows(&self) -> Vec<ImportRow> {
        self.candidate_rows()
            .filter_map(|row| {
                let record = self.extract(row);
                match record.name() {
                    Some(name) if !name.is_empty() => Some(record),
                    _ => None,
                }
            })
            .collect()
    }

    /// Non-blank rows dropped by validation. The aggregate count is the
    /// only per-row feedback the import surfaces.
    pub fn dropped_row_count(&self) -> usize {
        self.candidate_rows().count() - self.rows().len()
    }

    fn candidate_rows(&self) -> impl Iterator<Item = &Vec<String>> {
        self.grid
            .iter()
            .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
    }

    fn extract(&self, row: &[String]) -> ImportRow {
        let mut record = ImportRow::default();
        for (index, header) in self.headers.iter().enumerate() {
            let Some(field) = self.mapping.get(header) else {
                continue;
            };
            let Some(cell) = row.get(index) else {
                continue;
            };
            let value = cell.trim();
            if !value.is_empty() {
                record.insert(*field, value);
            }
        }
        record
    }
}

/// Stringify a cell the way the coach sees it: integral floats render
/// without a trailing ".0" so a PR of 100 imports as "100".
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}
