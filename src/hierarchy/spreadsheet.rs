use anyhow::{Context, Result};
use calamine::{Reader, Xlsx};
use indexmap::IndexMap;
use log::{debug, info, warn};
use rust_xlsxwriter::{Format, Workbook};
use std::fs;
use std::io::Cursor;
use std::path::Path;

use super::HierarchyDocument;
use crate::error::EditError;

pub const DEFAULT_FILE_NAME: &str = "enterprise_hierarchy.xlsx";
pub const SHEET_NAME: &str = "Enterprise Hierarchy";

/// Raw contents of the first worksheet
#[derive(Debug, Clone)]
struct SheetData {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl HierarchyDocument {
    /// Parse the first sheet of an xlsx buffer and replace this document with it.
    ///
    /// On any failure the current columns and rows are kept.
    pub fn import_from_spreadsheet(&mut self, bytes: &[u8]) -> Result<()> {
        *self = import_from_bytes(bytes)?;
        Ok(())
    }

    /// Serialize to an xlsx buffer with one header row and one row per record
    pub fn export_to_spreadsheet(&self) -> Result<Vec<u8>> {
        export_to_bytes(self)
    }
}

pub fn import_from_bytes(bytes: &[u8]) -> Result<HierarchyDocument> {
    let sheet = read_first_sheet(bytes).context("Failed to parse the spreadsheet file")?;

    if sheet.rows.is_empty() {
        return Err(EditError::EmptySheet.into());
    }

    // Blank header cells carry no column name; drop them with their cells
    let kept: Vec<usize> = sheet
        .headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !h.trim().is_empty())
        .map(|(i, _)| i)
        .collect();
    if kept.len() != sheet.headers.len() {
        warn!("Skipping {} blank header cell(s)", sheet.headers.len() - kept.len());
    }

    let headers: Vec<String> = kept.iter().map(|&i| sheet.headers[i].clone()).collect();
    let records: Vec<IndexMap<String, String>> = sheet
        .rows
        .iter()
        .map(|row| {
            kept.iter()
                .map(|&i| (sheet.headers[i].clone(), row.get(i).cloned().unwrap_or_default()))
                .collect()
        })
        .collect();

    let doc = HierarchyDocument::from_records(&headers, &records)?;
    info!(
        "Imported hierarchy with {} columns and {} rows",
        doc.columns().len(),
        doc.rows().len()
    );
    Ok(doc)
}

pub fn export_to_bytes(doc: &HierarchyDocument) -> Result<Vec<u8>> {
    if !doc.has_locations() {
        return Err(EditError::NoExportableRows.into());
    }

    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col_idx, column) in doc.columns().iter().enumerate() {
        sheet.write_string_with_format(0, col_idx as u16, &column.name, &header_format)?;
    }

    for (row_idx, record) in doc.to_records().iter().enumerate() {
        for (col_idx, value) in record.values().enumerate() {
            sheet.write_string((row_idx + 1) as u32, col_idx as u16, value)?;
        }
    }
    sheet.autofit();

    let buffer = workbook
        .save_to_buffer()
        .context("Failed to generate Excel file")?;
    debug!("Exported hierarchy to {} bytes", buffer.len());
    Ok(buffer)
}

pub fn read_file<P: AsRef<Path>>(path: P) -> Result<HierarchyDocument> {
    let path = path.as_ref();
    let bytes = fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    import_from_bytes(&bytes)
}

pub fn write_file<P: AsRef<Path>>(doc: &HierarchyDocument, path: P) -> Result<()> {
    let path = path.as_ref();
    let bytes = export_to_bytes(doc)?;
    fs::write(path, bytes).with_context(|| format!("Failed to save Excel file: {}", path.display()))?;
    info!("Saved hierarchy to {}", path.display());
    Ok(())
}

fn read_first_sheet(bytes: &[u8]) -> Result<SheetData> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes.to_vec()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .context("Excel file contains no sheets")?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("Error reading sheet '{}'", sheet_name))?;

    let mut headers = Vec::new();
    let mut rows = Vec::new();

    for (row_idx, row) in range.rows().enumerate() {
        let values: Vec<String> = row.iter().map(|cell| cell.to_string()).collect();
        if row_idx == 0 {
            headers = values;
        } else {
            rows.push(values);
        }
    }

    Ok(SheetData { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_requires_location_values() {
        let doc = HierarchyDocument::new();
        let err = export_to_bytes(&doc).unwrap_err();
        assert_eq!(err.downcast_ref::<EditError>(), Some(&EditError::NoExportableRows));
    }

    #[test]
    fn test_garbage_bytes_fail_generically() {
        let err = import_from_bytes(b"not a workbook").unwrap_err();
        assert_eq!(err.to_string(), "Failed to parse the spreadsheet file");
    }

    #[test]
    fn test_failed_import_keeps_document() {
        let mut doc = HierarchyDocument::new();
        doc.edit_cell(0, "col-1", "Main").unwrap();
        let before = doc.clone();

        assert!(doc.import_from_spreadsheet(b"junk").is_err());
        assert_eq!(doc, before);
    }
}
