//! Enterprise hierarchy table
//!
//! An ordered list of named columns (the first is always `Location`) and an
//! ordered list of rows keyed by column id. Every row carries a value for
//! every current column id.

pub mod spreadsheet;

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{EditError, EditResult};

pub use spreadsheet::{DEFAULT_FILE_NAME, SHEET_NAME};

/// Name of the mandatory first column
pub const LOCATION_COLUMN: &str = "Location";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub name: String,
}

/// Column id -> cell value
pub type Row = IndexMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyDocument {
    columns: Vec<Column>,
    rows: Vec<Row>,
    next_column: usize,
}

impl Default for HierarchyDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl HierarchyDocument {
    /// One `Location` column and one empty row
    pub fn new() -> Self {
        let location = Column {
            id: column_id(1),
            name: LOCATION_COLUMN.to_string(),
        };
        let mut row = Row::new();
        row.insert(location.id.clone(), String::new());

        Self {
            columns: vec![location],
            rows: vec![row],
            next_column: 2,
        }
    }

    /// Build a document from header names and header-keyed records.
    ///
    /// Ids are assigned `col-1..col-N` in header order. Missing record values
    /// become empty strings.
    pub fn from_records(headers: &[String], records: &[IndexMap<String, String>]) -> EditResult<Self> {
        if !headers.iter().any(|h| h == LOCATION_COLUMN) {
            return Err(EditError::MissingLocationHeader);
        }

        let mut columns: Vec<Column> = Vec::with_capacity(headers.len());
        for (index, name) in headers.iter().enumerate() {
            if columns.iter().any(|c| &c.name == name) {
                return Err(EditError::DuplicateColumn(name.clone()));
            }
            columns.push(Column {
                id: column_id(index + 1),
                name: name.clone(),
            });
        }

        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|col| (col.id.clone(), record.get(&col.name).cloned().unwrap_or_default()))
                    .collect()
            })
            .collect();

        Ok(Self {
            next_column: columns.len() + 1,
            columns,
            rows,
        })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn location_column(&self) -> Option<&Column> {
        self.column_by_name(LOCATION_COLUMN)
    }

    /// Append a column and back-fill it with empty strings. Returns the new id.
    pub fn add_column(&mut self, name: &str) -> EditResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EditError::MissingField("Column name"));
        }
        if self.column_by_name(name).is_some() {
            return Err(EditError::DuplicateColumn(name.to_string()));
        }

        let id = self.fresh_column_id();
        for row in &mut self.rows {
            row.insert(id.clone(), String::new());
        }
        self.columns.push(Column {
            id: id.clone(),
            name: name.to_string(),
        });

        debug!("Added column '{}' as {}", name, id);
        Ok(id)
    }

    pub fn remove_column(&mut self, id: &str) -> EditResult<Column> {
        let index = self
            .columns
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| EditError::UnknownColumn(id.to_string()))?;

        if self.columns[index].name == LOCATION_COLUMN {
            return Err(EditError::ProtectedColumn);
        }

        let removed = self.columns.remove(index);
        for row in &mut self.rows {
            row.shift_remove(&removed.id);
        }

        debug!("Removed column '{}' ({})", removed.name, removed.id);
        Ok(removed)
    }

    /// Swap the column at `index` with its neighbour.
    ///
    /// No-op at either boundary or when the swap would move `Location`.
    pub fn move_column(&mut self, index: usize, direction: Direction) {
        let target = match direction {
            Direction::Left if index > 0 => index - 1,
            Direction::Right if index + 1 < self.columns.len() => index + 1,
            _ => return,
        };
        if self.columns[index].name == LOCATION_COLUMN || self.columns[target].name == LOCATION_COLUMN {
            return;
        }
        self.columns.swap(index, target);
    }

    pub fn add_row(&mut self) -> usize {
        let row = self
            .columns
            .iter()
            .map(|c| (c.id.clone(), String::new()))
            .collect();
        self.rows.push(row);
        self.rows.len() - 1
    }

    pub fn remove_row(&mut self, index: usize) -> EditResult<Row> {
        if index >= self.rows.len() {
            return Err(EditError::RowOutOfRange(index));
        }
        Ok(self.rows.remove(index))
    }

    pub fn edit_cell(&mut self, row: usize, column_id: &str, value: impl Into<String>) -> EditResult<()> {
        if !self.columns.iter().any(|c| c.id == column_id) {
            return Err(EditError::UnknownColumn(column_id.to_string()));
        }
        let row = self.rows.get_mut(row).ok_or(EditError::RowOutOfRange(row))?;
        row.insert(column_id.to_string(), value.into());
        Ok(())
    }

    /// Project rows into header-named records in column order
    pub fn to_records(&self) -> Vec<IndexMap<String, String>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .map(|col| (col.name.clone(), row.get(&col.id).cloned().unwrap_or_default()))
                    .collect()
            })
            .collect()
    }

    /// True when at least one row has a non-empty Location value
    pub fn has_locations(&self) -> bool {
        let Some(location) = self.location_column() else {
            return false;
        };
        self.rows
            .iter()
            .any(|row| row.get(&location.id).is_some_and(|v| !v.is_empty()))
    }

    fn fresh_column_id(&mut self) -> String {
        loop {
            let id = column_id(self.next_column);
            self.next_column += 1;
            if !self.columns.iter().any(|c| c.id == id) {
                return id;
            }
        }
    }
}

fn column_id(n: usize) -> String {
    format!("col-{}", n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_sets_match(doc: &HierarchyDocument) -> bool {
        doc.rows().iter().all(|row| {
            row.len() == doc.columns().len() && doc.columns().iter().all(|c| row.contains_key(&c.id))
        })
    }

    #[test]
    fn test_new_document() {
        let doc = HierarchyDocument::new();
        assert_eq!(doc.columns().len(), 1);
        assert_eq!(doc.columns()[0].name, LOCATION_COLUMN);
        assert_eq!(doc.rows().len(), 1);
        assert_eq!(doc.rows()[0].get("col-1").map(String::as_str), Some(""));
    }

    #[test]
    fn test_add_column_backfills_rows() {
        let mut doc = HierarchyDocument::new();
        doc.add_row();
        let id = doc.add_column("Manager").unwrap();

        assert_eq!(id, "col-2");
        assert!(doc.rows().iter().all(|r| r.get(&id).map(String::as_str) == Some("")));
        assert!(key_sets_match(&doc));
    }

    #[test]
    fn test_duplicate_and_blank_column_rejected() {
        let mut doc = HierarchyDocument::new();
        doc.add_column("Manager").unwrap();

        assert_eq!(doc.add_column("Manager"), Err(EditError::DuplicateColumn("Manager".into())));
        assert_eq!(doc.add_column("Location"), Err(EditError::DuplicateColumn("Location".into())));
        assert_eq!(doc.add_column("   "), Err(EditError::MissingField("Column name")));
        assert_eq!(doc.columns().len(), 2);
    }

    #[test]
    fn test_location_cannot_be_removed() {
        let mut doc = HierarchyDocument::new();
        let before = doc.clone();

        assert_eq!(doc.remove_column("col-1"), Err(EditError::ProtectedColumn));
        assert_eq!(doc, before);
    }

    #[test]
    fn test_remove_column_drops_row_keys() {
        let mut doc = HierarchyDocument::new();
        let region = doc.add_column("Region").unwrap();
        doc.add_column("Manager").unwrap();
        doc.add_row();

        doc.remove_column(&region).unwrap();
        assert!(doc.rows().iter().all(|r| !r.contains_key(&region)));
        assert!(key_sets_match(&doc));
    }

    #[test]
    fn test_ids_stay_unique_after_removal() {
        let mut doc = HierarchyDocument::new();
        let a = doc.add_column("A").unwrap();
        let b = doc.add_column("B").unwrap();
        doc.remove_column(&a).unwrap();
        let c = doc.add_column("C").unwrap();

        assert_ne!(b, c);
        assert_ne!(a, c);
    }

    #[test]
    fn test_move_column() {
        let mut doc = HierarchyDocument::new();
        doc.add_column("A").unwrap();
        doc.add_column("B").unwrap();

        doc.move_column(1, Direction::Right);
        let names: Vec<_> = doc.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Location", "B", "A"]);

        // boundaries and Location are fixed
        doc.move_column(2, Direction::Right);
        doc.move_column(1, Direction::Left);
        doc.move_column(0, Direction::Right);
        let names: Vec<_> = doc.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Location", "B", "A"]);
    }

    #[test]
    fn test_rows_and_cells() {
        let mut doc = HierarchyDocument::new();
        let manager = doc.add_column("Manager").unwrap();
        doc.edit_cell(0, "col-1", "Main").unwrap();
        doc.edit_cell(0, &manager, "Alice").unwrap();

        assert_eq!(doc.edit_cell(3, &manager, "x"), Err(EditError::RowOutOfRange(3)));
        assert_eq!(
            doc.edit_cell(0, "col-99", "x"),
            Err(EditError::UnknownColumn("col-99".into()))
        );

        let records = doc.to_records();
        assert_eq!(records[0].get("Location").map(String::as_str), Some("Main"));
        assert_eq!(records[0].get("Manager").map(String::as_str), Some("Alice"));
        assert!(doc.has_locations());

        doc.remove_row(0).unwrap();
        assert!(doc.rows().is_empty());
        assert!(doc.remove_row(0).is_err());
    }

    #[test]
    fn test_from_records_requires_location() {
        let headers = vec!["Region".to_string()];
        assert_eq!(
            HierarchyDocument::from_records(&headers, &[]),
            Err(EditError::MissingLocationHeader)
        );
    }
}
