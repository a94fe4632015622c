/// Hierarchy spreadsheet tests
use cxgen::error::EditError;
use cxgen::hierarchy::spreadsheet::{export_to_bytes, import_from_bytes};
use cxgen::hierarchy::{HierarchyDocument, LOCATION_COLUMN};

fn main_alice() -> HierarchyDocument {
    let mut doc = HierarchyDocument::new();
    let manager = doc.add_column("Manager").unwrap();
    let location = doc.location_column().unwrap().id.clone();
    doc.edit_cell(0, &location, "Main").unwrap();
    doc.edit_cell(0, &manager, "Alice").unwrap();
    doc
}

#[test]
fn test_location_manager_round_trip() {
    let doc = main_alice();
    let bytes = export_to_bytes(&doc).unwrap();
    let imported = import_from_bytes(&bytes).unwrap();

    let names: Vec<&str> = imported.columns().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Location", "Manager"]);
    assert_eq!(imported.to_records(), doc.to_records());
    assert_eq!(imported.to_records()[0]["Manager"], "Alice");
}

#[test]
fn test_blank_cells_survive_round_trip() {
    let mut doc = main_alice();
    let row = doc.add_row();
    let location = doc.location_column().unwrap().id.clone();
    doc.edit_cell(row, &location, "Harbour").unwrap();

    let mut imported = HierarchyDocument::new();
    imported.import_from_spreadsheet(&doc.export_to_spreadsheet().unwrap()).unwrap();

    assert_eq!(imported.rows().len(), 2);
    assert_eq!(imported.to_records()[1]["Location"], "Harbour");
    assert_eq!(imported.to_records()[1]["Manager"], "");
}

#[test]
fn test_location_survives_any_column_edits() {
    let mut doc = HierarchyDocument::new();
    let mut added = Vec::new();
    for name in ["Region", "Manager", "Phone", "Email"] {
        added.push(doc.add_column(name).unwrap());
    }
    doc.remove_column(&added[1]).unwrap();
    doc.remove_column(&added[3]).unwrap();

    let location = doc.location_column().unwrap().id.clone();
    let err = doc.remove_column(&location).unwrap_err();
    assert_eq!(err, EditError::ProtectedColumn);

    assert_eq!(doc.columns()[0].name, LOCATION_COLUMN);
    for row in doc.rows() {
        let keys: Vec<&String> = row.keys().collect();
        let ids: Vec<&String> = doc.columns().iter().map(|c| &c.id).collect();
        assert_eq!(keys, ids);
    }
}
