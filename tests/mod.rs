/// Integration tests for cxgen
///
/// Tests are organized by document kind:
/// - hierarchy: spreadsheet import/export and column protection
/// - rules: engagement rule XML generation and re-import
/// - workflow: drafts, templates and platform JSON export
mod hierarchy;
mod rules;
mod workflow;

