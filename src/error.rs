//! Validation errors raised by the document command methods.
//!
//! Every variant is a local, user-facing failure: the document the command
//! was applied to is left exactly as it was.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("{0} is required!")]
    MissingField(&'static str),

    #[error("Column '{0}' already exists!")]
    DuplicateColumn(String),

    #[error("Cannot remove the Location column!")]
    ProtectedColumn,

    #[error("Column '{0}' not found")]
    UnknownColumn(String),

    #[error("Row {0} is out of range")]
    RowOutOfRange(usize),

    #[error("Uploaded file must contain a 'Location' column!")]
    MissingLocationHeader,

    #[error("No data found in the uploaded file!")]
    EmptySheet,

    #[error("Please add some data before downloading!")]
    NoExportableRows,

    #[error("Rule with id {0} already exists!")]
    DuplicateRuleId(i64),

    #[error("Rule {0} is out of range")]
    RuleOutOfRange(usize),

    #[error("Please add at least one rule before exporting!")]
    NoRules,

    #[error("A status with this name already exists!")]
    DuplicateStatus(String),

    #[error("Cannot delete initial or final status '{0}'!")]
    ProtectedStatus(String),

    #[error("Status '{0}' not found")]
    UnknownStatus(String),

    #[error("Transition {from} -> {to} already exists!")]
    DuplicateTransition { from: String, to: String },

    #[error("Transition {from} -> {to} not found")]
    UnknownTransition { from: String, to: String },

    #[error("A field with this name or ID already exists!")]
    DuplicateField(String),

    #[error("Field '{0}' not found")]
    UnknownField(String),

    #[error("Field '{0}' does not take options")]
    FieldHasNoOptions(String),

    #[error("This option already exists!")]
    DuplicateOption(String),

    #[error("Value '{0}' already exists!")]
    DuplicateValue(String),

    #[error("Value '{0}' not found")]
    UnknownValue(String),

    #[error("You must have at least one type value.")]
    LastTypeValue,

    #[error("Cannot delete the complaint type '{0}' from this workflow.")]
    ProtectedTypeValue(String),

    #[error("This header already exists in the admin hierarchy!")]
    DuplicateHeader(String),

    #[error("Header {0} is out of range")]
    HeaderOutOfRange(usize),

    #[error("Trigger '{0}' not found")]
    UnknownTrigger(String),

    #[error("Escalation level {0} is out of range")]
    LevelOutOfRange(usize),

    #[error("Automatic assignment is not enabled")]
    AutomaticAssignmentDisabled,

    #[error("Unknown review channel '{0}'")]
    UnknownChannel(String),

    #[error("Invalid duration '{0}', expected something like 1h 30m")]
    InvalidDuration(String),

    #[error("Invalid color '{0}', expected #RRGGBB")]
    InvalidColor(String),

    #[error("Unknown workflow type '{0}', expected ccm, orm or combined")]
    UnknownWorkflowType(String),

    #[error("Template '{0}' not found")]
    UnknownTemplate(String),

    #[error("Invalid JSON at line {line}, column {column}: {message}")]
    InvalidJson {
        line: usize,
        column: usize,
        message: String,
    },
}

pub type EditResult<T> = std::result::Result<T, EditError>;
