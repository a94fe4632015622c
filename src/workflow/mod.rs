//! Workflow document builder and platform JSON exporter

pub mod color;
pub mod condition;
pub mod document;
pub mod duration;
pub mod editor;
pub mod export;
pub mod model;
pub mod templates;
pub mod triggers;
pub mod type_values;

pub use condition::Condition;
pub use document::{FieldFlags, StatusEdit, TextField, WorkflowDocument};
pub use editor::JsonEditor;
pub use export::{export, export_file_name, render};
pub use model::{FieldType, HeaderKind, Target, Trigger, Workflow, WorkflowType};
pub use triggers::{CustomTrigger, NotificationChannel};
