//! Hand editing of raw workflow JSON
//!
//! Parse errors are reported but never block further edits; the buffer keeps
//! whatever text was typed last.

use log::debug;
use serde_json::Value;

use crate::error::{EditError, EditResult};

pub fn validate_json(text: &str) -> EditResult<Value> {
    serde_json::from_str(text).map_err(|e| EditError::InvalidJson {
        line: e.line(),
        column: e.column(),
        message: strip_position(&e.to_string()),
    })
}

/// serde_json appends " at line X column Y", which the error already carries
fn strip_position(message: &str) -> String {
    match message.rfind(" at line ") {
        Some(idx) => message[..idx].to_string(),
        None => message.to_string(),
    }
}

#[derive(Debug, Clone, Default)]
pub struct JsonEditor {
    text: String,
    error: Option<EditError>,
}

impl JsonEditor {
    pub fn new(text: impl Into<String>) -> Self {
        let mut editor = Self::default();
        editor.set_text(text);
        editor
    }

    /// Pretty-print a value into a fresh buffer
    pub fn from_value(value: &Value) -> Self {
        Self::new(serde_json::to_string_pretty(value).unwrap_or_default())
    }

    /// Replace the buffer and re-validate it
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.error = validate_json(&self.text).err();
        if let Some(err) = &self.error {
            debug!("JSON buffer is invalid: {}", err);
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn error(&self) -> Option<&EditError> {
        self.error.as_ref()
    }

    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    /// The parsed buffer, if it currently parses
    pub fn value(&self) -> EditResult<Value> {
        validate_json(&self.text)
    }
}
