//! JSON-logic conditions attached to triggers
//!
//! Conditions are evaluated by the platform, never here. This module only
//! builds them, recognises the `Resolved` equality clause, and strips it.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

pub const RESOLVED: &str = "Resolved";

/// A JSON-logic expression, kept verbatim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Condition(pub Value);

/// Comparison offered when building a field condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FieldComparison {
    Equals,
    NotEquals,
    Contains,
}

impl Condition {
    /// `{"==": [{"var": field}, value]}`
    pub fn equals(field: &str, value: &str) -> Self {
        Condition(json!({ "==": [{ "var": field }, value] }))
    }

    pub fn not_equals(field: &str, value: &str) -> Self {
        Condition(json!({ "!=": [{ "var": field }, value] }))
    }

    /// `{"in": [value, {"var": field}]}`
    pub fn contains(field: &str, value: &str) -> Self {
        Condition(json!({ "in": [value, { "var": field }] }))
    }

    pub fn compare(field: &str, comparison: FieldComparison, value: &str) -> Self {
        match comparison {
            FieldComparison::Equals => Self::equals(field, value),
            FieldComparison::NotEquals => Self::not_equals(field, value),
            FieldComparison::Contains => Self::contains(field, value),
        }
    }

    pub fn and(clauses: Vec<Condition>) -> Self {
        Condition(json!({ "and": clauses.into_iter().map(|c| c.0).collect::<Vec<_>>() }))
    }

    /// `existing AND clause`, or just `clause` when there is nothing to join
    pub fn and_with(existing: Option<&Condition>, clause: Condition) -> Self {
        match existing {
            Some(existing) => Self::and(vec![existing.clone(), clause]),
            None => clause,
        }
    }

    /// Compact JSON, stable for a given condition and used in trigger keys
    pub fn canonical(&self) -> String {
        self.0.to_string()
    }

    /// Short human-readable summary for listings
    pub fn describe(&self) -> String {
        if and_clauses(&self.0).is_some() {
            return "Complex condition".to_string();
        }
        for (op, phrase) in [("==", "is"), ("!=", "is not")] {
            let Some(args) = self.0.get(op).and_then(Value::as_array) else {
                continue;
            };
            let var = args.first().and_then(|v| v.get("var")).and_then(Value::as_str);
            let literal = args.get(1).and_then(Value::as_str);
            if let (Some(var), Some(literal)) = (var, literal) {
                return format!("When {} {} \"{}\"", var, phrase, literal);
            }
        }
        "Custom condition".to_string()
    }

    /// True when the condition is, or directly `and`s, `status == literal`
    pub fn tests_equality_to(&self, literal: &str) -> bool {
        if is_equality_to(&self.0, literal) {
            return true;
        }
        and_clauses(&self.0)
            .map(|clauses| clauses.iter().any(|c| is_equality_to(c, literal)))
            .unwrap_or(false)
    }

    /// Remove `status == literal` clauses.
    ///
    /// A lone matching clause removes the whole condition; an `and` list left
    /// with one clause collapses to that clause.
    pub fn strip_equality(&self, literal: &str) -> Option<Condition> {
        if is_equality_to(&self.0, literal) {
            return None;
        }
        let Some(clauses) = and_clauses(&self.0) else {
            return Some(self.clone());
        };

        let mut kept: Vec<Value> = clauses
            .iter()
            .filter(|c| !is_equality_to(c, literal))
            .cloned()
            .collect();
        match kept.len() {
            0 => None,
            1 => kept.pop().map(Condition),
            _ => Some(Condition(json!({ "and": kept }))),
        }
    }
}

/// `{"==": [{"var": "status"}, literal]}`; other variables are left alone
fn is_equality_to(value: &Value, literal: &str) -> bool {
    let Some(args) = value.get("==").and_then(Value::as_array) else {
        return false;
    };
    let var = args.first().and_then(|v| v.get("var")).and_then(Value::as_str);
    var == Some("status") && args.get(1).and_then(Value::as_str) == Some(literal)
}

fn and_clauses(value: &Value) -> Option<&Vec<Value>> {
    value.get("and").and_then(Value::as_array)
}
