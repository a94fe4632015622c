//! Derivation of `type.values` from the workflow type and review channels

use super::model::{EnumValue, WorkflowType};
use crate::error::{EditError, EditResult};

/// Channel preselected for new orm and combined workflows
pub const DEFAULT_CHANNEL: &str = "googleMap";

/// External review channels an orm workflow can listen to, as `(id, name)`
pub const REVIEW_CHANNELS: &[(&str, &str)] = &[
    ("googleMap", "Google"),
    ("facebook", "Facebook"),
    ("yelp", "Yelp"),
    ("booking", "Booking.com"),
    ("tripadvisor", "Tripadvisor"),
    ("agoda", "Agoda"),
    ("expedia", "Expedia"),
    ("hotels", "Hotels.com"),
    ("amazon", "Amazon"),
    ("holidaycheck", "Holidaycheck"),
    ("gartner", "Gartner Peer Insights"),
    ("softwareadvice", "Software Advice"),
    ("g2", "G2"),
    ("zomato", "Zomato"),
    ("indeed", "Indeed"),
    ("glassdoor", "Glassdoor"),
    ("trustpilot", "Trustpilot"),
    ("sitejabber", "Sitejabber"),
    ("bbb", "BBB"),
    ("lendingtree", "LendingTree"),
];

pub fn channel_name(id: &str) -> Option<&'static str> {
    REVIEW_CHANNELS.iter().find(|(cid, _)| *cid == id).map(|(_, name)| *name)
}

/// Resolve a channel by id or display name, case-insensitively
pub fn lookup_channel(query: &str) -> EditResult<&'static str> {
    let query = query.trim();
    REVIEW_CHANNELS
        .iter()
        .find(|(id, name)| id.eq_ignore_ascii_case(query) || name.eq_ignore_ascii_case(query))
        .map(|(id, _)| *id)
        .ok_or_else(|| EditError::UnknownChannel(query.to_string()))
}

/// "Customer Satisfaction Survey" -> "customerSatisfactionSurvey"
///
/// Characters other than ASCII letters, digits and spaces are dropped before
/// splitting on whitespace.
pub fn camel_case(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();

    cleaned
        .split_whitespace()
        .enumerate()
        .map(|(i, word)| {
            let lower = word.to_lowercase();
            if i == 0 {
                return lower;
            }
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect()
}

/// The single value a ccm workflow (or the ccm half of a combined one) carries
pub fn complaint_value(workflow_name: &str) -> EnumValue {
    EnumValue::new(camel_case(workflow_name), workflow_name)
}

pub fn channel_value(id: &str) -> EnumValue {
    EnumValue::new(id, channel_name(id).unwrap_or(id))
}

pub fn channel_values(channels: &[String]) -> Vec<EnumValue> {
    channels.iter().map(|id| channel_value(id)).collect()
}

/// Initial channel selection for a new workflow of this type
pub fn default_channels(workflow_type: WorkflowType) -> Vec<String> {
    if workflow_type.has_reviews() {
        vec![DEFAULT_CHANNEL.to_string()]
    } else {
        Vec::new()
    }
}

/// Put `channels` in catalog order, dropping unknown ids and repeats
pub fn catalog_order(channels: &[String]) -> Vec<String> {
    REVIEW_CHANNELS
        .iter()
        .filter(|(id, _)| channels.iter().any(|c| c == id))
        .map(|(id, _)| id.to_string())
        .collect()
}

pub fn derive(workflow_type: WorkflowType, workflow_name: &str, channels: &[String]) -> Vec<EnumValue> {
    match workflow_type {
        WorkflowType::Ccm => vec![complaint_value(workflow_name)],
        WorkflowType::Orm => channel_values(channels),
        WorkflowType::Combined => {
            let mut values = vec![complaint_value(workflow_name)];
            values.extend(channel_values(channels));
            values
        }
    }
}
